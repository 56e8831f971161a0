use super::*;
use tempfile::tempdir;

#[test]
fn test_unknown_set_is_an_error() {
    let err = keygen(1234, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("unknown parameter set 1234"));
}

#[test]
fn test_params_json_lists_all_sets() {
    let json: serde_json::Value = serde_json::from_str(&params_json(None).unwrap()).unwrap();
    let sets = json.as_array().unwrap();
    assert_eq!(sets.len(), 6);
    assert_eq!(sets[0]["name"], "MEDS-9923");
    assert_eq!(sets[0]["public_key_bytes"], 13220);
    assert_eq!(sets[0]["signature_bytes"], 12640);
}

#[test]
fn test_params_json_single_set() {
    let json: serde_json::Value =
        serde_json::from_str(&params_json(Some(167717)).unwrap()).unwrap();
    assert_eq!(json["q"], 2039);
    assert_eq!(json["secret_key_bytes"], 18064);
}

#[test]
fn test_keygen_sign_verify_files() {
    let dir = tempdir().unwrap();
    let (sk_path, pk_path) = keygen(9923, dir.path()).unwrap();
    assert_eq!(fs::metadata(&sk_path).unwrap().len(), 2416);
    assert_eq!(fs::metadata(&pk_path).unwrap().len(), 13220);

    let msg = dir.path().join("message.txt");
    fs::write(&msg, b"This is my message").unwrap();
    let signed = sign(9923, &msg, &sk_path).unwrap();
    assert_eq!(signed, dir.path().join("message.txt.signed"));

    let recovered = dir.path().join("recovered.txt");
    assert!(verify(9923, &signed, &pk_path, Some(&recovered)).unwrap());
    assert_eq!(fs::read(&recovered).unwrap(), b"This is my message");

    // Tampered message
    let mut bytes = fs::read(&signed).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x20;
    fs::write(&signed, &bytes).unwrap();
    assert!(!verify(9923, &signed, &pk_path, None).unwrap());

    // Truncated file
    fs::write(&signed, &bytes[..100]).unwrap();
    assert!(!verify(9923, &signed, &pk_path, None).unwrap());

    // Key of the wrong set
    assert!(verify(13220, &signed, &pk_path, None).is_err());
}
