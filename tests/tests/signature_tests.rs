//! End-to-end tests of every MEDS parameter set

use meds::prelude::*;
use meds::sign::{Meds134180, Meds13220, Meds167717, Meds41711, Meds69497, Meds9923};
use meds_sign::pq::meds as scheme;
use meds_tests::{exercise_scheme, flip, rng, MESSAGE};

#[test]
fn test_meds9923() {
    exercise_scheme::<Meds9923>(1);
}

#[test]
fn test_meds13220() {
    exercise_scheme::<Meds13220>(2);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "slow without optimizations")]
fn test_meds41711() {
    exercise_scheme::<Meds41711>(3);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "slow without optimizations")]
fn test_meds69497() {
    exercise_scheme::<Meds69497>(4);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "slow without optimizations")]
fn test_meds134180() {
    exercise_scheme::<Meds134180>(5);
}

#[test]
#[cfg_attr(debug_assertions, ignore = "slow without optimizations")]
fn test_meds167717() {
    exercise_scheme::<Meds167717>(6);
}

#[test]
fn test_type_sizes_match_parameter_table() {
    assert_eq!(Meds9923::PUBLIC_KEY_SIZE, 13220);
    assert_eq!(Meds9923::SECRET_KEY_SIZE, 2416);
    assert_eq!(Meds9923::SIGNATURE_SIZE, 12640);
    assert_eq!(Meds13220::SIGNATURE_SIZE, 16896);
    assert_eq!(Meds41711::SIGNATURE_SIZE, 53664);
    assert_eq!(Meds69497::SIGNATURE_SIZE, 72160);
    assert_eq!(Meds134180::PUBLIC_KEY_SIZE, 195152);
    assert_eq!(Meds167717::SIGNATURE_SIZE, 239648);
}

#[test]
fn test_runtime_and_typed_api_agree() {
    let params = ParameterSet::from_id(9923).unwrap();
    let (pk, sk) = scheme::keypair(params, &mut rng(11)).unwrap();
    let (typed_pk, _) = Meds9923::keypair(&mut rng(11)).unwrap();
    assert_eq!(pk, Meds9923::serialize_public_key(&typed_pk));

    let sig = scheme::sign(params, MESSAGE, &sk, &mut rng(12)).unwrap();
    let typed_sig = Meds9923::deserialize_signature(&sig).unwrap();
    Meds9923::verify(MESSAGE, &typed_sig, &typed_pk).unwrap();
}

#[test]
fn test_every_region_of_the_signature_is_bound() {
    let params = ParameterSet::from_id(13220).unwrap();
    let mut rng = rng(21);
    let (pk, sk) = scheme::keypair(params, &mut rng).unwrap();
    let sig = scheme::sign(params, MESSAGE, &sk, &mut rng).unwrap();

    let responses = params.w * (params.l_f_mm() + params.l_f_nn());
    let path_end = responses + params.path_bytes();
    let digest_end = path_end + params.l_digest;
    let positions = [
        0,
        responses / 2,
        responses - 1,
        responses,
        path_end - 1,
        path_end,
        digest_end - 1,
        digest_end,
        sig.len() - 1,
    ];
    for pos in positions {
        let err = scheme::verify(params, MESSAGE, &flip(&sig, pos), &pk)
            .expect_err("mutated signature accepted");
        assert!(
            err.is_verification_failure(),
            "byte {}: unexpected error {}",
            pos,
            err
        );
    }
}

#[test]
fn test_signature_from_other_key_rejected() {
    let mut rng = rng(31);
    let (pk_a, _) = Meds9923::keypair(&mut rng).unwrap();
    let (_, sk_b) = Meds9923::keypair(&mut rng).unwrap();
    let sig = Meds9923::sign(MESSAGE, &sk_b).unwrap();
    assert!(matches!(
        Meds9923::verify(MESSAGE, &sig, &pk_a),
        Err(Error::InvalidSignature { .. })
    ));
}

#[test]
fn test_open_rejects_short_input() {
    let (pk, _) = Meds9923::keypair(&mut rng(41)).unwrap();
    assert!(Meds9923::open(&[0u8; 64], &pk).is_err());
}
