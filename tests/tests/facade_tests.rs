//! The `meds` facade and its prelude

use meds::prelude::*;
use meds::sign::Meds9923;
use meds_tests::{rng, MESSAGE};

#[test]
fn test_prelude_round_trip() {
    let (pk, sk) = Meds9923::keypair(&mut rng(7)).unwrap();
    let sig = Meds9923::sign(MESSAGE, &sk).unwrap();
    Meds9923::verify(MESSAGE, &sig, &pk).unwrap();
    assert_eq!(Meds9923::name(), "MEDS-9923");
}

#[test]
fn test_parameter_lookup() {
    for p in ParameterSet::ALL {
        assert_eq!(ParameterSet::from_id(p.id).map(|found| found.name), Some(p.name));
    }
    assert!(ParameterSet::from_id(1).is_none());
}

#[test]
fn test_matrix_reexport() {
    let m = Matrix::identity(3, 13);
    assert_eq!(m.inverse(), Some(m.clone()));
    assert_eq!(FieldElement::new(-1, 13).value(), 12);
}

#[test]
fn test_shake256_known_answer() {
    use meds::algorithms::xof::{ExtendableOutputFunction, ShakeXof256};
    let mut xof = ShakeXof256::new();
    xof.update(b"").unwrap();
    let out = xof.squeeze_into_vec(32).unwrap();
    assert_eq!(
        hex::encode(out),
        "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f"
    );
}
