//! Property tests across crate boundaries

use meds_algorithms::{FieldElement, Matrix};
use meds_params::pqc::meds::ParameterSet;
use meds_sign::pq::meds::expand::{expand_inv_mat, parse_hash};
use meds_sign::pq::meds::seed_tree::{build_seed_tree, path_to_seed_tree, seed_tree_to_path};
use meds_sign::pq::meds::SeedTree;
use proptest::prelude::*;

fn parameter_set() -> impl Strategy<Value = &'static ParameterSet> {
    prop::sample::select(ParameterSet::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parse_hash_has_weight_w(p in parameter_set(), digest in any::<[u8; 32]>()) {
        let h = parse_hash(p.s, p.t, p.w, &digest).unwrap();
        prop_assert_eq!(h.len(), p.t);
        prop_assert_eq!(h.iter().filter(|&&c| c != 0).count(), p.w);
        prop_assert!(h.iter().all(|&c| usize::from(c) < p.s));
    }

    #[test]
    fn signature_path_fits_budget(
        p in parameter_set(),
        digest in any::<[u8; 32]>(),
        root in any::<[u8; 32]>(),
        salt in any::<[u8; 32]>(),
    ) {
        let h = parse_hash(p.s, p.t, p.w, &digest).unwrap();
        let root = &root[..p.l_tree_seed];
        let path = seed_tree_to_path(p.w, p.t, &h, root, &salt).unwrap();
        prop_assert_eq!(path.len(), p.path_bytes());

        let full = build_seed_tree(root, &salt, p.t).unwrap();
        let partial = path_to_seed_tree(&h, &path, &salt, p.l_tree_seed).unwrap();
        for (i, leaf) in partial.iter().enumerate() {
            if h[i] == 0 {
                prop_assert_eq!(leaf.as_ref(), Some(&full[i]));
            } else {
                prop_assert!(leaf.is_none());
            }
        }
    }

    #[test]
    fn seed_tree_leaf_matches_leaves(t in 1usize..200, root in any::<[u8; 16]>()) {
        let tree = SeedTree::new(&root, b"salt", t).unwrap();
        prop_assert_eq!(tree.leaf_count(), t);
        let leaves = tree.leaves();
        for i in 0..t {
            prop_assert_eq!(tree.leaf(i), leaves[i].as_deref());
        }
        prop_assert!(tree.leaf(t).is_none());
    }

    #[test]
    fn field_inverse(v in 1i64..4093) {
        let x = FieldElement::new(v, 4093);
        let inv = x.inv().unwrap();
        prop_assert_eq!((x * inv).value(), 1);
    }

    #[test]
    fn sampled_transforms_are_invertible(seed in any::<[u8; 32]>(), d in 3usize..8) {
        let m = expand_inv_mat(&seed, 2039, d).unwrap();
        let inv = m.inverse().unwrap();
        prop_assert_eq!(inv.mul(&m).unwrap(), Matrix::identity(d, 2039));
    }
}
