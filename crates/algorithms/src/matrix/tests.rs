use super::serialize::packed_len;
use super::*;
use proptest::prelude::*;

fn m(rows: &[&[i64]], q: u16) -> Matrix {
    Matrix::from_rows(rows, q).unwrap()
}

/// Plain RREF with a free choice of pivot columns, used as an independent
/// reference for the systematic-form reduction. Returns the reduced matrix
/// and its pivot columns.
fn reference_rref(a: &Matrix) -> (Vec<Vec<i64>>, Vec<usize>) {
    let q = i64::from(a.modulus());
    let mut rows: Vec<Vec<i64>> = (0..a.rows())
        .map(|i| a.row(i).iter().map(|&v| i64::from(v)).collect())
        .collect();
    let inv = |x: i64| (1..q).find(|y| (x * y) % q == 1).unwrap();

    let mut pivots = Vec::new();
    let mut r = 0;
    for c in 0..a.cols() {
        if r == rows.len() {
            break;
        }
        let Some(p) = (r..rows.len()).find(|&i| rows[i][c] != 0) else {
            continue;
        };
        rows.swap(r, p);
        let s = inv(rows[r][c]);
        for v in rows[r].iter_mut() {
            *v = (*v * s) % q;
        }
        for i in 0..rows.len() {
            if i != r && rows[i][c] != 0 {
                let f = rows[i][c];
                for j in 0..a.cols() {
                    rows[i][j] = (rows[i][j] - f * rows[r][j]).rem_euclid(q);
                }
            }
        }
        pivots.push(c);
        r += 1;
    }
    (rows, pivots)
}

// ========== Construction ==========

#[test]
fn test_identity_and_upper_shift() {
    let i3 = Matrix::identity(3, 13);
    assert_eq!(i3, m(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]], 13));

    let u3 = Matrix::upper_shift(3, 13);
    assert_eq!(u3, m(&[&[0, 1, 0], &[0, 0, 1], &[0, 0, 0]], 13));

    // U^3 = 0
    let u2 = u3.mul(&u3).unwrap();
    assert_eq!(u2.mul(&u3).unwrap(), Matrix::new(3, 3, 13));
}

#[test]
fn test_from_rows_reduces_negative_values() {
    let a = m(&[&[-1, 14], &[7, -7]], 7);
    assert_eq!(a.as_slice(), &[6, 0, 0, 0]);
}

#[test]
fn test_from_vec_rejects_bad_input() {
    assert!(Matrix::from_vec(2, 2, 7, vec![0, 1, 2]).is_err());
    assert!(Matrix::from_vec(2, 2, 7, vec![0, 1, 2, 7]).is_err());
    assert!(Matrix::from_vec(0, 2, 7, vec![]).is_err());
    assert!(Matrix::from_rows(&[vec![1i64, 2], vec![3]], 7).is_err());
}

#[test]
fn test_with_default() {
    let a = Matrix::with_default(2, 3, 11, -1);
    assert!(a.as_slice().iter().all(|&v| v == 10));
}

#[test]
fn test_get_set() {
    let mut a = Matrix::new(2, 2, 13);
    a.set(0, 1, FieldElement::new(-3, 13));
    a.set_value(1, 0, 27);
    assert_eq!(a.get(0, 1).value(), 10);
    assert_eq!(a.value(1, 0), 1);
    assert_eq!(a.get(1, 1), FieldElement::zero(13));
}

// ========== Arithmetic ==========

#[test]
fn test_add_sub_neg() {
    let a = m(&[&[1, 2], &[3, 4]], 5);
    let b = m(&[&[4, 4], &[4, 4]], 5);
    assert_eq!(a.add(&b).unwrap(), m(&[&[0, 1], &[2, 3]], 5));
    assert_eq!(a.sub(&b).unwrap(), m(&[&[2, 3], &[4, 0]], 5));
    assert_eq!(a.add(&a.neg()).unwrap(), Matrix::new(2, 2, 5));
    assert!(a.add(&Matrix::new(2, 3, 5)).is_err());
    assert!(a.add(&Matrix::new(2, 2, 7)).is_err());
}

#[test]
fn test_mul_known_product() {
    let a = m(&[&[1, 2], &[3, 4]], 13);
    let b = m(&[&[5, 6], &[7, 8]], 13);
    // [[19, 22], [43, 50]] mod 13
    assert_eq!(a.mul(&b).unwrap(), m(&[&[6, 9], &[4, 11]], 13));
    assert!(a.mul(&Matrix::new(3, 1, 13)).is_err());
}

#[test]
fn test_mul_rectangular() {
    let a = m(&[&[1, 0, 2]], 7);
    let b = m(&[&[1], &[5], &[3]], 7);
    assert_eq!(a.mul(&b).unwrap(), m(&[&[0]], 7));
}

#[test]
fn test_scalar_mul_and_transpose() {
    let a = m(&[&[1, 2, 3], &[4, 5, 6]], 7);
    assert_eq!(
        a.scalar_mul(FieldElement::new(3, 7)),
        m(&[&[3, 6, 2], &[5, 1, 4]], 7)
    );
    let t = a.transpose();
    assert_eq!(t, m(&[&[1, 4], &[2, 5], &[3, 6]], 7));
    assert_eq!(t.transpose(), a);
}

#[test]
fn test_kronecker() {
    let b = m(&[&[1, 2], &[3, 4]], 11);
    let k = Matrix::identity(2, 11).kronecker(&b).unwrap();
    assert_eq!(
        k,
        m(
            &[&[1, 2, 0, 0], &[3, 4, 0, 0], &[0, 0, 1, 2], &[0, 0, 3, 4]],
            11
        )
    );

    let a = m(&[&[2, 3]], 11);
    let k = a.kronecker(&b).unwrap();
    assert_eq!(k, m(&[&[2, 4, 3, 6], &[6, 8, 9, 1]], 11));
}

#[test]
fn test_submatrix_and_augment() {
    let a = m(&[&[1, 2, 3], &[4, 5, 6], &[0, 1, 0]], 7);
    assert_eq!(a.submatrix(1..3, 0..2).unwrap(), m(&[&[4, 5], &[0, 1]], 7));
    assert!(a.submatrix(0..4, 0..1).is_err());
    assert!(a.submatrix(1..1, 0..1).is_err());

    let aug = a.augment(&Matrix::identity(3, 7)).unwrap();
    assert_eq!(aug.cols(), 6);
    assert_eq!(aug.submatrix(0..3, 0..3).unwrap(), a);
}

#[test]
fn test_rows_to_matrices_round_trip() {
    let g = m(&[&[1, 2, 3, 4, 5, 6], &[6, 5, 4, 3, 2, 1]], 13);
    let parts = g.rows_to_matrices(2, 3).unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0], m(&[&[1, 2, 3], &[4, 5, 6]], 13));
    assert_eq!(parts[1].get(1, 0).value(), 3);
    assert_eq!(Matrix::matrices_to_rows(&parts).unwrap(), g);

    assert!(g.rows_to_matrices(2, 2).is_err());
    assert!(Matrix::matrices_to_rows(&[]).is_err());
}

#[test]
fn test_row_operations() {
    let mut a = m(&[&[1, 2], &[3, 4]], 7);
    a.swap_rows(0, 1);
    assert_eq!(a, m(&[&[3, 4], &[1, 2]], 7));
    a.scale_row(1, FieldElement::new(2, 7));
    assert_eq!(a, m(&[&[3, 4], &[2, 4]], 7));
    a.add_scaled_row(1, 0, FieldElement::new(-1, 7));
    assert_eq!(a, m(&[&[1, 0], &[2, 4]], 7));
}

// ========== Systematic form ==========

#[test]
fn test_systematic_form_with_row_swap() {
    let a = m(&[&[0, 1, 5], &[1, 0, 6]], 7);
    assert_eq!(a.systematic_form().unwrap(), m(&[&[1, 0, 6], &[0, 1, 5]], 7));
}

#[test]
fn test_systematic_form_fails_on_zero_column() {
    let a = m(&[&[0, 1, 2], &[0, 3, 4]], 13);
    assert!(a.systematic_form().is_none());
    // RREF exists but its pivots are not in the leading columns
    let b = m(&[&[1, 2, 3], &[2, 4, 5]], 13);
    assert!(b.systematic_form().is_none());
}

#[test]
fn test_systematic_form_window_leaves_outside_untouched() {
    let mut a = m(&[&[9, 9, 9, 9], &[9, 2, 4, 9], &[9, 1, 3, 9]], 11);
    a.systematic_form_window(1, 1, 2, 2).unwrap();
    assert_eq!(a, m(&[&[9, 9, 9, 9], &[9, 1, 0, 9], &[9, 0, 1, 9]], 11));

    assert!(a.systematic_form_window(2, 2, 2, 2).is_err());
    assert!(a.systematic_form_window(0, 0, 3, 2).is_err());
}

#[test]
fn test_inverse_known() {
    let a = m(&[&[1, 2], &[3, 4]], 13);
    let inv = a.inverse().unwrap();
    assert_eq!(inv, m(&[&[11, 1], &[8, 6]], 13));
    assert_eq!(a.mul(&inv).unwrap(), Matrix::identity(2, 13));
    assert_eq!(inv.inverse().unwrap(), a);
    assert_eq!(a.try_inverse().unwrap(), inv);
}

#[test]
fn test_singular_matrix() {
    let a = m(&[&[1, 2], &[2, 4]], 13);
    assert!(!a.is_invertible());
    assert!(a.inverse().is_none());
    assert!(a.try_inverse().is_err());
    assert!(!Matrix::new(2, 3, 13).is_invertible());
    assert!(Matrix::identity(5, 4093).is_invertible());
}

// ========== Codecs ==========

#[test]
fn test_compress_layout() {
    let a = m(&[&[1, 4092]], 4093);
    assert_eq!(a.compress(), vec![0x00, 0x01, 0x0F, 0xFC]);
    assert_eq!(Matrix::compressed_len(3, 4), 24);
    assert_eq!(Matrix::decompress(&a.compress(), 1, 2, 4093).unwrap(), a);
}

#[test]
fn test_decompress_is_strict() {
    assert!(Matrix::decompress(&[0x0F, 0xFD], 1, 1, 4093).is_err());
    assert!(Matrix::decompress(&[0x00, 0x01, 0x00], 1, 1, 4093).is_err());
    assert!(Matrix::decompress(&[0x07, 0xF6], 1, 1, 2039).is_ok());
}

#[test]
fn test_pack_bits_layout() {
    let a = m(&[&[1, 2, 3]], 7);
    assert_eq!(packed_len(3, 3), 2);
    assert_eq!(a.pack_bits(), vec![209, 0]);
    assert_eq!(Matrix::unpack_bits(&[209, 0], 1, 3, 7).unwrap(), a);
    // non-zero padding
    assert!(Matrix::unpack_bits(&[209, 2], 1, 3, 7).is_err());
    // 7 is not a residue
    assert!(Matrix::unpack_bits(&[0x07, 0], 1, 3, 7).is_err());
}

// ========== Properties ==========

fn arb_matrix(rows: usize, cols: usize, q: u16) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(0..q, rows * cols)
        .prop_map(move |data| Matrix::from_vec(rows, cols, q, data).unwrap())
}

proptest! {
    #[test]
    fn prop_systematic_form_matches_reference(a in arb_matrix(3, 5, 13)) {
        let (rref, pivots) = reference_rref(&a);
        let leading = pivots == (0..a.rows()).collect::<Vec<_>>();
        match a.systematic_form() {
            Some(sf) => {
                prop_assert!(leading);
                for i in 0..a.rows() {
                    let row: Vec<i64> = sf.row(i).iter().map(|&v| i64::from(v)).collect();
                    prop_assert_eq!(&row, &rref[i]);
                }
            }
            None => prop_assert!(!leading),
        }
    }

    #[test]
    fn prop_inverse_is_two_sided(a in arb_matrix(4, 4, 2039)) {
        if let Some(inv) = a.inverse() {
            let id = Matrix::identity(4, 2039);
            prop_assert_eq!(a.mul(&inv).unwrap(), id.clone());
            prop_assert_eq!(inv.mul(&a).unwrap(), id);
        } else {
            prop_assert!(!a.is_invertible());
        }
    }

    #[test]
    fn prop_pack_bits_round_trip(a in arb_matrix(3, 7, 2039)) {
        let packed = a.pack_bits();
        prop_assert_eq!(packed.len(), packed_len(21, 11));
        prop_assert_eq!(Matrix::unpack_bits(&packed, 3, 7, 2039).unwrap(), a);
    }

    #[test]
    fn prop_mul_transpose(a in arb_matrix(2, 3, 13), b in arb_matrix(3, 4, 13)) {
        let ab_t = a.mul(&b).unwrap().transpose();
        prop_assert_eq!(ab_t, b.transpose().mul(&a.transpose()).unwrap());
    }
}
