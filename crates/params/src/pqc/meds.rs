//! Constants for the MEDS digital signature algorithm
//!
//! A parameter set fixes the field modulus `q`, the matrix dimensions
//! `m`, `n`, `k`, the number of public keys `s`, the number of rounds `t`,
//! the challenge weight `w` and the seed lengths. All byte lengths of keys,
//! signatures and seed-tree paths are derived from these values.
//!
//! Field elements are stored in `q_bitlen / 8 = 2` bytes each.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Upper bound on the iterations of every rejection-sampling loop.
///
/// Every loop accepts with probability close to 1 per attempt, so reaching
/// this bound means the sampler is broken rather than unlucky.
pub const MAX_REJECTION_ITERATIONS: usize = 1 << 16;

/// Storage width of a field element in bits
pub const MEDS_Q_BITLEN: usize = 16;

/// Ceiling of log2(x) for x >= 1.
pub const fn ceil_log2(x: usize) -> usize {
    let mut bits = 0;
    while (1usize << bits) < x {
        bits += 1;
    }
    bits
}

/// Zero-padded length of a seed-tree path revealing `t - w` of `t` leaves.
///
/// The node count is `2^ceil(log2 w) + w * (ceil(log2 t) - ceil(log2 w) - 1)`.
/// The bracket is `-1` when `w` and `t` round up to the same power of two
/// (MEDS-167717), so it is evaluated signed and clamped at zero.
pub const fn seed_tree_path_bytes(t: usize, w: usize, seed_len: usize) -> usize {
    let log_w = ceil_log2(if w == 0 { 1 } else { w }) as isize;
    let log_t = ceil_log2(t) as isize;
    let nodes = (1isize << log_w) + w as isize * (log_t - log_w - 1);
    if nodes <= 0 {
        0
    } else {
        nodes as usize * seed_len
    }
}

/// A MEDS parameter set.
///
/// Constructed once (see [`ParameterSet::ALL`]) and passed by reference to
/// every operation that depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterSet {
    /// Algorithm name, e.g. `MEDS-9923`
    pub name: &'static str,
    /// Numeric identifier of the set
    pub id: u32,
    /// Field modulus
    pub q: u16,
    /// Columns of the code matrices
    pub n: usize,
    /// Rows of the code matrices
    pub m: usize,
    /// Code dimension (rows of a generator matrix)
    pub k: usize,
    /// Number of public generator matrices, including G0
    pub s: usize,
    /// Number of rounds
    pub t: usize,
    /// Number of non-zero challenges
    pub w: usize,
    /// Seed-tree node seed length
    pub l_tree_seed: usize,
    /// Secret seed length
    pub l_sec_seed: usize,
    /// Public seed length
    pub l_pub_seed: usize,
    /// Salt length
    pub l_salt: usize,
    /// Digest length
    pub l_digest: usize,
}

impl ParameterSet {
    /// The six published parameter sets, smallest public key first
    pub const ALL: [&'static ParameterSet; 6] = [
        &MEDS_9923,
        &MEDS_13220,
        &MEDS_41711,
        &MEDS_69497,
        &MEDS_134180,
        &MEDS_167717,
    ];

    /// Look a parameter set up by its numeric identifier
    pub fn from_id(id: u32) -> Option<&'static ParameterSet> {
        Self::ALL.iter().copied().find(|p| p.id == id)
    }

    /// Bytes used to store one field element
    pub const fn q_bytes(&self) -> usize {
        MEDS_Q_BITLEN / 8
    }

    /// Length of a stored m x m matrix
    pub const fn l_f_mm(&self) -> usize {
        self.m * self.m * self.q_bytes()
    }

    /// Length of a stored n x n matrix
    pub const fn l_f_nn(&self) -> usize {
        self.n * self.n * self.q_bytes()
    }

    /// Length of one compressed public generator matrix
    pub const fn l_g_i(&self) -> usize {
        ((self.k - 2) * (self.m * self.n - self.k) + self.n) * self.q_bytes()
    }

    /// Secret key length
    pub const fn secret_key_bytes(&self) -> usize {
        (self.s - 1) * (self.l_f_mm() + self.l_f_nn()) + self.l_sec_seed + self.l_pub_seed
    }

    /// Public key length
    pub const fn public_key_bytes(&self) -> usize {
        (self.s - 1) * self.l_g_i() + self.l_pub_seed
    }

    /// Seed-tree path length (zero padded)
    pub const fn path_bytes(&self) -> usize {
        seed_tree_path_bytes(self.t, self.w, self.l_tree_seed)
    }

    /// Detached signature length
    pub const fn signature_bytes(&self) -> usize {
        self.l_digest + self.w * (self.l_f_mm() + self.l_f_nn()) + self.path_bytes() + self.l_salt
    }

    /// Height of the seed tree
    pub const fn tree_height(&self) -> usize {
        ceil_log2(self.t)
    }

    /// Offset added to the round index in the per-round seed derivation
    pub const fn round_domain(&self) -> u32 {
        1u32 << (1 + self.tree_height())
    }
}

/// MEDS-9923: q = 4093, n = m = k = 14, s = 4, t = 1152, w = 14
pub const MEDS_9923: ParameterSet = ParameterSet {
    name: "MEDS-9923",
    id: 9923,
    q: 4093,
    n: 14,
    m: 14,
    k: 14,
    s: 4,
    t: 1152,
    w: 14,
    l_tree_seed: 16,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// MEDS-13220: q = 4093, n = m = k = 14, s = 5, t = 192, w = 20
pub const MEDS_13220: ParameterSet = ParameterSet {
    name: "MEDS-13220",
    id: 13220,
    q: 4093,
    n: 14,
    m: 14,
    k: 14,
    s: 5,
    t: 192,
    w: 20,
    l_tree_seed: 16,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// MEDS-41711: q = 4093, n = m = k = 22, s = 4, t = 608, w = 26
pub const MEDS_41711: ParameterSet = ParameterSet {
    name: "MEDS-41711",
    id: 41711,
    q: 4093,
    n: 22,
    m: 22,
    k: 22,
    s: 4,
    t: 608,
    w: 26,
    l_tree_seed: 24,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// MEDS-69497: q = 4093, n = m = k = 22, s = 5, t = 160, w = 36
pub const MEDS_69497: ParameterSet = ParameterSet {
    name: "MEDS-69497",
    id: 69497,
    q: 4093,
    n: 22,
    m: 22,
    k: 22,
    s: 5,
    t: 160,
    w: 36,
    l_tree_seed: 24,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// MEDS-134180: q = 2039, n = m = k = 30, s = 5, t = 192, w = 52
pub const MEDS_134180: ParameterSet = ParameterSet {
    name: "MEDS-134180",
    id: 134180,
    q: 2039,
    n: 30,
    m: 30,
    k: 30,
    s: 5,
    t: 192,
    w: 52,
    l_tree_seed: 32,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// MEDS-167717: q = 2039, n = m = k = 30, s = 6, t = 112, w = 66
pub const MEDS_167717: ParameterSet = ParameterSet {
    name: "MEDS-167717",
    id: 167717,
    q: 2039,
    n: 30,
    m: 30,
    k: 30,
    s: 6,
    t: 112,
    w: 66,
    l_tree_seed: 32,
    l_sec_seed: 32,
    l_pub_seed: 32,
    l_salt: 32,
    l_digest: 32,
};

/// Common trait for compile-time MEDS parameter selection
pub trait MedsParams: Send + Sync + 'static {
    /// The parameter set
    const PARAMS: ParameterSet;

    /// Algorithm name
    const NAME: &'static str = Self::PARAMS.name;

    /// Public key size in bytes
    const PUBLIC_KEY_BYTES: usize = Self::PARAMS.public_key_bytes();
    /// Secret key size in bytes
    const SECRET_KEY_BYTES: usize = Self::PARAMS.secret_key_bytes();
    /// Signature size in bytes
    const SIGNATURE_SIZE: usize = Self::PARAMS.signature_bytes();
}

macro_rules! meds_params {
    ($(#[$doc:meta])* $name:ident => $set:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl MedsParams for $name {
            const PARAMS: ParameterSet = $set;
        }
    };
}

meds_params!(
    /// Marker type for MEDS-9923
    Meds9923Params => MEDS_9923
);
meds_params!(
    /// Marker type for MEDS-13220
    Meds13220Params => MEDS_13220
);
meds_params!(
    /// Marker type for MEDS-41711
    Meds41711Params => MEDS_41711
);
meds_params!(
    /// Marker type for MEDS-69497
    Meds69497Params => MEDS_69497
);
meds_params!(
    /// Marker type for MEDS-134180
    Meds134180Params => MEDS_134180
);
meds_params!(
    /// Marker type for MEDS-167717
    Meds167717Params => MEDS_167717
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(112), 7);
        assert_eq!(ceil_log2(1152), 11);
        assert_eq!(ceil_log2(2039), 11);
        assert_eq!(ceil_log2(4093), 12);
    }

    #[test]
    fn test_derived_sizes() {
        // (set, pk, sk, path, sig)
        let expected = [
            (&MEDS_9923, 13220, 2416, 1600, 12640),
            (&MEDS_13220, 17616, 3200, 1152, 16896),
            (&MEDS_41711, 55604, 5872, 3264, 53664),
            (&MEDS_69497, 74128, 7808, 2400, 72160),
            (&MEDS_134180, 195152, 14464, 3712, 190976),
            (&MEDS_167717, 243932, 18064, 1984, 239648),
        ];
        for (p, pk, sk, path, sig) in expected {
            assert_eq!(p.public_key_bytes(), pk, "{}", p.name);
            assert_eq!(p.secret_key_bytes(), sk, "{}", p.name);
            assert_eq!(p.path_bytes(), path, "{}", p.name);
            assert_eq!(p.signature_bytes(), sig, "{}", p.name);
        }
    }

    #[test]
    fn test_path_bytes_when_tree_and_challenge_heights_match() {
        // ceil(log2 112) == ceil(log2 66) == 7: 128 - 66 nodes
        assert_eq!(ceil_log2(MEDS_167717.t), ceil_log2(MEDS_167717.w));
        let p = core::hint::black_box(&MEDS_167717);
        assert_eq!(p.path_bytes(), 62 * 32);
        assert_eq!(seed_tree_path_bytes(112, 66, 32), 1984);
        const SIG: usize = MEDS_167717.signature_bytes();
        assert_eq!(SIG, 239648);
        assert_eq!(Meds167717Params::SIGNATURE_SIZE, SIG);
    }

    #[test]
    fn test_seed_tree_path_bytes_edges() {
        assert_eq!(seed_tree_path_bytes(5, 1, 32), (1 + 2) * 32);
        assert_eq!(seed_tree_path_bytes(8, 2, 16), (2 + 2 * 1) * 16);
        // every leaf challenged: nothing left to reveal
        assert_eq!(seed_tree_path_bytes(4, 4, 32), 0);
        assert_eq!(seed_tree_path_bytes(1, 1, 32), 0);
    }

    #[test]
    fn test_lookup_by_id() {
        for p in ParameterSet::ALL {
            assert_eq!(ParameterSet::from_id(p.id), Some(p));
            assert!(p.w <= p.t);
            assert!(p.s >= 2);
            assert_eq!(p.m, p.n);
        }
        assert_eq!(ParameterSet::from_id(1234), None);
    }

    #[test]
    fn test_marker_constants() {
        assert_eq!(Meds9923Params::NAME, "MEDS-9923");
        assert_eq!(Meds167717Params::SIGNATURE_SIZE, 239648);
        assert_eq!(Meds41711Params::PUBLIC_KEY_BYTES, MEDS_41711.public_key_bytes());
    }

    #[test]
    fn test_round_domain() {
        assert_eq!(MEDS_9923.round_domain(), 4096);
        assert_eq!(MEDS_167717.round_domain(), 256);
    }
}
