//! Seed tree
//!
//! A binary tree of height `h = ceil(log2 t)` whose leaves are the `t`
//! per-round seeds. Children are derived from their parent as
//!
//! ```text
//! SHAKE256(salt || u16_le(d*d - 1 + j) || seed)  ->  left || right
//! ```
//!
//! where `(d, j)` is the parent's depth and index. The node `(d, j)` exists
//! iff `j * 2^(h-d) < t`, which prunes the right edge when `t` is not a power
//! of two.
//!
//! To reveal all but the challenged leaves, every challenged leaf and all of
//! its ancestors lose their label. The path is the concatenation, in
//! depth-first order, of the seeds of the topmost nodes that kept their
//! label. The tree is stored as an arena indexed by `2^d - 1 + j`.

use algorithms::xof::{ExtendableOutputFunction, ShakeXof256};
use params::pqc::meds::{ceil_log2, seed_tree_path_bytes};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// An arena-backed seed tree.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SeedTree {
    t: usize,
    height: usize,
    seed_len: usize,
    salt: Vec<u8>,
    seeds: Vec<Option<Vec<u8>>>,
    labeled: Vec<bool>,
}

impl SeedTree {
    fn empty(salt: &[u8], t: usize, seed_len: usize) -> Result<Self> {
        if t == 0 || seed_len == 0 {
            return Err(Error::InvalidParameter(
                "seed tree needs at least one leaf and a non-empty seed".into(),
            ));
        }
        let height = ceil_log2(t);
        let size = (1usize << (height + 1)) - 1;
        let mut tree = Self {
            t,
            height,
            seed_len,
            salt: salt.to_vec(),
            seeds: vec![None; size],
            labeled: vec![false; size],
        };
        for depth in 0..=height {
            for j in 0..(1usize << depth) {
                if tree.exists(depth, j) {
                    let idx = Self::index(depth, j);
                    tree.labeled[idx] = true;
                }
            }
        }
        Ok(tree)
    }

    /// Builds the full tree from a root seed.
    pub fn new(root: &[u8], salt: &[u8], t: usize) -> Result<Self> {
        let mut tree = Self::empty(salt, t, root.len())?;
        tree.seeds[0] = Some(root.to_vec());
        tree.expand_subtree(0, 0)?;
        Ok(tree)
    }

    #[inline]
    fn index(depth: usize, j: usize) -> usize {
        (1usize << depth) - 1 + j
    }

    #[inline]
    fn exists(&self, depth: usize, j: usize) -> bool {
        depth <= self.height && (j << (self.height - depth)) < self.t
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.t
    }

    fn expand_children(&mut self, depth: usize, j: usize) -> Result<()> {
        let parent = self.seeds[Self::index(depth, j)]
            .as_ref()
            .ok_or_else(|| Error::Internal("expanding a node without a seed".into()))?;

        let position = (depth * depth + j).wrapping_sub(1) as u16;
        let mut xof = ShakeXof256::new();
        xof.update(&self.salt)?;
        xof.update(&position.to_le_bytes())?;
        xof.update(parent)?;

        for child in [2 * j, 2 * j + 1] {
            let seed = xof.squeeze_into_vec(self.seed_len)?;
            if self.exists(depth + 1, child) {
                self.seeds[Self::index(depth + 1, child)] = Some(seed);
            }
        }
        Ok(())
    }

    fn expand_subtree(&mut self, depth: usize, j: usize) -> Result<()> {
        if depth == self.height {
            return Ok(());
        }
        self.expand_children(depth, j)?;
        for child in [2 * j, 2 * j + 1] {
            if self.exists(depth + 1, child) {
                self.expand_subtree(depth + 1, child)?;
            }
        }
        Ok(())
    }

    /// Seed of leaf `i`, or `None` if it is hidden.
    pub fn leaf(&self, i: usize) -> Option<&[u8]> {
        if i >= self.t {
            return None;
        }
        self.seeds[Self::index(self.height, i)].as_deref()
    }

    /// Copies of all leaf seeds, `None` for hidden leaves.
    pub fn leaves(&self) -> Vec<Option<Vec<u8>>> {
        (0..self.t).map(|i| self.leaf(i).map(<[u8]>::to_vec)).collect()
    }

    /// Removes the label of leaf `i` and of all of its ancestors.
    pub fn hide_leaf(&mut self, i: usize) {
        if i >= self.t {
            return;
        }
        let mut j = i;
        for depth in (0..=self.height).rev() {
            self.labeled[Self::index(depth, j)] = false;
            j /= 2;
        }
    }

    /// Hides every leaf whose challenge entry is non-zero.
    pub fn hide_challenged(&mut self, challenge: &[u8]) {
        for (i, &c) in challenge.iter().enumerate() {
            if c != 0 {
                self.hide_leaf(i);
            }
        }
    }

    fn collect_path(&self, depth: usize, j: usize, out: &mut Vec<u8>) -> Result<()> {
        let idx = Self::index(depth, j);
        if self.labeled[idx] {
            let seed = self.seeds[idx]
                .as_ref()
                .ok_or_else(|| Error::Internal("labeled node has no seed".into()))?;
            out.extend_from_slice(seed);
        } else if depth < self.height {
            for child in [2 * j, 2 * j + 1] {
                if self.exists(depth + 1, child) {
                    self.collect_path(depth + 1, child, out)?;
                }
            }
        }
        Ok(())
    }

    /// Serializes the labeled frontier, zero padded to `len` bytes.
    pub fn to_path(&self, len: usize) -> Result<Vec<u8>> {
        let mut path = Vec::with_capacity(len);
        self.collect_path(0, 0, &mut path)?;
        if path.len() > len {
            return Err(Error::Internal(format!(
                "seed tree path needs {} bytes but only {} are available",
                path.len(),
                len
            )));
        }
        path.resize(len, 0);
        Ok(path)
    }

    fn consume_path(&mut self, depth: usize, j: usize, path: &[u8], pos: &mut usize) -> Result<()> {
        let idx = Self::index(depth, j);
        if self.labeled[idx] {
            let end = *pos + self.seed_len;
            let chunk = path
                .get(*pos..end)
                .ok_or_else(|| Error::Deserialization("seed tree path too short".into()))?;
            self.seeds[idx] = Some(chunk.to_vec());
            *pos = end;
            self.expand_subtree(depth, j)?;
        } else if depth < self.height {
            for child in [2 * j, 2 * j + 1] {
                if self.exists(depth + 1, child) {
                    self.consume_path(depth + 1, child, path, pos)?;
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the revealed part of a tree from a path.
    ///
    /// Leaves whose challenge entry is non-zero stay hidden. Bytes of `path`
    /// after the last revealed seed must be zero.
    pub fn from_path(challenge: &[u8], path: &[u8], salt: &[u8], seed_len: usize) -> Result<Self> {
        let mut tree = Self::empty(salt, challenge.len(), seed_len)?;
        tree.hide_challenged(challenge);

        let mut pos = 0;
        tree.consume_path(0, 0, path, &mut pos)?;
        if path[pos..].iter().any(|&b| b != 0) {
            return Err(Error::Deserialization(
                "seed tree path has non-zero padding".into(),
            ));
        }
        Ok(tree)
    }
}

/// Derives all `t` leaf seeds from a root seed.
pub fn build_seed_tree(seed: &[u8], salt: &[u8], t: usize) -> Result<Vec<Vec<u8>>> {
    let tree = SeedTree::new(seed, salt, t)?;
    (0..t)
        .map(|i| {
            tree.leaf(i)
                .map(<[u8]>::to_vec)
                .ok_or_else(|| Error::Internal("full seed tree is missing a leaf".into()))
        })
        .collect()
}

/// Builds the tree from `seed` and returns the path revealing every leaf
/// whose challenge entry is zero.
pub fn seed_tree_to_path(
    w: usize,
    t: usize,
    challenge: &[u8],
    seed: &[u8],
    salt: &[u8],
) -> Result<Vec<u8>> {
    if challenge.len() != t {
        return Err(Error::InvalidParameter(format!(
            "challenge has {} entries, expected {}",
            challenge.len(),
            t
        )));
    }
    let mut tree = SeedTree::new(seed, salt, t)?;
    tree.hide_challenged(challenge);
    tree.to_path(seed_tree_path_bytes(t, w, seed.len()))
}

/// Recovers the revealed leaf seeds from a path; hidden leaves are `None`.
pub fn path_to_seed_tree(
    challenge: &[u8],
    path: &[u8],
    salt: &[u8],
    seed_len: usize,
) -> Result<Vec<Option<Vec<u8>>>> {
    Ok(SeedTree::from_path(challenge, path, salt, seed_len)?.leaves())
}
