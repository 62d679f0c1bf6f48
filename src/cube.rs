//! Immutable product terms.
//!
//! A cube is one product of literals, packed two bits per variable into a
//! [`Bits`] vector. Cubes are never mutated after construction: raising a
//! literal returns a new cube, and cubes are freely shared across covers.
//!
//! The cached 32-bit hash is the XOR fold of one-hot literal positions
//! reduced mod 32. It is not collision free; it serves as a fast
//! inequality pre-check before the full bit-pattern comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::bits::Bits;
use crate::error::Error;
use crate::types::{Lit, MAX_VARS};

#[derive(Debug, Clone)]
pub struct Cube {
    bits: Bits,
    len: u16,
    hash: u32,
}

impl Cube {
    /// The universal cube: no literals, covers everything.
    pub fn universal() -> Self {
        Cube {
            bits: Bits::zero(),
            len: 0,
            hash: 0,
        }
    }

    /// Builds a cube from typed literals.
    pub fn from_lits(lits: impl IntoIterator<Item = Lit>) -> Self {
        Self::from_indices(lits.into_iter().map(Lit::index))
    }

    /// Builds a cube from raw literal indices. Indices must be below the
    /// literal capacity (checked by `Bits::index` in debug builds).
    pub(crate) fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = Bits::zero();
        let mut len = 0u16;
        let mut hash = 0u32;
        for i in indices {
            let bit = Bits::index(i);
            if bits.and(&bit).is_zero() {
                len += 1;
                hash ^= 1u32.wrapping_shl(i as u32);
                bits = bits.or(&bit);
            }
        }
        Cube { bits, len, hash }
    }

    /// Reconstructs a cube from a packed bit-vector, recomputing the
    /// cached literal count and hash.
    pub fn from_bits(bits: Bits) -> Self {
        let len = bits.count() as u16;
        let hash = bits.fold_hash();
        Cube { bits, len, hash }
    }

    pub fn bits(&self) -> &Bits {
        &self.bits
    }

    /// Number of literals in this cube.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the universal cube.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The structural hash.
    pub fn hash32(&self) -> u32 {
        self.hash
    }

    /// True if the literal at `index` is present.
    pub fn contains(&self, index: usize) -> bool {
        self.bits.bit(index)
    }

    /// The literal indices of this cube, ascending.
    pub fn literals(&self) -> Vec<usize> {
        self.bits.indices()
    }

    /// The typed literals of this cube, ascending.
    pub fn lits(&self) -> Vec<Lit> {
        self.literals().into_iter().map(Lit::from_index).collect()
    }

    /// Removes the literal at `index`, generalizing the cube. Returns a
    /// clone if the literal is absent.
    pub fn raise(&self, index: usize) -> Cube {
        if !self.contains(index) {
            return self.clone();
        }
        Cube {
            bits: self.bits.xor(&Bits::index(index)),
            len: self.len - 1,
            hash: self.hash ^ 1u32.wrapping_shl(index as u32),
        }
    }

    /// True if this cube covers `other`: it has no more literals and its
    /// bit pattern is a sub-pattern of `other`'s.
    pub fn covers(&self, other: &Cube) -> bool {
        self.len <= other.len && self.bits.and(&other.bits) == self.bits
    }
}

impl PartialEq for Cube {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bits == other.bits
    }
}

impl Eq for Cube {}

impl Hash for Cube {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl FromStr for Cube {
    type Err = Error;

    /// Parses the positional cube format: one character per variable,
    /// `0` = negative literal, `1` = positive literal, `-` = absent.
    /// The `/` marker rendered by [`fmt::Display`] for both-bits-set
    /// accumulator dumps is not a legal input cube.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut indices = Vec::new();
        let mut vars = 0usize;
        for (pos, ch) in s.chars().enumerate() {
            vars = pos + 1;
            match ch {
                '-' => {}
                '0' => indices.push(2 * pos),
                '1' => indices.push(2 * pos + 1),
                other => return Err(Error::InvalidCubeChar(other)),
            }
        }
        if vars > MAX_VARS {
            return Err(Error::TooManyVariables(vars));
        }
        Ok(Cube::from_indices(indices))
    }
}

impl fmt::Display for Cube {
    /// Renders the positional format up to the highest present variable.
    /// Variable pairs with both bits set render as `/` (only produced by
    /// accumulator dumps, never by well-formed cubes).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .literals()
            .last()
            .map_or(0, |&last| last / 2 + 1);
        for v in 0..width {
            let c = match (self.contains(2 * v), self.contains(2 * v + 1)) {
                (false, false) => '-',
                (true, false) => '0',
                (false, true) => '1',
                (true, true) => '/',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(indices: &[usize]) -> Cube {
        Cube::from_indices(indices.iter().copied())
    }

    #[test]
    fn test_parse_display_round_trip() {
        for s in ["01-", "1", "-0", "10-1", ""] {
            let c: Cube = s.parse().unwrap();
            let trimmed = s.trim_end_matches('-');
            assert_eq!(c.to_string(), trimmed);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("0x1".parse::<Cube>(), Err(Error::InvalidCubeChar('x')));
        assert_eq!("/".parse::<Cube>(), Err(Error::InvalidCubeChar('/')));
        let wide = "-".repeat(MAX_VARS + 1);
        assert_eq!(
            wide.parse::<Cube>(),
            Err(Error::TooManyVariables(MAX_VARS + 1))
        );
    }

    #[test]
    fn test_raise() {
        let c = cube(&[1, 2]);
        let r = c.raise(2);
        assert_eq!(r, cube(&[1]));
        assert_eq!(r.len(), 1);
        assert!(!r.contains(2));
        // Raising an absent literal is a no-op.
        assert_eq!(c.raise(7), c);
        // The original is untouched.
        assert!(c.contains(2));
    }

    #[test]
    fn test_covers() {
        let general = cube(&[1]);
        let specific = cube(&[1, 2]);
        assert!(general.covers(&specific));
        assert!(general.covers(&general));
        assert!(!specific.covers(&general));
        assert!(Cube::universal().covers(&specific));
        assert!(!cube(&[3]).covers(&specific));
    }

    #[test]
    fn test_hash_matches_from_bits() {
        let a = cube(&[1, 40, 100]);
        let b = Cube::from_bits(a.bits().clone());
        assert_eq!(a, b);
        assert_eq!(a.hash32(), b.hash32());
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_raise_hash_consistent() {
        let a = cube(&[1, 40, 100]);
        let r = a.raise(40);
        assert_eq!(r.hash32(), Cube::from_bits(r.bits().clone()).hash32());
    }
}
