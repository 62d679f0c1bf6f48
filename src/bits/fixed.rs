//! Fixed-width bit-vector backend.
//!
//! Eight machine words cover the full literal capacity. All operations are
//! total; shifts truncate at the capacity boundary, which matches the
//! arbitrary-precision backend because every consumer re-masks against a
//! capacity-bounded value before probing bits.

use crate::types::MAX_LITERALS;

const WORDS: usize = MAX_LITERALS / 64;
const EVEN: u64 = 0x5555_5555_5555_5555;

/// An immutable bit vector of `MAX_LITERALS` bits.
///
/// Every operation returns a new value; two bits per variable encode the
/// presence of its negative (`2i`) and positive (`2i + 1`) literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bits {
    words: [u64; WORDS],
}

impl Bits {
    /// The all-zero vector.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A vector with the single bit `index` set.
    pub fn index(index: usize) -> Self {
        debug_assert!(index < MAX_LITERALS);
        let mut words = [0u64; WORDS];
        words[index / 64] = 1u64 << (index % 64);
        Bits { words }
    }

    /// A vector with the low `n` bits set. Saturates at the capacity.
    pub fn low_mask(n: usize) -> Self {
        let n = n.min(MAX_LITERALS);
        let mut words = [0u64; WORDS];
        for (i, w) in words.iter_mut().enumerate() {
            let lo = i * 64;
            if n >= lo + 64 {
                *w = u64::MAX;
            } else if n > lo {
                *w = (1u64 << (n - lo)) - 1;
            }
        }
        Bits { words }
    }

    /// The mask of all even (negative-literal) positions.
    pub fn even_mask() -> Self {
        Bits {
            words: [EVEN; WORDS],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Probes the bit at `index`.
    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < MAX_LITERALS);
        self.words[index / 64] >> (index % 64) & 1 == 1
    }

    pub fn and(&self, other: &Bits) -> Bits {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w &= o;
        }
        Bits { words }
    }

    pub fn or(&self, other: &Bits) -> Bits {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w |= o;
        }
        Bits { words }
    }

    pub fn xor(&self, other: &Bits) -> Bits {
        let mut words = self.words;
        for (w, o) in words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
        Bits { words }
    }

    /// Capacity-bounded complement.
    pub fn not(&self) -> Bits {
        let mut words = self.words;
        for w in words.iter_mut() {
            *w = !*w;
        }
        Bits { words }
    }

    /// Logical left shift, truncating at the capacity.
    pub fn shl(&self, n: usize) -> Bits {
        if n >= MAX_LITERALS {
            return Bits::zero();
        }
        let (ws, bs) = (n / 64, n % 64);
        let mut words = [0u64; WORDS];
        for i in (ws..WORDS).rev() {
            let mut w = self.words[i - ws] << bs;
            if bs > 0 && i > ws {
                w |= self.words[i - ws - 1] >> (64 - bs);
            }
            words[i] = w;
        }
        Bits { words }
    }

    /// Logical right shift.
    pub fn shr(&self, n: usize) -> Bits {
        if n >= MAX_LITERALS {
            return Bits::zero();
        }
        let (ws, bs) = (n / 64, n % 64);
        let mut words = [0u64; WORDS];
        for i in 0..WORDS - ws {
            let mut w = self.words[i + ws] >> bs;
            if bs > 0 && i + ws + 1 < WORDS {
                w |= self.words[i + ws + 1] << (64 - bs);
            }
            words[i] = w;
        }
        Bits { words }
    }

    /// Number of set bits.
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of set bits, capped at `max`. Cheap "exactly zero or one
    /// bit" probe when called with a small cap.
    pub fn count_at_most(&self, max: u32) -> u32 {
        let mut c = 0;
        for w in &self.words {
            c += w.count_ones();
            if c >= max {
                return max;
            }
        }
        c
    }

    /// XOR fold of the 32-bit windows; a structural hash matching the
    /// per-literal fold `1 << (index % 32)`.
    pub fn fold_hash(&self) -> u32 {
        self.words
            .iter()
            .fold(0u32, |h, &w| h ^ w as u32 ^ (w >> 32) as u32)
    }

    /// Swaps each variable's two literal bits: the literal-wise complement.
    pub fn swap_polarity(&self) -> Bits {
        let mut words = self.words;
        for w in words.iter_mut() {
            *w = ((*w & EVEN) << 1) | ((*w >> 1) & EVEN);
        }
        Bits { words }
    }

    /// Decodes the positions of all set bits, ascending.
    pub fn indices(&self) -> Vec<usize> {
        let mut res = Vec::new();
        for (i, &word) in self.words.iter().enumerate() {
            let mut w = word;
            while w != 0 {
                res.push(i * 64 + w.trailing_zeros() as usize);
                w &= w - 1;
            }
        }
        res
    }

    /// Decodes the negative-literal position of every variable with at
    /// least one literal bit set, ascending. Each variable pair is folded
    /// onto its even index.
    pub fn var_indices(&self) -> Vec<usize> {
        let mut res = Vec::new();
        for (i, &word) in self.words.iter().enumerate() {
            let mut w = (word & EVEN) | ((word >> 1) & EVEN);
            while w != 0 {
                res.push(i * 64 + w.trailing_zeros() as usize);
                w &= w - 1;
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_and_probe() {
        let b = Bits::index(70);
        assert!(b.bit(70));
        assert!(!b.bit(69));
        assert_eq!(b.indices(), vec![70]);
        assert!(!b.is_zero());
        assert!(Bits::zero().is_zero());
    }

    #[test]
    fn test_shift_round_trip() {
        let b = Bits::index(70);
        assert_eq!(b.shl(3), Bits::index(73));
        assert_eq!(b.shr(7), Bits::index(63));
        assert!(Bits::index(511).shl(1).is_zero());
        assert!(Bits::index(0).shr(1).is_zero());
    }

    #[test]
    fn test_boolean_ops() {
        let a = Bits::index(3).or(&Bits::index(100));
        let b = Bits::index(100).or(&Bits::index(200));
        assert_eq!(a.and(&b).indices(), vec![100]);
        assert_eq!(a.or(&b).indices(), vec![3, 100, 200]);
        assert_eq!(a.xor(&b).indices(), vec![3, 200]);
        assert_eq!(a.not().and(&a), Bits::zero());
    }

    #[test]
    fn test_counts() {
        let b = Bits::index(1).or(&Bits::index(64)).or(&Bits::index(500));
        assert_eq!(b.count(), 3);
        assert_eq!(b.count_at_most(2), 2);
        assert_eq!(b.count_at_most(10), 3);
        assert_eq!(Bits::zero().count_at_most(2), 0);
    }

    #[test]
    fn test_swap_polarity() {
        let b = Bits::index(4).or(&Bits::index(7));
        assert_eq!(b.swap_polarity().indices(), vec![5, 6]);
    }

    #[test]
    fn test_var_indices() {
        let b = Bits::index(2).or(&Bits::index(3)).or(&Bits::index(65));
        assert_eq!(b.var_indices(), vec![2, 64]);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(Bits::low_mask(0), Bits::zero());
        assert_eq!(Bits::low_mask(3).indices(), vec![0, 1, 2]);
        assert_eq!(Bits::low_mask(600).count(), MAX_LITERALS as u32);
    }
}
