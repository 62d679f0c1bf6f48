//! Arbitrary-precision bit-vector backend on top of `num_bigint::BigUint`.
//!
//! Behaviorally identical to the fixed-width backend: complement and left
//! shift are truncated to the literal capacity so both backends agree bit
//! for bit on every operation.

use std::sync::OnceLock;

use num_bigint::BigUint;

use crate::types::MAX_LITERALS;

const EVEN_DIGIT: u32 = 0x5555_5555;

fn full_mask() -> &'static BigUint {
    static MASK: OnceLock<BigUint> = OnceLock::new();
    MASK.get_or_init(|| BigUint::new(vec![u32::MAX; MAX_LITERALS / 32]))
}

fn even_mask_value() -> &'static BigUint {
    static MASK: OnceLock<BigUint> = OnceLock::new();
    MASK.get_or_init(|| BigUint::new(vec![EVEN_DIGIT; MAX_LITERALS / 32]))
}

/// An immutable bit vector of `MAX_LITERALS` bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bits {
    value: BigUint,
}

impl Bits {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn index(index: usize) -> Self {
        debug_assert!(index < MAX_LITERALS);
        Bits {
            value: BigUint::from(1u32) << index,
        }
    }

    pub fn low_mask(n: usize) -> Self {
        let n = n.min(MAX_LITERALS);
        Bits {
            value: (BigUint::from(1u32) << n) - 1u32,
        }
    }

    pub fn even_mask() -> Self {
        Bits {
            value: even_mask_value().clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == BigUint::ZERO
    }

    pub fn bit(&self, index: usize) -> bool {
        debug_assert!(index < MAX_LITERALS);
        self.value.bit(index as u64)
    }

    pub fn and(&self, other: &Bits) -> Bits {
        Bits {
            value: &self.value & &other.value,
        }
    }

    pub fn or(&self, other: &Bits) -> Bits {
        Bits {
            value: &self.value | &other.value,
        }
    }

    pub fn xor(&self, other: &Bits) -> Bits {
        Bits {
            value: &self.value ^ &other.value,
        }
    }

    /// Capacity-bounded complement.
    pub fn not(&self) -> Bits {
        Bits {
            value: &self.value ^ full_mask(),
        }
    }

    /// Logical left shift, truncating at the capacity.
    pub fn shl(&self, n: usize) -> Bits {
        Bits {
            value: (&self.value << n) & full_mask(),
        }
    }

    pub fn shr(&self, n: usize) -> Bits {
        Bits {
            value: &self.value >> n,
        }
    }

    pub fn count(&self) -> u32 {
        self.value.count_ones() as u32
    }

    pub fn count_at_most(&self, max: u32) -> u32 {
        let mut c = 0;
        for digit in self.value.iter_u32_digits() {
            c += digit.count_ones();
            if c >= max {
                return max;
            }
        }
        c
    }

    pub fn fold_hash(&self) -> u32 {
        self.value.iter_u32_digits().fold(0u32, |h, d| h ^ d)
    }

    pub fn swap_polarity(&self) -> Bits {
        let even = even_mask_value();
        Bits {
            value: ((&self.value & even) << 1u8) | ((&self.value >> 1u8) & even),
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        let mut res = Vec::new();
        for (i, digit) in self.value.iter_u32_digits().enumerate() {
            let mut w = digit;
            while w != 0 {
                res.push(i * 32 + w.trailing_zeros() as usize);
                w &= w - 1;
            }
        }
        res
    }

    pub fn var_indices(&self) -> Vec<usize> {
        let mut res = Vec::new();
        for (i, digit) in self.value.iter_u32_digits().enumerate() {
            let mut w = (digit & EVEN_DIGIT) | ((digit >> 1) & EVEN_DIGIT);
            while w != 0 {
                res.push(i * 32 + w.trailing_zeros() as usize);
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
    }

    #[test]
    fn test_capacity_truncation() {
        assert!(Bits::index(511).shl(1).is_zero());
        assert_eq!(Bits::low_mask(600).count(), MAX_LITERALS as u32);
        assert_eq!(Bits::zero().not().count(), MAX_LITERALS as u32);
    }

    #[test]
    fn test_swap_polarity() {
        let b = Bits::index(4).or(&Bits::index(7));
        assert_eq!(b.swap_polarity().indices(), vec![5, 6]);
    }
}
