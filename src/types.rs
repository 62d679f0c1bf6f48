//! Type-safe literal indices and capacity constants.
//!
//! Variable `v` owns two adjacent literal positions: `2v` for the negative
//! literal and `2v + 1` for the positive one. A term never carries both
//! positions of the same variable; the variable is simply absent instead.

use std::fmt;

/// Total number of literal positions supported by the packed bit-vector
/// representation. Two positions per variable.
pub const MAX_LITERALS: usize = 512;

/// Maximum number of variables.
pub const MAX_VARS: usize = MAX_LITERALS / 2;

/// A literal: a variable or its negation, identified by its packed index.
///
/// # Invariants
///
/// - The index is `< MAX_LITERALS`; constructors assert this.
/// - Even indices are negative literals, odd indices positive ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(u16);

impl Lit {
    /// Creates the positive literal of variable `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var >= MAX_VARS`.
    pub fn positive(var: usize) -> Self {
        Self::from_index(2 * var + 1)
    }

    /// Creates the negative literal of variable `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var >= MAX_VARS`.
    pub fn negative(var: usize) -> Self {
        Self::from_index(2 * var)
    }

    /// Creates a literal from its packed index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= MAX_LITERALS`.
    pub fn from_index(index: usize) -> Self {
        assert!(
            index < MAX_LITERALS,
            "Literal index {} exceeds the capacity of {} literals",
            index,
            MAX_LITERALS
        );
        Lit(index as u16)
    }

    /// Returns the packed literal index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the variable this literal belongs to.
    pub fn var(self) -> usize {
        self.index() / 2
    }

    /// Returns true for positive (odd-index) literals.
    pub fn is_positive(self) -> bool {
        self.0 & 1 == 1
    }

    /// Returns the opposite literal of the same variable.
    pub fn negated(self) -> Self {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "x{}", self.var())
        } else {
            write!(f, "!x{}", self.var())
        }
    }
}

impl From<Lit> for usize {
    fn from(lit: Lit) -> Self {
        lit.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_encoding() {
        let neg = Lit::negative(3);
        let pos = Lit::positive(3);
        assert_eq!(neg.index(), 6);
        assert_eq!(pos.index(), 7);
        assert_eq!(neg.var(), 3);
        assert_eq!(pos.var(), 3);
        assert!(pos.is_positive());
        assert!(!neg.is_positive());
        assert_eq!(neg.negated(), pos);
        assert_eq!(pos.negated(), neg);
    }

    #[test]
    fn test_lit_display() {
        assert_eq!(Lit::positive(0).to_string(), "x0");
        assert_eq!(Lit::negative(2).to_string(), "!x2");
    }

    #[test]
    #[should_panic(expected = "exceeds the capacity")]
    fn test_lit_capacity_panics() {
        Lit::from_index(MAX_LITERALS);
    }
}
