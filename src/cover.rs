//! Cube lists with aggregate literal statistics.
//!
//! A cover keeps, alongside its cubes, the per-literal occurrence counts
//! and the support mask (the OR of all cube bit-patterns). The recursive
//! algorithms consult these aggregates on every step, so they are
//! maintained incrementally on push/pop/filter instead of being rebuilt.

use crate::bits::Bits;
use crate::cube::Cube;
use crate::types::MAX_LITERALS;

#[derive(Debug, Clone, Default)]
pub struct Cover {
    cubes: Vec<Cube>,
    bits: Bits,
    counts: Vec<u32>,
}

impl Cover {
    pub fn new() -> Self {
        Cover {
            cubes: Vec::new(),
            bits: Bits::zero(),
            counts: vec![0; MAX_LITERALS],
        }
    }

    /// The OR of all cube bit-patterns: the set of literals occurring in
    /// at least one cube.
    pub fn bits(&self) -> &Bits {
        &self.bits
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Number of cubes containing the literal at `index`.
    pub fn count(&self, index: usize) -> u32 {
        self.counts[index]
    }

    pub fn push(&mut self, cube: Cube) {
        self.add_stats(&cube);
        self.cubes.push(cube);
    }

    /// Inserts at the front; used where processing order matters.
    pub fn push_front(&mut self, cube: Cube) {
        self.add_stats(&cube);
        self.cubes.insert(0, cube);
    }

    pub fn pop(&mut self) -> Option<Cube> {
        let cube = self.cubes.pop()?;
        self.remove_stats(&cube);
        debug_assert!(self.check_consistency());
        Some(cube)
    }

    /// Keeps only the cubes matching the predicate, updating the
    /// aggregates for every dropped cube.
    pub fn filter(mut self, mut keep: impl FnMut(&Cube) -> bool) -> Cover {
        let mut kept = Vec::with_capacity(self.cubes.len());
        for cube in std::mem::take(&mut self.cubes) {
            if keep(&cube) {
                kept.push(cube);
            } else {
                self.remove_stats(&cube);
            }
        }
        self.cubes = kept;
        debug_assert!(self.check_consistency());
        self
    }

    fn add_stats(&mut self, cube: &Cube) {
        for i in cube.literals() {
            if self.counts[i] == 0 {
                self.bits = self.bits.or(&Bits::index(i));
            }
            self.counts[i] += 1;
        }
    }

    // The consistency check belongs to the callers: `filter` detaches the
    // cube list while it updates the aggregates, so the cover is only
    // whole again once the kept cubes are back in place.
    fn remove_stats(&mut self, cube: &Cube) {
        for i in cube.literals() {
            self.counts[i] -= 1;
            if self.counts[i] == 0 {
                self.bits = self.bits.xor(&Bits::index(i));
            }
        }
    }

    #[cfg(debug_assertions)]
    fn check_consistency(&self) -> bool {
        let mut bits = Bits::zero();
        for cube in &self.cubes {
            bits = bits.or(cube.bits());
        }
        bits == self.bits
    }

    #[cfg(not(debug_assertions))]
    fn check_consistency(&self) -> bool {
        true
    }
}

impl FromIterator<Cube> for Cover {
    fn from_iter<T: IntoIterator<Item = Cube>>(iter: T) -> Self {
        let mut cover = Cover::new();
        for cube in iter {
            cover.push(cube);
        }
        cover
    }
}
