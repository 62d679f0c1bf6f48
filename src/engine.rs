//! Shared machinery of the unate-recursive algorithms.
//!
//! Satisfiability, tautology, complementation and solution enumeration all
//! walk the same recursion: propagate unit cubes to a fixed point, scan
//! the free variables for unate columns and the most binate split
//! variable, try to split the cover into variable-disjoint components,
//! then branch on the split variable. The pieces that are identical across
//! the four algorithms live here.

use crate::bits::Bits;
use crate::bitset::BitSet;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::types::MAX_LITERALS;

/// Result of unit propagation.
pub(crate) struct Propagation {
    pub cover: Cover,
    /// A cube ran out of free literals while not being dropped: the
    /// current branch is decided (unsatisfiable clause, or tautological
    /// product, depending on how the caller reads the cover).
    pub absorbed: bool,
}

/// Runs unit propagation to a fixed point.
///
/// Cubes intersecting `lit` are dropped. A cube with exactly one literal
/// left in `free` forces that literal: it is merged into `lit` and the
/// literal of opposite polarity leaves `free`. The opposite-polarity
/// update is a blind XOR, so it can toggle a bit into `free` that was
/// never there; callers re-mask `free` against the cover support before
/// reading it, which makes the stray bit unobservable.
pub(crate) fn propagate(mut cover: Cover, lit: &mut Bits, free: &mut Bits) -> Propagation {
    loop {
        let mut repeat = false;
        let mut absorbed = false;
        cover = cover.filter(|c| {
            if !lit.and(c.bits()).is_zero() {
                return false;
            }
            let diff = c.bits().and(free);
            let pc = diff.count_at_most(2);
            if pc == 1 {
                repeat = true;
                *lit = lit.or(&diff);
                if Bits::even_mask().and(&diff).is_zero() {
                    *free = free.xor(&diff.shr(1));
                } else {
                    *free = free.xor(&diff.shl(1));
                }
                return false;
            }
            if pc == 0 {
                absorbed = true;
            }
            true
        });
        if absorbed {
            return Propagation {
                cover,
                absorbed: true,
            };
        }
        if !repeat {
            return Propagation {
                cover,
                absorbed: false,
            };
        }
    }
}

/// Result of the pivot-tracking propagation used by the unate recursions.
pub(crate) struct UnatePropagation {
    pub cover: Cover,
    /// Free-literal pattern of the kept cube with the fewest free
    /// literals; the unate recursions pick their split literal from it.
    pub pivot: Bits,
    pub absorbed: bool,
}

/// Unit propagation for unate covers. Forcing a literal does not touch
/// `free` (no opposite polarity exists), and the smallest free-literal
/// diff among the kept cubes is tracked as the split pivot.
pub(crate) fn propagate_unate(mut cover: Cover, lit: &mut Bits, free: &Bits) -> UnatePropagation {
    loop {
        let mut repeat = false;
        let mut absorbed = false;
        let mut pivot = Bits::zero();
        let mut pivot_size = MAX_LITERALS as u32;
        cover = cover.filter(|c| {
            if !lit.and(c.bits()).is_zero() {
                return false;
            }
            let diff = c.bits().and(free);
            let pc = diff.count_at_most(pivot_size);
            if pc == 1 {
                repeat = true;
                *lit = lit.or(&diff);
                return false;
            }
            if pc < pivot_size {
                pivot_size = pc;
                pivot = diff;
            }
            if pc == 0 {
                absorbed = true;
            }
            true
        });
        if absorbed {
            return UnatePropagation {
                cover,
                pivot,
                absorbed: true,
            };
        }
        if !repeat {
            return UnatePropagation {
                cover,
                pivot,
                absorbed: false,
            };
        }
    }
}

/// The free-variable mask at the top of a recursion: all support literals
/// not already decided by `lit` in either polarity.
pub(crate) fn default_free(cover: &Cover, lit: &Bits) -> Bits {
    cover.bits().and(&lit.or(&lit.swap_polarity()).not())
}

/// Tracks the most binate variable during the free-variable scan: largest
/// total occurrence count, ties broken by the larger minority count.
pub(crate) struct BinatePick {
    pub var: Option<usize>,
    total: u32,
    min: u32,
}

impl BinatePick {
    pub fn new() -> Self {
        BinatePick {
            var: None,
            total: 0,
            min: 0,
        }
    }

    /// Offers a variable seen in both polarities. `var` is the even
    /// (negative-literal) index.
    pub fn offer(&mut self, var: usize, count0: u32, count1: u32) {
        let total = count0 + count1;
        if total >= self.total {
            let min = count0.min(count1);
            if total > self.total || min > self.min {
                self.var = Some(var);
                self.total = total;
                self.min = min;
            }
        }
    }
}

/// Partitions the cubes into groups sharing no variable from `cols`
/// (even indices). Returns `None` when everything is connected.
pub(crate) fn split_components(cubes: &[Cube], cols: &[usize]) -> Option<Vec<Vec<Cube>>> {
    let mut groups: Vec<BitSet> = Vec::new();
    for &v in cols {
        let members: BitSet = cubes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.contains(v) || c.contains(v + 1))
            .map(|(i, _)| i)
            .collect();
        if !members.is_empty() {
            groups.push(members);
        }
    }
    if groups.len() <= 1 {
        return None;
    }

    // Merge every pair of groups sharing a cube.
    let mut live = groups.len();
    let mut removed = vec![false; groups.len()];
    for j in 0..cubes.len() {
        let mut prev: Option<usize> = None;
        for gi in 0..groups.len() {
            if removed[gi] || !groups[gi].contains(j) {
                continue;
            }
            match prev {
                None => prev = Some(gi),
                Some(p) => {
                    let merged = std::mem::take(&mut groups[gi]);
                    groups[p].union_with(&merged);
                    removed[gi] = true;
                    live -= 1;
                    if live == 1 {
                        return None;
                    }
                }
            }
        }
    }

    Some(
        groups
            .iter()
            .zip(&removed)
            .filter(|(_, &r)| !r)
            .map(|(g, _)| g.iter().map(|i| cubes[i].clone()).collect())
            .collect(),
    )
}

/// Merges results of the two Shannon branches on `var`: a pair of cubes
/// differing only in the branch variable's polarity collapses into their
/// intersection on the left side, and the right-side partner is dropped.
/// Returns the filtered right-side results.
pub(crate) fn merge_adjacent(res1: &mut [Cube], res2: Vec<Cube>, var: usize) -> Vec<Cube> {
    let hash_mask = 3u32.wrapping_shl(var as u32);
    let pair = Bits::index(var).or(&Bits::index(var + 1));
    let mut removed = vec![false; res2.len()];
    for r1 in res1.iter_mut() {
        let h = r1.hash32() ^ hash_mask;
        for (j, r2) in res2.iter().enumerate() {
            if r2.hash32() == h && r1.bits().xor(r2.bits()) == pair {
                *r1 = Cube::from_bits(r1.bits().and(r2.bits()));
                removed[j] = true;
                break;
            }
        }
    }
    res2.into_iter()
        .zip(removed)
        .filter(|(_, r)| !r)
        .map(|(c, _)| c)
        .collect()
}

/// Pairwise OR of two component results; the disjunction distributes over
/// the variable-disjoint parts.
pub(crate) fn cross_products(res1: &[Cube], res2: &[Cube]) -> Vec<Cube> {
    let mut res = Vec::with_capacity(res1.len() * res2.len());
    for r1 in res1 {
        for r2 in res2 {
            res.push(Cube::from_bits(r1.bits().or(r2.bits())));
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(indices: &[usize]) -> Cube {
        Cube::from_indices(indices.iter().copied())
    }

    #[test]
    fn test_propagate_forces_units() {
        // Unit cube [3] forces x1; the cube [2, 5] then loses literal 2.
        let cover: Cover = [cube(&[3]), cube(&[2, 5])].into_iter().collect();
        let mut lit = Bits::zero();
        let mut free = default_free(&cover, &lit);
        let p = propagate(cover, &mut lit, &mut free);
        assert!(!p.absorbed);
        // [3] forced, then [2, 5] reduced to a unit on 5 and forced too.
        assert!(p.cover.is_empty());
        assert!(lit.bit(3));
        assert!(lit.bit(5));
    }

    #[test]
    fn test_propagate_absorbs() {
        // Forcing x1 via [3] leaves [2] with no free literal.
        let cover: Cover = [cube(&[3]), cube(&[2])].into_iter().collect();
        let mut lit = Bits::zero();
        let mut free = default_free(&cover, &lit);
        let p = propagate(cover, &mut lit, &mut free);
        assert!(p.absorbed);
    }

    #[test]
    fn test_binate_pick_tie_break() {
        let mut pick = BinatePick::new();
        pick.offer(0, 3, 1);
        pick.offer(2, 1, 3);
        // Same total, same min: the earlier pick stands.
        assert_eq!(pick.var, Some(0));
        pick.offer(4, 2, 2);
        // Same total, larger minority count wins.
        assert_eq!(pick.var, Some(4));
        pick.offer(6, 4, 1);
        // Larger total wins outright.
        assert_eq!(pick.var, Some(6));
    }

    #[test]
    fn test_split_components() {
        let cubes = [cube(&[0, 5]), cube(&[4, 1]), cube(&[8, 11])];
        let parts = split_components(&cubes, &[0, 4, 8, 10]).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1], vec![cube(&[8, 11])]);

        // Chained support is a single component.
        let chained = [cube(&[0, 5]), cube(&[4, 9]), cube(&[8, 1])];
        assert!(split_components(&chained, &[0, 4, 8]).is_none());
    }

    #[test]
    fn test_merge_adjacent() {
        // x0 * x1  and  !x0 * x1  merge into  x1.
        let mut res1 = vec![cube(&[1, 3])];
        let res2 = vec![cube(&[0, 3]), cube(&[0, 5])];
        let rest = merge_adjacent(&mut res1, res2, 0);
        assert_eq!(res1, vec![cube(&[3])]);
        assert_eq!(rest, vec![cube(&[0, 5])]);
    }
}
