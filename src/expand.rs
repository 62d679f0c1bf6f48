//! Cube expansion against the off-set.
//!
//! Each on-set cube is grown into a prime implicant by raising literals.
//! With an explicit off-set the choice is guided by a blocking matrix
//! (literals that keep the cube off the off-set) and a covering matrix
//! (literals whose raising would swallow other on-set cubes). Without an
//! off-set the containment check runs directly against the on-set plus
//! don't-cares after every raise.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::bitset::BitSet;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::irredundant::covers_cube;
use crate::mincov::min_cover;

/// Veto callback: a raise of the literal at the given index on the given
/// cube is only performed when it returns true.
pub(crate) type CanRaise<'a> = &'a dyn Fn(usize, &Cube) -> bool;

/// Expands every on-set cube, dropping cubes swallowed along the way.
/// Cubes already known to be prime are kept as they are.
pub(crate) fn expand(
    on_set: Vec<Cube>,
    dc_set: &[Cube],
    off_set: Option<&[Cube]>,
    primes: &HashSet<Cube>,
    can_raise: CanRaise,
) -> Vec<Cube> {
    if on_set.is_empty() {
        return on_set;
    }
    let mut on_set = on_set;
    on_set.sort_by_key(Cube::len);

    let first_len = on_set[0].len();
    let first_bits = on_set[0].bits().clone();
    loop {
        let mut cube = on_set[0].clone();
        if !primes.contains(&cube) {
            cube = match off_set {
                Some(off) => expand_one(cube, &on_set, off, can_raise),
                None => {
                    let cover: Cover = on_set.iter().chain(dc_set).cloned().collect();
                    expand_one_presto(cube, &on_set, &cover, can_raise)
                }
            };
        }
        on_set.retain(|o| !cube.covers(o));
        on_set.push(cube);

        if on_set[0].len() < first_len || *on_set[0].bits() == first_bits {
            debug!("expansion settled with {} cubes", on_set.len());
            return on_set;
        }
    }
}

/// Expands one cube using the off-set.
pub(crate) fn expand_one(mut cube: Cube, on_set: &[Cube], off_set: &[Cube], can_raise: CanRaise) -> Cube {
    let cube_inv = cube.bits().swap_polarity();
    // Blocking rows: per off cube, the raised literals that would let the
    // expansion reach it.
    let mut blocking: Vec<BitSet> = off_set
        .iter()
        .map(|c| cube_inv.and(c.bits()).indices().into_iter().collect())
        .filter(|b: &BitSet| !b.is_empty())
        .collect();
    // Covering rows: per on cube, the literals of this cube missing from
    // it; raising all of them swallows that cube.
    let mut covering: Vec<BitSet> = on_set
        .iter()
        .map(|c| {
            cube.bits()
                .and(&cube.bits().xor(c.bits()))
                .indices()
                .into_iter()
                .collect()
        })
        .filter(|c: &BitSet| !c.is_empty())
        .collect();

    let mut to_raise: BitSet = cube.literals().into_iter().collect();

    let mut count = vec![0u32; to_raise.iter().last().map_or(0, |m| m + 1)];
    for row in &covering {
        for i in row.iter() {
            count[i] += 1;
        }
    }

    while !covering.is_empty() && !blocking.is_empty() {
        // Essential raises: a blocking row down to a single literal pins
        // the opposite literal of the cube.
        let mut essential = BitSet::empty();
        for b in &blocking {
            if b.len() == 1 {
                if let Some(e) = b.first() {
                    essential.insert(e);
                }
            }
        }

        if !essential.is_empty() {
            for e in essential.iter() {
                to_raise.remove(e ^ 1);
                blocking.retain(|b| !b.contains(e));
                covering.retain(|c| !c.contains(e ^ 1));
            }
            let mut inessential = to_raise.clone();
            for b in &blocking {
                for i in b.iter() {
                    inessential.remove(i ^ 1);
                }
            }
            for i in inessential.iter() {
                to_raise.remove(i);
                cube = cube.raise(i);
                covering.retain_mut(|c| !(c.remove(i) && c.is_empty()));
            }
            if blocking.is_empty() || covering.is_empty() {
                break;
            }
        }

        // Feasible raises: finishing off a covering row swallows an
        // on-set cube in one step.
        let mut feasible = BitSet::empty();
        for c in &covering {
            if c.len() == 1 {
                if let Some(f) = c.first() {
                    feasible.insert(f);
                }
            }
        }

        if !feasible.is_empty() {
            let mut best = 0;
            let mut raise = None;
            for r in feasible.iter() {
                if count[r] > best && can_raise(r, &cube) {
                    best = count[r];
                    raise = Some(r);
                }
            }
            if let Some(r) = raise {
                to_raise.remove(r);
                cube = cube.raise(r);
                covering.retain_mut(|c| !(c.remove(r) && c.is_empty()));
                for b in blocking.iter_mut() {
                    b.remove(r ^ 1);
                }
                continue;
            }
        }

        let mut best = 0;
        let mut raise = None;
        for r in to_raise.iter() {
            if count[r] > best && can_raise(r, &cube) {
                best = count[r];
                raise = Some(r);
            }
        }
        let Some(r) = raise else {
            to_raise.clear();
            break;
        };

        to_raise.remove(r);
        cube = cube.raise(r);
        for c in covering.iter_mut() {
            c.remove(r);
        }
        for b in blocking.iter_mut() {
            b.remove(r ^ 1);
        }
    }

    if !blocking.is_empty() {
        // Keep a minimal lowered set: one literal per remaining blocking
        // row, everything else may still be raised.
        let keep_low = min_cover(&blocking);
        for m in keep_low.iter() {
            to_raise.remove(m ^ 1);
        }
    }

    for t in to_raise.iter() {
        if can_raise(t, &cube) {
            cube = cube.raise(t);
        }
    }

    cube
}

/// Expands one cube without an off-set, validating every raise with a
/// containment check against the full cover.
pub(crate) fn expand_one_presto(
    mut cube: Cube,
    on_set: &[Cube],
    cover: &Cover,
    can_raise: CanRaise,
) -> Cube {
    let mut covering: Vec<BitSet> = on_set
        .iter()
        .map(|c| {
            cube.bits()
                .and(&cube.bits().xor(c.bits()))
                .indices()
                .into_iter()
                .collect()
        })
        .filter(|c: &BitSet| !c.is_empty())
        .collect();

    let mut to_raise = cube.literals();

    let mut count = vec![0u32; to_raise.last().map_or(0, |m| m + 1)];
    for row in &covering {
        for i in row.iter() {
            count[i] += 1;
        }
    }

    while !to_raise.is_empty() {
        let mut feasible = BitSet::empty();
        for c in &covering {
            if c.len() == 1 {
                if let Some(f) = c.first() {
                    feasible.insert(f);
                }
            }
        }

        // Best candidates last: feasible raises first, then by covering
        // frequency; the inner loop pops from the back.
        to_raise.sort_by_key(|&r| (feasible.contains(r), count[r]));

        let mut cant_raise: VecDeque<usize> = VecDeque::new();
        while let Some(r) = to_raise.pop() {
            if !can_raise(r, &cube) {
                cant_raise.push_front(r);
                continue;
            }
            let raised = cube.raise(r);
            if !covers_cube(cover, &raised) {
                covering.retain(|c| !c.contains(r));
                to_raise.extend(cant_raise);
                break;
            }
            cube = raised;
            for c in covering.iter_mut() {
                c.remove(r);
            }
            covering.retain(|c| !c.is_empty());
            to_raise.extend(cant_raise.drain(..));
        }
    }

    cube
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn cube(indices: &[usize]) -> Cube {
        Cube::from_indices(indices.iter().copied())
    }

    fn always(_: usize, _: &Cube) -> bool {
        true
    }

    #[test]
    fn test_expand_one_against_off_set() {
        // On cube x0 x1, off-set !x0: x1 can be raised away, x0 cannot.
        let on = [cube(&[1, 3])];
        let off = [cube(&[0])];
        let res = expand_one(cube(&[1, 3]), &on, &off, &always);
        assert_eq!(res, cube(&[1]));
    }

    #[test]
    fn test_expand_one_fully_free() {
        // Empty off-set: everything can be raised.
        let res = expand_one(cube(&[1, 3]), &[cube(&[1, 3])], &[], &always);
        assert_eq!(res, Cube::universal());
    }

    #[test]
    fn test_expand_presto() {
        // x0 x1 + x0 !x1 covers x0: each cube expands to x0.
        let on = [cube(&[1, 3]), cube(&[1, 2])];
        let cover: Cover = on.iter().cloned().collect();
        let res = expand_one_presto(cube(&[1, 3]), &on, &cover, &always);
        assert_eq!(res, cube(&[1]));
    }

    #[test]
    fn test_expand_presto_blocked() {
        // A lone minterm cannot grow.
        let on = [cube(&[1, 3])];
        let cover: Cover = on.iter().cloned().collect();
        let res = expand_one_presto(cube(&[1, 3]), &on, &cover, &always);
        assert_eq!(res, cube(&[1, 3]));
    }

    #[test]
    fn test_expand_swallows_covered_cubes() {
        let on = vec![cube(&[1, 3]), cube(&[1, 2]), cube(&[1, 3, 5])];
        let primes = HashSet::new();
        let res = expand(on, &[], None, &primes, &always);
        assert_eq!(res, vec![cube(&[1])]);
    }

    #[test]
    fn test_expand_respects_veto() {
        // Forbid raising anything: cubes only lose duplicates.
        let never = |_: usize, _: &Cube| false;
        let on = vec![cube(&[1, 3]), cube(&[1, 2])];
        let primes = HashSet::new();
        let res = expand(on, &[], None, &primes, &never);
        assert_eq!(res.len(), 2);
        assert!(res.contains(&cube(&[1, 3])));
        assert!(res.contains(&cube(&[1, 2])));
    }

    #[test]
    fn test_expand_with_off_set() {
        // f = x0 x1 + x0 !x1 with off-set !x0.
        let on = vec![cube(&[1, 3]), cube(&[1, 2])];
        let off = [cube(&[0])];
        let primes = HashSet::new();
        let res = expand(on, &[], Some(&off), &primes, &always);
        assert_eq!(res, vec![cube(&[1])]);
    }
}
