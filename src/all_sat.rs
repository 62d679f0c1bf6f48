//! Enumeration of all satisfying assignments of a clause cover.
//!
//! The input is read as a product of sums like [`crate::sat`], and the
//! output is a sum of products covering exactly the satisfying
//! assignments, projected onto the variables selected by `mask`.
//! Variables outside the mask are auxiliary: they are decided during the
//! search but never reported, and branch results differing only in an
//! auxiliary decision are deduplicated instead of merged.

use crate::bits::Bits;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::engine::{
    cross_products, merge_adjacent, propagate, propagate_unate, split_components, BinatePick,
};

/// Enumerates cubes of satisfying assignments, reporting only literals
/// inside `mask`.
pub fn all_sat_cover(cover: Cover, mask: Bits) -> Vec<Cube> {
    let aux = cover.bits().and(&mask.not());
    let free = cover.bits().clone();
    all_sat_rec(cover, &mask, Bits::zero(), &aux, free)
}

fn all_sat_rec(cover: Cover, mask: &Bits, mut lit: Bits, aux: &Bits, mut free: Bits) -> Vec<Cube> {
    let p = propagate(cover, &mut lit, &mut free);
    if p.absorbed {
        return Vec::new();
    }
    let mut cover = p.cover;

    if cover.is_empty() {
        return vec![Cube::from_bits(mask.and(&lit))];
    }

    free = cover.bits().and(&free);
    let mut res = Vec::new();

    if cover.len() == 1 {
        let l = mask.and(&lit);
        if !free.and(&mask.not()).is_zero() {
            // An auxiliary literal can discharge the last clause, leaving
            // every reported variable unconstrained: the branch projects
            // to the decided literals alone.
            res.push(Cube::from_bits(l));
            return res;
        }
        for f in free.indices() {
            res.push(Cube::from_bits(l.or(&Bits::index(f))));
        }
        return res;
    }

    let mut pick = BinatePick::new();
    let mut sparseness = 0;
    let mut cols = Vec::new();
    let free_vars = free.var_indices();
    for f in free_vars.iter().copied() {
        let count0 = cover.count(f);
        let count1 = cover.count(f + 1);
        let count = count0 + count1;
        if count == 0 {
            // The variable only occurred in clauses an earlier auxiliary
            // elimination discharged.
            continue;
        }
        if count0 > 0 && count1 > 0 {
            pick.offer(f, count0, count1);
            cols.push(f);
        } else if aux.bit(f) {
            // Unate auxiliary literal: setting it true discharges its
            // clauses without constraining anything reported.
            let present = if count0 > 0 { f } else { f + 1 };
            cover = cover.filter(|c| !c.contains(present));
            free = free.xor(&Bits::index(present));
        } else if count as usize == cover.len() {
            let present = if count0 > 0 { f } else { f + 1 };
            res.push(Cube::from_bits(mask.and(&lit.or(&Bits::index(present)))));
            free = free.xor(&Bits::index(present));
        } else {
            cols.push(f);
        }
        sparseness = sparseness.max(count);
    }

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(mut parts) = split_components(cover.cubes(), &cols) {
            let last = parts.pop().unwrap_or_default();
            let mut res1 = all_sat_rec(
                last.into_iter().collect(),
                mask,
                lit.clone(),
                aux,
                free.clone(),
            );
            for part in parts {
                if res1.is_empty() {
                    return res;
                }
                let res2 = all_sat_rec(
                    part.into_iter().collect(),
                    mask,
                    lit.clone(),
                    aux,
                    free.clone(),
                );
                res1 = cross_products(&res1, &res2);
            }
            res.extend(res1);
            return res;
        }
    }

    let binate = match pick.var {
        None => {
            all_sat_unate(cover, &mut res, mask, lit, free);
            return res;
        }
        Some(v) => v,
    };

    let mut res1 = all_sat_rec(
        cover.clone(),
        mask,
        lit.or(&Bits::index(binate)),
        aux,
        free.xor(&Bits::index(binate + 1)),
    );
    let res2 = all_sat_rec(
        cover,
        mask,
        lit.or(&Bits::index(binate + 1)),
        aux,
        free.xor(&Bits::index(binate)),
    );

    let res2 = if aux.bit(binate) {
        // Both branches of an auxiliary split project onto the same
        // reported literals; drop right-side duplicates.
        dedupe_projected(&res1, res2)
    } else {
        merge_adjacent(&mut res1, res2, binate)
    };

    res.extend(res1);
    res.extend(res2);
    res
}

fn dedupe_projected(res1: &[Cube], res2: Vec<Cube>) -> Vec<Cube> {
    let mut removed = vec![false; res2.len()];
    for r1 in res1 {
        for (j, r2) in res2.iter().enumerate() {
            if r1 == r2 {
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

/// Enumeration descent for a cover with no binate free variable.
fn all_sat_unate(cover: Cover, res: &mut Vec<Cube>, mask: &Bits, mut lit: Bits, free: Bits) {
    let p = propagate_unate(cover, &mut lit, &free);
    if p.absorbed {
        return;
    }
    let cover = p.cover;

    if cover.is_empty() {
        res.push(Cube::from_bits(mask.and(&lit)));
        return;
    }

    if cover.len() == 1 {
        let l = mask.and(&lit);
        if !p.pivot.and(&mask.not()).is_zero() {
            res.push(Cube::from_bits(l));
            return;
        }
        for f in p.pivot.indices() {
            res.push(Cube::from_bits(l.or(&Bits::index(f))));
        }
        return;
    }

    let mut unate = None;
    let mut unateness = 0;
    for f in p.pivot.indices() {
        let count = cover.count(f);
        if count > unateness {
            unate = Some(f);
            unateness = count;
        }
    }
    let Some(unate) = unate else { return };

    all_sat_unate(
        cover.clone(),
        res,
        mask,
        lit.or(&Bits::index(unate)),
        free.clone(),
    );
    all_sat_unate(cover, res, mask, lit, free.xor(&Bits::index(unate)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::sat_cover;
    use test_log::test;

    fn cube(indices: &[usize]) -> Cube {
        Cube::from_indices(indices.iter().copied())
    }

    fn cover(cubes: &[&[usize]]) -> Cover {
        cubes
            .iter()
            .map(|c| Cube::from_indices(c.iter().copied()))
            .collect()
    }

    #[test]
    fn test_empty_cover_has_trivial_solution() {
        let res = all_sat_cover(Cover::new(), Bits::zero());
        assert_eq!(res, vec![Cube::universal()]);
    }

    #[test]
    fn test_contradiction_has_no_solutions() {
        let c = cover(&[&[0], &[1]]);
        let mask = c.bits().clone();
        assert!(all_sat_cover(c, mask).is_empty());
    }

    #[test]
    fn test_single_clause_solutions() {
        // (x0 | x1): solutions are x0 and x1.
        let c = cover(&[&[1, 3]]);
        let mask = c.bits().clone();
        let res = all_sat_cover(c, mask);
        assert_eq!(res.len(), 2);
        assert!(res.contains(&cube(&[1])));
        assert!(res.contains(&cube(&[3])));
    }

    #[test]
    fn test_solutions_satisfy_input() {
        // (x0 | x1) & (!x0 | x2).
        let input = [&[1_usize, 3] as &[usize], &[0, 5]];
        let c = cover(&input);
        let mask = c.bits().clone();
        let res = all_sat_cover(c.clone(), mask);
        assert!(!res.is_empty());
        // Every solution cube must assert one literal of each clause.
        for sol in &res {
            for clause in c.cubes() {
                assert!(
                    !clause.bits().and(sol.bits()).is_zero(),
                    "solution {sol} leaves clause {clause} undecided"
                );
            }
        }
    }

    #[test]
    fn test_masked_variables_are_not_reported() {
        // (x0 | x1) with only variable 0 reported.
        let c = cover(&[&[1, 3]]);
        let res = all_sat_cover(c, Bits::low_mask(2));
        for sol in &res {
            assert!(sol.bits().and(&Bits::low_mask(2)) == *sol.bits());
        }
        // x0 = true is a solution; the rest projects to the empty cube.
        assert!(res.contains(&cube(&[1])) || res.contains(&Cube::universal()));
    }

    /// True if the cube admits the assignment (bit `v` = variable `v`).
    fn admits(cube: &Cube, a: u32) -> bool {
        cube.literals()
            .into_iter()
            .all(|i| (a >> (i / 2)) & 1 == (i & 1) as u32)
    }

    #[test]
    fn test_aux_literal_discharges_last_clause() {
        // (x1 | x2) with only variable 0 reported: an auxiliary literal
        // always satisfies the clause, so the projection is everything.
        let c = cover(&[&[3, 5]]);
        let res = all_sat_cover(c, Bits::low_mask(2));
        assert_eq!(res, vec![Cube::universal()]);
    }

    #[test]
    fn test_unate_aux_literal_discharges_its_clauses() {
        // (x0 | !x2) & (x1 | !x2) with variable 2 auxiliary: x2 = false
        // discharges both clauses at once, so the projection onto
        // variables 0 and 1 is everything, not x0 & x1.
        let c = cover(&[&[1, 4], &[3, 4]]);
        let res = all_sat_cover(c, Bits::low_mask(4));
        assert_eq!(res, vec![Cube::universal()]);
    }

    #[test]
    fn test_projection_through_aux_only_branches() {
        // (!x0 | !x1) & (x0 | !x1 | x2 | !x3) & (x1 | x2 | x3) with
        // variables 2 and 3 auxiliary: every branch bottoms out in a
        // clause of auxiliary literals, and the projection onto
        // variables 0 and 1 is exactly !(x0 & x1).
        let c = cover(&[&[0, 2], &[1, 2, 5, 6], &[3, 5, 7]]);
        let res = all_sat_cover(c, Bits::low_mask(4));
        assert!(!res.is_empty());
        for a in 0..4u32 {
            let covered = res.iter().any(|sol| admits(sol, a));
            assert_eq!(covered, a != 3, "assignment {a:#b}");
        }
    }

    #[test]
    fn test_disjunction_is_exhaustive() {
        // Every satisfying assignment of (x0 | x1) & (!x1 | x2) must be
        // covered: forbidding each solution cube with an extra clause
        // leaves the cover unsatisfiable.
        let c = cover(&[&[1, 3], &[2, 5]]);
        let mask = c.bits().clone();
        let res = all_sat_cover(c.clone(), mask);
        assert!(sat_cover(c.clone()));
        assert!(!res.is_empty());
        let mut clauses = c;
        for sol in &res {
            clauses.push(Cube::from_bits(sol.bits().swap_polarity()));
        }
        assert!(!sat_cover(clauses));
    }
}
