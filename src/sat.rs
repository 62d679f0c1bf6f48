//! Satisfiability of a product-of-sums cover.
//!
//! The cover is read as a conjunction of clauses: each cube lists the
//! literals of one disjunction. The search is the unate recursion from
//! [`crate::engine`]: a branch is satisfiable as soon as every clause
//! holds, and unsatisfiable when a clause loses all its literals.

use crate::bits::Bits;
use crate::cover::Cover;
use crate::engine::{default_free, propagate, split_components, BinatePick};

/// Decides whether the clause cover has a satisfying assignment.
pub fn sat_cover(cover: Cover) -> bool {
    let lit = Bits::zero();
    let free = default_free(&cover, &lit);
    sat_rec(cover, lit, free)
}

fn sat_rec(cover: Cover, mut lit: Bits, mut free: Bits) -> bool {
    let p = propagate(cover, &mut lit, &mut free);
    if p.absorbed {
        return false;
    }
    let cover = p.cover;

    if cover.len() <= 1 {
        return true;
    }

    free = cover.bits().and(&free);

    let mut pick = BinatePick::new();
    let mut sparseness = 0;
    let mut cols = Vec::new();
    let free_vars = free.var_indices();
    for f in free_vars.iter().copied() {
        let count0 = cover.count(f);
        let count1 = cover.count(f + 1);
        let count = count0 + count1;
        if count0 > 0 && count1 > 0 {
            pick.offer(f, count0, count1);
            cols.push(f);
        } else if count as usize == cover.len() {
            // A literal present in every clause satisfies them all.
            return true;
        } else {
            let (present, absent) = if count0 > 0 { (f, f + 1) } else { (f + 1, f) };
            lit = lit.or(&Bits::index(present));
            free = free.xor(&Bits::index(absent));
        }
        sparseness = sparseness.max(count);
    }

    let binate = match pick.var {
        // Unate clause cover with no full column: every clause still has
        // a literal, so picking them all satisfies it.
        None => return true,
        Some(v) => v,
    };

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(parts) = split_components(cover.cubes(), &cols) {
            return parts
                .into_iter()
                .all(|part| sat_rec(part.into_iter().collect(), lit.clone(), free.clone()));
        }
    }

    if sat_rec(
        cover.clone(),
        lit.or(&Bits::index(binate)),
        free.xor(&Bits::index(binate + 1)),
    ) {
        return true;
    }
    sat_rec(
        cover,
        lit.or(&Bits::index(binate + 1)),
        free.xor(&Bits::index(binate)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use test_log::test;

    fn cover(cubes: &[&[usize]]) -> Cover {
        cubes
            .iter()
            .map(|c| Cube::from_indices(c.iter().copied()))
            .collect()
    }

    #[test]
    fn test_empty_cover_is_sat() {
        assert!(sat_cover(Cover::new()));
    }

    #[test]
    fn test_single_clause() {
        assert!(sat_cover(cover(&[&[0, 3]])));
    }

    #[test]
    fn test_complementary_units_conflict() {
        assert!(!sat_cover(cover(&[&[0], &[1]])));
    }

    #[test]
    fn test_chain_of_implications() {
        // (x0 | x1) & (!x1 | x2) & (!x0) & (!x2) is unsat.
        assert!(!sat_cover(cover(&[&[1, 3], &[2, 5], &[0], &[4]])));
        // Dropping the last clause makes it satisfiable.
        assert!(sat_cover(cover(&[&[1, 3], &[2, 5], &[0]])));
    }

    #[test]
    fn test_two_binate_clauses() {
        // (!x0 | !x1) & (x0 | x1): pick opposite values.
        assert!(sat_cover(cover(&[&[0, 2], &[1, 3]])));
    }

    #[test]
    fn test_unsat_xor_encoding() {
        // All four clauses over two variables: no assignment survives.
        assert!(!sat_cover(cover(&[&[1, 3], &[1, 2], &[0, 3], &[0, 2]])));
    }
}
