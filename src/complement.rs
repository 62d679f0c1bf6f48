//! Complementation of a sum-of-products cover.
//!
//! Produces a cover of the off-set: a cube list whose disjunction is true
//! exactly where the input is false. The recursion mirrors the tautology
//! walk, emitting a cube whenever a branch's cofactor becomes empty. A
//! dedicated unate descent takes over once no binate variable remains,
//! and adjacent results of the two Shannon branches are merged on the way
//! back up.

use crate::bits::Bits;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::engine::{
    cross_products, merge_adjacent, propagate, propagate_unate, split_components, BinatePick,
};

/// Computes a cover of the complement of the product cover.
pub fn complement_cover(cover: Cover) -> Vec<Cube> {
    let free = cover.bits().clone();
    complement_rec(cover, Bits::zero(), free)
}

fn complement_rec(cover: Cover, mut lit: Bits, mut free: Bits) -> Vec<Cube> {
    let p = propagate(cover, &mut lit, &mut free);
    if p.absorbed {
        return Vec::new();
    }
    let cover = p.cover;

    if cover.is_empty() {
        // The cofactor is empty: the whole subspace selected by `lit`
        // belongs to the complement.
        return vec![Cube::from_bits(lit.swap_polarity())];
    }

    free = cover.bits().and(&free);
    let mut res = Vec::new();

    if cover.len() == 1 {
        let inv = lit.swap_polarity();
        for f in free.indices() {
            res.push(Cube::from_bits(inv.or(&Bits::index(f ^ 1))));
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
        if count0 > 0 && count1 > 0 {
            pick.offer(f, count0, count1);
            cols.push(f);
        } else if count as usize == cover.len() {
            // Full unate column: the opposite half-space is entirely in
            // the complement.
            let present = if count0 > 0 { f } else { f + 1 };
            res.push(Cube::from_bits(
                lit.or(&Bits::index(present)).swap_polarity(),
            ));
            free = free.xor(&Bits::index(present));
        } else {
            cols.push(f);
        }
        sparseness = sparseness.max(count);
    }

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(mut parts) = split_components(cover.cubes(), &cols) {
            let last = parts.pop().unwrap_or_default();
            let mut res1 = complement_rec(last.into_iter().collect(), lit.clone(), free.clone());
            for part in parts {
                if res1.is_empty() {
                    return res;
                }
                let res2 = complement_rec(part.into_iter().collect(), lit.clone(), free.clone());
                res1 = cross_products(&res1, &res2);
            }
            res.extend(res1);
            return res;
        }
    }

    let binate = match pick.var {
        None => {
            complement_unate(cover, &mut res, lit, free);
            return res;
        }
        Some(v) => v,
    };

    let mut res1 = complement_rec(
        cover.clone(),
        lit.or(&Bits::index(binate)),
        free.xor(&Bits::index(binate + 1)),
    );
    let res2 = complement_rec(
        cover,
        lit.or(&Bits::index(binate + 1)),
        free.xor(&Bits::index(binate)),
    );
    let res2 = merge_adjacent(&mut res1, res2, binate);

    res.extend(res1);
    res.extend(res2);
    res
}

/// Complement descent for a cover with no binate free variable. Splits on
/// the most frequent literal of the smallest remaining cube.
fn complement_unate(cover: Cover, res: &mut Vec<Cube>, mut lit: Bits, free: Bits) {
    let p = propagate_unate(cover, &mut lit, &free);
    if p.absorbed {
        return;
    }
    let cover = p.cover;

    if cover.is_empty() {
        res.push(Cube::from_bits(lit.swap_polarity()));
        return;
    }

    let pivot_lits = p.pivot.indices();

    if cover.len() == 1 {
        let inv = lit.swap_polarity();
        for f in pivot_lits {
            res.push(Cube::from_bits(inv.or(&Bits::index(f ^ 1))));
        }
        return;
    }

    let mut unate = None;
    let mut unateness = 0;
    for f in pivot_lits {
        let count = cover.count(f);
        if count > unateness {
            unate = Some(f);
            unateness = count;
        }
    }
    // The pivot cube survived propagation, so it has at least two free
    // literals and one of them was picked.
    let Some(unate) = unate else { return };

    complement_unate(
        cover.clone(),
        res,
        lit.or(&Bits::index(unate)),
        free.clone(),
    );
    complement_unate(cover, res, lit, free.xor(&Bits::index(unate)));
}
