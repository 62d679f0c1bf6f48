//! Tautology check for a sum-of-products cover.
//!
//! The dual of [`crate::sat`]: the cover is read as a disjunction of
//! products, and the recursion asks whether some product reduces to true
//! in every branch. The cofactor machinery also answers containment
//! questions for the minimizer, which enters through [`tautology_rec`]
//! with a non-trivial `lit` prefix.

use crate::bits::Bits;
use crate::cover::Cover;
use crate::engine::{default_free, propagate, split_components, BinatePick};

/// Decides whether the product cover evaluates to true under every
/// assignment.
pub fn tautology_cover(cover: Cover) -> bool {
    let lit = Bits::zero();
    let free = default_free(&cover, &lit);
    tautology_rec(cover, lit, free)
}

pub(crate) fn tautology_rec(cover: Cover, mut lit: Bits, mut free: Bits) -> bool {
    let p = propagate(cover, &mut lit, &mut free);
    if p.absorbed {
        // A product lost all its literals: this branch is covered.
        return true;
    }
    let cover = p.cover;

    if cover.len() <= 1 {
        return false;
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
            // Every product depends on the same literal; falsifying it
            // falsifies them all.
            return false;
        } else {
            let (present, absent) = if count0 > 0 { (f, f + 1) } else { (f + 1, f) };
            lit = lit.or(&Bits::index(present));
            free = free.xor(&Bits::index(absent));
        }
        sparseness = sparseness.max(count);
    }

    let binate = match pick.var {
        None => return false,
        Some(v) => v,
    };

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(parts) = split_components(cover.cubes(), &cols) {
            return parts
                .into_iter()
                .all(|part| tautology_rec(part.into_iter().collect(), lit.clone(), free.clone()));
        }
    }

    if !tautology_rec(
        cover.clone(),
        lit.or(&Bits::index(binate)),
        free.xor(&Bits::index(binate + 1)),
    ) {
        return false;
    }
    tautology_rec(
        cover,
        lit.or(&Bits::index(binate + 1)),
        free.xor(&Bits::index(binate)),
    )
}
