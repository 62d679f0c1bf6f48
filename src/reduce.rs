//! Cube reduction.
//!
//! The counterpart of expansion: each cube is shrunk to the smallest cube
//! still covering the part of the function no other cube takes care of.
//! The smallest such cube is found by a cofactor walk that intersects the
//! decided literals of every branch left uncovered by the rest of the
//! cover.

use std::collections::{HashSet, VecDeque};

use crate::bits::Bits;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::engine::{propagate, split_components, BinatePick};

/// Orders cubes for reduction: a smallest cube seeds the order and the
/// rest follow by distance to it, so neighbours are reduced together.
pub(crate) fn cube_order(cubes: &mut [Cube]) {
    if cubes.len() <= 1 {
        return;
    }
    let mut seed = &cubes[0];
    for c in &cubes[1..] {
        if c.len() <= seed.len() {
            seed = c;
        }
    }
    let seed = seed.clone();
    cubes.sort_by_cached_key(|a| {
        let shared = a.bits().and(seed.bits()).count() as usize;
        (a.len() - shared) + (seed.len() - shared)
    });
}

/// Smallest cube containing the cofactor's uncovered space, reported in
/// inverted polarity. `None` means the cofactor is a tautology and the
/// cube under reduction is entirely covered by the others.
pub(crate) fn sccc(cover: Cover, mut lit: Bits, mut free: Bits) -> Option<Bits> {
    let p = propagate(cover, &mut lit, &mut free);
    if p.absorbed {
        return None;
    }
    let mut cover = p.cover;

    if cover.len() <= 1 {
        return Some(lit);
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
        } else {
            // Unate literal: cubes containing it cannot constrain the
            // result below the split, drop them.
            let present = if count0 > 0 { f } else { f + 1 };
            cover = cover.filter(|c| !c.contains(present));
        }
        sparseness = sparseness.max(count);
    }

    let binate = match pick.var {
        None => return Some(lit),
        Some(v) => v,
    };

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(parts) = split_components(cover.cubes(), &cols) {
            let mut res = None;
            for part in parts {
                let r = sccc(part.into_iter().collect(), lit.clone(), free.clone());
                res = and_covered(res, r);
            }
            return res;
        }
    }

    let res1 = sccc(
        cover.clone(),
        lit.or(&Bits::index(binate)),
        free.xor(&Bits::index(binate + 1)),
    );
    let res2 = sccc(
        cover,
        lit.or(&Bits::index(binate + 1)),
        free.xor(&Bits::index(binate)),
    );
    and_covered(res1, res2)
}

/// Intersection with `None` as the tautology identity.
fn and_covered(a: Option<Bits>, b: Option<Bits>) -> Option<Bits> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.and(&b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Reduces every cube against the rest of the cover and the don't-care
/// set. Cubes that cannot shrink are recorded as prime; cubes whose
/// cofactor is tautological disappear.
pub(crate) fn reduce(on_set: &[Cube], dc_set: &[Cube], primes: &mut HashSet<Cube>) -> Vec<Cube> {
    let mut ordered = on_set.to_vec();
    cube_order(&mut ordered);
    let mut on: VecDeque<Cube> = ordered.into();
    for _ in 0..on_set.len() {
        let Some(cube) = on.pop_front() else { break };
        let cube_inv = cube.bits().swap_polarity();
        let cube_mask = cube.bits().or(&cube_inv);
        let cov: Cover = on
            .iter()
            .chain(dc_set)
            .filter(|c| cube_inv.and(c.bits()).is_zero())
            .cloned()
            .collect();
        match sccc(cov, cube_inv.clone(), cube_mask.not()) {
            None => {}
            Some(l) if l == cube_inv => {
                primes.insert(cube.clone());
                on.push_back(cube);
            }
            Some(l) => on.push_back(Cube::from_bits(l.swap_polarity())),
        }
    }
    on.into()
}

/// Reduces every cube against the unreduced rest, without rewriting the
/// cover. Returns only the cubes that actually shrank.
pub(crate) fn maximum_reduction(on_set: &[Cube], dc_set: &[Cube]) -> Vec<Cube> {
    let mut reduced = Vec::new();
    for (i, cube) in on_set.iter().enumerate() {
        let cube_inv = cube.bits().swap_polarity();
        let cube_mask = cube.bits().or(&cube_inv);
        let cov: Cover = on_set[i + 1..]
            .iter()
            .chain(&on_set[..i])
            .chain(dc_set)
            .filter(|c| cube_inv.and(c.bits()).is_zero())
            .cloned()
            .collect();
        if let Some(l) = sccc(cov, cube_inv.clone(), cube_mask.not()) {
            if l != cube_inv {
                reduced.push(Cube::from_bits(l.swap_polarity()));
            }
        }
    }
    reduced
}
