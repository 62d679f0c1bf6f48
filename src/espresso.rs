//! The heuristic two-level minimization loop.
//!
//! Expansion, irredundancy and reduction are iterated until the literal
//! cost stops improving; a last-gasp round of maximal reduction followed
//! by re-expansion tries to shake the cover out of a local minimum before
//! giving up. Essential primes are extracted once after the first pass
//! and treated as don't-cares for the rest of the run.

use std::collections::HashSet;

use log::debug;

use crate::complement::complement_cover;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::engine::default_free;
use crate::expand::{expand, expand_one, expand_one_presto, CanRaise};
use crate::irredundant::irredundant_cover;
use crate::reduce::{maximum_reduction, reduce};
use crate::tautology::tautology_rec;
use crate::types::Lit;

/// Knobs for [`espresso_cover`].
#[derive(Clone, Copy, Default)]
pub struct EspressoOptions<'a> {
    /// Compute the off-set as the complement of on-set plus don't-cares
    /// and expand against it with the blocking-matrix strategy. Without
    /// it every raise is validated by a containment check instead, which
    /// avoids the potentially exponential complement.
    pub compute_off_set: bool,
    /// Veto callback consulted before every literal raise; a raise is
    /// only performed when it returns true.
    pub can_raise: Option<&'a dyn Fn(Lit, &Cube) -> bool>,
}

/// Total literal count of a cover.
pub(crate) fn cost(cubes: &[Cube]) -> usize {
    cubes.iter().map(Cube::len).sum()
}

/// Extracts the cubes covering some minterm no other cube reaches. The
/// check runs the tautology walk against the consensus of the rest of
/// the cover with the cube under test.
pub(crate) fn essential_primes(on_set: &[Cube], dc_set: &[Cube]) -> Vec<Cube> {
    let mut cover: Vec<Cube> = dc_set.iter().chain(on_set).cloned().collect();
    let mut res = Vec::new();
    for _ in 0..on_set.len() {
        let Some(ess) = cover.pop() else { break };
        let ess_inv = ess.bits().swap_polarity();
        let mut cov = Cover::new();
        for cube in &cover {
            let conflict = ess_inv.and(cube.bits());
            match conflict.count_at_most(2) {
                0 => cov.push(cube.clone()),
                1 => cov.push(Cube::from_bits(cube.bits().xor(&conflict))),
                _ => {}
            }
        }
        let free = default_free(&cov, &ess_inv);
        if !tautology_rec(cov, ess_inv.clone(), free) {
            res.push(ess.clone());
        }
        cover.insert(0, ess);
    }
    res
}

/// Maximally reduces every cube, re-expands the shrunk ones against each
/// other and keeps any expansion that swallowed a sibling. Falls back to
/// the input cover when nothing was gained.
fn last_gasp(
    on_set: &[Cube],
    dc_set: &[Cube],
    off_set: Option<&[Cube]>,
    can_raise: CanRaise,
) -> Vec<Cube> {
    let mut reduced = maximum_reduction(on_set, dc_set);
    let mut new_cubes = Vec::new();
    let full_cover: Cover = on_set.iter().chain(dc_set).cloned().collect();
    for _ in 0..reduced.len() {
        let cube = reduced.remove(0);
        let expanded = match off_set {
            Some(off) => expand_one(cube.clone(), &reduced, off, can_raise),
            None => expand_one_presto(cube.clone(), &reduced, &full_cover, can_raise),
        };
        for c in &reduced {
            if expanded.covers(c) {
                new_cubes.push(expanded.clone());
            }
        }
        reduced.push(cube);
    }
    if new_cubes.is_empty() {
        return on_set.to_vec();
    }
    let mut all = on_set.to_vec();
    all.extend(new_cubes);
    irredundant_cover(&all, dc_set)
}

/// Runs the minimization loop over the on-set with respect to the
/// don't-care set. An explicit off-set switches expansion from the
/// containment-checking strategy to the blocking-matrix strategy.
pub(crate) fn espresso_cubes(
    on_set: &[Cube],
    dc_set: &[Cube],
    off_set: Option<&[Cube]>,
    can_raise: CanRaise,
) -> Vec<Cube> {
    if on_set.is_empty() {
        return Vec::new();
    }
    let mut primes: HashSet<Cube> = HashSet::new();

    let mut on = expand(on_set.to_vec(), dc_set, off_set, &primes, can_raise);
    on = irredundant_cover(&on, dc_set);
    let essentials = essential_primes(&on, dc_set);
    let mut dc = dc_set.to_vec();
    if !essentials.is_empty() {
        on.retain(|c| !essentials.contains(c));
        dc.extend(essentials.iter().cloned());
    }
    debug!(
        "after first pass: {} essential primes, {} cubes in play",
        essentials.len(),
        on.len()
    );

    let mut cost_now = cost(&on);
    loop {
        let mut on2 = reduce(&on, &dc, &mut primes);
        on2 = expand(on2, &dc, off_set, &primes, can_raise);
        on2 = irredundant_cover(&on2, &dc);
        let mut cost2 = cost(&on2);
        if cost2 >= cost_now {
            on2 = last_gasp(&on, &dc, off_set, can_raise);
            cost2 = cost(&on2);
            if cost2 >= cost_now {
                break;
            }
        }
        debug!("cost improved {cost_now} -> {cost2}");
        cost_now = cost2;
        on = on2;
    }

    let mut res = essentials;
    res.extend(on);
    res
}

/// Minimizes the on-set cover with respect to the don't-care set.
pub fn espresso_cover(on_set: &[Cube], dc_set: &[Cube], options: &EspressoOptions) -> Vec<Cube> {
    let off = if options.compute_off_set {
        let cover: Cover = on_set.iter().chain(dc_set).cloned().collect();
        Some(complement_cover(cover))
    } else {
        None
    };
    let veto = options.can_raise;
    let raise = move |index: usize, cube: &Cube| match veto {
        Some(f) => f(Lit::from_index(index), cube),
        None => true,
    };
    espresso_cubes(on_set, dc_set, off.as_deref(), &raise)
}
