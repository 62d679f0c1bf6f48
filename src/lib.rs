//! # espresso-rs: Two-Level Boolean Minimization in Rust
//!
//! **`espresso-rs`** is a library for analyzing and minimizing boolean
//! functions given in two-level form. It implements the classic
//! **Espresso** heuristic loop (expand, irredundant, reduce) together
//! with the unate-recursive building blocks it rests on: satisfiability,
//! tautology checking, complementation and solution enumeration.
//!
//! ## Representation
//!
//! A function is a list of **cubes** (product terms). Each cube packs its
//! literals into a bit-vector, two positions per variable: index `2v` is
//! the negative literal of variable `v`, index `2v + 1` the positive one.
//! The same cube list is read two ways:
//!
//! - as a **sum of products** (on-set cover) by [`tautology`],
//!   [`complement`] and [`espresso`];
//! - as a **product of sums** (clause set) by [`sat`] and [`all_sat`].
//!
//! ## Key Features
//!
//! - **Unate recursion everywhere**: all queries share one cofactor walk
//!   with unit propagation, unate reduction and connected-component
//!   splitting.
//! - **Heuristic minimization**: the Espresso loop with essential prime
//!   extraction, a last-gasp escape from local minima, and an internal
//!   branch-and-bound minimum set cover solver.
//! - **Two expansion strategies**: blocking-matrix expansion against an
//!   explicit off-set, or containment-checked expansion that never
//!   materializes the complement.
//! - **Pluggable bit backend**: a fixed-width array by default, or
//!   arbitrary-precision integers behind the `bigint` feature.
//!
//! ## Basic Usage
//!
//! ```rust
//! use espresso_rs::{espresso, EspressoOptions, Lit};
//!
//! let x = Lit::positive;
//! let nx = Lit::negative;
//!
//! // f = x0 x1 + x0 !x1 minimizes to x0.
//! let on_set = vec![vec![x(0), x(1)], vec![x(0), nx(1)]];
//! let minimized = espresso(&on_set, &[], &EspressoOptions::default());
//! assert_eq!(minimized, vec![vec![x(0)]]);
//! ```
//!
//! ## Core Components
//!
//! - **[`espresso`](mod@espresso)**: the minimization loop.
//! - **[`sat`](mod@sat)**, **[`tautology`](mod@tautology)**,
//!   **[`complement`](mod@complement)**, **[`all_sat`](mod@all_sat)**:
//!   the analysis queries.
//! - **[`cube`]** and **[`cover`]**: the cube and cover types.
//! - **[`pla`]**: a reader and writer for single-output PLA tables.

pub mod all_sat;
pub mod bits;
mod bitset;
pub mod complement;
pub mod cover;
pub mod cube;
mod engine;
pub mod error;
pub mod espresso;
mod expand;
mod irredundant;
mod mincov;
pub mod pla;
mod reduce;
pub mod sat;
pub mod tautology;
pub mod types;

pub use crate::bits::Bits;
pub use crate::cover::Cover;
pub use crate::cube::Cube;
pub use crate::error::Error;
pub use crate::espresso::{espresso_cover, EspressoOptions};
pub use crate::pla::Pla;
pub use crate::types::{Lit, MAX_LITERALS, MAX_VARS};

fn build_cover(terms: &[Vec<Lit>]) -> Cover {
    terms
        .iter()
        .map(|t| Cube::from_lits(t.iter().copied()))
        .collect()
}

/// Decides satisfiability of a product of sums: each inner list is one
/// clause, the conjunction of all clauses is tested.
pub fn sat(clauses: &[Vec<Lit>]) -> bool {
    sat::sat_cover(build_cover(clauses))
}

/// Decides whether a sum of products covers the whole space.
pub fn tautology(products: &[Vec<Lit>]) -> bool {
    tautology::tautology_cover(build_cover(products))
}

/// Complements a sum of products, returning a cover of everything the
/// input leaves uncovered.
pub fn complement(products: &[Vec<Lit>]) -> Vec<Vec<Lit>> {
    complement::complement_cover(build_cover(products))
        .iter()
        .map(Cube::lits)
        .collect()
}

/// Enumerates cubes of satisfying assignments of a product of sums.
///
/// With `aux_from = Some(v)`, variables from `v` upward are auxiliary:
/// the search decides them but the returned cubes never mention them,
/// and solutions equal after projection are reported once.
pub fn all_sat(clauses: &[Vec<Lit>], aux_from: Option<usize>) -> Vec<Vec<Lit>> {
    let cover = build_cover(clauses);
    let mut mask = cover.bits().clone();
    if let Some(boundary) = aux_from {
        mask = mask.and(&Bits::low_mask(2 * boundary.min(MAX_VARS)));
    }
    all_sat::all_sat_cover(cover, mask)
        .iter()
        .map(Cube::lits)
        .collect()
}

/// Heuristically minimizes the on-set with respect to the don't-care
/// set. The result covers every on-set minterm, avoids every minterm
/// outside on-set and dc-set, and is irredundant.
pub fn espresso(on_set: &[Vec<Lit>], dc_set: &[Vec<Lit>], options: &EspressoOptions) -> Vec<Vec<Lit>> {
    let on: Vec<Cube> = on_set
        .iter()
        .map(|t| Cube::from_lits(t.iter().copied()))
        .collect();
    let dc: Vec<Cube> = dc_set
        .iter()
        .map(|t| Cube::from_lits(t.iter().copied()))
        .collect();
    espresso_cover(&on, &dc, options)
        .iter()
        .map(Cube::lits)
        .collect()
}
