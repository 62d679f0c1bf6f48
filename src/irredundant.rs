//! Irredundant cover extraction.
//!
//! Splits a cover into relatively essential cubes and redundant ones,
//! then keeps the cheapest subset of the partially redundant cubes that
//! still covers the function. The per-cube containment questions reduce
//! to tautology checks of cofactors; the subset selection is a minimum
//! set cover over a matrix built by a tagged tautology walk that records
//! which removable cubes rescued each uncovered branch.

use std::collections::HashMap;

use crate::bits::Bits;
use crate::bitset::BitSet;
use crate::cover::Cover;
use crate::cube::Cube;
use crate::engine::{default_free, split_components, BinatePick};
use crate::mincov::min_cover;
use crate::tautology::tautology_rec;

/// True if the cover contains `cube`: the cofactor of the cover against
/// the cube is a tautology.
pub(crate) fn covers_cube(cover: &Cover, cube: &Cube) -> bool {
    let lit = cube.bits().swap_polarity();
    let free = default_free(cover, &lit);
    tautology_rec(cover.clone(), lit, free)
}

/// Splits the on-set into relatively essential cubes (`E`) and cubes
/// covered by the rest of the cover (`R`), scanning back to front.
pub(crate) fn partition_redundant(on_set: &[Cube], dc_set: &[Cube]) -> (Vec<Cube>, Vec<Cube>) {
    let mut cover: Cover = dc_set.iter().chain(on_set).cloned().collect();
    let mut essential = Vec::new();
    let mut redundant = Vec::new();
    for _ in 0..on_set.len() {
        let Some(cube) = cover.pop() else { break };
        if covers_cube(&cover, &cube) {
            redundant.push(cube.clone());
        } else {
            essential.push(cube.clone());
        }
        cover.push_front(cube);
    }
    (essential, redundant)
}

/// Keeps the redundant cubes not already covered by the essential cubes
/// and the don't-care set.
pub(crate) fn partially_redundant(
    redundant: Vec<Cube>,
    essential: &[Cube],
    dc_set: &[Cube],
) -> Vec<Cube> {
    let cover: Cover = dc_set.iter().chain(essential).cloned().collect();
    redundant
        .into_iter()
        .filter(|c| !covers_cube(&cover, c))
        .collect()
}

/// Tagged tautology walk. Cubes present in `index` are the removable
/// candidates: they are never unit-propagated away, and whenever one of
/// them covers the current branch its tag is recorded instead. Each
/// returned row lists the candidates that rescue one branch of the
/// space; a branch rescued by an untagged cube yields no row at all.
fn ltaut1(cover: Cover, index: &HashMap<Cube, usize>, lit: Bits, free: Bits) -> Vec<BitSet> {
    let mut lit = lit;
    let mut free = free;
    let mut hits: Vec<usize> = Vec::new();
    let mut cover = cover;
    loop {
        let mut repeat = false;
        let mut dont_care = false;
        cover = cover.filter(|c| {
            if !lit.and(c.bits()).is_zero() {
                return false;
            }
            let diff = c.bits().and(&free);
            let pc = diff.count_at_most(2);
            if pc == 1 && !index.contains_key(c) {
                repeat = true;
                lit = lit.or(&diff);
                if Bits::even_mask().and(&diff).is_zero() {
                    free = free.xor(&diff.shr(1));
                } else {
                    free = free.xor(&diff.shl(1));
                }
                return false;
            }
            if pc == 0 {
                match index.get(c) {
                    Some(&i) => {
                        hits.push(i);
                        return false;
                    }
                    None => dont_care = true,
                }
            }
            true
        });
        if dont_care {
            return Vec::new();
        }
        if !repeat {
            break;
        }
    }

    let hit_row: BitSet = hits.iter().copied().collect();

    if cover.len() <= 1 {
        return vec![hit_row];
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
            let (present, absent) = if count0 > 0 { (f, f + 1) } else { (f + 1, f) };
            lit = lit.or(&Bits::index(present));
            free = free.xor(&Bits::index(absent));
        }
        sparseness = sparseness.max(count);
    }

    let binate = match pick.var {
        None => return vec![hit_row],
        Some(v) => v,
    };

    if (sparseness as usize) * 3 < cover.len() && cols.len() > 8 {
        if let Some(parts) = split_components(cover.cubes(), &cols) {
            let mut res = vec![hit_row];
            for part in parts {
                let acc = res;
                let rows = ltaut1(part.into_iter().collect(), index, lit.clone(), free.clone());
                res = cross_unions(rows, &acc);
            }
            return res;
        }
    }

    let res1 = ltaut1(
        cover.clone(),
        index,
        lit.or(&Bits::index(binate)),
        free.xor(&Bits::index(binate + 1)),
    );
    let res2 = ltaut1(
        cover,
        index,
        lit.or(&Bits::index(binate + 1)),
        free.xor(&Bits::index(binate)),
    );

    // A row that is a superset of another row is a weaker constraint;
    // hitting the subset row hits it too.
    let mut removed1 = vec![false; res1.len()];
    let mut removed2 = vec![false; res2.len()];
    for (i, r1) in res1.iter().enumerate() {
        for (j, r2) in res2.iter().enumerate() {
            if r1.len() <= r2.len() {
                if r1.is_subset(r2) {
                    removed2[j] = true;
                }
            } else if r2.is_subset(r1) {
                removed1[i] = true;
            }
        }
    }

    res1.into_iter()
        .zip(removed1)
        .chain(res2.into_iter().zip(removed2))
        .filter(|(_, r)| !r)
        .map(|(mut row, _)| {
            row.union_with(&hit_row);
            row
        })
        .collect()
}

fn cross_unions(rows: Vec<BitSet>, acc: &[BitSet]) -> Vec<BitSet> {
    let mut out = Vec::with_capacity(rows.len() * acc.len());
    for r1 in &rows {
        for r2 in acc {
            let mut u = r1.clone();
            u.union_with(r2);
            out.push(u);
        }
    }
    out
}

/// Builds the non-covering matrix: one row per branch of the space that
/// is lost unless at least one of the listed partially redundant cubes
/// stays. Duplicate rows are folded via their structural hash.
fn nocover_matrix(rp: &[Cube], essential: &[Cube], dc_set: &[Cube]) -> Vec<BitSet> {
    let mut index: HashMap<Cube, usize> = HashMap::with_capacity(rp.len());
    for (i, c) in rp.iter().enumerate() {
        index.insert(c.clone(), i);
    }
    let cover: Cover = rp.iter().chain(essential).chain(dc_set).cloned().collect();

    let mut bucket_order: Vec<u32> = Vec::new();
    let mut buckets: HashMap<u32, Vec<BitSet>> = HashMap::new();
    for r in rp {
        let lit = r.bits().swap_polarity();
        let free = cover.bits().and(&r.bits().or(&lit).not());
        for row in ltaut1(cover.clone(), &index, lit, free) {
            let hash = row.fold_hash();
            let bucket = buckets.entry(hash).or_insert_with(|| {
                bucket_order.push(hash);
                Vec::new()
            });
            if !bucket.contains(&row) {
                bucket.push(row);
            }
        }
    }

    let mut rows = Vec::new();
    for hash in bucket_order {
        if let Some(bucket) = buckets.remove(&hash) {
            rows.extend(bucket);
        }
    }
    rows
}

/// Selects a minimal subset of the partially redundant cubes that keeps
/// the cover intact.
fn minimal_irredundant(rp: Vec<Cube>, essential: &[Cube], dc_set: &[Cube]) -> Vec<Cube> {
    let matrix = nocover_matrix(&rp, essential, dc_set);
    let keep = min_cover(&matrix);
    rp.into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(*i))
        .map(|(_, c)| c)
        .collect()
}

/// Removes redundant cubes from the on-set, keeping the function intact
/// with respect to the don't-care set.
pub(crate) fn irredundant_cover(on_set: &[Cube], dc_set: &[Cube]) -> Vec<Cube> {
    let (mut essential, redundant) = partition_redundant(on_set, dc_set);
    let rp = partially_redundant(redundant, &essential, dc_set);
    let rc = minimal_irredundant(rp, &essential, dc_set);
    essential.extend(rc);
    essential
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn cube(indices: &[usize]) -> Cube {
        Cube::from_indices(indices.iter().copied())
    }

    fn cover_of(cubes: &[Cube]) -> Cover {
        cubes.iter().cloned().collect()
    }

    #[test]
    fn test_covers_cube() {
        // x0 + !x0 x1 covers x1.
        let cover = cover_of(&[cube(&[1]), cube(&[0, 3])]);
        assert!(covers_cube(&cover, &cube(&[3])));
        assert!(!covers_cube(&cover, &cube(&[2])));
        assert!(covers_cube(&cover, &cube(&[1, 5])));
    }

    #[test]
    fn test_fully_redundant_cube_is_dropped() {
        // x0 x1 is inside x0 + x1.
        let on = [cube(&[1]), cube(&[3]), cube(&[1, 3])];
        let res = irredundant_cover(&on, &[]);
        assert_eq!(res.len(), 2);
        assert!(res.contains(&cube(&[1])));
        assert!(res.contains(&cube(&[3])));
    }

    #[test]
    fn test_partially_redundant_choice() {
        // x0 + !x0 x1 + x1: the last two cubes each cover the branch the
        // other would leave open; exactly one of them must stay.
        let on = [cube(&[1]), cube(&[0, 3]), cube(&[3])];
        let res = irredundant_cover(&on, &[]);
        assert_eq!(res.len(), 2);
        assert!(res.contains(&cube(&[1])));
        assert!(res.contains(&cube(&[0, 3])) || res.contains(&cube(&[3])));
        // The result still covers every original cube.
        let cover = cover_of(&res);
        for c in &on {
            assert!(covers_cube(&cover, c), "{c} lost by irredundant cover");
        }
    }

    #[test]
    fn test_dont_cares_widen_redundancy() {
        // x0 x1 alone is irredundant, but with dc = x0 the cube is
        // entirely optional.
        let on = [cube(&[1, 3])];
        let dc = [cube(&[1])];
        let (essential, redundant) = partition_redundant(&on, &dc);
        assert!(essential.is_empty());
        assert_eq!(redundant.len(), 1);
        let rp = partially_redundant(redundant, &essential, &dc);
        assert!(rp.is_empty());
        assert!(irredundant_cover(&on, &dc).is_empty());
    }

    #[test]
    fn test_essential_cubes_survive() {
        let on = [cube(&[1, 2]), cube(&[3, 5]), cube(&[1, 5])];
        // x0 !x1 and x1 x2 are essential; x0 x2 is their consensus.
        let res = irredundant_cover(&on, &[]);
        assert_eq!(res.len(), 2);
        assert!(res.contains(&cube(&[1, 2])));
        assert!(res.contains(&cube(&[3, 5])));
    }
}
