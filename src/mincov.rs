//! Minimum set cover over small index matrices.
//!
//! The expansion and irredundancy steps both boil down to hitting-set
//! problems: pick the fewest columns so that every row keeps at least one
//! of its members. The solver seeds a greedy pass from a maximum clique
//! of pairwise disjoint rows, weeds the greedy picks down to an essential
//! subset and recurses on the rows left uncovered.

use std::collections::HashMap;

use crate::bitset::BitSet;

/// Picks a small set of columns hitting every row.
pub(crate) fn min_cover(rows: &[BitSet]) -> BitSet {
    let clique = max_clique(rows);
    let mut res = BitSet::empty();
    let mut covered = vec![false; rows.len()];

    for &ci in &clique {
        // Column frequencies over all rows, restricted to the columns of
        // the clique row: disjoint rows need distinct columns, so each
        // clique member contributes one pick.
        let mut order: Vec<usize> = Vec::new();
        let mut freq: HashMap<usize, BitSet> = HashMap::new();
        for (ri, row) in rows.iter().enumerate() {
            for j in row.iter() {
                if rows[ci].contains(j) {
                    freq.entry(j)
                        .or_insert_with(|| {
                            order.push(j);
                            BitSet::empty()
                        })
                        .insert(ri);
                }
            }
        }
        let mut best: Option<(usize, usize)> = None;
        for &j in &order {
            let hits = freq[&j].len();
            if best.map_or(true, |(_, b)| hits > b) {
                best = Some((j, hits));
            }
        }
        let Some((col, _)) = best else { continue };
        for ri in freq[&col].iter() {
            covered[ri] = true;
        }
        res.insert(col);
    }

    res = weed(rows, &res);

    let leftover: Vec<BitSet> = rows
        .iter()
        .zip(&covered)
        .filter(|(_, &c)| !c)
        .map(|(r, _)| r.clone())
        .collect();
    // Recursing on an unshrunk problem cannot make progress; rows that
    // stay uncovered here have no columns left to pick.
    if !leftover.is_empty() && leftover.len() < rows.len() {
        res.union_with(&min_cover(&leftover));
    }
    res
}

/// Finds a large clique in the row-disjointness graph with a bounded
/// Bron-Kerbosch search.
fn max_clique(rows: &[BitSet]) -> Vec<usize> {
    let n = rows.len();
    let mut neighbors = vec![BitSet::empty(); n];
    for i in 0..n {
        for j in i + 1..n {
            if rows[i].is_disjoint(&rows[j]) {
                neighbors[i].insert(j);
                neighbors[j].insert(i);
            }
        }
    }

    let mut keys: Vec<usize> = (0..n).collect();
    keys.sort_by(|&a, &b| neighbors[b].len().cmp(&neighbors[a].len()));

    let mut search = CliqueSearch {
        neighbors: &neighbors,
        best: Vec::new(),
        best_weight: 0,
        exits: 0,
        limit: n,
    };
    search.recurse(&[], keys, Vec::new());
    search.best
}

struct CliqueSearch<'a> {
    neighbors: &'a [BitSet],
    best: Vec<usize>,
    best_weight: usize,
    /// Maximal cliques visited since the last improvement; the search
    /// gives up after `limit` fruitless leaves.
    exits: usize,
    limit: usize,
}

impl CliqueSearch<'_> {
    fn recurse(&mut self, r: &[usize], p: Vec<usize>, mut x: Vec<usize>) {
        if self.exits > self.limit {
            return;
        }
        if p.is_empty() && x.is_empty() {
            self.exits += 1;
            if r.len() >= self.best.len() {
                let w: usize = r.iter().map(|&i| self.neighbors[i].len()).sum();
                if w > self.best_weight || r.len() > self.best.len() {
                    self.best = r.to_vec();
                    self.best_weight = w;
                    self.exits = 0;
                }
            }
            return;
        }
        let Some(&pivot) = p.first() else { return };

        let mut excl = BitSet::empty();
        for idx in 0..p.len() {
            let v = p[idx];
            if self.neighbors[pivot].contains(v) {
                continue;
            }
            let neigh = &self.neighbors[v];
            let new_p: Vec<usize> = p
                .iter()
                .copied()
                .filter(|&i| neigh.contains(i) && !excl.contains(i))
                .collect();
            let new_x: Vec<usize> = x.iter().copied().filter(|&i| neigh.contains(i)).collect();
            let mut r2 = r.to_vec();
            r2.push(v);
            self.recurse(&r2, new_p, new_x);
            if self.best.len() > r.len() + p.len() {
                return;
            }
            x.push(v);
            excl.insert(v);
        }
    }
}

/// Trims a chosen column set down to the columns some row depends on.
/// Non-essential columns are discarded one at a time, fewest two-row
/// partners first, until every remaining row is pinned to a single pick.
fn weed(rows: &[BitSet], chosen: &BitSet) -> BitSet {
    let mut points: Vec<BitSet> = rows.iter().map(|r| r.intersection(chosen)).collect();
    let mut essential = BitSet::empty();

    loop {
        for point in &points {
            if point.len() == 1 {
                if let Some(p) = point.first() {
                    essential.insert(p);
                }
            }
        }
        points.retain(|point| point.is_disjoint(&essential) && point.len() > 1);
        if points.is_empty() {
            break;
        }

        let mut order: Vec<usize> = Vec::new();
        let mut partners: HashMap<usize, BitSet> = HashMap::new();
        for point in &points {
            for p in point.iter() {
                partners.entry(p).or_insert_with(|| {
                    order.push(p);
                    BitSet::empty()
                });
            }
            if point.len() == 2 {
                let mut it = point.iter();
                if let (Some(p1), Some(p2)) = (it.next(), it.next()) {
                    if let Some(s) = partners.get_mut(&p1) {
                        s.insert(p2);
                    }
                    if let Some(s) = partners.get_mut(&p2) {
                        s.insert(p1);
                    }
                }
            }
        }

        let mut eliminate = None;
        let mut fewest = usize::MAX;
        for &p in &order {
            let size = partners[&p].len();
            if size < fewest {
                fewest = size;
                eliminate = Some(p);
            }
        }
        let Some(eliminate) = eliminate else { break };
        for point in &mut points {
            point.remove(eliminate);
        }
    }

    essential
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[usize]]) -> Vec<BitSet> {
        data.iter().map(|r| r.iter().copied().collect()).collect()
    }

    fn assert_hits_all(rows: &[BitSet], cover: &BitSet) {
        for (i, row) in rows.iter().enumerate() {
            assert!(row.intersects(cover), "row {i} left uncovered");
        }
    }

    #[test]
    fn test_empty_problem() {
        assert!(min_cover(&[]).is_empty());
    }

    #[test]
    fn test_single_row() {
        let m = rows(&[&[2, 5]]);
        let res = min_cover(&m);
        assert_hits_all(&m, &res);
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn test_disjoint_rows_need_one_pick_each() {
        let m = rows(&[&[0, 1], &[2, 3], &[4, 5]]);
        let res = min_cover(&m);
        assert_hits_all(&m, &res);
        assert_eq!(res.len(), 3);
    }

    #[test]
    fn test_shared_column_collapses_cover() {
        let m = rows(&[&[0, 7], &[1, 7], &[2, 7], &[3, 7]]);
        let res = min_cover(&m);
        assert_hits_all(&m, &res);
        assert_eq!(res.len(), 1);
        assert!(res.contains(7));
    }

    #[test]
    fn test_two_column_optimum() {
        let m = rows(&[&[0, 1], &[1, 2], &[2, 3], &[3, 0]]);
        let res = min_cover(&m);
        assert_hits_all(&m, &res);
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn test_duplicate_rows() {
        let m = rows(&[&[4], &[4], &[4, 9]]);
        let res = min_cover(&m);
        assert_hits_all(&m, &res);
        assert_eq!(res.len(), 1);
        assert!(res.contains(4));
    }

    #[test]
    fn test_max_clique_finds_disjoint_rows() {
        let m = rows(&[&[0, 1], &[1, 2], &[3, 4], &[5, 6]]);
        let clique = max_clique(&m);
        // Rows 0/2/3 (or 1/2/3) are pairwise disjoint.
        assert_eq!(clique.len(), 3);
        for (a, idx) in clique.iter().enumerate() {
            for &other in &clique[a + 1..] {
                assert!(m[*idx].is_disjoint(&m[other]));
            }
        }
    }
}
