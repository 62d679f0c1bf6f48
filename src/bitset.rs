//! Compact index sets for the set-cover solver.
//!
//! Rows of the covering/blocking matrices, clique neighbor sets and
//! component membership are all small sets of column indices. This bit set
//! keeps them in u64 words and grows on demand. Equality and hashing
//! ignore trailing zero words, so sets built with different capacities
//! still compare equal.

use std::hash::{Hash, Hasher};

const BITS_PER_WORD: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct BitSet {
    words: Vec<u64>,
    count: usize,
}

impl BitSet {
    /// Creates an empty set.
    pub fn empty() -> Self {
        BitSet::default()
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let word = index / BITS_PER_WORD;
        word < self.words.len() && self.words[word] >> (index % BITS_PER_WORD) & 1 == 1
    }

    /// Adds `index`. Returns true if it was not already present.
    pub fn insert(&mut self, index: usize) -> bool {
        let word = index / BITS_PER_WORD;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << (index % BITS_PER_WORD);
        let was_clear = self.words[word] & mask == 0;
        if was_clear {
            self.words[word] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Removes `index`. Returns true if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        let word = index / BITS_PER_WORD;
        if word >= self.words.len() {
            return false;
        }
        let mask = 1u64 << (index % BITS_PER_WORD);
        let was_set = self.words[word] & mask != 0;
        if was_set {
            self.words[word] &= !mask;
            self.count -= 1;
        }
        was_set
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.count = 0;
    }

    /// The smallest member, if any.
    pub fn first(&self) -> Option<usize> {
        for (i, &w) in self.words.iter().enumerate() {
            if w != 0 {
                return Some(i * BITS_PER_WORD + w.trailing_zeros() as usize);
            }
        }
        None
    }

    /// Adds every member of `other`.
    pub fn union_with(&mut self, other: &BitSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let mut count = 0;
        for (i, w) in self.words.iter_mut().enumerate() {
            *w |= other.words.get(i).copied().unwrap_or(0);
            count += w.count_ones() as usize;
        }
        self.count = count;
    }

    /// The members shared with `other`, as a new set.
    pub fn intersection(&self, other: &BitSet) -> BitSet {
        let n = self.words.len().min(other.words.len());
        let mut words = Vec::with_capacity(n);
        let mut count = 0;
        for i in 0..n {
            let w = self.words[i] & other.words[i];
            count += w.count_ones() as usize;
            words.push(w);
        }
        BitSet { words, count }
    }

    /// True if the two sets share at least one member.
    pub fn intersects(&self, other: &BitSet) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    pub fn is_disjoint(&self, other: &BitSet) -> bool {
        !self.intersects(other)
    }

    /// True if every member of `self` is in `other`.
    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| {
            let o = other.words.get(i).copied().unwrap_or(0);
            w & !o == 0
        })
    }

    /// XOR fold of one-hot member positions reduced mod 32; the same
    /// structural hash shape the cubes use.
    pub fn fold_hash(&self) -> u32 {
        self.iter().fold(0u32, |h, i| h ^ 1u32.wrapping_shl(i as u32))
    }

    /// Iterates members in ascending order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            set: self,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator over members of a [`BitSet`].
pub struct BitSetIter<'a> {
    set: &'a BitSet,
    word_idx: usize,
    current: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * BITS_PER_WORD + bit);
            }
            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current = self.set.words[self.word_idx];
        }
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }
        let n = self.words.len().max(other.words.len());
        (0..n).all(|i| {
            self.words.get(i).copied().unwrap_or(0) == other.words.get(i).copied().unwrap_or(0)
        })
    }
}

impl Eq for BitSet {}

impl Hash for BitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let last = self
            .words
            .iter()
            .rposition(|&w| w != 0)
            .map_or(0, |i| i + 1);
        self.words[..last].hash(state);
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = BitSet::empty();
        for i in iter {
            set.insert(i);
        }
        set
    }
}
