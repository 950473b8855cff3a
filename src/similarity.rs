//! Set and vector similarity, plus disjoint-set grouping

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Two empty sets are identical, so `jaccard(∅, ∅) == 1`.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Sparse vector: `(term index, value)` pairs sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Cosine similarity of two index-sorted sparse vectors.
///
/// Zero when either vector has zero norm.
pub fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let norm_a = a.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Union-find over arbitrary keys with path compression and union by size.
///
/// Groups depend only on which pairs were unioned, never on the order of
/// the unions.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    index: HashMap<T, usize>,
    keys: Vec<T>,
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl<T: Clone + Eq + Hash + Ord> Default for DisjointSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash + Ord> DisjointSet<T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            parent: Vec::new(),
            size: Vec::new(),
        }
    }

    fn slot(&mut self, key: &T) -> usize {
        if let Some(&i) = self.index.get(key) {
            return i;
        }
        let i = self.keys.len();
        self.index.insert(key.clone(), i);
        self.keys.push(key.clone());
        self.parent.push(i);
        self.size.push(1);
        i
    }

    fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    /// Merge the groups containing `a` and `b`, inserting either if new
    pub fn union(&mut self, a: &T, b: &T) {
        let ia = self.slot(a);
        let ib = self.slot(b);
        let (ra, rb) = (self.find(ia), self.find(ib));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    /// Whether both keys are known and share a group
    pub fn connected(&mut self, a: &T, b: &T) -> bool {
        match (self.index.get(a).copied(), self.index.get(b).copied()) {
            (Some(ia), Some(ib)) => self.find(ia) == self.find(ib),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All groups, each sorted, ordered by their smallest member
    pub fn groups(&mut self) -> Vec<BTreeSet<T>> {
        let mut by_root: BTreeMap<usize, BTreeSet<T>> = BTreeMap::new();
        for i in 0..self.keys.len() {
            let root = self.find(i);
            by_root.entry(root).or_default().insert(self.keys[i].clone());
        }
        let mut groups: Vec<BTreeSet<T>> = by_root.into_values().collect();
        groups.sort_by(|a, b| a.iter().next().cmp(&b.iter().next()));
        groups
    }
}
