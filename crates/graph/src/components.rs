use std::collections::HashMap;

use crate::view::GraphView;

/// Union-Find (disjoint set) with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Weakly-connected components as dense indices, largest first.
///
/// Components of equal size keep the order of their first member in the
/// graph; members are listed in graph order.
pub fn component_indices(view: &GraphView) -> Vec<Vec<usize>> {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);
    for (s, targets) in view.outgoing.iter().enumerate() {
        for &t in targets {
            uf.union(s, t);
        }
    }

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(i);
    }

    // Stable: ties stay in first-seen order.
    components.sort_by(|a, b| b.len().cmp(&a.len()));
    components
}
