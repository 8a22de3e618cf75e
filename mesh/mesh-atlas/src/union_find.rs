//! Disjoint-set (union-find) with path compression.

#[derive(Debug)]
pub(crate) struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).map(index_u32).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Compress
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Union by rank. Returns `true` if `a` and `b` were in different sets.
    pub(crate) fn union(&mut self, a: u32, b: u32) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (ra_idx, rb_idx) = (ra as usize, rb as usize);
        match self.rank[ra_idx].cmp(&self.rank[rb_idx]) {
            std::cmp::Ordering::Less => self.parent[ra_idx] = rb,
            std::cmp::Ordering::Greater => self.parent[rb_idx] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb_idx] = ra;
                self.rank[ra_idx] = self.rank[ra_idx].saturating_add(1);
            }
        }
        true
    }
}

/// Arena slots never exceed `u32::MAX`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn index_u32(i: usize) -> u32 {
    i as u32
}
