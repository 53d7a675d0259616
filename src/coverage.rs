use std::collections::HashSet;

/// Running union of covered cells
#[derive(Debug, Clone)]
pub struct Coverage {
    covered: HashSet<i32>,
    free_cells: usize,
}

impl Coverage {
    pub fn new(free_cells: usize) -> Self {
        Coverage {
            covered: HashSet::new(),
            free_cells,
        }
    }

    /// Union `ids` into the covered set. Returns how many were new.
    pub fn absorb(&mut self, ids: &HashSet<i32>) -> usize {
        let before = self.covered.len();
        self.covered.extend(ids.iter().copied());
        self.covered.len() - before
    }

    pub fn covered(&self) -> &HashSet<i32> {
        &self.covered
    }

    pub fn contains(&self, id: i32) -> bool {
        self.covered.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.covered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }

    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    /// Every free cell is covered
    pub fn is_complete(&self) -> bool {
        self.covered.len() == self.free_cells
    }

    /// Covered share of the free cells, in percent.
    /// A grid without free cells counts as fully covered.
    pub fn percent(&self) -> f64 {
        if self.free_cells == 0 {
            return 100.0;
        }
        self.covered.len() as f64 / self.free_cells as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_counts_new_cells() {
        let mut coverage = Coverage::new(8);
        assert_eq!(coverage.absorb(&HashSet::from([1, 2, 3])), 3);
        assert_eq!(coverage.absorb(&HashSet::from([3, 4])), 1);
        assert_eq!(coverage.len(), 4);
        assert!(coverage.contains(4));
        assert_eq!(coverage.percent(), 50.0);
        assert!(!coverage.is_complete());
    }

    #[test]
    fn test_empty_and_complete() {
        let coverage = Coverage::new(5);
        assert!(coverage.is_empty());
        assert_eq!(coverage.percent(), 0.0);

        let no_free_cells = Coverage::new(0);
        assert!(no_free_cells.is_complete());
        assert_eq!(no_free_cells.percent(), 100.0);
    }
}
