//! In-memory click selection for the playlist view.
//!
//! Replaces the original habit of reading selection state back out of the
//! rendered rows: the view renders from this set and feeds clicks into it.
//! The set is transient; it lives between a primary click and the next
//! structural update or click elsewhere and is never sent to the server.

use std::collections::BTreeSet;

/// Set of selected row indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a primary click on the given row.
    ///
    /// * a click on a selected row clears the whole selection
    /// * a click with exactly one other row selected selects the inclusive
    ///   span between the two, in either direction
    /// * any other click selects just the clicked row
    pub fn click(&mut self, index: usize) {
        if self.rows.contains(&index) {
            self.rows.clear();
            return;
        }

        if self.rows.len() == 1 {
            if let Some(&anchor) = self.rows.iter().next() {
                let (low, high) = if anchor <= index {
                    (anchor, index)
                } else {
                    (index, anchor)
                };
                self.rows = (low..=high).collect();
            }
            return;
        }

        self.rows.clear();
        self.rows.insert(index);
    }

    /// Clears the selection. Used by double clicks and by every structural
    /// playlist update.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.rows.contains(&index)
    }

    /// The selection as a half-open range `[start, end)`, provided it is
    /// non-empty and contiguous.
    #[must_use]
    pub fn contiguous_range(&self) -> Option<(usize, usize)> {
        let first = *self.rows.iter().next()?;
        let last = *self.rows.iter().next_back()?;

        if last - first + 1 == self.rows.len() {
            Some((first, last + 1))
        } else {
            None
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_selects_single_row() {
        let mut selection = Selection::new();
        selection.click(4);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn second_click_selects_span_upward() {
        let mut selection = Selection::new();
        selection.click(2);
        selection.click(5);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(selection.contiguous_range(), Some((2, 6)));
    }

    #[test]
    fn second_click_selects_span_downward() {
        let mut selection = Selection::new();
        selection.click(5);
        selection.click(2);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn click_on_selected_row_clears_everything() {
        let mut selection = Selection::new();
        selection.click(2);
        selection.click(5);
        selection.click(3);
        assert!(selection.is_empty());
    }

    #[test]
    fn click_with_larger_selection_starts_over() {
        let mut selection = Selection::new();
        selection.click(2);
        selection.click(5);
        selection.click(8);
        assert_eq!(selection.indices().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn range_must_be_contiguous() {
        let mut selection = Selection::new();
        selection.click(1);
        assert_eq!(selection.contiguous_range(), Some((1, 2)));

        // Force a gap the click rules alone cannot produce today.
        selection.rows.insert(3);
        assert_eq!(selection.contiguous_range(), None);
    }
}
