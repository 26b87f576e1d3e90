#![forbid(unsafe_code)]

//! Origin/destination coordinate pairs for one drag.
//!
//! A drag source stamps `from` when the drag starts; drop targets write `to`
//! while they own the drag point. Comparing the two is how callers tell a
//! real move from dropping an item back where it came from.

/// Row index pair within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowPosition {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

impl RowPosition {
    /// Create a row pair.
    #[must_use]
    pub const fn new(from: Option<usize>, to: Option<usize>) -> Self {
        Self { from, to }
    }

    /// A pair that has left `row` and not yet arrived anywhere.
    #[must_use]
    pub const fn origin(row: usize) -> Self {
        Self::new(Some(row), None)
    }

    /// Returns `true` if origin and destination differ.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.from != self.to
    }
}

/// Column key pair. `K` identifies a column or bucket (an enum, an id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnPosition<K> {
    pub from: Option<K>,
    pub to: Option<K>,
}

impl<K> Default for ColumnPosition<K> {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
        }
    }
}

impl<K: PartialEq> ColumnPosition<K> {
    /// Create a column pair.
    #[must_use]
    pub const fn new(from: Option<K>, to: Option<K>) -> Self {
        Self { from, to }
    }

    /// A pair that has left `column` and not yet arrived anywhere.
    #[must_use]
    pub const fn origin(column: K) -> Self {
        Self::new(Some(column), None)
    }

    /// Returns `true` if origin and destination differ.
    ///
    /// This is the authoritative move check: `false` means the item would
    /// land back in the column it came from.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.from != self.to
    }
}

/// Row and column pairs of one drag, taken together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPosition<K> {
    pub row: RowPosition,
    pub column: ColumnPosition<K>,
}

impl<K: PartialEq> ItemPosition<K> {
    /// Create an item position.
    #[must_use]
    pub const fn new(row: RowPosition, column: ColumnPosition<K>) -> Self {
        Self { row, column }
    }

    /// Whether the item changes column.
    ///
    /// Reordering rows inside one column is left to the caller, so only the
    /// column pair decides.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.column.can_move()
    }
}

impl<K: Default> Default for ItemPosition<K> {
    fn default() -> Self {
        Self {
            row: RowPosition::default(),
            column: ColumnPosition::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_can_move_iff_from_differs_from_to() {
        assert!(!RowPosition::default().can_move());
        assert!(RowPosition::origin(2).can_move());
        assert!(!RowPosition::new(Some(2), Some(2)).can_move());
        assert!(RowPosition::new(Some(2), Some(3)).can_move());
    }

    #[test]
    fn column_can_move_iff_from_differs_from_to() {
        assert!(!ColumnPosition::<&str>::default().can_move());
        assert!(ColumnPosition::new(Some("A"), Some("B")).can_move());
        assert!(!ColumnPosition::new(Some("A"), Some("A")).can_move());
        assert!(ColumnPosition::origin("A").can_move());
    }

    #[test]
    fn item_position_ignores_row_reorder() {
        let same_column = ItemPosition::new(
            RowPosition::new(Some(0), Some(3)),
            ColumnPosition::new(Some('x'), Some('x')),
        );
        assert!(same_column.row.can_move());
        assert!(!same_column.can_move());

        let across = ItemPosition::new(
            RowPosition::new(Some(0), Some(0)),
            ColumnPosition::new(Some('x'), Some('y')),
        );
        assert!(across.can_move());
    }
}
