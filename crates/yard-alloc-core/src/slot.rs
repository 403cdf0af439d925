// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{id::BlockId, size::SizeClass};
use std::fmt::Display;

/// A bay number inside a block.
///
/// Bays use an interleaved scheme: odd numbers are short-class bays, each of
/// which owns exactly one ground column, and even numbers are long-class bays
/// that straddle the odd bays directly left and right of them. A block with
/// `n` short bays therefore has valid bay numbers `1..=2n-1`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BayIndex(usize);

impl BayIndex {
    #[inline]
    pub const fn new(index: usize) -> Self {
        BayIndex(index)
    }

    #[inline]
    pub const fn value(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The size class a bay of this parity is dedicated to.
    #[inline]
    pub const fn size_class(self) -> SizeClass {
        if self.0 % 2 == 0 {
            SizeClass::Long
        } else {
            SizeClass::Short
        }
    }

    #[inline]
    pub const fn matches(self, size_class: SizeClass) -> bool {
        self.0 % 2 == size_class.teus() % 2
    }

    /// The normalized ground column of this bay.
    ///
    /// Odd bay `2k-1` maps to column `k`. Even bay `2k` maps to column `k`,
    /// which is the left of the two columns it straddles.
    #[inline]
    pub const fn column(self) -> GroundColumn {
        if self.0 % 2 == 0 {
            GroundColumn(self.0 / 2)
        } else {
            GroundColumn(self.0.div_ceil(2))
        }
    }

    /// Short bay on the lower side of a long bay.
    #[inline]
    pub const fn left(self) -> BayIndex {
        BayIndex(self.0.saturating_sub(1))
    }

    /// Short bay on the upper side of a long bay.
    #[inline]
    pub const fn right(self) -> BayIndex {
        BayIndex(self.0 + 1)
    }

    /// Shifts the index by `delta`, returning `None` when the result would
    /// drop below bay 1.
    #[inline]
    pub fn checked_offset(self, delta: isize) -> Option<BayIndex> {
        self.0
            .checked_add_signed(delta)
            .filter(|&b| b >= 1)
            .map(BayIndex)
    }

    #[inline]
    pub const fn distance(self, other: BayIndex) -> usize {
        self.0.abs_diff(other.0)
    }
}

impl Display for BayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bay({})", self.0)
    }
}

impl From<usize> for BayIndex {
    #[inline]
    fn from(value: usize) -> Self {
        BayIndex(value)
    }
}

/// A normalized, contiguous `1..=bay_count` ground column.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GroundColumn(usize);

impl GroundColumn {
    #[inline]
    pub const fn new(column: usize) -> Self {
        GroundColumn(column)
    }

    #[inline]
    pub const fn value(self) -> usize {
        self.0
    }

    /// The short bay that owns this column.
    #[inline]
    pub const fn short_bay(self) -> BayIndex {
        BayIndex((self.0 * 2).saturating_sub(1))
    }
}

impl Display for GroundColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(bay, row, tier)` address inside a block. Rows and tiers are 1-based,
/// tier 1 being the ground level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    bay: BayIndex,
    row: usize,
    tier: usize,
}

impl Slot {
    #[inline]
    pub const fn new(bay: BayIndex, row: usize, tier: usize) -> Self {
        Self { bay, row, tier }
    }

    #[inline]
    pub const fn bay(&self) -> BayIndex {
        self.bay
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub const fn tier(&self) -> usize {
        self.tier
    }

    /// A slot with any zero coordinate does not address a real position.
    #[inline]
    pub const fn is_set(&self) -> bool {
        !self.bay.is_zero() && self.row != 0 && self.tier != 0
    }

    /// The ground level slot of the same bay and row.
    #[inline]
    pub const fn ground(&self) -> Slot {
        self.with_tier(1)
    }

    #[inline]
    pub const fn with_tier(&self, tier: usize) -> Slot {
        Slot {
            bay: self.bay,
            row: self.row,
            tier,
        }
    }
}

impl From<(usize, usize, usize)> for Slot {
    #[inline]
    fn from((bay, row, tier): (usize, usize, usize)) -> Self {
        Slot::new(BayIndex::new(bay), row, tier)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slot(bay={}, row={}, tier={})",
            self.bay.value(),
            self.row,
            self.tier
        )
    }
}

/// Address of a single ground stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroundKey {
    block: BlockId,
    column: GroundColumn,
    row: usize,
}

impl GroundKey {
    #[inline]
    pub const fn new(block: BlockId, column: GroundColumn, row: usize) -> Self {
        Self { block, column, row }
    }

    /// Ground stack addressed by `bay` and `row`, ignoring the tier.
    #[inline]
    pub const fn of_bay(block: BlockId, bay: BayIndex, row: usize) -> Self {
        Self::new(block, bay.column(), row)
    }

    #[inline]
    pub const fn block(&self) -> BlockId {
        self.block
    }

    #[inline]
    pub const fn column(&self) -> GroundColumn {
        self.column
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }
}

impl Display for GroundKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GS({}, {}, {})",
            self.block.value(),
            self.column,
            self.row
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Slot: Copy, Send, Sync, Eq, std::hash::Hash);
    assert_impl_all!(GroundKey: Copy, Send, Sync, Eq, std::hash::Hash);

    #[test]
    fn test_bay_parity_matches_size_class() {
        assert_eq!(BayIndex::new(1).size_class(), SizeClass::Short);
        assert_eq!(BayIndex::new(2).size_class(), SizeClass::Long);
        assert!(BayIndex::new(3).matches(SizeClass::Short));
        assert!(!BayIndex::new(3).matches(SizeClass::Long));
        assert!(BayIndex::new(4).matches(SizeClass::Long));
    }

    #[test]
    fn test_column_normalization_is_contiguous() {
        let columns: Vec<usize> = [1, 3, 5, 7, 9]
            .into_iter()
            .map(|b| BayIndex::new(b).column().value())
            .collect();
        assert_eq!(columns, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_long_bay_straddles_adjacent_columns() {
        for even in [2usize, 4, 6, 8] {
            let bay = BayIndex::new(even);
            assert_eq!(bay.left().column(), bay.column());
            assert_eq!(bay.right().column().value(), bay.column().value() + 1);
            assert_eq!(bay.left().column().short_bay(), bay.left());
        }
    }

    #[test]
    fn test_checked_offset_stops_at_bay_one() {
        let bay = BayIndex::new(2);
        assert_eq!(bay.checked_offset(-1), Some(BayIndex::new(1)));
        assert_eq!(bay.checked_offset(-2), None);
        assert_eq!(bay.checked_offset(-3), None);
        assert_eq!(bay.checked_offset(3), Some(BayIndex::new(5)));
    }

    #[test]
    fn test_slot_is_set_requires_all_coordinates() {
        assert!(Slot::from((1, 1, 1)).is_set());
        assert!(!Slot::from((0, 1, 1)).is_set());
        assert!(!Slot::from((1, 0, 1)).is_set());
        assert!(!Slot::from((1, 1, 0)).is_set());
    }

    #[test]
    fn test_slot_ground_and_with_tier() {
        let slot = Slot::from((3, 2, 4));
        assert_eq!(slot.ground(), Slot::from((3, 2, 1)));
        assert_eq!(slot.with_tier(2).tier(), 2);
        assert_eq!(slot.to_string(), "Slot(bay=3, row=2, tier=4)");
    }

    #[test]
    fn test_ground_key_of_bay_uses_column() {
        let block = BlockId::new(1);
        let a = GroundKey::of_bay(block, BayIndex::new(4), 2);
        let b = GroundKey::of_bay(block, BayIndex::new(3), 2);
        assert_eq!(a, b);
        assert_eq!(a.column(), GroundColumn::new(2));
    }
}
