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

use crate::{
    bay::Bay,
    container::Container,
    err::{BayOutOfRangeError, BayPlacementError, BlockError, BlockLayoutError},
};
use rand::{Rng, seq::IndexedRandom};
use std::{collections::BTreeMap, fmt::Display, ops::RangeInclusive};
use tracing::trace;
use yard_alloc_core::prelude::*;

/// The fixed spatial envelope of a block.
///
/// `bay_count` counts the short bays (and hence the ground columns), so the
/// interleaved bay numbers run `1..=2 * bay_count - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockLayout {
    id: BlockId,
    bay_count: usize,
    row_count: usize,
    max_tiers: usize,
}

impl BlockLayout {
    pub fn new(
        id: BlockId,
        bay_count: usize,
        row_count: usize,
        max_tiers: usize,
    ) -> Result<Self, BlockLayoutError> {
        if bay_count == 0 {
            return Err(BlockLayoutError::ZeroBays);
        }
        if row_count == 0 {
            return Err(BlockLayoutError::ZeroRows);
        }
        if max_tiers == 0 {
            return Err(BlockLayoutError::ZeroTiers);
        }
        Ok(Self {
            id,
            bay_count,
            row_count,
            max_tiers,
        })
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn bay_count(&self) -> usize {
        self.bay_count
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn max_tiers(&self) -> usize {
        self.max_tiers
    }

    #[inline]
    pub fn max_bay(&self) -> BayIndex {
        BayIndex::new(self.bay_count * 2 - 1)
    }

    #[inline]
    pub fn contains_bay(&self, bay: BayIndex) -> bool {
        (1..=self.max_bay().value()).contains(&bay.value())
    }

    #[inline]
    pub fn rows(&self) -> RangeInclusive<usize> {
        1..=self.row_count
    }

    /// One TEU per ground column and tier.
    #[inline]
    pub fn capacity_teus(&self) -> usize {
        self.bay_count * self.row_count * self.max_tiers
    }

    /// All bay numbers hosting `size_class`, in ascending order. Long bays
    /// need a short bay on either side, so they run `2..=max_bay - 1`.
    pub fn bays_of(&self, size_class: SizeClass) -> impl Iterator<Item = BayIndex> + use<> {
        let (first, last) = match size_class {
            SizeClass::Short => (1, self.max_bay().value()),
            SizeClass::Long => (2, self.max_bay().value() - 1),
        };
        (first..=last).step_by(2).map(BayIndex::new)
    }
}

impl Display for BlockLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Block#{} ({} bays x {} rows x {} tiers)",
            self.id.value(),
            self.bay_count,
            self.row_count,
            self.max_tiers
        )
    }
}

/// Bay topology of a block.
///
/// Bays are opened lazily as containers arrive. The block only tracks which
/// bays exist and what each one has stacked through [`Block::stack_container`];
/// the authoritative ground occupancy lives in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    layout: BlockLayout,
    bays: BTreeMap<BayIndex, Bay>,
}

impl From<BlockLayout> for Block {
    fn from(layout: BlockLayout) -> Self {
        Self::new(layout)
    }
}

impl Block {
    #[inline]
    pub fn new(layout: BlockLayout) -> Self {
        Self {
            layout,
            bays: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.layout.id()
    }

    #[inline]
    pub fn bay(&self, index: BayIndex) -> Option<&Bay> {
        self.bays.get(&index)
    }

    pub fn bays(&self) -> impl Iterator<Item = &Bay> + '_ {
        self.bays.values()
    }

    pub fn container_count(&self) -> usize {
        self.bays.values().map(Bay::container_count).sum()
    }

    pub fn teus(&self) -> usize {
        self.bays.values().map(Bay::teus).sum()
    }

    #[inline]
    fn occupied(&self, bay: BayIndex, delta: isize) -> bool {
        bay.checked_offset(delta)
            .is_some_and(|b| self.bays.contains_key(&b))
    }

    fn average_load(&self, size_class: SizeClass) -> f64 {
        let (count, total) = self
            .bays
            .values()
            .filter(|b| b.size_class() == size_class)
            .fold((0usize, 0usize), |(n, sum), b| (n + 1, sum + b.container_count()));
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    fn has_bays_of(&self, size_class: SizeClass) -> bool {
        self.bays.values().any(|b| b.size_class() == size_class)
    }

    /// Chooses the bay the next `size_class` container should go into.
    ///
    /// Existing bays that still have room are always candidates. A new bay
    /// may only be opened where it keeps the occupied span contiguous and
    /// does not collide with a bay of the other class. New short bays are
    /// preferred while the short bays are at least as loaded as the long
    /// ones, and new long bays otherwise. The result is drawn uniformly from
    /// all candidates.
    pub fn select_bay_for_stacking<R>(&self, size_class: SizeClass, rng: &mut R) -> Option<BayIndex>
    where
        R: Rng + ?Sized,
    {
        let short_gate_open =
            self.average_load(SizeClass::Short) >= self.average_load(SizeClass::Long);
        let mut candidates = Vec::new();

        match size_class {
            SizeClass::Short => {
                let has_short = self.has_bays_of(SizeClass::Short);
                for bay in self.layout.bays_of(SizeClass::Short) {
                    if self.bays.is_empty() {
                        candidates.push(bay);
                        break;
                    }
                    if let Some(existing) = self.bays.get(&bay) {
                        if !existing.is_full() {
                            candidates.push(bay);
                        }
                        continue;
                    }

                    let closes_gap = (bay.value() == 1
                        || self.occupied(bay, -2)
                        || self.occupied(bay, -3))
                        && (self.occupied(bay, 2)
                            || self.occupied(bay, 3)
                            || bay == self.layout.max_bay());
                    if !(!has_short || closes_gap || short_gate_open) {
                        continue;
                    }
                    if self.occupied(bay, -1) || self.occupied(bay, 1) {
                        continue;
                    }
                    let attached = [-3, -2, 2, 3].iter().any(|&d| self.occupied(bay, d));
                    if attached {
                        candidates.push(bay);
                    }
                }
            }
            SizeClass::Long => {
                let has_long = self.has_bays_of(SizeClass::Long);
                for bay in self.layout.bays_of(SizeClass::Long) {
                    if let Some(existing) = self.bays.get(&bay) {
                        if !existing.is_full() {
                            candidates.push(bay);
                        }
                        continue;
                    }
                    if has_long && short_gate_open {
                        continue;
                    }
                    let isolated = [-2, -1, 1, 2].iter().all(|&d| !self.occupied(bay, d));
                    if isolated {
                        candidates.push(bay);
                    }
                }
            }
        }

        trace!(?size_class, candidates = candidates.len(), "Bay candidates");
        candidates.choose(rng).copied()
    }

    /// Returns the bay at `index`, opening it for `size_class` if needed.
    ///
    /// Opening fails when the index is outside the block, when a directly
    /// adjacent bay is in use, or, for long bays, when another long bay two
    /// positions away would share a ground column.
    pub fn create_bay_if_absent(
        &mut self,
        index: BayIndex,
        size_class: SizeClass,
    ) -> Result<&mut Bay, BayPlacementError> {
        if !self.bays.contains_key(&index) {
            if !self.layout.contains_bay(index) {
                return Err(BayOutOfRangeError::new(index, self.layout.max_bay()).into());
            }
            if !index.matches(size_class) {
                return Err(BayPlacementError::SizeMismatch {
                    bay: index,
                    size_class,
                });
            }
            for delta in [-1, 1] {
                if self.occupied(index, delta) {
                    return Err(BayPlacementError::AdjacentOccupied {
                        bay: index,
                        neighbour: index.checked_offset(delta).unwrap_or_default(),
                    });
                }
            }
            if size_class.is_long() {
                for delta in [-2, 2] {
                    if self.occupied(index, delta) {
                        return Err(BayPlacementError::LongBayCrowded {
                            bay: index,
                            neighbour: index.checked_offset(delta).unwrap_or_default(),
                        });
                    }
                }
            }
        }

        let layout = self.layout;
        Ok(self
            .bays
            .entry(index)
            .or_insert_with(|| Bay::new(index, size_class, layout.row_count(), layout.max_tiers())))
    }

    /// Places `container` following the bay and row heuristics and returns
    /// the slot it landed in, or `None` when no bay or row can take it.
    pub fn stack_container<R>(
        &mut self,
        container: &Container,
        rng: &mut R,
    ) -> Result<Option<Slot>, BlockError>
    where
        R: Rng + ?Sized,
    {
        let Some(bay) = self.select_bay_for_stacking(container.size_class(), rng) else {
            return Ok(None);
        };
        self.stack_container_in_bay(container, bay, rng)
    }

    /// Like [`Block::stack_container`] but with a caller-chosen bay.
    pub fn stack_container_in_bay<R>(
        &mut self,
        container: &Container,
        bay: BayIndex,
        rng: &mut R,
    ) -> Result<Option<Slot>, BlockError>
    where
        R: Rng + ?Sized,
    {
        let target = self.create_bay_if_absent(bay, container.size_class())?;
        let Some(row) = target.select_row_for_stacking(rng) else {
            return Ok(None);
        };
        let tier = target.stack(container, row)?;
        Ok(Some(Slot::new(bay, row, tier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::{collections::BTreeSet, rc::Rc};

    fn layout(bays: usize, rows: usize, tiers: usize) -> BlockLayout {
        BlockLayout::new(BlockId::new(1), bays, rows, tiers).unwrap()
    }

    fn container(id: u64, size_class: SizeClass) -> Container {
        Container::new(
            ContainerId::new(id),
            Rc::new(Group::new(GroupId::new(1), size_class, 1, 0)),
        )
    }

    fn candidates(block: &Block, size_class: SizeClass) -> BTreeSet<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        (0..400)
            .filter_map(|_| block.select_bay_for_stacking(size_class, &mut rng))
            .map(BayIndex::value)
            .collect()
    }

    #[test]
    fn test_layout_rejects_zero_dimensions() {
        assert_eq!(
            BlockLayout::new(BlockId::new(1), 0, 8, 4),
            Err(BlockLayoutError::ZeroBays)
        );
        assert_eq!(
            BlockLayout::new(BlockId::new(1), 5, 0, 4),
            Err(BlockLayoutError::ZeroRows)
        );
        assert_eq!(
            BlockLayout::new(BlockId::new(1), 5, 8, 0),
            Err(BlockLayoutError::ZeroTiers)
        );
    }

    #[test]
    fn test_layout_bay_ranges() {
        let l = layout(5, 8, 4);
        assert_eq!(l.max_bay(), BayIndex::new(9));
        assert_eq!(l.capacity_teus(), 160);
        let short: Vec<usize> = l.bays_of(SizeClass::Short).map(BayIndex::value).collect();
        let long: Vec<usize> = l.bays_of(SizeClass::Long).map(BayIndex::value).collect();
        assert_eq!(short, vec![1, 3, 5, 7, 9]);
        assert_eq!(long, vec![2, 4, 6, 8]);
        assert!(!l.contains_bay(BayIndex::new(0)));
        assert!(!l.contains_bay(BayIndex::new(10)));
    }

    #[test]
    fn test_first_short_bay_is_the_lowest_index() {
        let block = Block::new(layout(5, 8, 4));
        assert_eq!(candidates(&block, SizeClass::Short), BTreeSet::from([1]));
    }

    #[test]
    fn test_first_long_bay_may_be_any_even_index() {
        let block = Block::new(layout(5, 8, 4));
        assert_eq!(
            candidates(&block, SizeClass::Long),
            BTreeSet::from([2, 4, 6, 8])
        );
    }

    #[test]
    fn test_new_short_bays_stay_attached_to_the_occupied_span() {
        let mut block = Block::new(layout(5, 8, 4));
        block
            .create_bay_if_absent(BayIndex::new(1), SizeClass::Short)
            .unwrap();
        // Bay 3 is adjacent to the span, bays 5..9 would be bubbles.
        assert_eq!(candidates(&block, SizeClass::Short), BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_long_bay_keeps_distance_from_other_bays() {
        let mut block = Block::new(layout(5, 8, 4));
        block
            .create_bay_if_absent(BayIndex::new(1), SizeClass::Short)
            .unwrap();
        // Bay 2 touches bay 1.
        assert_eq!(
            candidates(&block, SizeClass::Long),
            BTreeSet::from([4, 6, 8])
        );
    }

    #[test]
    fn test_create_bay_rejects_illegal_indices() {
        let mut block = Block::new(layout(5, 8, 4));
        assert!(matches!(
            block.create_bay_if_absent(BayIndex::new(11), SizeClass::Short),
            Err(BayPlacementError::OutOfRange(_))
        ));
        assert!(matches!(
            block.create_bay_if_absent(BayIndex::new(0), SizeClass::Long),
            Err(BayPlacementError::OutOfRange(_))
        ));
        assert!(matches!(
            block.create_bay_if_absent(BayIndex::new(3), SizeClass::Long),
            Err(BayPlacementError::SizeMismatch { .. })
        ));

        block
            .create_bay_if_absent(BayIndex::new(4), SizeClass::Long)
            .unwrap();
        assert_eq!(
            block
                .create_bay_if_absent(BayIndex::new(5), SizeClass::Short)
                .unwrap_err(),
            BayPlacementError::AdjacentOccupied {
                bay: BayIndex::new(5),
                neighbour: BayIndex::new(4)
            }
        );
        assert_eq!(
            block
                .create_bay_if_absent(BayIndex::new(6), SizeClass::Long)
                .unwrap_err(),
            BayPlacementError::LongBayCrowded {
                bay: BayIndex::new(6),
                neighbour: BayIndex::new(4)
            }
        );
    }

    #[test]
    fn test_create_bay_returns_existing_bay() {
        let mut block = Block::new(layout(5, 8, 4));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        block
            .stack_container_in_bay(&container(1, SizeClass::Short), BayIndex::new(1), &mut rng)
            .unwrap();
        let bay = block
            .create_bay_if_absent(BayIndex::new(1), SizeClass::Short)
            .unwrap();
        assert_eq!(bay.container_count(), 1);
    }

    #[test]
    fn test_stack_container_fills_block_without_exceeding_tiers() {
        let l = layout(3, 4, 2);
        let mut block = Block::new(l);
        let mut rng = ChaCha8Rng::seed_from_u64(17);

        let mut placed = 0;
        for id in 1..=200u64 {
            let size = if id % 3 == 0 {
                SizeClass::Long
            } else {
                SizeClass::Short
            };
            match block.stack_container(&container(id, size), &mut rng).unwrap() {
                Some(slot) => {
                    placed += 1;
                    assert!(slot.tier() <= l.max_tiers());
                    assert!(slot.bay().matches(size));
                }
                None => continue,
            }
        }

        assert_eq!(block.container_count(), placed);
        assert_eq!(block.teus(), block.bays().map(Bay::teus).sum::<usize>());
        for bay in block.bays() {
            assert!(bay.heights().all(|h| h <= l.max_tiers()));
            assert_eq!(block.bay(bay.index()).map(Bay::index), Some(bay.index()));
        }
    }

    #[test]
    fn test_opened_bays_never_touch() {
        let mut block = Block::new(layout(6, 3, 2));
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for id in 1..=120u64 {
            let size = if id % 2 == 0 {
                SizeClass::Long
            } else {
                SizeClass::Short
            };
            let _ = block.stack_container(&container(id, size), &mut rng).unwrap();
        }

        let open: Vec<usize> = block.bays().map(|b| b.index().value()).collect();
        for pair in open.windows(2) {
            assert!(pair[1] - pair[0] >= 2, "bays {pair:?} are adjacent");
        }
    }
}
