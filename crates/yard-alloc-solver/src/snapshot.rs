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

use std::fmt::Display;
use yard_alloc_core::prelude::*;

/// One container as it appears in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotItem {
    pub container: ContainerId,
    pub size_class: SizeClass,
    pub group: GroupId,
}

/// A non-empty ground stack, bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    column: GroundColumn,
    row: usize,
    flipped_layers: u32,
    items: Vec<SnapshotItem>,
}

impl SnapshotEntry {
    #[inline]
    pub(crate) fn new(
        column: GroundColumn,
        row: usize,
        flipped_layers: u32,
        items: Vec<SnapshotItem>,
    ) -> Self {
        Self {
            column,
            row,
            flipped_layers,
            items,
        }
    }

    #[inline]
    pub fn column(&self) -> GroundColumn {
        self.column
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn flipped_layers(&self) -> u32 {
        self.flipped_layers
    }

    #[inline]
    pub fn items(&self) -> &[SnapshotItem] {
        &self.items
    }
}

impl Display for SnapshotEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GS({},{}) h={}:", self.column, self.row, self.height())?;
        for (i, item) in self.items.iter().enumerate() {
            let sep = if i == 0 { " " } else { " | " };
            write!(
                f,
                "{sep}{:06}({}/{})",
                item.container.value(),
                item.size_class,
                item.group.value()
            )?;
        }
        Ok(())
    }
}

/// Point-in-time dump of a block's ground stacks, ordered by column and row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    block: BlockId,
    entries: Vec<SnapshotEntry>,
}

impl InventorySnapshot {
    #[inline]
    pub(crate) fn new(block: BlockId, mut entries: Vec<SnapshotEntry>) -> Self {
        entries.sort_by_key(|e| (e.column, e.row));
        Self { block, entries }
    }

    #[inline]
    pub fn block(&self) -> BlockId {
        self.block
    }

    #[inline]
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Display for InventorySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Inventory snapshot of {}", self.block)?;
        if self.entries.is_empty() {
            return writeln!(f, "  (empty)");
        }
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, size_class: SizeClass, group: u64) -> SnapshotItem {
        SnapshotItem {
            container: ContainerId::new(id),
            size_class,
            group: GroupId::new(group),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = InventorySnapshot::new(BlockId::new(1), Vec::new());
        assert!(snap.is_empty());
        assert_eq!(snap.to_string(), "Inventory snapshot of BlockId(1)\n  (empty)\n");
    }

    #[test]
    fn test_entries_are_ordered_and_formatted() {
        let snap = InventorySnapshot::new(
            BlockId::new(2),
            vec![
                SnapshotEntry::new(GroundColumn::new(2), 1, 0, vec![item(5, SizeClass::Long, 3)]),
                SnapshotEntry::new(
                    GroundColumn::new(1),
                    4,
                    1,
                    vec![item(1, SizeClass::Short, 7), item(12, SizeClass::Short, 7)],
                ),
            ],
        );

        assert_eq!(snap.entries()[0].column(), GroundColumn::new(1));
        assert_eq!(
            snap.to_string(),
            "Inventory snapshot of BlockId(2)\n  GS(1,4) h=2: 000001(20/7) | 000012(20/7)\n  GS(2,1) h=1: 000005(40/3)\n"
        );
    }
}
