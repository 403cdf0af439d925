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

use crate::{container::Container, err::BayStackError};
use rand::{Rng, seq::IndexedRandom};
use yard_alloc_core::prelude::*;

/// Rows may not rise more than this many tiers above the lowest row of a bay.
pub const MAX_ROW_SPREAD: usize = 4;

/// One vertical partition of a block, dedicated to a single size class.
///
/// Holds one stack per row, bottom to top. Row numbers are 1-based in the
/// public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bay {
    index: BayIndex,
    size_class: SizeClass,
    max_tiers: usize,
    stacks: Vec<Vec<ContainerId>>,
}

impl Bay {
    pub(crate) fn new(
        index: BayIndex,
        size_class: SizeClass,
        row_count: usize,
        max_tiers: usize,
    ) -> Self {
        Self {
            index,
            size_class,
            max_tiers,
            stacks: vec![Vec::new(); row_count],
        }
    }

    #[inline]
    pub fn index(&self) -> BayIndex {
        self.index
    }

    #[inline]
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.stacks.len()
    }

    #[inline]
    pub fn max_tiers(&self) -> usize {
        self.max_tiers
    }

    /// Stack height of `row`, or `None` for an unknown row.
    #[inline]
    pub fn height(&self, row: usize) -> Option<usize> {
        self.row(row).map(<[ContainerId]>::len)
    }

    #[inline]
    pub fn row(&self, row: usize) -> Option<&[ContainerId]> {
        row.checked_sub(1)
            .and_then(|i| self.stacks.get(i))
            .map(Vec::as_slice)
    }

    pub fn heights(&self) -> impl Iterator<Item = usize> + '_ {
        self.stacks.iter().map(Vec::len)
    }

    pub fn container_count(&self) -> usize {
        self.heights().sum()
    }

    #[inline]
    pub fn teus(&self) -> usize {
        self.container_count() * self.size_class.teus()
    }

    pub fn is_full(&self) -> bool {
        self.heights().all(|h| h >= self.max_tiers)
    }

    /// Picks a row for the next container, uniformly among the legal ones.
    ///
    /// A row is legal when it is below the tier limit, not more than
    /// [`MAX_ROW_SPREAD`] tiers above the lowest row, not taller than either
    /// neighbour, and not level with a neighbour while some row further out on
    /// that side is taller. The last rule keeps low pockets from being closed
    /// in between taller rows.
    pub fn select_row_for_stacking<R>(&self, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        let heights: Vec<usize> = self.heights().collect();
        let n = heights.len();
        let lowest = heights.iter().copied().min()?;

        let candidates: Vec<usize> = (0..n)
            .filter(|&i| {
                let h = heights[i];
                if h >= self.max_tiers || h >= lowest + MAX_ROW_SPREAD {
                    return false;
                }
                if i + 1 < n && h > heights[i + 1] {
                    return false;
                }
                if i > 0 && h > heights[i - 1] {
                    return false;
                }
                if i + 2 < n && h == heights[i + 1] && heights[i + 2..].iter().any(|&o| o > h) {
                    return false;
                }
                if i >= 2 && h == heights[i - 1] && heights[..i - 1].iter().any(|&o| o > h) {
                    return false;
                }
                true
            })
            .map(|i| i + 1)
            .collect();

        candidates.choose(rng).copied()
    }

    /// Pushes `container` on top of `row` and returns the tier it landed on.
    pub fn stack(&mut self, container: &Container, row: usize) -> Result<usize, BayStackError> {
        if container.size_class() != self.size_class {
            return Err(BayStackError::SizeMismatch {
                bay: self.size_class,
                container: container.size_class(),
            });
        }
        let row_count = self.stacks.len();
        let stack = row
            .checked_sub(1)
            .and_then(|i| self.stacks.get_mut(i))
            .ok_or(BayStackError::RowOutOfRange { row, row_count })?;
        if stack.len() >= self.max_tiers {
            return Err(BayStackError::RowFull {
                row,
                max_tiers: self.max_tiers,
            });
        }
        stack.push(container.id());
        Ok(stack.len())
    }
}
