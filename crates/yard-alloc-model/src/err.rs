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

use yard_alloc_core::prelude::*;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockLayoutError {
    ZeroBays,
    ZeroRows,
    ZeroTiers,
}

impl Display for BlockLayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockLayoutError::ZeroBays => write!(f, "Block must have at least one bay"),
            BlockLayoutError::ZeroRows => write!(f, "Block must have at least one row"),
            BlockLayoutError::ZeroTiers => write!(f, "Block must allow at least one tier"),
        }
    }
}

impl std::error::Error for BlockLayoutError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockAlreadyAssignedError {
    container: ContainerId,
    block: BlockId,
}

impl BlockAlreadyAssignedError {
    #[inline]
    pub fn new(container: ContainerId, block: BlockId) -> Self {
        Self { container, block }
    }

    #[inline]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// The block the container was assigned to first.
    #[inline]
    pub fn block(&self) -> BlockId {
        self.block
    }
}

impl Display for BlockAlreadyAssignedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Container {} is already assigned to block {}",
            self.container, self.block
        )
    }
}

impl std::error::Error for BlockAlreadyAssignedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BayOutOfRangeError {
    bay: BayIndex,
    max_bay: BayIndex,
}

impl BayOutOfRangeError {
    #[inline]
    pub fn new(bay: BayIndex, max_bay: BayIndex) -> Self {
        Self { bay, max_bay }
    }

    #[inline]
    pub fn bay(&self) -> BayIndex {
        self.bay
    }

    #[inline]
    pub fn max_bay(&self) -> BayIndex {
        self.max_bay
    }
}

impl Display for BayOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is outside the valid range 1..={}",
            self.bay,
            self.max_bay.value()
        )
    }
}

impl std::error::Error for BayOutOfRangeError {}

/// Creating a bay at this index would violate the block topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BayPlacementError {
    OutOfRange(BayOutOfRangeError),
    /// A bay directly next to the requested one is already in use.
    AdjacentOccupied { bay: BayIndex, neighbour: BayIndex },
    /// A long bay two positions away would share a ground column.
    LongBayCrowded { bay: BayIndex, neighbour: BayIndex },
    /// The bay parity does not host the requested size class.
    SizeMismatch { bay: BayIndex, size_class: SizeClass },
}

impl Display for BayPlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BayPlacementError::OutOfRange(e) => write!(f, "{e}"),
            BayPlacementError::AdjacentOccupied { bay, neighbour } => {
                write!(f, "{bay} is infeasible: adjacent {neighbour} is occupied")
            }
            BayPlacementError::LongBayCrowded { bay, neighbour } => write!(
                f,
                "{bay} is infeasible: long {neighbour} already uses a shared column"
            ),
            BayPlacementError::SizeMismatch { bay, size_class } => {
                write!(f, "{bay} cannot host {size_class}ft containers")
            }
        }
    }
}

impl From<BayOutOfRangeError> for BayPlacementError {
    fn from(err: BayOutOfRangeError) -> Self {
        BayPlacementError::OutOfRange(err)
    }
}

impl std::error::Error for BayPlacementError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BayStackError {
    SizeMismatch {
        bay: SizeClass,
        container: SizeClass,
    },
    RowOutOfRange {
        row: usize,
        row_count: usize,
    },
    RowFull {
        row: usize,
        max_tiers: usize,
    },
}

impl Display for BayStackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BayStackError::SizeMismatch { bay, container } => write!(
                f,
                "Cannot stack a {container}ft container into a {bay}ft bay"
            ),
            BayStackError::RowOutOfRange { row, row_count } => {
                write!(f, "Row {row} is outside the valid range 1..={row_count}")
            }
            BayStackError::RowFull { row, max_tiers } => {
                write!(f, "Row {row} already holds {max_tiers} tiers")
            }
        }
    }
}

impl std::error::Error for BayStackError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockError {
    Placement(BayPlacementError),
    Stack(BayStackError),
}

impl Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::Placement(e) => write!(f, "{e}"),
            BlockError::Stack(e) => write!(f, "{e}"),
        }
    }
}

impl From<BayPlacementError> for BlockError {
    fn from(err: BayPlacementError) -> Self {
        BlockError::Placement(err)
    }
}

impl From<BayStackError> for BlockError {
    fn from(err: BayStackError) -> Self {
        BlockError::Stack(err)
    }
}

impl std::error::Error for BlockError {}
