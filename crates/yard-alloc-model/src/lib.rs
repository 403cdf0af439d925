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

//! # Yard Allocation Model (`yard-alloc-model`)
//!
//! The data model of a single container-yard storage block, built on the value
//! types of `yard-alloc-core`.
//!
//! ## Key Data Structures
//!
//! - **`Group`**: an arrival batch of same-size containers that dwell together.
//!   Shared between its members as `Rc<Group>`.
//!
//! - **`Container`**: one container, shared as `ContainerRef`. It knows its
//!   group, the block it was assigned to (settable once) and its current slot.
//!
//! - **`BlockLayout`**: the fixed envelope of a block (bays, rows, tiers).
//!
//! - **`Block`** and **`Bay`**: the bay topology of a block. Bays are opened
//!   lazily, one size class per bay, following the heuristics in
//!   [`Block::select_bay_for_stacking`](block::Block::select_bay_for_stacking)
//!   and [`Bay::select_row_for_stacking`](bay::Bay::select_row_for_stacking).
//!
//! - **`GroupRoster`**: the groups currently dwelling in the yard.
//!
//! - **`ArrivalGenerator`**: seeded synthetic arrivals for demos and benches.
//!
//! None of these types are `Send`; a block and everything stacked in it is
//! driven from a single thread.

pub mod bay;
pub mod block;
pub mod container;
pub mod err;
pub mod generator;
pub mod group;
pub mod roster;

pub mod prelude {
    pub use crate::bay::{Bay, MAX_ROW_SPREAD};
    pub use crate::block::{Block, BlockLayout};
    pub use crate::container::{Container, ContainerRef};
    pub use crate::err::{
        BayOutOfRangeError, BayPlacementError, BayStackError, BlockAlreadyAssignedError,
        BlockError, BlockLayoutError,
    };
    pub use crate::generator::{
        ArrivalGenConfig, ArrivalGenConfigBuildError, ArrivalGenConfigBuilder, ArrivalGenerator,
    };
    pub use crate::group::Group;
    pub use crate::roster::{GroupRoster, RosterEntry};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(BlockLayout: Copy, Send, Sync, Eq, std::hash::Hash);
    assert_impl_all!(BlockError: std::error::Error, Copy);
    assert_not_impl_any!(Container: Send, Sync);
    assert_not_impl_any!(ContainerRef: Send, Sync);
}
