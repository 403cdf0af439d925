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

//! # Yard Allocation Core (`yard-alloc-core`)
//!
//! Foundational value types shared by the yard allocation crates. Everything in
//! here is a small `Copy` value with value equality, so it can be used freely as
//! a map key or passed around by the engine without ownership concerns.
//!
//! ## Key Data Structures
//!
//! - **`ContainerId`**, **`GroupId`**, **`BlockId`**: transparent identifiers.
//! - **`SizeClass`**: the short (20 ft, 1 TEU) or long (40 ft, 2 TEU) class.
//! - **`BayIndex`**: the interleaved bay numbering of a block. Odd bays host the
//!   short class, even bays the long class, and a long bay straddles the two odd
//!   bays next to it.
//! - **`Slot`**: a `(bay, row, tier)` address inside a block.
//! - **`GroundKey`**: a `(block, normalized column, row)` address of a ground
//!   stack, which is how occupancy is keyed.

pub mod id;
pub mod size;
pub mod slot;

pub mod prelude {
    pub use crate::id::{BlockId, ContainerId, GroupId};
    pub use crate::size::SizeClass;
    pub use crate::slot::{BayIndex, GroundColumn, GroundKey, Slot};
}
