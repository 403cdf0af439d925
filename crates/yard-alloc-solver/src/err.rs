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

/// A relocation could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelocateError {
    /// The container was never assigned to a block.
    Unassigned(ContainerId),
    /// The container has no slot to move away from.
    NotPlaced(ContainerId),
    /// Something else sits on top of the container.
    NotOnTop {
        container: ContainerId,
        top: Option<ContainerId>,
    },
    /// The target slot is unset, of the wrong bay parity, or not the next
    /// free tier of another ground stack that can take the container.
    InvalidTarget { container: ContainerId, target: Slot },
}

impl Display for RelocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelocateError::Unassigned(c) => write!(f, "{c} is not assigned to a block"),
            RelocateError::NotPlaced(c) => write!(f, "{c} has no slot"),
            RelocateError::NotOnTop {
                container,
                top: Some(top),
            } => write!(f, "{container} is buried under {top}"),
            RelocateError::NotOnTop {
                container,
                top: None,
            } => write!(f, "{container} is not in its ground stack"),
            RelocateError::InvalidTarget { container, target } => {
                write!(f, "{target} cannot take {container}")
            }
        }
    }
}

impl std::error::Error for RelocateError {}
