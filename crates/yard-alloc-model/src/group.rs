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

/// An arrival batch of containers sharing a size class.
///
/// Groups are created once per batch and shared between their member
/// containers through `Rc`. `dwell_until` is the logical tick at which the
/// batch is expected to leave the yard; the engine carries it but never
/// compares it against a clock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    id: GroupId,
    size_class: SizeClass,
    target_size: usize,
    dwell_until: u64,
}

impl Group {
    #[inline]
    pub fn new(id: GroupId, size_class: SizeClass, target_size: usize, dwell_until: u64) -> Self {
        Self {
            id,
            size_class,
            target_size,
            dwell_until,
        }
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    /// Number of containers the batch was generated with.
    #[inline]
    pub fn target_size(&self) -> usize {
        self.target_size
    }

    #[inline]
    pub fn dwell_until(&self) -> u64 {
        self.dwell_until
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group#{}", self.id.value())
    }
}
