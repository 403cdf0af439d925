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

use crate::{block::BlockLayout, err::BlockAlreadyAssignedError, group::Group};
use std::{
    cell::{Cell, OnceCell},
    fmt::Display,
    rc::Rc,
};
use yard_alloc_core::prelude::*;

/// Shared handle to a container. The inventory, the bays and the driver all
/// refer to the same container through it.
pub type ContainerRef = Rc<Container>;

/// A single container in the yard.
///
/// The size class is derived from the owning group. The block is settable
/// exactly once. The slot is replaced as a whole on every placement or
/// relocation, never patched coordinate by coordinate.
#[derive(Debug)]
pub struct Container {
    id: ContainerId,
    size_class: SizeClass,
    group: Rc<Group>,
    block: OnceCell<BlockLayout>,
    slot: Cell<Option<Slot>>,
}

impl Container {
    #[inline]
    pub fn new(id: ContainerId, group: Rc<Group>) -> Self {
        Self {
            id,
            size_class: group.size_class(),
            group,
            block: OnceCell::new(),
            slot: Cell::new(None),
        }
    }

    /// Creates a container that is already assigned to `layout`.
    #[inline]
    pub fn in_block(id: ContainerId, group: Rc<Group>, layout: BlockLayout) -> Self {
        Self {
            block: OnceCell::from(layout),
            ..Self::new(id, group)
        }
    }

    #[inline]
    pub fn shared(id: ContainerId, group: Rc<Group>) -> ContainerRef {
        Rc::new(Self::new(id, group))
    }

    #[inline]
    pub fn id(&self) -> ContainerId {
        self.id
    }

    #[inline]
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    #[inline]
    pub fn group(&self) -> &Rc<Group> {
        &self.group
    }

    #[inline]
    pub fn group_id(&self) -> GroupId {
        self.group.id()
    }

    #[inline]
    pub fn belongs_to(&self, group: GroupId) -> bool {
        self.group.id() == group
    }

    #[inline]
    pub fn block(&self) -> Option<&BlockLayout> {
        self.block.get()
    }

    pub fn assign_block(&self, layout: BlockLayout) -> Result<(), BlockAlreadyAssignedError> {
        self.block.set(layout).map_err(|_| {
            let first = self.block.get().map_or(layout.id(), |b| b.id());
            BlockAlreadyAssignedError::new(self.id, first)
        })
    }

    #[inline]
    pub fn slot(&self) -> Option<Slot> {
        self.slot.get()
    }

    #[inline]
    pub fn set_slot(&self, slot: Slot) {
        self.slot.set(Some(slot));
    }

    #[inline]
    pub fn clear_slot(&self) -> Option<Slot> {
        self.slot.take()
    }
}

impl PartialEq for Container {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Container {}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ctn#{}", self.id.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(size_class: SizeClass) -> Rc<Group> {
        Rc::new(Group::new(GroupId::new(1), size_class, 3, 0))
    }

    #[test]
    fn test_size_class_is_derived_from_group() {
        let c = Container::new(ContainerId::new(1), group(SizeClass::Long));
        assert_eq!(c.size_class(), SizeClass::Long);
        assert!(c.belongs_to(GroupId::new(1)));
        assert!(!c.belongs_to(GroupId::new(2)));
    }

    #[test]
    fn test_block_is_settable_once() {
        let c = Container::new(ContainerId::new(4), group(SizeClass::Short));
        let first = BlockLayout::new(BlockId::new(1), 5, 8, 4).unwrap();
        let second = BlockLayout::new(BlockId::new(2), 5, 8, 4).unwrap();

        assert!(c.block().is_none());
        c.assign_block(first).unwrap();
        let err = c.assign_block(second).unwrap_err();
        assert_eq!(err.container(), ContainerId::new(4));
        assert_eq!(err.block(), BlockId::new(1));
        assert_eq!(c.block().map(|b| b.id()), Some(BlockId::new(1)));
    }

    #[test]
    fn test_slot_is_replaced_wholesale() {
        let c = Container::new(ContainerId::new(2), group(SizeClass::Short));
        assert_eq!(c.slot(), None);

        c.set_slot(Slot::from((1, 1, 1)));
        c.set_slot(Slot::from((3, 2, 2)));
        assert_eq!(c.slot(), Some(Slot::from((3, 2, 2))));

        assert_eq!(c.clear_slot(), Some(Slot::from((3, 2, 2))));
        assert_eq!(c.slot(), None);
    }

    #[test]
    fn test_equality_is_identity_by_id() {
        let g = group(SizeClass::Short);
        let a = Container::new(ContainerId::new(9), g.clone());
        let b = Container::new(ContainerId::new(9), g.clone());
        let c = Container::new(ContainerId::new(10), g);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Ctn#9");
    }
}
