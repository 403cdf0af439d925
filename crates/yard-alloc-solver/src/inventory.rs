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
    err::RelocateError,
    snapshot::{InventorySnapshot, SnapshotEntry, SnapshotItem},
};
use std::{cmp::Reverse, collections::HashMap, fmt::Display, rc::Rc};
use tracing::{debug, instrument, trace, warn};
use yard_alloc_core::prelude::*;
use yard_alloc_model::prelude::*;

/// The kind of move being committed through [`Inventory::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    Stacking,
    Unstacking,
}

impl Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::Stacking => write!(f, "stacking"),
            JobType::Unstacking => write!(f, "unstacking"),
        }
    }
}

#[derive(Debug, Default)]
struct GroundSlot {
    /// Bottom to top.
    stack: Vec<ContainerRef>,
    /// How often a container was moved away from here. Not read by any
    /// decision.
    flipped_layers: u32,
}

impl GroundSlot {
    #[inline]
    fn height(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn top(&self) -> Option<&ContainerRef> {
        self.stack.last()
    }
}

/// A legal landing spot for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    bay: BayIndex,
    row: usize,
    tier: usize,
}

impl Candidate {
    #[inline]
    fn slot(&self) -> Slot {
        Slot::new(self.bay, self.row, self.tier)
    }
}

#[inline]
fn ground_key(layout: &BlockLayout, bay: BayIndex, row: usize) -> GroundKey {
    GroundKey::of_bay(layout.id(), bay, row)
}

/// The ground stacks a container of `size_class` occupies at `slot`.
fn footprint(layout: &BlockLayout, size_class: SizeClass, slot: Slot) -> Vec<GroundKey> {
    match size_class {
        SizeClass::Short => vec![ground_key(layout, slot.bay(), slot.row())],
        SizeClass::Long => vec![
            ground_key(layout, slot.bay().left(), slot.row()),
            ground_key(layout, slot.bay().right(), slot.row()),
        ],
    }
}

/// Occupancy of every ground stack, and the decisions made on top of it.
///
/// This is the only place that knows what is stacked where. A short
/// container lives in the ground stack of its bay. A long container at even
/// bay `b` is pushed onto the stacks of bays `b - 1` and `b + 1` at the same
/// tier, so both stacks always share the very same handle on top while it is
/// there.
#[derive(Debug, Default)]
pub struct Inventory {
    slots: HashMap<GroundKey, GroundSlot>,
}

impl Inventory {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn ground(&self, key: &GroundKey) -> Option<&GroundSlot> {
        self.slots.get(key)
    }

    #[inline]
    fn column_height(&self, layout: &BlockLayout, bay: BayIndex, row: usize) -> usize {
        self.ground(&ground_key(layout, bay, row))
            .map_or(0, GroundSlot::height)
    }

    #[inline]
    fn column_top(&self, layout: &BlockLayout, bay: BayIndex, row: usize) -> Option<&ContainerRef> {
        self.ground(&ground_key(layout, bay, row))
            .and_then(GroundSlot::top)
    }

    /// Whether any row of the column under `bay` holds a `size_class`
    /// container.
    fn column_hosts(&self, layout: &BlockLayout, bay: BayIndex, size_class: SizeClass) -> bool {
        layout.rows().any(|row| {
            self.ground(&ground_key(layout, bay, row))
                .is_some_and(|g| g.stack.iter().any(|c| c.size_class() == size_class))
        })
    }

    /// Tier a long container would take at even `bay`.
    ///
    /// Both columns must be free of short containers, level, below the tier
    /// limit, and either empty or topped by the same long container.
    fn long_tier(&self, layout: &BlockLayout, bay: BayIndex, row: usize) -> Option<usize> {
        if bay.value() <= 1 || bay >= layout.max_bay() {
            return None;
        }
        let (left, right) = (bay.left(), bay.right());
        if self.column_hosts(layout, left, SizeClass::Short)
            || self.column_hosts(layout, right, SizeClass::Short)
        {
            return None;
        }

        let height = self.column_height(layout, left, row);
        if height != self.column_height(layout, right, row) || height >= layout.max_tiers() {
            return None;
        }
        let aligned = match (
            self.column_top(layout, left, row),
            self.column_top(layout, right, row),
        ) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        aligned.then_some(height + 1)
    }

    /// Tier a short container would take at odd `bay`. Columns that hold
    /// any long container are closed to short ones.
    fn short_tier(&self, layout: &BlockLayout, bay: BayIndex, row: usize) -> Option<usize> {
        if self.column_hosts(layout, bay, SizeClass::Long) {
            return None;
        }
        let height = self.column_height(layout, bay, row);
        (height < layout.max_tiers()).then_some(height + 1)
    }

    fn placement_tier(
        &self,
        layout: &BlockLayout,
        size_class: SizeClass,
        bay: BayIndex,
        row: usize,
    ) -> Option<usize> {
        if !bay.matches(size_class) || !layout.contains_bay(bay) || !layout.rows().contains(&row) {
            return None;
        }
        match size_class {
            SizeClass::Short => self.short_tier(layout, bay, row),
            SizeClass::Long => self.long_tier(layout, bay, row),
        }
    }

    fn candidate(
        &self,
        layout: &BlockLayout,
        size_class: SizeClass,
        bay: BayIndex,
        row: usize,
    ) -> Option<Candidate> {
        self.placement_tier(layout, size_class, bay, row)
            .map(|tier| Candidate { bay, row, tier })
    }

    #[inline]
    fn top_belongs_to(&self, layout: &BlockLayout, c: &Candidate, group: GroupId) -> bool {
        self.column_top(layout, c.bay, c.row)
            .is_some_and(|top| top.belongs_to(group))
    }

    /// Finds a slot for `container` in the block it is assigned to.
    ///
    /// Tried in order: on top of a stack of the container's own group, then
    /// on empty ground, then on the tallest stack that still has room. Within
    /// a phase the first candidate in bay-then-row order wins. `None` means
    /// the block has no capacity left for this size class.
    #[instrument(level = "debug", skip_all, fields(container = %container.id(), size = %container.size_class()))]
    pub fn allocate(&self, container: &Container) -> Option<Slot> {
        let Some(layout) = container.block() else {
            warn!("Container is not assigned to a block");
            return None;
        };
        let size_class = container.size_class();
        let candidates: Vec<Candidate> = layout
            .bays_of(size_class)
            .flat_map(|bay| layout.rows().map(move |row| (bay, row)))
            .filter_map(|(bay, row)| self.candidate(layout, size_class, bay, row))
            .collect();

        if let Some(c) = candidates
            .iter()
            .find(|c| c.tier > 1 && self.top_belongs_to(layout, c, container.group_id()))
        {
            trace!(slot = %c.slot(), "Stacking onto own group");
            return Some(c.slot());
        }

        if let Some(c) = candidates.iter().find(|c| c.tier == 1) {
            trace!(slot = %c.slot(), "Stacking onto empty ground");
            return Some(c.slot());
        }

        // First maximum in scan order.
        if let Some(c) = candidates.iter().rev().max_by_key(|c| c.tier) {
            trace!(slot = %c.slot(), "Stacking onto tallest open stack");
            return Some(c.slot());
        }

        debug!("No capacity left");
        None
    }

    /// Commits a move for a container whose slot is already set.
    ///
    /// Containers without a valid slot or block are ignored.
    #[instrument(level = "trace", skip_all, fields(container = %container.id(), op = %op))]
    pub fn update(&mut self, container: &ContainerRef, op: JobType) {
        let Some(slot) = container.slot().filter(Slot::is_set) else {
            warn!("Ignoring commit for a container without a valid slot");
            return;
        };
        let Some(layout) = container.block().copied() else {
            warn!("Ignoring commit for a container without a block");
            return;
        };

        match op {
            JobType::Stacking => self.stack(&layout, slot, Rc::clone(container)),
            JobType::Unstacking => match self.unstack(&layout, slot) {
                Some(top) if top.id() == container.id() => {}
                Some(top) => warn!(popped = %top.id(), "Unstacked a different container"),
                None => warn!(%slot, "Nothing to unstack"),
            },
        }
    }

    /// Pushes `container` onto the ground stack(s) addressed by `slot`.
    pub fn stack(&mut self, layout: &BlockLayout, slot: Slot, container: ContainerRef) {
        for key in footprint(layout, container.size_class(), slot) {
            self.slots
                .entry(key)
                .or_default()
                .stack
                .push(Rc::clone(&container));
        }
        trace!(container = %container.id(), %slot, "Stacked");
    }

    /// Pops the top of the ground stack addressed by `slot`. A long container
    /// is removed from its paired stack as well.
    pub fn unstack(&mut self, layout: &BlockLayout, slot: Slot) -> Option<ContainerRef> {
        let key = ground_key(layout, slot.bay(), slot.row());
        let top = self.slots.get_mut(&key)?.stack.pop()?;

        if top.size_class().is_long() {
            let left = top.slot().map_or(key.column(), |s| s.bay().column());
            let pair_column = if key.column() == left {
                GroundColumn::new(left.value() + 1)
            } else {
                left
            };
            let pair = GroundKey::new(layout.id(), pair_column, key.row());
            match self.slots.get_mut(&pair) {
                Some(g) if g.top().is_some_and(|t| Rc::ptr_eq(t, &top)) => {
                    g.stack.pop();
                }
                _ => warn!(container = %top.id(), "Long container missing from its paired stack"),
            }
        }
        trace!(container = %top.id(), %slot, "Unstacked");
        Some(top)
    }

    /// Top of the ground stack addressed by `slot`.
    #[inline]
    pub fn peek(&self, layout: &BlockLayout, slot: Slot) -> Option<ContainerRef> {
        self.column_top(layout, slot.bay(), slot.row()).cloned()
    }

    /// Height of the ground stack addressed by `slot`.
    #[inline]
    pub fn height(&self, layout: &BlockLayout, slot: Slot) -> usize {
        self.column_height(layout, slot.bay(), slot.row())
    }

    #[inline]
    pub fn flipped_layers(&self, layout: &BlockLayout, slot: Slot) -> u32 {
        self.ground(&ground_key(layout, slot.bay(), slot.row()))
            .map_or(0, |g| g.flipped_layers)
    }

    /// True if nothing from another group sits on top of `container`'s
    /// ground stack. A container without block or slot has nothing on top.
    pub fn unstack_without_reshuffle(&self, container: &Container) -> bool {
        let (Some(layout), Some(slot)) = (container.block(), container.slot()) else {
            return true;
        };
        self.peek(layout, slot)
            .is_none_or(|top| top.belongs_to(container.group_id()))
    }

    /// The member of `group` that is cheapest to retrieve.
    ///
    /// Only the topmost member of each stack is considered. Ranked by depth
    /// below the top, then taller stack, then larger column, then larger row.
    pub fn best_job_by_group(&self, layout: &BlockLayout, group: &Group) -> Option<ContainerRef> {
        self.slots
            .iter()
            .filter(|(key, _)| key.block() == layout.id())
            .filter_map(|(key, ground)| {
                ground
                    .stack
                    .iter()
                    .rev()
                    .enumerate()
                    .find(|(_, c)| c.belongs_to(group.id()) && c.size_class() == group.size_class())
                    .map(|(depth, c)| {
                        let rank = (
                            depth,
                            Reverse(ground.height()),
                            Reverse(key.column()),
                            Reverse(key.row()),
                        );
                        (rank, c)
                    })
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, c)| Rc::clone(c))
    }

    /// Applies the target preference to `order`: a non-full stack topped by
    /// the mover's own group, then the nearest empty ground, then the tallest
    /// open stack. Stacks topped by `avoid` are skipped.
    fn pick_target(
        &self,
        layout: &BlockLayout,
        mover: &Container,
        order: &[(BayIndex, usize)],
        avoid: Option<GroupId>,
    ) -> Option<Slot> {
        let legal: Vec<Candidate> = order
            .iter()
            .filter_map(|&(bay, row)| self.candidate(layout, mover.size_class(), bay, row))
            .filter(|c| !avoid.is_some_and(|g| self.top_belongs_to(layout, c, g)))
            .collect();

        legal
            .iter()
            .find(|c| c.tier > 1 && self.top_belongs_to(layout, c, mover.group_id()))
            .or_else(|| legal.iter().find(|c| c.tier == 1))
            .or_else(|| legal.iter().rev().max_by_key(|c| c.tier))
            .map(Candidate::slot)
    }

    /// Chooses where to move `blocker` so that `reference` below it becomes
    /// reachable.
    ///
    /// While another row of the blocker's bay has spare tiers, only that bay
    /// is searched, nearest row first. Otherwise every bay of the blocker's
    /// size class is searched by bay distance and then row distance, first
    /// skipping stacks topped by the reference's group and then allowing
    /// them.
    #[instrument(level = "debug", skip_all, fields(blocker = %blocker.id(), reference = %reference.id()))]
    pub fn decide_reshuffle_target(&self, blocker: &Container, reference: &Container) -> Option<Slot> {
        let layout = blocker.block()?;
        let source = blocker.slot().filter(Slot::is_set)?;
        let size_class = blocker.size_class();

        let mut same_bay: Vec<(BayIndex, usize)> = layout
            .rows()
            .filter(|&row| row != source.row())
            .map(|row| (source.bay(), row))
            .collect();
        same_bay.sort_by_key(|&(_, row)| (row.abs_diff(source.row()), row));

        let bay_has_spare = same_bay.iter().any(|&(bay, row)| match size_class {
            SizeClass::Short => self.column_height(layout, bay, row) < layout.max_tiers(),
            SizeClass::Long => {
                self.column_height(layout, bay.left(), row) < layout.max_tiers()
                    && self.column_height(layout, bay.right(), row) < layout.max_tiers()
            }
        });
        if bay_has_spare {
            if let Some(slot) = self.pick_target(layout, blocker, &same_bay, None) {
                trace!(%slot, "Relocating within the bay");
                return Some(slot);
            }
        }

        let mut across: Vec<(BayIndex, usize)> = layout
            .bays_of(size_class)
            .flat_map(|bay| layout.rows().map(move |row| (bay, row)))
            .filter(|&(bay, row)| bay != source.bay() || row != source.row())
            .collect();
        across.sort_by_key(|&(bay, row)| {
            (
                bay.distance(source.bay()),
                row.abs_diff(source.row()),
                bay,
                row,
            )
        });

        let target = self
            .pick_target(layout, blocker, &across, Some(reference.group_id()))
            .or_else(|| self.pick_target(layout, blocker, &across, None));
        match target {
            Some(slot) => trace!(%slot, "Relocating across bays"),
            None => debug!("No relocation target"),
        }
        target
    }

    /// Moves `container` from its current slot to `target` and records the
    /// displacement on the vacated ground stack(s).
    pub fn relocate(&mut self, container: &ContainerRef, target: Slot) -> Result<(), RelocateError> {
        let id = container.id();
        let layout = *container.block().ok_or(RelocateError::Unassigned(id))?;
        let source = container
            .slot()
            .filter(Slot::is_set)
            .ok_or(RelocateError::NotPlaced(id))?;
        if !target.is_set()
            || !target.bay().matches(container.size_class())
            || !layout.contains_bay(target.bay())
        {
            return Err(RelocateError::InvalidTarget {
                container: id,
                target,
            });
        }
        match self.peek(&layout, source) {
            Some(top) if Rc::ptr_eq(&top, container) => {}
            top => {
                return Err(RelocateError::NotOnTop {
                    container: id,
                    top: top.map(|t| t.id()),
                });
            }
        }
        // The target tier must be exactly the next free one, off the source stack.
        let landing = self
            .placement_tier(&layout, container.size_class(), target.bay(), target.row())
            .map(|tier| target.with_tier(tier));
        if target.ground() == source.ground() || landing != Some(target) {
            return Err(RelocateError::InvalidTarget {
                container: id,
                target,
            });
        }

        self.unstack(&layout, source);
        for key in footprint(&layout, container.size_class(), source) {
            self.slots.entry(key).or_default().flipped_layers += 1;
        }
        container.set_slot(target);
        self.stack(&layout, target, Rc::clone(container));
        debug!(container = %id, from = %source, to = %target, "Relocated");
        Ok(())
    }

    /// Number of distinct containers stacked in the block.
    pub fn container_count(&self, layout: &BlockLayout) -> usize {
        let (short, long_halves) = self
            .slots
            .iter()
            .filter(|(key, _)| key.block() == layout.id())
            .flat_map(|(_, g)| g.stack.iter())
            .fold((0, 0), |(s, l), c| match c.size_class() {
                SizeClass::Short => (s + 1, l),
                SizeClass::Long => (s, l + 1),
            });
        short + long_halves / 2
    }

    /// Occupied TEUs. Every stack entry is one TEU.
    pub fn teus(&self, layout: &BlockLayout) -> usize {
        self.slots
            .iter()
            .filter(|(key, _)| key.block() == layout.id())
            .map(|(_, g)| g.height())
            .sum()
    }

    pub fn snapshot(&self, layout: &BlockLayout) -> InventorySnapshot {
        let entries = self
            .slots
            .iter()
            .filter(|(key, g)| key.block() == layout.id() && g.height() > 0)
            .map(|(key, g)| {
                let items = g
                    .stack
                    .iter()
                    .map(|c| SnapshotItem {
                        container: c.id(),
                        size_class: c.size_class(),
                        group: c.group_id(),
                    })
                    .collect();
                SnapshotEntry::new(key.column(), key.row(), g.flipped_layers, items)
            })
            .collect();
        InventorySnapshot::new(layout.id(), entries)
    }
}
