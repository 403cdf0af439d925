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
    container::{Container, ContainerRef},
    group::Group,
};
use std::{collections::BTreeMap, rc::Rc};
use yard_alloc_core::prelude::*;

/// A dwelling group together with the members that are still in the yard.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    group: Rc<Group>,
    members: Vec<ContainerRef>,
}

impl RosterEntry {
    #[inline]
    pub fn group(&self) -> &Rc<Group> {
        &self.group
    }

    #[inline]
    pub fn members(&self) -> &[ContainerRef] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Registry of groups by id, ordered by id.
///
/// A group disappears from the roster as soon as its last member is removed.
#[derive(Debug, Clone, Default)]
pub struct GroupRoster {
    entries: BTreeMap<GroupId, RosterEntry>,
}

impl GroupRoster {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `group` with its members, replacing any previous entry with
    /// the same id. Empty member lists are not recorded.
    pub fn insert(&mut self, group: Rc<Group>, members: Vec<ContainerRef>) -> Option<RosterEntry> {
        if members.is_empty() {
            return self.entries.remove(&group.id());
        }
        self.entries
            .insert(group.id(), RosterEntry { group, members })
    }

    #[inline]
    pub fn get(&self, id: GroupId) -> Option<&RosterEntry> {
        self.entries.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: GroupId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Removes `container` from its group and returns the removed handle.
    pub fn remove_member(&mut self, container: &Container) -> Option<ContainerRef> {
        let group = container.group_id();
        let entry = self.entries.get_mut(&group)?;
        let position = entry.members.iter().position(|m| m.id() == container.id())?;
        let removed = entry.members.remove(position);
        if entry.members.is_empty() {
            self.entries.remove(&group);
        }
        Some(removed)
    }

    pub fn non_empty_groups(&self) -> impl Iterator<Item = &Rc<Group>> + '_ {
        self.entries
            .values()
            .filter(|e| !e.is_empty())
            .map(RosterEntry::group)
    }

    pub fn containers(&self) -> impl Iterator<Item = &ContainerRef> + '_ {
        self.entries.values().flat_map(|e| e.members.iter())
    }

    pub fn container_count(&self) -> usize {
        self.entries.values().map(RosterEntry::len).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_members(id: u64, first: u64, n: u64) -> (Rc<Group>, Vec<ContainerRef>) {
        let group = Rc::new(Group::new(GroupId::new(id), SizeClass::Short, n as usize, 0));
        let members = (first..first + n)
            .map(|c| Container::shared(ContainerId::new(c), group.clone()))
            .collect();
        (group, members)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut roster = GroupRoster::new();
        let (g, m) = group_with_members(1, 1, 3);
        assert!(roster.insert(g, m).is_none());
        let (g, m) = group_with_members(2, 4, 2);
        roster.insert(g, m);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.container_count(), 5);
        assert_eq!(roster.get(GroupId::new(1)).map(RosterEntry::len), Some(3));
        let ids: Vec<u64> = roster.containers().map(|c| c.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_member_list_is_not_recorded() {
        let mut roster = GroupRoster::new();
        let (g, _) = group_with_members(1, 1, 0);
        roster.insert(g, Vec::new());
        assert!(roster.is_empty());
    }

    #[test]
    fn test_group_is_dropped_with_its_last_member() {
        let mut roster = GroupRoster::new();
        let (g, m) = group_with_members(7, 10, 2);
        let first = m[0].clone();
        let second = m[1].clone();
        roster.insert(g, m);

        assert_eq!(roster.remove_member(&first).map(|c| c.id()), Some(first.id()));
        assert!(roster.contains(GroupId::new(7)));
        assert!(roster.remove_member(&first).is_none());

        roster.remove_member(&second);
        assert!(!roster.contains(GroupId::new(7)));
        assert_eq!(roster.non_empty_groups().count(), 0);
    }
}
