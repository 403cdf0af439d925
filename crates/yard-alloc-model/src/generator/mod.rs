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

mod config;
mod err;

pub use config::{ArrivalGenConfig, ArrivalGenConfigBuilder};
pub use err::ArrivalGenConfigBuildError;

use crate::{
    block::BlockLayout,
    container::{Container, ContainerRef},
    group::Group,
    roster::GroupRoster,
};
use num_traits::NumCast;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::Distribution;
use std::rc::Rc;
use tracing::debug;
use yard_alloc_core::prelude::*;

/// Produces arrival batches for a block.
///
/// Group and container ids are handed out monotonically across calls to
/// [`ArrivalGenerator::generate`], starting at 1.
pub struct ArrivalGenerator {
    config: ArrivalGenConfig,
    rng: SmallRng,
    next_group: u64,
    next_container: u64,
    clock: u64,
}

impl From<ArrivalGenConfig> for ArrivalGenerator {
    fn from(config: ArrivalGenConfig) -> Self {
        Self::new(config)
    }
}

impl ArrivalGenerator {
    pub fn new(config: ArrivalGenConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed()),
            config,
            next_group: 1,
            next_container: 1,
            clock: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &ArrivalGenConfig {
        &self.config
    }

    #[inline]
    fn fresh_group_id(&mut self) -> GroupId {
        let id = self.next_group;
        self.next_group += 1;
        GroupId::new(id)
    }

    #[inline]
    fn fresh_container_id(&mut self) -> ContainerId {
        let id = self.next_container;
        self.next_container += 1;
        ContainerId::new(id)
    }

    fn sample_group_size(&mut self) -> usize {
        let raw: f64 = self.config.group_size_distribution.sample(&mut self.rng);
        <usize as NumCast>::from(raw).unwrap_or(0)
    }

    fn sample_dwell(&mut self) -> u64 {
        let raw: f64 = self.config.dwell_distribution.sample(&mut self.rng);
        <u64 as NumCast>::from(raw.ceil()).unwrap_or(u64::MAX)
    }

    #[inline]
    fn sample_size_class(&mut self) -> SizeClass {
        if self.rng.random_bool(self.config.long_ratio()) {
            SizeClass::Long
        } else {
            SizeClass::Short
        }
    }

    /// Generates one batch of groups, each member already assigned to
    /// `layout`. Groups that draw a size of zero still consume their id but
    /// are left out of the roster.
    pub fn generate(&mut self, layout: &BlockLayout) -> GroupRoster {
        let mut roster = GroupRoster::new();

        for _ in 0..self.config.group_count() {
            let id = self.fresh_group_id();
            let size_class = self.sample_size_class();
            let size = self.sample_group_size();
            let dwell = self.sample_dwell();
            let dwell_until = self.clock.saturating_add(dwell);
            if size == 0 {
                debug!(group = id.value(), "Skipping empty group");
                continue;
            }

            let group = Rc::new(Group::new(id, size_class, size, dwell_until));
            let members: Vec<ContainerRef> = (0..size)
                .map(|_| {
                    let cid = self.fresh_container_id();
                    Rc::new(Container::in_block(cid, group.clone(), *layout))
                })
                .collect();
            roster.insert(group, members);
        }

        self.clock += 1;
        debug!(
            groups = roster.len(),
            containers = roster.container_count(),
            "Generated arrivals"
        );
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BlockLayout {
        BlockLayout::new(BlockId::new(1), 5, 8, 4).unwrap()
    }

    fn config(seed: u64) -> ArrivalGenConfig {
        ArrivalGenConfigBuilder::new()
            .group_count(12)
            .seed(seed)
            .build()
            .unwrap()
    }

    fn fingerprint(roster: &GroupRoster) -> Vec<(u64, u64, SizeClass)> {
        roster
            .containers()
            .map(|c| (c.group_id().value(), c.id().value(), c.size_class()))
            .collect()
    }

    #[test]
    fn test_same_seed_same_arrivals() {
        let a = ArrivalGenerator::new(config(42)).generate(&layout());
        let b = ArrivalGenerator::new(config(42)).generate(&layout());
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_members_are_consistent_with_their_group() {
        let l = layout();
        let roster = ArrivalGenerator::new(config(7)).generate(&l);
        assert!(roster.len() <= 12);

        for group in roster.non_empty_groups() {
            let entry = roster.get(group.id()).unwrap();
            assert_eq!(entry.len(), group.target_size());
            for c in entry.members() {
                assert_eq!(c.size_class(), group.size_class());
                assert_eq!(c.block(), Some(&l));
                assert_eq!(c.slot(), None);
            }
        }
    }

    #[test]
    fn test_container_ids_are_unique_and_increasing() {
        let mut generator = ArrivalGenerator::new(config(3));
        let first = generator.generate(&layout());
        let second = generator.generate(&layout());

        let ids: Vec<u64> = first
            .containers()
            .chain(second.containers())
            .map(|c| c.id().value())
            .collect();
        assert!(!ids.is_empty());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], 1);
    }

    #[test]
    fn test_long_ratio_extremes() {
        let all_short = ArrivalGenConfigBuilder::new()
            .group_count(20)
            .long_ratio(0.0)
            .seed(5)
            .build()
            .unwrap();
        let roster = ArrivalGenerator::new(all_short).generate(&layout());
        assert!(roster.containers().all(|c| c.size_class().is_short()));

        let all_long = ArrivalGenConfigBuilder::new()
            .group_count(20)
            .long_ratio(1.0)
            .seed(5)
            .build()
            .unwrap();
        let roster = ArrivalGenerator::new(all_long).generate(&layout());
        assert!(roster.containers().all(|c| c.size_class().is_long()));
    }
}
