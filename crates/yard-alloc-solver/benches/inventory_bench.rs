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

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{env, hint::black_box, rc::Rc};
use yard_alloc_core::prelude::*;
use yard_alloc_model::prelude::*;
use yard_alloc_solver::prelude::*;

#[derive(Clone, Copy)]
struct Arrival {
    group: u64,
    size_class: SizeClass,
}

fn gen_arrivals(n: usize, groups: u64, rng: &mut impl Rng) -> Vec<Arrival> {
    (0..n)
        .map(|_| {
            let group = rng.random_range(1..=groups);
            // Size class is fixed per group.
            let size_class = if group % 5 < 3 {
                SizeClass::Long
            } else {
                SizeClass::Short
            };
            Arrival { group, size_class }
        })
        .collect()
}

fn materialize(arrivals: &[Arrival], layout: &BlockLayout) -> Vec<ContainerRef> {
    let mut groups: Vec<Option<Rc<Group>>> = Vec::new();
    arrivals
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let idx = a.group as usize;
            if groups.len() <= idx {
                groups.resize(idx + 1, None);
            }
            let group = groups[idx]
                .get_or_insert_with(|| {
                    Rc::new(Group::new(GroupId::new(a.group), a.size_class, 0, 0))
                })
                .clone();
            Rc::new(Container::in_block(
                ContainerId::new(i as u64 + 1),
                group,
                *layout,
            ))
        })
        .collect()
}

fn fill(inv: &mut Inventory, containers: &[ContainerRef]) -> usize {
    let mut placed = 0;
    for c in containers {
        if let Some(slot) = inv.allocate(c) {
            c.set_slot(slot);
            inv.update(c, JobType::Stacking);
            placed += 1;
        }
    }
    placed
}

fn register_fill(c: &mut Criterion, layout: BlockLayout, arrivals: &[Arrival]) {
    let mut group = c.benchmark_group("inventory_fill");
    group.throughput(Throughput::Elements(arrivals.len() as u64));

    let label = format!(
        "{}x{}x{}",
        layout.bay_count(),
        layout.row_count(),
        layout.max_tiers()
    );
    group.bench_function(BenchmarkId::new("allocate_commit", &label), |b| {
        b.iter_batched(
            || (Inventory::new(), materialize(arrivals, &layout)),
            |(mut inv, containers)| {
                black_box(fill(&mut inv, &containers));
                black_box(inv);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn register_queries(c: &mut Criterion, layout: BlockLayout, arrivals: &[Arrival], groups: u64) {
    let mut group = c.benchmark_group("inventory_queries");

    let containers = materialize(arrivals, &layout);
    let mut inv = Inventory::new();
    fill(&mut inv, &containers);

    let mut seen: Vec<Rc<Group>> = containers.iter().map(|c| Rc::clone(c.group())).collect();
    seen.sort_by_key(|g| g.id());
    seen.dedup_by_key(|g| g.id());
    group.throughput(Throughput::Elements(groups));

    group.bench_function("best_job_by_group", |b| {
        b.iter(|| {
            for g in &seen {
                black_box(inv.best_job_by_group(&layout, g));
            }
        })
    });

    let buried: Vec<(ContainerRef, ContainerRef)> = containers
        .iter()
        .filter(|c| c.slot().is_some() && !inv.unstack_without_reshuffle(c))
        .filter_map(|c| {
            let top = inv.peek(&layout, c.slot()?)?;
            Some((top, Rc::clone(c)))
        })
        .collect();
    group.bench_function("decide_reshuffle_target", |b| {
        b.iter(|| {
            for (blocker, reference) in &buried {
                black_box(inv.decide_reshuffle_target(blocker, reference));
            }
        })
    });
    group.finish();
}

fn inventory_benches(c: &mut Criterion) {
    let bays = env::var("YARD_BAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10usize);
    let rows = env::var("YARD_ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8usize);
    let tiers = env::var("YARD_TIERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5usize);
    let groups = env::var("YARD_GROUPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24u64);

    let layout = BlockLayout::new(BlockId::new(1), bays, rows, tiers).expect("valid layout");
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_CAFE);
    let arrivals = gen_arrivals(bays * rows * tiers, groups, &mut rng);

    register_fill(c, layout, &arrivals);
    register_queries(c, layout, &arrivals, groups);
}

criterion_group!(benches, inventory_benches);
criterion_main!(benches);
