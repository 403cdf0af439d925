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

use rand::{SeedableRng, seq::IndexedRandom, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::{
    fs::File,
    io::{BufWriter, Write},
    rc::Rc,
    time::Instant,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use yard_alloc_core::prelude::*;
use yard_alloc_model::prelude::*;
use yard_alloc_solver::prelude::*;

const BAY_COUNT: usize = 5;
const ROW_COUNT: usize = 8;
const MAX_TIERS: usize = 4;
const GROUP_COUNT: usize = 12;
const MEAN_GROUP_SIZE: f64 = 6.5;
const LONG_RATIO: f64 = 0.6;
const FILL_RATIO: f64 = 0.6;
const RETRIEVALS: usize = 10;
const SEED: u64 = 42;
/// Logical ticks between two consecutive crane moves in the event log.
const TICKS_PER_MOVE: u64 = 3;
const EVENTS_PATH: &str = "yard_events.ndjson";

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Stack,
    Unstack,
    Reshuffle,
}

#[derive(Debug, Clone, Serialize)]
struct Event {
    t: u64,
    evnt: EventKind,
    id: String,
    group: u64,
    size: usize,
    bay: usize,
    row: usize,
    tier: usize,
}

impl Event {
    fn new(t: u64, evnt: EventKind, container: &Container, slot: Slot) -> Self {
        Self {
            t,
            evnt,
            id: container.to_string(),
            group: container.group_id().value(),
            size: container.size_class().teus() * 20,
            bay: slot.bay().value(),
            row: slot.row(),
            tier: slot.tier(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    seed: u64,
    block: String,
    arrivals: usize,
    stacked: usize,
    teus: usize,
    capacity_teus: usize,
    retrieved: usize,
    abandoned: usize,
    reshuffles: usize,
    mean_reshuffles_per_retrieval: f64,
    p90_reshuffles_per_retrieval: f64,
    mean_stack_height: f64,
    max_stack_height: usize,
    elapsed_us: u128,
}

/// Appends events as one JSON object per line.
struct EventLog<W: Write> {
    writer: W,
    clock: u64,
    written: usize,
}

impl<W: Write> EventLog<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            clock: 0,
            written: 0,
        }
    }

    fn record(&mut self, kind: EventKind, container: &Container, slot: Slot) -> std::io::Result<()> {
        let event = Event::new(self.clock, kind, container, slot);
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        self.clock += TICKS_PER_MOVE;
        self.written += 1;
        Ok(())
    }

    fn finish(mut self) -> std::io::Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}

fn stack_heights(inventory: &Inventory, layout: &BlockLayout) -> Vec<f64> {
    (1..=layout.bay_count())
        .map(GroundColumn::new)
        .flat_map(|column| layout.rows().map(move |row| Slot::new(column.short_bay(), row, 1)))
        .map(|slot| inventory.height(layout, slot) as f64)
        .collect()
}

fn main() {
    enable_tracing();
    let started = Instant::now();

    let layout =
        BlockLayout::new(BlockId::new(1), BAY_COUNT, ROW_COUNT, MAX_TIERS).expect("valid block");
    let config = ArrivalGenConfigBuilder::new()
        .group_count(GROUP_COUNT)
        .mean_group_size(MEAN_GROUP_SIZE)
        .long_ratio(LONG_RATIO)
        .seed(SEED)
        .build()
        .expect("valid arrival config");
    info!(%layout, %config, "Starting yard run");

    let mut generator: ArrivalGenerator = config.into();
    let mut roster = generator.generate(&layout);
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);

    let file = File::create(EVENTS_PATH).expect("create event log");
    let mut log = EventLog::new(BufWriter::new(file));
    let mut inventory = Inventory::new();

    let mut arrivals: Vec<ContainerRef> = roster.containers().cloned().collect();
    arrivals.shuffle(&mut rng);
    let fill_limit = layout.capacity_teus() as f64 * FILL_RATIO;

    let mut stacked = 0;
    for container in &arrivals {
        let Some(slot) = inventory.allocate(container) else {
            warn!("Cannot allocate more containers");
            break;
        };
        container.set_slot(slot);
        inventory.update(container, JobType::Stacking);
        log.record(EventKind::Stack, container, slot)
            .expect("write stack event");
        stacked += 1;
        debug!(container = %container.id(), %slot, "Stacked");

        if inventory.teus(&layout) as f64 > fill_limit {
            break;
        }
    }
    for container in arrivals.iter().filter(|c| c.slot().is_none()) {
        roster.remove_member(container);
    }
    info!(
        stacked,
        teus = inventory.teus(&layout),
        capacity = layout.capacity_teus(),
        "Stacking done"
    );
    debug!("\n{}", inventory.snapshot(&layout));

    let mut moves_per_retrieval: Vec<f64> = Vec::with_capacity(RETRIEVALS);
    let mut abandoned = 0;
    for _ in 0..RETRIEVALS {
        let groups: Vec<Rc<Group>> = roster.non_empty_groups().cloned().collect();
        let Some(chosen) = groups.choose(&mut rng) else {
            info!("No dwelling groups left");
            break;
        };
        let Some(job) = inventory.best_job_by_group(&layout, chosen) else {
            warn!(group = %chosen, "No container available for unstacking");
            continue;
        };
        let Some(job_slot) = job.slot() else {
            warn!(container = %job.id(), "Best job has no slot");
            continue;
        };

        let mut moves = 0usize;
        while !inventory.unstack_without_reshuffle(&job) {
            let Some(blocker) = inventory.peek(&layout, job_slot) else {
                break;
            };
            let Some(target) = inventory.decide_reshuffle_target(&blocker, &job) else {
                warn!(blocker = %blocker.id(), "No reshuffle target");
                break;
            };
            if let Err(err) = inventory.relocate(&blocker, target) {
                warn!(%err, "Reshuffle failed");
                break;
            }
            log.record(EventKind::Reshuffle, &blocker, target)
                .expect("write reshuffle event");
            moves += 1;
        }
        if !inventory.unstack_without_reshuffle(&job) {
            abandoned += 1;
            continue;
        }

        inventory.update(&job, JobType::Unstacking);
        log.record(EventKind::Unstack, &job, job_slot)
            .expect("write unstack event");
        roster.remove_member(&job);
        job.clear_slot();
        if !roster.contains(chosen.id()) {
            info!(group = %chosen, "Group fully retrieved");
        }
        moves_per_retrieval.push(moves as f64);
        info!(container = %job.id(), group = %chosen, reshuffles = moves, "Unstacked");
    }

    let written = log.finish().expect("flush event log");
    let heights = stack_heights(&inventory, &layout);
    let (mean_moves, p90_moves) = if moves_per_retrieval.is_empty() {
        (0.0, 0.0)
    } else {
        let mean = moves_per_retrieval.iter().mean();
        let mut data = Data::new(moves_per_retrieval.clone());
        (mean, data.quantile(0.9))
    };

    let summary = Summary {
        seed: SEED,
        block: layout.to_string(),
        arrivals: arrivals.len(),
        stacked,
        teus: inventory.teus(&layout),
        capacity_teus: layout.capacity_teus(),
        retrieved: moves_per_retrieval.len(),
        abandoned,
        reshuffles: moves_per_retrieval.iter().sum::<f64>() as usize,
        mean_reshuffles_per_retrieval: mean_moves,
        p90_reshuffles_per_retrieval: p90_moves,
        mean_stack_height: if heights.is_empty() {
            0.0
        } else {
            heights.iter().mean()
        },
        max_stack_height: heights.iter().fold(0usize, |m, &h| m.max(h as usize)),
        elapsed_us: started.elapsed().as_micros(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("serialize summary")
    );
    println!("Wrote {written} events to {EVENTS_PATH}");
}
