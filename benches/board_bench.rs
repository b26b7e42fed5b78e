//! Performance benchmarks for the logicboard scheduler.
//!
//! Run with: `cargo bench`
//! Or for specific bench: `cargo bench --bench board_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use logicboard::{
    AdderKind, Board, ComponentId, ComponentSpec, EventQueue, GateKind, LogicState, PinId,
    ScheduledEvent,
};

// ============================================================================
// Circuits
// ============================================================================

/// A clock feeding a chain of `length` inverters.
fn inverter_chain(length: usize) -> Board {
    let mut board = Board::new(1);
    let clock = board.add_component(ComponentSpec::clock(4)).unwrap();
    let mut previous = board.output(clock, 0).unwrap();

    for _ in 0..length {
        let not = board.add_component(ComponentSpec::gate(GateKind::Not)).unwrap();
        board.connect(previous, board.input(not, 0).unwrap()).unwrap();
        previous = board.output(not, 0).unwrap();
    }
    board
}

/// A ripple-carry chain of `bits` one-bit full adders, every stage fed by
/// the same two switches.
fn ripple_adder(bits: u32) -> (Board, ComponentId, ComponentId, Vec<PinId>) {
    let mut board = Board::new(1);
    let a = board.add_component(ComponentSpec::switch(0)).unwrap();
    let b = board.add_component(ComponentSpec::switch(0)).unwrap();
    let ground = board.add_component(ComponentSpec::ground()).unwrap();

    let mut carry = board.output(ground, 0).unwrap();
    let mut sums = Vec::new();
    for _ in 0..bits {
        let adder = board
            .add_component(ComponentSpec::adder(AdderKind::Full))
            .unwrap();
        board.connect(board.output(a, 0).unwrap(), board.input(adder, 0).unwrap()).unwrap();
        board.connect(board.output(b, 0).unwrap(), board.input(adder, 1).unwrap()).unwrap();
        board.connect(carry, board.input(adder, 2).unwrap()).unwrap();
        sums.push(board.output(adder, 0).unwrap());
        carry = board.output(adder, 1).unwrap();
    }
    (board, a, b, sums)
}

// ============================================================================
// Board Benchmarks
// ============================================================================

fn bench_inverter_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverter_chain");

    for length in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("gates", length), length, |b, &length| {
            b.iter_batched(
                || inverter_chain(length),
                |mut board| {
                    board.run_steps(100).unwrap();
                    black_box(board.stats().events_applied);
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_ripple_adder(c: &mut Criterion) {
    let mut group = c.benchmark_group("ripple_adder");

    for bits in [8, 32].iter() {
        group.throughput(Throughput::Elements(*bits as u64));
        group.bench_with_input(BenchmarkId::new("bits", bits), bits, |bench, &bits| {
            bench.iter_batched(
                || ripple_adder(bits),
                |(mut board, a, b, sums)| {
                    for round in 0..16u64 {
                        board.set_switch(a, round & 1).unwrap();
                        board.set_switch(b, (round >> 1) & 1).unwrap();
                        board.run_steps(u64::from(bits) + 1).unwrap();
                    }
                    black_box(board.pin_state(sums[0]));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Event Queue Benchmarks
// ============================================================================

fn bench_event_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_queue");
    let state = LogicState::driven(1);

    for num_events in [1000, 10000, 100000].iter() {
        group.throughput(Throughput::Elements(*num_events as u64));

        group.bench_with_input(
            BenchmarkId::new("insert", num_events),
            num_events,
            |b, &num_events| {
                b.iter(|| {
                    let mut queue = EventQueue::new();
                    for i in 0..num_events as u64 {
                        queue.insert(ScheduledEvent::new(i % 97, PinId(i % 13), state, i));
                    }
                    black_box(queue.len());
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("pop_min", num_events),
            num_events,
            |b, &num_events| {
                b.iter_batched(
                    || {
                        (0..num_events as u64)
                            .map(|i| ScheduledEvent::new(i % 97, PinId(i % 13), state, i))
                            .collect::<EventQueue<_>>()
                    },
                    |mut queue| {
                        while queue.pop_min().is_ok() {}
                        black_box(queue.len());
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    benches,
    bench_inverter_chain,
    bench_ripple_adder,
    bench_event_queue,
);

criterion_main!(benches);
