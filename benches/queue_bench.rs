use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use conveyor_core::queue::{BoundedQueue, OrderPolicy, QueueOptions, WakePolicy};
use std::sync::Arc;
use std::thread;

const ITEMS_PER_PRODUCER: u64 = 2_000;

/// Benchmark uncontended put/take pairs on one thread.
fn bench_uncontended_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_uncontended_put_take");

    for order in [OrderPolicy::Lifo, OrderPolicy::Fifo] {
        let queue = BoundedQueue::with_options(QueueOptions::new(10).order(order)).unwrap();
        group.bench_function(BenchmarkId::from_parameter(order), |b| {
            b.iter(|| {
                queue.put(black_box(7u64)).unwrap();
                black_box(queue.take().unwrap());
            });
        });
    }

    group.finish();
}

/// Moves items through a small queue with many producers and consumers.
fn run_handoff(options: QueueOptions, producers: u64, consumers: u64) {
    let queue = Arc::new(BoundedQueue::with_options(options).unwrap());
    let total = producers * ITEMS_PER_PRODUCER;
    let per_consumer = total / consumers;

    let mut handles = Vec::new();
    for producer in 0..producers {
        let queue = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for value in 0..ITEMS_PER_PRODUCER {
                queue.put(producer * ITEMS_PER_PRODUCER + value).unwrap();
            }
        }));
    }
    for _ in 0..consumers {
        let queue = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for _ in 0..per_consumer {
                black_box(queue.take().unwrap());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

/// Broadcast wakes every waiter on every change, targeted wakes one on the
/// matching side. Compare both as thread counts grow.
fn bench_wake_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_contended_handoff");
    group.sample_size(10);

    for threads in [2u64, 4, 8] {
        group.throughput(Throughput::Elements(threads * ITEMS_PER_PRODUCER));
        for wake in [WakePolicy::Broadcast, WakePolicy::Targeted] {
            let options = QueueOptions::new(10).wake(wake);
            group.bench_with_input(
                BenchmarkId::new(wake.as_str(), threads),
                &threads,
                |b, &threads| {
                    b.iter(|| run_handoff(options, threads, threads));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended_handoff, bench_wake_policies);
criterion_main!(benches);
