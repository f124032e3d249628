//! Worker pools driven by a parsed configuration.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use conveyor_config::ConveyorConfig;
use conveyor_core::queue::BoundedQueue;
use conveyor_core::workers::{Console, PauseRange, PoolPlan, Role, WorkerPool, WorkerSettings};
use ntest::timeout;
use serial_test::serial;
use tracing_test::traced_test;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
#[serial]
#[traced_test]
#[timeout(30000)]
fn configured_pool_runs_to_completion() {
    let config = ConveyorConfig::parse(
        r#"
        [queue]
        capacity = 3
        order = "fifo"
        wake = "targeted"

        [workers]
        producers = 4
        consumers = 3
        items = 25
        pause_min_ms = 0
        pause_max_ms = 1
        "#,
    )
    .expect("valid config");

    let queue = Arc::new(BoundedQueue::with_options(config.queue_options().unwrap()).unwrap());
    let capture = Capture::default();
    let pool = WorkerPool::spawn(
        Arc::clone(&queue),
        Arc::new(Console::new(capture.clone())),
        config.pool_plan().unwrap(),
    )
    .expect("pool should start");

    let report = pool.join().expect("no worker panicked");

    assert_eq!(report.produced(), 100);
    assert_eq!(report.consumed(), 100);
    assert!(report.producers.iter().all(|worker| worker.role == Role::Producer));
    assert!(queue.is_closed());
    assert!(queue.is_empty());

    let lines = capture.lines();
    assert_eq!(lines.len(), 200);
    assert_eq!(
        lines.iter().filter(|line| line.contains(" produced ")).count(),
        100
    );
    assert_eq!(
        lines.iter().filter(|line| line.contains(" consumed ")).count(),
        100
    );

    assert!(logs_contain("worker pool started"));
}

#[test]
#[serial]
#[timeout(30000)]
fn closing_the_shared_queue_stops_endless_workers() {
    let queue = Arc::new(BoundedQueue::new(10).unwrap());
    let plan = PoolPlan::new(2, 2)
        .producer_settings(
            WorkerSettings::default().pause(PauseRange::fixed(Duration::from_millis(2))),
        )
        .consumer_settings(
            WorkerSettings::default().pause(PauseRange::fixed(Duration::from_millis(5))),
        );

    let pool = WorkerPool::spawn(Arc::clone(&queue), Arc::new(Console::silent()), plan)
        .expect("pool should start");

    let closer_queue = Arc::clone(&queue);
    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        closer_queue.close()
    });

    let report = pool.join().expect("no worker panicked");
    assert!(closer.join().expect("closer finished"));

    assert!(report.produced() > 0);
    assert_eq!(report.produced(), report.consumed());
    assert!(queue.is_empty());
}
