// FIFO ordering and backpressure under real threads

use ferret::core::queue::WorkQueue;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_fifo_across_producer_and_consumer_threads() {
    let queue = Arc::new(WorkQueue::new("fifo-threads", 4));
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    // single worker: global FIFO must be preserved exactly
    assert!(queue.start(1, move |task: usize| {
        sink.lock().push(task);
        true
    }));

    let producer_queue = Arc::clone(&queue);
    let producer = std::thread::spawn(move || {
        for i in 0..200 {
            assert!(producer_queue.put(i));
        }
    });
    producer.join().unwrap();
    queue.shutdown();

    let order = seen.lock();
    assert_eq!(*order, (0..200).collect::<Vec<_>>());
}

#[test]
fn test_backpressure_blocks_fast_producer() {
    let queue = Arc::new(WorkQueue::new("slow-consumer", 2));
    let processed = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&processed);
    assert!(queue.start(1, move |_task: usize| {
        std::thread::sleep(Duration::from_millis(10));
        counter.fetch_add(1, Ordering::SeqCst);
        true
    }));

    // far more puts than capacity: every one must land eventually,
    // with put() blocking as the only flow control
    for i in 0..30 {
        assert!(queue.put(i));
        assert!(queue.pending() <= 2);
    }
    queue.shutdown();
    assert_eq!(processed.load(Ordering::SeqCst), 30);
}

#[test]
fn test_terminate_wakes_blocked_producer() {
    let queue: Arc<WorkQueue<usize>> = Arc::new(WorkQueue::new("wake", 1));
    assert!(queue.put(0));

    let blocked = Arc::clone(&queue);
    let producer = std::thread::spawn(move || blocked.put(1));

    std::thread::sleep(Duration::from_millis(50));
    queue.terminate();
    // the blocked put returns failure instead of hanging forever
    assert!(!producer.join().unwrap());
}

#[test]
fn test_multiple_workers_process_all_tasks_once() {
    let queue = Arc::new(WorkQueue::new("pool", 8));
    let hits = Arc::new(Mutex::new(vec![0u8; 500]));

    let sink = Arc::clone(&hits);
    assert!(queue.start(4, move |task: usize| {
        sink.lock()[task] += 1;
        true
    }));

    for i in 0..500 {
        assert!(queue.put(i));
    }
    queue.shutdown();

    assert!(hits.lock().iter().all(|&n| n == 1));
}
