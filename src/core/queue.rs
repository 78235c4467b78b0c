//! Bounded concurrent work queue.
//!
//! Couples one or more producers to a fixed pool of worker threads.
//! The queue knows nothing about documents or indexing semantics; it
//! moves opaque payloads in FIFO order and provides backpressure:
//! [`WorkQueue::put`] blocking on a full queue is the sole
//! flow-control mechanism between a fast crawler and slower
//! per-document processing.
//!
//! Shutdown is cooperative: [`WorkQueue::shutdown`] wakes every
//! blocked producer and consumer, lets workers drain what was
//! already queued, refuses further `put`s, and joins the pool.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::JoinHandle;

struct Inner<T> {
    queue: VecDeque<T>,
    capacity: usize,
    terminate: bool,
    workers_started: usize,
    workers_exited: usize,
}

/// Shared state between the queue handle and its worker threads.
struct Core<T> {
    name: String,
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> Core<T> {
    fn put(&self, task: T) -> bool {
        let mut inner = self.inner.lock();
        while inner.queue.len() >= inner.capacity && !inner.terminate {
            if inner.workers_started > 0 && inner.workers_exited >= inner.workers_started {
                tracing::warn!(queue = %self.name, "put: all workers exited, refusing item");
                return false;
            }
            self.not_full.wait(&mut inner);
        }
        if inner.terminate {
            return false;
        }
        inner.queue.push_back(task);
        drop(inner);
        self.not_empty.notify_one();
        true
    }

    fn take(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        while inner.queue.is_empty() && !inner.terminate {
            self.not_empty.wait(&mut inner);
        }
        match inner.queue.pop_front() {
            Some(task) => {
                drop(inner);
                self.not_full.notify_one();
                Some(task)
            }
            None => None, // terminated and drained
        }
    }

    fn worker_exit(&self) {
        let mut inner = self.inner.lock();
        inner.workers_exited += 1;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    fn terminate(&self) {
        let mut inner = self.inner.lock();
        inner.terminate = true;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}

/// Generic bounded FIFO queue with an attached worker pool.
pub struct WorkQueue<T> {
    core: Arc<Core<T>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<T: Send + 'static> WorkQueue<T> {
    /// Create a queue holding at most `capacity` pending items.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        Self {
            core: Arc::new(Core {
                name: name.into(),
                inner: Mutex::new(Inner {
                    queue: VecDeque::with_capacity(capacity),
                    capacity,
                    terminate: false,
                    workers_started: 0,
                    workers_exited: 0,
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            }),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Spawn the fixed worker pool. Each worker loops `take` →
    /// `work` until the queue terminates and drains. A worker whose
    /// `work` call returns `false` deregisters itself and stops
    /// without tearing down the rest of the pool.
    ///
    /// Returns `false` if the queue was already terminated.
    pub fn start<F>(&self, worker_count: usize, work: F) -> bool
    where
        F: Fn(T) -> bool + Send + Sync + 'static,
    {
        let work = Arc::new(work);
        {
            let mut inner = self.core.inner.lock();
            if inner.terminate {
                return false;
            }
            inner.workers_started += worker_count;
        }
        let mut handles = self.handles.lock();
        for i in 0..worker_count {
            let core = Arc::clone(&self.core);
            let work = Arc::clone(&work);
            let handle = std::thread::Builder::new()
                .name(format!("{}-{}", self.core.name, i))
                .spawn(move || {
                    while let Some(task) = core.take() {
                        if !work(task) {
                            tracing::debug!(queue = %core.name, "worker deregistering");
                            break;
                        }
                    }
                    core.worker_exit();
                })
                .expect("failed to spawn worker thread");
            handles.push(handle);
        }
        true
    }

    /// Enqueue one item, blocking while the queue is at capacity.
    ///
    /// Returns `false` once the queue has been told to terminate, or
    /// when every worker has exited and nobody can ever drain the
    /// backlog.
    pub fn put(&self, task: T) -> bool {
        self.core.put(task)
    }

    /// Dequeue one item, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue has been terminated and
    /// drained; items still queued at termination are handed out
    /// normally first.
    pub fn take(&self) -> Option<T> {
        self.core.take()
    }

    /// Voluntary deregistration of one worker (fatal per-worker
    /// condition). Wakes blocked producers so they can notice a dead
    /// pool.
    pub fn worker_exit(&self) {
        self.core.worker_exit();
    }

    /// Number of items currently pending.
    pub fn pending(&self) -> usize {
        self.core.inner.lock().queue.len()
    }

    /// Wake all blocked threads and refuse further `put`s. In-flight
    /// and already-queued items still get processed.
    pub fn terminate(&self) {
        self.core.terminate();
    }

    /// Terminate, then join the worker pool. Every queued item has
    /// been processed when this returns.
    pub fn shutdown(&self) {
        self.core.terminate();
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if handle.join().is_err() {
                tracing::error!(queue = %self.core.name, "worker thread panicked");
            }
        }
    }
}
