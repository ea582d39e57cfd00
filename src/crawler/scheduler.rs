//! Bounded worker pool for crawl tasks
//!
//! This module handles:
//! - An explicit task queue that workers pull from and submit back into
//! - A fixed number of worker tasks (the pool size)
//! - Quiescence detection: the run ends once no task is queued or running
//! - Early shutdown when the caller's cancellation token fires

use crate::url::NormalizedUrl;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A URL waiting to be processed at a given depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The normalized URL to process
    pub url: NormalizedUrl,

    /// Link distance from the start URL
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: NormalizedUrl, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The depth-0 task for the start URL
    pub fn seed(url: NormalizedUrl) -> Self {
        Self::new(url, 0)
    }

    /// A task for a link found on this task's page
    pub fn child(&self, url: NormalizedUrl) -> Self {
        Self::new(url, self.depth + 1)
    }
}

struct QueueShared {
    sender: mpsc::UnboundedSender<CrawlTask>,
    /// Tasks submitted but not yet finished (queued plus running)
    outstanding: AtomicUsize,
    /// Cancelled at quiescence, or when the caller's token fires
    shutdown: CancellationToken,
}

/// Submission handle shared by the workers of one run
///
/// Every discovered link goes back through here so it runs on whichever worker
/// is free, instead of inline on the worker that found it.
#[derive(Clone)]
pub struct TaskQueue {
    shared: Arc<QueueShared>,
}

impl TaskQueue {
    fn new(sender: mpsc::UnboundedSender<CrawlTask>, shutdown: CancellationToken) -> Self {
        Self {
            shared: Arc::new(QueueShared {
                sender,
                outstanding: AtomicUsize::new(0),
                shutdown,
            }),
        }
    }

    /// Queues a task for the pool
    ///
    /// # Returns
    ///
    /// * `true` - The task was queued
    /// * `false` - The pool is shutting down and the task was dropped
    pub fn submit(&self, task: CrawlTask) -> bool {
        if self.shared.shutdown.is_cancelled() {
            return false;
        }

        // Count before sending so a worker finishing concurrently cannot
        // observe zero while this task is in flight
        self.shared.outstanding.fetch_add(1, Ordering::SeqCst);

        if self.shared.sender.send(task).is_err() {
            self.complete_one();
            return false;
        }
        true
    }

    fn complete_one(&self) {
        if self.shared.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::debug!("Task queue drained");
            self.shared.shutdown.cancel();
        }
    }
}

/// Marks a task finished even if its handler panics
struct Completion(TaskQueue);

impl Drop for Completion {
    fn drop(&mut self) {
        self.0.complete_one();
    }
}

/// Fixed-size pool of crawl workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool with `concurrency` workers (at least one)
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `handler` over `seeds` and every task submitted while running
    ///
    /// Returns once the queue is quiescent or `cancel` fires. Tasks still
    /// queued at cancellation are dropped; running handlers finish first.
    ///
    /// # Arguments
    ///
    /// * `seeds` - Initial tasks
    /// * `cancel` - Caller's cancellation token
    /// * `handler` - Processes one task; may submit more through the queue
    pub async fn run<F, Fut>(&self, seeds: Vec<CrawlTask>, cancel: &CancellationToken, handler: F)
    where
        F: Fn(CrawlTask, TaskQueue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shutdown = cancel.child_token();
        let queue = TaskQueue::new(sender, shutdown.clone());

        let mut seeded = 0;
        for seed in seeds {
            if queue.submit(seed) {
                seeded += 1;
            }
        }
        if seeded == 0 {
            return;
        }

        let receiver = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);
        let mut workers = JoinSet::new();

        for worker_id in 0..self.concurrency {
            let receiver = Arc::clone(&receiver);
            let handler = Arc::clone(&handler);
            let queue = queue.clone();
            let shutdown = shutdown.clone();

            workers.spawn(async move {
                loop {
                    let next = {
                        let mut receiver = receiver.lock().await;
                        tokio::select! {
                            biased;
                            _ = shutdown.cancelled() => None,
                            task = receiver.recv() => task,
                        }
                    };

                    let Some(task) = next else {
                        break;
                    };

                    tracing::trace!(
                        "Worker {} picked {} (depth {})",
                        worker_id,
                        task.url,
                        task.depth
                    );

                    let completion = Completion(queue.clone());
                    handler(task, queue.clone()).await;
                    drop(completion);
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker failed: {}", e);
            }
        }
    }
}
