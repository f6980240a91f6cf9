//! Worker pool for blocking store calls. 3 priority levels, configurable worker threads.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::{future::Future, sync::Arc, thread};

use crate::prelude::*;

#[derive(Clone, Copy, Debug)]
pub enum Priority {
	High,
	Medium,
	Low,
}

type Job = Box<dyn FnOnce() + Send>;

#[derive(Debug)]
pub struct WorkerPool {
	high: Sender<Job>,
	med: Sender<Job>,
	low: Sender<Job>,
}

impl WorkerPool {
	/// `n1` threads serve High only, `n2` serve High + Medium, `n3` serve all queues
	pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
		let (high, rx_high) = flume::unbounded();
		let (med, rx_med) = flume::unbounded();
		let (low, rx_low) = flume::unbounded();

		let rx_high = Arc::new(rx_high);
		let rx_med = Arc::new(rx_med);
		let rx_low = Arc::new(rx_low);

		for _ in 0..n1 {
			let rx_high = Arc::clone(&rx_high);
			thread::spawn(move || worker_loop(&[rx_high]));
		}

		for _ in 0..n2 {
			let rx_high = Arc::clone(&rx_high);
			let rx_med = Arc::clone(&rx_med);
			thread::spawn(move || worker_loop(&[rx_high, rx_med]));
		}

		for _ in 0..n3 {
			let rx_high = Arc::clone(&rx_high);
			let rx_med = Arc::clone(&rx_med);
			let rx_low = Arc::clone(&rx_low);
			thread::spawn(move || worker_loop(&[rx_high, rx_med, rx_low]));
		}

		debug!("Worker pool started ({} high, {} medium, {} low)", n1, n2, n3);
		Self { high, med, low }
	}

	/// Submit a closure → returns a Future for the result
	pub fn spawn<F, T>(&self, priority: Priority, f: F) -> impl Future<Output = PsResult<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job: Job = Box::new(move || {
			let result = f();
			let _ignore = res_tx.send(result);
		});

		let queue = match priority {
			Priority::High => &self.high,
			Priority::Medium => &self.med,
			Priority::Low => &self.low,
		};
		if queue.send(job).is_err() {
			error!("Failed to send job to {:?} priority worker queue", priority);
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}

	pub fn run<F, T>(&self, f: F) -> impl Future<Output = PsResult<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		self.spawn(Priority::Medium, f)
	}

	/// Like `spawn`, but flattens `PsResult<PsResult<T>>` into `PsResult<T>`.
	/// Use when the closure itself returns `PsResult<T>`.
	pub fn try_spawn<F, T>(&self, priority: Priority, f: F) -> impl Future<Output = PsResult<T>>
	where
		F: FnOnce() -> PsResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.spawn(priority, f);
		async move { fut.await? }
	}

	/// Like `run`, but flattens `PsResult<PsResult<T>>` into `PsResult<T>`.
	pub fn try_run<F, T>(&self, f: F) -> impl Future<Output = PsResult<T>>
	where
		F: FnOnce() -> PsResult<T> + Send + 'static,
		T: Send + 'static,
	{
		self.try_spawn(Priority::Medium, f)
	}
}

impl Default for WorkerPool {
	fn default() -> Self {
		Self::new(1, 1, 1)
	}
}

type JobQueue = Arc<Receiver<Job>>;

fn worker_loop(queues: &[JobQueue]) {
	loop {
		// Try higher-priority queues first (non-blocking)
		let mut job = None;
		for rx in queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		if let Some(job) = job {
			if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
				error!("Worker thread caught panic: {:?}", e);
			}
			continue;
		}

		// Wait for next job
		let mut selector = flume::Selector::new();
		for rx in queues {
			selector = selector.recv(rx, |res| res);
		}

		match selector.wait() {
			Ok(job) => {
				if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
					error!("Worker thread caught panic: {:?}", e);
				}
			}
			// Every sender is gone, the pool was dropped
			Err(flume::RecvError::Disconnected) => return,
		}
	}
}


// vim: ts=4
