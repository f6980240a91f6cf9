//! Lifetime of one settings screen instance
//!
//! A scope owns the reconciler of a screen. Refreshes run their gather phase
//! on the tokio runtime and apply under the screen lock. Once the scope is
//! closed or dropped, pending refreshes are aborted and a gather that still
//! completes is discarded. Overlapping refreshes apply in start order: a gather
//! that finishes after a newer one was applied is dropped.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::task::{AbortHandle, JoinHandle};

use crate::prelude::*;
use crate::provider::{FrozenProviderRegistry, ProviderContext};
use crate::reconciler::{ReconcileReport, SettingsReconciler};
use crate::screen::{Navigator, SettingsScreen};

#[derive(Debug)]
pub struct ScreenScope {
	reconciler: Arc<Mutex<SettingsReconciler>>,
	registry: FrozenProviderRegistry,
	ctx: ProviderContext,
	tasks: Mutex<Vec<AbortHandle>>,
	closed: Arc<AtomicBool>,
	/// Generation of the last started refresh
	issued: AtomicU64,
	/// Generation of the last applied refresh, only written under the reconciler lock
	applied: Arc<AtomicU64>,
	build_report: ReconcileReport,
}

impl ScreenScope {
	/// Create the screen and run the build phase
	pub fn create(
		registry: FrozenProviderRegistry,
		screen: SettingsScreen,
		ctx: ProviderContext,
	) -> PsResult<Self> {
		let mut reconciler = SettingsReconciler::new(registry.clone(), screen);
		let build_report = reconciler.build(&ctx)?;
		Ok(Self {
			reconciler: Arc::new(Mutex::new(reconciler)),
			registry,
			ctx,
			tasks: Mutex::new(Vec::new()),
			closed: Arc::new(AtomicBool::new(false)),
			issued: AtomicU64::new(0),
			applied: Arc::new(AtomicU64::new(0)),
			build_report,
		})
	}

	pub fn build_report(&self) -> &ReconcileReport {
		&self.build_report
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	/// Start a refresh. Must be called within a tokio runtime.
	///
	/// The task yields `None` when the scope was closed before it could apply,
	/// or when a refresh started later was applied first.
	pub fn on_resume(&self) -> JoinHandle<Option<ReconcileReport>> {
		let generation = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
		let weak = Arc::downgrade(&self.reconciler);
		let closed = self.closed.clone();
		let applied = self.applied.clone();
		let registry = self.registry.clone();
		let ctx = self.ctx.clone();

		let handle = tokio::spawn(async move {
			let batches = SettingsReconciler::gather(&registry, &ctx).await;
			let reconciler = weak.upgrade()?;
			let mut reconciler = reconciler.lock();
			if closed.load(Ordering::Acquire) {
				debug!("Screen closed, dropping {} gathered batches", batches.len());
				return None;
			}
			if generation <= applied.load(Ordering::Acquire) {
				debug!(
					"Refresh {} superseded, dropping {} gathered batches",
					generation,
					batches.len()
				);
				return None;
			}
			applied.store(generation, Ordering::Release);
			Some(reconciler.apply(batches))
		});

		let mut tasks = self.tasks.lock();
		tasks.retain(|task| !task.is_finished());
		if self.is_closed() {
			handle.abort();
		} else {
			tasks.push(handle.abort_handle());
		}
		handle
	}

	/// Run `f` against the current state of the screen
	pub fn with_screen<R>(&self, f: impl FnOnce(&SettingsScreen) -> R) -> R {
		f(self.reconciler.lock().screen())
	}

	pub fn click(&self, key: &str, navigator: &dyn Navigator) -> PsResult<()> {
		self.reconciler.lock().screen().click(key, navigator)
	}

	/// Tear the screen down, cancelling pending refreshes
	pub fn close(&self) {
		{
			let _reconciler = self.reconciler.lock();
			if self.closed.swap(true, Ordering::AcqRel) {
				return;
			}
		}
		let tasks = std::mem::take(&mut *self.tasks.lock());
		for task in &tasks {
			task.abort();
		}
		debug!("Screen closed, {} pending refreshes aborted", tasks.len());
	}
}

impl Drop for ScreenScope {
	fn drop(&mut self) {
		self.close();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::{ProviderRegistry, SettingsProvider};
	use async_trait::async_trait;
	use prefstore_types::store_adapter::InMemoryStore;
	use prefstore_types::worker::WorkerPool;
	use std::time::Duration;

	#[derive(Debug)]
	struct Counter {
		calls: Mutex<u32>,
		delay_ms: u64,
		/// Make the first dynamic call the slowest
		slow_first: bool,
	}

	#[async_trait]
	impl SettingsProvider for Counter {
		fn name(&self) -> &str {
			"counter"
		}

		fn entries_static(&self, _ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
			Ok(vec![SettingsEntry::new("count", "Count", Group::Other, "count").summary("0")])
		}

		async fn entries_dynamic(&self, _ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
			let calls = {
				let mut calls = self.calls.lock();
				*calls += 1;
				*calls
			};
			let delay_ms = if self.slow_first && calls == 1 { 100 } else { self.delay_ms };
			tokio::time::sleep(Duration::from_millis(delay_ms)).await;
			Ok(vec![
				SettingsEntry::new("count", "Count", Group::Other, "count").summary(calls.to_string()),
			])
		}
	}

	fn scope(delay_ms: u64) -> ScreenScope {
		scope_with(Counter { calls: Mutex::new(0), delay_ms, slow_first: false })
	}

	fn scope_with(counter: Counter) -> ScreenScope {
		let mut registry = ProviderRegistry::new();
		registry.register(Arc::new(counter)).unwrap();
		let authority = Authority::from_namespace("org.example").unwrap();
		let ctx = ProviderContext::new(SettingsContract::new(
			authority,
			Arc::new(InMemoryStore::new()),
			Arc::new(WorkerPool::new(1, 1, 1)),
		));
		ScreenScope::create(registry.freeze(), SettingsScreen::default_layout(), ctx).unwrap()
	}

	fn summary(scope: &ScreenScope) -> Option<String> {
		scope.with_screen(|s| {
			s.find_item("count").and_then(|i| i.summary.as_deref()).map(String::from)
		})
	}

	#[tokio::test]
	async fn test_resume_applies_refresh() {
		let scope = scope(0);
		assert_eq!(scope.build_report().added, 1);
		assert_eq!(summary(&scope).as_deref(), Some("0"));

		let report = scope.on_resume().await.unwrap().unwrap();
		assert_eq!(report.updated, 1);
		assert_eq!(summary(&scope).as_deref(), Some("1"));
	}

	#[tokio::test]
	async fn test_stale_refresh_is_dropped() {
		let scope = scope_with(Counter { calls: Mutex::new(0), delay_ms: 0, slow_first: true });
		let older = scope.on_resume();
		// Let the older refresh start its slow gather
		tokio::time::sleep(Duration::from_millis(10)).await;
		let newer = scope.on_resume();

		let newer = newer.await.unwrap();
		assert_eq!(newer.map(|r| r.updated), Some(1));
		assert_eq!(summary(&scope).as_deref(), Some("2"));

		assert_eq!(older.await.unwrap(), None);
		assert_eq!(summary(&scope).as_deref(), Some("2"));
	}

	#[tokio::test]
	async fn test_close_before_gather_completes() {
		let scope = scope(100);
		let handle = scope.on_resume();
		tokio::time::sleep(Duration::from_millis(10)).await;
		scope.close();

		let res = handle.await;
		assert!(matches!(res, Err(ref e) if e.is_cancelled()) || matches!(res, Ok(None)));
		assert_eq!(summary(&scope).as_deref(), Some("0"));
	}

	#[tokio::test]
	async fn test_resume_after_close_is_cancelled() {
		let scope = scope(0);
		scope.close();
		assert!(scope.is_closed());

		let res = scope.on_resume().await;
		assert!(matches!(res, Err(ref e) if e.is_cancelled()) || matches!(res, Ok(None)));
		assert_eq!(summary(&scope).as_deref(), Some("0"));
	}

	#[tokio::test]
	async fn test_drop_discards_pending_refresh() {
		let scope = scope(50);
		let handle = scope.on_resume();
		drop(scope);

		let res = handle.await;
		assert!(matches!(res, Err(ref e) if e.is_cancelled()) || matches!(res, Ok(None)));
	}
}

// vim: ts=4
