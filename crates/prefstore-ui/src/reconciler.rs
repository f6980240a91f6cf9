//! Reconciliation of provider entries into a settings screen
//!
//! The screen keeps a keyed list of displayed items. Entries are merged in by
//! key: known keys are updated in place, unknown keys are placed into the
//! section of their group, and tracked keys no longer produced are hidden.
//! Items the layout declared itself are never tracked and never touched, and an
//! entry whose key is already on the screen is not placed.

use futures::future::join_all;
use std::collections::HashSet;

use crate::provider::{FrozenProviderRegistry, ProviderContext};
use crate::prelude::*;
use crate::screen::{DisplayedItem, ItemSlot, SettingsScreen};

/// Entries returned by one provider during a refresh
#[derive(Debug)]
pub struct ProviderBatch {
	/// Index of the provider in the frozen registry
	pub provider: usize,
	pub name: Box<str>,
	pub result: PsResult<Vec<SettingsEntry>>,
}

/// What a build or refresh pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
	pub added: usize,
	pub updated: usize,
	pub hidden: usize,
	pub failed: Vec<PlacementError>,
}

impl ReconcileReport {
	pub fn is_unchanged(&self) -> bool {
		self.added == 0 && self.updated == 0 && self.hidden == 0 && self.failed.is_empty()
	}
}

#[derive(Debug)]
struct Tracked {
	key: Box<str>,
	owner: Option<usize>,
	slot: ItemSlot,
}

#[derive(Debug)]
pub struct SettingsReconciler {
	registry: FrozenProviderRegistry,
	screen: SettingsScreen,
	tracked: Vec<Tracked>,
}

impl SettingsReconciler {
	pub fn new(registry: FrozenProviderRegistry, screen: SettingsScreen) -> Self {
		Self { registry, screen, tracked: Vec::new() }
	}

	pub fn screen(&self) -> &SettingsScreen {
		&self.screen
	}

	pub fn registry(&self) -> &FrozenProviderRegistry {
		&self.registry
	}

	pub fn is_tracked(&self, key: &str) -> bool {
		self.tracked.iter().any(|t| t.key.as_ref() == key)
	}

	/// Place the static entries of every provider, in registration order.
	///
	/// A provider failing to list its static entries fails the build.
	pub fn build(&mut self, ctx: &ProviderContext) -> PsResult<ReconcileReport> {
		let mut report = ReconcileReport::default();
		let registry = self.registry.clone();
		for (idx, provider) in registry.providers().enumerate() {
			let entries = provider.entries_static(ctx).inspect_err(|err| {
				error!("Provider {} failed to list static entries: {}", provider.name(), err);
			})?;
			for entry in &entries {
				self.upsert(Some(idx), entry, &mut report);
			}
		}
		info!(
			"Settings screen built: {} added, {} not placed",
			report.added,
			report.failed.len()
		);
		Ok(report)
	}

	/// Collect the dynamic entries of every provider concurrently.
	///
	/// Batches come back in registration order regardless of completion order.
	pub async fn gather(
		registry: &FrozenProviderRegistry,
		ctx: &ProviderContext,
	) -> Vec<ProviderBatch> {
		let futures = registry.providers().enumerate().map(|(idx, provider)| async move {
			let result = provider.entries_dynamic(ctx).await;
			ProviderBatch { provider: idx, name: provider.name().into(), result }
		});
		join_all(futures).await
	}

	/// Apply a gathered set of batches in one pass
	pub fn apply(&mut self, batches: Vec<ProviderBatch>) -> ReconcileReport {
		let mut failed_owners = HashSet::new();
		let mut latest = Vec::new();
		for batch in batches {
			match batch.result {
				Ok(entries) => latest.extend(entries.into_iter().map(|e| (Some(batch.provider), e))),
				Err(err) => {
					error!("Provider {} failed to list entries: {}", batch.name, err);
					failed_owners.insert(batch.provider);
				}
			}
		}
		self.apply_latest(latest, &failed_owners)
	}

	/// Apply entries not attributed to any provider
	pub fn apply_entries(&mut self, entries: Vec<SettingsEntry>) -> ReconcileReport {
		let latest = entries.into_iter().map(|e| (None, e)).collect();
		self.apply_latest(latest, &HashSet::new())
	}

	/// Gather and apply
	pub async fn refresh(&mut self, ctx: &ProviderContext) -> ReconcileReport {
		let batches = Self::gather(&self.registry, ctx).await;
		self.apply(batches)
	}

	fn apply_latest(
		&mut self,
		latest: Vec<(Option<usize>, SettingsEntry)>,
		failed_owners: &HashSet<usize>,
	) -> ReconcileReport {
		let mut report = ReconcileReport::default();

		let latest_keys: HashSet<&str> = latest.iter().map(|(_, e)| e.key.as_ref()).collect();
		for tracked in &self.tracked {
			if latest_keys.contains(tracked.key.as_ref()) {
				continue;
			}
			// Keep what a failing provider showed last time
			if tracked.owner.is_some_and(|owner| failed_owners.contains(&owner)) {
				continue;
			}
			if let Some(item) = self.screen.item_at_mut(tracked.slot)
				&& item.visible
			{
				item.visible = false;
				report.hidden += 1;
			}
		}

		for (owner, entry) in &latest {
			self.upsert(*owner, entry, &mut report);
		}

		debug!(
			"Reconciled: {} added, {} updated, {} hidden, {} not placed",
			report.added,
			report.updated,
			report.hidden,
			report.failed.len()
		);
		report
	}

	fn upsert(&mut self, owner: Option<usize>, entry: &SettingsEntry, report: &mut ReconcileReport) {
		if let Some(tracked) = self.tracked.iter_mut().find(|t| t.key == entry.key) {
			tracked.owner = owner;
			if let Some(item) = self.screen.item_at_mut(tracked.slot)
				&& item.fill_from_entry(entry)
			{
				report.updated += 1;
			}
			return;
		}

		let section = entry.group.section_key();
		match self.screen.add_item(section, DisplayedItem::from_entry(entry)) {
			Ok(slot) => {
				self.tracked.push(Tracked { key: entry.key.clone(), owner, slot });
				report.added += 1;
			}
			Err(err) => {
				warn!("{}", err);
				report.failed.push(err);
			}
		}
	}
}


// vim: ts=4
