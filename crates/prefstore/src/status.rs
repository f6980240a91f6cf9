//! Built-in entries showing the state of the device services

use async_trait::async_trait;

use prefstore_core::prefs::{CheckInSettings, GcmSettings};
use prefstore_ui::{ProviderContext, SettingsProvider};

use crate::prelude::*;

pub const PREF_CHECKIN: &str = "pref_checkin";
pub const PREF_GCM: &str = "pref_gcm";
pub const PREF_ABOUT: &str = "pref_about";

const STATUS_ENABLED: &str = "Enabled";
const STATUS_DISABLED: &str = "Disabled";

fn status(enabled: bool) -> &'static str {
	if enabled { STATUS_ENABLED } else { STATUS_DISABLED }
}

/// Check-in, push messaging and about entries of the main screen
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceStatusProvider;

impl ServiceStatusProvider {
	fn checkin() -> SettingsEntry {
		SettingsEntry::new(PREF_CHECKIN, "Google device registration", Group::Google, "openCheckinSettings")
			.icon("ic_device_login")
	}

	fn gcm() -> SettingsEntry {
		SettingsEntry::new(PREF_GCM, "Cloud Messaging", Group::Google, "openGcmSettings")
			.icon("ic_cloud_bell")
	}

	fn about() -> SettingsEntry {
		SettingsEntry::new(PREF_ABOUT, "About", Group::Footer, "openAbout")
			.summary(format!("Version {}", VERSION))
	}
}

#[async_trait]
impl SettingsProvider for ServiceStatusProvider {
	fn name(&self) -> &str {
		"service-status"
	}

	fn entries_static(&self, _ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
		Ok(vec![Self::checkin(), Self::gcm(), Self::about()])
	}

	async fn entries_dynamic(&self, ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
		let checkin = CheckInSettings::fetch(&ctx.contract).await?;
		let gcm = GcmSettings::fetch(&ctx.contract).await?;
		debug!("Service status: checkin={} gcm={}", checkin.enabled, gcm.enabled);

		Ok(vec![
			Self::checkin().summary(status(checkin.enabled)),
			Self::gcm().summary(status(gcm.enabled)),
			Self::about(),
		])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use prefstore_types::store_adapter::InMemoryStore;
	use prefstore_types::worker::WorkerPool;
	use std::sync::Arc;

	fn ctx(provision: bool) -> ProviderContext {
		let authority = Authority::from_namespace("org.example.gms").unwrap();
		let contract = SettingsContract::new(
			authority,
			Arc::new(InMemoryStore::new()),
			Arc::new(WorkerPool::new(1, 1, 1)),
		);
		if provision {
			contract.provision_all().unwrap();
		}
		ProviderContext::new(contract)
	}

	#[test]
	fn test_static_entries() {
		let entries = ServiceStatusProvider.entries_static(&ctx(false)).unwrap();
		let keys: Vec<&str> = entries.iter().map(|e| e.key.as_ref()).collect();
		assert_eq!(keys, [PREF_CHECKIN, PREF_GCM, PREF_ABOUT]);
		assert!(entries[0].summary.is_none());
		assert_eq!(entries[2].group, Group::Footer);
	}

	#[tokio::test]
	async fn test_dynamic_reflects_store() {
		let ctx = ctx(true);
		CheckInSettings::set_enabled(&ctx.contract, false).unwrap();
		GcmSettings::set_enabled(&ctx.contract, true).unwrap();

		let entries = ServiceStatusProvider.entries_dynamic(&ctx).await.unwrap();
		assert_eq!(entries[0].summary.as_deref(), Some(STATUS_DISABLED));
		assert_eq!(entries[1].summary.as_deref(), Some(STATUS_ENABLED));
	}

	#[tokio::test]
	async fn test_dynamic_fails_on_unprovisioned_store() {
		assert!(ServiceStatusProvider.entries_dynamic(&ctx(false)).await.is_err());
	}
}

// vim: ts=4
