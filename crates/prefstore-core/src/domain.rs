//! Configuration domains and their fixed attribute keys
//!
//! Column names match the pre-existing store byte for byte.

use std::fmt;

use crate::prelude::*;

/// A named partition of settings with a fixed projection
#[derive(Clone, Copy)]
pub struct ConfigDomain {
	/// Path segment of the domain address
	pub id: &'static str,
	/// Name used by tooling and logs
	pub name: &'static str,
	/// Ordered attribute keys, unique within the domain
	pub projection: &'static [&'static str],
	defaults: fn() -> ConfigValues,
}

impl ConfigDomain {
	/// Install-time values for every key of the projection
	pub fn defaults(&self) -> ConfigValues {
		(self.defaults)()
	}

	pub fn address(&self, authority: &Authority) -> ConfigAddress {
		resolve_address(authority, self)
	}

	pub fn has_key(&self, key: &str) -> bool {
		self.projection.contains(&key)
	}
}

impl fmt::Debug for ConfigDomain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigDomain")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("projection", &self.projection)
			.finish_non_exhaustive()
	}
}

impl PartialEq for ConfigDomain {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for ConfigDomain {}

/// Address of `domain` under `authority`. Pure, no I/O.
pub fn resolve_address(authority: &Authority, domain: &ConfigDomain) -> ConfigAddress {
	ConfigAddress::new(authority, domain.id)
}

pub mod check_in {
	use super::*;

	pub const ENABLED: &str = "checkin_enable_service";
	pub const ANDROID_ID: &str = "androidId";
	pub const DIGEST: &str = "digest";
	pub const LAST_CHECK_IN: &str = "lastCheckin";
	pub const SECURITY_TOKEN: &str = "securityToken";
	pub const VERSION_INFO: &str = "versionInfo";
	pub const DEVICE_DATA_VERSION_INFO: &str = "deviceDataVersionInfo";
	pub const BRAND_SPOOF: &str = "brandSpoof";
	pub const HIDE_LAUNCHER_ICON: &str = "hideLauncherIcon";

	pub const PROJECTION: &[&str] = &[
		ENABLED,
		ANDROID_ID,
		DIGEST,
		LAST_CHECK_IN,
		SECURITY_TOKEN,
		VERSION_INFO,
		DEVICE_DATA_VERSION_INFO,
		BRAND_SPOOF,
		HIDE_LAUNCHER_ICON,
	];

	pub const PREFERENCES_NAME: &str = "checkin";
	pub const INITIAL_DIGEST: &str = "1-929a0dca0eee55513280171a8585da7dcd3700f8";

	pub const DOMAIN: ConfigDomain =
		ConfigDomain { id: "check-in", name: "check-in", projection: PROJECTION, defaults };

	fn defaults() -> ConfigValues {
		ConfigValues::new()
			.with(ENABLED, true)
			.with(ANDROID_ID, 0)
			.with(DIGEST, INITIAL_DIGEST)
			.with(LAST_CHECK_IN, 0)
			.with(SECURITY_TOKEN, 0)
			.with(VERSION_INFO, "")
			.with(DEVICE_DATA_VERSION_INFO, "")
			.with(BRAND_SPOOF, false)
			.with(HIDE_LAUNCHER_ICON, false)
	}
}

/// Push messaging
pub mod gcm {
	use super::*;

	pub const FULL_LOG: &str = "gcm_full_log";
	pub const LAST_PERSISTENT_ID: &str = "gcm_last_persistent_id";
	pub const ENABLE_SERVICE: &str = "gcm_enable_mcs_service";

	pub const NETWORK_MOBILE: &str = "gcm_network_mobile";
	pub const NETWORK_WIFI: &str = "gcm_network_wifi";
	pub const NETWORK_ROAMING: &str = "gcm_network_roaming";
	pub const NETWORK_OTHER: &str = "gcm_network_other";

	pub const LEARNT_MOBILE: &str = "gcm_learnt_mobile";
	pub const LEARNT_WIFI: &str = "gcm_learnt_wifi";
	pub const LEARNT_OTHER: &str = "gcm_learnt_other";

	pub const PROJECTION: &[&str] = &[
		FULL_LOG,
		LAST_PERSISTENT_ID,
		ENABLE_SERVICE,
		NETWORK_MOBILE,
		NETWORK_WIFI,
		NETWORK_ROAMING,
		NETWORK_OTHER,
		LEARNT_MOBILE,
		LEARNT_WIFI,
		LEARNT_OTHER,
	];

	/// Initial heartbeat interval (ms) before the connection has learnt a better one
	pub const DEFAULT_LEARNT_INTERVAL: i64 = 300_000;

	pub const DOMAIN: ConfigDomain =
		ConfigDomain { id: "gcm", name: "push-messaging", projection: PROJECTION, defaults };

	fn defaults() -> ConfigValues {
		ConfigValues::new()
			.with(FULL_LOG, true)
			.with(LAST_PERSISTENT_ID, ConfigValue::Null)
			.with(ENABLE_SERVICE, false)
			.with(NETWORK_MOBILE, 0)
			.with(NETWORK_WIFI, 0)
			.with(NETWORK_ROAMING, 0)
			.with(NETWORK_OTHER, 0)
			.with(LEARNT_MOBILE, DEFAULT_LEARNT_INTERVAL)
			.with(LEARNT_WIFI, DEFAULT_LEARNT_INTERVAL)
			.with(LEARNT_OTHER, DEFAULT_LEARNT_INTERVAL)
	}
}

pub mod auth {
	use super::*;

	pub const TRUST_GOOGLE: &str = "auth_manager_trust_google";
	pub const VISIBLE: &str = "auth_manager_visible";

	pub const PROJECTION: &[&str] = &[TRUST_GOOGLE, VISIBLE];

	pub const DOMAIN: ConfigDomain =
		ConfigDomain { id: "auth", name: "auth", projection: PROJECTION, defaults };

	fn defaults() -> ConfigValues {
		ConfigValues::new().with(TRUST_GOOGLE, true).with(VISIBLE, false)
	}
}

pub mod profile {
	use super::*;

	pub const PROFILE: &str = "device_profile";
	pub const SERIAL: &str = "device_profile_serial";

	pub const PROJECTION: &[&str] = &[PROFILE, SERIAL];

	pub const PROFILE_AUTO: &str = "auto";

	pub const DOMAIN: ConfigDomain =
		ConfigDomain { id: "profile", name: "profile", projection: PROJECTION, defaults };

	fn defaults() -> ConfigValues {
		ConfigValues::new().with(PROFILE, PROFILE_AUTO).with(SERIAL, ConfigValue::Null)
	}
}

pub static ALL: [ConfigDomain; 4] = [check_in::DOMAIN, gcm::DOMAIN, auth::DOMAIN, profile::DOMAIN];

/// Look up a domain by id or by name
pub fn find(name: &str) -> PsResult<&'static ConfigDomain> {
	ALL.iter()
		.find(|d| d.id == name || d.name == name)
		.ok_or_else(|| Error::ValidationError(format!("Unknown settings domain: {}", name)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_address_is_deterministic() {
		let authority = Authority::from_namespace("com.google.android.gms").unwrap();
		for domain in &ALL {
			let a = resolve_address(&authority, domain);
			let b = resolve_address(&Authority::from_namespace("com.google.android.gms").unwrap(), domain);
			assert_eq!(a, b);
			assert_eq!(
				a.to_string(),
				format!("content://com.google.android.gms.microg.settings/{}", domain.id)
			);
		}
	}

	#[test]
	fn test_addresses_differ_per_namespace() {
		let a = Authority::from_namespace("org.one").unwrap();
		let b = Authority::from_namespace("org.two").unwrap();
		assert_ne!(auth::DOMAIN.address(&a), auth::DOMAIN.address(&b));
	}

	#[test]
	fn test_projection_keys_unique() {
		for domain in &ALL {
			let mut keys: Vec<&str> = domain.projection.to_vec();
			keys.sort_unstable();
			keys.dedup();
			assert_eq!(keys.len(), domain.projection.len(), "duplicate key in {}", domain.name);
		}
	}

	#[test]
	fn test_defaults_cover_projection() {
		for domain in &ALL {
			let defaults = domain.defaults();
			let keys: Vec<&str> = defaults.iter().map(|(k, _)| k).collect();
			assert_eq!(keys, domain.projection, "defaults of {}", domain.name);
		}
	}

	#[test]
	fn test_find() {
		assert_eq!(find("push-messaging").unwrap().id, "gcm");
		assert_eq!(find("gcm").unwrap().name, "push-messaging");
		assert_eq!(find("check-in").unwrap().projection.len(), 9);
		assert!(find("nope").is_err());
	}
}

// vim: ts=4
