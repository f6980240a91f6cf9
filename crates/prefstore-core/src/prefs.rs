//! Typed snapshots of each configuration domain

use crate::domain::{auth, check_in, gcm, profile};
use crate::prelude::*;

/// Check-in state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInSettings {
	pub enabled: bool,
	pub android_id: i64,
	pub digest: String,
	pub last_checkin: i64,
	pub security_token: i64,
	pub version_info: String,
	pub device_data_version_info: String,
	pub brand_spoof: bool,
	pub hide_launcher_icon: bool,
}

impl CheckInSettings {
	pub fn from_record(rec: &Record) -> PsResult<Self> {
		Ok(Self {
			enabled: rec.get_bool(check_in::ENABLED)?,
			android_id: rec.get_int_opt(check_in::ANDROID_ID)?.unwrap_or(0),
			digest: rec
				.get_string_opt(check_in::DIGEST)?
				.unwrap_or_else(|| check_in::INITIAL_DIGEST.into()),
			last_checkin: rec.get_int_opt(check_in::LAST_CHECK_IN)?.unwrap_or(0),
			security_token: rec.get_int_opt(check_in::SECURITY_TOKEN)?.unwrap_or(0),
			version_info: rec.get_string_opt(check_in::VERSION_INFO)?.unwrap_or_default(),
			device_data_version_info: rec
				.get_string_opt(check_in::DEVICE_DATA_VERSION_INFO)?
				.unwrap_or_default(),
			brand_spoof: rec.get_bool_opt(check_in::BRAND_SPOOF)?.unwrap_or(false),
			hide_launcher_icon: rec.get_bool_opt(check_in::HIDE_LAUNCHER_ICON)?.unwrap_or(false),
		})
	}

	pub fn load(contract: &SettingsContract) -> PsResult<Self> {
		contract.read_domain(&check_in::DOMAIN, Self::from_record)?
	}

	pub async fn fetch(contract: &SettingsContract) -> PsResult<Self> {
		contract.read(&check_in::DOMAIN, Self::from_record).await?
	}

	/// A device that never checked in has no android id yet
	pub fn is_registered(&self) -> bool {
		self.android_id != 0 && self.security_token != 0
	}

	pub fn set_enabled(contract: &SettingsContract, enabled: bool) -> PsResult<()> {
		contract.write_domain(&check_in::DOMAIN, &ConfigValues::new().with(check_in::ENABLED, enabled))
	}

	pub fn set_brand_spoof(contract: &SettingsContract, spoof: bool) -> PsResult<()> {
		contract
			.write_domain(&check_in::DOMAIN, &ConfigValues::new().with(check_in::BRAND_SPOOF, spoof))
	}

	pub fn set_hide_launcher_icon(contract: &SettingsContract, hide: bool) -> PsResult<()> {
		contract.write_domain(
			&check_in::DOMAIN,
			&ConfigValues::new().with(check_in::HIDE_LAUNCHER_ICON, hide),
		)
	}
}

/// Push messaging state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcmSettings {
	pub full_log: bool,
	pub last_persistent_id: Option<String>,
	pub enabled: bool,
	pub network_mobile: i64,
	pub network_wifi: i64,
	pub network_roaming: i64,
	pub network_other: i64,
	pub learnt_mobile: i64,
	pub learnt_wifi: i64,
	pub learnt_other: i64,
}

impl GcmSettings {
	pub fn from_record(rec: &Record) -> PsResult<Self> {
		let learnt = |key: &str| -> PsResult<i64> {
			Ok(rec.get_int_opt(key)?.unwrap_or(gcm::DEFAULT_LEARNT_INTERVAL))
		};
		Ok(Self {
			full_log: rec.get_bool_opt(gcm::FULL_LOG)?.unwrap_or(true),
			last_persistent_id: rec.get_string_opt(gcm::LAST_PERSISTENT_ID)?,
			enabled: rec.get_bool(gcm::ENABLE_SERVICE)?,
			network_mobile: rec.get_int_opt(gcm::NETWORK_MOBILE)?.unwrap_or(0),
			network_wifi: rec.get_int_opt(gcm::NETWORK_WIFI)?.unwrap_or(0),
			network_roaming: rec.get_int_opt(gcm::NETWORK_ROAMING)?.unwrap_or(0),
			network_other: rec.get_int_opt(gcm::NETWORK_OTHER)?.unwrap_or(0),
			learnt_mobile: learnt(gcm::LEARNT_MOBILE)?,
			learnt_wifi: learnt(gcm::LEARNT_WIFI)?,
			learnt_other: learnt(gcm::LEARNT_OTHER)?,
		})
	}

	pub fn load(contract: &SettingsContract) -> PsResult<Self> {
		contract.read_domain(&gcm::DOMAIN, Self::from_record)?
	}

	pub async fn fetch(contract: &SettingsContract) -> PsResult<Self> {
		contract.read(&gcm::DOMAIN, Self::from_record).await?
	}

	pub fn set_enabled(contract: &SettingsContract, enabled: bool) -> PsResult<()> {
		contract.write_domain(&gcm::DOMAIN, &ConfigValues::new().with(gcm::ENABLE_SERVICE, enabled))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
	pub trust_google: bool,
	pub visible: bool,
}

impl AuthSettings {
	pub fn from_record(rec: &Record) -> PsResult<Self> {
		Ok(Self {
			trust_google: rec.get_bool(auth::TRUST_GOOGLE)?,
			visible: rec.get_bool(auth::VISIBLE)?,
		})
	}

	pub fn load(contract: &SettingsContract) -> PsResult<Self> {
		contract.read_domain(&auth::DOMAIN, Self::from_record)?
	}

	pub async fn fetch(contract: &SettingsContract) -> PsResult<Self> {
		contract.read(&auth::DOMAIN, Self::from_record).await?
	}

	pub fn set_trust_google(contract: &SettingsContract, trust: bool) -> PsResult<()> {
		contract.write_domain(&auth::DOMAIN, &ConfigValues::new().with(auth::TRUST_GOOGLE, trust))
	}

	pub fn set_visible(contract: &SettingsContract, visible: bool) -> PsResult<()> {
		contract.write_domain(&auth::DOMAIN, &ConfigValues::new().with(auth::VISIBLE, visible))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSettings {
	pub profile: String,
	pub serial: Option<String>,
}

impl ProfileSettings {
	pub fn from_record(rec: &Record) -> PsResult<Self> {
		Ok(Self {
			profile: rec
				.get_string_opt(profile::PROFILE)?
				.unwrap_or_else(|| profile::PROFILE_AUTO.into()),
			serial: rec.get_string_opt(profile::SERIAL)?,
		})
	}

	pub fn load(contract: &SettingsContract) -> PsResult<Self> {
		contract.read_domain(&profile::DOMAIN, Self::from_record)?
	}

	pub async fn fetch(contract: &SettingsContract) -> PsResult<Self> {
		contract.read(&profile::DOMAIN, Self::from_record).await?
	}

	pub fn is_auto(&self) -> bool {
		self.profile == profile::PROFILE_AUTO
	}

	/// Switching profiles drops the serial bound to the previous one
	pub fn set_profile(contract: &SettingsContract, name: &str) -> PsResult<()> {
		contract.write_domain(
			&profile::DOMAIN,
			&ConfigValues::new().with(profile::PROFILE, name).with(profile::SERIAL, ConfigValue::Null),
		)
	}

	pub fn set_serial(contract: &SettingsContract, serial: Option<&str>) -> PsResult<()> {
		contract.write_domain(&profile::DOMAIN, &ConfigValues::new().with(profile::SERIAL, serial))
	}
}


// vim: ts=4
