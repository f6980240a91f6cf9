//! Authority and address types for configuration domains
//!
//! An address has the form `content://<authority>/<domain-id>`. The authority is
//! derived from the installation namespace and never changes while the
//! installation exists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prelude::*;

pub const SCHEME: &str = "content";
const AUTHORITY_SUFFIX: &str = ".microg.settings";

/// Store authority of one installation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(Box<str>);

impl Authority {
	/// Derive the authority from an installation namespace (e.g. `com.google.android.gms`)
	pub fn from_namespace(namespace: &str) -> PsResult<Self> {
		validate_namespace(namespace)?;
		Ok(Self(format!("{}{}", namespace, AUTHORITY_SUFFIX).into()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// `content://<authority>`
	pub fn uri(&self) -> String {
		format!("{}://{}", SCHEME, self.0)
	}
}

impl fmt::Display for Authority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Address of a single configuration domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigAddress {
	authority: Box<str>,
	domain_id: Box<str>,
}

impl ConfigAddress {
	pub fn new(authority: &Authority, domain_id: &str) -> Self {
		Self { authority: authority.as_str().into(), domain_id: domain_id.into() }
	}

	pub fn authority(&self) -> &str {
		&self.authority
	}

	pub fn domain_id(&self) -> &str {
		&self.domain_id
	}
}

impl fmt::Display for ConfigAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}://{}/{}", SCHEME, self.authority, self.domain_id)
	}
}

/// Namespaces are dot-separated labels of alphanumerics and underscores
fn validate_namespace(namespace: &str) -> PsResult<()> {
	if namespace.is_empty() {
		return Err(Error::ConfigError("Namespace cannot be empty".into()));
	}

	for label in namespace.split('.') {
		if label.is_empty() {
			return Err(Error::ConfigError(format!(
				"Namespace '{}' has an empty label",
				namespace
			)));
		}
		if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(Error::ConfigError(format!(
				"Namespace '{}' has invalid characters (allowed: alphanumeric, underscore, dot)",
				namespace
			)));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_authority_from_namespace() {
		let authority = Authority::from_namespace("com.google.android.gms").unwrap();
		assert_eq!(authority.as_str(), "com.google.android.gms.microg.settings");
		assert_eq!(authority.uri(), "content://com.google.android.gms.microg.settings");
	}

	#[test]
	fn test_invalid_namespace() {
		assert!(Authority::from_namespace("").is_err());
		assert!(Authority::from_namespace("com..example").is_err());
		assert!(Authority::from_namespace(".com.example").is_err());
		assert!(Authority::from_namespace("com.exa mple").is_err());
		assert!(Authority::from_namespace("com/example").is_err());
	}

	#[test]
	fn test_address_display() {
		let authority = Authority::from_namespace("org.example.app").unwrap();
		let address = ConfigAddress::new(&authority, "check-in");
		assert_eq!(address.to_string(), "content://org.example.app.microg.settings/check-in");
		assert_eq!(address.domain_id(), "check-in");
		assert_eq!(address.authority(), "org.example.app.microg.settings");
	}
}

// vim: ts=4
