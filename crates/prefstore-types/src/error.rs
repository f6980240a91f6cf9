//! Error type shared by every prefstore crate

use std::fmt;

pub type PsResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementFailure {
	/// The screen has no section with the requested key
	MissingSection,
	/// An item with the same key is already on the screen
	DuplicateKey,
}

/// A settings entry that could not be placed on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementError {
	pub key: Box<str>,
	pub section: Box<str>,
	pub reason: PlacementFailure,
}

impl PlacementError {
	pub fn missing_section(key: impl Into<Box<str>>, section: impl Into<Box<str>>) -> Self {
		Self { key: key.into(), section: section.into(), reason: PlacementFailure::MissingSection }
	}

	pub fn duplicate_key(key: impl Into<Box<str>>, section: impl Into<Box<str>>) -> Self {
		Self { key: key.into(), section: section.into(), reason: PlacementFailure::DuplicateKey }
	}
}

impl fmt::Display for PlacementError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.reason {
			PlacementFailure::MissingSection => {
				write!(f, "entry '{}' not placed: section '{}' missing", self.key, self.section)
			}
			PlacementFailure::DuplicateKey => write!(
				f,
				"entry '{}' not placed in section '{}': key already on screen",
				self.key, self.section
			),
		}
	}
}

#[derive(Debug)]
pub enum Error {
	/// The store returned no handle for the query (address unreachable)
	NotFound(String),
	/// The store handle had zero rows (domain not provisioned)
	EmptyResult(String),
	/// An update did not touch exactly the expected number of rows
	AffectedRows { address: String, expected: usize, actual: usize },
	Placement(PlacementError),
	/// Attribute key not known by the store for this address
	UnknownAttribute(String),
	ValidationError(String),
	ConfigError(String),
	Json(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound(msg) => write!(f, "not found: {}", msg),
			Error::EmptyResult(msg) => write!(f, "empty result: {}", msg),
			Error::AffectedRows { address, expected, actual } => write!(
				f,
				"update for {} affected {} rows (expected {})",
				address, actual, expected
			),
			Error::Placement(err) => write!(f, "placement error: {}", err),
			Error::UnknownAttribute(key) => write!(f, "unknown attribute: {}", key),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "config error: {}", msg),
			Error::Json(msg) => write!(f, "json error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err.to_string())
	}
}

impl From<PlacementError> for Error {
	fn from(err: PlacementError) -> Self {
		Self::Placement(err)
	}
}

// vim: ts=4
