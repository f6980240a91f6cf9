//! Declarative settings entries produced by providers

use std::fmt;

pub const SECTION_HEADER: &str = "prefcat_header";
pub const SECTION_GOOGLE: &str = "prefcat_google_services";
pub const SECTION_OTHER: &str = "prefcat_other_services";
pub const SECTION_FOOTER: &str = "prefcat_footer";

/// Placement hint of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
	Header,
	Google,
	Other,
	Footer,
}

impl Group {
	/// Key of the screen section this group is placed into
	pub fn section_key(&self) -> &'static str {
		match self {
			Group::Header => SECTION_HEADER,
			Group::Google => SECTION_GOOGLE,
			Group::Other => SECTION_OTHER,
			Group::Footer => SECTION_FOOTER,
		}
	}
}

/// Opaque reference to a display resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef(pub Box<str>);

/// Opaque reference to a screen destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationTarget(pub Box<str>);

impl fmt::Display for NavigationTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsEntry {
	pub key: Box<str>,
	pub title: Box<str>,
	pub summary: Option<Box<str>>,
	pub icon: Option<IconRef>,
	pub group: Group,
	pub navigation: NavigationTarget,
}

impl SettingsEntry {
	pub fn new(
		key: impl Into<Box<str>>,
		title: impl Into<Box<str>>,
		group: Group,
		navigation: impl Into<Box<str>>,
	) -> Self {
		Self {
			key: key.into(),
			title: title.into(),
			summary: None,
			icon: None,
			group,
			navigation: NavigationTarget(navigation.into()),
		}
	}

	pub fn summary(mut self, summary: impl Into<Box<str>>) -> Self {
		self.summary = Some(summary.into());
		self
	}

	pub fn icon(mut self, icon: impl Into<Box<str>>) -> Self {
		self.icon = Some(IconRef(icon.into()));
		self
	}
}

// vim: ts=4
