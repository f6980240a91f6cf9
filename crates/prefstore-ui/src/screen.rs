//! Settings screen model: sections holding keyed items

use std::fmt;

use crate::entry::{
	IconRef, NavigationTarget, SECTION_FOOTER, SECTION_GOOGLE, SECTION_HEADER, SECTION_OTHER,
};
use crate::prelude::*;

/// Receives navigation requests from item clicks
pub trait Navigator {
	fn navigate(&self, target: &NavigationTarget);
}

/// Item as currently shown on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedItem {
	pub key: Box<str>,
	pub title: Box<str>,
	pub summary: Option<Box<str>>,
	pub icon: Option<IconRef>,
	pub group: Group,
	pub navigation: NavigationTarget,
	pub visible: bool,
}

impl DisplayedItem {
	pub fn from_entry(entry: &SettingsEntry) -> Self {
		Self {
			key: entry.key.clone(),
			title: entry.title.clone(),
			summary: entry.summary.clone(),
			icon: entry.icon.clone(),
			group: entry.group,
			navigation: entry.navigation.clone(),
			visible: true,
		}
	}

	/// Overwrite the displayed attributes and show the item.
	///
	/// Returns whether anything changed.
	pub fn fill_from_entry(&mut self, entry: &SettingsEntry) -> bool {
		let changed = self.title != entry.title
			|| self.summary != entry.summary
			|| self.icon != entry.icon
			|| self.group != entry.group
			|| self.navigation != entry.navigation
			|| !self.visible;

		self.title = entry.title.clone();
		self.summary = entry.summary.clone();
		self.icon = entry.icon.clone();
		self.group = entry.group;
		self.navigation = entry.navigation.clone();
		self.visible = true;
		changed
	}
}

/// Where an item sits on a screen. Items are never removed, so a slot stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
	pub section: usize,
	pub position: usize,
}

#[derive(Debug, Clone)]
pub struct Section {
	pub key: Box<str>,
	pub title: Box<str>,
	pub items: Vec<DisplayedItem>,
}

impl Section {
	pub fn new(key: impl Into<Box<str>>, title: impl Into<Box<str>>) -> Self {
		Self { key: key.into(), title: title.into(), items: Vec::new() }
	}
}

#[derive(Debug, Clone, Default)]
pub struct SettingsScreen {
	sections: Vec<Section>,
}

impl SettingsScreen {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_section(mut self, section: Section) -> Self {
		self.sections.push(section);
		self
	}

	/// The main settings layout with its four sections
	pub fn default_layout() -> Self {
		Self::new()
			.with_section(Section::new(SECTION_HEADER, ""))
			.with_section(Section::new(SECTION_GOOGLE, "Google services"))
			.with_section(Section::new(SECTION_OTHER, "Other services"))
			.with_section(Section::new(SECTION_FOOTER, ""))
	}

	/// Add an item declared by the layout itself
	pub fn with_fixed_item(mut self, section: &str, item: DisplayedItem) -> PsResult<Self> {
		self.add_item(section, item)?;
		Ok(self)
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	pub fn section(&self, key: &str) -> Option<&Section> {
		self.sections.iter().find(|s| s.key.as_ref() == key)
	}

	pub fn find_item(&self, key: &str) -> Option<&DisplayedItem> {
		self.sections.iter().flat_map(|s| s.items.iter()).find(|i| i.key.as_ref() == key)
	}

	pub fn find_item_mut(&mut self, key: &str) -> Option<&mut DisplayedItem> {
		self.sections
			.iter_mut()
			.flat_map(|s| s.items.iter_mut())
			.find(|i| i.key.as_ref() == key)
	}

	/// Append `item` to the section named `section`.
	///
	/// Keys are unique across the whole screen.
	pub fn add_item(
		&mut self,
		section: &str,
		item: DisplayedItem,
	) -> Result<ItemSlot, PlacementError> {
		if self.find_item(&item.key).is_some() {
			return Err(PlacementError::duplicate_key(item.key, section));
		}
		let Some(idx) = self.sections.iter().position(|s| s.key.as_ref() == section) else {
			return Err(PlacementError::missing_section(item.key, section));
		};
		let items = &mut self.sections[idx].items;
		items.push(item);
		Ok(ItemSlot { section: idx, position: items.len() - 1 })
	}

	pub fn item_at(&self, slot: ItemSlot) -> Option<&DisplayedItem> {
		self.sections.get(slot.section)?.items.get(slot.position)
	}

	pub fn item_at_mut(&mut self, slot: ItemSlot) -> Option<&mut DisplayedItem> {
		self.sections.get_mut(slot.section)?.items.get_mut(slot.position)
	}

	/// Visible items in display order
	pub fn visible_items(&self) -> impl Iterator<Item = &DisplayedItem> {
		self.sections.iter().flat_map(|s| s.items.iter()).filter(|i| i.visible)
	}

	/// Dispatch the navigation target of a visible item
	pub fn click(&self, key: &str, navigator: &dyn Navigator) -> PsResult<()> {
		match self.find_item(key) {
			Some(item) if item.visible => {
				debug!("Navigating to {} from {}", item.navigation, item.key);
				navigator.navigate(&item.navigation);
				Ok(())
			}
			_ => Err(Error::NotFound(format!("No visible item '{}'", key))),
		}
	}
}

impl fmt::Display for SettingsScreen {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for section in &self.sections {
			if section.items.iter().all(|i| !i.visible) {
				continue;
			}
			if section.title.is_empty() {
				writeln!(f, "[{}]", section.key)?;
			} else {
				writeln!(f, "[{}]", section.title)?;
			}
			for item in section.items.iter().filter(|i| i.visible) {
				write!(f, "  {}", item.title)?;
				if let Some(summary) = &item.summary {
					write!(f, " ({})", summary)?;
				}
				writeln!(f, " -> {}", item.navigation)?;
			}
		}
		Ok(())
	}
}


// vim: ts=4
