//! Store adapter trait and an in-memory implementation.
//!
//! A store serves single-row configuration domains by address. All calls are
//! synchronous and may block; callers on an async executor dispatch them to the
//! worker pool.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::prelude::*;

pub trait StoreAdapter: Debug + Send + Sync {
	/// Query the rows of `address` restricted to `projection`, without filter or sort.
	///
	/// Returns `Ok(None)` when the store does not serve the address at all.
	/// Keys outside the domain's column set are rejected with `UnknownAttribute`.
	fn query(&self, address: &ConfigAddress, projection: &[&str]) -> PsResult<Option<Cursor>>;

	/// Update every row of `address` with `values`, returns the number of affected rows
	fn update(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<usize>;

	/// Create the domain's row with `values` unless it already has one.
	///
	/// Returns true when a row was created.
	fn provision(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<bool>;
}

#[derive(Debug, Default)]
struct Table {
	columns: Vec<Box<str>>,
	rows: Vec<HashMap<Box<str>, ConfigValue>>,
}

impl Table {
	fn check_columns<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> PsResult<()> {
		for key in keys {
			if !self.columns.iter().any(|c| c.as_ref() == key) {
				return Err(Error::UnknownAttribute(key.into()));
			}
		}
		Ok(())
	}
}

/// Store keeping every domain in memory. Used by tests and as a scratch store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
	tables: RwLock<HashMap<ConfigAddress, Table>>,
}

impl InMemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare a domain with the given columns and no rows
	pub fn declare(&self, address: &ConfigAddress, columns: &[&str]) {
		let mut tables = self.tables.write();
		tables.insert(
			address.clone(),
			Table { columns: columns.iter().map(|c| (*c).into()).collect(), rows: Vec::new() },
		);
	}

	/// Append a row to a declared domain
	pub fn push_row(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<()> {
		let mut tables = self.tables.write();
		let table = tables
			.get_mut(address)
			.ok_or_else(|| Error::NotFound(format!("Domain {} is not declared", address)))?;
		table.check_columns(values.iter().map(|(k, _)| k))?;
		let mut row: HashMap<Box<str>, ConfigValue> =
			table.columns.iter().map(|c| (c.clone(), ConfigValue::Null)).collect();
		for (k, v) in values.iter() {
			row.insert(k.into(), v.clone());
		}
		table.rows.push(row);
		Ok(())
	}

	/// Drop every row of a domain, keeping its columns
	pub fn clear_rows(&self, address: &ConfigAddress) {
		if let Some(table) = self.tables.write().get_mut(address) {
			table.rows.clear();
		}
	}
}

impl StoreAdapter for InMemoryStore {
	fn query(&self, address: &ConfigAddress, projection: &[&str]) -> PsResult<Option<Cursor>> {
		let tables = self.tables.read();
		let Some(table) = tables.get(address) else {
			return Ok(None);
		};
		table.check_columns(projection.iter().copied())?;

		let rows = table
			.rows
			.iter()
			.map(|row| {
				Record::new(
					projection
						.iter()
						.map(|key| {
							let value = row.get(*key).cloned().unwrap_or(ConfigValue::Null);
							(Box::<str>::from(*key), value)
						})
						.collect(),
				)
			})
			.collect();
		Ok(Some(Cursor::new(rows)))
	}

	fn update(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<usize> {
		let mut tables = self.tables.write();
		let Some(table) = tables.get_mut(address) else {
			return Ok(0);
		};
		table.check_columns(values.iter().map(|(k, _)| k))?;

		for row in &mut table.rows {
			for (k, v) in values.iter() {
				row.insert(k.into(), v.clone());
			}
		}
		Ok(table.rows.len())
	}

	fn provision(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<bool> {
		let mut tables = self.tables.write();
		if tables.get(address).is_some_and(|t| !t.rows.is_empty()) {
			return Ok(false);
		}

		let columns: Vec<Box<str>> = values.iter().map(|(k, _)| k.into()).collect();
		let row: HashMap<Box<str>, ConfigValue> =
			values.iter().map(|(k, v)| (k.into(), v.clone())).collect();
		tables.insert(address.clone(), Table { columns, rows: vec![row] });
		debug!("Provisioned {}", address);
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn address(domain: &str) -> ConfigAddress {
		let authority = Authority::from_namespace("org.example").unwrap();
		ConfigAddress::new(&authority, domain)
	}

	#[test]
	fn test_unknown_address_has_no_handle() {
		let store = InMemoryStore::new();
		assert!(store.query(&address("nope"), &["a"]).unwrap().is_none());
		assert_eq!(store.update(&address("nope"), &ConfigValues::new().with("a", 1)).unwrap(), 0);
	}

	#[test]
	fn test_provision_then_query_projection() {
		let store = InMemoryStore::new();
		let addr = address("auth");
		let values = ConfigValues::new().with("a", true).with("b", 7).with("c", "x");
		assert!(store.provision(&addr, &values).unwrap());
		assert!(!store.provision(&addr, &ConfigValues::new().with("a", false)).unwrap());

		let cursor = store.query(&addr, &["c", "a"]).unwrap().unwrap();
		assert_eq!(cursor.len(), 1);
		let row = cursor.first().unwrap();
		assert_eq!(row.keys().collect::<Vec<_>>(), ["c", "a"]);
		assert!(row.get_bool("a").unwrap());
	}

	#[test]
	fn test_unknown_attribute_rejected() {
		let store = InMemoryStore::new();
		let addr = address("auth");
		store.provision(&addr, &ConfigValues::new().with("a", true)).unwrap();

		assert!(matches!(store.query(&addr, &["a", "zz"]), Err(Error::UnknownAttribute(k)) if k == "zz"));
		assert!(matches!(
			store.update(&addr, &ConfigValues::new().with("zz", 1)),
			Err(Error::UnknownAttribute(_))
		));
	}

	#[test]
	fn test_update_counts_rows() {
		let store = InMemoryStore::new();
		let addr = address("multi");
		store.declare(&addr, &["a"]);
		assert_eq!(store.update(&addr, &ConfigValues::new().with("a", 1)).unwrap(), 0);

		store.push_row(&addr, &ConfigValues::new().with("a", 1)).unwrap();
		store.push_row(&addr, &ConfigValues::new()).unwrap();
		assert_eq!(store.update(&addr, &ConfigValues::new().with("a", 2)).unwrap(), 2);

		store.clear_rows(&addr);
		let cursor = store.query(&addr, &["a"]).unwrap().unwrap();
		assert!(cursor.is_empty());
	}
}

// vim: ts=4
