//! Value, row and update types exchanged with store adapters

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::prelude::*;

/// Single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
	Null,
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	String(String),
}

impl ConfigValue {
	pub fn type_name(&self) -> &'static str {
		match self {
			ConfigValue::Null => "null",
			ConfigValue::Bool(_) => "bool",
			ConfigValue::Int(_) => "int",
			ConfigValue::String(_) => "string",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, ConfigValue::Null)
	}

	/// Parse a value typed on a command line: `true`/`false`, integers, `null`, else string
	pub fn parse_loose(s: &str) -> Self {
		match s {
			"null" => ConfigValue::Null,
			"true" => ConfigValue::Bool(true),
			"false" => ConfigValue::Bool(false),
			_ => s.parse::<i64>().map_or_else(|_| ConfigValue::String(s.into()), ConfigValue::Int),
		}
	}
}

impl From<bool> for ConfigValue {
	fn from(v: bool) -> Self {
		ConfigValue::Bool(v)
	}
}

impl From<i64> for ConfigValue {
	fn from(v: i64) -> Self {
		ConfigValue::Int(v)
	}
}

impl From<i32> for ConfigValue {
	fn from(v: i32) -> Self {
		ConfigValue::Int(i64::from(v))
	}
}

impl From<&str> for ConfigValue {
	fn from(v: &str) -> Self {
		ConfigValue::String(v.into())
	}
}

impl From<String> for ConfigValue {
	fn from(v: String) -> Self {
		ConfigValue::String(v)
	}
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
	fn from(v: Option<T>) -> Self {
		v.map_or(ConfigValue::Null, Into::into)
	}
}

/// One row read from a domain, restricted to the queried projection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
	columns: Vec<(Box<str>, ConfigValue)>,
}

impl Record {
	pub fn new(columns: Vec<(Box<str>, ConfigValue)>) -> Self {
		Self { columns }
	}

	pub fn get(&self, key: &str) -> Option<&ConfigValue> {
		self.columns.iter().find(|(k, _)| k.as_ref() == key).map(|(_, v)| v)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|(k, _)| k.as_ref())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
		self.columns.iter().map(|(k, v)| (k.as_ref(), v))
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	fn require(&self, key: &str) -> PsResult<&ConfigValue> {
		self.get(key).ok_or_else(|| {
			Error::ValidationError(format!("Column '{}' is not part of the projection", key))
		})
	}

	fn mismatch(key: &str, expected: &str, got: &ConfigValue) -> Error {
		Error::ValidationError(format!(
			"Column '{}' is not {}, got {}",
			key,
			expected,
			got.type_name()
		))
	}

	pub fn get_bool(&self, key: &str) -> PsResult<bool> {
		self.get_bool_opt(key)?.ok_or_else(|| Self::mismatch(key, "a boolean", &ConfigValue::Null))
	}

	pub fn get_int(&self, key: &str) -> PsResult<i64> {
		self.get_int_opt(key)?.ok_or_else(|| Self::mismatch(key, "an integer", &ConfigValue::Null))
	}

	pub fn get_string(&self, key: &str) -> PsResult<String> {
		self.get_string_opt(key)?.ok_or_else(|| Self::mismatch(key, "a string", &ConfigValue::Null))
	}

	/// Null maps to None, a missing column or another type is an error
	pub fn get_bool_opt(&self, key: &str) -> PsResult<Option<bool>> {
		match self.require(key)? {
			ConfigValue::Null => Ok(None),
			ConfigValue::Bool(b) => Ok(Some(*b)),
			// Stores written by older clients keep flags as 0/1
			ConfigValue::Int(i) => Ok(Some(*i != 0)),
			v => Err(Self::mismatch(key, "a boolean", v)),
		}
	}

	pub fn get_int_opt(&self, key: &str) -> PsResult<Option<i64>> {
		match self.require(key)? {
			ConfigValue::Null => Ok(None),
			ConfigValue::Int(i) => Ok(Some(*i)),
			v => Err(Self::mismatch(key, "an integer", v)),
		}
	}

	pub fn get_string_opt(&self, key: &str) -> PsResult<Option<String>> {
		match self.require(key)? {
			ConfigValue::Null => Ok(None),
			ConfigValue::String(s) => Ok(Some(s.clone())),
			v => Err(Self::mismatch(key, "a string", v)),
		}
	}
}

impl Serialize for Record {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.columns.len()))?;
		for (k, v) in &self.columns {
			map.serialize_entry(k.as_ref(), v)?;
		}
		map.end()
	}
}

/// Handle over the rows returned by a store query
#[derive(Debug, Clone, Default)]
pub struct Cursor {
	rows: Vec<Record>,
}

impl Cursor {
	pub fn new(rows: Vec<Record>) -> Self {
		Self { rows }
	}

	pub fn first(&self) -> Option<&Record> {
		self.rows.first()
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

/// Attribute values of an update, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigValues {
	values: Vec<(Box<str>, ConfigValue)>,
}

impl ConfigValues {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a value, replacing a previous value for the same key
	pub fn put(&mut self, key: &str, value: impl Into<ConfigValue>) -> &mut Self {
		let value = value.into();
		if let Some(slot) = self.values.iter_mut().find(|(k, _)| k.as_ref() == key) {
			slot.1 = value;
		} else {
			self.values.push((key.into(), value));
		}
		self
	}

	pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
		self.put(key, value);
		self
	}

	pub fn get(&self, key: &str) -> Option<&ConfigValue> {
		self.values.iter().find(|(k, _)| k.as_ref() == key).map(|(_, v)| v)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
		self.values.iter().map(|(k, v)| (k.as_ref(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}


// vim: ts=4
