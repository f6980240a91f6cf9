//! Store adapter keeping each settings domain in a JSON file.
//!
//! Layout: `<base_dir>/<authority>/<domain_id>.json`. A domain is served once
//! its file exists. Writes go to a temporary file that is renamed over the
//! domain file.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
	collections::BTreeMap,
	fs,
	io::{self, Write},
	path::{Path, PathBuf},
};

use prefstore_types::prelude::*;
use prefstore_types::store_adapter::StoreAdapter;

#[derive(Debug, Default, Serialize, Deserialize)]
struct DomainFile {
	columns: Vec<Box<str>>,
	rows: Vec<BTreeMap<Box<str>, ConfigValue>>,
}

impl DomainFile {
	fn check_columns<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> PsResult<()> {
		for key in keys {
			if !self.columns.iter().any(|c| c.as_ref() == key) {
				return Err(Error::UnknownAttribute(key.into()));
			}
		}
		Ok(())
	}
}

fn is_safe_segment(segment: &str) -> bool {
	!segment.is_empty()
		&& !segment.starts_with('.')
		&& segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Calculates the path of the file holding a domain
fn domain_file_path(base_dir: &Path, address: &ConfigAddress) -> PsResult<PathBuf> {
	if !is_safe_segment(address.authority()) || !is_safe_segment(address.domain_id()) {
		return Err(Error::ValidationError(format!("Address {} cannot be mapped to a file", address)));
	}
	Ok(base_dir.join(address.authority()).join(format!("{}.json", address.domain_id())))
}

#[derive(Debug)]
pub struct StoreAdapterFs {
	base_dir: Box<Path>,
	// Serializes read-modify-write cycles within the process
	write_lock: Mutex<()>,
}

impl StoreAdapterFs {
	pub fn new(base_dir: impl Into<Box<Path>>) -> PsResult<Self> {
		let base_dir = base_dir.into();
		fs::create_dir_all(&base_dir)?;
		info!("Settings store at {}", base_dir.display());
		Ok(Self { base_dir, write_lock: Mutex::new(()) })
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	fn load(&self, address: &ConfigAddress) -> PsResult<Option<DomainFile>> {
		let path = domain_file_path(&self.base_dir, address)?;
		let data = match fs::read(&path) {
			Ok(data) => data,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};
		let file = serde_json::from_slice(&data).inspect_err(|e| {
			error!("Corrupt settings file {}: {}", path.display(), e);
		})?;
		Ok(Some(file))
	}

	fn save(&self, address: &ConfigAddress, file: &DomainFile) -> PsResult<()> {
		let path = domain_file_path(&self.base_dir, address)?;
		let dir = self.base_dir.join(address.authority());
		fs::create_dir_all(&dir)?;

		let tmp_path = dir.join(format!(".{}.json.tmp", address.domain_id()));
		let res = (|| -> PsResult<()> {
			let mut tmp = fs::File::create(&tmp_path)?;
			serde_json::to_writer_pretty(&mut tmp, file)?;
			tmp.write_all(b"\n")?;
			tmp.sync_all()?;
			fs::rename(&tmp_path, &path)?;
			Ok(())
		})();
		if res.is_err() {
			warn!("Writing {} failed, removing tmpfile", path.display());
			let _ = fs::remove_file(&tmp_path);
		}
		res
	}
}

impl StoreAdapter for StoreAdapterFs {
	fn query(&self, address: &ConfigAddress, projection: &[&str]) -> PsResult<Option<Cursor>> {
		let Some(file) = self.load(address)? else {
			return Ok(None);
		};
		file.check_columns(projection.iter().copied())?;

		let rows = file
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
		let _lock = self.write_lock.lock();
		let Some(mut file) = self.load(address)? else {
			return Ok(0);
		};
		file.check_columns(values.iter().map(|(k, _)| k))?;
		if file.rows.is_empty() {
			return Ok(0);
		}

		for row in &mut file.rows {
			for (k, v) in values.iter() {
				row.insert(k.into(), v.clone());
			}
		}
		self.save(address, &file)?;
		Ok(file.rows.len())
	}

	fn provision(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<bool> {
		let _lock = self.write_lock.lock();
		if self.load(address)?.is_some_and(|f| !f.rows.is_empty()) {
			return Ok(false);
		}

		let file = DomainFile {
			columns: values.iter().map(|(k, _)| k.into()).collect(),
			rows: vec![values.iter().map(|(k, v)| (k.into(), v.clone())).collect()],
		};
		self.save(address, &file)?;
		debug!("Provisioned {}", address);
		Ok(true)
	}
}


// vim: ts=4
