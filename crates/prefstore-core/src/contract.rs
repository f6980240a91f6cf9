//! Read/write access to configuration domains
//!
//! Every domain holds exactly one row, provisioned at install time. A query
//! without a handle, a handle without rows, or an update that does not touch
//! exactly one row are invariant violations and surface as hard errors.

use std::sync::Arc;

use prefstore_types::store_adapter::StoreAdapter;
use prefstore_types::worker::WorkerPool;

use crate::domain::{self, resolve_address};
use crate::identity::{without_calling_identity, CallingIdentity, NoIdentity};
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct SettingsContract {
	authority: Authority,
	store: Arc<dyn StoreAdapter>,
	identity: Arc<dyn CallingIdentity>,
	worker: Arc<WorkerPool>,
}

impl SettingsContract {
	pub fn new(authority: Authority, store: Arc<dyn StoreAdapter>, worker: Arc<WorkerPool>) -> Self {
		Self { authority, store, identity: Arc::new(NoIdentity), worker }
	}

	pub fn with_identity(mut self, identity: Arc<dyn CallingIdentity>) -> Self {
		self.identity = identity;
		self
	}

	pub fn authority(&self) -> &Authority {
		&self.authority
	}

	pub fn worker(&self) -> &Arc<WorkerPool> {
		&self.worker
	}

	pub fn address(&self, domain: &ConfigDomain) -> ConfigAddress {
		resolve_address(&self.authority, domain)
	}

	/// Query `address` restricted to `projection` and hand the first row to `f`.
	///
	/// Blocking. Do not call from an async executor thread, use [`Self::read`].
	pub fn get_settings<T>(
		&self,
		address: &ConfigAddress,
		projection: &[&str],
		f: impl FnOnce(&Record) -> T,
	) -> PsResult<T> {
		without_calling_identity(self.identity.as_ref(), || {
			let Some(cursor) = self.store.query(address, projection)? else {
				error!("Cursor for query {} {:?} was null", address, projection);
				return Err(Error::NotFound(format!(
					"Cursor for query {} {:?} was null",
					address, projection
				)));
			};
			let Some(row) = cursor.first() else {
				error!("Cursor for query {} {:?} was empty", address, projection);
				return Err(Error::EmptyResult(format!(
					"Cursor for query {} {:?} was empty",
					address, projection
				)));
			};
			if cursor.len() > 1 {
				warn!("Query {} returned {} rows, using the first", address, cursor.len());
			}
			Ok(f(row))
		})
	}

	/// Update the single row of `address`. Blocking.
	pub fn set_settings(&self, address: &ConfigAddress, values: &ConfigValues) -> PsResult<()> {
		without_calling_identity(self.identity.as_ref(), || {
			let affected = self.store.update(address, values)?;
			if affected != 1 {
				error!("Update for {} with {:?} affected {} rows", address, values, affected);
				return Err(Error::AffectedRows {
					address: address.to_string(),
					expected: 1,
					actual: affected,
				});
			}
			debug!("Updated {} ({} values)", address, values.len());
			Ok(())
		})
	}

	/// Blocking read of a whole domain
	pub fn read_domain<T>(&self, domain: &ConfigDomain, f: impl FnOnce(&Record) -> T) -> PsResult<T> {
		self.get_settings(&self.address(domain), domain.projection, f)
	}

	/// Blocking write to a domain
	pub fn write_domain(&self, domain: &ConfigDomain, values: &ConfigValues) -> PsResult<()> {
		self.set_settings(&self.address(domain), values)
	}

	/// Read a domain on the worker pool
	pub async fn read<T, F>(&self, domain: &ConfigDomain, f: F) -> PsResult<T>
	where
		F: FnOnce(&Record) -> T + Send + 'static,
		T: Send + 'static,
	{
		let contract = self.clone();
		let address = self.address(domain);
		let projection = domain.projection;
		self.worker.try_run(move || contract.get_settings(&address, projection, f)).await
	}

	/// Write a domain on the worker pool
	pub async fn write(&self, domain: &ConfigDomain, values: ConfigValues) -> PsResult<()> {
		let contract = self.clone();
		let address = self.address(domain);
		self.worker.try_run(move || contract.set_settings(&address, &values)).await
	}

	/// Create the default row of every known domain that has none yet.
	///
	/// Returns the number of domains provisioned by this call. Blocking.
	pub fn provision_all(&self) -> PsResult<usize> {
		let mut created = 0;
		for domain in &domain::ALL {
			let address = self.address(domain);
			let fresh = without_calling_identity(self.identity.as_ref(), || {
				self.store.provision(&address, &domain.defaults())
			})?;
			if fresh {
				info!("Provisioned settings domain {} at {}", domain.name, address);
				created += 1;
			}
		}
		Ok(created)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::{auth, check_in, gcm};
	use crate::identity::ThreadIdentity;
	use prefstore_types::store_adapter::InMemoryStore;

	fn setup() -> (SettingsContract, Arc<InMemoryStore>) {
		let _ = tracing_subscriber::fmt().try_init();
		let store = Arc::new(InMemoryStore::new());
		let authority = Authority::from_namespace("com.google.android.gms").unwrap();
		let contract =
			SettingsContract::new(authority, store.clone(), Arc::new(WorkerPool::new(1, 1, 1)));
		(contract, store)
	}

	#[test]
	fn test_read_auth_domain() {
		let (contract, _store) = setup();
		contract.provision_all().unwrap();
		contract
			.write_domain(
				&auth::DOMAIN,
				&ConfigValues::new().with(auth::TRUST_GOOGLE, true).with(auth::VISIBLE, false),
			)
			.unwrap();

		let json = contract
			.read_domain(&auth::DOMAIN, |rec| serde_json_like(rec))
			.unwrap();
		assert_eq!(
			json,
			vec![
				(auth::TRUST_GOOGLE.to_string(), ConfigValue::Bool(true)),
				(auth::VISIBLE.to_string(), ConfigValue::Bool(false)),
			]
		);
	}

	fn serde_json_like(rec: &Record) -> Vec<(String, ConfigValue)> {
		rec.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
	}

	#[test]
	fn test_read_subset_projection() {
		let (contract, _store) = setup();
		contract.provision_all().unwrap();

		let address = contract.address(&check_in::DOMAIN);
		let keys = contract
			.get_settings(&address, &[check_in::DIGEST, check_in::ENABLED], |rec| {
				rec.keys().map(String::from).collect::<Vec<_>>()
			})
			.unwrap();
		assert_eq!(keys, [check_in::DIGEST, check_in::ENABLED]);
	}

	#[test]
	fn test_unknown_key_rejected_by_store() {
		let (contract, _store) = setup();
		contract.provision_all().unwrap();

		let address = contract.address(&auth::DOMAIN);
		let res = contract.get_settings(&address, &[auth::TRUST_GOOGLE, "bogus"], |_| ());
		assert!(matches!(res, Err(Error::UnknownAttribute(k)) if k == "bogus"));
	}

	#[test]
	fn test_missing_domain_is_not_found() {
		let (contract, _store) = setup();
		let res = contract.read_domain(&gcm::DOMAIN, |_| ());
		assert!(matches!(res, Err(Error::NotFound(_))));
	}

	#[test]
	fn test_empty_domain_is_empty_result() {
		let (contract, store) = setup();
		store.declare(&contract.address(&gcm::DOMAIN), gcm::PROJECTION);
		let res = contract.read_domain(&gcm::DOMAIN, |_| ());
		assert!(matches!(res, Err(Error::EmptyResult(_))));
	}

	#[test]
	fn test_write_then_read() {
		let (contract, _store) = setup();
		contract.provision_all().unwrap();

		contract
			.write_domain(&check_in::DOMAIN, &ConfigValues::new().with(check_in::BRAND_SPOOF, true))
			.unwrap();
		let spoof = contract
			.read_domain(&check_in::DOMAIN, |rec| rec.get_bool(check_in::BRAND_SPOOF))
			.unwrap()
			.unwrap();
		assert!(spoof);
	}

	#[test]
	fn test_write_zero_rows_fails() {
		let (contract, store) = setup();
		store.declare(&contract.address(&auth::DOMAIN), auth::PROJECTION);
		let res = contract.write_domain(&auth::DOMAIN, &ConfigValues::new().with(auth::VISIBLE, true));
		assert!(matches!(res, Err(Error::AffectedRows { expected: 1, actual: 0, .. })));
	}

	#[test]
	fn test_write_many_rows_fails() {
		let (contract, store) = setup();
		let address = contract.address(&auth::DOMAIN);
		store.declare(&address, auth::PROJECTION);
		store.push_row(&address, &ConfigValues::new()).unwrap();
		store.push_row(&address, &ConfigValues::new()).unwrap();
		let res = contract.write_domain(&auth::DOMAIN, &ConfigValues::new().with(auth::VISIBLE, true));
		assert!(matches!(res, Err(Error::AffectedRows { actual: 2, .. })));
	}

	#[test]
	fn test_multiple_rows_uses_first() {
		let (contract, store) = setup();
		let address = contract.address(&auth::DOMAIN);
		store.declare(&address, auth::PROJECTION);
		store.push_row(&address, &ConfigValues::new().with(auth::VISIBLE, true)).unwrap();
		store.push_row(&address, &ConfigValues::new().with(auth::VISIBLE, false)).unwrap();
		let visible =
			contract.read_domain(&auth::DOMAIN, |rec| rec.get_bool(auth::VISIBLE)).unwrap().unwrap();
		assert!(visible);
	}

	#[test]
	fn test_provision_is_idempotent() {
		let (contract, _store) = setup();
		assert_eq!(contract.provision_all().unwrap(), 4);
		contract
			.write_domain(&auth::DOMAIN, &ConfigValues::new().with(auth::VISIBLE, true))
			.unwrap();
		assert_eq!(contract.provision_all().unwrap(), 0);
		let visible =
			contract.read_domain(&auth::DOMAIN, |rec| rec.get_bool(auth::VISIBLE)).unwrap().unwrap();
		assert!(visible);
	}

	#[test]
	fn test_identity_restored_after_failed_read() {
		let (contract, _store) = setup();
		let identity = ThreadIdentity::new(1000);
		identity.set_caller(10_050);
		let contract = contract.with_identity(Arc::new(identity));

		assert!(contract.read_domain(&auth::DOMAIN, |_| ()).is_err());
		assert_eq!(identity.current(), 10_050);
	}

	#[tokio::test]
	async fn test_async_read_write() {
		let (contract, _store) = setup();
		contract.provision_all().unwrap();

		contract
			.write(&gcm::DOMAIN, ConfigValues::new().with(gcm::ENABLE_SERVICE, true))
			.await
			.unwrap();
		let enabled = contract
			.read(&gcm::DOMAIN, |rec| rec.get_bool(gcm::ENABLE_SERVICE))
			.await
			.unwrap()
			.unwrap();
		assert!(enabled);
	}
}

// vim: ts=4
