//! App builder - wires the store, the settings contract and the screen providers

use std::{path::PathBuf, sync::Arc};

use prefstore_core::identity::CallingIdentity;
use prefstore_types::store_adapter::StoreAdapter;
use prefstore_types::worker::WorkerPool;
use prefstore_ui::{
	FrozenProviderRegistry, ProviderContext, ProviderRegistry, ScreenScope, SettingsProvider,
	SettingsScreen,
};

use crate::prelude::*;
use crate::status::ServiceStatusProvider;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Namespace of the installation whose settings are served
pub const DEFAULT_NAMESPACE: &str = "com.google.android.gms";

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub namespace: Box<str>,
	pub data_dir: Box<std::path::Path>,
	/// Worker threads per priority (high, medium, low)
	pub workers: (usize, usize, usize),
	/// Provision missing domains while building
	pub provision: bool,
	/// Register [`ServiceStatusProvider`] ahead of custom providers
	pub builtin_providers: bool,
}

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub worker: Arc<WorkerPool>,
	pub contract: SettingsContract,
	pub providers: FrozenProviderRegistry,
}

impl AppState {
	pub fn provider_context(&self) -> ProviderContext {
		ProviderContext::new(self.contract.clone())
	}

	/// Open the main settings screen
	pub fn screen(&self) -> PsResult<ScreenScope> {
		self.screen_with_layout(SettingsScreen::default_layout())
	}

	pub fn screen_with_layout(&self, layout: SettingsScreen) -> PsResult<ScreenScope> {
		ScreenScope::create(self.providers.clone(), layout, self.provider_context())
	}
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	worker: Option<Arc<WorkerPool>>,
	store: Option<Arc<dyn StoreAdapter>>,
	identity: Option<Arc<dyn CallingIdentity>>,
	providers: Vec<Arc<dyn SettingsProvider>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// Embedders and tests may have installed a subscriber already
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts {
				namespace: DEFAULT_NAMESPACE.into(),
				data_dir: PathBuf::from("./data").into(),
				workers: (1, 1, 1),
				provision: true,
				builtin_providers: true,
			},
			worker: None,
			store: None,
			identity: None,
			providers: Vec::new(),
		}
	}

	// Opts
	pub fn namespace(&mut self, namespace: impl Into<Box<str>>) -> &mut Self {
		self.opts.namespace = namespace.into();
		self
	}
	pub fn data_dir(&mut self, data_dir: impl Into<Box<std::path::Path>>) -> &mut Self {
		self.opts.data_dir = data_dir.into();
		self
	}
	pub fn workers(&mut self, high: usize, medium: usize, low: usize) -> &mut Self {
		self.opts.workers = (high, medium, low);
		self
	}
	pub fn provision(&mut self, provision: bool) -> &mut Self {
		self.opts.provision = provision;
		self
	}
	pub fn builtin_providers(&mut self, enable: bool) -> &mut Self {
		self.opts.builtin_providers = enable;
		self
	}
	pub fn worker(&mut self, worker: Arc<WorkerPool>) -> &mut Self {
		self.worker = Some(worker);
		self
	}

	pub fn opts(&self) -> &AppBuilderOpts {
		&self.opts
	}

	// Adapters
	pub fn store_adapter(&mut self, store: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store = Some(store);
		self
	}
	pub fn identity(&mut self, identity: Arc<dyn CallingIdentity>) -> &mut Self {
		self.identity = Some(identity);
		self
	}

	// Providers, shown in the order they are added
	pub fn provider(&mut self, provider: Arc<dyn SettingsProvider>) -> &mut Self {
		self.providers.push(provider);
		self
	}

	pub async fn build(self) -> PsResult<App> {
		info!("prefstore V{}", VERSION);

		let authority = Authority::from_namespace(&self.opts.namespace).inspect_err(|e| {
			error!("FATAL: Invalid namespace {:?}: {}", self.opts.namespace, e);
		})?;
		let Some(store) = self.store else {
			error!("FATAL: No store adapter configured");
			return Err(Error::ConfigError("No store adapter configured".to_string()));
		};

		tokio::fs::create_dir_all(&self.opts.data_dir).await.map_err(|e| {
			error!("FATAL: Cannot create data dir: {}", e);
			Error::Internal(format!("Cannot create data dir: {}", e))
		})?;

		let worker = match self.worker {
			Some(worker) => worker,
			None => {
				let (high, medium, low) = self.opts.workers;
				Arc::new(WorkerPool::new(high, medium, low))
			}
		};

		let mut contract = SettingsContract::new(authority, store, worker.clone());
		if let Some(identity) = self.identity {
			contract = contract.with_identity(identity);
		}

		// Register providers
		let mut registry = ProviderRegistry::new();
		if self.opts.builtin_providers {
			registry.register(Arc::new(ServiceStatusProvider))?;
		}
		for provider in self.providers {
			registry.register(provider)?;
		}
		let providers = registry.freeze();

		if self.opts.provision {
			let provisioner = contract.clone();
			let created = worker.try_run(move || provisioner.provision_all()).await?;
			info!("Provisioned {} settings domains under {}", created, contract.authority().uri());
		}

		Ok(Arc::new(AppState { opts: self.opts, worker, contract, providers }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::status::{PREF_ABOUT, PREF_CHECKIN, PREF_GCM};
	use async_trait::async_trait;
	use prefstore_core::domain::auth;
	use prefstore_core::prefs::{AuthSettings, GcmSettings};
	use prefstore_types::store_adapter::InMemoryStore;

	#[derive(Debug)]
	struct Extra;

	#[async_trait]
	impl SettingsProvider for Extra {
		fn name(&self) -> &str {
			"extra"
		}

		fn entries_static(&self, _ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
			Ok(vec![SettingsEntry::new("pref_extra", "Extra", Group::Other, "openExtra")])
		}
	}

	#[derive(Debug)]
	struct Broken;

	#[async_trait]
	impl SettingsProvider for Broken {
		fn name(&self) -> &str {
			"broken"
		}

		fn entries_static(&self, _ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
			Err(Error::Internal("misconfigured".into()))
		}
	}

	fn builder(dir: &tempfile::TempDir) -> AppBuilder {
		let mut builder = AppBuilder::new();
		builder.data_dir(dir.path().join("data")).store_adapter(Arc::new(InMemoryStore::new()));
		builder
	}

	fn summary(scope: &ScreenScope, key: &str) -> Option<String> {
		scope.with_screen(|s| s.find_item(key).and_then(|i| i.summary.as_deref()).map(String::from))
	}

	#[tokio::test]
	async fn test_build_without_store_fails() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = AppBuilder::new();
		builder.data_dir(dir.path());
		assert!(matches!(builder.build().await, Err(Error::ConfigError(_))));
	}

	#[tokio::test]
	async fn test_build_rejects_bad_namespace() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = builder(&dir);
		builder.namespace("not a namespace");
		assert!(builder.build().await.is_err());
	}

	#[tokio::test]
	async fn test_build_provisions_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let app = builder(&dir).build().await.unwrap();

		assert!(dir.path().join("data").is_dir());
		assert_eq!(app.contract.authority().as_str(), "com.google.android.gms.microg.settings");
		let settings = AuthSettings::fetch(&app.contract).await.unwrap();
		assert_eq!(settings, AuthSettings { trust_google: true, visible: false });
		assert_eq!(
			app.contract
				.read_domain(&auth::DOMAIN, |rec| rec.len())
				.unwrap(),
			auth::PROJECTION.len()
		);
	}

	#[tokio::test]
	async fn test_without_provisioning_reads_fail() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = builder(&dir);
		builder.provision(false);
		let app = builder.build().await.unwrap();
		assert!(AuthSettings::fetch(&app.contract).await.is_err());
	}

	#[tokio::test]
	async fn test_duplicate_provider_fails() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = builder(&dir);
		builder.provider(Arc::new(Extra)).provider(Arc::new(Extra));
		assert!(matches!(builder.build().await, Err(Error::ConfigError(_))));
	}

	#[tokio::test]
	async fn test_screen_shows_service_status() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = builder(&dir);
		builder.provider(Arc::new(Extra));
		let app = builder.build().await.unwrap();

		let scope = app.screen().unwrap();
		assert_eq!(scope.build_report().added, 4);
		assert!(scope.with_screen(|s| s.find_item("pref_extra").is_some()));
		assert_eq!(summary(&scope, PREF_GCM), None);

		scope.on_resume().await.unwrap().unwrap();
		assert_eq!(summary(&scope, PREF_CHECKIN).as_deref(), Some("Enabled"));
		assert_eq!(summary(&scope, PREF_GCM).as_deref(), Some("Disabled"));
		assert_eq!(summary(&scope, PREF_ABOUT), Some(format!("Version {}", VERSION)));

		GcmSettings::set_enabled(&app.contract, true).unwrap();
		let report = scope.on_resume().await.unwrap().unwrap();
		assert_eq!(report.updated, 1);
		assert_eq!(summary(&scope, PREF_GCM).as_deref(), Some("Enabled"));
	}

	#[tokio::test]
	async fn test_screen_fails_on_broken_provider() {
		let dir = tempfile::tempdir().unwrap();
		let mut builder = builder(&dir);
		builder.provider(Arc::new(Broken));
		let app = builder.build().await.unwrap();

		assert!(matches!(app.screen(), Err(Error::Internal(msg)) if msg == "misconfigured"));
	}
}

// vim: ts=4
