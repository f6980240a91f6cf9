//! Settings providers and their registry

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::prelude::*;

/// What providers get to look at while enumerating
#[derive(Debug, Clone)]
pub struct ProviderContext {
	pub contract: SettingsContract,
}

impl ProviderContext {
	pub fn new(contract: SettingsContract) -> Self {
		Self { contract }
	}
}

/// Pluggable source of settings entries
#[async_trait]
pub trait SettingsProvider: Debug + Send + Sync {
	/// Unique name, used for registration and logs
	fn name(&self) -> &str;

	/// Entries known when the screen is built
	fn entries_static(&self, ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>>;

	/// Entries for a refresh. May perform I/O, including store reads.
	async fn entries_dynamic(&self, ctx: &ProviderContext) -> PsResult<Vec<SettingsEntry>> {
		self.entries_static(ctx)
	}
}

/// Mutable registry used during app initialization
#[derive(Default)]
pub struct ProviderRegistry {
	providers: Vec<Arc<dyn SettingsProvider>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, provider: Arc<dyn SettingsProvider>) -> PsResult<()> {
		if self.providers.iter().any(|p| p.name() == provider.name()) {
			return Err(Error::ConfigError(format!(
				"Settings provider '{}' is already registered",
				provider.name()
			)));
		}

		debug!("Registering settings provider: {}", provider.name());
		self.providers.push(provider);
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenProviderRegistry {
		info!("Freezing provider registry with {} providers", self.providers.len());
		FrozenProviderRegistry { providers: self.providers.into() }
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}

/// Immutable registry, iterated in registration order
#[derive(Debug, Clone)]
pub struct FrozenProviderRegistry {
	providers: Arc<[Arc<dyn SettingsProvider>]>,
}

impl FrozenProviderRegistry {
	pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn SettingsProvider>> {
		self.providers.iter()
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}


// vim: ts=4
