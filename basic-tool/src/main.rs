use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use prefstore::AppBuilder;
use prefstore::app::DEFAULT_NAMESPACE;
use prefstore::domain;
use prefstore::prelude::*;
use prefstore_store_adapter_fs::StoreAdapterFs;

#[derive(Parser)]
#[command(name = "basic-tool")]
#[command(about = "Inspect and edit a prefstore settings store", long_about = None)]
struct Cli {
	#[arg(short, long, env = "PREFSTORE_DATA_DIR", default_value = "./data")]
	data_dir: PathBuf,

	#[arg(short, long, env = "PREFSTORE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
	namespace: String,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Create the default row of every settings domain
	Provision,
	/// Print a settings domain as JSON
	Get {
		/// Domain id or name (check-in, gcm, push-messaging, auth, profile)
		domain: String,
	},
	/// Write one attribute of a settings domain
	Set {
		domain: String,
		key: String,
		/// Parsed as true/false, integer or null, otherwise kept as string
		value: String,
	},
	/// Build and refresh the settings screen, then print it
	Screen,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> PsResult<()> {
	let cli = Cli::parse();

	let store = StoreAdapterFs::new(cli.data_dir.join("settings"))?;
	let mut builder = AppBuilder::new();
	builder
		.namespace(cli.namespace.as_str())
		.data_dir(cli.data_dir.as_path())
		.provision(false)
		.store_adapter(Arc::new(store));
	let app = builder.build().await?;

	match cli.command {
		Commands::Provision => {
			let contract = app.contract.clone();
			let created = app.worker.try_run(move || contract.provision_all()).await?;
			println!("Provisioned {} of {} domains", created, domain::ALL.len());
		}
		Commands::Get { domain: name } => {
			let domain = domain::find(&name)?;
			let json = app
				.contract
				.read(domain, |rec| serde_json::to_string_pretty(rec))
				.await??;
			println!("{}", json);
		}
		Commands::Set { domain: name, key, value } => {
			let domain = domain::find(&name)?;
			if !domain.has_key(&key) {
				return Err(Error::UnknownAttribute(key));
			}
			let value = ConfigValue::parse_loose(&value);
			app.contract.write(domain, ConfigValues::new().with(&key, value)).await?;
			info!("Updated {} {}", app.contract.address(domain), key);
		}
		Commands::Screen => {
			let scope = app.screen()?;
			match scope.on_resume().await {
				Ok(Some(report)) => debug!("Screen refreshed: {:?}", report),
				Ok(None) => {}
				Err(e) => warn!("Screen refresh did not complete: {}", e),
			}
			scope.with_screen(|screen| print!("{}", screen));
		}
	}

	Ok(())
}

// vim: ts=4
