use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use driftscope::backend::{BackendKind, BackendRegistry, GcsClient, ObjectStores, Options};
use driftscope::cli::{Cli, Command, StateArgs};
use driftscope::output;
use driftscope::{
    Alerter, DriftscopeResourceFactory, Pipeline, RemoteRegistry, ResourceFactory,
    SchemaRepository, StateSupplier,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Remotes => {
            for remote in RemoteRegistry::builtin().supported_remotes() {
                println!("{remote}");
            }
        }
        Command::Backends => {
            for backend in BackendKind::supported_backends() {
                println!("{backend}");
            }
        }
        Command::State(args) => read_state(args).await?,
    }

    Ok(())
}

async fn read_state(args: StateArgs) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling run");
            on_interrupt.cancel();
        }
    });

    let factory: Arc<dyn ResourceFactory> = Arc::new(DriftscopeResourceFactory::new(Arc::new(
        SchemaRepository::with_builtin_metadata(),
    )));

    let stores = ObjectStores {
        gs: Some(Arc::new(GcsClient::new(args.gcs_token)?)),
        ..ObjectStores::default()
    };
    let options = Options {
        headers: args.headers.into_iter().collect(),
        tfc_token: args.tfc_token,
        tfc_endpoint: args.tfc_endpoint,
    };
    let supplier = StateSupplier::new(BackendRegistry::new(stores), options, factory.clone());

    let alerter = Alerter::new();
    let state = supplier.resources(&args.from, &alerter, &cancel).await?;
    let (_, state) = Pipeline::builtin(factory).run(Vec::new(), state)?;
    tracing::info!(count = state.len(), "declared inventory normalized");

    println!("{}", output::render_inventory(&state));
    if !alerter.is_empty() {
        eprintln!("{}", output::render_alerts(&alerter.alerts()));
    }

    Ok(())
}
