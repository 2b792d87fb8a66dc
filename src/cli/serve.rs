use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{SqliteStore, TaskStore};
use crate::http;
use crate::reconcile::{Reconciler, Scheduler};
use crate::service::TaskService;

pub fn run(config: &Config) -> i32 {
    match run_inner(config) {
        Ok(()) => 0,
        Err(e) => {
            error!("server stopped: {e:#}");
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn run_inner(config: &Config) -> anyhow::Result<()> {
    let store: Arc<dyn TaskStore> = Arc::new(SqliteStore::open(&config.database)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(serve(config, store))
}

async fn serve(config: &Config, store: Arc<dyn TaskStore>) -> anyhow::Result<()> {
    let scheduler = Arc::new(Scheduler::new(Arc::new(Reconciler::new(Arc::clone(&store)))));
    let triggers = scheduler.spawn(&config.scheduler);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, version = crate::VERSION, "serving todo-matrix API");

    let served = axum::serve(listener, http::router(TaskService::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    for handle in triggers {
        handle.abort();
    }
    served.context("HTTP server failed")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
