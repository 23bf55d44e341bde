//! Lecture notes GraphQL server entry point.
//!
//! # Responsibility
//! - Load configuration and initialize logging before anything else.
//! - Wire store, enrichment backend, service and transport explicitly.
//! - Serve until interrupted, then release the database connection.

mod config;

use config::ServerConfig;
use lecturenote_api::{build_schema, router, GRAPHQL_PATH};
use lecturenote_core::{
    init_logging, BackendEnricher, Database, DbTarget, NoteService, OpenAiBackend,
    SqliteNoteRepository,
};
use log::{error, info, warn};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("lecturenote: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("lecturenote: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let target = DbTarget::from_url(&config.database_url);
    let db = Arc::new(Database::open(target)?);

    let backend = OpenAiBackend::new(config.openai_api_key.clone(), config.openai_model.clone())
        .with_base_url(config.openai_base_url.clone());
    let enricher = BackendEnricher::new(backend, config.enrich_policy());
    let repo = SqliteNoteRepository::new(Arc::clone(&db));
    let service = NoteService::new(Arc::new(repo), Arc::new(enricher));

    let app = router(build_schema(service));
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} endpoint={} model={}",
        config.bind_addr, GRAPHQL_PATH, config.openai_model
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    db.close();
    info!("event=server_stop module=server status=ok");
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
