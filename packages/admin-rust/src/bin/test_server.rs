//! `roster-test-server`: serves the roster API from memory for local
//! development against `comlab-admin`.

use std::sync::Arc;

use clap::Parser;
use comlab_admin::logging::init_tracing;
use comlab_admin::server::{demo_roster, RosterStore, TestServerConfig, TestServerModule};
use comlab_admin::LogFormat;
use tracing::info;

#[derive(Parser)]
#[command(name = "roster-test-server", about = "In-memory roster API server", version)]
struct Args {
    /// Bind address.
    #[arg(long, default_value = "127.0.0.1", env = "COMLAB_TEST_SERVER_HOST")]
    host: String,

    /// Port to listen on. 0 picks a free port.
    #[arg(long, default_value_t = 3000, env = "COMLAB_TEST_SERVER_PORT")]
    port: u16,

    /// Allowed CORS origins, comma-separated. `*` allows any origin.
    #[arg(long, default_value = "*", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Start with a demo roster instead of an empty one.
    #[arg(long)]
    seed: bool,

    #[arg(long, env = "COMLAB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format, "info,tower_http=debug")?;

    let config = TestServerConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
    };
    let store = if args.seed {
        RosterStore::with_teachers(demo_roster())
    } else {
        RosterStore::new()
    };
    info!(teachers = store.len(), "roster store ready");

    let mut module = TestServerModule::new(config, Arc::new(store));
    let addr = module.start().await?;
    info!("roster API available at http://{addr}");

    module
        .serve(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {err}");
            }
            info!("shutdown requested");
        })
        .await
}
