//! Single-backend reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ listener ──▶ recovery ─▶ access log ─▶ compression ─▶ cors ─▶ forward ──▶ Backend
//!   Client ◀───────────────────────────────────────────────────────────────── response ◀─┘
//! ```
//!
//! Startup is split in two phases: configuration is acquired synchronously
//! (it may prompt on the terminal), then the async runtime is built and
//! serves traffic until SIGINT/SIGTERM.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use passthrough_proxy::config::{
    load_or_create, ListenerConfig, ProxyConfig, ServerOptions, TimeoutConfig,
};
use passthrough_proxy::lifecycle::{shutdown_on_signal, Shutdown};
use passthrough_proxy::observability::logging;
use passthrough_proxy::{net, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "passthrough-proxy")]
#[command(about = "Forward every request to a single backend", long_about = None)]
struct Cli {
    /// Config file holding the backend URL (created on first run)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:80")]
    listen: String,

    /// Worker threads (defaults to one per CPU)
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// Seconds the backend has to answer once the request is sent
    #[arg(long, default_value_t = 10)]
    read_timeout: u64,

    /// Seconds allowed to connect and send the request
    #[arg(long, default_value_t = 10)]
    write_timeout: u64,
}

impl Cli {
    fn server_options(&self) -> ServerOptions {
        ServerOptions {
            listener: ListenerConfig {
                bind_address: self.listen.clone(),
                workers: self.workers.map(NonZeroUsize::get),
            },
            timeouts: TimeoutConfig {
                read: Duration::from_secs(self.read_timeout),
                write: Duration::from_secs(self.write_timeout),
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    // Blocking: may prompt on the terminal. Must finish before serving.
    let config = load_or_create(&cli.config)?;
    let options = cli.server_options();

    tracing::info!(
        backend = %config.backend,
        bind_address = %options.listener.bind_address,
        workers = ?options.listener.workers,
        read_timeout = ?options.timeouts.read,
        write_timeout = ?options.timeouts.write,
        "Configuration loaded"
    );

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all();
    if let Some(workers) = options.listener.workers {
        runtime.worker_threads(workers);
    }

    runtime.build()?.block_on(serve(config, options))
}

async fn serve(config: ProxyConfig, options: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let listener = net::bind(&options.listener).await?;

    println!(
        "[{}] Started reverse proxy: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        config.backend
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    HttpServer::new(config, options.timeouts)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
