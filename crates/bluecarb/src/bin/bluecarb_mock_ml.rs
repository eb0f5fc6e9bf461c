//! BlueCarb stand-in ML service
//!
//! Serves the three prediction endpoints with deterministic heuristics so
//! the CLI and dashboards can run without the production model deployment.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use foghorn::audit::AuditLog;

#[derive(Parser)]
#[command(name = "bluecarb_mock_ml")]
#[command(about = "BlueCarb stand-in ML prediction service")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "127.0.0.1:8000")]
  bind: SocketAddr,

  /// Audit log location (defaults to ~/.bluecarb/predictions.log.jsonl)
  #[arg(long)]
  audit_log: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // HTTP trace detail only when verbose; the service's own events stay at info
  let filter = if args.verbose {
    EnvFilter::new("info,tower_http=debug")
  } else {
    EnvFilter::new("bluecarb=info,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let audit = match args.audit_log {
    Some(path) => AuditLog::open(path)?,
    None => AuditLog::open_default()?,
  };

  bluecarb::mockml::start_server(args.bind, audit).await?;

  Ok(())
}
