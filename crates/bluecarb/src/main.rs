use anyhow::Result;
use clap::{Parser, Subcommand};

use bluecarb::commands;
use bluecarb::project::FieldSurvey;

#[derive(Parser)]
#[command(name = "bluecarb")]
#[command(
  about = "BlueCarb - Coastal Restoration Verification\nML insight orchestration for restoration project review"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List the demo restoration projects
  Projects,
  /// Fetch the ML insight pair (restoration + risk) for a project
  Insight {
    /// Project id from the catalog
    project_id: u32,
  },
  /// Request an annual CO2 sequestration estimate for a field survey
  Estimate {
    /// Restored area in hectares
    #[arg(long, default_value_t = 75.0)]
    area: f64,
    /// Ecosystem label, e.g. "mangrove" or "wetland"
    #[arg(long, default_value = "mangrove")]
    ecosystem: String,
    /// Months since restoration began
    #[arg(long, default_value_t = 18.0)]
    months: f64,
    /// Seedling survival percentage
    #[arg(long, default_value_t = 92.0)]
    survival: f64,
    /// Hydrology label, e.g. "Tidal"
    #[arg(long, default_value = "Tidal")]
    zone: String,
  },
  /// Show recent entries from the prediction audit trail
  Audit {
    /// Maximum number of records to show
    #[arg(short, long, default_value = "20")]
    limit: usize,
    /// Filter by endpoint path, e.g. /predict/co2
    #[arg(long)]
    endpoint: Option<String>,
  },
}

async fn handle(command: Command) -> Result<()> {
  match command {
    Command::Projects => commands::list_projects().await,
    Command::Insight { project_id } => commands::project_insight(project_id).await,
    Command::Estimate { area, ecosystem, months, survival, zone } => {
      let survey = FieldSurvey {
        area_restored_ha: area,
        ecosystem_type: ecosystem,
        months_since_restoration: months,
        survival_rate_percent: survival,
        coastal_zone_type: zone,
      };
      commands::estimate(survey).await
    }
    Command::Audit { limit, endpoint } => commands::audit(limit, endpoint.as_deref()).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  handle(cli.command).await?;
  Ok(())
}
