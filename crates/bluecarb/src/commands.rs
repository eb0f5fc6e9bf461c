//! CLI command implementations

use anyhow::{anyhow, Result};
use colored::*;
use std::sync::Arc;

use foghorn::audit::AuditLog;

use crate::features;
use crate::insight::{InsightEntry, InsightService};
use crate::mlapi::client::{MlClient, PredictionApi};
use crate::project::{self, FieldSurvey, ProjectContext, ProjectId, ReviewStatus};

/// List the demo restoration projects with their review standing
pub async fn list_projects() -> Result<()> {
  println!("{}", "Restoration projects".bold());
  println!();

  for project in project::demo_catalog() {
    println!(
      "{} {} {}",
      status_marker(project.status),
      project.name.bold(),
      format!("#{}", project.id).dimmed()
    );
    println!(
      "   {} | {} | {} | {}",
      project.status.label(),
      project.ngo.cyan(),
      project.location.blue(),
      project.date.dimmed()
    );
    println!(
      "   {:.1} ha, {} seedlings, intake confidence {:.0}%",
      project.area_ha, project.seedlings, project.confidence
    );
    println!();
  }

  Ok(())
}

/// Fetch and display the insight pair for one project
pub async fn project_insight(project_id: ProjectId) -> Result<()> {
  let project = project::find_demo_project(project_id)
    .ok_or_else(|| anyhow!("No demo project with id {project_id}"))?;

  foghorn::info(&format!("Requesting ML insight for {}", project.name));

  let service = InsightService::new(Arc::new(MlClient::from_env()));
  service.request_insight(&project).await;

  render_insight_entry(&project, &service.insight(project.id));
  Ok(())
}

/// Request an annual CO2 sequestration estimate for a field survey
pub async fn estimate(survey: FieldSurvey) -> Result<()> {
  let request = features::co2_features(&survey);
  foghorn::info(&format!(
    "Requesting CO2 estimate for {:.1} ha of {}",
    request.area_restored_ha, request.ecosystem_type
  ));

  let client = MlClient::from_env();
  let response = client.predict_co2(&request).await.map_err(|err| {
    foghorn::error(&format!("CO2 estimate failed: {err}"));
    anyhow!("Unable to fetch ML estimate. Check ML service.")
  })?;

  println!();
  println!(
    "{} {}",
    format!("{:.2}", response.predicted_co2_tons_per_year).green().bold(),
    "tonnes CO2 per year".bold()
  );
  println!();
  println!("{}", response.explanation.dimmed());
  println!();
  println!("{}", "Top features".bold());
  for item in &response.feature_importance {
    println!("  {:<32} {:.4}", item.feature, item.importance);
  }

  Ok(())
}

/// Show recent entries from the prediction audit trail
pub async fn audit(limit: usize, endpoint: Option<&str>) -> Result<()> {
  let log = AuditLog::open_default()?;
  let records = log.tail(Some(limit), endpoint).await?;

  if records.is_empty() {
    println!("No prediction records found.");
    return Ok(());
  }

  for record in records {
    println!(
      "{} {} {}",
      record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      record.endpoint.cyan(),
      serde_json::to_string(&record.response)?
    );
  }

  Ok(())
}

// Rendering
// =========

fn status_marker(status: ReviewStatus) -> ColoredString {
  match status {
    ReviewStatus::Approved => "✓".green(),
    ReviewStatus::Pending => "●".yellow(),
    ReviewStatus::Rejected => "✗".red(),
  }
}

fn restoration_color(status: &str) -> ColoredString {
  match status {
    "SUCCESSFUL" => status.green().bold(),
    "PARTIAL" => status.yellow().bold(),
    _ => status.red().bold(),
  }
}

fn risk_color(level: &str) -> ColoredString {
  match level {
    "LOW" => level.green().bold(),
    "MEDIUM" => level.yellow().bold(),
    _ => level.red().bold(),
  }
}

fn render_insight_entry(project: &ProjectContext, entry: &InsightEntry) {
  println!();
  println!("{} {}", project.name.bold(), format!("#{}", project.id).dimmed());

  match entry {
    InsightEntry::Loaded(insight) => {
      let restoration = &insight.restoration;
      println!(
        "  Restoration: {} {}",
        restoration_color(&restoration.restoration_status),
        format!("({:.1}% confidence)", restoration.confidence_score * 100.0).dimmed()
      );
      println!("    {}", restoration.explanation.dimmed());

      let risk = &insight.risk;
      println!(
        "  Risk: {} - {} review {}",
        risk_color(&risk.risk_level),
        risk.review_priority,
        format!("({:.1}% confidence)", risk.confidence_score * 100.0).dimmed()
      );
      println!("    {}", risk.explanation.dimmed());
    }
    InsightEntry::Failed(message) => {
      println!("  {} {}", "⚠".yellow(), message.red());
    }
    InsightEntry::Idle | InsightEntry::Loading => {
      println!("  {}", "Insight request still pending.".dimmed());
    }
  }
}
