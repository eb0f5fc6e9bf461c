//! Restoration project records
//!
//! The review context a verifier sees for a submitted project, plus the
//! field survey measurements an NGO reports at upload time. A small demo
//! catalog stands in for the registry backend during evaluations.

use serde::{Deserialize, Serialize};

/// Identifier for a submitted restoration project
pub type ProjectId = u32;

/// Where a submission sits in the human review queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
  Pending,
  Approved,
  Rejected,
}

impl ReviewStatus {
  pub fn label(&self) -> &'static str {
    match self {
      ReviewStatus::Pending => "pending",
      ReviewStatus::Approved => "approved",
      ReviewStatus::Rejected => "rejected",
    }
  }
}

/// Review context for one submitted restoration project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
  pub id: ProjectId,

  pub name: String,

  /// Submitting organization
  pub ngo: String,

  /// Coarse location label, e.g. a state or district
  pub location: String,

  /// Submission date as reported, ISO formatted
  pub date: String,

  pub status: ReviewStatus,

  /// Claimed restored area in hectares
  pub area_ha: f64,

  /// Seedlings planted according to the submission
  pub seedlings: u32,

  /// Submission confidence percentage from the intake checks, in [0, 100]
  pub confidence: f64,
}

/// Field survey measurements reported by the NGO at upload time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSurvey {
  /// Restored area in hectares
  pub area_restored_ha: f64,

  /// Ecosystem label, e.g. "mangrove" or "wetland"
  pub ecosystem_type: String,

  /// Months since restoration began
  pub months_since_restoration: f64,

  /// Seedling survival percentage, in [0, 100]
  pub survival_rate_percent: f64,

  /// Hydrology label, e.g. "Tidal"
  pub coastal_zone_type: String,
}

impl Default for FieldSurvey {
  /// The upload form's pre-filled values
  fn default() -> Self {
    Self {
      area_restored_ha: 75.0,
      ecosystem_type: "mangrove".to_string(),
      months_since_restoration: 18.0,
      survival_rate_percent: 92.0,
      coastal_zone_type: "Tidal".to_string(),
    }
  }
}

/// Demo projects used when no registry backend is wired up
pub fn demo_catalog() -> Vec<ProjectContext> {
  vec![
    ProjectContext {
      id: 1,
      name: "Sundarbans Mangrove Conservation".to_string(),
      ngo: "EcoRestore India".to_string(),
      location: "West Bengal".to_string(),
      date: "2024-01-15".to_string(),
      status: ReviewStatus::Pending,
      area_ha: 75.0,
      seedlings: 2500,
      confidence: 94.0,
    },
    ProjectContext {
      id: 2,
      name: "Kerala Backwater Restoration".to_string(),
      ngo: "Coastal Guard Foundation".to_string(),
      location: "Kerala".to_string(),
      date: "2024-01-14".to_string(),
      status: ReviewStatus::Approved,
      area_ha: 45.0,
      seedlings: 1800,
      confidence: 98.0,
    },
    ProjectContext {
      id: 3,
      name: "Tamil Nadu Seagrass Recovery".to_string(),
      ngo: "Marine Life Protectors".to_string(),
      location: "Tamil Nadu".to_string(),
      date: "2024-01-13".to_string(),
      status: ReviewStatus::Rejected,
      area_ha: 30.0,
      seedlings: 0,
      confidence: 45.0,
    },
  ]
}

/// Look up a demo project by id
pub fn find_demo_project(id: ProjectId) -> Option<ProjectContext> {
  demo_catalog().into_iter().find(|project| project.id == id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_review_status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ReviewStatus::Pending).unwrap(), "\"pending\"");
    assert_eq!(
      serde_json::from_str::<ReviewStatus>("\"approved\"").unwrap(),
      ReviewStatus::Approved
    );
  }

  #[test]
  fn test_demo_catalog_ids_are_unique() {
    let catalog = demo_catalog();
    assert_eq!(catalog.len(), 3);
    let mut ids: Vec<ProjectId> = catalog.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
  }

  #[test]
  fn test_find_demo_project() {
    assert_eq!(find_demo_project(2).unwrap().location, "Kerala");
    assert!(find_demo_project(99).is_none());
  }
}
