//! Per-project ML insight cache and fetch state machine
//!
//! Each project gets at most one insight fetch per session. A fetch runs
//! the classification and risk calls concurrently and lands as a single
//! unit: both answers or neither. Loaded and failed entries are terminal;
//! a reviewer who wants a fresh look resets the entry first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::features;
use crate::mlapi::client::PredictionApi;
use crate::mlapi::types::{RestorationClassificationResponse, RiskScoringResponse};
use crate::project::{ProjectContext, ProjectId};

/// Message shown to reviewers whenever a fetch fails. Which sub-call broke
/// and why stays in the logs; reviewers only need to know insights are off.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "ML service unavailable";

// Entries
// =======

/// Coarse fetch state, independent of the attached data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightStatus {
  Idle,
  Loading,
  Loaded,
  Failed,
}

/// The pair of answers a successful fetch produces
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsight {
  pub restoration: RestorationClassificationResponse,
  pub risk: RiskScoringResponse,
}

/// Cached fetch state for one project.
///
/// A result exists only on a loaded entry and an error message only on a
/// failed one; the enum makes any other combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightEntry {
  #[default]
  Idle,
  Loading,
  Loaded(ProjectInsight),
  Failed(String),
}

impl InsightEntry {
  pub fn status(&self) -> InsightStatus {
    match self {
      InsightEntry::Idle => InsightStatus::Idle,
      InsightEntry::Loading => InsightStatus::Loading,
      InsightEntry::Loaded(_) => InsightStatus::Loaded,
      InsightEntry::Failed(_) => InsightStatus::Failed,
    }
  }

  pub fn result(&self) -> Option<&ProjectInsight> {
    match self {
      InsightEntry::Loaded(insight) => Some(insight),
      _ => None,
    }
  }

  pub fn error_message(&self) -> Option<&str> {
    match self {
      InsightEntry::Failed(message) => Some(message),
      _ => None,
    }
  }

  /// Loaded and failed entries stay put until explicitly reset
  pub fn is_terminal(&self) -> bool {
    matches!(self, InsightEntry::Loaded(_) | InsightEntry::Failed(_))
  }
}

// Store
// =====

/// Session-scoped insight cache keyed by project id.
///
/// Cloning is cheap; clones share the same map.
#[derive(Clone, Default)]
pub struct InsightStore {
  entries: Arc<Mutex<HashMap<ProjectId, InsightEntry>>>,
}

impl InsightStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> MutexGuard<'_, HashMap<ProjectId, InsightEntry>> {
    // Every transition below is a single map operation, so a poisoned
    // lock cannot hide a half-applied update; take the guard back.
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Snapshot of a project's entry. Unknown projects read as idle and
  /// reads never change state.
  pub fn get(&self, id: ProjectId) -> InsightEntry {
    self.entries().get(&id).cloned().unwrap_or_default()
  }

  /// Idle-to-loading guard. Returns false when any attempt already
  /// exists for the project, in flight or terminal.
  pub(crate) fn begin(&self, id: ProjectId) -> bool {
    let mut entries = self.entries();
    match entries.get(&id) {
      None | Some(InsightEntry::Idle) => {
        entries.insert(id, InsightEntry::Loading);
        true
      }
      Some(_) => false,
    }
  }

  /// Loading-to-terminal transition. A completion only lands on the
  /// loading entry that started it; anything else is discarded.
  pub(crate) fn complete(&self, id: ProjectId, outcome: Result<ProjectInsight, String>) -> bool {
    let mut entries = self.entries();
    if !matches!(entries.get(&id), Some(InsightEntry::Loading)) {
      return false;
    }
    let entry = match outcome {
      Ok(insight) => InsightEntry::Loaded(insight),
      Err(message) => InsightEntry::Failed(message),
    };
    entries.insert(id, entry);
    true
  }

  /// Drop a terminal entry so the next request fetches again. Entries
  /// still in flight are left alone and false is returned.
  pub fn reset(&self, id: ProjectId) -> bool {
    let mut entries = self.entries();
    if entries.get(&id).is_some_and(InsightEntry::is_terminal) {
      entries.remove(&id);
      true
    } else {
      false
    }
  }

  /// Number of projects with a non-idle entry
  pub fn len(&self) -> usize {
    self.entries().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries().is_empty()
  }
}

// Service
// =======

/// Orchestrates insight fetches against a prediction backend.
///
/// Cloning is cheap; clones share the cache and the backend handle.
#[derive(Clone)]
pub struct InsightService {
  api: Arc<dyn PredictionApi>,
  store: InsightStore,
}

impl InsightService {
  pub fn new(api: Arc<dyn PredictionApi>) -> Self {
    Self { api, store: InsightStore::new() }
  }

  /// Direct access to the underlying cache
  pub fn store(&self) -> &InsightStore {
    &self.store
  }

  /// Snapshot of a project's insight entry
  pub fn insight(&self, id: ProjectId) -> InsightEntry {
    self.store.get(id)
  }

  /// Drop a terminal entry so the project can be requested again
  pub fn reset(&self, id: ProjectId) -> bool {
    self.store.reset(id)
  }

  /// Fetch classification and risk for `project`, then land the pair as
  /// one entry. A no-op when any attempt already exists. The loading mark
  /// happens before the first await, so overlapping callers agree on a
  /// single attempt.
  pub async fn request_insight(&self, project: &ProjectContext) {
    if !self.store.begin(project.id) {
      return;
    }
    self.fetch_and_complete(project).await;
  }

  /// Fire-and-forget variant of [`request_insight`](Self::request_insight).
  /// The entry is marked loading before this returns; progress is observed
  /// through [`insight`](Self::insight).
  pub fn spawn_request(&self, project: &ProjectContext) {
    if !self.store.begin(project.id) {
      return;
    }
    let service = self.clone();
    let project = project.clone();
    tokio::spawn(async move {
      service.fetch_and_complete(&project).await;
    });
  }

  async fn fetch_and_complete(&self, project: &ProjectContext) {
    let classification_request = features::classification_features(project);
    let risk_request = features::risk_features(project);

    let outcome = tokio::try_join!(
      self.api.classify_restoration(&classification_request),
      self.api.score_risk(&risk_request),
    );

    match outcome {
      Ok((restoration, risk)) => {
        self.store.complete(project.id, Ok(ProjectInsight { restoration, risk }));
      }
      Err(err) => {
        foghorn::warn(&format!("ML insight fetch failed for project {}: {err}", project.id));
        self.store.complete(project.id, Err(SERVICE_UNAVAILABLE_MESSAGE.to_string()));
      }
    }
  }
}
