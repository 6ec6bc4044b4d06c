//! Wire types for the analysis API.
//!
//! Everything here mirrors what the backend serialises. Responses are
//! normalised at the client boundary (see [`Analysis::normalize`] and
//! [`AnalysisListPayload`]) so callers only ever see one shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Game mode an analysis is scoped to. Closed set, backend-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Rapid,
    Blitz,
    Bullet,
    Daily,
}

impl GameMode {
    /// Human-readable label, capitalised the way the dashboard shows it.
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Rapid => "Rapid",
            GameMode::Blitz => "Blitz",
            GameMode::Bullet => "Bullet",
            GameMode::Daily => "Daily",
        }
    }

    /// Wire value as the backend expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Rapid => "rapid",
            GameMode::Blitz => "blitz",
            GameMode::Bullet => "bullet",
            GameMode::Daily => "daily",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rapid" => Ok(GameMode::Rapid),
            "blitz" => Ok(GameMode::Blitz),
            "bullet" => Ok(GameMode::Bullet),
            "daily" => Ok(GameMode::Daily),
            other => Err(format!(
                "unknown game mode '{other}' (expected rapid, blitz, bullet or daily)"
            )),
        }
    }
}

/// Lifecycle state of an analysis.
///
/// The lifecycle is one-directional: pending → processing → completed or
/// failed, both terminal. `Unknown` absorbs values a newer backend may emit;
/// the dashboard renders those with the neutral badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AnalysisStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
            AnalysisStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chess-evolution analysis job as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub chess_username: String,
    pub end_date: NaiveDate,
    pub game_mode: GameMode,
    #[serde(default)]
    pub status: AnalysisStatus,

    // Results, populated once the analysis completes
    #[serde(default)]
    pub user_current_rating: Option<i32>,
    #[serde(default)]
    pub user_position_in_ranking: Option<u32>,
    #[serde(default)]
    pub total_opponents: Option<u32>,
    #[serde(default)]
    pub percentile: Option<f64>,

    // Metadata
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
}

/// Ranking results of a completed analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranking {
    /// The subject's position among the compared opponents, 1-based.
    pub position: u32,
    pub total_opponents: u32,
    /// Relative standing, 0-100.
    pub percentile: f64,
}

impl Analysis {
    /// Ranking results, available iff the analysis has completed.
    pub fn ranking(&self) -> Option<Ranking> {
        if self.status != AnalysisStatus::Completed {
            return None;
        }
        Some(Ranking {
            position: self.user_position_in_ranking?,
            total_opponents: self.total_opponents?,
            percentile: self.percentile?,
        })
    }

    /// Enforce the ranking-iff-completed invariant on an entity as
    /// received from the wire. Ranking fields on a non-completed analysis
    /// are stale or bogus and are dropped here, at the client boundary.
    pub fn normalize(mut self) -> Self {
        if self.status != AnalysisStatus::Completed {
            self.user_position_in_ranking = None;
            self.total_opponents = None;
            self.percentile = None;
        }
        self
    }
}

/// Input for creating a new analysis. Creation is a billed operation; the
/// client never retries it on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAnalysisRequest {
    pub chess_username: String,
    pub end_date: NaiveDate,
    pub game_mode: GameMode,
}

/// Status projection served by `GET /analysis/{id}/status/`, intended for
/// polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStatusInfo {
    pub id: Uuid,
    #[serde(default)]
    pub status: AnalysisStatus,
    /// Coarse progress percentage: 100 completed, 50 processing, 0 otherwise.
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chess_username: Option<String>,
    #[serde(default)]
    pub game_mode: Option<GameMode>,
}

/// Minimal user profile cached alongside the session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub total_analyses: u32,
}

/// One opponent's rating inside an opponent report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentRating {
    pub opponent_username: String,
    pub current_rating: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Opponent breakdown served by `GET /analysis/{id}/opponents/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentReport {
    pub analysis_id: Uuid,
    pub total_opponents: u32,
    #[serde(default)]
    pub user_rating: Option<i32>,
    #[serde(default)]
    pub user_position: Option<u32>,
    #[serde(default)]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub opponents: Vec<OpponentRating>,
}

/// The list endpoint answers either a paginated envelope or a bare array.
/// Both normalise to a plain `Vec<Analysis>` before reaching callers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AnalysisListPayload {
    Paged { results: Vec<Analysis> },
    Bare(Vec<Analysis>),
}

impl AnalysisListPayload {
    pub(crate) fn into_vec(self) -> Vec<Analysis> {
        match self {
            AnalysisListPayload::Paged { results } => results,
            AnalysisListPayload::Bare(list) => list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_json() -> &'static str {
        r#"{
            "id": "7f6e0cb2-6d35-4f0e-9c23-111111111111",
            "chess_username": "magnus",
            "end_date": "2024-12-31",
            "game_mode": "blitz",
            "status": "completed",
            "user_current_rating": 2830,
            "user_position_in_ranking": 1,
            "total_opponents": 42,
            "percentile": 97.6,
            "is_paid": true
        }"#
    }

    #[test]
    fn deserializes_completed_analysis() {
        let analysis: Analysis = serde_json::from_str(completed_json()).unwrap();
        assert_eq!(analysis.chess_username, "magnus");
        assert_eq!(analysis.game_mode, GameMode::Blitz);
        assert_eq!(analysis.status, AnalysisStatus::Completed);
        let ranking = analysis.ranking().expect("completed analysis has ranking");
        assert_eq!(ranking.position, 1);
        assert_eq!(ranking.total_opponents, 42);
        assert!((ranking.percentile - 97.6).abs() < f64::EPSILON);
    }

    #[test]
    fn deserializes_create_response_shape() {
        // The create endpoint echoes the inputs plus id/status/message only.
        let json = r#"{
            "id": "7f6e0cb2-6d35-4f0e-9c23-222222222222",
            "message": "Analysis created successfully!",
            "status": "pending",
            "chess_username": "hikaru",
            "game_mode": "bullet",
            "end_date": "2025-06-01"
        }"#;
        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Pending);
        assert_eq!(analysis.ranking(), None);
        assert_eq!(analysis.created_at, None);
        assert!(!analysis.is_paid);
    }

    #[test]
    fn unknown_status_falls_back() {
        let json = completed_json().replace("completed", "archived");
        let analysis: Analysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Unknown);
        assert!(!analysis.status.is_terminal());
    }

    #[test]
    fn normalize_drops_ranking_unless_completed() {
        let json = completed_json().replace("completed", "processing");
        let analysis: Analysis = serde_json::from_str(&json).unwrap();
        // Wire data claimed ranking fields on a processing entity
        assert!(analysis.user_position_in_ranking.is_some());

        let normalized = analysis.normalize();
        assert_eq!(normalized.user_position_in_ranking, None);
        assert_eq!(normalized.total_opponents, None);
        assert_eq!(normalized.percentile, None);
        assert_eq!(normalized.ranking(), None);
    }

    #[test]
    fn normalize_keeps_ranking_when_completed() {
        let analysis: Analysis = serde_json::from_str(completed_json()).unwrap();
        let normalized = analysis.normalize();
        assert!(normalized.ranking().is_some());
    }

    #[test]
    fn list_payload_accepts_paginated_envelope() {
        let json = format!(
            r#"{{"count": 1, "next": null, "previous": null, "results": [{}]}}"#,
            completed_json()
        );
        let payload: AnalysisListPayload = serde_json::from_str(&json).unwrap();
        let list = payload.into_vec();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].chess_username, "magnus");
    }

    #[test]
    fn list_payload_accepts_bare_array() {
        let json = format!("[{}]", completed_json());
        let payload: AnalysisListPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload.into_vec().len(), 1);
    }

    #[test]
    fn list_payload_accepts_empty_results() {
        let payload: AnalysisListPayload = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(payload.into_vec().is_empty());

        let payload: AnalysisListPayload = serde_json::from_str("[]").unwrap();
        assert!(payload.into_vec().is_empty());
    }

    #[test]
    fn game_mode_parsing() {
        assert_eq!("rapid".parse::<GameMode>().unwrap(), GameMode::Rapid);
        assert_eq!(" Blitz ".parse::<GameMode>().unwrap(), GameMode::Blitz);
        assert!("correspondence".parse::<GameMode>().is_err());
        assert_eq!(GameMode::Daily.as_str(), "daily");
        assert_eq!(GameMode::Bullet.label(), "Bullet");
    }

    #[test]
    fn game_mode_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&GameMode::Rapid).unwrap(), r#""rapid""#);
        let mode: GameMode = serde_json::from_str(r#""daily""#).unwrap();
        assert_eq!(mode, GameMode::Daily);
    }

    #[test]
    fn status_projection_deserializes() {
        let json = r#"{
            "id": "7f6e0cb2-6d35-4f0e-9c23-333333333333",
            "status": "processing",
            "progress": 50,
            "error_message": null,
            "completed_at": null,
            "created_at": "2025-01-15T10:30:00Z",
            "chess_username": "magnus",
            "game_mode": "rapid"
        }"#;
        let info: AnalysisStatusInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.status, AnalysisStatus::Processing);
        assert_eq!(info.progress, Some(50));
        assert_eq!(info.game_mode, Some(GameMode::Rapid));
    }
}
