//! Form state backing the "new analysis" dialog.

use analysis_client::{CreateAnalysisRequest, GameMode};
use chrono::NaiveDate;

/// The three input fields of the create dialog. Fields hold raw user input;
/// [`CreateForm::to_request`] validates and converts on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub chess_username: String,
    /// Calendar date as typed, `YYYY-MM-DD`.
    pub end_date: String,
    pub game_mode: GameMode,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            chess_username: String::new(),
            end_date: String::new(),
            game_mode: GameMode::Rapid,
        }
    }
}

impl CreateForm {
    /// Both required fields are filled in. Submission stays disabled until
    /// this holds.
    pub fn is_complete(&self) -> bool {
        !self.chess_username.trim().is_empty() && !self.end_date.trim().is_empty()
    }

    /// Validate the raw input and build the create request.
    pub fn to_request(&self) -> Result<CreateAnalysisRequest, String> {
        let username = self.chess_username.trim();
        if username.is_empty() {
            return Err("Chess username is required".to_string());
        }
        let end_date = NaiveDate::parse_from_str(self.end_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                format!(
                    "Invalid end date '{}' (expected YYYY-MM-DD)",
                    self.end_date.trim()
                )
            })?;
        Ok(CreateAnalysisRequest {
            chess_username: username.to_string(),
            end_date,
            game_mode: self.game_mode,
        })
    }
}
