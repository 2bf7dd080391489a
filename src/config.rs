use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gap_model::{GapModel, TieBreak};
use crate::scoring::ScoreParams;
use crate::AlignerError;

/// Everything that parameterizes one alignment run.
///
/// Loadable from TOML; missing keys fall back to the defaults:
///
/// ```toml
/// gap_model = "neighbor-state"
/// tie_break = ["diagonal", "vertical", "horizontal"]
///
/// [scoring]
/// match_score = 20
/// mismatch = -10
/// gap_open = -5
/// gap_ext = -5
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    pub scoring: ScoreParams,
    pub gap_model: GapModel,
    pub tie_break: TieBreak,
}

impl AlignConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scoring(mut self, scoring: ScoreParams) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_gap_model(mut self, gap_model: GapModel) -> Self {
        self.gap_model = gap_model;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, AlignerError> {
        toml::from_str(s).map_err(|e| AlignerError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AlignerError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AlignerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }
}
