//! Kenya primary-care clinical vignettes (JSON array).
//!
//! The source spreadsheet is exported to JSON before ingestion; the loader
//! expects one object per vignette with `study_id`, `scenario`, and
//! `clinician_response` fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::prompts::VIGNETTE_SYSTEM_PROMPT;
use crate::traits::item::{Category, Item, ResponseFormat};

/// Characters of scenario text included in the classification prompt.
const SCENARIO_PROMPT_CHARS: usize = 500;

/// OBGYN/MCH/SRH category set for vignettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VignetteCategory {
    Maternal,
    Neonatal,
    ChildHealth,
    Srh,
    None,
    Error,
    ParseFail,
}

impl Category for VignetteCategory {
    const NONE: Self = Self::None;
    const ERROR: Self = Self::Error;
    const PARSE_FAIL: Self = Self::ParseFail;

    fn parse(label: &str) -> Option<Self> {
        match label {
            "MATERNAL" => Some(Self::Maternal),
            "NEONATAL" => Some(Self::Neonatal),
            "CHILD_HEALTH" => Some(Self::ChildHealth),
            "SRH" => Some(Self::Srh),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Maternal => "MATERNAL",
            Self::Neonatal => "NEONATAL",
            Self::ChildHealth => "CHILD_HEALTH",
            Self::Srh => "SRH",
            Self::None => "NONE",
            Self::Error => "ERROR",
            Self::ParseFail => "PARSE_FAIL",
        }
    }
}

/// One clinical vignette with its reference clinician response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vignette {
    pub study_id: u64,
    pub scenario: String,
    pub clinician_response: String,
}

impl Vignette {
    /// Scenario text capped for the prompt, split on a char boundary.
    fn scenario_excerpt(&self) -> &str {
        match self.scenario.char_indices().nth(SCENARIO_PROMPT_CHARS) {
            Some((end, _)) => &self.scenario[..end],
            None => &self.scenario,
        }
    }
}

/// Load the vignette set from a JSON array file.
pub fn load(path: &Path) -> Result<Vec<Vignette>, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|err| SourceError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    serde_json::from_str(&raw).map_err(|err| SourceError::Malformed {
        path: path.to_path_buf(),
        line: err.line(),
        source: err,
    })
}

impl Item for Vignette {
    type Category = VignetteCategory;

    const SYSTEM_PROMPT: &'static str = VIGNETTE_SYSTEM_PROMPT;
    const RESPONSE_FORMAT: ResponseFormat = ResponseFormat::DelimitedLines;

    fn prompt_block(&self) -> String {
        self.scenario_excerpt().to_string()
    }

    fn tsv_header() -> &'static [&'static str] {
        &["study_id", "scenario", "clinician_response", "category"]
    }

    fn tsv_row(&self, category: Self::Category) -> Vec<String> {
        vec![
            self.study_id.to_string(),
            self.scenario.clone(),
            self.clinician_response.clone(),
            category.as_str().to_string(),
        ]
    }
}
