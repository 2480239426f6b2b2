//! MedQA USMLE question bank (JSONL).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::prompts::USMLE_SYSTEM_PROMPT;
use crate::traits::item::{Category, Item, ResponseFormat};

/// OBGYN category set for USMLE questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsmleCategory {
    Obstetrics,
    Gynecology,
    ReproductiveHealth,
    None,
    Error,
    ParseFail,
}

impl Category for UsmleCategory {
    const NONE: Self = Self::None;
    const ERROR: Self = Self::Error;
    const PARSE_FAIL: Self = Self::ParseFail;

    fn parse(label: &str) -> Option<Self> {
        match label {
            "OBSTETRICS" => Some(Self::Obstetrics),
            "GYNECOLOGY" => Some(Self::Gynecology),
            "REPRODUCTIVE_HEALTH" => Some(Self::ReproductiveHealth),
            "NONE" => Some(Self::None),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Obstetrics => "OBSTETRICS",
            Self::Gynecology => "GYNECOLOGY",
            Self::ReproductiveHealth => "REPRODUCTIVE_HEALTH",
            Self::None => "NONE",
            Self::Error => "ERROR",
            Self::ParseFail => "PARSE_FAIL",
        }
    }
}

/// One USMLE-style question.
///
/// Options keep their source order so the formatted letter list reads
/// `A. ... | B. ...` exactly as the question bank presents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsmleQuestion {
    pub question: String,
    pub options: IndexMap<String, String>,
    pub answer: String,
    #[serde(default)]
    pub meta_info: String,
}

impl UsmleQuestion {
    /// Options flattened to a single `A. text | B. text` string.
    pub fn options_formatted(&self) -> String {
        self.options
            .iter()
            .map(|(letter, text)| format!("{letter}. {text}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Text of the correct option, empty if the letter is unknown.
    pub fn answer_text(&self) -> &str {
        self.options
            .get(&self.answer)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Load the question bank from a JSONL file.
pub fn load(path: &Path) -> Result<Vec<UsmleQuestion>, SourceError> {
    let file = File::open(path).map_err(|err| SourceError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    let mut questions = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| SourceError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let question = serde_json::from_str(&line).map_err(|err| SourceError::Malformed {
            path: path.to_path_buf(),
            line: lineno + 1,
            source: err,
        })?;
        questions.push(question);
    }
    Ok(questions)
}

impl Item for UsmleQuestion {
    type Category = UsmleCategory;

    const SYSTEM_PROMPT: &'static str = USMLE_SYSTEM_PROMPT;
    const RESPONSE_FORMAT: ResponseFormat = ResponseFormat::JsonArray;

    fn prompt_block(&self) -> String {
        format!("{}\nOptions: {}", self.question, self.options_formatted())
    }

    fn tsv_header() -> &'static [&'static str] {
        &[
            "question",
            "options_formatted",
            "correct_letter",
            "answer",
            "category",
            "meta_info",
        ]
    }

    fn tsv_row(&self, category: Self::Category) -> Vec<String> {
        vec![
            self.question.clone(),
            self.options_formatted(),
            self.answer.clone(),
            self.answer_text().to_string(),
            category.as_str().to_string(),
            self.meta_info.clone(),
        ]
    }
}
