//! Item trait: what the pipeline needs from a dataset record.
//!
//! Each dataset implements [`Item`] for its record type: how a record renders
//! into the classification prompt, which category set labels it, and how a
//! surviving record projects into the export. The pipeline itself never looks
//! inside a record.

use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// How the classifier's response for this item type is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A JSON array of per-item objects: `[{"id": 0, "is_obgyn": true, "category": "..."}, ...]`
    JsonArray,

    /// One `INDEX|YES|CATEGORY` (or `INDEX|NO|NONE`) line per item
    DelimitedLines,
}

/// A category label set for one dataset.
///
/// Every set carries the null category plus the two failure markers the
/// pipeline records when a batch degrades or a response entry cannot be
/// parsed.
pub trait Category:
    Copy + Eq + Hash + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The null category for negative classifications.
    const NONE: Self;

    /// Recorded for every member of a batch abandoned after retries.
    const ERROR: Self;

    /// Recorded when the response entry for an item is missing or malformed.
    const PARSE_FAIL: Self;

    /// Parse a label as it appears in a model response.
    fn parse(label: &str) -> Option<Self>;

    /// The label as written to progress records and exports.
    fn as_str(&self) -> &'static str;

    /// Whether this is the null category (excluded from the export).
    fn is_null(&self) -> bool {
        *self == Self::NONE
    }

    /// Whether this is one of the failure markers.
    fn is_failure(&self) -> bool {
        *self == Self::ERROR || *self == Self::PARSE_FAIL
    }
}

/// One source record to be classified and potentially exported.
///
/// Items are immutable once loaded; the pipeline identifies them by their
/// zero-based position in the loaded sequence.
pub trait Item: Send + Sync {
    /// The category set labelling this item type.
    type Category: Category;

    /// Fixed system instruction sent with every batch of this item type.
    const SYSTEM_PROMPT: &'static str;

    /// Response shape the system prompt asks for.
    const RESPONSE_FORMAT: ResponseFormat;

    /// The text block representing this item inside a batch prompt.
    ///
    /// The classifier prefixes each block with its local `[n]` marker; the
    /// block itself should not number the item.
    fn prompt_block(&self) -> String;

    /// Column names for the export, in output order.
    fn tsv_header() -> &'static [&'static str];

    /// Cells for this item's export row, matching [`Item::tsv_header`].
    fn tsv_row(&self, category: Self::Category) -> Vec<String>;
}
