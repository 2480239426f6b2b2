//! Exporter - join items with classifications and write the TSV.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SinkError;
use crate::traits::item::{Category, Item};
use crate::types::classification::Classification;

/// What the export pass saw and wrote.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Items considered (the full source sequence).
    pub total: usize,

    /// Rows written.
    pub exported: usize,

    /// Category label -> count over ALL items, exported or not.
    pub category_counts: BTreeMap<&'static str, usize>,

    /// Indices whose records carry a failure marker, for review.
    pub failed_idxs: Vec<usize>,
}

/// Write the TSV of positively classified items.
///
/// Every item is looked up in the progress map; an absent record counts as a
/// negative classification with the null category. Rows survive when the
/// decision is positive and the category is not null. Embedded newlines in
/// cells are escaped so each record occupies exactly one output line; tab
/// characters are assumed absent from source text, so cells are not quoted.
pub fn export_tsv<I: Item>(
    items: &[I],
    done: &HashMap<usize, Classification<I::Category>>,
    path: &Path,
) -> Result<ExportSummary, SinkError> {
    let io_err = |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(out, "{}", I::tsv_header().join("\t")).map_err(io_err)?;

    let mut summary = ExportSummary {
        total: items.len(),
        exported: 0,
        category_counts: BTreeMap::new(),
        failed_idxs: Vec::new(),
    };

    for (idx, item) in items.iter().enumerate() {
        let (is_obgyn, category) = done
            .get(&idx)
            .map(|record| (record.is_obgyn, record.category))
            .unwrap_or((false, I::Category::NONE));

        *summary.category_counts.entry(category.as_str()).or_insert(0) += 1;
        if category.is_failure() {
            summary.failed_idxs.push(idx);
        }

        if is_obgyn && !category.is_null() {
            let row: Vec<String> = item
                .tsv_row(category)
                .iter()
                .map(|cell| sanitize_cell(cell))
                .collect();
            writeln!(out, "{}", row.join("\t")).map_err(io_err)?;
            summary.exported += 1;
        }
    }

    out.flush().map_err(io_err)?;
    Ok(summary)
}

/// Collapse embedded line breaks to the literal two-character `\n` sequence.
pub fn sanitize_cell(text: &str) -> String {
    text.replace("\r\n", "\\n")
        .replace('\r', "\\n")
        .replace('\n', "\\n")
        .trim()
        .to_string()
}
