use std::io::Read;

use serde::Deserialize;
use swap_core::checklist::{Checklist, ChecklistItem, ChecklistSection, Urgency};
use thiserror::Error;

const BUILTIN_CHECKLIST_CSV: &str = include_str!("../data/checklist.csv");

/// Errors that can occur when reading a checklist catalog.
#[derive(Debug, Error)]
pub enum CsvLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Line {line}: invalid urgency '{value}' (expected high, medium or low)")]
    InvalidUrgency { line: u64, value: String },

    #[error("Line {line}: section '{section}' was already declared with urgency '{expected}'")]
    UrgencyMismatch {
        line: u64,
        section: String,
        expected: Urgency,
    },

    #[error("Line {line}: duplicate item id '{id}'")]
    DuplicateId { line: u64, id: String },

    #[error("Line {line}: item id is empty")]
    EmptyId { line: u64 },
}

impl From<csv::Error> for CsvLoadError {
    fn from(err: csv::Error) -> Self {
        CsvLoadError::CsvParse(err.to_string())
    }
}

/// One row of the checklist CSV.
///
/// - `section`: section title; rows of one section must be contiguous
///   for the section to appear once
/// - `urgency`: the section's urgency (`high`, `medium`, `low`)
/// - `id`: unique item id
/// - `text`, `timeframe`: item label and when to do it
/// - `urgent`: `true` or `false`
/// - `description`: optional longer explanation
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChecklistRecord {
    pub section: String,
    pub urgency: String,
    pub id: String,
    pub text: String,
    pub urgent: bool,
    pub timeframe: String,
    #[serde(deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Builds a [`Checklist`] from CSV rows, keeping sections and items in file
/// order.
pub struct ChecklistLoader;

impl ChecklistLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Checklist, CsvLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut sections: Vec<ChecklistSection> = Vec::new();
        let mut seen_ids = std::collections::HashSet::new();

        let headers = csv_reader.headers()?.clone();

        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());
            let record: ChecklistRecord = row.deserialize(Some(&headers))?;

            let urgency = Urgency::parse(&record.urgency).ok_or_else(|| CsvLoadError::InvalidUrgency {
                line,
                value: record.urgency.clone(),
            })?;
            let id = record.id.trim().to_string();
            if id.is_empty() {
                return Err(CsvLoadError::EmptyId { line });
            }
            if !seen_ids.insert(id.clone()) {
                return Err(CsvLoadError::DuplicateId { line, id });
            }

            let item = ChecklistItem {
                id,
                text: record.text,
                urgent: record.urgent,
                timeframe: record.timeframe,
                description: record.description,
            };

            match sections.iter_mut().find(|s| s.title == record.section) {
                Some(section) if section.urgency != urgency => {
                    return Err(CsvLoadError::UrgencyMismatch {
                        line,
                        section: record.section,
                        expected: section.urgency,
                    });
                }
                Some(section) => section.items.push(item),
                None => sections.push(ChecklistSection {
                    title: record.section,
                    urgency,
                    items: vec![item],
                }),
            }
        }

        tracing::debug!(sections = sections.len(), "checklist catalog parsed");
        Ok(Checklist::new(sections))
    }
}

/// The catalog shipped with the crate.
pub fn builtin_checklist() -> Result<Checklist, CsvLoadError> {
    ChecklistLoader::parse(BUILTIN_CHECKLIST_CSV.as_bytes())
}
