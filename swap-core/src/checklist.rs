//! Pre-departure checklist: a read-only catalog of sections and items, and
//! the set of items a user has ticked off.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub urgent: bool,
    /// Free text such as "2-3 months before" or "After arrival".
    pub timeframe: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub title: String,
    pub urgency: Urgency,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub sections: Vec<ChecklistSection>,
}

impl Checklist {
    pub fn new(sections: Vec<ChecklistSection>) -> Self {
        Self { sections }
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn section(
        &self,
        title: &str,
    ) -> Option<&ChecklistSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn item(
        &self,
        id: &str,
    ) -> Option<&ChecklistItem> {
        self.items().find(|i| i.id == id)
    }

    pub fn urgent_items(&self) -> Vec<&ChecklistItem> {
        self.items().filter(|i| i.urgent).collect()
    }

    /// Items whose timeframe contains `timeframe`, ignoring case.
    pub fn items_by_timeframe(
        &self,
        timeframe: &str,
    ) -> Vec<&ChecklistItem> {
        let needle = timeframe.to_lowercase();
        self.items()
            .filter(|i| i.timeframe.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

fn percent(
    done: usize,
    total: usize,
) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

/// Ids of the items a user has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    completed: BTreeSet<String>,
}

impl ChecklistProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips an item between done and not done. Returns whether it is done
    /// afterwards.
    pub fn toggle(
        &mut self,
        id: &str,
    ) -> bool {
        let done = if self.completed.remove(id) {
            false
        } else {
            self.completed.insert(id.to_string())
        };
        debug!(id, done, "checklist item toggled");
        done
    }

    pub fn is_completed(
        &self,
        id: &str,
    ) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_ids(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// Percentage of the named section that is done; 0 for an unknown or
    /// empty section.
    pub fn section_progress(
        &self,
        checklist: &Checklist,
        title: &str,
    ) -> f64 {
        checklist.section(title).map_or(0.0, |section| {
            let done = section.items.iter().filter(|i| self.is_completed(&i.id)).count();
            percent(done, section.items.len())
        })
    }

    /// Percentage of all catalog items that are done. Ids not in the catalog
    /// are ignored.
    pub fn overall_progress(
        &self,
        checklist: &Checklist,
    ) -> f64 {
        let done = checklist.items().filter(|i| self.is_completed(&i.id)).count();
        percent(done, checklist.total_items())
    }

    pub fn urgent_completed(
        &self,
        checklist: &Checklist,
    ) -> usize {
        checklist
            .items()
            .filter(|i| i.urgent && self.is_completed(&i.id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(
        id: &str,
        urgent: bool,
        timeframe: &str,
    ) -> ChecklistItem {
        ChecklistItem {
            id: id.to_string(),
            text: format!("Do {id}"),
            urgent,
            timeframe: timeframe.to_string(),
            description: None,
        }
    }

    fn checklist() -> Checklist {
        Checklist::new(vec![
            ChecklistSection {
                title: "Legal & Documentation".to_string(),
                urgency: Urgency::High,
                items: vec![
                    item("visa", true, "2-3 months before"),
                    item("passport", true, "3-4 months before"),
                    item("emergency", false, "After arrival"),
                    item("transcripts", false, "2-3 months before"),
                ],
            },
            ChecklistSection {
                title: "Travel & Logistics".to_string(),
                urgency: Urgency::Medium,
                items: vec![item("flights", false, "2-3 Months Before")],
            },
        ])
    }

    #[test]
    fn queries_over_the_catalog() {
        let list = checklist();

        assert_eq!(list.total_items(), 5);
        assert_eq!(list.urgent_items().len(), 2);
        let ids: Vec<_> = list.items_by_timeframe("2-3 MONTHS").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["visa", "transcripts", "flights"]);
    }

    #[test]
    fn toggling_twice_undoes() {
        let mut progress = ChecklistProgress::new();

        assert!(progress.toggle("visa"));
        assert!(!progress.toggle("visa"));
        assert!(!progress.is_completed("visa"));
    }

    #[test]
    fn progress_percentages() {
        let list = checklist();
        let mut progress = ChecklistProgress::new();
        progress.toggle("visa");
        progress.toggle("emergency");
        progress.toggle("not-in-catalog");

        assert_eq!(progress.section_progress(&list, "Legal & Documentation"), 50.0);
        assert_eq!(progress.section_progress(&list, "Travel & Logistics"), 0.0);
        assert_eq!(progress.section_progress(&list, "Nowhere"), 0.0);
        assert_eq!(progress.overall_progress(&list), 40.0);
        assert_eq!(progress.urgent_completed(&list), 1);
    }

    #[test]
    fn urgency_parses_case_insensitively() {
        assert_eq!(Urgency::parse(" High "), Some(Urgency::High));
        assert_eq!(Urgency::parse("urgent"), None);
    }
}
