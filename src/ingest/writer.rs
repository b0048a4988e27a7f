//! Assignment output as CSV.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::IngestError;
use crate::routing::types::AssignmentResult;

const HEADER: [&str; 11] = [
    "guid",
    "segment",
    "intent",
    "sentiment",
    "language",
    "priority",
    "office",
    "manager",
    "rule",
    "summary",
    "recommendation",
];

/// One output line, in `HEADER` order. Enum values are written as their human labels.
#[derive(Debug, Serialize)]
struct AssignmentRow<'a> {
    guid: &'a str,
    segment: &'static str,
    intent: &'static str,
    sentiment: &'static str,
    language: &'static str,
    priority: u8,
    office: &'a str,
    manager: &'a str,
    rule: &'static str,
    summary: &'a str,
    recommendation: &'a str,
}

impl<'a> From<&'a AssignmentResult> for AssignmentRow<'a> {
    fn from(result: &'a AssignmentResult) -> Self {
        Self {
            guid: &result.guid,
            segment: result.segment.label(),
            intent: result.intent.label(),
            sentiment: result.sentiment.label(),
            language: result.language.code(),
            priority: result.priority,
            office: result.office.as_str(),
            manager: result.manager.as_str(),
            rule: result.rule.label(),
            summary: &result.summary,
            recommendation: &result.recommendation,
        }
    }
}

/// Write `results` with a header row (also for an empty batch).
pub fn write_results<W: Write>(output: W, results: &[AssignmentResult]) -> Result<(), IngestError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(HEADER)?;
    for result in results {
        writer.serialize(AssignmentRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `results` to `path`, creating parent directories as needed.
pub fn write_results_to_path(path: &Path, results: &[AssignmentResult]) -> Result<(), IngestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_results(file, results)?;
    info!(path = %path.display(), rows = results.len(), "Wrote assignments");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::routing::types::{Assignee, AssignmentRule, ResolvedOffice, Ticket};

    #[test]
    fn writes_header_and_labels() {
        let ticket = Ticket::new("g-1", "вопрос", "VIP", "Казахстан", "Астана");
        let results = vec![
            AssignmentResult::new(
                &ticket,
                Classification::empty(),
                ResolvedOffice::Unit("Астана".into()),
                Assignee::Manager("Иванов".into()),
                AssignmentRule::Direct,
            ),
            AssignmentResult::new(
                &ticket,
                Classification::empty(),
                ResolvedOffice::CapitalEscalation,
                Assignee::Unassigned,
                AssignmentRule::Unassigned,
            ),
        ];

        let mut buf = Vec::new();
        write_results(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "guid,segment,intent,sentiment,language,priority,office,manager,rule,summary,recommendation"
        );
        assert!(lines[1].starts_with("g-1,VIP,consultation,neutral,RU,10,Астана,Иванов,direct,"));
        assert!(lines[2].contains("CAPITAL_ESCALATION,UNASSIGNED,unassigned"));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join("assignments.csv");
        write_results_to_path(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("guid,segment,"));
    }
}
