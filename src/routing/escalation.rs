//! VIP escalation to the capital offices.

use tracing::info;

use crate::routing::filter::VIP_SKILL;
use crate::routing::office::CapitalOffices;
use crate::routing::types::{Manager, SegmentBucket};

/// Whether a ticket with this bucket and local candidate set escalates.
///
/// Only VIP tickets with no local candidate do; PRIORITY and MASS never.
pub fn should_escalate(bucket: SegmentBucket, candidates: &[usize]) -> bool {
    bucket == SegmentBucket::Vip && candidates.is_empty()
}

/// VIP-skilled managers of either capital office, in pool order.
///
/// Only the office and VIP constraints apply here; the intent and
/// language gates are not re-run.
pub fn escalate(managers: &[Manager], capitals: &CapitalOffices) -> Vec<usize> {
    let candidates: Vec<usize> = managers
        .iter()
        .enumerate()
        .filter(|(_, m)| capitals.contains(&m.office) && m.has_skill(VIP_SKILL))
        .map(|(i, _)| i)
        .collect();

    info!(
        astana = %capitals.astana,
        almaty = %capitals.almaty,
        candidates = candidates.len(),
        "Escalating VIP ticket to capital offices"
    );
    candidates
}
