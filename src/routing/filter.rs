//! Candidate filter pipeline.
//!
//! Ordered, strictly narrowing stages over the manager pool:
//! 1. Office match
//! 2. Segment gate (VIP/PRIORITY need the `VIP` skill)
//! 3. Data-change gate (senior specialists only)
//! 4. Language gate (non-default languages need the language skill)
//!
//! Each stage keeps a subset of its input, so an empty set stays empty.
//! Candidates are indices into the manager pool.

use tracing::trace;

use crate::classify::{Classification, Intent};
use crate::routing::types::{Manager, SegmentBucket};

/// Skill required for VIP and PRIORITY tickets.
pub const VIP_SKILL: &str = "VIP";

/// Seniority marker in a normalized position.
const SENIOR_MARKER: &str = "глав";

/// Specialist marker in a normalized position.
const SPECIALIST_MARKER: &str = "спец";

/// Managers whose office equals `office`, in pool order.
pub fn office_pool(managers: &[Manager], office: &str) -> Vec<usize> {
    managers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.office == office)
        .map(|(i, _)| i)
        .collect()
}

/// Whether a manager may take data-change tickets.
pub fn is_senior_specialist(manager: &Manager) -> bool {
    manager.position_norm.contains(SENIOR_MARKER)
        && manager.position_norm.contains(SPECIALIST_MARKER)
}

/// Run all stages for a ticket routed to `office`.
pub fn filter_candidates(
    managers: &[Manager],
    office: &str,
    bucket: SegmentBucket,
    classification: &Classification,
) -> Vec<usize> {
    let mut candidates = office_pool(managers, office);
    trace!(office, remaining = candidates.len(), "office stage");

    if bucket.requires_vip_skill() {
        candidates.retain(|&i| managers[i].has_skill(VIP_SKILL));
        trace!(remaining = candidates.len(), "segment stage");
    }

    if classification.intent == Intent::DataChange {
        candidates.retain(|&i| is_senior_specialist(&managers[i]));
        trace!(remaining = candidates.len(), "data-change stage");
    }

    if !classification.language.is_default() {
        let code = classification.language.code();
        candidates.retain(|&i| managers[i].has_skill(code));
        trace!(language = code, remaining = candidates.len(), "language stage");
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Language;

    fn classification(intent: Intent, language: Language) -> Classification {
        Classification {
            intent,
            language,
            ..Classification::empty()
        }
    }

    fn pool() -> Vec<Manager> {
        vec![
            Manager::new("A", "Специалист", "", "Алматы", 0),
            Manager::new("B", "Главный специалист", "VIP", "Алматы", 0),
            Manager::new("C", "Главный специалист", "VIP, ENG", "Алматы", 0),
            Manager::new("D", "Ведущий специалист", "KZ", "Алматы", 0),
            Manager::new("E", "Главный специалист", "VIP, ENG", "Астана", 0),
        ]
    }

    #[test]
    fn mass_ticket_keeps_whole_office() {
        let managers = pool();
        let c = classification(Intent::Consultation, Language::Ru);
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Mass, &c),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn vip_and_priority_require_vip_skill() {
        let managers = pool();
        let c = classification(Intent::Consultation, Language::Ru);
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Vip, &c),
            vec![1, 2]
        );
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Priority, &c),
            vec![1, 2]
        );
    }

    #[test]
    fn data_change_requires_senior_specialist() {
        let managers = pool();
        let c = classification(Intent::DataChange, Language::Ru);
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Mass, &c),
            vec![1, 2]
        );
    }

    #[test]
    fn language_gate_requires_language_skill() {
        let managers = pool();
        let kz = classification(Intent::Consultation, Language::Kz);
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Mass, &kz),
            vec![3]
        );
        let eng = classification(Intent::Consultation, Language::Eng);
        assert_eq!(
            filter_candidates(&managers, "Алматы", SegmentBucket::Vip, &eng),
            vec![2]
        );
    }

    #[test]
    fn stages_compose_as_intersection() {
        let managers = pool();
        // VIP + data change + KZ: nobody in Almaty has all three.
        let c = classification(Intent::DataChange, Language::Kz);
        assert!(filter_candidates(&managers, "Алматы", SegmentBucket::Vip, &c).is_empty());
    }

    #[test]
    fn unknown_office_is_empty() {
        let managers = pool();
        let c = classification(Intent::Consultation, Language::Ru);
        assert!(filter_candidates(&managers, "Шымкент", SegmentBucket::Mass, &c).is_empty());
    }
}
