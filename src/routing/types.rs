//! Shared types for the distribution engine.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::classify::{Classification, Intent, Language, Sentiment};

/// Office value used when a VIP ticket is redirected to the capital offices.
pub const ESCALATION_MARKER: &str = "CAPITAL_ESCALATION";

/// Manager value recorded when no candidate could be found.
pub const UNASSIGNED: &str = "UNASSIGNED";

// ── Segment bucket ──────────────────────────────────────────────────

/// Customer priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentBucket {
    Vip,
    Priority,
    Mass,
}

impl SegmentBucket {
    /// Bucket a raw segment string. Anything unrecognized is mass.
    pub fn from_raw(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        if upper.contains("VIP") {
            Self::Vip
        } else if upper.contains("PRIORITY") {
            Self::Priority
        } else {
            Self::Mass
        }
    }

    /// VIP and PRIORITY tickets both need a VIP-skilled manager.
    pub fn requires_vip_skill(self) -> bool {
        matches!(self, Self::Vip | Self::Priority)
    }

    /// Lowest priority reported for tickets in this bucket.
    pub fn priority_floor(self) -> u8 {
        match self {
            Self::Vip => 10,
            Self::Priority => 8,
            Self::Mass => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Priority => "PRIORITY",
            Self::Mass => "MASS",
        }
    }
}

impl fmt::Display for SegmentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Inputs ──────────────────────────────────────────────────────────

/// An incoming customer ticket in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub guid: String,
    pub description: String,
    /// Raw segment value as ingested.
    pub segment: String,
    pub country: String,
    pub city: String,
}

impl Ticket {
    pub fn new(
        guid: impl Into<String>,
        description: impl Into<String>,
        segment: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            guid: guid.into(),
            description: description.into(),
            segment: segment.into(),
            country: country.into(),
            city: city.into(),
        }
    }

    pub fn bucket(&self) -> SegmentBucket {
        SegmentBucket::from_raw(&self.segment)
    }
}

/// A human manager who can take tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub name: String,
    pub position: String,
    /// Lowercased position with seniority/specialist wording collapsed.
    pub position_norm: String,
    /// Uppercase, non-empty, deduplicated tags such as `VIP`, `ENG`, `KZ`.
    pub skills: BTreeSet<String>,
    pub office: String,
    /// Tickets currently in work. Only ever grows during a run.
    pub load: u32,
}

impl Manager {
    /// Build a manager, normalizing name, office, position and skills.
    pub fn new(
        name: &str,
        position: &str,
        skills: &str,
        office: &str,
        load: u32,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            position: position.trim().to_string(),
            position_norm: normalize_position(position),
            skills: parse_skills(skills),
            office: office.trim().to_string(),
            load,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }
}

/// A business unit (office) that managers belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessUnit {
    pub office: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl BusinessUnit {
    pub fn new(office: &str) -> Self {
        Self {
            office: office.trim().to_string(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        if !address.trim().is_empty() {
            self.address = Some(address.trim().to_string());
        }
        self
    }
}

/// Lowercase, `ё`→`е`, drop dots, collapse "специалист" to "спец".
pub fn normalize_position(raw: &str) -> String {
    raw.to_lowercase()
        .replace('ё', "е")
        .replace('.', "")
        .replace("специалист", "спец")
        .trim()
        .to_string()
}

/// Split a `,`/`;` separated skill list into uppercase tags.
pub fn parse_skills(raw: &str) -> BTreeSet<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return BTreeSet::new();
    }
    trimmed
        .replace(';', ",")
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// ── Outputs ─────────────────────────────────────────────────────────

/// Office a ticket ended up routed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolvedOffice {
    /// A real business unit.
    Unit(String),
    /// VIP redirect to the capital offices.
    CapitalEscalation,
}

impl ResolvedOffice {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unit(name) => name,
            Self::CapitalEscalation => ESCALATION_MARKER,
        }
    }

    pub fn is_escalation(&self) -> bool {
        matches!(self, Self::CapitalEscalation)
    }
}

impl fmt::Display for ResolvedOffice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResolvedOffice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Who got the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
    Manager(String),
    Unassigned,
}

impl Assignee {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manager(name) => name,
            Self::Unassigned => UNASSIGNED,
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Assignee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which path through the engine produced the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRule {
    /// Local candidate after all gates.
    Direct,
    /// VIP redirect to a capital-office manager.
    Escalated,
    /// Unfiltered local pool (fallback mode).
    Fallback,
    /// Nobody eligible.
    Unassigned,
}

impl AssignmentRule {
    pub fn label(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Escalated => "escalated",
            Self::Fallback => "fallback",
            Self::Unassigned => "unassigned",
        }
    }
}

/// Outcome for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentResult {
    pub guid: String,
    pub segment: SegmentBucket,
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub language: Language,
    /// Classifier priority raised to the segment's floor.
    pub priority: u8,
    pub office: ResolvedOffice,
    pub manager: Assignee,
    pub rule: AssignmentRule,
    pub summary: String,
    pub recommendation: String,
}

impl AssignmentResult {
    pub fn new(
        ticket: &Ticket,
        classification: Classification,
        office: ResolvedOffice,
        manager: Assignee,
        rule: AssignmentRule,
    ) -> Self {
        let segment = ticket.bucket();
        Self {
            guid: ticket.guid.clone(),
            segment,
            intent: classification.intent,
            sentiment: classification.sentiment,
            language: classification.language,
            priority: classification.priority.max(segment.priority_floor()),
            office,
            manager,
            rule,
            summary: classification.summary,
            recommendation: classification.recommendation,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self.manager, Assignee::Manager(_))
    }
}
