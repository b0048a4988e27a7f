//! Ticket-to-manager distribution.
//!
//! Every ticket flows through:
//! 1. `OfficeResolver::resolve()`: location to business unit
//! 2. `filter_candidates()`: office, segment, data-change and language gates
//! 3. `escalate()`: VIP tickets with no local candidate go to the capitals
//! 4. `select()`: least-loaded pair, per-bucket round robin, load bump
//!
//! `DistributionEngine` runs the batch and owns all mutable state.

pub mod engine;
pub mod escalation;
pub mod filter;
pub mod office;
pub mod selector;
pub mod types;

pub use engine::{DistributionEngine, DistributionReport};
pub use types::{
    Assignee, AssignmentResult, AssignmentRule, BusinessUnit, ESCALATION_MARKER, Manager,
    ResolvedOffice, SegmentBucket, Ticket, UNASSIGNED,
};
