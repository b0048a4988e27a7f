//! Distribution engine: assigns a batch of tickets to managers.
//!
//! Per ticket, strictly in input order:
//! 1. Classify the text
//! 2. Resolve the office
//! 3. Filter candidates
//! 4. Escalate empty VIP sets to the capital offices
//! 5. Fall back to the unfiltered office pool (if enabled)
//! 6. Select a manager and charge their load, or record "unassigned"
//!
//! Manager load and round-robin counters are the only state shared across
//! tickets. Both are owned here and reset at the start of every run, so a
//! run never depends on a previous one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::config::DistributionConfig;
use crate::routing::escalation::{escalate, should_escalate};
use crate::routing::filter::{filter_candidates, office_pool};
use crate::routing::office::OfficeResolver;
use crate::routing::selector::{BucketKey, RoundRobinState, select};
use crate::routing::types::{
    Assignee, AssignmentResult, AssignmentRule, BusinessUnit, Manager, ResolvedOffice, Ticket,
};

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One entry per input ticket, in input order.
    pub results: Vec<AssignmentResult>,
    pub assigned: usize,
    /// Results with rule `unassigned`, escalated ones included.
    pub unassigned: usize,
    /// Tickets sent to the capital pool, whether or not a VIP manager was
    /// found there. Counts the office marker, not the `escalated` rule.
    pub escalated: usize,
    pub fallback: usize,
}

impl DistributionReport {
    fn new(run_id: Uuid, started_at: DateTime<Utc>, results: Vec<AssignmentResult>) -> Self {
        let count = |rule: AssignmentRule| results.iter().filter(|r| r.rule == rule).count();
        let assigned = results.iter().filter(|r| r.is_assigned()).count();
        let escalated = results.iter().filter(|r| r.office.is_escalation()).count();
        let fallback = count(AssignmentRule::Fallback);
        let unassigned = count(AssignmentRule::Unassigned);

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            results,
            assigned,
            unassigned,
            escalated,
            fallback,
        }
    }
}

/// Owns the manager pool and all run-scoped routing state.
pub struct DistributionEngine {
    managers: Vec<Manager>,
    initial_loads: Vec<u32>,
    resolver: OfficeResolver,
    round_robin: RoundRobinState,
    classifier: Arc<dyn Classifier>,
    config: DistributionConfig,
}

impl DistributionEngine {
    pub fn new(
        managers: Vec<Manager>,
        units: &[BusinessUnit],
        classifier: Arc<dyn Classifier>,
        config: DistributionConfig,
    ) -> Self {
        let initial_loads = managers.iter().map(|m| m.load).collect();
        Self {
            managers,
            initial_loads,
            resolver: OfficeResolver::new(units),
            round_robin: RoundRobinState::new(),
            classifier,
            config,
        }
    }

    /// Manager pool with loads as of the end of the last run.
    pub fn managers(&self) -> &[Manager] {
        &self.managers
    }

    /// Put loads, counters and the foreign-location alternation back to
    /// their initial state.
    fn reset(&mut self) {
        for (manager, &load) in self.managers.iter_mut().zip(&self.initial_loads) {
            manager.load = load;
        }
        self.round_robin.reset();
        self.resolver.reset();
    }

    /// Distribute `tickets`, returning exactly one result per ticket.
    pub async fn distribute(&mut self, tickets: &[Ticket]) -> DistributionReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("distribution_run", run_id = %run_id);
        self.run(run_id, tickets).instrument(span).await
    }

    async fn run(&mut self, run_id: Uuid, tickets: &[Ticket]) -> DistributionReport {
        let started_at = Utc::now();
        self.reset();

        info!(
            tickets = tickets.len(),
            managers = self.managers.len(),
            classifier = self.classifier.name(),
            fallback = self.config.enable_fallback,
            "Starting distribution run"
        );

        let mut results = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            results.push(self.assign(ticket).await);
        }

        let report = DistributionReport::new(run_id, started_at, results);
        info!(
            assigned = report.assigned,
            unassigned = report.unassigned,
            escalated = report.escalated,
            fallback = report.fallback,
            "Distribution run complete"
        );
        report
    }

    /// Route a single ticket. Classification is the only await point; the
    /// rest runs without yielding.
    async fn assign(&mut self, ticket: &Ticket) -> AssignmentResult {
        let classification = self.classifier.classify(&ticket.description).await;
        let bucket = ticket.bucket();

        let office_name = self.resolver.resolve(&ticket.country, &ticket.city);
        let mut office = ResolvedOffice::Unit(office_name.clone());
        let mut rule = AssignmentRule::Direct;

        let mut candidates =
            filter_candidates(&self.managers, &office_name, bucket, &classification);

        if should_escalate(bucket, &candidates) {
            candidates = escalate(&self.managers, self.resolver.capitals());
            office = ResolvedOffice::CapitalEscalation;
            rule = AssignmentRule::Escalated;
        }

        if candidates.is_empty() && self.config.enable_fallback {
            // Uses the effective office, which after escalation is the
            // marker and matches nobody.
            candidates = office_pool(&self.managers, office.as_str());
            rule = AssignmentRule::Fallback;
        }

        let key = BucketKey {
            office: office.clone(),
            segment: bucket,
            intent: classification.intent,
            language: classification.language,
        };
        let manager = select(&mut self.managers, &candidates, &key, &mut self.round_robin);
        if manager == Assignee::Unassigned {
            rule = AssignmentRule::Unassigned;
        }

        debug!(
            guid = %ticket.guid,
            segment = %bucket,
            intent = %classification.intent,
            language = %classification.language,
            office = %office,
            manager = %manager,
            rule = rule.label(),
            "Ticket routed"
        );

        AssignmentResult::new(ticket, classification, office, manager, rule)
    }
}
