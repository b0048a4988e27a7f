//! Dataset ingestion and result output.
//!
//! Loading is all-or-nothing: a missing canonical column in any dataset
//! fails the whole load before a single ticket is routed.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{read_managers, read_tickets, read_units};
pub use schema::{CanonicalField, HeaderMap};
pub use writer::{write_results, write_results_to_path};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{info, warn};

use crate::error::IngestError;
use crate::routing::types::{BusinessUnit, Manager, Ticket};

/// The three inputs of a distribution run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub tickets: Vec<Ticket>,
    pub managers: Vec<Manager>,
    pub units: Vec<BusinessUnit>,
}

impl Dataset {
    /// Load all three CSV files.
    pub fn load(
        tickets_path: &Path,
        managers_path: &Path,
        units_path: &Path,
    ) -> Result<Self, IngestError> {
        let units = read_units(BufReader::new(File::open(units_path)?))?;
        let managers = read_managers(BufReader::new(File::open(managers_path)?))?;
        let tickets = read_tickets(BufReader::new(File::open(tickets_path)?))?;

        info!(
            tickets = tickets.len(),
            managers = managers.len(),
            units = units.len(),
            "Dataset loaded"
        );

        let dataset = Self {
            tickets,
            managers,
            units,
        };
        dataset.warn_unknown_offices();
        Ok(dataset)
    }

    /// Managers whose office is not a known business unit can never be
    /// reached through city matching.
    fn warn_unknown_offices(&self) {
        for manager in &self.managers {
            if !self.units.iter().any(|u| u.office == manager.office) {
                warn!(
                    manager = %manager.name,
                    office = %manager.office,
                    "Manager office is not a known business unit"
                );
            }
        }
    }
}
