//! CSV readers for the three input datasets.

use std::io::Read;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::ingest::schema::{
    CanonicalField, HeaderMap, MANAGER_FIELDS, TICKET_FIELDS, UNIT_FIELDS,
};
use crate::routing::types::{BusinessUnit, Manager, Ticket};

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input)
}

/// Read tickets in file order.
pub fn read_tickets<R: Read>(input: R) -> Result<Vec<Ticket>, IngestError> {
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let map = HeaderMap::resolve("tickets", &headers, TICKET_FIELDS, &[])?;

    let mut tickets = Vec::new();
    for record in reader.records() {
        let record = record?;
        tickets.push(Ticket::new(
            map.get(&record, CanonicalField::Guid),
            map.get(&record, CanonicalField::Description),
            map.get(&record, CanonicalField::Segment),
            map.get(&record, CanonicalField::Country),
            map.get(&record, CanonicalField::City),
        ));
    }

    debug!(count = tickets.len(), "Loaded tickets");
    Ok(tickets)
}

/// Read managers. Malformed load values become 0.
pub fn read_managers<R: Read>(input: R) -> Result<Vec<Manager>, IngestError> {
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let map = HeaderMap::resolve("managers", &headers, MANAGER_FIELDS, &[])?;

    let mut managers = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let name = map.get(&record, CanonicalField::Name);
        let raw_load = map.get(&record, CanonicalField::Load);
        let load = coerce_load(raw_load).unwrap_or_else(|| {
            warn!(row = idx + 1, manager = name, value = raw_load, "Malformed load, using 0");
            0
        });

        managers.push(Manager::new(
            name,
            map.get(&record, CanonicalField::Position),
            map.get(&record, CanonicalField::Skills),
            map.get(&record, CanonicalField::Office),
            load,
        ));
    }

    debug!(count = managers.len(), "Loaded managers");
    Ok(managers)
}

/// Read business units in file order (the order city matching uses).
pub fn read_units<R: Read>(input: R) -> Result<Vec<BusinessUnit>, IngestError> {
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let map = HeaderMap::resolve("business_units", &headers, UNIT_FIELDS, &[
        CanonicalField::Address,
    ])?;

    let mut units = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let office = map.get(&record, CanonicalField::Office);
        if office.is_empty() {
            warn!(row = idx + 1, "Business unit without an office name, skipping");
            continue;
        }
        if units.iter().any(|u: &BusinessUnit| u.office == office) {
            warn!(office, "Duplicate business unit, keeping the first");
            continue;
        }
        units.push(
            BusinessUnit::new(office).with_address(map.get(&record, CanonicalField::Address)),
        );
    }

    debug!(count = units.len(), "Loaded business units");
    Ok(units)
}

/// Parse a load cell. Empty, negative or non-numeric → `None`.
///
/// Spreadsheet exports often write integers as `3.0`, so floats are
/// accepted and truncated.
fn coerce_load(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}
