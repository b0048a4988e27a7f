//! Ticket location → business unit.
//!
//! Resolution order:
//! 1. City match against each unit name (minus the "офис" qualifier),
//!    substring containment in either direction, first unit in load order wins
//! 2. No domestic country token → foreign, alternate between the two
//!    capital offices
//! 3. Domestic but unmatched → Astana office
//!
//! Containment can over-match on nested names (a region name containing a
//! city root); kept as is.

use regex::Regex;
use tracing::{debug, warn};

use crate::routing::types::BusinessUnit;

/// Country tokens treated as domestic after normalization.
const DOMESTIC_TOKENS: [&str; 3] = ["казахстан", "kazakhstan", "kz"];

/// The two designated capital offices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalOffices {
    pub astana: String,
    pub almaty: String,
}

impl CapitalOffices {
    /// Find the capital offices among `units` by normalized substring.
    ///
    /// When no unit matches, the bare city name is used and a warning is
    /// logged: tickets routed there match no manager.
    pub fn from_units(units: &[BusinessUnit]) -> Self {
        Self {
            astana: find_canonical(units, "астан").unwrap_or_else(|| missing_capital("Астана")),
            almaty: find_canonical(units, "алмат").unwrap_or_else(|| missing_capital("Алматы")),
        }
    }

    pub fn contains(&self, office: &str) -> bool {
        office == self.astana || office == self.almaty
    }
}

fn missing_capital(city: &str) -> String {
    warn!(city, "No business unit for capital office, using the bare city name");
    city.to_string()
}

fn find_canonical(units: &[BusinessUnit], pattern: &str) -> Option<String> {
    units
        .iter()
        .find(|u| u.office.to_lowercase().contains(pattern))
        .map(|u| u.office.clone())
}

/// Maps ticket location to a canonical office.
pub struct OfficeResolver {
    /// `(office name, lowercase city root)` in load order.
    roots: Vec<(String, String)>,
    capitals: CapitalOffices,
    non_letters: Regex,
    /// Foreign-location alternation counter. Independent of the selector.
    foreign_counter: usize,
}

impl OfficeResolver {
    pub fn new(units: &[BusinessUnit]) -> Self {
        let roots = units
            .iter()
            .map(|u| {
                let root = u.office.to_lowercase().replace("офис", "").trim().to_string();
                (u.office.clone(), root)
            })
            .collect();

        Self {
            roots,
            capitals: CapitalOffices::from_units(units),
            non_letters: Regex::new(r"[^a-zа-я]+").unwrap(),
            foreign_counter: 0,
        }
    }

    pub fn capitals(&self) -> &CapitalOffices {
        &self.capitals
    }

    /// Restart the foreign-location alternation.
    pub fn reset(&mut self) {
        self.foreign_counter = 0;
    }

    /// Resolve a ticket's country/city to an office name.
    pub fn resolve(&mut self, country: &str, city: &str) -> String {
        let city = city.trim().to_lowercase();

        if !city.is_empty() {
            let matched = self.roots.iter().find(|(_, root)| {
                !root.is_empty() && (city.contains(root.as_str()) || root.contains(city.as_str()))
            });
            if let Some((office, _)) = matched {
                debug!(city = %city, office = %office, "Resolved office by city");
                return office.clone();
            }
        }

        let country_norm = self
            .non_letters
            .replace_all(&country.to_lowercase(), "")
            .into_owned();

        if !DOMESTIC_TOKENS.iter().any(|t| country_norm.contains(t)) {
            let office = if self.foreign_counter % 2 == 0 {
                self.capitals.astana.clone()
            } else {
                self.capitals.almaty.clone()
            };
            self.foreign_counter += 1;
            debug!(country = %country, office = %office, "Foreign location, alternating capitals");
            return office;
        }

        debug!(city = %city, "Domestic city unmatched, defaulting to Astana");
        self.capitals.astana.clone()
    }
}
