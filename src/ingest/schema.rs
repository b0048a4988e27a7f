//! Canonical field names and the header alias table.
//!
//! Spreadsheet exports name the same column in several ways
//! ("ФИО", "Менеджер", "name"). Headers are resolved once per dataset;
//! nothing downstream looks at raw header text.

use std::collections::HashMap;
use std::fmt;

use csv::StringRecord;

use crate::error::IngestError;

/// Every field the router reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Guid,
    Description,
    Segment,
    Country,
    City,
    Name,
    Position,
    Skills,
    Load,
    Office,
    Address,
}

impl CanonicalField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Guid => "guid",
            Self::Description => "description",
            Self::Segment => "segment",
            Self::Country => "country",
            Self::City => "city",
            Self::Name => "name",
            Self::Position => "position",
            Self::Skills => "skills",
            Self::Load => "load",
            Self::Office => "office",
            Self::Address => "address",
        }
    }

    /// Accepted (normalized) header spellings, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Guid => &["guid клиента", "guid", "client_guid", "id"],
            Self::Description => &["описание", "текст обращения", "description"],
            Self::Segment => &["сегмент клиента", "сегмент", "segment"],
            Self::Country => &["страна", "country"],
            Self::City => &["населенный пункт", "город", "city"],
            Self::Name => &["фио", "менеджер", "name"],
            Self::Position => &["должность", "позиция", "position"],
            Self::Skills => &["навыки", "skills"],
            Self::Load => &[
                "количество обращений в работе",
                "кол-во обращений в работе",
                "нагрузка",
                "load",
            ],
            Self::Office => &["офис", "бизнес-единица", "unit", "business_unit"],
            Self::Address => &["адрес", "address"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const TICKET_FIELDS: &[CanonicalField] = &[
    CanonicalField::Guid,
    CanonicalField::Description,
    CanonicalField::Segment,
    CanonicalField::Country,
    CanonicalField::City,
];

pub const MANAGER_FIELDS: &[CanonicalField] = &[
    CanonicalField::Name,
    CanonicalField::Position,
    CanonicalField::Skills,
    CanonicalField::Load,
    CanonicalField::Office,
];

pub const UNIT_FIELDS: &[CanonicalField] = &[CanonicalField::Office];

/// Trim, strip BOM, lowercase, `ё`→`е`, NBSP→space.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .replace('\u{a0}', " ")
        .trim()
        .to_lowercase()
        .replace('ё', "е")
}

/// Column positions of the canonical fields present in a header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    columns: HashMap<CanonicalField, usize>,
}

impl HeaderMap {
    /// Resolve `headers`, failing if any of `required` is absent.
    ///
    /// `optional` fields are mapped when present and ignored otherwise.
    pub fn resolve(
        dataset: &str,
        headers: &StringRecord,
        required: &[CanonicalField],
        optional: &[CanonicalField],
    ) -> Result<Self, IngestError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut columns = HashMap::new();
        for &field in required.iter().chain(optional) {
            let position = field
                .aliases()
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if let Some(idx) = position {
                columns.insert(field, idx);
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|f| !columns.contains_key(*f))
            .map(|f| f.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                dataset: dataset.to_string(),
                missing,
            });
        }

        Ok(Self { columns })
    }

    /// Trimmed value of `field` in `record`; empty when the column or cell
    /// is absent.
    pub fn get<'r>(&self, record: &'r StringRecord, field: CanonicalField) -> &'r str {
        self.columns
            .get(&field)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}
