use csv::StringRecord;

use crate::schema::{AliasTable, CanonicalField};

/// Indices into a source's columns for each canonical field.
///
/// `lat`/`lon` are mandatory for a usable source. A missing `vessel_id`
/// column means the caller substitutes the source file name; a missing
/// `timestamp` column means every row is dropped at coercion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub vessel_id: Option<usize>,
    pub lat: usize,
    pub lon: usize,
    pub timestamp: Option<usize>,
    pub speed: Option<usize>,
    pub heading: Option<usize>,
    pub category: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Usable(ColumnMap),
    Unusable { reason: String },
}

fn find_column(headers: &StringRecord, table: &AliasTable, field: CanonicalField) -> Option<usize> {
    headers
        .iter()
        .position(|header| table.matches(field, header))
}

/// Map a header row to canonical field indices.
///
/// Pure and idempotent: the same header set always resolves to the same
/// mapping. For each field the first matching column in file order wins.
pub fn resolve_columns(headers: &StringRecord, table: &AliasTable) -> Resolution {
    let lat = find_column(headers, table, CanonicalField::Lat);
    let lon = find_column(headers, table, CanonicalField::Lon);

    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        (None, _) => {
            return Resolution::Unusable {
                reason: "no latitude-like column found".to_string(),
            }
        }
        (_, None) => {
            return Resolution::Unusable {
                reason: "no longitude-like column found".to_string(),
            }
        }
    };

    Resolution::Usable(ColumnMap {
        vessel_id: find_column(headers, table, CanonicalField::VesselId),
        lat,
        lon,
        timestamp: find_column(headers, table, CanonicalField::Timestamp),
        speed: find_column(headers, table, CanonicalField::Speed),
        heading: find_column(headers, table, CanonicalField::Heading),
        category: find_column(headers, table, CanonicalField::Category),
    })
}
