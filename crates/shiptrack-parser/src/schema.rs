use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    VesselId,
    Lat,
    Lon,
    Timestamp,
    Speed,
    Heading,
    Category,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::VesselId,
        CanonicalField::Lat,
        CanonicalField::Lon,
        CanonicalField::Timestamp,
        CanonicalField::Speed,
        CanonicalField::Heading,
        CanonicalField::Category,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalField::VesselId => "vessel_id",
            CanonicalField::Lat => "lat",
            CanonicalField::Lon => "lon",
            CanonicalField::Timestamp => "timestamp",
            CanonicalField::Speed => "speed_knots",
            CanonicalField::Heading => "heading_deg",
            CanonicalField::Category => "category",
        }
    }

    fn default_aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::VesselId => &[
                "mmsi",
                "imo",
                "ship_id",
                "vessel_id",
                "vessel",
                "id",
                "callsign",
                "vessel_name",
            ],
            CanonicalField::Lat => &["lat", "latitude"],
            CanonicalField::Lon => &["lon", "lng", "longitude", "long"],
            CanonicalField::Timestamp => &[
                "timestamp",
                "time",
                "datetime",
                "date",
                "utc_time",
                "ts",
                "basedatetime",
            ],
            CanonicalField::Speed => &["sog", "speed", "speed_knots", "speed_over_ground"],
            CanonicalField::Heading => &["heading", "hdg", "cog", "course"],
            CanonicalField::Category => &[
                "ship_type",
                "shiptype",
                "vessel_type",
                "vesseltype",
                "type",
                "category",
            ],
        }
    }
}

/// Per-field alias overrides as they appear in the `[schema]` section of the
/// config file. An absent field keeps its default alias list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaOverrides {
    pub vessel_id: Option<Vec<String>>,
    pub lat: Option<Vec<String>>,
    pub lon: Option<Vec<String>>,
    pub timestamp: Option<Vec<String>>,
    pub speed: Option<Vec<String>>,
    pub heading: Option<Vec<String>>,
    pub category: Option<Vec<String>>,
}

impl SchemaOverrides {
    fn get(&self, field: CanonicalField) -> Option<&Vec<String>> {
        match field {
            CanonicalField::VesselId => self.vessel_id.as_ref(),
            CanonicalField::Lat => self.lat.as_ref(),
            CanonicalField::Lon => self.lon.as_ref(),
            CanonicalField::Timestamp => self.timestamp.as_ref(),
            CanonicalField::Speed => self.speed.as_ref(),
            CanonicalField::Heading => self.heading.as_ref(),
            CanonicalField::Category => self.category.as_ref(),
        }
    }
}

/// Ordered alias lists per canonical field, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<CanonicalField, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        DEFAULT_ALIASES.clone()
    }
}

impl AliasTable {
    pub fn with_overrides(overrides: &SchemaOverrides) -> Self {
        let mut aliases = HashMap::new();
        for field in CanonicalField::ALL {
            let list = match overrides.get(field) {
                Some(custom) => custom.iter().map(|a| a.to_ascii_lowercase()).collect(),
                None => field
                    .default_aliases()
                    .iter()
                    .map(|a| a.to_string())
                    .collect(),
            };
            aliases.insert(field, list);
        }
        Self { aliases }
    }

    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.aliases
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn matches(&self, field: CanonicalField, header: &str) -> bool {
        let lower = header.trim().to_ascii_lowercase();
        self.aliases(field).iter().any(|alias| *alias == lower)
    }
}

/// Shared default table; `AliasTable::default()` clones it.
pub static DEFAULT_ALIASES: Lazy<AliasTable> =
    Lazy::new(|| AliasTable::with_overrides(&SchemaOverrides::default()));
