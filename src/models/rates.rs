use serde::{Deserialize, Serialize};

/// Selects the pricing formula and the required-field set for a category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CategoryKind {
    #[serde(rename = "area")]
    Area,
    #[serde(rename = "distance-transport")]
    DistanceTransport,
    #[serde(rename = "distance-custom")]
    DistanceCustom,
}

impl CategoryKind {
    pub fn is_distance(&self) -> bool {
        matches!(
            self,
            CategoryKind::DistanceTransport | CategoryKind::DistanceCustom
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateEntry {
    pub name: String,
    pub rate: f64,
    #[serde(default = "default_kind")]
    pub kind: CategoryKind,
}

fn default_kind() -> CategoryKind {
    CategoryKind::Area
}

#[derive(Debug, Clone)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    pub fn new(entries: Vec<RateEntry>) -> Self {
        Self { entries }
    }

    /// Parses the configured category list. Entries without an explicit kind
    /// get it inferred from the name, matching the legacy config shape where
    /// only `{name, rate}` pairs were stored.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default_table());
        }
        let mut entries: Vec<RateEntry> = serde_json::from_str(json)?;
        for entry in &mut entries {
            if entry.kind == CategoryKind::Area {
                entry.kind = infer_kind(&entry.name);
            }
        }
        Ok(Self { entries })
    }

    pub fn default_table() -> Self {
        let entry = |name: &str, rate: f64, kind: CategoryKind| RateEntry {
            name: name.to_string(),
            rate,
            kind,
        };
        Self {
            entries: vec![
                entry("Ploughing", 1500.0, CategoryKind::Area),
                entry("Rotavator", 1400.0, CategoryKind::Area),
                entry("Sowing", 900.0, CategoryKind::Area),
                entry("Harvesting", 2000.0, CategoryKind::Area),
                entry("Transport", 14.0, CategoryKind::DistanceTransport),
                entry("Customize", 14.0, CategoryKind::DistanceCustom),
            ],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&RateEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }
}

fn infer_kind(name: &str) -> CategoryKind {
    match name {
        "Transport" => CategoryKind::DistanceTransport,
        "Customize" => CategoryKind::DistanceCustom,
        _ => CategoryKind::Area,
    }
}
