//! Catalog entities and relation edges as the engine sees them

use serde::{Deserialize, Serialize};

/// Lowest severity a relation may carry (mild)
pub const MIN_SEVERITY: u8 = 1;
/// Highest severity a relation may carry (severe / strong)
pub const MAX_SEVERITY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(skip)]
    pub id: i64,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseType {
    Chronic,
    Acute,
}

impl DiseaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseType::Chronic => "chronic",
            DiseaseType::Acute => "acute",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "chronic" => Some(DiseaseType::Chronic),
            "acute" => Some(DiseaseType::Acute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    #[serde(skip)]
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub disease_type: DiseaseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    #[serde(rename = "AVOID")]
    Avoid,
    #[serde(rename = "BENEFICIAL")]
    Beneficial,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Avoid => "AVOID",
            RelationKind::Beneficial => "BENEFICIAL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVOID" => Some(RelationKind::Avoid),
            "BENEFICIAL" => Some(RelationKind::Beneficial),
            _ => None,
        }
    }

    pub fn all() -> [RelationKind; 2] {
        [RelationKind::Avoid, RelationKind::Beneficial]
    }
}

/// Citation attached to exactly one edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    pub url: Option<String>,
}

impl Source {
    pub fn new(label: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            label: label.into(),
            url: url.map(str::to_string),
        }
    }
}

/// Minimal reference to a stored disease, as hydrated onto an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseRef {
    pub id: i64,
    pub name: String,
}

/// Minimal reference to a stored ingredient, as hydrated onto an edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRef {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// The two stored edge shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoints {
    /// Disease → ingredient; the ingredient is always the target
    DiseaseIngredient {
        disease: DiseaseRef,
        ingredient: IngredientRef,
    },
    /// Ingredient ↔ ingredient; either side may be the query subject
    Symmetric { a: IngredientRef, b: IngredientRef },
}

/// A relation edge exactly as storage hands it over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub endpoints: Endpoints,
    pub kind: RelationKind,
    pub severity: u8,
    pub reason: String,
    pub sources: Vec<Source>,
}

/// Edge with the subject/target sides resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEdge {
    pub subject_label: String,
    pub target: IngredientRef,
    pub kind: RelationKind,
    pub severity: u8,
    pub reason: String,
    pub sources: Vec<Source>,
}

/// One merged entry per distinct target ingredient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRecord {
    pub food: String,
    pub reason: String,
    pub severity: u8,
    pub contributing_subjects: Vec<String>,
    pub sources: Vec<Source>,
}
