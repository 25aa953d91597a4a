//! Failure taxonomy for guide queries

use crate::store::StoreError;

/// Stored relationships contradict themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// Neither side of a symmetric edge is the queried ingredient
    SubjectNotOnEdge {
        subject_id: i64,
        a_id: i64,
        b_id: i64,
    },
    /// A disease edge showed up for a disease outside the query
    UnexpectedDisease { disease_id: i64, disease: String },
    /// Edge shape does not belong to this kind of query
    ShapeMismatch(&'static str),
    InvalidRelationKind(String),
    InvalidDiseaseType(String),
    SeverityOutOfRange(i64),
}

impl std::fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityError::SubjectNotOnEdge { subject_id, a_id, b_id } => write!(
                f,
                "Ingredient {} is on neither side of edge ({}, {})",
                subject_id, a_id, b_id
            ),
            IntegrityError::UnexpectedDisease { disease_id, disease } => write!(
                f,
                "Edge for disease '{}' (id={}) is outside the query",
                disease, disease_id
            ),
            IntegrityError::ShapeMismatch(msg) => write!(f, "Edge shape mismatch: {}", msg),
            IntegrityError::InvalidRelationKind(k) => write!(f, "Invalid relation kind: {}", k),
            IntegrityError::InvalidDiseaseType(t) => write!(f, "Invalid disease type: {}", t),
            IntegrityError::SeverityOutOfRange(s) => write!(f, "Severity out of range: {}", s),
        }
    }
}

impl std::error::Error for IntegrityError {}

/// Everything a guide query can fail with
#[derive(Debug)]
pub enum GuideError {
    /// Missing or malformed caller input; `field` names the offender
    Validation { field: &'static str, message: String },
    /// None of the requested diseases exist
    DiseasesNotFound { requested: Vec<String> },
    IngredientNotFound { name: String },
    Integrity(IntegrityError),
    Storage(StoreError),
}

impl GuideError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        GuideError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<IntegrityError> for GuideError {
    fn from(err: IntegrityError) -> Self {
        GuideError::Integrity(err)
    }
}

impl From<StoreError> for GuideError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity(e) => GuideError::Integrity(e),
            other => GuideError::Storage(other),
        }
    }
}

impl std::fmt::Display for GuideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuideError::Validation { field, message } => {
                write!(f, "Invalid '{}': {}", field, message)
            }
            GuideError::DiseasesNotFound { requested } => write!(
                f,
                "None of the specified diseases exist in our database: {:?}",
                requested
            ),
            GuideError::IngredientNotFound { name } => {
                write!(f, "Ingredient \"{}\" does not exist in our database", name)
            }
            GuideError::Integrity(e) => write!(f, "Data integrity error: {}", e),
            GuideError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for GuideError {}
