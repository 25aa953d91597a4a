//! Compat Core - Compatibility Aggregation Engine
//!
//! Turns the raw relation edges for one query (several diseases, or a single
//! ingredient) into one deduplicated, ranked answer per relation kind.
//!
//! # Architecture
//!
//! ```text
//! CatalogStore (edges pre-sorted: severity DESC, target name ASC)
//!     ↓
//! EdgeNormalizer (subject / target resolution, integrity checks)
//!     ↓
//! KindAggregation → MergeByTarget (one record per target, first-seen order)
//!     ↓
//! present (ViewFilter + severity DESC / name ASC re-sort)
//!     ↓
//! GuideView<DiseaseFoodRecord | IngredientFoodRecord>
//! ```
//!
//! Everything here is pure and synchronous: no I/O, no shared state.

pub mod error;
pub mod merger;
pub mod normalizer;
pub mod presenter;
pub mod search;
pub mod types;

pub use error::{GuideError, IntegrityError};
pub use merger::{KindAggregation, MergeByTarget};
pub use normalizer::{resolve_other, EdgeNormalizer, QueryScope};
pub use presenter::{
    compare_names, present, DiseaseFoodRecord, GuideView, IngredientFoodRecord, SourceView, ViewFilter,
};
pub use search::{match_ingredients, SearchHit, MAX_SEARCH_RESULTS};
pub use types::{
    AggregatedRecord, Disease, DiseaseRef, DiseaseType, Endpoints, Ingredient, IngredientRef,
    NormalizedEdge, RawEdge, RelationKind, Source,
};

/// Normalize, merge and present one query's edges
pub fn aggregate<T: From<AggregatedRecord>>(
    scope: QueryScope,
    edges: Vec<RawEdge>,
    filter: ViewFilter,
) -> Result<GuideView<T>, IntegrityError> {
    let normalizer = EdgeNormalizer::new(scope);
    let normalized = normalizer.normalize_all(edges)?;
    let aggregation = KindAggregation::from_edges(normalized);

    log::debug!(
        "Aggregated {} avoid / {} beneficial targets (filter={})",
        aggregation.avoid.len(),
        aggregation.beneficial.len(),
        filter.as_str()
    );

    Ok(present(aggregation, filter))
}
