//! Read interface the guide service queries through

use super::StoreError;
use crate::compat_core::{Disease, Ingredient, RawEdge, RelationKind};
use async_trait::async_trait;

/// Catalog reads needed to answer guide queries
///
/// Edge lists come back ordered severity DESC, then target ingredient name
/// ASC; the merge step relies on that order for first-seen bookkeeping.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Diseases whose name is exactly one of `names`, ordered by name
    async fn find_diseases(&self, names: &[String]) -> Result<Vec<Disease>, StoreError>;

    /// Every disease, ordered by name
    async fn list_diseases(&self) -> Result<Vec<Disease>, StoreError>;

    async fn find_ingredient(&self, name: &str) -> Result<Option<Ingredient>, StoreError>;

    /// Disease → ingredient edges of one kind for the given diseases, sources hydrated
    async fn disease_edges(
        &self,
        disease_ids: &[i64],
        kind: RelationKind,
    ) -> Result<Vec<RawEdge>, StoreError>;

    /// Ingredient ↔ ingredient edges of one kind with `ingredient_id` on either side
    ///
    /// Ordered by severity DESC, then the name of the other ingredient.
    async fn ingredient_edges(
        &self,
        ingredient_id: i64,
        kind: RelationKind,
    ) -> Result<Vec<RawEdge>, StoreError>;

    /// Candidate ingredients whose name may contain `fragment`
    ///
    /// May over-match; the search matcher makes the final cut.
    async fn ingredients_matching(&self, fragment: &str) -> Result<Vec<Ingredient>, StoreError>;

    /// Cheap round trip to confirm the catalog is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend type for logging
    fn backend_type(&self) -> &'static str;
}
