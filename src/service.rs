//! Guide queries: input validation, subject resolution, aggregation and response shaping

use crate::compat_core::{
    aggregate, match_ingredients, Disease, DiseaseFoodRecord, GuideError, GuideView,
    IngredientFoodRecord, QueryScope, RawEdge, RelationKind, SearchHit, ViewFilter,
};
use crate::store::{CatalogStore, StoreError};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of a disease guide request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiseaseGuideRequest {
    pub diseases: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_filter")]
    pub filter: Option<String>,
}

/// Any non-string `filter` reads as absent, which presents as `all`
fn lenient_filter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(filter)) => Ok(Some(filter)),
        Some(other) => {
            log::debug!("Ignoring non-string filter {}", other);
            Ok(None)
        }
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiseaseGuideResponse {
    pub diseases: Vec<String>,
    #[serde(flatten)]
    pub view: GuideView<DiseaseFoodRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientCompatibilityResponse {
    pub ingredient: String,
    pub category: String,
    #[serde(flatten)]
    pub view: GuideView<IngredientFoodRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiseaseListResponse {
    pub count: usize,
    pub diseases: Vec<Disease>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
    pub timestamp: String,
}

/// Answers guide queries against an injected catalog
pub struct GuideService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> GuideService<S> {
    pub fn new(store: S) -> Self {
        log::info!("📊 Guide service using {} catalog", store.backend_type());
        Self { store }
    }

    /// Foods to avoid / favour across one or more diseases
    ///
    /// Succeeds as long as at least one requested disease exists; unknown
    /// names are dropped silently.
    pub async fn disease_guide(
        &self,
        request: DiseaseGuideRequest,
    ) -> Result<DiseaseGuideResponse, GuideError> {
        let requested: Vec<String> = match request.diseases {
            Some(diseases) if !diseases.is_empty() => diseases
                .iter()
                .map(|d| d.trim().to_lowercase())
                .collect(),
            _ => {
                return Err(GuideError::validation(
                    "diseases",
                    "Request body must include \"diseases\" array with at least one disease",
                ))
            }
        };
        let filter = ViewFilter::parse(request.filter.as_deref());

        let found = self.store.find_diseases(&requested).await?;
        if found.is_empty() {
            log::info!("🔍 No diseases matched {:?}", requested);
            return Err(GuideError::DiseasesNotFound { requested });
        }

        let disease_ids: Vec<i64> = found.iter().map(|d| d.id).collect();
        let mut edges: Vec<RawEdge> = Vec::new();
        for kind in RelationKind::all() {
            if filter.includes(kind) {
                edges.extend(self.store.disease_edges(&disease_ids, kind).await?);
            }
        }
        let edge_count = edges.len();

        let view: GuideView<DiseaseFoodRecord> =
            aggregate(QueryScope::Diseases(disease_ids), edges, filter)?;

        log::info!(
            "🩺 Disease guide: {} of {} disease(s) resolved, {} edges → avoid={} beneficial={} (filter={})",
            found.len(),
            requested.len(),
            edge_count,
            view.avoid.as_ref().map_or(0, Vec::len),
            view.beneficial.as_ref().map_or(0, Vec::len),
            filter.as_str()
        );

        Ok(DiseaseGuideResponse {
            diseases: found.into_iter().map(|d| d.name).collect(),
            view,
        })
    }

    /// Foods that pair badly / well with a single ingredient
    pub async fn ingredient_compatibility(
        &self,
        name: &str,
        filter: Option<&str>,
    ) -> Result<IngredientCompatibilityResponse, GuideError> {
        if name.trim().is_empty() {
            return Err(GuideError::validation("name", "Ingredient name is required"));
        }
        let filter = ViewFilter::parse(filter);

        let ingredient = self
            .store
            .find_ingredient(&name.trim().to_lowercase())
            .await?
            .ok_or_else(|| GuideError::IngredientNotFound {
                name: name.to_string(),
            })?;

        let mut edges: Vec<RawEdge> = Vec::new();
        for kind in RelationKind::all() {
            if filter.includes(kind) {
                edges.extend(self.store.ingredient_edges(ingredient.id, kind).await?);
            }
        }
        let edge_count = edges.len();

        let view: GuideView<IngredientFoodRecord> =
            aggregate(QueryScope::Ingredient(ingredient.id), edges, filter)?;

        log::info!(
            "🥛 Compatibility for '{}': {} edges → avoid={} beneficial={} (filter={})",
            ingredient.name,
            edge_count,
            view.avoid.as_ref().map_or(0, Vec::len),
            view.beneficial.as_ref().map_or(0, Vec::len),
            filter.as_str()
        );

        Ok(IngredientCompatibilityResponse {
            ingredient: ingredient.name,
            category: ingredient.category,
            view,
        })
    }

    /// Ingredient names containing `query`, case-insensitive, at most 10
    pub async fn search(&self, query: Option<&str>) -> Result<SearchResponse, GuideError> {
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(GuideError::validation("q", "Query parameter \"q\" is required")),
        };

        let candidates = self.store.ingredients_matching(query).await?;
        let results = match_ingredients(query, candidates);

        log::debug!("🔎 Search '{}' → {} result(s)", query, results.len());

        Ok(SearchResponse {
            query: query.to_string(),
            results,
        })
    }

    pub async fn list_diseases(&self) -> Result<DiseaseListResponse, GuideError> {
        let diseases = self.store.list_diseases().await?;
        Ok(DiseaseListResponse {
            count: diseases.len(),
            diseases,
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok",
            message: "Nutrition guide backend is running".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Storage round trip; no retry
    pub async fn db_check(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
