//! Edge normalization from stored relation shapes to subject → target tuples

use super::error::IntegrityError;
use super::types::{Endpoints, IngredientRef, NormalizedEdge, RawEdge};

/// Which stored entities the current query is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    /// Disease guide over the resolved disease ids
    Diseases(Vec<i64>),
    /// Compatibility lookup for a single ingredient id
    Ingredient(i64),
}

/// Pick the side of a symmetric edge that is not the subject
///
/// Fails when neither stored side is the subject: storage handed over an edge
/// that does not belong to this query.
pub fn resolve_other<'a>(
    a: &'a IngredientRef,
    b: &'a IngredientRef,
    subject_id: i64,
) -> Result<(&'a IngredientRef, &'a IngredientRef), IntegrityError> {
    if a.id == subject_id {
        Ok((a, b))
    } else if b.id == subject_id {
        Ok((b, a))
    } else {
        Err(IntegrityError::SubjectNotOnEdge {
            subject_id,
            a_id: a.id,
            b_id: b.id,
        })
    }
}

pub struct EdgeNormalizer {
    scope: QueryScope,
}

impl EdgeNormalizer {
    pub fn new(scope: QueryScope) -> Self {
        Self { scope }
    }

    /// Resolve subject and target for one edge, passing the payload through untouched
    pub fn normalize(&self, edge: RawEdge) -> Result<NormalizedEdge, IntegrityError> {
        let RawEdge {
            endpoints,
            kind,
            severity,
            reason,
            sources,
        } = edge;

        let (subject_label, target) = match (&self.scope, endpoints) {
            (QueryScope::Diseases(ids), Endpoints::DiseaseIngredient { disease, ingredient }) => {
                if !ids.contains(&disease.id) {
                    return Err(IntegrityError::UnexpectedDisease {
                        disease_id: disease.id,
                        disease: disease.name,
                    });
                }
                (disease.name, ingredient)
            }
            (QueryScope::Ingredient(subject_id), Endpoints::Symmetric { a, b }) => {
                let (subject, other) = resolve_other(&a, &b, *subject_id)?;
                (subject.name.clone(), other.clone())
            }
            (QueryScope::Diseases(_), Endpoints::Symmetric { .. }) => {
                return Err(IntegrityError::ShapeMismatch(
                    "ingredient pair edge in a disease query",
                ))
            }
            (QueryScope::Ingredient(_), Endpoints::DiseaseIngredient { .. }) => {
                return Err(IntegrityError::ShapeMismatch(
                    "disease edge in an ingredient query",
                ))
            }
        };

        Ok(NormalizedEdge {
            subject_label,
            target,
            kind,
            severity,
            reason,
            sources,
        })
    }

    /// Normalize a whole batch, stopping at the first inconsistent edge
    pub fn normalize_all(&self, edges: Vec<RawEdge>) -> Result<Vec<NormalizedEdge>, IntegrityError> {
        edges.into_iter().map(|e| self.normalize(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat_core::types::{DiseaseRef, RelationKind, Source};

    fn ingredient(id: i64, name: &str) -> IngredientRef {
        IngredientRef {
            id,
            name: name.to_string(),
            category: "test".to_string(),
        }
    }

    fn pair_edge(a: IngredientRef, b: IngredientRef) -> RawEdge {
        RawEdge {
            endpoints: Endpoints::Symmetric { a, b },
            kind: RelationKind::Avoid,
            severity: 3,
            reason: "May cause digestion issues".to_string(),
            sources: vec![Source::new("Nutrition Journal, 2020", None)],
        }
    }

    fn disease_edge(disease_id: i64, disease: &str, target: IngredientRef) -> RawEdge {
        RawEdge {
            endpoints: Endpoints::DiseaseIngredient {
                disease: DiseaseRef {
                    id: disease_id,
                    name: disease.to_string(),
                },
                ingredient: target,
            },
            kind: RelationKind::Beneficial,
            severity: 4,
            reason: "Fiber slows sugar absorption".to_string(),
            sources: vec![],
        }
    }

    #[test]
    fn test_resolve_other_either_side() {
        let milk = ingredient(1, "milk");
        let citrus = ingredient(2, "citrus");

        let (subject, other) = resolve_other(&milk, &citrus, 1).unwrap();
        assert_eq!(subject.name, "milk");
        assert_eq!(other.name, "citrus");

        let (subject, other) = resolve_other(&milk, &citrus, 2).unwrap();
        assert_eq!(subject.name, "citrus");
        assert_eq!(other.name, "milk");
    }

    #[test]
    fn test_resolve_other_subject_missing() {
        let milk = ingredient(1, "milk");
        let citrus = ingredient(2, "citrus");

        let err = resolve_other(&milk, &citrus, 9).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::SubjectNotOnEdge {
                subject_id: 9,
                a_id: 1,
                b_id: 2
            }
        );
    }

    #[test]
    fn test_symmetric_edge_stored_reversed() {
        // Queried ingredient sits on side B
        let normalizer = EdgeNormalizer::new(QueryScope::Ingredient(4));
        let edge = pair_edge(ingredient(1, "milk"), ingredient(4, "spinach"));

        let normalized = normalizer.normalize(edge).unwrap();
        assert_eq!(normalized.subject_label, "spinach");
        assert_eq!(normalized.target.name, "milk");
        assert_eq!(normalized.severity, 3);
        assert_eq!(normalized.sources.len(), 1);
    }

    #[test]
    fn test_disease_edge_target_is_ingredient() {
        let normalizer = EdgeNormalizer::new(QueryScope::Diseases(vec![10, 11]));
        let edge = disease_edge(11, "diabetes", ingredient(7, "oats"));

        let normalized = normalizer.normalize(edge).unwrap();
        assert_eq!(normalized.subject_label, "diabetes");
        assert_eq!(normalized.target.name, "oats");
        assert_eq!(normalized.kind, RelationKind::Beneficial);
    }

    #[test]
    fn test_disease_outside_scope_is_integrity_error() {
        let normalizer = EdgeNormalizer::new(QueryScope::Diseases(vec![10]));
        let edge = disease_edge(12, "hypertension", ingredient(7, "bacon"));

        assert!(matches!(
            normalizer.normalize(edge),
            Err(IntegrityError::UnexpectedDisease { disease_id: 12, .. })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let normalizer = EdgeNormalizer::new(QueryScope::Diseases(vec![10]));
        let edge = pair_edge(ingredient(1, "milk"), ingredient(2, "citrus"));
        assert!(matches!(
            normalizer.normalize(edge),
            Err(IntegrityError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_normalize_all_stops_on_bad_edge() {
        let normalizer = EdgeNormalizer::new(QueryScope::Ingredient(1));
        let edges = vec![
            pair_edge(ingredient(1, "milk"), ingredient(2, "citrus")),
            pair_edge(ingredient(3, "oats"), ingredient(4, "spinach")),
        ];

        assert!(normalizer.normalize_all(edges).is_err());
    }
}
