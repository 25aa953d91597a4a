//! View filtering and final ordering of merged records

use super::merger::KindAggregation;
use super::types::{AggregatedRecord, RelationKind, Source};
use serde::Serialize;
use std::cmp::Ordering;

/// Which subsequences the caller wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Avoid,
    Beneficial,
}

impl ViewFilter {
    /// Lenient parse: absent or unrecognized values fall back to `All`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("avoid") => ViewFilter::Avoid,
            Some("beneficial") => ViewFilter::Beneficial,
            Some("all") | None => ViewFilter::All,
            Some(other) => {
                log::debug!("Unrecognized filter '{}', using 'all'", other);
                ViewFilter::All
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Avoid => "avoid",
            ViewFilter::Beneficial => "beneficial",
        }
    }

    pub fn includes(&self, kind: RelationKind) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Avoid => kind == RelationKind::Avoid,
            ViewFilter::Beneficial => kind == RelationKind::Beneficial,
        }
    }
}

/// Severity descending, then food name ascending ignoring case
pub fn compare_records(a: &AggregatedRecord, b: &AggregatedRecord) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| compare_names(&a.food, &b.food))
}

/// Case-insensitive name order, raw bytes as the tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_records(records: &mut [AggregatedRecord]) {
    records.sort_by(compare_records);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    pub label: String,
    pub url: Option<String>,
}

impl From<Source> for SourceView {
    fn from(source: Source) -> Self {
        Self {
            label: source.label,
            url: source.url.filter(|u| !u.is_empty()),
        }
    }
}

/// Record shape for disease guides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseFoodRecord {
    pub food: String,
    pub reason: String,
    pub severity: u8,
    pub affected_diseases: Vec<String>,
    pub sources: Vec<SourceView>,
}

impl From<AggregatedRecord> for DiseaseFoodRecord {
    fn from(record: AggregatedRecord) -> Self {
        Self {
            food: record.food,
            reason: record.reason,
            severity: record.severity,
            affected_diseases: record.contributing_subjects,
            sources: record.sources.into_iter().map(SourceView::from).collect(),
        }
    }
}

/// Record shape for ingredient compatibility; the subject is implied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientFoodRecord {
    pub food: String,
    pub reason: String,
    pub severity: u8,
    pub sources: Vec<SourceView>,
}

impl From<AggregatedRecord> for IngredientFoodRecord {
    fn from(record: AggregatedRecord) -> Self {
        Self {
            food: record.food,
            reason: record.reason,
            severity: record.severity,
            sources: record.sources.into_iter().map(SourceView::from).collect(),
        }
    }
}

/// The filtered, ordered lists; absent keys are omitted on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideView<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficial: Option<Vec<T>>,
}

/// Apply the filter and the final sort, then render into the wire record type
pub fn present<T: From<AggregatedRecord>>(
    aggregation: KindAggregation,
    filter: ViewFilter,
) -> GuideView<T> {
    let render = |mut records: Vec<AggregatedRecord>| -> Vec<T> {
        sort_records(&mut records);
        records.into_iter().map(T::from).collect()
    };

    let KindAggregation { avoid, beneficial } = aggregation;

    GuideView {
        avoid: filter.includes(RelationKind::Avoid).then(|| render(avoid)),
        beneficial: filter
            .includes(RelationKind::Beneficial)
            .then(|| render(beneficial)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(food: &str, severity: u8) -> AggregatedRecord {
        AggregatedRecord {
            food: food.to_string(),
            reason: "test".to_string(),
            severity,
            contributing_subjects: vec!["diabetes".to_string()],
            sources: vec![Source::new("Journal", Some(""))],
        }
    }

    fn aggregation() -> KindAggregation {
        KindAggregation {
            avoid: vec![record("white bread", 3), record("Bacon", 3), record("candy", 5)],
            beneficial: vec![record("oats", 2), record("leafy greens", 4)],
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(ViewFilter::parse(None), ViewFilter::All);
        assert_eq!(ViewFilter::parse(Some("all")), ViewFilter::All);
        assert_eq!(ViewFilter::parse(Some("avoid")), ViewFilter::Avoid);
        assert_eq!(ViewFilter::parse(Some("beneficial")), ViewFilter::Beneficial);
        assert_eq!(ViewFilter::parse(Some("nonsense")), ViewFilter::All);
        assert_eq!(ViewFilter::parse(Some("")), ViewFilter::All);
    }

    #[test]
    fn test_sort_severity_then_name_case_insensitive() {
        let view: GuideView<IngredientFoodRecord> = present(aggregation(), ViewFilter::All);
        let avoid: Vec<_> = view.avoid.unwrap().into_iter().map(|r| r.food).collect();
        assert_eq!(avoid, vec!["candy", "Bacon", "white bread"]);

        let beneficial: Vec<_> = view.beneficial.unwrap().into_iter().map(|r| r.food).collect();
        assert_eq!(beneficial, vec!["leafy greens", "oats"]);
    }

    #[test]
    fn test_sorted_output_is_monotonic() {
        let mut records = vec![
            record("b", 1),
            record("A", 5),
            record("c", 3),
            record("a", 3),
            record("B", 5),
        ];
        sort_records(&mut records);

        for pair in records.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                assert!(pair[0].food.to_lowercase() <= pair[1].food.to_lowercase());
            }
        }
    }

    #[test]
    fn test_filter_avoid_omits_beneficial_key() {
        let view: GuideView<IngredientFoodRecord> = present(aggregation(), ViewFilter::Avoid);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("avoid").is_some());
        assert!(json.get("beneficial").is_none());
    }

    #[test]
    fn test_filter_beneficial_with_no_records() {
        let aggregation = KindAggregation {
            avoid: vec![record("citrus", 3)],
            beneficial: vec![],
        };
        let view: GuideView<IngredientFoodRecord> = present(aggregation, ViewFilter::Beneficial);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({ "beneficial": [] }));
    }

    #[test]
    fn test_all_is_union_of_single_filters() {
        let all: GuideView<IngredientFoodRecord> = present(aggregation(), ViewFilter::All);
        let avoid: GuideView<IngredientFoodRecord> = present(aggregation(), ViewFilter::Avoid);
        let beneficial: GuideView<IngredientFoodRecord> = present(aggregation(), ViewFilter::Beneficial);

        assert_eq!(all.avoid, avoid.avoid);
        assert_eq!(all.beneficial, beneficial.beneficial);
    }

    #[test]
    fn test_disease_record_wire_shape() {
        let record = DiseaseFoodRecord::from(record("bacon", 4));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["affectedDiseases"], serde_json::json!(["diabetes"]));
        assert_eq!(json["sources"][0]["url"], serde_json::Value::Null);
        assert_eq!(json["sources"][0]["label"], "Journal");
    }
}
