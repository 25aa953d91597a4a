//! Merge-by-target aggregation of normalized edges
//!
//! Folds every edge naming the same target ingredient into one record:
//! worst-case severity, concatenated rationale, all contributing subjects and
//! all sources. Records keep first-seen order; final ordering is the
//! presenter's job.

use super::types::{AggregatedRecord, NormalizedEdge, RelationKind};
use std::collections::HashMap;

/// Separator placed between distinct rationale fragments
pub const REASON_SEPARATOR: &str = "; ";

/// Insertion-ordered accumulator keyed by target ingredient name
#[derive(Debug, Default)]
pub struct MergeByTarget {
    records: Vec<AggregatedRecord>,
    index: HashMap<String, usize>,
}

impl MergeByTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one edge into the record for its target
    pub fn add(&mut self, edge: NormalizedEdge) {
        let NormalizedEdge {
            subject_label,
            target,
            severity,
            reason,
            sources,
            ..
        } = edge;

        match self.index.get(&target.name) {
            Some(&pos) => {
                let existing = &mut self.records[pos];
                existing.severity = existing.severity.max(severity);
                existing.contributing_subjects.push(subject_label);
                if !existing.reason.contains(reason.as_str()) {
                    existing.reason.push_str(REASON_SEPARATOR);
                    existing.reason.push_str(&reason);
                }
                existing.sources.extend(sources);

                log::debug!(
                    "Merged edge into '{}' (severity={}, subjects={})",
                    existing.food,
                    existing.severity,
                    existing.contributing_subjects.len()
                );
            }
            None => {
                self.index.insert(target.name.clone(), self.records.len());
                self.records.push(AggregatedRecord {
                    food: target.name,
                    reason,
                    severity,
                    contributing_subjects: vec![subject_label],
                    sources,
                });
            }
        }
    }

    pub fn get(&self, food: &str) -> Option<&AggregatedRecord> {
        self.index.get(food).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order of their target
    pub fn into_records(self) -> Vec<AggregatedRecord> {
        self.records
    }
}

impl FromIterator<NormalizedEdge> for MergeByTarget {
    fn from_iter<I: IntoIterator<Item = NormalizedEdge>>(iter: I) -> Self {
        let mut merger = MergeByTarget::new();
        for edge in iter {
            merger.add(edge);
        }
        merger
    }
}

/// Merged records for both relation kinds, never mixed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindAggregation {
    pub avoid: Vec<AggregatedRecord>,
    pub beneficial: Vec<AggregatedRecord>,
}

impl KindAggregation {
    /// Run one merge pass per relation kind over an ordered edge stream
    pub fn from_edges(edges: impl IntoIterator<Item = NormalizedEdge>) -> Self {
        let mut avoid = MergeByTarget::new();
        let mut beneficial = MergeByTarget::new();

        for edge in edges {
            match edge.kind {
                RelationKind::Avoid => avoid.add(edge),
                RelationKind::Beneficial => beneficial.add(edge),
            }
        }

        Self {
            avoid: avoid.into_records(),
            beneficial: beneficial.into_records(),
        }
    }
}
