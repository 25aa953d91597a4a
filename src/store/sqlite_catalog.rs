//! SQLite-backed catalog
//!
//! Hydrates relation edges (target ingredient + full source list) in the order
//! the aggregator expects: severity DESC, target name ASC.

use super::catalog::CatalogStore;
use super::sqlite_pragma::apply_optimized_pragmas;
use super::StoreError;
use crate::compat_core::types::{MAX_SEVERITY, MIN_SEVERITY};
use crate::compat_core::{
    Disease, DiseaseRef, DiseaseType, Endpoints, Ingredient, IngredientRef, IntegrityError,
    RawEdge, RelationKind, Source,
};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which edge table a source row hangs off
#[derive(Debug, Clone, Copy)]
enum SourceOwner {
    DiseaseIngredient,
    Interaction,
    Benefit,
}

impl SourceOwner {
    fn column(&self) -> &'static str {
        match self {
            SourceOwner::DiseaseIngredient => "disease_ingredient_id",
            SourceOwner::Interaction => "interaction_id",
            SourceOwner::Benefit => "benefit_id",
        }
    }
}

/// Interactions hold the avoid pairs, benefits the beneficial ones
fn pair_table(kind: RelationKind) -> (&'static str, SourceOwner) {
    match kind {
        RelationKind::Avoid => ("ingredient_interactions", SourceOwner::Interaction),
        RelationKind::Beneficial => ("ingredient_benefits", SourceOwner::Benefit),
    }
}

fn checked_severity(raw: i64) -> Result<u8, IntegrityError> {
    if (MIN_SEVERITY as i64..=MAX_SEVERITY as i64).contains(&raw) {
        Ok(raw as u8)
    } else {
        Err(IntegrityError::SeverityOutOfRange(raw))
    }
}

fn parse_kind(raw: &str) -> Result<RelationKind, IntegrityError> {
    RelationKind::from_str(raw).ok_or_else(|| IntegrityError::InvalidRelationKind(raw.to_string()))
}

fn parse_disease_type(raw: &str) -> Result<DiseaseType, IntegrityError> {
    DiseaseType::from_str(raw).ok_or_else(|| IntegrityError::InvalidDiseaseType(raw.to_string()))
}

fn ingredient_ref(row: &Row<'_>, offset: usize) -> rusqlite::Result<IngredientRef> {
    Ok(IngredientRef {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        category: row.get(offset + 2)?,
    })
}

struct DiseaseRow {
    id: i64,
    name: String,
    description: String,
    disease_type: String,
}

impl DiseaseRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            disease_type: row.get(3)?,
        })
    }

    fn into_disease(self) -> Result<Disease, IntegrityError> {
        Ok(Disease {
            id: self.id,
            disease_type: parse_disease_type(&self.disease_type)?,
            name: self.name,
            description: self.description,
        })
    }
}

struct DiseaseEdgeRow {
    edge_id: i64,
    kind: String,
    severity: i64,
    reason: String,
    disease: DiseaseRef,
    ingredient: IngredientRef,
}

struct PairEdgeRow {
    edge_id: i64,
    severity: i64,
    reason: String,
    a: IngredientRef,
    b: IngredientRef,
}

fn load_sources(conn: &Connection, owner: SourceOwner, edge_id: i64) -> rusqlite::Result<Vec<Source>> {
    let sql = format!(
        "SELECT label, url FROM sources WHERE {} = ?1 ORDER BY id ASC",
        owner.column()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([edge_id], |row| {
        Ok(Source {
            label: row.get(0)?,
            url: row.get(1)?,
        })
    })?;
    rows.collect()
}

fn query_diseases(conn: &Connection, names: &[String]) -> Result<Vec<Disease>, StoreError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "SELECT id, name, description, type FROM diseases
         WHERE name IN ({})
         ORDER BY name ASC",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(names.iter()), DiseaseRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .map(DiseaseRow::into_disease)
        .collect::<Result<Vec<_>, _>>()?)
}

fn query_all_diseases(conn: &Connection) -> Result<Vec<Disease>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, type FROM diseases ORDER BY name ASC",
    )?;
    let rows = stmt
        .query_map([], DiseaseRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .map(DiseaseRow::into_disease)
        .collect::<Result<Vec<_>, _>>()?)
}

fn query_disease_edges(
    conn: &Connection,
    disease_ids: &[i64],
    kind: RelationKind,
) -> Result<Vec<RawEdge>, StoreError> {
    if disease_ids.is_empty() {
        return Ok(Vec::new());
    }

    // ?1 is the relation kind, ids follow from ?2
    let placeholders = (0..disease_ids.len())
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT di.id, di.type, di.severity, di.reason,
                d.id, d.name,
                i.id, i.name, i.category
         FROM disease_ingredients di
         JOIN diseases d ON d.id = di.disease_id
         JOIN ingredients i ON i.id = di.ingredient_id
         WHERE di.type = ?1
           AND di.disease_id IN ({})
         ORDER BY di.severity DESC, i.name ASC, di.id ASC",
        placeholders
    );

    let mut values = Vec::with_capacity(disease_ids.len() + 1);
    values.push(Value::Text(kind.as_str().to_string()));
    values.extend(disease_ids.iter().map(|&id| Value::Integer(id)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(DiseaseEdgeRow {
                edge_id: row.get(0)?,
                kind: row.get(1)?,
                severity: row.get(2)?,
                reason: row.get(3)?,
                disease: DiseaseRef {
                    id: row.get(4)?,
                    name: row.get(5)?,
                },
                ingredient: ingredient_ref(row, 6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut edges = Vec::with_capacity(rows.len());
    for row in rows {
        edges.push(RawEdge {
            kind: parse_kind(&row.kind)?,
            severity: checked_severity(row.severity)?,
            sources: load_sources(conn, SourceOwner::DiseaseIngredient, row.edge_id)?,
            reason: row.reason,
            endpoints: Endpoints::DiseaseIngredient {
                disease: row.disease,
                ingredient: row.ingredient,
            },
        });
    }

    log::debug!(
        "📥 Loaded {} {} disease edges for {} disease(s)",
        edges.len(),
        kind.as_str(),
        disease_ids.len()
    );
    Ok(edges)
}

fn query_ingredient_edges(
    conn: &Connection,
    ingredient_id: i64,
    kind: RelationKind,
) -> Result<Vec<RawEdge>, StoreError> {
    let (table, owner) = pair_table(kind);
    let sql = format!(
        "SELECT e.id, e.severity, e.reason,
                a.id, a.name, a.category,
                b.id, b.name, b.category
         FROM {} e
         JOIN ingredients a ON a.id = e.ingredient_a_id
         JOIN ingredients b ON b.id = e.ingredient_b_id
         WHERE e.ingredient_a_id = ?1 OR e.ingredient_b_id = ?1
         ORDER BY e.severity DESC,
                  CASE WHEN e.ingredient_a_id = ?1 THEN b.name ELSE a.name END ASC,
                  e.id ASC",
        table
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([ingredient_id], |row| {
            Ok(PairEdgeRow {
                edge_id: row.get(0)?,
                severity: row.get(1)?,
                reason: row.get(2)?,
                a: ingredient_ref(row, 3)?,
                b: ingredient_ref(row, 6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut edges = Vec::with_capacity(rows.len());
    for row in rows {
        edges.push(RawEdge {
            kind,
            severity: checked_severity(row.severity)?,
            sources: load_sources(conn, owner, row.edge_id)?,
            reason: row.reason,
            endpoints: Endpoints::Symmetric { a: row.a, b: row.b },
        });
    }

    log::debug!(
        "📥 Loaded {} {} pair edges from {} for ingredient id={}",
        edges.len(),
        kind.as_str(),
        table,
        ingredient_id
    );
    Ok(edges)
}

/// SQLite catalog behind a single shared connection
#[derive(Clone)]
pub struct SqliteCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    /// Open the catalog; the schema must already be in place
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path.as_ref())?;
        apply_optimized_pragmas(&conn)?;

        log::info!("✅ SQLite catalog opened: {}", db_path.as_ref().display());
        Ok(Self::from_connection(conn))
    }

    /// Open the catalog with writes disabled on the connection
    pub fn open_read_only(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path.as_ref())?;
        apply_optimized_pragmas(&conn)?;
        // Must come after the PRAGMAs above, journal_mode writes the header
        conn.pragma_update(None, "query_only", "ON")?;

        log::info!(
            "✅ SQLite catalog opened read-only: {}",
            db_path.as_ref().display()
        );
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_diseases(&self, names: &[String]) -> Result<Vec<Disease>, StoreError> {
        let conn = self.lock()?;
        query_diseases(&conn, names)
    }

    async fn list_diseases(&self) -> Result<Vec<Disease>, StoreError> {
        let conn = self.lock()?;
        query_all_diseases(&conn)
    }

    async fn find_ingredient(&self, name: &str) -> Result<Option<Ingredient>, StoreError> {
        let conn = self.lock()?;
        let ingredient = conn
            .query_row(
                "SELECT id, name, category FROM ingredients WHERE name = ?1",
                [name],
                |row| {
                    Ok(Ingredient {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        category: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(ingredient)
    }

    async fn disease_edges(
        &self,
        disease_ids: &[i64],
        kind: RelationKind,
    ) -> Result<Vec<RawEdge>, StoreError> {
        let conn = self.lock()?;
        query_disease_edges(&conn, disease_ids, kind)
    }

    async fn ingredient_edges(
        &self,
        ingredient_id: i64,
        kind: RelationKind,
    ) -> Result<Vec<RawEdge>, StoreError> {
        let conn = self.lock()?;
        query_ingredient_edges(&conn, ingredient_id, kind)
    }

    async fn ingredients_matching(&self, fragment: &str) -> Result<Vec<Ingredient>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, category FROM ingredients
             WHERE instr(lower(name), ?1) > 0
             ORDER BY name ASC",
        )?;
        let rows = stmt
            .query_map([fragment.to_lowercase()], |row| {
                Ok(Ingredient {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
