use rusqlite::{ffi, params, types::Type};

use super::constraint_violation;
use crate::db::Db;
use crate::error::{KintermError, Result};
use crate::graph::{PersonId, RelationFact, RelationType};

/// Every stored fact, in insertion order.
pub async fn load_facts(db: &Db) -> Result<Vec<RelationFact>> {
    db.with_connection(|conn| {
        let mut stmt = conn.prepare(
            "SELECT source_id, target_id, relation_type FROM family_relations ORDER BY relation_id",
        )?;
        let facts = stmt
            .query_map([], |row| {
                let label: String = row.get(2)?;
                let relation = label
                    .parse::<RelationType>()
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
                Ok(RelationFact {
                    source: row.get(0)?,
                    target: row.get(1)?,
                    relation,
                })
            })?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(facts)
    })
    .await
}

/// True if any fact links `a` and `b`, in either direction.
pub async fn relation_exists(db: &Db, a: PersonId, b: PersonId) -> Result<bool> {
    db.with_connection(move |conn| {
        let mut stmt = conn.prepare(
            "SELECT 1 FROM family_relations \
             WHERE (source_id = ?1 AND target_id = ?2) OR (source_id = ?2 AND target_id = ?1)",
        )?;
        Ok(stmt.exists(params![a, b])?)
    })
    .await
}

/// Store one directed fact and return its row id.
///
/// The pair index makes this the final arbiter between concurrent writers:
/// a second insert for the same pair fails with `Conflict`.
pub async fn insert_relation(db: &Db, fact: &RelationFact) -> Result<i64> {
    let fact = fact.clone();

    db.with_connection(move |conn| {
        let inserted = conn.execute(
            "INSERT INTO family_relations (source_id, target_id, relation_type) VALUES (?1, ?2, ?3)",
            params![fact.source, fact.target, fact.relation.as_str()],
        );
        match inserted {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) => Err(match constraint_violation(&e) {
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => KintermError::Conflict(format!(
                    "relation already exists between {} and {}",
                    fact.source, fact.target
                )),
                Some(ffi::SQLITE_CONSTRAINT_CHECK) => {
                    KintermError::Validation("a person cannot be related to themselves".to_string())
                }
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    KintermError::Validation("relation endpoints must exist".to_string())
                }
                _ => e.into(),
            }),
        }
    })
    .await
}
