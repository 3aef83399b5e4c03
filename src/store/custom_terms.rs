use rusqlite::{ffi, params};
use std::collections::HashMap;

use super::constraint_violation;
use crate::db::Db;
use crate::error::{KintermError, Result};
use crate::graph::PersonId;

/// Custom terms the viewer has set, keyed by target.
pub async fn load_overrides(db: &Db, viewer: PersonId) -> Result<HashMap<PersonId, String>> {
    db.with_connection(move |conn| {
        let mut stmt = conn.prepare("SELECT target_id, term FROM custom_terms WHERE viewer_id = ?1")?;
        let overrides = stmt
            .query_map(params![viewer], |row| {
                Ok((row.get::<_, PersonId>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<HashMap<_, _>, rusqlite::Error>>()?;
        Ok(overrides)
    })
    .await
}

/// Both ends must be in the directory; a missing one is `PersonNotFound`.
pub async fn upsert_override(db: &Db, viewer: PersonId, target: PersonId, term: &str) -> Result<()> {
    let term = term.to_string();
    db.with_connection(move |conn| {
        let result = conn.execute(
            "INSERT INTO custom_terms (viewer_id, target_id, term) VALUES (?1, ?2, ?3) \
             ON CONFLICT(viewer_id, target_id) DO UPDATE SET \
                 term = excluded.term, \
                 updated_at = CURRENT_TIMESTAMP",
            params![viewer, target, term],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if constraint_violation(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                let viewer_known: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM people WHERE person_id = ?1)",
                    params![viewer],
                    |row| row.get(0),
                )?;
                Err(KintermError::PersonNotFound(if viewer_known { target } else { viewer }))
            }
            Err(e) => Err(e.into()),
        }
    })
    .await
}

/// Returns whether a row was removed.
pub async fn delete_override(db: &Db, viewer: PersonId, target: PersonId) -> Result<bool> {
    db.with_connection(move |conn| {
        let removed = conn.execute(
            "DELETE FROM custom_terms WHERE viewer_id = ?1 AND target_id = ?2",
            params![viewer, target],
        )?;
        Ok(removed > 0)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Gender;
    use crate::store::test_support::{migrated_db, person};

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let (db, _temp) = migrated_db().await;
        let a = person(&db, "a", Gender::Male).await.person_id;
        let b = person(&db, "b", Gender::Female).await.person_id;

        upsert_override(&db, a, b, "Auntie").await.unwrap();
        upsert_override(&db, a, b, "Auntie").await.unwrap();
        let overrides = load_overrides(&db, a).await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get(&b).map(String::as_str), Some("Auntie"));

        upsert_override(&db, a, b, "Aunt Mei").await.unwrap();
        let overrides = load_overrides(&db, a).await.unwrap();
        assert_eq!(overrides.get(&b).map(String::as_str), Some("Aunt Mei"));
    }

    #[tokio::test]
    async fn test_overrides_not_symmetric() {
        let (db, _temp) = migrated_db().await;
        let a = person(&db, "a", Gender::Male).await.person_id;
        let b = person(&db, "b", Gender::Female).await.person_id;

        upsert_override(&db, a, b, "Sis").await.unwrap();
        assert!(load_overrides(&db, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_unknown_people_not_found() {
        let (db, _temp) = migrated_db().await;
        let a = person(&db, "a", Gender::Male).await.person_id;

        let viewer = upsert_override(&db, 999, a, "Uncle").await;
        assert!(matches!(viewer, Err(KintermError::PersonNotFound(999))));

        let target = upsert_override(&db, a, 888, "Uncle").await;
        assert!(matches!(target, Err(KintermError::PersonNotFound(888))));
        assert!(load_overrides(&db, a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_override() {
        let (db, _temp) = migrated_db().await;
        let a = person(&db, "a", Gender::Male).await.person_id;
        let b = person(&db, "b", Gender::Female).await.person_id;

        upsert_override(&db, a, b, "Sis").await.unwrap();
        assert!(delete_override(&db, a, b).await.unwrap());
        assert!(!delete_override(&db, a, b).await.unwrap());
        assert!(load_overrides(&db, a).await.unwrap().is_empty());
    }
}
