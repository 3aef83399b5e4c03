//! Family operations exposed to the caller-facing layer.
//!
//! The caller supplies an already authenticated viewer id. Each operation
//! loads what it needs from the store, then hands off to the pure
//! graph/term/resolve modules.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ResolutionConfig;
use crate::db::Db;
use crate::error::{KintermError, Result};
use crate::graph::{Gender, PersonId, RelationFact, RelationType};
use crate::resolve::{resolve_all, ResolvedTerm};
use crate::store::{self, NewPerson, Person};

/// Longest custom term accepted, in characters
pub const MAX_TERM_CHARS: usize = 32;

/// One row of the viewer's family list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyMember {
    pub person_id: PersonId,
    pub username: String,
    pub nickname: String,
    pub gender: Gender,
    pub display_term: String,
    pub resolved: ResolvedTerm,
}

/// Request to record "target is my `relation_type`".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddRelation {
    pub target_id: Option<PersonId>,
    pub relation_type: Option<String>,
}

/// Request to set, or clear with a blank term, a custom term.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetOverride {
    pub target_id: Option<PersonId>,
    pub term: Option<String>,
}

pub struct FamilyService {
    db: Db,
    resolution: ResolutionConfig,
}

impl FamilyService {
    pub fn new(db: Db, resolution: ResolutionConfig) -> Self {
        Self { db, resolution }
    }

    /// Address term for every person in the directory, as seen by `viewer`.
    pub async fn list_terms(&self, viewer: PersonId) -> Result<Vec<FamilyMember>> {
        let start = Instant::now();

        let people = store::load_people(&self.db).await?;
        let facts = store::load_facts(&self.db).await?;
        let overrides = store::load_overrides(&self.db, viewer).await?;

        let nodes: Vec<(PersonId, Gender)> = people.iter().map(|p| (p.person_id, p.gender)).collect();
        let resolved = resolve_all(viewer, &nodes, &facts, &overrides, self.resolution.max_depth);

        let locale = self.resolution.locale;
        let members: Vec<FamilyMember> = people
            .into_iter()
            .zip(resolved)
            .map(|(person, (_, resolved))| FamilyMember {
                person_id: person.person_id,
                username: person.username,
                nickname: person.nickname,
                gender: person.gender,
                display_term: resolved.render(locale),
                resolved,
            })
            .collect();

        log::debug!(
            "Resolved {} terms for viewer {} ({} facts, {} overrides) in {:?}",
            members.len(),
            viewer,
            facts.len(),
            overrides.len(),
            start.elapsed()
        );

        Ok(members)
    }

    /// Directory lookup by phone or username fragment.
    pub async fn search_people(&self, keyword: &str) -> Result<Vec<Person>> {
        if keyword.trim().is_empty() {
            return Err(KintermError::Validation("search keyword is required".to_string()));
        }
        store::search_people(&self.db, keyword).await
    }

    /// Record a relation from `viewer` to the request's target.
    pub async fn add_relation(&self, viewer: PersonId, request: AddRelation) -> Result<()> {
        let target = request
            .target_id
            .ok_or_else(|| KintermError::Validation("target_id is required".to_string()))?;
        let relation: RelationType = request.relation_type.as_deref().unwrap_or_default().parse()?;

        if target == viewer {
            return Err(KintermError::Validation("cannot add yourself as a relative".to_string()));
        }

        self.require_person(viewer).await?;
        self.require_person(target).await?;

        if store::relation_exists(&self.db, viewer, target).await? {
            return Err(KintermError::Conflict(format!(
                "relation already exists between {} and {}",
                viewer, target
            )));
        }

        store::insert_relation(&self.db, &RelationFact::new(viewer, target, relation)).await?;
        log::info!("Added relation: {} -> {} ({})", viewer, target, relation);

        Ok(())
    }

    /// Upsert the viewer's custom term for a target; a blank term removes it.
    pub async fn set_override(&self, viewer: PersonId, request: SetOverride) -> Result<()> {
        let target = request
            .target_id
            .ok_or_else(|| KintermError::Validation("target_id is required".to_string()))?;
        let term = request.term.as_deref().unwrap_or_default().trim();

        if term.chars().count() > MAX_TERM_CHARS {
            return Err(KintermError::Validation(format!(
                "term must be at most {} characters",
                MAX_TERM_CHARS
            )));
        }

        self.require_person(viewer).await?;
        self.require_person(target).await?;

        if term.is_empty() {
            if store::delete_override(&self.db, viewer, target).await? {
                log::info!("Cleared custom term: {} -> {}", viewer, target);
            }
            return Ok(());
        }

        store::upsert_override(&self.db, viewer, target, term).await?;
        log::info!("Set custom term: {} -> {} = {}", viewer, target, term);

        Ok(())
    }

    pub async fn add_person(&self, person: NewPerson) -> Result<Person> {
        let created = store::insert_person(&self.db, &person).await?;
        log::info!("Added person {} ({})", created.person_id, created.username);
        Ok(created)
    }

    async fn require_person(&self, id: PersonId) -> Result<Person> {
        store::get_person(&self.db, id)
            .await?
            .ok_or(KintermError::PersonNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{migrated_db, person};
    use crate::terms::{Locale, Term};
    use tempfile::TempDir;

    async fn service() -> (FamilyService, TempDir) {
        let (db, temp) = migrated_db().await;
        (FamilyService::new(db, ResolutionConfig::default()), temp)
    }

    fn add(target: PersonId, relation: &str) -> AddRelation {
        AddRelation {
            target_id: Some(target),
            relation_type: Some(relation.to_string()),
        }
    }

    fn term_for(members: &[FamilyMember], id: PersonId) -> &str {
        members
            .iter()
            .find(|m| m.person_id == id)
            .map(|m| m.display_term.as_str())
            .unwrap()
    }

    #[tokio::test]
    async fn test_father_son_end_to_end() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;
        let b = person(&svc.db, "b", Gender::Male).await.person_id;

        // B records A as father
        svc.add_relation(b, add(a, "father")).await.unwrap();

        let from_b = svc.list_terms(b).await.unwrap();
        assert_eq!(term_for(&from_b, a), "father");
        assert_eq!(term_for(&from_b, b), "me");

        let from_a = svc.list_terms(a).await.unwrap();
        assert_eq!(term_for(&from_a, b), "son");
        assert_eq!(from_a[1].resolved, ResolvedTerm::Computed(Term::Son));
    }

    #[tokio::test]
    async fn test_list_covers_everyone_in_id_order() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Female).await.person_id;
        let b = person(&svc.db, "b", Gender::Male).await.person_id;
        let c = person(&svc.db, "c", Gender::Male).await.person_id;
        svc.add_relation(a, add(b, "spouse")).await.unwrap();
        svc.add_relation(b, add(c, "father")).await.unwrap();

        let members = svc.list_terms(a).await.unwrap();
        let ids: Vec<PersonId> = members.iter().map(|m| m.person_id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(term_for(&members, a), "me");
        assert_eq!(term_for(&members, b), "husband");
        assert_eq!(term_for(&members, c), "husband's father");

        // from the father's side: his son and his son's wife
        let from_c = svc.list_terms(c).await.unwrap();
        assert_eq!(term_for(&from_c, b), "son");
        assert_eq!(term_for(&from_c, a), "daughter-in-law");
    }

    #[tokio::test]
    async fn test_duplicate_relation_conflicts() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;
        let b = person(&svc.db, "b", Gender::Female).await.person_id;

        svc.add_relation(a, add(b, "spouse")).await.unwrap();
        let again = svc.add_relation(a, add(b, "spouse")).await;
        assert!(matches!(again, Err(KintermError::Conflict(_))));

        // recorded from the other side too
        let reverse = svc.add_relation(b, add(a, "spouse")).await;
        assert!(matches!(reverse, Err(KintermError::Conflict(_))));

        assert_eq!(store::load_facts(&svc.db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_relation_validation() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;
        let b = person(&svc.db, "b", Gender::Female).await.person_id;

        let self_rel = svc.add_relation(a, add(a, "spouse")).await;
        assert!(matches!(self_rel, Err(KintermError::Validation(_))));

        let bad_type = svc.add_relation(a, add(b, "cousin")).await;
        assert!(matches!(bad_type, Err(KintermError::Validation(_))));

        let missing_type = svc
            .add_relation(a, AddRelation { target_id: Some(b), relation_type: None })
            .await;
        assert!(matches!(missing_type, Err(KintermError::Validation(_))));

        let missing_target = svc.add_relation(a, AddRelation::default()).await;
        assert!(matches!(missing_target, Err(KintermError::Validation(_))));

        let unknown = svc.add_relation(a, add(404, "child")).await;
        assert!(matches!(unknown, Err(KintermError::PersonNotFound(404))));

        assert!(store::load_facts(&svc.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_override_precedence_survives_fact_changes() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;
        let b = person(&svc.db, "b", Gender::Female).await.person_id;
        let c = person(&svc.db, "c", Gender::Female).await.person_id;

        svc.set_override(a, SetOverride { target_id: Some(c), term: Some("Granny".to_string()) })
            .await
            .unwrap();
        assert_eq!(term_for(&svc.list_terms(a).await.unwrap(), c), "Granny");

        svc.add_relation(a, add(b, "mother")).await.unwrap();
        svc.add_relation(b, add(c, "mother")).await.unwrap();
        let members = svc.list_terms(a).await.unwrap();
        assert_eq!(term_for(&members, b), "mother");
        assert_eq!(term_for(&members, c), "Granny");

        // a's override is viewer-scoped; c gets [child, child], which has no term
        let from_c = svc.list_terms(c).await.unwrap();
        assert_eq!(term_for(&from_c, a), "unset");
    }

    #[tokio::test]
    async fn test_set_override_idempotent_and_clearable() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;
        let b = person(&svc.db, "b", Gender::Female).await.person_id;
        svc.add_relation(a, add(b, "spouse")).await.unwrap();

        let set = || SetOverride { target_id: Some(b), term: Some(" Honey ".to_string()) };
        svc.set_override(a, set()).await.unwrap();
        svc.set_override(a, set()).await.unwrap();
        assert_eq!(store::load_overrides(&svc.db, a).await.unwrap().len(), 1);
        assert_eq!(term_for(&svc.list_terms(a).await.unwrap(), b), "Honey");

        svc.set_override(a, SetOverride { target_id: Some(b), term: Some(String::new()) })
            .await
            .unwrap();
        assert_eq!(term_for(&svc.list_terms(a).await.unwrap(), b), "wife");
    }

    #[tokio::test]
    async fn test_set_override_validation() {
        let (svc, _temp) = service().await;
        let a = person(&svc.db, "a", Gender::Male).await.person_id;

        let missing = svc.set_override(a, SetOverride::default()).await;
        assert!(matches!(missing, Err(KintermError::Validation(_))));

        let unknown = svc
            .set_override(a, SetOverride { target_id: Some(77), term: Some("x".to_string()) })
            .await;
        assert!(matches!(unknown, Err(KintermError::PersonNotFound(77))));

        let stranger = svc
            .set_override(999, SetOverride { target_id: Some(a), term: Some("x".to_string()) })
            .await;
        assert!(matches!(stranger, Err(KintermError::PersonNotFound(999))));

        let long = "x".repeat(MAX_TERM_CHARS + 1);
        let too_long = svc
            .set_override(a, SetOverride { target_id: Some(a), term: Some(long) })
            .await;
        assert!(matches!(too_long, Err(KintermError::Validation(_))));

        let widest = "x".repeat(MAX_TERM_CHARS);
        svc.set_override(a, SetOverride { target_id: Some(a), term: Some(widest) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_chinese_locale_and_depth() {
        let (db, _temp) = migrated_db().await;
        let svc = FamilyService::new(db, ResolutionConfig { max_depth: 1, locale: Locale::Zh });
        let me = person(&svc.db, "me", Gender::Female).await.person_id;
        let dad = person(&svc.db, "dad", Gender::Male).await.person_id;
        let grandpa = person(&svc.db, "grandpa", Gender::Male).await.person_id;
        svc.add_relation(me, add(dad, "father")).await.unwrap();
        svc.add_relation(dad, add(grandpa, "father")).await.unwrap();

        let members = svc.list_terms(me).await.unwrap();
        assert_eq!(term_for(&members, me), "我");
        assert_eq!(term_for(&members, dad), "爸爸");
        // two hops away, beyond max_depth = 1
        assert_eq!(term_for(&members, grandpa), "未设置");
    }

    #[tokio::test]
    async fn test_search_requires_keyword() {
        let (svc, _temp) = service().await;
        person(&svc.db, "zhao", Gender::Male).await;
        assert!(matches!(svc.search_people("  ").await, Err(KintermError::Validation(_))));
        assert_eq!(svc.search_people("zha").await.unwrap().len(), 1);
    }
}
