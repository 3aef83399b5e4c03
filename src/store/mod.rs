//! SQLite-backed directory, relation facts and custom terms.
//!
//! Everything here is row plumbing over [`Db`](crate::db::Db); the resolution
//! logic never calls into this module directly.

mod custom_terms;
mod people;
mod relations;

pub use custom_terms::{delete_override, load_overrides, upsert_override};
pub use people::{get_person, insert_person, load_people, search_people, SEARCH_LIMIT};
pub use relations::{insert_relation, load_facts, relation_exists};

use serde::{Deserialize, Serialize};

use crate::graph::{Gender, PersonId};

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub username: String,
    pub nickname: String,
    pub phone: Option<String>,
    pub gender: Gender,
}

/// Fields for creating a directory entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPerson {
    pub username: String,
    pub nickname: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Gender,
}

/// Extended result code of a failed constraint, if that is what `err` is.
fn constraint_violation(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}
