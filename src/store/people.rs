use rusqlite::{params, OptionalExtension, Row};

use super::{constraint_violation, NewPerson, Person};
use crate::db::Db;
use crate::error::{KintermError, Result};
use crate::graph::{Gender, PersonId};

/// Maximum rows returned by [`search_people`]
pub const SEARCH_LIMIT: usize = 10;

const PERSON_COLUMNS: &str = "person_id, username, nickname, phone, gender";

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let gender: String = row.get(4)?;
    Ok(Person {
        person_id: row.get(0)?,
        username: row.get(1)?,
        nickname: row.get(2)?,
        phone: row.get(3)?,
        gender: Gender::from_db(&gender),
    })
}

/// Add a person to the directory. Usernames are unique.
pub async fn insert_person(db: &Db, person: &NewPerson) -> Result<Person> {
    let username = person.username.trim().to_string();
    if username.is_empty() {
        return Err(KintermError::Validation("username is required".to_string()));
    }
    let nickname = match person.nickname.trim() {
        "" => username.clone(),
        n => n.to_string(),
    };
    let phone = person.phone.clone().filter(|p| !p.trim().is_empty());
    let gender = person.gender;

    db.with_connection(move |conn| {
        let inserted = conn.execute(
            "INSERT INTO people (username, nickname, phone, gender) VALUES (?1, ?2, ?3, ?4)",
            params![username, nickname, phone, gender.as_str()],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if constraint_violation(&e) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                return Err(KintermError::Conflict(format!("username already taken: {}", username)));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Person {
            person_id: conn.last_insert_rowid(),
            username,
            nickname,
            phone,
            gender,
        })
    })
    .await
}

pub async fn get_person(db: &Db, person_id: PersonId) -> Result<Option<Person>> {
    db.with_connection(move |conn| {
        let query = format!("SELECT {} FROM people WHERE person_id = ?1", PERSON_COLUMNS);
        let person = conn
            .query_row(&query, params![person_id], person_from_row)
            .optional()?;
        Ok(person)
    })
    .await
}

/// Whole directory, ordered by id
pub async fn load_people(db: &Db) -> Result<Vec<Person>> {
    db.with_connection(|conn| {
        let query = format!("SELECT {} FROM people ORDER BY person_id", PERSON_COLUMNS);
        let mut stmt = conn.prepare(&query)?;
        let people = stmt
            .query_map([], person_from_row)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(people)
    })
    .await
}

/// Substring match on phone or username, at most [`SEARCH_LIMIT`] rows.
pub async fn search_people(db: &Db, keyword: &str) -> Result<Vec<Person>> {
    let pattern = format!("%{}%", escape_like(keyword.trim()));

    db.with_connection(move |conn| {
        let query = format!(
            "SELECT {} FROM people \
             WHERE phone LIKE ?1 ESCAPE '\\' OR username LIKE ?1 ESCAPE '\\' \
             ORDER BY person_id LIMIT ?2",
            PERSON_COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let people = stmt
            .query_map(params![pattern, SEARCH_LIMIT as i64], person_from_row)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(people)
    })
    .await
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
