//! Family graph: relation types, adjacency building and BFS path search.
//!
//! Stored facts are one-directional; the builder derives the reverse edge
//! for every fact so the search can walk the family in both directions.

mod builder;
mod traversal;

pub use builder::{Edge, FamilyGraph};
pub use traversal::find_path;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::KintermError;

/// Person identifier as assigned by the store.
pub type PersonId = i64;

/// Hop limit beyond which relatives are considered too distant to name.
pub const DEFAULT_MAX_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }

    /// Lenient parse for stored values; anything unrecognised is `Unknown`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

impl FromStr for Gender {
    type Err = KintermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "unknown" => Ok(Gender::Unknown),
            other => Err(KintermError::Validation(format!("unsupported gender: {}", other))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of direct relations. Read as "the other person is my X".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Father,
    Mother,
    Spouse,
    Child,
}

impl RelationType {
    pub const ALL: [RelationType; 4] = [
        RelationType::Father,
        RelationType::Mother,
        RelationType::Spouse,
        RelationType::Child,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Father => "father",
            RelationType::Mother => "mother",
            RelationType::Spouse => "spouse",
            RelationType::Child => "child",
        }
    }

    /// The relation as seen from the other end of a fact.
    ///
    /// `source_gender` is the gender of the person who recorded the fact,
    /// because the reverse edge describes that person. Unknown gender on a
    /// `Child` fact falls back to `Father`.
    pub fn reverse(self, source_gender: Gender) -> RelationType {
        match self {
            RelationType::Spouse => RelationType::Spouse,
            RelationType::Father | RelationType::Mother => RelationType::Child,
            RelationType::Child => match source_gender {
                Gender::Female => RelationType::Mother,
                Gender::Male | Gender::Unknown => RelationType::Father,
            },
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = KintermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "father" => Ok(RelationType::Father),
            "mother" => Ok(RelationType::Mother),
            "spouse" => Ok(RelationType::Spouse),
            "child" => Ok(RelationType::Child),
            "" => Err(KintermError::Validation("relation type is required".to_string())),
            other => Err(KintermError::Validation(format!(
                "unsupported relation type: {}",
                other
            ))),
        }
    }
}

/// One stored fact: from `source`'s point of view, `target` is its `relation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationFact {
    pub source: PersonId,
    pub target: PersonId,
    pub relation: RelationType,
}

impl RelationFact {
    pub fn new(source: PersonId, target: PersonId, relation: RelationType) -> Self {
        Self { source, target, relation }
    }

    /// True when this fact links `a` and `b` in either direction.
    pub fn links(&self, a: PersonId, b: PersonId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
