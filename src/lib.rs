pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod resolve;
pub mod service;
pub mod store;
pub mod terms;

pub use config::Config;
pub use error::{KintermError, Result};
pub use graph::{find_path, FamilyGraph, Gender, PersonId, RelationFact, RelationType};
pub use resolve::{resolve_all, ResolvedTerm, Resolver};
pub use service::FamilyService;
pub use terms::{resolve_term, Locale, Term};
