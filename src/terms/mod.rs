//! Kinship address terms: the fixed rule table and its localized labels.

mod locale;

pub use locale::Locale;

use serde::{Deserialize, Serialize};

use crate::graph::{Gender, RelationType};

/// Every address term the rule table can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Husband,
    Wife,
    Father,
    Mother,
    Son,
    Daughter,
    HusbandsFather,
    WifesFather,
    HusbandsMother,
    WifesMother,
    PaternalGrandfather,
    PaternalGrandmother,
    MaternalGrandfather,
    MaternalGrandmother,
    SonInLaw,
    DaughterInLaw,
    Brother,
    Sister,
}

impl Term {
    pub fn label(&self, locale: Locale) -> &'static str {
        locale.term_label(*self)
    }
}

/// Map a relation path to an address term.
///
/// Only one- and two-hop signatures are named. Gender branches look at the
/// target, except the in-law parents, which are named after the viewer's
/// side of the marriage. Anything else, including the empty path, is `None`.
pub fn resolve_term(path: &[RelationType], viewer_gender: Gender, target_gender: Gender) -> Option<Term> {
    use RelationType::*;

    let target_male = target_gender == Gender::Male;
    let viewer_female = viewer_gender == Gender::Female;

    let term = match path {
        [Spouse] => pick(target_male, Term::Husband, Term::Wife),
        [Father] => Term::Father,
        [Mother] => Term::Mother,
        [Child] => pick(target_male, Term::Son, Term::Daughter),

        [Spouse, Father] => pick(viewer_female, Term::HusbandsFather, Term::WifesFather),
        [Spouse, Mother] => pick(viewer_female, Term::HusbandsMother, Term::WifesMother),

        [Father, Father] => Term::PaternalGrandfather,
        [Father, Mother] => Term::PaternalGrandmother,
        [Mother, Father] => Term::MaternalGrandfather,
        [Mother, Mother] => Term::MaternalGrandmother,

        [Child, Spouse] => pick(target_male, Term::SonInLaw, Term::DaughterInLaw),

        [Father | Mother, Child] => pick(target_male, Term::Brother, Term::Sister),

        _ => return None,
    };

    Some(term)
}

fn pick(condition: bool, yes: Term, no: Term) -> Term {
    if condition {
        yes
    } else {
        no
    }
}
