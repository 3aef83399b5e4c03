use serde::{Deserialize, Serialize};

use super::Term;

/// Language the address terms are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Label for the viewer's own row
    pub fn me(&self) -> &'static str {
        match self {
            Locale::En => "me",
            Locale::Zh => "我",
        }
    }

    /// Label for relatives with no known term
    pub fn unset(&self) -> &'static str {
        match self {
            Locale::En => "unset",
            Locale::Zh => "未设置",
        }
    }

    pub fn term_label(&self, term: Term) -> &'static str {
        match self {
            Locale::En => english(term),
            Locale::Zh => chinese(term),
        }
    }
}

fn english(term: Term) -> &'static str {
    match term {
        Term::Husband => "husband",
        Term::Wife => "wife",
        Term::Father => "father",
        Term::Mother => "mother",
        Term::Son => "son",
        Term::Daughter => "daughter",
        Term::HusbandsFather => "husband's father",
        Term::WifesFather => "wife's father",
        Term::HusbandsMother => "husband's mother",
        Term::WifesMother => "wife's mother",
        Term::PaternalGrandfather => "paternal grandfather",
        Term::PaternalGrandmother => "paternal grandmother",
        Term::MaternalGrandfather => "maternal grandfather",
        Term::MaternalGrandmother => "maternal grandmother",
        Term::SonInLaw => "son-in-law",
        Term::DaughterInLaw => "daughter-in-law",
        Term::Brother => "brother",
        Term::Sister => "sister",
    }
}

fn chinese(term: Term) -> &'static str {
    match term {
        Term::Husband => "老公",
        Term::Wife => "老婆",
        Term::Father => "爸爸",
        Term::Mother => "妈妈",
        Term::Son => "儿子",
        Term::Daughter => "女儿",
        Term::HusbandsFather => "公公",
        Term::WifesFather => "岳父",
        Term::HusbandsMother => "婆婆",
        Term::WifesMother => "岳母",
        Term::PaternalGrandfather => "爷爷",
        Term::PaternalGrandmother => "奶奶",
        Term::MaternalGrandfather => "外公",
        Term::MaternalGrandmother => "外婆",
        Term::SonInLaw => "女婿",
        Term::DaughterInLaw => "儿媳",
        Term::Brother => "兄弟",
        Term::Sister => "姐妹",
    }
}
