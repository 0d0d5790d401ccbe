//! Built-in catalog of lab techniques, their question sets and the library
//! of reading articles.
//!
//! Only SDS-PAGE ships playable sets today; the other techniques are listed
//! as coming soon so front ends can show the full hub. Articles carry no
//! question sets yet.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: String,
    pub title: String,
    /// Resource name handed to the loader.
    pub resource: String,
    /// Calculation sets get the longer time budget.
    #[serde(default)]
    pub calculation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
}

/// An entry in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: String,
    #[serde(default)]
    pub coming_soon: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub techniques: Vec<Technique>,
    #[serde(default)]
    pub library: Vec<Article>,
}

fn set(n: u32, title: &str, calculation: bool) -> SetEntry {
    SetEntry {
        id: format!("set-{n}"),
        title: title.into(),
        resource: format!("Set-{n}-questions.json"),
        calculation,
    }
}

fn coming_soon(id: &str, title: &str, icon: &str) -> Technique {
    Technique {
        id: id.into(),
        title: title.into(),
        icon: icon.into(),
        coming_soon: true,
        sets: Vec::new(),
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            techniques: vec![
                Technique {
                    id: "sds-page".into(),
                    title: "SDS-PAGE".into(),
                    icon: "🧬".into(),
                    coming_soon: false,
                    sets: vec![
                        set(1, "Set 1: Foundations", false),
                        set(2, "Set 2: Sample Preparation", false),
                        set(3, "Set 3: Running the Gel", false),
                        set(4, "Set 4: Staining and Analysis", false),
                        set(5, "Set 5: Calculations", true),
                    ],
                },
                coming_soon("dna-gel", "DNA Gel Electrophoresis", "🧪"),
                coming_soon("pcr", "Polymerase Chain Reaction", "⚗️"),
                coming_soon("qpcr", "qPCR", "📊"),
                coming_soon("ph", "pH", "💧"),
                coming_soon("spec", "OD and Spectrophotometer", "🔦"),
                coming_soon("rt-pcr", "RT-PCR", "🧬"),
                coming_soon("elisa", "ELISA", "🧫"),
                coming_soon("western", "Western Blotting", "🩹"),
                coming_soon("cloning", "Cloning", "🐑"),
            ],
            library: vec![Article {
                id: "patho-global-health".into(),
                title: "Pathophysiology of Global Health Discoveries".into(),
                author: "Journal of Bioskills".into(),
                year: "2024".into(),
                coming_soon: false,
            }],
        }
    }

    pub fn sets(&self) -> impl Iterator<Item = &SetEntry> {
        self.techniques.iter().flat_map(|t| t.sets.iter())
    }

    /// Look a set up by its id (`set-3`) or resource name.
    pub fn find_set(&self, key: &str) -> Option<&SetEntry> {
        self.sets().find(|s| s.id == key || s.resource == key)
    }

    /// Resolve a user-supplied key to a resource name. Unknown keys are
    /// passed through so custom files and URLs keep working.
    pub fn resource_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.find_set(key).map(|s| s.resource.as_str()).unwrap_or(key)
    }

    pub fn is_calculation(&self, resource: &str) -> bool {
        self.find_set(resource).is_some_and(|s| s.calculation)
    }
}
