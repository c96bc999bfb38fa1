//! The 21 canonical slots, grouped into five fixed categories.

use serde::{Deserialize, Serialize};

/// A slot category. Declaration order is the order slots are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Project,
    Frontend,
    Backend,
    Universal,
    Human,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Project,
        Category::Frontend,
        Category::Backend,
        Category::Universal,
        Category::Human,
    ];

    /// The fixed slot paths owned by this category.
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            Category::Project => PROJECT_SLOTS,
            Category::Frontend => FRONTEND_SLOTS,
            Category::Backend => BACKEND_SLOTS,
            Category::Universal => UNIVERSAL_SLOTS,
            Category::Human => HUMAN_SLOTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Universal => "universal",
            Category::Human => "human",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PROJECT_SLOTS: &[&str] = &["project.name", "project.goal", "project.main_language"];

pub const FRONTEND_SLOTS: &[&str] = &[
    "stack.frontend",
    "stack.css_framework",
    "stack.ui_library",
    "stack.state_management",
];

pub const BACKEND_SLOTS: &[&str] = &[
    "stack.backend",
    "stack.api_type",
    "stack.runtime",
    "stack.database",
    "stack.connection",
];

pub const UNIVERSAL_SLOTS: &[&str] = &["stack.hosting", "stack.build", "stack.cicd"];

pub const HUMAN_SLOTS: &[&str] = &[
    "human.who",
    "human.what",
    "human.why",
    "human.where",
    "human.when",
    "human.how",
];

/// Every slot path across all categories, in declaration order.
pub fn all_slots() -> impl Iterator<Item = &'static str> {
    Category::ALL.into_iter().flat_map(|c| c.slots().iter().copied())
}

/// Map a dotted slot path to the document location holding its value.
///
/// Human slots live under the `human_context` section of the document.
pub fn document_path(slot: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = slot.split('.').collect();
    if parts.first() == Some(&"human") {
        parts[0] = "human_context";
    }
    parts
}
