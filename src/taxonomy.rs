//! The fixed taxonomy of life-tracking categories.
//!
//! Categories and their sections are compiled into the binary - there is no
//! runtime creation or deletion. This module is the single source of truth:
//! every write path validates its `category_id` and `section_name` here
//! before touching storage.

use serde::Serialize;

use crate::error::ValidationError;

/// A top-level life-tracking domain with a fixed set of named sections.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    /// Stable slug used as the storage key (e.g. `"sleep"`).
    pub id: &'static str,
    /// Display name (e.g. `"Sleep"`).
    pub name: &'static str,
    /// Ordered section names, unique within the category.
    pub sections: &'static [&'static str],
}

impl Category {
    pub fn has_section(&self, section_name: &str) -> bool {
        self.sections.contains(&section_name)
    }
}

const CATEGORIES: &[Category] = &[
    Category {
        id: "journaling",
        name: "Journaling",
        sections: &["General notes", "Counting entries", "Cognitive therapy"],
    },
    Category {
        id: "sleep",
        name: "Sleep",
        sections: &["General notes", "Length of sleep", "Schedule", "Dreams"],
    },
    Category {
        id: "physical",
        name: "Physical Activity",
        sections: &["General notes", "Fitbit heart rate zones", "Strength training"],
    },
    Category {
        id: "social",
        name: "Social Engagement",
        sections: &["General notes", "In-person", "Text", "VC"],
    },
    Category {
        id: "productivity",
        name: "Productivity & Work",
        sections: &["General notes", "Cold Turkey", "iOS Screen Time"],
    },
    Category {
        id: "spiritual",
        name: "Spiritual Practice",
        sections: &["General notes", "Solo", "Group"],
    },
    Category {
        id: "self_care",
        name: "Basic Self-Care",
        sections: &["General notes", "Meals hygiene meds", "budget checklist medical appts"],
    },
];

/// All categories, in their fixed display order. Pure and infallible.
pub fn list_categories() -> &'static [Category] {
    CATEGORIES
}

/// Look up a category by slug.
pub fn find(category_id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == category_id)
}

/// Resolve a category slug or fail with a validation error.
pub fn validate_category(category_id: &str) -> Result<&'static Category, ValidationError> {
    find(category_id).ok_or_else(|| ValidationError::UnknownCategory(category_id.to_string()))
}

/// Check that `section_name` belongs to `category_id`.
pub fn validate_section(
    category_id: &str,
    section_name: &str,
) -> Result<&'static Category, ValidationError> {
    let category = validate_category(category_id)?;
    if !category.has_section(section_name) {
        return Err(ValidationError::UnknownSection {
            category: category_id.to_string(),
            section: section_name.to_string(),
        });
    }
    Ok(category)
}
