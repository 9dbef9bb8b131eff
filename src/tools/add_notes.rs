use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddNotesParams {
    #[schemars(description = "Category slug, e.g. 'sleep' or 'productivity'")]
    pub category_id: String,

    #[schemars(description = "Notes text. Appended to any existing notes for the category.")]
    pub notes: String,
}
