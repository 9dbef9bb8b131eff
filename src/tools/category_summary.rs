use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CategorySummaryParams {
    #[schemars(description = "Category slug, e.g. 'sleep' or 'productivity'")]
    pub category_id: String,
}
