use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ClearCategoryParams {
    #[schemars(description = "Category slug whose documentation should be cleared")]
    pub category_id: String,
}
