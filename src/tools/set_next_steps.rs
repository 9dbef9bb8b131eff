use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SetNextStepsParams {
    #[schemars(description = "Category slug, e.g. 'sleep' or 'productivity'")]
    pub category_id: String,

    #[schemars(description = "The next steps text. Replaces any previous next steps.")]
    pub next_steps: String,
}
