use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordObservationParams {
    #[schemars(description = "Category slug, e.g. 'sleep' or 'productivity'")]
    pub category_id: String,

    #[schemars(description = "Section name within the category, e.g. 'Dreams' or 'General notes'")]
    pub section_name: String,

    #[schemars(description = "The user-stated observation text to record")]
    pub observations: String,
}
