use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Takes no parameters.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListCategoriesParams {}
