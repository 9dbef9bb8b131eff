//! The tool surface - the only interface the agent may use to read or
//! mutate documentation.
//!
//! Tools form a closed set: [`ToolCall`] is a tagged enum with one variant
//! per operation, each carrying a typed argument record, and [`dispatch`]
//! handles every variant exhaustively. [`ToolCall::parse`] turns a
//! `(name, json arguments)` pair from the model into a variant, rejecting
//! unknown names and mismatched arguments. [`specs`] produces the table of
//! name, description, and parameter schema that is handed to the model; the
//! description text spells out the required keys literally, since it is the
//! model's only source of truth for argument shape.

pub mod add_notes;
pub mod category_summary;
pub mod clear_category;
pub mod list_categories;
pub mod record_observation;
pub mod set_next_steps;

use rusqlite::Connection;
use schemars::{schema_for, JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ToolError;
use crate::store;
use add_notes::AddNotesParams;
use category_summary::CategorySummaryParams;
use clear_category::ClearCategoryParams;
use list_categories::ListCategoriesParams;
use record_observation::RecordObservationParams;
use set_next_steps::SetNextStepsParams;

/// One entry in the name-indexed tool table handed to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Schema,
}

/// A validated, fully-typed tool invocation.
#[derive(Debug)]
pub enum ToolCall {
    RecordSectionObservation(RecordObservationParams),
    SetNextSteps(SetNextStepsParams),
    AddNotes(AddNotesParams),
    GetCategorySummary(CategorySummaryParams),
    ClearCategory(ClearCategoryParams),
    ListCategories,
}

/// Result of a dispatched tool call: the acknowledgement or serialized data
/// to feed back to the model, plus the category the call touched (used to
/// track the conversation's current category).
#[derive(Debug)]
pub struct ToolOutcome {
    pub message: String,
    pub category_id: Option<String>,
}

impl ToolCall {
    /// Parse a `(name, arguments)` pair as emitted by the model.
    ///
    /// Unknown names fail with [`ToolError::UnknownTool`]; missing, extra,
    /// or ill-typed keys fail with [`ToolError::InvalidArguments`].
    pub fn parse(name: &str, arguments: serde_json::Value) -> Result<Self, ToolError> {
        match name {
            "record_section_observation" => {
                Ok(Self::RecordSectionObservation(parse_args(name, arguments)?))
            }
            "set_category_next_steps" => Ok(Self::SetNextSteps(parse_args(name, arguments)?)),
            "add_category_notes" => Ok(Self::AddNotes(parse_args(name, arguments)?)),
            "get_category_summary" => Ok(Self::GetCategorySummary(parse_args(name, arguments)?)),
            "clear_category" => Ok(Self::ClearCategory(parse_args(name, arguments)?)),
            "list_categories" => {
                let _: ListCategoriesParams = parse_args(name, arguments)?;
                Ok(Self::ListCategories)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    /// The category this call targets, if any.
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::RecordSectionObservation(p) => Some(&p.category_id),
            Self::SetNextSteps(p) => Some(&p.category_id),
            Self::AddNotes(p) => Some(&p.category_id),
            Self::GetCategorySummary(p) => Some(&p.category_id),
            Self::ClearCategory(p) => Some(&p.category_id),
            Self::ListCategories => None,
        }
    }
}

fn parse_args<T: DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    // The model may omit the arguments object entirely for no-arg tools
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Execute a tool call against the documentation store.
///
/// Each call is its own atomic unit: a failure here never rolls back other
/// calls made in the same turn.
pub fn dispatch(
    conn: &mut Connection,
    window_days: i64,
    call: ToolCall,
) -> Result<ToolOutcome, ToolError> {
    match call {
        ToolCall::RecordSectionObservation(p) => {
            let message = store::record_section_observation(
                conn,
                &p.category_id,
                &p.section_name,
                &p.observations,
            )?;
            Ok(ToolOutcome {
                message,
                category_id: Some(p.category_id),
            })
        }
        ToolCall::SetNextSteps(p) => {
            let message = store::set_next_steps(conn, &p.category_id, &p.next_steps)?;
            Ok(ToolOutcome {
                message,
                category_id: Some(p.category_id),
            })
        }
        ToolCall::AddNotes(p) => {
            let message = store::add_notes(conn, &p.category_id, &p.notes)?;
            Ok(ToolOutcome {
                message,
                category_id: Some(p.category_id),
            })
        }
        ToolCall::GetCategorySummary(p) => {
            let summary = store::get_summary(conn, &p.category_id, window_days)?;
            Ok(ToolOutcome {
                message: serde_json::to_string(&summary)?,
                category_id: Some(p.category_id),
            })
        }
        ToolCall::ClearCategory(p) => {
            let message = store::clear_category(conn, &p.category_id)?;
            Ok(ToolOutcome {
                message,
                category_id: Some(p.category_id),
            })
        }
        ToolCall::ListCategories => Ok(ToolOutcome {
            message: serde_json::to_string(store::list_categories())?,
            category_id: None,
        }),
    }
}

/// The full tool table: names, prompt descriptions, and parameter schemas.
pub fn specs() -> Vec<ToolSpec> {
    vec![
        spec::<RecordObservationParams>(
            "record_section_observation",
            "Record an observation for a specific section of a life-tracking category. \
             Required parameters: {\"category_id\": \"category slug\", \"section_name\": \
             \"section name\", \"observations\": \"observation text\"}",
        ),
        spec::<SetNextStepsParams>(
            "set_category_next_steps",
            "Set next steps for a life-tracking category, replacing any previous next steps. \
             Required parameters: {\"category_id\": \"category slug\", \"next_steps\": \
             \"next steps text\"}",
        ),
        spec::<AddNotesParams>(
            "add_category_notes",
            "Add notes to a life-tracking category. Notes accumulate across calls. \
             Required parameters: {\"category_id\": \"category slug\", \"notes\": \"notes text\"}",
        ),
        spec::<CategorySummaryParams>(
            "get_category_summary",
            "Get the recent documentation summary for a category. \
             Required parameters: {\"category_id\": \"category slug\"}",
        ),
        spec::<ClearCategoryParams>(
            "clear_category",
            "Clear all documentation for a category. \
             Required parameters: {\"category_id\": \"category slug\"}",
        ),
        spec::<ListCategoriesParams>(
            "list_categories",
            "List the available life-tracking categories and their sections. Takes no parameters.",
        ),
    ]
}

fn spec<T: JsonSchema>(name: &'static str, description: &'static str) -> ToolSpec {
    ToolSpec {
        name,
        description,
        parameters: schema_for!(T),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_unknown_tool_fails() {
        let err = ToolCall::parse("write_poem", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "write_poem"));
    }

    #[test]
    fn parse_missing_key_fails() {
        let err = ToolCall::parse(
            "record_section_observation",
            json!({"category_id": "sleep", "section_name": "Dreams"}),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "record_section_observation"));
    }

    #[test]
    fn parse_extra_key_fails() {
        let err = ToolCall::parse(
            "clear_category",
            json!({"category_id": "sleep", "force": true}),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn parse_list_categories_accepts_null_args() {
        let call = ToolCall::parse("list_categories", serde_json::Value::Null).unwrap();
        assert!(call.category_id().is_none());
    }

    #[test]
    fn dispatch_record_then_summary() {
        let mut conn = crate::db::open_memory_database().unwrap();

        let call = ToolCall::parse(
            "record_section_observation",
            json!({
                "category_id": "sleep",
                "section_name": "Length of sleep",
                "observations": "Slept 8 hours"
            }),
        )
        .unwrap();
        let outcome = dispatch(&mut conn, 14, call).unwrap();
        assert_eq!(outcome.category_id.as_deref(), Some("sleep"));

        let call = ToolCall::parse("get_category_summary", json!({"category_id": "sleep"})).unwrap();
        let outcome = dispatch(&mut conn, 14, call).unwrap();
        assert!(outcome.message.contains("Slept 8 hours"));
    }

    #[test]
    fn dispatch_validation_error_surfaces() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let call = ToolCall::parse("clear_category", json!({"category_id": "nope"})).unwrap();
        let err = dispatch(&mut conn, 14, call).unwrap_err();
        assert!(matches!(err, ToolError::Store(ref e) if e.is_validation()));
    }

    #[test]
    fn specs_cover_every_tool_name() {
        let names: Vec<&str> = specs().iter().map(|s| s.name).collect();
        for name in [
            "record_section_observation",
            "set_category_next_steps",
            "add_category_notes",
            "get_category_summary",
            "clear_category",
            "list_categories",
        ] {
            assert!(names.contains(&name), "{name}");
        }
    }

    #[test]
    fn descriptions_enumerate_required_keys() {
        for s in specs() {
            match s.name {
                "record_section_observation" => {
                    assert!(s.description.contains("category_id"));
                    assert!(s.description.contains("section_name"));
                    assert!(s.description.contains("observations"));
                }
                "set_category_next_steps" => assert!(s.description.contains("next_steps")),
                "add_category_notes" => assert!(s.description.contains("notes")),
                _ => {}
            }
        }
    }
}
