//! System prompt construction.
//!
//! The prompt carries the behavioral contract the tool dispatcher depends
//! on: document only explicitly-stated facts, make no tool calls for
//! declines or short acknowledgements, and split multi-fact messages into
//! independent tool calls. Tool descriptions are included verbatim; they
//! are the model's only source of truth for argument shape.

use crate::taxonomy;
use crate::tools::ToolSpec;

/// Build the system prompt from the taxonomy and tool table.
pub fn system_prompt(tools: &[ToolSpec]) -> String {
    let mut out = String::from(
        "You are a friendly and empathetic documentation assistant. Your goal is to have \
         natural conversations while helping document the user's experiences in a fixed set \
         of life-tracking categories.\n\nAvailable categories:\n",
    );

    for category in taxonomy::list_categories() {
        out.push_str(&format!(
            "- {}: {} (sections: {})\n",
            category.id,
            category.name,
            category.sections.join(", ")
        ));
    }

    out.push_str("\nAvailable documentation tools:\n");
    for tool in tools {
        out.push_str(&format!("- {}: {}\n", tool.name, tool.description));
    }

    out.push_str(
        "\nRules:\n\
         - Only document facts the user has explicitly stated. Never infer, assume, or embellish.\n\
         - If the user declines to share something, or sends a short acknowledgement like \
           \"ok\", \"thanks\" or \"bye\", do not call any tools; just reply naturally.\n\
         - A single message may contain several distinct facts. Document each one with its \
           own tool call, choosing the most specific section that fits.\n\
         - Category ids and section names must be taken exactly from the lists above.\n\
         - After documenting, reply with a warm, natural message. Never mention the tools \
           or the documentation system itself.\n",
    );

    out
}
