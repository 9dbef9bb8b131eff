pub mod ingest;

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::agent::{self, Agent};
use crate::chat::{ChatSession, Orchestrator};
use crate::config::LifelogConfig;
use crate::store::CategorySummary;
use crate::{db, store, taxonomy};

type Db = Arc<Mutex<Connection>>;

fn build_orchestrator(config: &LifelogConfig) -> Result<(Orchestrator, Db)> {
    let conn = db::open_database(config.resolved_db_path())?;
    let db = Arc::new(Mutex::new(conn));
    let model = agent::create_model(&config.model)?;
    let orchestrator = Orchestrator::new(
        db.clone(),
        Agent::new(model),
        config.chat.history_window,
        config.storage.summary_window_days,
    );
    Ok((orchestrator, db))
}

fn lock_db(db: &Db) -> std::sync::MutexGuard<'_, Connection> {
    db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interactive chat loop.
pub fn chat(config: &LifelogConfig) -> Result<()> {
    let (orchestrator, db) = build_orchestrator(config)?;
    let mut session = ChatSession::new();

    println!("lifelog - conversational documentation");
    println!("Type 'categories' to list available categories");
    println!("Type 'save <category_id> <observations> | <next_steps> | <notes>' to save directly");
    println!("Type 'summary' to see the documentation summary");
    println!("Type 'quit' to exit");
    println!("{}", "=".repeat(50));
    println!("\nBot: {}", orchestrator.start().response);

    run_loop(&orchestrator, &db, &mut session)
}

/// Process a single message; optionally continue interactively.
pub fn message(config: &LifelogConfig, text: &str, interactive: bool) -> Result<()> {
    let (orchestrator, db) = build_orchestrator(config)?;
    let mut session = ChatSession::new();

    println!("Bot: {}", orchestrator.start().response);
    send_message(&orchestrator, &mut session, text);

    if interactive {
        run_loop(&orchestrator, &db, &mut session)?;
    }
    Ok(())
}

/// Process messages from a file, or stdin when `file` is `None`.
pub fn batch(config: &LifelogConfig, file: Option<PathBuf>, csv: bool) -> Result<()> {
    let (orchestrator, _db) = build_orchestrator(config)?;
    let mut session = ChatSession::new();

    let contents = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let messages: Vec<String> = if csv {
        contents.lines().filter_map(ingest::csv_first_column).collect()
    } else {
        contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    };

    println!("Bot: {}", orchestrator.start().response);
    for message in messages {
        println!("\nInput: {message}");
        send_message(&orchestrator, &mut session, &message);
        println!("{}", "=".repeat(60));
    }
    Ok(())
}

/// Print the windowed documentation summary for every category.
pub fn summary(config: &LifelogConfig) -> Result<()> {
    let (orchestrator, _db) = build_orchestrator(config)?;

    let mut found_any = false;
    for category in orchestrator.list_categories() {
        match orchestrator.get_summary(category.id) {
            Ok(summary) => {
                if summary.sections.is_empty()
                    && summary.next_steps.is_empty()
                    && summary.notes.is_empty()
                {
                    continue;
                }
                if !found_any {
                    println!("Documentation Summary (Last 2 Weeks)");
                    println!("{}", "=".repeat(40));
                    found_any = true;
                }
                println!("\n{}", category.name);
                render_summary(&summary);
            }
            Err(err) => eprintln!("Error getting summary for {}: {err}", category.name),
        }
    }

    if !found_any {
        println!("No documentation found for the specified period.");
    }
    Ok(())
}

fn run_loop(orchestrator: &Orchestrator, db: &Db, session: &mut ChatSession) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("\nYou: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line.to_lowercase().as_str() {
            "quit" | "exit" | "bye" => {
                println!("Goodbye!");
                break;
            }
            "categories" => {
                println!("\nAvailable Categories:");
                for category in orchestrator.list_categories() {
                    println!("- {} (id: {})", category.name, category.id);
                }
                continue;
            }
            "summary" => {
                for category in orchestrator.list_categories() {
                    if let Ok(summary) = orchestrator.get_summary(category.id) {
                        if !summary.sections.is_empty()
                            || !summary.next_steps.is_empty()
                            || !summary.notes.is_empty()
                        {
                            println!("\n{}", category.name);
                            render_summary(&summary);
                        }
                    }
                }
                continue;
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("save ") {
            save_documentation(db, rest);
            continue;
        }

        send_message(orchestrator, session, line);
    }
    Ok(())
}

fn send_message(orchestrator: &Orchestrator, session: &mut ChatSession, text: &str) {
    let reply = orchestrator.handle_message(session, text);
    println!("Bot: {}", reply.response);

    // After a documenting turn, show what's now on file
    if let Some(category_id) = session.current_category.clone() {
        if let Ok(summary) = orchestrator.get_summary(&category_id) {
            println!("\nDocumentation Updated: {category_id}");
            render_summary(&summary);
        }
    }
}

/// `save <category_id> <observations> | <next_steps> | <notes>` - direct
/// documentation write using the line-prefix section heuristic.
fn save_documentation(db: &Db, input: &str) {
    let parts: Vec<&str> = input.splitn(3, '|').collect();
    let head = parts[0].trim();
    let Some((category_id, observations)) = head.split_once(' ') else {
        println!("Invalid format. Use: save <category_id> <observations> | <next_steps> | <notes>");
        return;
    };
    let next_steps = parts.get(1).map(|s| s.trim()).unwrap_or("");
    let notes = parts.get(2).map(|s| s.trim()).unwrap_or("");

    let Some(category) = taxonomy::find(category_id) else {
        println!("Invalid category: {category_id}");
        return;
    };

    match save_direct(db, category, observations, next_steps, notes) {
        Ok(()) => println!("Documentation saved successfully!"),
        Err(err) => println!("Error saving documentation: {err}"),
    }
}

fn save_direct(
    db: &Db,
    category: &taxonomy::Category,
    observations: &str,
    next_steps: &str,
    notes: &str,
) -> Result<()> {
    let mut conn = lock_db(db);
    if !observations.is_empty() {
        for (section, text) in ingest::split_observations(category.sections, observations) {
            store::record_section_observation(&mut conn, category.id, &section, &text)?;
        }
    }
    if !next_steps.is_empty() {
        store::set_next_steps(&mut conn, category.id, next_steps)?;
    }
    if !notes.is_empty() {
        store::add_notes(&mut conn, category.id, notes)?;
    }
    Ok(())
}

fn render_summary(summary: &CategorySummary) {
    if !summary.sections.is_empty() {
        println!("\nObservations:");
        for (section, entries) in &summary.sections {
            println!("\n{section}:");
            for entry in entries {
                let timestamp = entry.timestamp.replace('T', " ");
                let timestamp = timestamp.split('.').next().unwrap_or(&timestamp);
                println!("[{timestamp}] {}", entry.observation);
            }
        }
    }
    if !summary.next_steps.is_empty() {
        println!("\nNext Steps:");
        println!("{}", summary.next_steps);
    }
    if !summary.notes.is_empty() {
        println!("\nNotes:");
        println!("{}", summary.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn save_direct_routes_sections_and_companion_fields() {
        let db: Db = Arc::new(Mutex::new(open_memory_database().unwrap()));
        let category = taxonomy::find("sleep").unwrap();

        save_direct(
            &db,
            category,
            "Dreams: flying\nSchedule: bed at 10pm",
            "keep the bedtime",
            "felt rested",
        )
        .unwrap();

        let conn = lock_db(&db);
        let summary = store::get_summary(&conn, "sleep", 14).unwrap();
        assert_eq!(summary.sections.get("Dreams").unwrap()[0].observation, "flying");
        assert_eq!(
            summary.sections.get("Schedule").unwrap()[0].observation,
            "bed at 10pm"
        );
        assert_eq!(summary.next_steps, "keep the bedtime");
        assert_eq!(summary.notes, "felt rested");
    }
}
