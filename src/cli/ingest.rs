//! Best-effort free-text helpers for batch ingestion.
//!
//! Line-prefix section splitting is inherently heuristic; it lives here,
//! outside the documentation core, and is not part of the tool surface.

/// Split free-form observation text into per-section chunks by matching
/// `Section name:` line prefixes (case-insensitive).
///
/// With a single section the whole text maps to it. With several, lines
/// before the first matched prefix are dropped, and unmatched lines are
/// appended to the most recent section.
pub fn split_observations(sections: &[&str], text: &str) -> Vec<(String, String)> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if sections.len() == 1 {
        return vec![(sections[0].to_string(), text.to_string())];
    }

    let mut chunks: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        let lower = line.to_lowercase();
        let matched = sections
            .iter()
            .find(|section| lower.starts_with(&format!("{}:", section.to_lowercase())));

        if let Some(section) = matched {
            let rest = line[section.len() + 1..].trim().to_string();
            chunks.push((section.to_string(), rest));
        } else if let Some(last) = chunks.last_mut() {
            if !last.1.is_empty() {
                last.1.push('\n');
            }
            last.1.push_str(line.trim());
        }
    }
    chunks
}

/// First column of a CSV line. Handles a double-quoted field with doubled
/// inner quotes; no full CSV grammar.
pub fn csv_first_column(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let field = if let Some(rest) = line.strip_prefix('"') {
        let mut field = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    break;
                }
            } else {
                field.push(c);
            }
        }
        field
    } else {
        line.split(',').next().unwrap_or(line).trim().to_string()
    };

    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_section_takes_everything() {
        let chunks = split_observations(&["General notes"], "slept well\nno dreams");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].0, "General notes");
        assert_eq!(chunks[0].1, "slept well\nno dreams");
    }

    #[test]
    fn prefixed_lines_route_to_their_sections() {
        let sections = ["General notes", "Dreams", "Schedule"];
        let chunks = split_observations(
            &sections,
            "Dreams: flying over the city\nSchedule: bed at 10pm\nup at 6am",
        );
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], ("Dreams".to_string(), "flying over the city".to_string()));
        assert_eq!(
            chunks[1],
            ("Schedule".to_string(), "bed at 10pm\nup at 6am".to_string())
        );
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let chunks = split_observations(&["Dreams", "Schedule"], "dreams: none recalled");
        assert_eq!(chunks[0].0, "Dreams");
        assert_eq!(chunks[0].1, "none recalled");
    }

    #[test]
    fn unprefixed_text_with_multiple_sections_is_dropped() {
        let chunks = split_observations(&["Dreams", "Schedule"], "just some text");
        assert!(chunks.is_empty());
    }

    #[test]
    fn csv_first_column_plain_and_quoted() {
        assert_eq!(csv_first_column("hello,world"), Some("hello".to_string()));
        assert_eq!(
            csv_first_column("\"slept 8, maybe 9 hours\",extra"),
            Some("slept 8, maybe 9 hours".to_string())
        );
        assert_eq!(
            csv_first_column("\"said \"\"hi\"\"\",x"),
            Some("said \"hi\"".to_string())
        );
        assert_eq!(csv_first_column(""), None);
    }
}
