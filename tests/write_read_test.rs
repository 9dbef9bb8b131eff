mod helpers;

use helpers::{insert_observation_at, observation_count, test_db};
use lifelog::{store, taxonomy};

#[test]
fn every_taxonomy_pair_round_trips_through_summary() {
    let mut conn = test_db();

    for category in taxonomy::list_categories() {
        for section in category.sections {
            let text = format!("observation for {} / {section}", category.id);
            store::record_section_observation(&mut conn, category.id, section, &text).unwrap();
        }
    }

    for category in taxonomy::list_categories() {
        let summary = store::get_summary(&conn, category.id, 14).unwrap();
        for section in category.sections {
            let entries = summary
                .sections
                .get(*section)
                .unwrap_or_else(|| panic!("missing {} / {section}", category.id));
            assert_eq!(entries.len(), 1);
            assert!(entries[0].observation.contains(section));
        }
    }
}

#[test]
fn summary_orders_newest_first_with_row_id_tiebreak() {
    let mut conn = test_db();

    // Identical timestamps: insertion order must break the tie
    let now = chrono::Utc::now().to_rfc3339();
    insert_observation_at(&conn, "sleep", "Dreams", "first", &now);
    insert_observation_at(&conn, "sleep", "Dreams", "second", &now);
    store::record_section_observation(&mut conn, "sleep", "Dreams", "third").unwrap();

    let summary = store::get_summary(&conn, "sleep", 14).unwrap();
    let dreams = summary.sections.get("Dreams").unwrap();
    let texts: Vec<&str> = dreams.iter().map(|e| e.observation.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
}

#[test]
fn observations_older_than_the_window_are_hidden_but_retained() {
    let mut conn = test_db();

    let stale = (chrono::Utc::now() - chrono::Duration::days(15)).to_rfc3339();
    insert_observation_at(&conn, "physical", "Strength training", "old session", &stale);
    store::record_section_observation(&mut conn, "physical", "Strength training", "new session")
        .unwrap();

    let summary = store::get_summary(&conn, "physical", 14).unwrap();
    let entries = summary.sections.get("Strength training").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].observation, "new session");

    // The old row is still at the storage layer
    assert_eq!(observation_count(&conn, "physical"), 2);
}

#[test]
fn invalid_category_fails_every_operation_without_writing() {
    let mut conn = test_db();

    assert!(store::record_section_observation(&mut conn, "bogus", "General notes", "x").is_err());
    assert!(store::set_next_steps(&mut conn, "bogus", "x").is_err());
    assert!(store::add_notes(&mut conn, "bogus", "x").is_err());
    assert!(store::get_summary(&conn, "bogus", 14).is_err());
    assert!(store::clear_category(&mut conn, "bogus").is_err());

    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM section_observations", [], |r| r.get(0))
        .unwrap();
    assert_eq!(total, 0);
    let steps: String = conn
        .query_row(
            "SELECT next_steps FROM category_next_steps WHERE category_id = 'sleep'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(steps, "");
}

#[test]
fn next_steps_replace_and_notes_accumulate() {
    let mut conn = test_db();

    store::set_next_steps(&mut conn, "spiritual", "A").unwrap();
    store::set_next_steps(&mut conn, "spiritual", "B").unwrap();
    store::add_notes(&mut conn, "spiritual", "A").unwrap();
    store::add_notes(&mut conn, "spiritual", "B").unwrap();

    let summary = store::get_summary(&conn, "spiritual", 14).unwrap();
    assert_eq!(summary.next_steps, "B");
    assert_eq!(summary.notes, "A\nB");
}

#[test]
fn clear_zeroes_one_category_and_spares_the_rest() {
    let mut conn = test_db();

    for category in ["sleep", "social"] {
        store::record_section_observation(&mut conn, category, "General notes", "something")
            .unwrap();
        store::set_next_steps(&mut conn, category, "steps").unwrap();
        store::add_notes(&mut conn, category, "notes").unwrap();
    }

    store::clear_category(&mut conn, "sleep").unwrap();

    let sleep = store::get_summary(&conn, "sleep", 14).unwrap();
    assert!(sleep.sections.is_empty());
    assert_eq!(sleep.next_steps, "");
    assert_eq!(sleep.notes, "");
    // Rows survive as blank tombstones
    assert_eq!(observation_count(&conn, "sleep"), 1);

    let social = store::get_summary(&conn, "social", 14).unwrap();
    assert_eq!(social.sections.len(), 1);
    assert_eq!(social.next_steps, "steps");
    assert_eq!(social.notes, "notes");
}

#[test]
fn documentation_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifelog.db");

    {
        let mut conn = lifelog::db::open_database(&path).unwrap();
        store::record_section_observation(&mut conn, "journaling", "Counting entries", "3 entries")
            .unwrap();
        store::add_notes(&mut conn, "journaling", "on a streak").unwrap();
    }

    let conn = lifelog::db::open_database(&path).unwrap();
    let summary = store::get_summary(&conn, "journaling", 14).unwrap();
    assert_eq!(
        summary.sections.get("Counting entries").unwrap()[0].observation,
        "3 entries"
    );
    assert_eq!(summary.notes, "on a streak");
}
