//! E2E Scenario: CLI Workflow
//!
//! Drives the `dvds` binary through reindex, search, index, remove and stats
//! with robot output.

use super::fixture::{DIMS, E2EFixture, sample_items};

#[test]
fn reindex_search_remove_roundtrip() {
    let mut fixture = E2EFixture::new("cli_roundtrip");
    fixture.write_catalog(&sample_items());

    fixture.log_step("Reindex catalog");
    let output = fixture.run_dvds(&["--robot", "reindex"]);
    fixture.assert_success(&output, "reindex");
    let json = output.json();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["indexed"], 4);
    assert_eq!(json["skipped"], serde_json::json!([5]));

    fixture.log_step("Search with genre filter");
    let output = fixture.run_dvds(&[
        "--robot", "search", "astronaut in space", "--genre", "Sci-Fi", "--limit", "5",
    ]);
    fixture.assert_success(&output, "search");
    let json = output.json();
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"][0]["item_id"], 1);
    assert_eq!(json["results"][0]["title"], "Space Odyssey");
    assert_eq!(json["results"][0]["rank"], 1);

    fixture.log_step("Stats");
    let output = fixture.run_dvds(&["--robot", "stats"]);
    fixture.assert_success(&output, "stats");
    let json = output.json();
    assert_eq!(json["records"], 4);
    assert_eq!(json["dims"], DIMS);
    assert_eq!(json["backend"], "hash");

    fixture.log_step("Remove twice");
    let output = fixture.run_dvds(&["--robot", "remove", "1"]);
    fixture.assert_success(&output, "remove");
    assert_eq!(output.json()["removed"], true);
    let output = fixture.run_dvds(&["--robot", "remove", "1"]);
    assert_eq!(output.json()["removed"], false);

    fixture.log_step("Removed item no longer appears");
    let output = fixture.run_dvds(&["--robot", "search", "astronaut in space"]);
    fixture.assert_success(&output, "search after remove");
    let results = output.json()["results"].as_array().cloned().unwrap_or_default();
    assert!(results.iter().all(|r| r["item_id"] != 1));
}

#[test]
fn index_errors_are_structured() {
    let mut fixture = E2EFixture::new("cli_index_errors");
    fixture.write_catalog(&sample_items());

    fixture.log_step("Unknown catalog id");
    let output = fixture.run_dvds(&["--robot", "index", "999"]);
    assert!(!output.success);
    let json = output.json();
    assert_eq!(json["error"], true);
    assert_eq!(json["kind"], "NOT_FOUND");
    assert_eq!(json["code"], 400);

    fixture.log_step("Item without description");
    let output = fixture.run_dvds(&["--robot", "index", "5"]);
    assert!(!output.success);
    assert_eq!(output.json()["kind"], "INVALID_INPUT");

    fixture.log_step("Indexable item");
    let output = fixture.run_dvds(&["--robot", "index", "2"]);
    fixture.assert_success(&output, "index 2");
    assert_eq!(output.json()["title"], "Big Top");
}

#[test]
fn search_failure_differs_from_empty_result() {
    let mut fixture = E2EFixture::new("cli_search_errors");
    fixture.write_catalog(&sample_items());

    fixture.log_step("Empty store returns an empty result");
    let output = fixture.run_dvds(&["--robot", "search", "astronaut"]);
    fixture.assert_success(&output, "search empty store");
    assert_eq!(output.json()["count"], 0);

    fixture.log_step("Blank query is an error");
    let output = fixture.run_dvds(&["--robot", "search", "   "]);
    assert!(!output.success);
    assert_eq!(output.json()["kind"], "INVALID_INPUT");

    fixture.log_step("Zero limit is an error");
    let output = fixture.run_dvds(&["--robot", "search", "astronaut", "--limit", "0"]);
    assert!(!output.success);
    assert_eq!(output.json()["context"]["limit"], 0);
}
