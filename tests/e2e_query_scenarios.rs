mod common;

use common::cli::{TrkWorkspace, extract_json_payload, run_trk};
use serde_json::Value;

fn tag_names(payload: &str) -> Vec<String> {
    let tags: Vec<Value> = serde_json::from_str(payload).expect("tags json");
    tags.iter()
        .map(|tag| tag["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn e2e_suggestions_follow_trigger_rules() {
    let workspace = TrkWorkspace::new();
    run_trk(&workspace, ["init"]);
    for name in ["Home", "House", "Work"] {
        let added = run_trk(&workspace, ["tag", "add", name]);
        assert!(added.status.success(), "{}", added.stderr);
    }

    let matched = run_trk(&workspace, ["suggest", "#ho", "--json"]);
    assert!(matched.status.success(), "{}", matched.stderr);
    assert_eq!(
        tag_names(&extract_json_payload(&matched.stdout)),
        ["Home", "House"]
    );

    let everything = run_trk(&workspace, ["suggest", "#", "--json"]);
    assert_eq!(
        tag_names(&extract_json_payload(&everything.stdout)),
        ["Home", "House", "Work"]
    );

    let inactive = run_trk(&workspace, ["suggest", "ho", "--json"]);
    let tags: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&inactive.stdout)).unwrap();
    assert!(tags.is_empty(), "no trigger means no suggestions");
}

#[test]
fn e2e_missing_tags_are_the_unattached_set() {
    let workspace = TrkWorkspace::new();
    run_trk(&workspace, ["init"]);
    for name in ["Alpha", "Beta", "Gamma"] {
        run_trk(&workspace, ["tag", "add", name]);
    }

    let create = run_trk(&workspace, ["create", "Tagged once", "--tag", "Alpha"]);
    assert!(create.status.success(), "{}", create.stderr);
    let issue_id = create
        .stdout
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Created "))
        .and_then(|rest| rest.split(':').next())
        .unwrap_or("")
        .trim()
        .to_string();

    let missing = run_trk(&workspace, ["tag", "missing", issue_id.as_str(), "--json"]);
    assert!(missing.status.success(), "{}", missing.stderr);
    assert_eq!(
        tag_names(&extract_json_payload(&missing.stdout)),
        ["Beta", "Gamma"]
    );
}

#[test]
fn e2e_status_and_priority_filters() {
    let workspace = TrkWorkspace::new();
    run_trk(&workspace, ["init"]);

    let a = run_trk(&workspace, ["create", "High open", "--priority", "high"]);
    assert!(a.status.success(), "{}", a.stderr);
    let b = run_trk(&workspace, ["create", "Low done", "--priority", "low"]);
    let b_id = b
        .stdout
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Created "))
        .and_then(|rest| rest.split(':').next())
        .unwrap_or("")
        .trim()
        .to_string();
    run_trk(&workspace, ["update", b_id.as_str(), "--close"]);

    let open_only = run_trk(&workspace, ["list", "--status", "open", "--json"]);
    let issues: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&open_only.stdout)).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["title"], "High open");

    let high_only = run_trk(&workspace, ["list", "--priority", "high", "--json"]);
    let issues: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&high_only.stdout)).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["priority"], 2);

    let searched = run_trk(&workspace, ["list", "--search", "done", "--json"]);
    let issues: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&searched.stdout)).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["title"], "Low done");

    let counted = run_trk(&workspace, ["list", "--status", "closed", "--count"]);
    assert!(counted.status.success(), "{}", counted.stderr);
    assert_eq!(counted.stdout.trim(), "1");
}

#[test]
fn e2e_awards_unlock_from_activity() {
    let workspace = TrkWorkspace::new();
    run_trk(&workspace, ["init"]);

    let before = run_trk(&workspace, ["awards", "--json"]);
    let statuses: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&before.stdout)).unwrap();
    assert!(
        statuses
            .iter()
            .all(|status| status["earned"] == false),
        "fresh store should have no earned awards"
    );

    run_trk(&workspace, ["create", "One issue"]);
    run_trk(&workspace, ["tag", "add", "One tag"]);

    let after = run_trk(&workspace, ["awards", "--json"]);
    let statuses: Vec<Value> =
        serde_json::from_str(&extract_json_payload(&after.stdout)).unwrap();

    let earned: Vec<&str> = statuses
        .iter()
        .filter(|status| status["earned"] == true)
        .map(|status| status["name"].as_str().unwrap_or_default())
        .collect();
    assert!(earned.contains(&"First Steps"), "earned: {earned:?}");
    assert!(earned.contains(&"Labeler"), "earned: {earned:?}");
    assert!(!earned.contains(&"First Fix"), "nothing closed yet");
}
