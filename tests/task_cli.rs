mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestEnv;

fn short(id: &str) -> &str {
    &id[..8]
}

fn list_all(env: &TestEnv) -> Value {
    env.json(&["list", "--all"])
}

#[test]
fn add_done_stats_round_trip() {
    let env = TestEnv::new();
    let id = env.add(&[
        "Run",
        "-d",
        "5k run",
        "-c",
        "exercise",
        "-p",
        "5",
        "--date",
        "2024-01-01",
    ]);

    let done = env.json(&["done", short(&id)]);
    assert_eq!(done["command"], "done");
    assert_eq!(done["data"]["points"], 55);
    assert_eq!(done["data"]["total_points"], 55);
    assert_eq!(done["data"]["current_streak"], 1);
    assert_eq!(done["data"]["task"]["completed"], true);
    assert!(!done["data"]["message"].as_str().unwrap().is_empty());
    let unlocked: Vec<&str> = done["data"]["unlocked"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap())
        .collect();
    assert!(unlocked.contains(&"first_task"));

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total_points"], 55);
    assert_eq!(stats["data"]["total_tasks_completed"], 1);
    assert_eq!(stats["data"]["tasks_by_category"]["Exercise"], 1);
    assert_eq!(stats["data"]["daily_points"]["2024-01-01"], 55);
    assert_eq!(stats["data"]["current_streak"], 1);

    let achievements = env.json(&["achievements"]);
    assert!(achievements["data"]["unlocked"].as_u64().unwrap() >= 1);
    assert_eq!(achievements["data"]["total"], 21);
}

#[test]
fn completing_twice_awards_points_once() {
    let env = TestEnv::new();
    let id = env.add(&["Read", "-p", "2"]);

    env.json(&["done", &id]);
    let again = env.json(&["done", &id]);
    assert_eq!(again["data"]["already_completed"], true);

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total_points"], 20);
    assert_eq!(stats["data"]["total_tasks_completed"], 1);
}

#[test]
fn add_schedules_today_by_default() {
    let env = TestEnv::new();
    env.add(&["Today task"]);
    env.add(&["Someday", "--unscheduled"]);
    env.add(&["Later", "--date", "2099-12-31"]);

    let today = env.json(&["list"]);
    assert_eq!(today["data"]["total"], 1);
    assert_eq!(today["data"]["tasks"][0]["title"], "Today task");
    assert_eq!(today["data"]["tasks"][0]["category"], "Other");
    assert_eq!(today["data"]["tasks"][0]["priority"], 3);

    let later = env.json(&["list", "--date", "2099-12-31"]);
    assert_eq!(later["data"]["total"], 1);

    let all = list_all(&env);
    assert_eq!(all["data"]["total"], 3);
    assert!(all["data"]["tasks"][1]["scheduled_date"].is_null());
}

#[test]
fn list_sorts_open_tasks_first_then_priority() {
    let env = TestEnv::new();
    let low = env.add(&["Low", "-p", "1", "--date", "2024-02-01"]);
    env.add(&["High", "-p", "5", "--date", "2024-02-01"]);
    let top = env.add(&["Top", "-p", "5", "--date", "2024-02-01"]);
    env.json(&["done", &top]);

    let agenda = env.json(&["list", "--date", "2024-02-01"]);
    let titles: Vec<&str> = agenda["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["High", "Low", "Top"]);

    let filtered = env.json(&["list", "--all", "--category", "other"]);
    assert_eq!(filtered["data"]["total"], 3);
    assert_eq!(filtered["data"]["tasks"][0]["id"], low.as_str());
}

#[test]
fn unknown_category_is_kept_with_warning() {
    let env = TestEnv::new();
    let value = env.json(&["add", "Paint", "-c", "Art"]);
    assert_eq!(value["data"]["task"]["category"], "Art");
    assert!(value["warnings"][0].as_str().unwrap().contains("Art"));
}

#[test]
fn edit_changes_only_given_fields() {
    let env = TestEnv::new();
    let id = env.add(&["Draft", "-d", "first pass", "-p", "2", "--date", "2024-03-01"]);

    let edited = env.json(&["edit", short(&id), "--title", "Final", "-p", "4"]);
    let task = &edited["data"]["task"];
    assert_eq!(task["title"], "Final");
    assert_eq!(task["priority"], 4);
    assert_eq!(task["description"], "first pass");
    assert_eq!(task["scheduled_date"], "2024-03-01");
    assert_eq!(task["completed"], false);
}

#[test]
fn edit_without_fields_is_rejected() {
    let env = TestEnv::new();
    let id = env.add(&["Draft"]);
    let err = env.json_error(&["edit", &id], 2);
    assert_eq!(err["error"]["kind"], "user_error");
}

#[test]
fn invalid_input_is_a_validation_error() {
    let env = TestEnv::new();

    let err = env.json_error(&["add", "Bad", "-p", "9"], 2);
    assert_eq!(err["command"], "add");
    assert_eq!(err["error"]["kind"], "validation");

    let err = env.json_error(&["add", "   "], 2);
    assert_eq!(err["error"]["kind"], "validation");

    let err = env.json_error(&["add", "Bad date", "--date", "2024-13-01"], 2);
    assert_eq!(err["error"]["kind"], "validation");

    assert!(!env.data_file().exists());
}

#[test]
fn unknown_id_is_not_found() {
    let env = TestEnv::new();
    env.add(&["Something"]);

    let err = env.json_error(&["done", "zzzz"], 2);
    assert_eq!(err["error"]["kind"], "not_found");
    assert_eq!(err["next_steps"][0], "motiva list --all");

    env.cmd()
        .args(["rm", "zzzz"])
        .assert()
        .code(2)
        .stderr(contains("Task not found"));
}

#[test]
fn deleting_completed_task_removes_points() {
    let env = TestEnv::new();
    let id = env.add(&["Read", "-p", "3"]);
    env.json(&["done", &id]);

    let removed = env.json(&["rm", &id]);
    assert_eq!(removed["data"]["points_removed"], 30);

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total_points"], 0);
    assert_eq!(stats["data"]["total_tasks_completed"], 0);
    assert_eq!(list_all(&env)["data"]["total"], 0);
}

#[test]
fn calendar_summarizes_days() {
    let env = TestEnv::new();
    let first = env.add(&["A", "-p", "5", "--date", "2024-01-01"]);
    env.add(&["B", "-p", "1", "--date", "2024-01-01"]);
    env.add(&["C", "-p", "4", "--date", "2024-01-02"]);
    env.add(&["Loose", "--unscheduled"]);
    env.json(&["done", &first]);

    let calendar = env.json(&["calendar"]);
    let days = calendar["data"]["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2024-01-01");
    assert_eq!(days[0]["total"], 2);
    assert_eq!(days[0]["completed"], 1);
    assert_eq!(days[0]["status"], "partial");
    assert_eq!(days[1]["status"], "pending");
    assert_eq!(days[1]["high_priority"], 1);
}

#[test]
fn name_is_saved_and_used_in_greeting() {
    let env = TestEnv::new();
    let shown = env.json(&["name"]);
    assert!(shown["data"]["name"].is_null());

    let set = env.json(&["name", "Ana"]);
    assert_eq!(set["data"]["name"], "Ana");
    assert_eq!(set["data"]["changed"], true);

    let today = env.json(&["today"]);
    assert!(today["data"]["greeting"].as_str().unwrap().contains("Ana"));

    let err = env.json_error(&["name", "  "], 2);
    assert_eq!(err["error"]["kind"], "validation");
}

#[test]
fn today_shows_agenda() {
    let env = TestEnv::new();
    let id = env.add(&["Stretch", "-c", "Health"]);
    env.json(&["done", &id]);
    env.add(&["Walk", "-c", "Health"]);

    let today = env.json(&["today"]);
    assert_eq!(today["data"]["completed_today"], 1);
    assert_eq!(today["data"]["current_streak"], 1);
    assert_eq!(today["data"]["tasks"][0]["title"], "Walk");
}

#[test]
fn quiet_suppresses_human_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "Silent", "-q"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
}
