//! Integration tests for the durable task store.
//!
//! Exercises the parser-to-store handoff the way the HTTP and CLI layers
//! drive it: parse, promote to a task, insert, query.

use chrono::{Duration, Local};
use tempfile::TempDir;

use taskling::command::CommandParser;
use taskling::error::StoreError;
use taskling::store::{DoneFilter, TaskSort, TaskStore};
use taskling::task::{Priority, Task};

fn open_store(dir: &TempDir) -> TaskStore {
    TaskStore::open(dir.path()).unwrap()
}

#[test]
fn parsed_commands_round_trip_through_the_store() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let parser = CommandParser::new();

    let parsed = parser.parse("remind me to submit report with high priority in school category");
    let task = Task::new(parsed.name, parsed.priority, parsed.category, parsed.due_date);
    store.insert(&task).unwrap();

    let found = store.find_by_name("submit report").unwrap().unwrap();
    assert_eq!(found.priority, Priority::High);
    assert_eq!(found.category, "school");
    assert!(!found.done);
}

#[test]
fn case_insensitive_uniqueness_maps_to_a_conflict() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .insert(&Task::new("Buy Milk", Priority::Low, "general", None))
        .unwrap();
    let err = store
        .insert(&Task::new("BUY MILK", Priority::High, "general", None))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName { .. }));
}

#[test]
fn listing_filters_by_done_state() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let open_task = Task::new("open", Priority::Low, "general", None);
    let done_task = Task::new("done", Priority::Low, "general", None);
    store.insert(&open_task).unwrap();
    store.insert(&done_task).unwrap();
    store.toggle(done_task.id).unwrap();

    let all = store.list(DoneFilter::Any, TaskSort::Created).unwrap();
    assert_eq!(all.len(), 2);

    let pending = store.list(DoneFilter::Pending, TaskSort::Created).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "open");

    let done = store.list(DoneFilter::Done, TaskSort::Created).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].name, "done");
}

#[test]
fn priority_sort_puts_highest_first() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .insert(&Task::new("low", Priority::Low, "general", None))
        .unwrap();
    store
        .insert(&Task::new("high", Priority::High, "general", None))
        .unwrap();
    store
        .insert(&Task::new("medium", Priority::Medium, "general", None))
        .unwrap();

    let tasks = store.list(DoneFilter::Any, TaskSort::Priority).unwrap();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["high", "medium", "low"]);
}

#[test]
fn due_sort_is_soonest_first_with_absent_last() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let now = Local::now();

    let mut next_week = Task::new("next week", Priority::Low, "general", None);
    next_week.due_date = Some(now + Duration::days(7));
    let mut tomorrow = Task::new("tomorrow", Priority::Low, "general", None);
    tomorrow.due_date = Some(now + Duration::days(1));
    let undated = Task::new("undated", Priority::Low, "general", None);

    store.insert(&undated).unwrap();
    store.insert(&next_week).unwrap();
    store.insert(&tomorrow).unwrap();

    let tasks = store.list(DoneFilter::Any, TaskSort::Due).unwrap();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["tomorrow", "next week", "undated"]);
}

#[test]
fn category_sort_is_ascending() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .insert(&Task::new("b", Priority::Low, "work", None))
        .unwrap();
    store
        .insert(&Task::new("a", Priority::Low, "errands", None))
        .unwrap();

    let tasks = store.list(DoneFilter::Any, TaskSort::Category).unwrap();
    let cats: Vec<&str> = tasks.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(cats, ["errands", "work"]);
}

#[test]
fn tasks_survive_a_store_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        let mut task = Task::new("persist me", Priority::Medium, "general", None);
        task.due_date = Some(Local::now() + Duration::days(3));
        store.insert(&task).unwrap();
    }

    let store = open_store(&dir);
    let found = store.find_by_name("persist me").unwrap().unwrap();
    assert_eq!(found.priority, Priority::Medium);
    assert!(found.due_date.is_some());
}

#[test]
fn deleting_by_name_frees_the_name() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .insert(&Task::new("ephemeral", Priority::Low, "general", None))
        .unwrap();
    store.remove_by_name("EPHEMERAL").unwrap();
    assert!(store.is_empty().unwrap());

    store
        .insert(&Task::new("ephemeral", Priority::Low, "general", None))
        .unwrap();
    assert_eq!(store.len().unwrap(), 1);
}
