use super::*;
use crate::test_utils::setup_test_db;
use diesel::connection::SimpleConnection;

#[test]
fn test_create_task_defaults() {
    let pool = setup_test_db();

    let task = create_task(&pool, 3, "Chapter 1: Motion".to_string()).unwrap();

    assert_eq!(task.get_subject_id(), 3);
    assert_eq!(task.get_description(), "Chapter 1: Motion");
    assert!(!task.get_completed());
}

#[test]
fn test_create_task_for_missing_subject_succeeds() {
    let pool = setup_test_db();

    // No subject 999 exists; the dangling reference is stored as given
    let task = create_task(&pool, 999, "Orphan".to_string()).unwrap();
    assert_eq!(get_tasks_for_subject(&pool, 999).unwrap(), vec![task]);
}

#[test]
fn test_get_tasks_for_subject_filters_by_subject() {
    let pool = setup_test_db();

    let a1 = create_task(&pool, 1, "A1".to_string()).unwrap();
    create_task(&pool, 2, "B1".to_string()).unwrap();
    let a2 = create_task(&pool, 1, "A2".to_string()).unwrap();
    create_task(&pool, 3, "C1".to_string()).unwrap();

    let tasks = get_tasks_for_subject(&pool, 1).unwrap();
    assert_eq!(tasks, vec![a1, a2]);
    assert!(get_tasks_for_subject(&pool, 4).unwrap().is_empty());
}

#[test]
fn test_create_tasks_batch() {
    let pool = setup_test_db();

    let descriptions: Vec<String> = (1..=5).map(|n| format!("Chapter {}: Part {}", n, n)).collect();
    let tasks = create_tasks(&pool, 7, &descriptions).unwrap();

    assert_eq!(tasks.len(), 5);
    for (task, description) in tasks.iter().zip(&descriptions) {
        assert_eq!(task.get_subject_id(), 7);
        assert_eq!(&task.get_description(), description);
        assert!(!task.get_completed());
    }

    let mut ids: Vec<i32> = tasks.iter().map(|t| t.get_id()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert_eq!(get_tasks_for_subject(&pool, 7).unwrap(), tasks);
}

#[test]
fn test_create_tasks_empty_batch() {
    let pool = setup_test_db();
    assert!(create_tasks(&pool, 7, &[]).unwrap().is_empty());
}

#[test]
fn test_create_tasks_rolls_back_on_failure() {
    let pool = setup_test_db();

    // Make the second insert of the batch fail
    pool.get().unwrap().batch_execute(
        "CREATE TRIGGER reject_poison BEFORE INSERT ON tasks \
         WHEN NEW.description = 'poison' \
         BEGIN SELECT RAISE(ABORT, 'poisoned task'); END;"
    ).unwrap();

    let descriptions = vec!["first".to_string(), "poison".to_string(), "third".to_string()];
    assert!(create_tasks(&pool, 7, &descriptions).is_err());

    // No half-finished batch is left behind
    assert!(get_tasks_for_subject(&pool, 7).unwrap().is_empty());
}

#[test]
fn test_update_task_completed() {
    let pool = setup_test_db();

    let task = create_task(&pool, 1, "Read".to_string()).unwrap();
    let changes = TaskUpdate { completed: Some(true), ..Default::default() };

    let updated = update_task(&pool, task.get_id(), &changes).unwrap().unwrap();
    assert!(updated.get_completed());
    assert_eq!(updated.get_description(), "Read");
    assert_eq!(updated.get_subject_id(), 1);
    assert_eq!(get_task(&pool, task.get_id()).unwrap().unwrap(), updated);
}

#[test]
fn test_update_missing_task_is_none() {
    let pool = setup_test_db();

    let changes = TaskUpdate { completed: Some(true), ..Default::default() };
    assert!(update_task(&pool, 123, &changes).unwrap().is_none());
    assert!(get_task(&pool, 123).unwrap().is_none());
}
