use rusqlite::Connection;
use scheduler_core::db::open_db_in_memory;
use scheduler_core::{
    NewTask, RecurrenceRule, RepoError, SqliteTaskRepository, TaskDate, TaskListQuery,
    TaskRepository,
};

fn date(value: &str) -> TaskDate {
    TaskDate::parse(value).unwrap()
}

fn new_task(day: &str, title: &str, repeat: RecurrenceRule) -> NewTask {
    NewTask {
        date: date(day),
        title: title.to_string(),
        comment: String::new(),
        repeat,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut task = new_task("20250601", "dentist", RecurrenceRule::Yearly);
    task.comment = "bring forms".to_string();
    let id = repo.create_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded, task.with_id(id));
}

#[test]
fn identifiers_are_unique_and_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let first = repo
        .create_task(&new_task("20250601", "a", RecurrenceRule::None))
        .unwrap();
    let second = repo
        .create_task(&new_task("20250601", "b", RecurrenceRule::None))
        .unwrap();
    assert_ne!(first, second);

    repo.update_task_date(first, date("20250701")).unwrap();
    assert_eq!(repo.get_task(first).unwrap().unwrap().id, first);
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    assert!(repo.get_task(42).unwrap().is_none());
}

#[test]
fn list_is_ordered_by_date_then_id_and_respects_limit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let late = repo
        .create_task(&new_task("20250910", "late", RecurrenceRule::None))
        .unwrap();
    let early = repo
        .create_task(&new_task("20250102", "early", RecurrenceRule::None))
        .unwrap();
    let same_day = repo
        .create_task(&new_task("20250102", "same day", RecurrenceRule::None))
        .unwrap();

    let ids = repo
        .list_tasks(&TaskListQuery::default())
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![early, same_day, late]);

    let limited = repo.list_tasks(&TaskListQuery { limit: Some(1) }).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, early);
}

#[test]
fn update_replaces_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("20250601", "draft", RecurrenceRule::None))
        .unwrap();
    let mut task = repo.get_task(id).unwrap().unwrap();
    task.date = date("20240101");
    task.title = "final".to_string();
    task.comment = "note".to_string();
    task.repeat = RecurrenceRule::Daily { interval_days: 14 };
    repo.update_task(&task).unwrap();

    assert_eq!(repo.get_task(id).unwrap().unwrap(), task);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = new_task("20250601", "ghost", RecurrenceRule::None).with_id(77);
    let err = repo.update_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));

    let err = repo.update_task_date(77, date("20250601")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(77)));
}

#[test]
fn delete_reports_rows_affected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = repo
        .create_task(&new_task("20250601", "once", RecurrenceRule::None))
        .unwrap();
    assert_eq!(repo.delete_task(id).unwrap(), 1);
    assert_eq!(repo.delete_task(id).unwrap(), 0);
    assert!(repo.get_task(id).unwrap().is_none());
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let err = repo
        .create_task(&new_task("20250601", "   ", RecurrenceRule::None))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let id = repo
        .create_task(&new_task("20250601", "valid", RecurrenceRule::None))
        .unwrap();
    let mut task = repo.get_task(id).unwrap().unwrap();
    task.title = String::new();
    let err = repo.update_task(&task).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn invalid_persisted_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO scheduler (date, title, repeat) VALUES ('2025-06-01', 'bad date', '');
         INSERT INTO scheduler (date, title, repeat) VALUES ('20250601', 'bad rule', 'w 1');",
    )
    .unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    assert!(matches!(repo.get_task(1), Err(RepoError::InvalidData(_))));
    assert!(matches!(repo.get_task(2), Err(RepoError::InvalidData(_))));
    assert!(matches!(
        repo.list_tasks(&TaskListQuery::default()),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn atomically_rolls_back_on_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let id = repo
        .create_task(&new_task("20250601", "keep me", RecurrenceRule::None))
        .unwrap();

    let result: Result<(), RepoError> = repo.atomically(|repo| {
        repo.delete_task(id)?;
        Err(RepoError::InvalidData("abort".to_string()))
    });
    assert!(result.is_err());
    assert!(repo.get_task(id).unwrap().is_some());

    let committed: Result<usize, RepoError> = repo.atomically(|repo| repo.delete_task(id));
    assert_eq!(committed.unwrap(), 1);
    assert!(repo.get_task(id).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
