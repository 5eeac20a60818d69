mod common;

use common::person;
use digiwork_core::db::open_db_in_memory;
use digiwork_core::{
    DirectoryService, PersonListQuery, PersonRepository, PersonValidationError, RepoError,
    SqlitePersonRepository,
};

#[test]
fn insert_and_list_all_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let first = person("Ana", "V-1001");
    let second = person("Luis", "V-1002");
    let first_id = repo.insert_person(&first).unwrap();
    let second_id = repo.insert_person(&second).unwrap();
    assert!(second_id > first_id);

    let all = repo.list_all().unwrap();
    assert_eq!(all, vec![first.into_record(first_id), second.into_record(second_id)]);
}

#[test]
fn duplicate_national_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    repo.insert_person(&person("Ana", "V-1001")).unwrap();
    let err = repo.insert_person(&person("Otra", "V-1001")).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateNationalId(ref id) if id == "V-1001"));
    assert!(err.to_string().contains("V-1001"));
    assert_eq!(repo.count_persons().unwrap(), 1);
}

#[test]
fn blank_required_field_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);

    let mut blank = person("Ana", "V-1001");
    blank.email = " ".to_string();
    let err = repo.insert_person(&blank).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PersonValidationError::EmptyField("email"))
    ));
    assert_eq!(repo.count_persons().unwrap(), 0);
}

#[test]
fn insert_batch_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    repo.insert_person(&person("Existing", "V-3")).unwrap();

    let batch = vec![person("Ana", "V-1"), person("Luis", "V-2"), person("Eva", "V-3")];
    let err = repo.insert_batch(&batch).unwrap_err();
    assert_eq!(err.index, Some(2));
    assert!(matches!(err.source, RepoError::DuplicateNationalId(_)));

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name, "Existing");

    // The connection is usable again after the rollback.
    let ids = repo
        .insert_batch(&[person("Ana", "V-1"), person("Luis", "V-2")])
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(repo.count_persons().unwrap(), 3);
}

#[test]
fn insert_batch_that_cannot_start_has_no_record_index() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    conn.execute_batch("BEGIN;").unwrap();

    let err = repo.insert_batch(&[person("Ana", "V-1")]).unwrap_err();
    assert_eq!(err.index, None);
    assert!(matches!(err.source, RepoError::Db(_)));
    assert!(err.to_string().starts_with("batch rejected"));

    conn.execute_batch("ROLLBACK;").unwrap();
    assert_eq!(repo.count_persons().unwrap(), 0);
}

#[test]
fn list_persons_applies_limit_and_offset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    for index in 0..5 {
        repo.insert_person(&person(&format!("P{index}"), &format!("V-{index}")))
            .unwrap();
    }

    let page = repo
        .list_persons(&PersonListQuery {
            limit: Some(2),
            offset: 2,
        })
        .unwrap();
    let names = page.iter().map(|p| p.first_name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["P2", "P3"]);

    let tail = repo
        .list_persons(&PersonListQuery {
            limit: None,
            offset: 4,
        })
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].first_name, "P4");
}

#[test]
fn directory_pages_report_totals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    for index in 0..7 {
        repo.insert_person(&person(&format!("P{index}"), &format!("V-{index}")))
            .unwrap();
    }
    let service = DirectoryService::new(SqlitePersonRepository::new(&conn));

    let first = service.list_page(0, Some(3)).unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.total_items, 7);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let last = service.list_page(3, Some(3)).unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].first_name, "P6");
    assert!(!last.has_next());

    let past_end = service.list_page(9, Some(3)).unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total_pages, 3);
}

#[test]
fn empty_directory_has_one_empty_page() {
    let conn = open_db_in_memory().unwrap();
    let service = DirectoryService::new(SqlitePersonRepository::new(&conn));

    let page = service.list_page(1, None).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_pages, 1);
    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn person_record_serializes_with_directory_field_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::new(&conn);
    repo.insert_person(&person("Ana", "V-1001")).unwrap();

    let record = repo.list_all().unwrap().remove(0);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["firstName"], "Ana");
    assert_eq!(json["nationalId"], "V-1001");
    assert_eq!(json["age"], 30);
    assert!(json.get("national_id").is_none());
}
