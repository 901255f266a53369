use peerreview_core::db::open_db_in_memory;
use peerreview_core::{
    Entity, ReferenceDataService, RepoError, ReviewAggregator, SqliteCycleRepository,
    SqliteReviewRepository, SqliteTeamRepository, SqliteUserRepository, UserRepository,
    ValidationError,
};
use rusqlite::Connection;

fn seed(conn: &Connection) {
    let reference = ReferenceDataService::new(
        SqliteTeamRepository::new(conn),
        SqliteCycleRepository::new(conn),
    );
    reference.add_cycle("Q1").unwrap();
    reference.add_cycle("Q2").unwrap();
    let repo = SqliteUserRepository::new(conn);
    repo.create_user("Recipient", "rec@x.com").unwrap();
    repo.create_user("Reviewer", "reviewer@x.com").unwrap();
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn review_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM reviews;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn submit_stores_one_row_per_item() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    let stored = service
        .submit(
            "rec@x.com",
            "Q1",
            &owned(&["clear writing", "helpful"]),
            &owned(&["more tests"]),
        )
        .unwrap();

    assert_eq!(stored, 3);
    assert_eq!(review_rows(&conn), 3);
}

#[test]
fn feedback_is_grouped_per_cycle() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    service
        .submit("rec@x.com", "Q1", &owned(&["s1"]), &owned(&["o1"]))
        .unwrap();
    service
        .submit("rec@x.com", "Q1", &owned(&["s2"]), &owned(&["o2"]))
        .unwrap();
    service
        .submit("rec@x.com", "Q2", &owned(&["s3"]), &owned(&["o3", "o4"]))
        .unwrap();

    let mut reviews = service.get_reviews("rec@x.com").unwrap();
    reviews.sort_by(|left, right| left.cycle.cmp(&right.cycle));
    assert_eq!(reviews.len(), 2);

    let q1 = &reviews[0];
    assert_eq!(q1.cycle, "Q1");
    let mut strengths = q1.strengths.clone();
    strengths.sort();
    assert_eq!(strengths, vec!["s1", "s2"]);
    let mut opportunities = q1.opportunities.clone();
    opportunities.sort();
    assert_eq!(opportunities, vec!["o1", "o2"]);

    let q2 = &reviews[1];
    assert_eq!(q2.cycle, "Q2");
    assert_eq!(q2.strengths, vec!["s3"]);
    assert_eq!(q2.opportunities.len(), 2);
}

#[test]
fn reviews_never_reveal_the_submitter() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));
    service
        .request_reviewer("rec@x.com", "reviewer@x.com", "Q1")
        .unwrap();
    service
        .submit("rec@x.com", "Q1", &owned(&["kind"]), &owned(&["faster"]))
        .unwrap();

    let reviews = service.get_reviews("rec@x.com").unwrap();
    let json = serde_json::to_string(&reviews).unwrap();
    assert!(!json.contains("reviewer@x.com"));
    assert!(!json.contains("Reviewer"));

    let value = serde_json::to_value(&reviews).unwrap();
    let record = value[0].as_object().unwrap();
    let mut keys: Vec<&str> = record.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["cycle", "growth_opportunities", "strengths"]);
}

#[test]
fn recipient_without_feedback_gets_empty_list() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    assert!(service.get_reviews("rec@x.com").unwrap().is_empty());
    assert!(service.get_reviews("nobody@x.com").unwrap().is_empty());
}

#[test]
fn submit_with_empty_list_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    let err = service
        .submit("rec@x.com", "Q1", &owned(&["only strengths"]), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyList("growth_opportunities"))
    ));
    assert_eq!(review_rows(&conn), 0);
}

#[test]
fn blank_feedback_entries_are_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    let err = service
        .submit("rec@x.com", "Q1", &owned(&["fine"]), &owned(&["ok", " \t"]))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankEntry {
            field: "growth_opportunities",
            index: 1
        })
    ));
    assert_eq!(review_rows(&conn), 0);
    assert!(service.get_reviews("rec@x.com").unwrap().is_empty());
}

#[test]
fn submit_for_unknown_recipient_or_cycle_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    let err = service
        .submit("ghost@x.com", "Q1", &owned(&["a"]), &owned(&["b"]))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: Entity::User, .. }));

    let err = service
        .submit("rec@x.com", "Q9", &owned(&["a"]), &owned(&["b"]))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: Entity::Cycle, .. }));
    assert_eq!(review_rows(&conn), 0);
}

#[test]
fn request_reviewer_requires_a_valid_email() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = ReviewAggregator::new(SqliteReviewRepository::new(&conn));

    let err = service
        .request_reviewer("rec@x.com", "not-an-email", "Q1")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail(_))
    ));
}
