use leadtrack_core::db::open_db_in_memory;
use leadtrack_core::{
    AgentDraft, AgentId, AgentService, CommentDraft, CommentService, LeadDraft, LeadService,
    LeadSource, RepoError, ServiceError, SqliteAgentRepository, SqliteCommentRepository,
    SqliteLeadRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

type Comments<'c> = CommentService<SqliteCommentRepository<'c>, SqliteAgentRepository<'c>>;

fn comment_service(conn: &Connection) -> Comments<'_> {
    CommentService::new(
        SqliteCommentRepository::try_new(conn).unwrap(),
        SqliteAgentRepository::try_new(conn).unwrap(),
    )
}

fn create_agent(conn: &Connection, name: &str) -> AgentId {
    let service = AgentService::new(SqliteAgentRepository::try_new(conn).unwrap());
    service.create_agent(AgentDraft::new(name)).unwrap().id
}

fn create_lead(conn: &Connection, agent: AgentId) -> Uuid {
    let service = LeadService::new(
        SqliteLeadRepository::try_new(conn).unwrap(),
        SqliteAgentRepository::try_new(conn).unwrap(),
    );
    service
        .create_lead(LeadDraft::new("Acme", LeadSource::Referral, agent, 10))
        .unwrap()
        .id
}

#[test]
fn add_comment_returns_view_with_author_name() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let lead = create_lead(&conn, ana);
    let service = comment_service(&conn);

    let view = service
        .add_comment(lead, CommentDraft::new(ana, "Called, follow up Friday"))
        .unwrap();
    assert_eq!(view.comment_text, "Called, follow up Friday");
    assert_eq!(view.author_name.as_deref(), Some("Ana"));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["authorName"], "Ana");
    assert!(json.get("author").is_none());
}

#[test]
fn list_comments_returns_creation_order_with_resolved_authors() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let ben = create_agent(&conn, "Ben");
    let lead = create_lead(&conn, ana);
    let service = comment_service(&conn);

    let first = service
        .add_comment(lead, CommentDraft::new(ana, "first"))
        .unwrap();
    let second = service
        .add_comment(lead, CommentDraft::new(ben, "second"))
        .unwrap();

    let listed = service.list_comments(lead).unwrap();
    assert_eq!(listed, vec![first, second]);
    assert_eq!(listed[0].author_name.as_deref(), Some("Ana"));
    assert_eq!(listed[1].author_name.as_deref(), Some("Ben"));
}

#[test]
fn list_comments_is_scoped_to_lead_and_empty_when_none() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let lead = create_lead(&conn, ana);
    let other_lead = create_lead(&conn, ana);
    let service = comment_service(&conn);

    service
        .add_comment(lead, CommentDraft::new(ana, "only here"))
        .unwrap();

    assert!(service.list_comments(other_lead).unwrap().is_empty());
    assert!(service.list_comments(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn list_comments_tolerates_deleted_author() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let ben = create_agent(&conn, "Ben");
    let lead = create_lead(&conn, ana);
    let service = comment_service(&conn);
    service
        .add_comment(lead, CommentDraft::new(ana, "kept"))
        .unwrap();
    service
        .add_comment(lead, CommentDraft::new(ben, "orphaned author"))
        .unwrap();

    conn.execute(
        "DELETE FROM sales_agents WHERE id = ?1;",
        [ben.to_string()],
    )
    .unwrap();

    let listed = service.list_comments(lead).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].author_name.as_deref(), Some("Ana"));
    assert_eq!(listed[1].author_name, None);
}

#[test]
fn comments_survive_lead_deletion() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let lead = create_lead(&conn, ana);
    let service = comment_service(&conn);
    service
        .add_comment(lead, CommentDraft::new(ana, "before delete"))
        .unwrap();

    let leads = LeadService::new(
        SqliteLeadRepository::try_new(&conn).unwrap(),
        SqliteAgentRepository::try_new(&conn).unwrap(),
    );
    leads.delete_lead(lead).unwrap();

    assert_eq!(service.list_comments(lead).unwrap().len(), 1);
}

#[test]
fn add_comment_rejects_blank_text_and_missing_author() {
    let conn = open_db_in_memory().unwrap();
    let ana = create_agent(&conn, "Ana");
    let lead = create_lead(&conn, ana);
    let service = comment_service(&conn);

    assert!(matches!(
        service.add_comment(lead, CommentDraft::new(ana, "   ")),
        Err(ServiceError::Operation(RepoError::Validation(
            ValidationError::BlankField("commentText")
        )))
    ));

    let no_author = CommentDraft {
        comment_text: Some("hello".to_string()),
        author: None,
    };
    assert!(matches!(
        service.add_comment(lead, no_author),
        Err(ServiceError::Operation(RepoError::Validation(
            ValidationError::MissingField("author")
        )))
    ));

    assert!(service.list_comments(lead).unwrap().is_empty());
}
