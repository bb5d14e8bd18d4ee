use leadtrack_core::db::{open_db, open_db_in_memory};
use leadtrack_core::{
    AgentDraft, AgentService, RepoError, ServiceError, SqliteAgentRepository, ValidationError,
};
use serde_json::json;

#[test]
fn create_agent_keeps_extra_fields_and_lists_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let service = AgentService::new(SqliteAgentRepository::try_new(&conn).unwrap());

    let ana = service
        .create_agent(
            AgentDraft::new("Ana")
                .with_attribute("email", "ana@example.com")
                .with_attribute("region", "EMEA"),
        )
        .unwrap();
    let ben = service.create_agent(AgentDraft::new("Ben")).unwrap();

    assert_eq!(ana.name, "Ana");
    assert_eq!(ana.attributes["email"], "ana@example.com");
    assert!(ben.attributes.is_empty());

    let listed = service.list_agents().unwrap();
    assert_eq!(listed, vec![ana.clone(), ben]);

    let json = serde_json::to_value(&ana).unwrap();
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["region"], "EMEA");
    assert_eq!(json["id"], ana.id.to_string());
    assert!(json["createdAt"].is_i64());
}

#[test]
fn create_agent_accepts_json_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = AgentService::new(SqliteAgentRepository::try_new(&conn).unwrap());

    let draft: AgentDraft =
        serde_json::from_value(json!({ "name": "Cy", "phone": "+1 555 0100", "id": "forged" }))
            .unwrap();
    let agent = service.create_agent(draft).unwrap();

    assert_eq!(agent.attributes.get("phone"), Some(&json!("+1 555 0100")));
    assert!(!agent.attributes.contains_key("id"));
}

#[test]
fn create_agent_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = AgentService::new(SqliteAgentRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.create_agent(AgentDraft::new("  ")),
        Err(ServiceError::Operation(RepoError::Validation(
            ValidationError::BlankField("name")
        )))
    ));
    assert!(service.list_agents().unwrap().is_empty());
}

#[test]
fn agents_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let service = AgentService::new(SqliteAgentRepository::try_new(&conn).unwrap());
        service
            .create_agent(AgentDraft::new("Ana").with_attribute("team", "north"))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let service = AgentService::new(SqliteAgentRepository::try_new(&conn).unwrap());
    assert_eq!(service.list_agents().unwrap(), vec![created]);
}
