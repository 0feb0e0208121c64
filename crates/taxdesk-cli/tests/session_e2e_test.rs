//! End-to-end: a session over the real HTTP client against a mock data
//! store, driven through the session API and through the shell.

use serde_json::json;
use taxdesk_cli::shell::run_shell_loop;
use taxdesk_client::{GatewayClient, GatewayConfig};
use taxdesk_core::{DraftField, RecordId};
use taxdesk_state::{Cell, LoadState, MergeOutcome, Notice, Session};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn records_body() -> serde_json::Value {
    json!([
        {
            "id": "1",
            "name": "Acme",
            "gender": "Male",
            "requestDate": "2024-01-05",
            "country": "Canada"
        },
        {
            "id": "2",
            "name": "Globex",
            "gender": "Female",
            "requestDate": "2023-07-20T10:00:00Z",
            "country": "Germany"
        }
    ])
}

async fn mount_collections(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/taxes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "name": "Canada" },
            { "id": "2", "name": "Germany" },
            { "id": "3", "name": "Peru" }
        ])))
        .mount(mock_server)
        .await;
}

async fn mount_successful_update(mock_server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path("/taxes/2"))
        .and(body_partial_json(json!({ "id": "2", "country": "Canada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "2",
            "name": "Globex",
            "gender": "Female",
            "requestDate": "2023-07-20T10:00:00Z",
            "country": "Canada"
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn loaded_session(mock_server: &MockServer) -> Session<GatewayClient> {
    let config = GatewayConfig::for_base_url(&mock_server.uri())
        .unwrap()
        .with_timeout_secs(5);
    let mut session = Session::new(GatewayClient::new(config).unwrap());
    session.load().await.unwrap();
    session
}

fn row_ids(session: &Session<GatewayClient>) -> Vec<String> {
    session
        .table()
        .rows
        .iter()
        .map(|r| r.record_id.to_string())
        .collect()
}

#[tokio::test]
async fn load_filter_edit_save() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server).await;
    mount_successful_update(&mock_server).await;

    let mut session = loaded_session(&mock_server).await;
    assert_eq!(session.load_state(), LoadState::Loaded);
    assert_eq!(row_ids(&session), vec!["1", "2"]);
    assert_eq!(session.filter_options(), vec!["Canada", "Germany", "Peru"]);

    let table = session.table();
    assert_eq!(table.rows[1].cells[2], Cell::Text("Jul 20, 2023".into()));

    session.toggle_filter_dropdown();
    session.choose_filter_country("Germany").unwrap();
    assert_eq!(row_ids(&session), vec!["2"]);

    // Edit the one row still visible under the filter and move it to Canada.
    let id = session.table().rows[0].record_id.clone();
    session.open_edit(&id).unwrap();
    session.toggle_country_picker().unwrap();
    session.select_draft_country("Canada").unwrap();

    let outcome = session.submit().await.unwrap();
    assert_eq!(outcome, MergeOutcome::Replaced);
    assert!(session.modal().is_none());
    assert_eq!(session.store().record(&id).unwrap().country, "Canada");
    assert!(session.table().rows.is_empty());

    session.toggle_filter_dropdown();
    session.choose_filter_country("Germany").unwrap();
    session.toggle_filter_dropdown();
    session.choose_filter_country("Canada").unwrap();
    assert_eq!(row_ids(&session), vec!["1", "2"]);
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn failed_save_keeps_store_and_draft() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/taxes/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let mut session = loaded_session(&mock_server).await;
    let id = RecordId::new("1").unwrap();
    session.open_edit(&id).unwrap();
    session.update_draft_field(DraftField::Name, "Acme Renamed").unwrap();

    assert!(session.submit().await.is_err());
    assert_eq!(session.take_notices(), vec![Notice::SaveFailed]);
    assert_eq!(session.store().record(&id).unwrap().name, "Acme");

    let modal = session.modal().unwrap();
    assert_eq!(modal.name, "Acme Renamed");
    assert_eq!(modal.error.as_deref(), Some("Failed to save changes"));
}

#[tokio::test]
async fn failed_load_leaves_empty_table() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = GatewayConfig::for_base_url(&mock_server.uri()).unwrap();
    let mut session = Session::new(GatewayClient::new(config).unwrap());

    assert!(session.load().await.is_err());
    assert_eq!(session.load_state(), LoadState::Failed);
    assert_eq!(session.take_notices(), vec![Notice::LoadFailed]);
    assert!(session.table().rows.is_empty());
}

#[tokio::test]
async fn shell_script_filters_and_saves() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server).await;
    mount_successful_update(&mock_server).await;

    let mut session = loaded_session(&mock_server).await;
    let script = "filter\ntoggle Germany\nedit 2\npicker\npick 1\nsave\n\
                  filter\ntoggle Germany\nquit\nshow\n";
    let mut out = Vec::new();
    run_shell_loop(&mut session, script.as_bytes(), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("[x] Germany"));
    assert!(text.contains("Country [filter*]"));
    assert!(text.contains("== Edit Customer =="));
    assert!(text.contains(" 1. Canada  [edit]"));
    assert!(!text.contains("error:"));
    assert!(!text.contains("! "));

    // Record 2 moved to Canada; clearing the Germany filter shows both rows.
    let last_table = text.rsplit("Customers").next().unwrap();
    assert!(last_table.contains("Acme"));
    assert!(last_table.contains("Globex"));
    assert!(text.contains("(no records)"));
    let saved = session.store().record(&RecordId::new("2").unwrap()).unwrap();
    assert_eq!(saved.country, "Canada");
}

#[tokio::test]
async fn shell_reports_validation_notice_without_request() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut session = loaded_session(&mock_server).await;
    let script = "edit 1\nname   \nsave\ntoggle Peru\nbogus\n";
    let mut out = Vec::new();
    run_shell_loop(&mut session, script.as_bytes(), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("! Name and country are required"));
    assert!(text.contains("<Enter name>"));
    assert!(text.contains("error: the country filter is closed"));
    assert!(text.contains("error: unknown command: bogus"));
}
