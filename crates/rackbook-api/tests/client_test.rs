#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rackbook_api::types::{DocumentKind, NewDocument, ObjectId, ObjectStatus, PageId, Role, Section};
use rackbook_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn secret(s: &str) -> secrecy::SecretString {
    s.to_owned().into()
}

// ── Tree tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_tree_parses_nested_structure() {
    let (server, client) = setup().await;

    let body = json!({
        "companies": [{
            "id": 1,
            "name": "Acme",
            "dcs": [{
                "id": 10,
                "name": "FRA-1",
                "services": [
                    {"id": 100, "name": "billing", "type": "service", "status": "ok", "ip": null}
                ],
                "servers": [
                    {"id": 101, "name": "web-01", "type": "server", "status": "warn", "ip": "10.0.0.5"},
                    {"id": 102, "name": "db-01", "type": "server", "status": "flapping", "ip": "10.0.0.6"}
                ],
                "network": []
            }]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let tree = client.tree().await.unwrap();

    assert_eq!(tree.companies.len(), 1);
    assert_eq!(tree.companies[0].datacenters[0].name, "FRA-1");
    assert_eq!(tree.node_count(), 3);

    let db = tree.find(ObjectId(102)).unwrap();
    assert_eq!(db.ip.as_deref(), Some("10.0.0.6"));
    // Free-form statuses fall back to Unknown
    assert_eq!(db.status, ObjectStatus::Unknown);
}

#[tokio::test]
async fn test_tree_with_no_companies() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"companies": []})))
        .mount(&server)
        .await;

    let tree = client.tree().await.unwrap();
    assert!(tree.companies.is_empty());
    assert_eq!(tree.node_count(), 0);
}

#[tokio::test]
async fn test_companies_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Acme"},
            {"id": 2, "name": "Globex"}
        ])))
        .mount(&server)
        .await;

    let companies = client.companies().await.unwrap();
    assert_eq!(companies.len(), 2);
    assert_eq!(companies[1].name, "Globex");
    assert!(companies[1].datacenters.is_empty());
}

// ── Object detail tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_object_detail() {
    let (server, client) = setup().await;

    let body = json!({
        "object": {
            "id": 42, "dc_id": 10, "type": "server", "name": "web-01",
            "status": "ok", "ip": "10.0.0.5", "fqdn": "web-01.fra1.acme.net",
            "tags": "prod,frontend", "description": "Primary web node"
        },
        "pages": [
            {"id": 7, "section": "overview", "content_md": "# web-01\nRuns nginx.",
             "updated_at": "2024-06-15T10:30:00", "updated_by": 3},
            {"id": 8, "section": "net", "content_md": "VLAN 12",
             "updated_at": "2024-06-01T08:00:00", "updated_by": null}
        ],
        "relations": [
            {"id": 1, "relation_type": "runs_on", "note": "", "src_object_id": 100, "dst_object_id": 42}
        ],
        "documents": [
            {"id": 5, "object_id": 42, "title": "Rack diagram", "file_path": "/uploads/rack.pdf",
             "url": null, "kind": "file", "uploaded_at": "2024-05-20T09:00:00"}
        ],
        "incidents": [
            {"id": 2, "object_id": 42, "title": "Disk full", "severity": "high",
             "symptom": "500s", "cause": "logs", "check": "df -h", "resolution": "rotate",
             "created_at": "2024-04-01T02:10:00"}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/objects/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let detail = client.object(ObjectId(42)).await.unwrap();

    assert_eq!(detail.object.name, "web-01");
    assert_eq!(detail.object.tag_list(), vec!["prod", "frontend"]);
    assert_eq!(detail.pages.len(), 2);

    let overview = detail.page(Section::Overview).unwrap();
    assert_eq!(overview.id, PageId(7));
    assert!(overview.content_md.starts_with("# web-01"));
    assert!(overview.updated_at.is_some());

    assert!(detail.page(Section::Docs).is_none());
    assert_eq!(detail.relations[0].other_end(ObjectId(42)), ObjectId(100));
    assert_eq!(detail.documents[0].location(), Some("/uploads/rack.pdf"));
    assert_eq!(detail.incidents[0].severity, "high");
}

#[tokio::test]
async fn test_object_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/objects/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Object not found"})),
        )
        .mount(&server)
        .await;

    let result = client.object(ObjectId(999)).await;

    match result {
        Err(Error::NotFound { ref resource }) => {
            assert!(resource.contains("Object not found"), "got: {resource}");
        }
        other => panic!("expected NotFound error, got: {other:?}"),
    }
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains("username=ops"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "role": "editor",
            "full_name": "Ops Oncall"
        })))
        .mount(&server)
        .await;

    let resp = client.login("ops", &secret("hunter2")).await.unwrap();

    assert_eq!(resp.access_token, "tok-abc");
    assert_eq!(resp.role, Role::Editor);
    assert_eq!(resp.full_name, "Ops Oncall");
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let result = client.login("ops", &secret("wrong")).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Incorrect username"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_me_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "username": "ops", "full_name": "Ops Oncall", "role": "editor"
        })))
        .mount(&server)
        .await;

    let profile = client.me(&secret("tok-abc")).await.unwrap();

    assert_eq!(profile.username, "ops");
    assert!(profile.can_edit());
}

// ── Page update tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_update_page() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/pages/7"))
        .and(header("authorization", "Bearer tok-abc"))
        .and(body_json(json!({"content_md": "# updated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "section": "overview", "content_md": "# updated",
            "updated_at": "2024-06-15T11:00:00", "updated_by": 3
        })))
        .mount(&server)
        .await;

    let page = client
        .update_page(&secret("tok-abc"), PageId(7), "# updated")
        .await
        .unwrap();

    assert_eq!(page.content_md, "# updated");
    assert_eq!(page.section, Section::Overview);
}

#[tokio::test]
async fn test_update_page_forbidden_for_viewer() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/pages/7"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "Editor role required"})),
        )
        .mount(&server)
        .await;

    let result = client.update_page(&secret("tok-abc"), PageId(7), "x").await;

    assert!(
        matches!(result, Err(Error::Forbidden { .. })),
        "expected Forbidden error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_update_missing_page() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/pages/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Page not found"})),
        )
        .mount(&server)
        .await;

    let result = client.update_page(&secret("tok-abc"), PageId(404), "x").await;

    assert!(
        matches!(result, Err(Error::NotFound { .. })),
        "expected NotFound error, got: {result:?}"
    );
}

// ── Document tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_object_documents() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/objects/42/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "object_id": 42, "title": "Runbook wiki", "file_path": null,
             "url": "https://wiki.acme.net/web-01", "kind": "link",
             "uploaded_at": "2024-05-20T09:00:00"}
        ])))
        .mount(&server)
        .await;

    let docs = client.object_documents(ObjectId(42)).await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].kind, DocumentKind::Link);
    assert_eq!(docs[0].location(), Some("https://wiki.acme.net/web-01"));
}

#[tokio::test]
async fn test_upload_link_document() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/objects/42/documents"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "object_id": 42, "title": "Grafana", "file_path": null,
            "url": "https://grafana.acme.net/d/web01", "kind": "link",
            "uploaded_at": "2024-06-15T12:00:00"
        })))
        .mount(&server)
        .await;

    let doc = client
        .upload_document(
            &secret("tok-abc"),
            ObjectId(42),
            NewDocument {
                title: "Grafana".to_owned(),
                kind: DocumentKind::Link,
                url: Some("https://grafana.acme.net/d/web01".to_owned()),
                file: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(doc.title, "Grafana");
    assert_eq!(doc.kind, DocumentKind::Link);
}

#[tokio::test]
async fn test_upload_file_document() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/objects/42/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "object_id": 42, "title": "Wiring photo",
            "file_path": "/uploads/wiring.jpg", "url": null, "kind": "file",
            "uploaded_at": "2024-06-15T12:05:00"
        })))
        .mount(&server)
        .await;

    let doc = client
        .upload_document(
            &secret("tok-abc"),
            ObjectId(42),
            NewDocument {
                title: "Wiring photo".to_owned(),
                kind: DocumentKind::File,
                url: None,
                file: Some(("wiring.jpg".to_owned(), vec![0xde, 0xad, 0xbe, 0xef])),
            },
        )
        .await
        .unwrap();

    assert_eq!(doc.kind, DocumentKind::File);
    assert_eq!(doc.location(), Some("/uploads/wiring.jpg"));
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_maps_to_api() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client.tree().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("internal error"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.tree().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_multibyte_body_preview_does_not_split_chars() {
    let (server, client) = setup().await;

    // Proxy error page whose 200th byte lands inside a two-byte char.
    let body = format!("{}ééééé", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/api/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.tree().await;

    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains("body preview"), "got: {message}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
