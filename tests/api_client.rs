//! Request client and resource wrappers against an in-process mock backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;

use prodtrack::api::{
    Calls, KickOffs, MassProductions, OkForLaunch, Supplies, Users, load_form_options,
};
use prodtrack::models::{CallFilter, MassProductionFilter, Record};
use prodtrack::progress::completion_percentage;
use prodtrack::{ApiClient, ClientError, StaticToken};

/// One request as the backend saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Seen {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct Backend {
    routes: Arc<HashMap<(Method, String), (StatusCode, String)>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    backend.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });
    match backend.routes.get(&(method, uri.path().to_string())) {
        Some((status, body)) => (*status, body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"message":"no such route"}"#).into_response(),
    }
}

struct Mock {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Mock {
    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn client(&self, token: &str) -> ApiClient {
        ApiClient::new(&self.base_url, Arc::new(StaticToken::new(token))).unwrap()
    }
}

async fn start(routes: Vec<(Method, &str, StatusCode, Value)>) -> Mock {
    let routes = routes
        .into_iter()
        .map(|(method, path, status, body)| {
            let body = if body.is_null() {
                String::new()
            } else {
                body.to_string()
            };
            ((method, path.to_string()), (status, body))
        })
        .collect();
    let backend = Backend {
        routes: Arc::new(routes),
        seen: Arc::default(),
    };
    let seen = backend.seen.clone();
    let app = Router::new().fallback(handle).with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Mock {
        base_url: format!("http://{}", addr),
        seen,
    }
}

mod request_client {
    use super::*;

    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let mock = start(vec![(
            Method::GET,
            "/api/kickoff",
            StatusCode::OK,
            json!([{"id": "k1", "timing": {"value": true, "task": {"check": true}}}]),
        )])
        .await;

        let items = mock.client("t0k3n").resource::<KickOffs>().list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id().as_deref(), Some("k1"));
        assert_eq!(items[0].checklist_completion(), Some(100));

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t0k3n"));
    }

    #[tokio::test]
    async fn test_missing_token_never_reaches_backend() {
        let mock = start(vec![(Method::GET, "/api/kickoff", StatusCode::OK, json!([]))]).await;
        let client = ApiClient::new(&mock.base_url, Arc::new(StaticToken::none())).unwrap();

        let err = client.resource::<KickOffs>().list().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));

        // Attachments are not even read without a token
        let err = client
            .resource::<OkForLaunch>()
            .create_form(
                Record::new(),
                &[("file".to_string(), "/does/not/exist.pdf".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_carries_backend_message() {
        let mock = start(vec![(
            Method::GET,
            "/api/facilities/f9",
            StatusCode::NOT_FOUND,
            json!({"message": "Facility not found"}),
        )])
        .await;

        let err = mock
            .client("t")
            .resource::<prodtrack::api::Facilities>()
            .get("f9")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            ClientError::Status { message, .. } => assert_eq!(message, "Facility not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mock = start(vec![(
            Method::GET,
            "/api/call",
            StatusCode::OK,
            json!({"unexpected": true}),
        )])
        .await;

        let err = mock.client("t").resource::<Calls>().list().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let mock = start(vec![(
            Method::DELETE,
            "/api/kickoff/k1",
            StatusCode::NO_CONTENT,
            Value::Null,
        )])
        .await;

        mock.client("t").resource::<KickOffs>().remove("k1").await.unwrap();
        let seen = mock.requests();
        assert_eq!(seen[0].method, Method::DELETE);
        assert_eq!(seen[0].path, "/api/kickoff/k1");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port with nothing listening on it
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(
            &format!("http://{}", addr),
            Arc::new(StaticToken::new("t")),
        )
        .unwrap();
        let err = client.resource::<KickOffs>().list().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_unsafe_id_rejected_before_sending() {
        let mock = start(vec![]).await;
        let err = mock
            .client("t")
            .resource::<KickOffs>()
            .get("k1/../users")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(mock.requests().is_empty());
    }
}

mod resources {
    use super::*;

    #[tokio::test]
    async fn test_calls_get_remaining_time() {
        let ten_minutes_ago = (Utc::now() - Duration::minutes(10)).to_rfc3339();
        let mock = start(vec![(
            Method::GET,
            "/api/call",
            StatusCode::OK,
            json!([
                {"id": "c1", "status": "Pendiente", "callTime": ten_minutes_ago},
                {"id": "c2", "status": "Realizada", "callTime": ten_minutes_ago},
                {"id": "c3", "status": "Pendiente", "callTime": "garbage"},
                {"id": "c4", "status": null, "callTime": ten_minutes_ago}
            ]),
        )])
        .await;

        let calls = mock.client("t").resource::<Calls>().list().await.unwrap();
        assert!((4798..=4800).contains(&calls[0].remaining_time));
        assert_eq!(calls[1].remaining_time, 0);
        assert_eq!(calls[2].remaining_time, 0);
        assert!(calls[3].status.is_unset());
        assert_eq!(calls[3].remaining_time, 0);
    }

    #[tokio::test]
    async fn test_call_actions() {
        let mock = start(vec![
            (
                Method::PUT,
                "/api/call/c1/complete",
                StatusCode::OK,
                json!({"id": "c1", "status": "Realizada"}),
            ),
            (
                Method::POST,
                "/api/call/check-expired",
                StatusCode::OK,
                json!({"expired": 2}),
            ),
            (
                Method::GET,
                "/api/call",
                StatusCode::OK,
                json!([]),
            ),
        ])
        .await;
        let client = mock.client("t");
        let calls = client.resource::<Calls>();

        let done = calls.complete("c1").await.unwrap();
        assert_eq!(done.status.as_str(), "Realizada");
        assert_eq!(done.remaining_time, 0);

        let summary = calls.check_expired().await.unwrap();
        assert_eq!(summary["expired"], 2);

        let filter = CallFilter {
            status: Some("Pendiente".into()),
            start_date: Some("2024-05-01".into()),
            end_date: None,
        };
        assert!(calls.search(&filter).await.unwrap().is_empty());

        let seen = mock.requests();
        assert_eq!(seen[0].method, Method::PUT);
        assert_eq!(seen[1].method, Method::POST);
        let query = seen[2].query.as_deref().unwrap();
        assert!(query.contains("status=Pendiente"));
        assert!(query.contains("startDate=2024-05-01"));
        assert!(!query.contains("endDate"));
    }

    #[tokio::test]
    async fn test_supply_payload_is_normalized_on_the_wire() {
        let mock = start(vec![(
            Method::POST,
            "/api/Supp",
            StatusCode::CREATED,
            json!({"id": "s1"}),
        )])
        .await;

        let record = Record::from_json(json!({"details": {"ok_nok": true}})).unwrap();
        let created = mock
            .client("t")
            .resource::<Supplies>()
            .create(record)
            .await
            .unwrap();
        assert_eq!(created.id().as_deref(), Some("s1"));

        let seen = &mock.requests()[0];
        assert_eq!(seen.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            seen.json(),
            json!({"details": {
                "ok_nok": "OK",
                "tko": false,
                "ot": false,
                "ot_op": false,
                "is": false,
                "sop": false,
                "who": "",
                "when": "",
                "validation_check": false,
                "comment": ""
            }})
        );
    }

    #[tokio::test]
    async fn test_mass_production_page_and_completion() {
        let mock = start(vec![(
            Method::GET,
            "/api/massproduction",
            StatusCode::OK,
            json!({
                "data": [{
                    "_id": "mp1",
                    "project_n": "P-100",
                    "feasibility": null,
                    "feasability": {"check": true},
                    "kick_off": {"value": true},
                    "design": {"layout": {"value": true}},
                    "facilities": "fac-1"
                }],
                "total": 42,
                "page": 2,
                "totalPages": 5
            }),
        )])
        .await;

        let filter = MassProductionFilter {
            status: Some("open".into()),
            page: Some(2),
            limit: Some(10),
            ..MassProductionFilter::default()
        };
        let listing = mock
            .client("t")
            .resource::<MassProductions>()
            .search(&filter)
            .await
            .unwrap();
        assert_eq!(listing.total(), Some(42));
        let mp = &listing.items()[0];
        assert_eq!(mp.id.as_deref(), Some("mp1"));
        assert_eq!(completion_percentage(mp), 33);

        let query = mock.requests()[0].query.clone().unwrap();
        assert!(query.contains("status=open"));
        assert!(query.contains("page=2"));
        assert!(query.contains("limit=10"));
    }

    #[tokio::test]
    async fn test_form_upload_is_multipart() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ok4l.pdf");
        std::fs::write(&file, b"%PDF-1.4 fake").unwrap();

        let mock = start(vec![(
            Method::PUT,
            "/api/okforlunch/o1",
            StatusCode::OK,
            json!({"id": "o1"}),
        )])
        .await;

        let record = Record::from_json(json!({"project": "P-100", "approved": true})).unwrap();
        mock.client("t")
            .resource::<OkForLaunch>()
            .update_form("o1", record, &[("file".to_string(), file)])
            .await
            .unwrap();

        let seen = &mock.requests()[0];
        assert!(
            seen.content_type
                .as_deref()
                .unwrap()
                .starts_with("multipart/form-data; boundary=")
        );
        let body = String::from_utf8_lossy(&seen.body);
        assert!(body.contains("name=\"project\""));
        assert!(body.contains("P-100"));
        assert!(body.contains("filename=\"ok4l.pdf\""));
        assert!(body.contains("%PDF-1.4 fake"));
    }

    #[tokio::test]
    async fn test_missing_attachment_is_reported() {
        let mock = start(vec![]).await;
        let err = mock
            .client("t")
            .resource::<OkForLaunch>()
            .create_form(
                Record::new(),
                &[("file".to_string(), "/does/not/exist.pdf".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Attachment { .. }));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_role() {
        let mock = start(vec![(
            Method::PUT,
            "/api/users/u1/role",
            StatusCode::OK,
            json!({"id": "u1", "username": "amina", "role": "admin"}),
        )])
        .await;

        let user = mock
            .client("t")
            .resource::<Users>()
            .update_role("u1", "admin")
            .await
            .unwrap();
        assert_eq!(user.role.as_deref(), Some("admin"));
        assert_eq!(mock.requests()[0].json(), json!({"role": "admin"}));
    }

    #[tokio::test]
    async fn test_form_options_join() {
        let mock = start(vec![
            (
                Method::GET,
                "/api/pd",
                StatusCode::OK,
                json!([{"id": "pd1", "part_name": "Bracket"}]),
            ),
            (
                Method::GET,
                "/api/users",
                StatusCode::OK,
                json!([{"id": "u1", "email": "a@example.com"}]),
            ),
        ])
        .await;

        let options = load_form_options(&mock.client("t")).await.unwrap();
        assert_eq!(options.product_designations.len(), 1);
        assert_eq!(options.users[0].display_name(), "a@example.com");
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_form_options_fail_if_either_fails() {
        let mock = start(vec![(
            Method::GET,
            "/api/pd",
            StatusCode::OK,
            json!([]),
        )])
        .await;
        let err = load_form_options(&mock.client("t")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
