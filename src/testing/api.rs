use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use super::TestApp;
use crate::database::models::RelationKind;

#[tokio::test]
async fn register_then_duplicate_is_unauthorized() {
    let app = TestApp::new();
    let body = json!({"name": "Jane", "email": "jane@x.com", "password": "secret123"});

    let first = app.send(Method::POST, "/auth/register", Some(body.clone()), None).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({"message": "User registered successfully"}));

    let second = app.send(Method::POST, "/auth/register", Some(body), None).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.body, json!({"error": true, "message": "user already exists"}));
}

#[tokio::test]
async fn register_validation_lists_every_field() {
    let app = TestApp::new();
    let res = app
        .send(
            Method::POST,
            "/auth/register",
            Some(json!({"name": "", "email": "nope", "password": "short"})),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Validation failed");
    assert_eq!(
        res.body["details"],
        json!([
            "email must be a valid email address",
            "name is required",
            "password must be between 8 and 72 characters"
        ])
    );
}

#[tokio::test]
async fn bad_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.login_as("jane@x.com").await;

    let wrong_password = app
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({"email": "jane@x.com", "password": "not-the-password"})),
            None,
        )
        .await;
    let unknown_email = app
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({"email": "ghost@x.com", "password": "secret123"})),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["message"], "Invalid Email or password");
}

#[tokio::test]
async fn login_sets_session_cookie() {
    let app = TestApp::new();
    let credentials = json!({"name": "Jane", "email": "jane@x.com", "password": "secret123"});
    app.send(Method::POST, "/auth/register", Some(credentials.clone()), None).await;

    let res = app.send(Method::POST, "/auth/login", Some(credentials), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["error"], false);
    assert_eq!(res.body["msg"], "Login successful");
    assert_eq!(res.body["data"]["user"]["name"], "Jane");

    let cookie = res.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    let token = res.body["data"]["token"].as_str().unwrap();
    assert!(cookie.starts_with(&format!("jwt={}", token)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = TestApp::new();

    let missing = app.send(Method::GET, "/users", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], "Missing or malformed JWT");

    let forged = app.send(Method::GET, "/incidents", None, Some("not.a.token")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["message"], "Invalid or expired JWT");
}

#[tokio::test]
async fn session_cookie_authenticates() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/users")
        .header(header::COOKIE, format!("jwt={}", token))
        .body(Body::empty())
        .unwrap();
    let res = app.dispatch(request).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["users"], json!([{"id": 1, "name": "Jane", "avatarUrl": null}]));
}

#[tokio::test]
async fn created_incident_has_exactly_the_supplied_products() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let created = app
        .send(
            Method::POST,
            "/incidents/create",
            Some(json!({"title": "DB down", "type": "1", "severity": "high", "summary": "...", "products": [2, 5]})),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["incidentID"].as_i64().unwrap();

    let detail = app.send(Method::GET, &format!("/incidents/{}", id), None, Some(&token)).await;
    assert_eq!(detail.status, StatusCode::OK);
    let incident = &detail.body["data"]["incident"];
    let products: Vec<i64> = incident["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(products, vec![2, 5]);
    assert_eq!(incident["areas"], json!([]));
    assert_eq!(incident["performanceIndicators"], json!([]));
    assert_eq!(incident["reporter"], 1);
    assert_eq!(incident["status"], "Investigating");
    assert_eq!(incident["type"], 1);
}

#[tokio::test]
async fn incident_without_relations_has_none() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let created = app
        .send(
            Method::POST,
            "/incidents/create",
            Some(json!({"title": "Slow checkout", "type": 2, "severity": "low", "summary": "p99 up", "status": "Monitoring"})),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["incidentID"].as_i64().unwrap() as i32;

    for kind in RelationKind::ALL {
        assert!(app.incidents.relation_ids(id, kind).is_empty());
    }
}

#[tokio::test]
async fn create_rejects_bad_start_time() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let res = app
        .send(
            Method::POST,
            "/incidents/create",
            Some(json!({"title": "x", "type": 1, "severity": "high", "summary": "y", "started_at": "last tuesday"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["details"], json!(["started_at must be a valid timestamp"]));
}

#[tokio::test]
async fn custom_fields_replace_relations_idempotently() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;
    app.send(
        Method::POST,
        "/incidents/create",
        Some(json!({"title": "DB down", "type": 1, "severity": "high", "summary": "...", "products": [2, 5], "areas": [1]})),
        Some(&token),
    )
    .await;

    let update = json!({"id": 1, "impact": "checkout failing", "products": [7, 7, 3], "causes": [4]});
    for _ in 0..2 {
        let res = app
            .send(Method::POST, "/incidents/custom-fields", Some(update.clone()), Some(&token))
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(app.incidents.relation_ids(1, RelationKind::Products), vec![7, 3]);
        assert_eq!(app.incidents.relation_ids(1, RelationKind::Causes), vec![4]);
        // omitted list clears the relation
        assert!(app.incidents.relation_ids(1, RelationKind::Areas).is_empty());
    }

    let detail = app.send(Method::GET, "/incidents/1", None, Some(&token)).await;
    assert_eq!(detail.body["data"]["incident"]["impact"], "checkout failing");
}

#[tokio::test]
async fn narrow_updates_on_missing_incident_are_not_found() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let cases = [
        ("/incidents/update/summary", json!({"id": 42, "summary": "s"})),
        ("/incidents/update/status", json!({"id": 42, "status": "Resolved"})),
        ("/incidents/update/severity", json!({"id": 42, "severity": "low"})),
        ("/incidents/update/type", json!({"id": 42, "type": 3})),
        ("/incidents/update/roles", json!({"id": 42, "lead": 1})),
        ("/incidents/custom-fields", json!({"id": 42})),
    ];
    for (uri, body) in cases {
        let res = app.send(Method::POST, uri, Some(body), Some(&token)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(res.body["message"], "incident with ID 42 not found");
    }

    let detail = app.send(Method::GET, "/incidents/42", None, Some(&token)).await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn narrow_updates_change_one_field() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;
    app.send(
        Method::POST,
        "/incidents/create",
        Some(json!({"title": "DB down", "type": 1, "severity": "high", "summary": "..."})),
        Some(&token),
    )
    .await;

    let res = app
        .send(Method::POST, "/incidents/update/status", Some(json!({"id": 1, "status": "Resolved"})), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["error"], false);

    // neither role given is a no-op
    let res = app
        .send(Method::POST, "/incidents/update/roles", Some(json!({"id": 1})), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let detail = app.send(Method::GET, "/incidents/1", None, Some(&token)).await;
    let incident = &detail.body["data"]["incident"];
    assert_eq!(incident["status"], "Resolved");
    assert_eq!(incident["severity"], "high");
    assert_eq!(incident["lead"], json!(null));
    assert_eq!(incident["documentationAt"], json!(null));
    assert_eq!(incident["inReviewAt"], json!(null));
    assert!(incident.as_object().unwrap().contains_key("inReviewAt"));
}

#[tokio::test]
async fn roles_without_fields_skip_the_lookup() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    // nothing to write, so a missing incident is not detected
    let res = app
        .send(Method::POST, "/incidents/update/roles", Some(json!({"id": 42})), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["error"], false);

    let res = app
        .send(Method::POST, "/incidents/update/roles", Some(json!({"id": 42, "qe": 7})), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;
    for status in ["Investigating", "Resolved", "Investigating"] {
        app.send(
            Method::POST,
            "/incidents/create",
            Some(json!({"title": "t", "type": 1, "severity": "high", "summary": "s", "status": status})),
            Some(&token),
        )
        .await;
    }

    let res = app.send(Method::GET, "/incidents?status=Investigating", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<i64> = res.body["data"]["incidents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn malformed_input_is_rejected_generically() {
    let app = TestApp::new();
    let token = app.login_as("jane@x.com").await;

    let res = app
        .send_raw(Method::POST, "/incidents/create", Some("{not json".into()), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, json!({"error": true, "message": "Invalid input format"}));

    let res = app.send(Method::GET, "/incidents/abc", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Invalid input format");

    let res = app.send(Method::GET, "/incidents/0", None, Some(&token)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Validation failed");
}

#[tokio::test]
async fn options_are_public_and_keyed_by_kind() {
    let app = TestApp::new();

    let res = app.send(Method::GET, "/options/faulty-systems", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["msg"], "Fetched faulty systems");
    assert_eq!(
        res.body["data"]["faultySystems"],
        json!([{"id": 1, "name": "faulty_systems 1"}, {"id": 2, "name": "faulty_systems 2"}])
    );

    let res = app.send(Method::GET, "/options/severity", None, None).await;
    assert_eq!(res.body["data"]["severity"][0]["name"], "severities 1");

    let res = app.send(Method::GET, "/options/colours", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_describes_the_service() {
    let app = TestApp::new();
    let res = app.send(Method::GET, "/", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "Firewatch API");
}
