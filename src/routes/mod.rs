//! Router assembly: admin API endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - Admin API under `/admin/api/...` (analytics dashboard, module editor)
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/admin/api/health", get(http::http_health))
        // Analytics
        .route("/admin/api/analytics", get(http::http_get_analytics))
        .route("/admin/api/modules", get(http::http_get_modules))
        // Module editor
        .route("/admin/api/editor/sessions", post(http::http_post_session))
        .route(
            "/admin/api/editor/sessions/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/admin/api/editor/sessions/:id/edits", post(http::http_post_edits))
        .route("/admin/api/editor/sessions/:id/payload", get(http::http_get_payload))
        .route("/admin/api/editor/sessions/:id/save", post(http::http_post_save))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::{
        body::Body,
        extract::Path,
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, HeaderMap, Request, StatusCode},
        response::IntoResponse,
        Json,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use crate::config::{AdminConfig, UpstreamCfg};
    use crate::fixtures;

    /// Requests the fake platform received: (method, path, authorization, body).
    type Sent = Arc<Mutex<Vec<(String, String, Option<String>, Value)>>>;

    fn auth(headers: &HeaderMap) -> Option<String> {
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string)
    }

    /// How the fake platform misbehaves.
    #[derive(Clone, Copy, Default)]
    struct Fake {
        fail_top_performers: bool,
        /// PATCH answers `204 No Content`.
        patch_no_content: bool,
        /// POST /api/modules/new answers after a delay.
        slow_create: bool,
    }

    /// Serve a small platform API on an ephemeral port.
    async fn fake_platform(fake: Fake) -> (String, Sent) {
        let sent: Sent = Arc::default();

        let top_performers = if fake.fail_top_performers {
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "stats offline" }))) })
        } else {
            get(|| async { Json(json!([{ "studentId": 1, "name": "Ana", "averageScore": 91.5, "completedModules": 1 }])) })
        };

        let patch_sent = sent.clone();
        let post_sent = sent.clone();
        let app: Router = Router::new()
            .route(
                "/api/students",
                get(|| async {
                    Json(json!([
                        { "id": 1, "name": "Ana", "country": "GE", "completedModules": [7],
                          "achievements": [{ "name": "First steps" }], "timeSpentMinutes": 45 },
                        { "id": 2, "name": "Ben", "completed_modules": null, "achievements": [],
                          "time_spent_minutes": 400 }
                    ]))
                }),
            )
            .route(
                "/api/analytics/exam-results",
                get(|| async {
                    Json(json!([
                        { "studentId": 1, "moduleId": 7, "score": 80, "passed": true },
                        { "studentId": 2, "moduleId": 7, "score": 40, "passed": false }
                    ]))
                }),
            )
            .route(
                "/api/analytics/overview-stats",
                get(|| async { Json(json!({ "totalStudents": 2, "totalModules": 1, "streak": 3 })) }),
            )
            .route(
                "/api/analytics/engagement-metrics",
                get(|| async { Json(json!({ "dailyActiveUsers": 1, "activity": [] })) }),
            )
            .route(
                "/api/analytics/language-distribution",
                get(|| async { Json(json!([{ "language": "English", "count": 2 }])) }),
            )
            .route(
                "/api/analytics/country-distribution",
                get(|| async { Json(json!([{ "country": "GE", "count": 1 }, { "country": "DE", "count": 1 }])) }),
            )
            .route(
                "/api/analytics/level-distribution",
                get(|| async { Json(json!([{ "level": "A2", "count": 2 }])) }),
            )
            .route("/api/analytics/top-performers", top_performers)
            .route(
                "/api/analytics/difficult-modules",
                get(|| async { Json(json!([{ "moduleId": 7, "title": "Tbilisi Old Town", "averageScore": 60 }])) }),
            )
            .route(
                "/api/modules",
                get(|| async { Json(json!([{ "id": 7, "title": "Tbilisi Old Town", "level": "A2", "region": "Kartli" }])) }),
            )
            .route(
                "/api/modules/admin/:id",
                get(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        (StatusCode::NOT_FOUND, Json(json!({ "error": "Module not found" })))
                    } else {
                        (StatusCode::OK, Json(fixtures::module_record_json(id)))
                    }
                })
                .patch(move |Path(id): Path<i64>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let path = format!("/api/modules/admin/{id}");
                    patch_sent.lock().unwrap().push(("PATCH".into(), path, auth(&headers), body));
                    if fake.patch_no_content {
                        StatusCode::NO_CONTENT.into_response()
                    } else {
                        Json(json!({ "id": id, "updated": true })).into_response()
                    }
                }),
            )
            .route(
                "/api/modules/new",
                post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    post_sent.lock().unwrap().push(("POST".into(), "/api/modules/new".into(), auth(&headers), body));
                    if fake.slow_create {
                        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
                    }
                    Json(json!({ "module": { "id": 99 } }))
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), sent)
    }

    async fn admin_app(fake: Fake) -> (Router, Sent) {
        let (base_url, sent) = fake_platform(fake).await;
        let config = AdminConfig {
            upstream: UpstreamCfg { base_url, timeout_secs: 5, token: Some("t0ken".into()) },
            ..AdminConfig::default()
        };
        let state = AppState::new(config).unwrap();
        (build_router(Arc::new(state)), sent)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = admin_app(Fake::default()).await;
        let (status, body) = call(&app, "GET", "/admin/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn dashboard_merges_all_collections() {
        let (app, _) = admin_app(Fake::default()).await;
        let (status, body) = call(&app, "GET", "/admin/api/analytics", None).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["page"]["body_class"], "admin-analytics");
        assert_eq!(body["overview"]["student_count"], 2);
        assert_eq!(body["overview"]["stats"]["streak"], 3);
        let completion = &body["modules"]["completion"][0];
        assert_eq!(completion["module_id"], 7);
        assert_eq!(completion["completed_count"], 1);
        assert_eq!(completion["completion_rate"], 0.5);
        assert_eq!(body["students"]["achievements"][0]["name"], "First steps");
        assert_eq!(body["students"]["top_performers"][0]["name"], "Ana");
        assert_eq!(body["exams"]["summary"]["attempts"], 2);
        assert_eq!(body["demographics"]["countries"][0]["share"], 0.5);
    }

    #[tokio::test]
    async fn one_failing_collection_fails_the_dashboard() {
        let (app, _) = admin_app(Fake { fail_top_performers: true, ..Fake::default() }).await;
        let (status, body) = call(&app, "GET", "/admin/api/analytics", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "E_UPSTREAM");
        assert!(body["error"].as_str().unwrap().contains("stats offline"));
    }

    #[tokio::test]
    async fn module_list_passes_through() {
        let (app, _) = admin_app(Fake::default()).await;
        let (status, body) = call(&app, "GET", "/admin/api/modules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modules"][0]["title"], "Tbilisi Old Town");
    }

    #[tokio::test]
    async fn edit_and_save_existing_module_sends_one_patch() {
        let (app, sent) = admin_app(Fake::default()).await;

        let (status, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({ "module_id": 7 }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["module_id"], 7);
        assert_eq!(view["page"]["body_class"], "admin-module-editor");
        assert_eq!(view["draft"]["vocabulary"][0]["word"], "madloba");
        let id = view["session_id"].as_str().unwrap().to_string();
        let first_word = view["draft"]["vocabulary"][0]["id"].clone();

        let ops = json!({ "ops": [
            { "op": "set_module", "fields": { "title": "Old Tbilisi" } },
            { "op": "remove_item", "list": "vocabulary", "id": first_word }
        ]});
        let (status, view) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/edits"), Some(ops)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["draft"]["title"], "Old Tbilisi");
        assert_eq!(view["draft"]["vocabulary"].as_array().unwrap().len(), 1);

        let (status, preview) = call(&app, "GET", &format!("/admin/api/editor/sessions/{id}/payload"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(preview["method"], "PATCH");
        assert_eq!(preview["path"], "/api/modules/admin/7");
        assert!(sent.lock().unwrap().is_empty());

        let (status, out) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/save"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["created"], false);
        assert_eq!(out["response"]["updated"], true);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (method, path, auth, body) = &sent[0];
        assert_eq!((method.as_str(), path.as_str()), ("PATCH", "/api/modules/admin/7"));
        assert_eq!(auth.as_deref(), Some("Bearer t0ken"));
        assert_eq!(body, &preview["body"]);
        assert_eq!(body["title"], "Old Tbilisi");
        let vocab = body["vocabulary"]["createMany"]["data"].as_array().unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab[0]["word"], "gamarjoba");
        assert_eq!(vocab[0]["position"], 0);
    }

    #[tokio::test]
    async fn saving_a_new_module_posts_and_binds_the_session() {
        let (app, sent) = admin_app(Fake::default()).await;

        let (status, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["module_id"], Value::Null);
        let id = view["session_id"].as_str().unwrap().to_string();

        let ops = json!({ "ops": [{ "op": "set_module", "fields": { "title": "Batumi Boulevard" } }] });
        call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/edits"), Some(ops)).await;

        let (status, out) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/save"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["created"], true);
        assert_eq!(out["module_id"], 99);
        {
            let sent = sent.lock().unwrap();
            assert_eq!(sent[0].1, "/api/modules/new");
            assert_eq!(sent[0].3["title"], "Batumi Boulevard");
            assert!(sent[0].3["vocabulary"]["create"].is_array());
        }

        let (_, view) = call(&app, "GET", &format!("/admin/api/editor/sessions/{id}"), None).await;
        assert_eq!(view["module_id"], 99);
        let (_, preview) = call(&app, "GET", &format!("/admin/api/editor/sessions/{id}/payload"), None).await;
        assert_eq!(preview["method"], "PATCH");
        assert_eq!(preview["path"], "/api/modules/admin/99");
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_any_upstream_call() {
        let (app, sent) = admin_app(Fake::default()).await;
        let (_, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({}))).await;
        let id = view["session_id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/save"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "E_VALIDATION");
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_module_and_unknown_sessions() {
        let (app, _) = admin_app(Fake::default()).await;

        let (status, body) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({ "module_id": 404 }))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("Module not found"));

        let unknown = uuid::Uuid::new_v4();
        let (status, body) = call(&app, "GET", &format!("/admin/api/editor/sessions/{unknown}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "E_SESSION_NOT_FOUND");
        let (status, _) = call(&app, "DELETE", &format!("/admin/api/editor/sessions/{unknown}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejected_edit_batch_leaves_session_untouched() {
        let (app, _) = admin_app(Fake::default()).await;
        let (_, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({ "module_id": 7 }))).await;
        let id = view["session_id"].as_str().unwrap().to_string();

        let ops = json!({ "ops": [
            { "op": "set_module", "fields": { "title": "Changed" } },
            { "op": "remove_item", "list": "quiz", "id": uuid::Uuid::new_v4() }
        ]});
        let (status, body) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/edits"), Some(ops)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "E_ITEM_NOT_FOUND");

        let (_, view) = call(&app, "GET", &format!("/admin/api/editor/sessions/{id}"), None).await;
        assert_eq!(view["draft"]["title"], "Tbilisi Old Town");

        let (status, _) = call(&app, "DELETE", &format!("/admin/api/editor/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn empty_success_body_from_platform_is_a_successful_save() {
        let (app, sent) = admin_app(Fake { patch_no_content: true, ..Fake::default() }).await;
        let (_, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({ "module_id": 7 }))).await;
        let id = view["session_id"].as_str().unwrap().to_string();

        let (status, out) = call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/save"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["created"], false);
        assert_eq!(out["module_id"], 7);
        assert_eq!(out["response"], Value::Null);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_is_reported_even_if_session_closes_mid_save() {
        let (app, sent) = admin_app(Fake { slow_create: true, ..Fake::default() }).await;
        let (_, view) = call(&app, "POST", "/admin/api/editor/sessions", Some(json!({}))).await;
        let id = view["session_id"].as_str().unwrap().to_string();
        let ops = json!({ "ops": [{ "op": "set_module", "fields": { "title": "Kutaisi" } }] });
        call(&app, "POST", &format!("/admin/api/editor/sessions/{id}/edits"), Some(ops)).await;

        let save_uri = format!("/admin/api/editor/sessions/{id}/save");
        let session_uri = format!("/admin/api/editor/sessions/{id}");
        let ((save_status, out), (close_status, _)) = tokio::join!(
            call(&app, "POST", &save_uri, None),
            async {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                call(&app, "DELETE", &session_uri, None).await
            }
        );
        assert_eq!(close_status, StatusCode::NO_CONTENT);
        assert_eq!(save_status, StatusCode::OK);
        assert_eq!(out["created"], true);
        assert_eq!(out["module_id"], 99);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }
}
