pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::refinement::handlers as refinement;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::views::handlers as views;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML pages
        .route("/", get(views::handle_index))
        .route("/sessions/:id", get(views::handle_session_page))
        .route("/sessions/:id/refine", post(views::handle_session_refine))
        // Refinement API
        .route("/api/v1/refine", post(refinement::handle_refine))
        // Session API
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session)
                .patch(session::handle_edit_session)
                .delete(session::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/refine",
            post(session::handle_refine_session),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::refinement::Refiner;
    use crate::session::controller::tests::{
        scenario_result, wait_until_idle, FakeRefiner, GatedRefiner,
    };

    fn app_with(refiner: Arc<dyn Refiner>) -> (Router, AppState) {
        let state = AppState::new(refiner);
        (build_router(state.clone()), state)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Empty));
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_refine_api_returns_result() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Succeed(scenario_result())));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/refine",
                json!({
                    "systemPrompt": "<system>Summarize.</system>",
                    "userPrompt": "<prompt>Add two numbers.</prompt>"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "conciseSystemPrompt": "Summarize input.",
                "inaccuracies": ["No input size bound given."],
                "refinedUserPrompt": "<prompt># Add Two Numbers\n..."
            })
        );
    }

    #[tokio::test]
    async fn test_refine_api_accepts_empty_inputs() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Succeed(scenario_result())));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/refine",
                json!({ "systemPrompt": "", "userPrompt": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refine_api_failure_is_bad_gateway() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Fail(
            "rate limit exceeded".to_string(),
        )));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/refine",
                json!({ "systemPrompt": "s", "userPrompt": "u" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "rate limit exceeded");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Succeed(scenario_result())));

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/v1/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["loading"], false);
        assert!(created["result"].is_null());
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/v1/sessions/{id}"),
                json!({ "systemPrompt": "<system>Summarize.</system>" }),
            ))
            .await
            .unwrap();
        let edited = body_json(response).await;
        assert_eq!(edited["systemPrompt"], "<system>Summarize.</system>");
        assert!(edited["userPrompt"].as_str().unwrap().starts_with("<prompt>"));

        let response = app
            .clone()
            .oneshot(empty_request("POST", &format!("/api/v1/sessions/{id}/refine")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let refined = body_json(response).await;
        assert_eq!(refined["outcome"], "completed");
        assert_eq!(refined["session"]["result"]["conciseSystemPrompt"], "Summarize input.");
        assert!(refined["session"]["error"].is_null());
        assert_eq!(refined["session"]["loading"], false);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/v1/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/v1/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_refine_failure_is_recorded_in_state() {
        let (app, state) = app_with(Arc::new(FakeRefiner::Fail(
            "rate limit exceeded".to_string(),
        )));
        let session = state.sessions.create().await;

        let response = app
            .oneshot(empty_request(
                "POST",
                &format!("/api/v1/sessions/{}/refine", session.id()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["outcome"], "failed");
        assert_eq!(body["session"]["error"], "rate limit exceeded");
        assert_eq!(body["session"]["loading"], false);
    }

    #[tokio::test]
    async fn test_session_refine_while_loading_is_conflict() {
        let refiner = Arc::new(GatedRefiner::default());
        let (app, state) = app_with(refiner.clone());
        let session = state.sessions.create().await;
        session.edit(None, Some("slow".to_string())).await;

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.trigger_refine().await }
        });
        refiner.started.notified().await;

        let response = app
            .clone()
            .oneshot(empty_request(
                "POST",
                &format!("/api/v1/sessions/{}/refine", session.id()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Edits are still accepted while loading.
        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/v1/sessions/{}", session.id()),
                json!({ "userPrompt": "changed" }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["loading"], true);
        assert_eq!(body["userPrompt"], "changed");

        refiner.release.notify_one();
        first.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unknown_session_api_is_not_found() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Empty));
        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/api/v1/sessions/{}", Uuid::new_v4()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_index_redirects_to_new_session_page() {
        let (app, state) = app_with(Arc::new(FakeRefiner::Empty));
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);
        assert!(target.starts_with("/sessions/"));
        assert_eq!(state.sessions.len().await, 1);

        let response = app.oneshot(empty_request("GET", &target)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Prompt Architect"));
        assert!(html.contains("Ready to Refine"));
    }

    #[tokio::test]
    async fn test_unknown_session_page_redirects_home() {
        let (app, _) = app_with(Arc::new(FakeRefiner::Empty));
        let response = app
            .oneshot(empty_request("GET", &format!("/sessions/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_form_refine_stores_inputs_and_renders_result() {
        let (app, state) = app_with(Arc::new(FakeRefiner::Succeed(scenario_result())));
        let session = state.sessions.create().await;

        let response = app
            .clone()
            .oneshot(form_request(
                &format!("/sessions/{}/refine", session.id()),
                "system_prompt=%3Csystem%3ESummarize.%3C%2Fsystem%3E&user_prompt=Add+two+numbers.",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/sessions/{}", session.id()));

        wait_until_idle(&session).await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.state.system_prompt, "<system>Summarize.</system>");
        assert_eq!(snapshot.state.user_prompt, "Add two numbers.");
        assert_eq!(snapshot.state.result, Some(scenario_result()));

        let response = app
            .oneshot(empty_request("GET", &format!("/sessions/{}", session.id())))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Refined System Instructions"));
        assert!(html.contains("No input size bound given."));
    }

    #[tokio::test]
    async fn test_form_refine_failure_shows_banner() {
        let (app, state) = app_with(Arc::new(FakeRefiner::Fail(
            "rate limit exceeded".to_string(),
        )));
        let session = state.sessions.create().await;

        let response = app
            .clone()
            .oneshot(form_request(
                &format!("/sessions/{}/refine", session.id()),
                "system_prompt=s&user_prompt=u",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        wait_until_idle(&session).await;

        let response = app
            .oneshot(empty_request("GET", &format!("/sessions/{}", session.id())))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("rate limit exceeded"));
        assert!(html.contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn test_form_refine_redirects_before_the_call_finishes() {
        let refiner = Arc::new(GatedRefiner::default());
        let (app, state) = app_with(refiner.clone());
        let session = state.sessions.create().await;
        let refine_uri = format!("/sessions/{}/refine", session.id());
        let page_uri = format!("/sessions/{}", session.id());

        let response = app
            .clone()
            .oneshot(form_request(&refine_uri, "system_prompt=sys&user_prompt=slow"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        refiner.started.notified().await;

        let response = app
            .clone()
            .oneshot(empty_request("GET", &page_uri))
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("disabled>Analyzing...</button>"));
        assert!(html.contains("http-equiv=\"refresh\""));

        // A second submit while loading starts nothing new.
        let response = app
            .clone()
            .oneshot(form_request(&refine_uri, "system_prompt=sys&user_prompt=slow"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(refiner.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        refiner.release.notify_one();
        wait_until_idle(&session).await;

        let response = app.oneshot(empty_request("GET", &page_uri)).await.unwrap();
        let html = body_text(response).await;
        assert!(!html.contains("disabled>"));
        assert!(html.contains("Refined System Instructions"));
    }
}
