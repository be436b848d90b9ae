pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::collection::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/collections",
            get(handlers::handle_list_collections),
        )
        .route(
            "/api/v1/collections/:name/entries",
            post(handlers::handle_submit).get(handlers::handle_list_entries),
        )
        .route(
            "/api/v1/collections/:name/preview",
            get(handlers::handle_preview),
        )
        .route(
            "/api/v1/collections/:name/layout",
            get(handlers::handle_layout),
        )
        .route("/api/v1/collections/:name/pdf", get(handlers::handle_pdf))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::collection::store::EntryStore;
    use crate::layout::LayoutParams;
    use crate::render::FontConfig;

    fn test_router() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let store = EntryStore::open(dir.path()).unwrap();
        let state = AppState {
            store: Arc::new(store),
            layout_params: LayoutParams::default(),
            font: FontConfig::Mincho,
        };
        (dir, build_router(state))
    }

    fn submit(name: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/collections/{name}/entries"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = test_router();
        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_then_list() {
        let (_dir, app) = test_router();

        let response = app
            .clone()
            .oneshot(submit("spring", json!({"author": "Tomonori", "text": " hisakata "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["entry"], "Tomonori：hisakata");

        let response = app
            .clone()
            .oneshot(submit("spring", json!({"text": "no author"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get_req("/api/v1/collections/spring/entries"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["entries"], json!(["Tomonori：hisakata", "no author"]));
        assert_eq!(body["empty"], false);
    }

    #[tokio::test]
    async fn test_blank_poem_is_rejected_without_storing() {
        let (_dir, app) = test_router();
        let response = app
            .clone()
            .oneshot(submit("spring", json!({"author": "x", "text": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

        let response = app
            .oneshot(get_req("/api/v1/collections"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let (_dir, app) = test_router();
        let response = app
            .oneshot(submit("spring", json!({"author": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("text"));
    }

    #[tokio::test]
    async fn test_malformed_query_gets_json_error() {
        let (_dir, app) = test_router();
        let response = app
            .oneshot(get_req(
                "/api/v1/collections/spring/entries?shuffle_seed=abc",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let (_dir, app) = test_router();

        let response = app
            .clone()
            .oneshot(get_req("/api/v1/collections/autumn/entries"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["empty"], true);

        let response = app
            .clone()
            .oneshot(get_req("/api/v1/collections/autumn/preview"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("empty-collection"));

        let response = app
            .oneshot(get_req("/api/v1/collections/autumn/layout"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["page_count"], 1);
        assert_eq!(body["placements"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_name_and_mode_are_rejected() {
        let (_dir, app) = test_router();

        let response = app
            .clone()
            .oneshot(get_req("/api/v1/collections/..hidden/entries"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(get_req("/api/v1/collections/spring/pdf?mode=diagonal"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_layout_endpoint_vertical_glyphs() {
        let (_dir, app) = test_router();
        app.clone()
            .oneshot(submit("winter", json!({"text": "ab"})))
            .await
            .unwrap();

        let response = app
            .oneshot(get_req("/api/v1/collections/winter/layout?mode=vertical"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["mode"], "vertical");
        assert_eq!(body["page_count"], 1);
        let placements = body["placements"].as_array().unwrap();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0]["content"], json!({"kind": "glyph", "text": "a"}));
        assert_eq!(placements[0]["x"], placements[1]["x"]);
    }

    #[tokio::test]
    async fn test_pdf_download() {
        let (_dir, app) = test_router();
        app.clone()
            .oneshot(submit("spring", json!({"text": "ひさかたの光のどけき春の日に"})))
            .await
            .unwrap();

        let response = app
            .oneshot(get_req(
                "/api/v1/collections/spring/pdf?mode=horizontal&orientation=portrait",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"spring.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_shuffle_seed_orders_preview_and_layout_alike() {
        let (_dir, app) = test_router();
        for i in 0..6 {
            app.clone()
                .oneshot(submit("summer", json!({ "text": format!("poem{i}") })))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(get_req(
                "/api/v1/collections/summer/entries?shuffle_seed=11",
            ))
            .await
            .unwrap();
        let entries: Vec<String> =
            serde_json::from_value(body_json(response).await["entries"].clone()).unwrap();

        let response = app
            .oneshot(get_req(
                "/api/v1/collections/summer/layout?mode=horizontal&shuffle_seed=11",
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        let laid_out: Vec<String> = body["placements"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["content"]["text"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(laid_out, entries);
    }
}
