pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;

/// Logo uploads ride along with the form, so the default 2 MB is too small.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route(
            "/api/v1/datasheets/prompt",
            post(generation::handle_preview_prompt),
        )
        .route(
            "/api/v1/datasheets/generate",
            post(generation::handle_generate),
        )
        // Export API
        .route(
            "/api/v1/datasheets/export/text",
            post(render::handle_export_text),
        )
        .route(
            "/api/v1/datasheets/export/docx",
            post(render::handle_export_docx),
        )
        .route(
            "/api/v1/datasheets/export/pdf",
            post(render::handle_export_pdf),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::test_config;
    use crate::generation::generator::stub::StubCompletion;
    use crate::models::datasheet::CompletionModel;
    use crate::render::logo::png_fixture;
    use crate::render::PdfLayout;

    const BOUNDARY: &str = "datasheet-test-boundary";

    fn state_with(llm: Arc<StubCompletion>) -> AppState {
        AppState {
            llm,
            config: test_config(),
            pdf_layout: PdfLayout::default(),
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn json_request(uri: &str, json: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "datasheet-api");
    }

    #[tokio::test]
    async fn test_generate_returns_markdown_from_model() {
        let llm = Arc::new(StubCompletion::replying("# Overview\n- Fast"));
        let app = build_router(state_with(llm.clone()));

        let request = multipart_request(
            "/api/v1/datasheets/generate",
            &[
                Part::Text("name", "TMP117"),
                Part::Text("weight", "2 g"),
                Part::Text("custom_key_0", "Package"),
                Part::Text("custom_value_0", "WSON-6"),
                Part::Text("model", "gpt-4"),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["markdown"], "# Overview\n- Fast");
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["custom_field_count"], 1);
        assert_eq!(json["has_logo"], false);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls[0].2, CompletionModel::Gpt4);
        assert!(calls[0].1.contains("Weight: 2 g"));
        assert!(calls[0].1.contains("- Package: WSON-6"));
    }

    #[tokio::test]
    async fn test_generate_accepts_png_logo() {
        let app = build_router(state_with(Arc::new(StubCompletion::replying("ok"))));
        let request = multipart_request(
            "/api/v1/datasheets/generate",
            &[
                Part::Text("name", "TMP117"),
                Part::File("logo", "image/png", png_fixture(4, 2)),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["has_logo"], true);
    }

    #[tokio::test]
    async fn test_generate_rejects_non_image_logo() {
        let llm = Arc::new(StubCompletion::replying("unused"));
        let app = build_router(state_with(llm.clone()));
        let request = multipart_request(
            "/api/v1/datasheets/generate",
            &[Part::File("logo", "image/png", b"not an image".to_vec())],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_surfaces_llm_failure_as_bad_gateway() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = multipart_request(
            "/api/v1/datasheets/generate",
            &[Part::Text("name", "TMP117")],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_prompt_preview_does_not_call_model() {
        let llm = Arc::new(StubCompletion::default());
        let app = build_router(state_with(llm.clone()));
        let request = json_request(
            "/api/v1/datasheets/prompt",
            r#"{"spec": {"name": "HX711"}, "custom_fields": [{"key": "Bits", "value": "24"}]}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let prompt = json["prompt"].as_str().unwrap();
        assert!(prompt.contains("Product Name: HX711"));
        assert!(prompt.contains("- Bits: 24"));
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_preview_rejects_eleven_custom_fields() {
        let fields = (0..11)
            .map(|i| format!(r#"{{"key": "k{i}", "value": "v"}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = json_request(
            "/api/v1/datasheets/prompt",
            &format!(r#"{{"custom_fields": [{fields}]}}"#),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("At most 10 custom fields"));
    }

    #[tokio::test]
    async fn test_text_export_is_verbatim_attachment() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = json_request(
            "/api/v1/datasheets/export/text",
            r##"{"markdown": "# Title\n- Point", "product_name": "HX711 Board"}"##,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"hx711-board.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"# Title\n- Point");
    }

    #[tokio::test]
    async fn test_docx_export_without_template() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = json_request(
            "/api/v1/datasheets/export/docx",
            r##"{"markdown": "# Title\n- Point", "spec": {"name": "HX711"}}"##,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_pdf_export_with_logo() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = multipart_request(
            "/api/v1/datasheets/export/pdf",
            &[
                Part::Text("markdown", "# Title\n- Point"),
                Part::Text("product_name", "HX711"),
                Part::File("logo", "image/png", png_fixture(8, 4)),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_export_rejects_empty_markdown() {
        let app = build_router(state_with(Arc::new(StubCompletion::default())));
        let request = json_request(
            "/api/v1/datasheets/export/text",
            r#"{"markdown": "   "}"#,
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
