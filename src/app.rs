use std::net::SocketAddr;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::{analysis, auth, food_entries, navigation, profiles, progress};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        // proxies are reachable both at the root and under the API prefix
        .merge(analysis::router())
        .nest(
            "/api/v1",
            Router::new()
                .merge(analysis::router())
                .merge(auth::router())
                .merge(profiles::router())
                .merge(food_entries::router())
                .merge(progress::router())
                .merge(navigation::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(cors())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, ms, "response");
                        } else {
                            tracing::info!(%status, ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm::fake::ScriptedCompletion;

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn empty_description_is_rejected_without_a_model_call() {
        let llm = Arc::new(ScriptedCompletion::replying(r#"{"calories": 1}"#));
        let app = build_app(AppState::fake_with_llm(llm.clone()));

        let (status, body) = send(app.clone(), post_json("/analyze-food", r#"{"foodDescription": ""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(app, post_json("/analyze-food", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn analysis_is_forwarded_on_both_paths() {
        let app = build_app(AppState::fake());
        for uri in ["/analyze-food", "/api/v1/analyze-food"] {
            let (status, body) =
                send(app.clone(), post_json(uri, r#"{"foodDescription": "an apple"}"#)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["calories"], json!(95));
            assert_eq!(body["emoji"], "🍎");
        }
    }

    #[tokio::test]
    async fn goals_are_forwarded() {
        let llm = Arc::new(ScriptedCompletion::replying(
            r#"{"dailyCalories": 2400, "protein": 160, "carbs": 270, "fat": 80}"#,
        ));
        let app = build_app(AppState::fake_with_llm(llm.clone()));
        let (status, body) = send(
            app,
            post_json(
                "/calculate-goals",
                r#"{"age": 30, "height": 180, "weight": 80, "goal": "maintain"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dailyCalories"], json!(2400));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_500_with_error_body() {
        let app = build_app(AppState::fake_with_llm(Arc::new(ScriptedCompletion::failing(503))));
        let (status, body) = send(app, post_json("/analyze-food", r#"{"foodDescription": "soup"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn non_json_model_output_is_a_bad_gateway() {
        let llm = Arc::new(ScriptedCompletion::replying("about 300 kcal"));
        let app = build_app(AppState::fake_with_llm(llm));
        let (status, body) = send(app, post_json("/analyze-food", r#"{"foodDescription": "soup"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_json_is_a_400() {
        let app = build_app(AppState::fake());
        let (status, body) = send(app.clone(), post_json("/analyze-food", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(app, post_json("/calculate-goals", r#"{"age": 30}"#)).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let app = build_app(AppState::fake());
        let req = Request::options("/analyze-food")
            .header(header::ORIGIN, "https://app.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, x-client-info, apikey, content-type")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let allowed = res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allowed.contains("x-client-info"));
        assert!(allowed.contains("apikey"));
    }

    #[tokio::test]
    async fn anonymous_navigation_goes_to_sign_in() {
        let app = build_app(AppState::fake());
        let get = |uri: &str| Request::get(uri).body(Body::empty()).unwrap();

        let (status, body) = send(app.clone(), get("/api/v1/navigation?route=/track")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "target": "/sign-in" }));

        let (_, body) = send(app.clone(), get("/api/v1/navigation?route=/sign-up")).await;
        assert_eq!(body, json!({ "target": null }));

        let (status, _) = send(app, get("/api/v1/navigation?route=/admin")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn application_routes_require_a_token() {
        let app = build_app(AppState::fake());
        for uri in ["/api/v1/food-entries", "/api/v1/progress/today", "/api/v1/profile"] {
            let req = Request::get(uri).body(Body::empty()).unwrap();
            let (status, _) = send(app.clone(), req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
