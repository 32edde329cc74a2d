mod error;
mod handlers;
mod state;
mod static_files;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;

pub use error::ApiError;
pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/app.js", get(handlers::script))
        .route("/health", get(handlers::health))
        .route("/get_location", get(handlers::get_location))
        .route("/get_workshops", post(handlers::get_workshops))
        .route("/submit_rating_review", post(handlers::submit_rating_review))
        .route("/get_reviews", get(handlers::get_reviews))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind, serve until Ctrl-C / SIGTERM, then drop the review store.
pub async fn start(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config));
    let app = build_router(state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {}", addr))?;

    info!(%addr, radius_m = config.search_radius, "workshop finder listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(
        workshops_reviewed = state.reviews.len(),
        "shutting down, discarding in-memory reviews"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::resolver::tests::Fixed;
    use crate::location::{Coordinate, LocationError, LocationResolver};
    use crate::workshops::finder::tests::{Canned, BOBS_GARAGE};
    use crate::workshops::{WorkshopError, WorkshopFinder};
    use approx::assert_relative_eq;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn state_with(
        location: Result<Coordinate, LocationError>,
        finder: WorkshopFinder,
    ) -> Arc<AppState> {
        let resolver = LocationResolver::with_providers(vec![
            Fixed::boxed(Err(LocationError::NotFound("postcode".into()))),
            Fixed::boxed(location),
        ]);
        Arc::new(AppState::new(resolver, finder))
    }

    fn default_state() -> Arc<AppState> {
        state_with(
            Ok(Coordinate::new(51.5034, -0.1276)),
            WorkshopFinder::with_source(Box::new(Canned::new(BOBS_GARAGE)), 5000),
        )
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_location_ok() {
        let app = build_router(default_state());
        let (status, body) = send(app, get("/get_location?input=10%20Downing%20St")).await;
        assert_eq!(status, StatusCode::OK);
        assert_relative_eq!(body["lat"].as_f64().unwrap(), 51.5034);
        assert_relative_eq!(body["lon"].as_f64().unwrap(), -0.1276);
    }

    #[tokio::test]
    async fn test_get_location_missing_input() {
        let app = build_router(default_state());
        let (status, body) = send(app.clone(), get("/get_location")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(app, get("/get_location?input=%20%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_location_not_found() {
        let state = state_with(
            Err(LocationError::NotFound("zzzz".into())),
            WorkshopFinder::with_source(Box::new(Canned::new(BOBS_GARAGE)), 5000),
        );
        let (status, body) = send(build_router(state), get("/get_location?input=zzzz")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("zzzz"));
    }

    #[tokio::test]
    async fn test_get_location_upstream_failure() {
        let state = state_with(
            Err(LocationError::Network("timed out".into())),
            WorkshopFinder::with_source(Box::new(Canned::new(BOBS_GARAGE)), 5000),
        );
        let (status, _) = send(build_router(state), get("/get_location?input=London")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_workshops_single_node() {
        let app = build_router(default_state());
        let (status, body) =
            send(app, post_json("/get_workshops", json!({"lat": 51.5, "lon": -0.1}))).await;

        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], "51.5,-0.1");
        assert_eq!(list[0]["name"], "Bob's Garage");
        assert_eq!(list[0]["address"], "");
        assert_eq!(list[0]["rating"].as_f64(), Some(0.0));
        assert_eq!(list[0]["total_reviews"], 0);
        assert_eq!(list[0]["reviews"], json!([]));
    }

    #[tokio::test]
    async fn test_get_workshops_missing_lat() {
        let app = build_router(default_state());
        for body in [json!({"lon": -0.1}), json!({"lon": 999.0}), json!({"lat": null, "lon": 0})] {
            let (status, resp) = send(app.clone(), post_json("/get_workshops", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(resp["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_get_workshops_malformed_body() {
        let app = build_router(default_state());
        let (status, resp) =
            send(app, post_json("/get_workshops", json!({"lat": "north", "lon": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(resp["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_workshops_upstream_failure() {
        let state = state_with(
            Ok(Coordinate::new(0.0, 0.0)),
            WorkshopFinder::with_source(
                Box::new(Canned::failing(WorkshopError::Network("HTTP 429".into()))),
                5000,
            ),
        );
        let (status, resp) =
            send(build_router(state), post_json("/get_workshops", json!({"lat": 1, "lon": 2}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp["error"].as_str().unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_submit_then_list_shows_average() {
        let state = default_state();
        let app = build_router(state);

        for (rating, text) in [(5, "Fixed my brakes"), (2, "Pricey")] {
            let (status, body) = send(
                app.clone(),
                post_json(
                    "/submit_rating_review",
                    json!({"workshop_id": "51.5,-0.1", "rating": rating, "review": text}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"success": true}));
        }

        let (_, body) =
            send(app.clone(), post_json("/get_workshops", json!({"lat": 51.5, "lon": -0.1}))).await;
        let w = &body[0];
        assert_eq!(w["total_reviews"], 2);
        assert_relative_eq!(w["rating"].as_f64().unwrap(), 3.5);
        assert_eq!(w["reviews"][0]["review"], "Fixed my brakes");

        let (status, body) = send(app, get("/get_reviews?workshop_id=51.5,-0.1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workshop_id"], "51.5,-0.1");
        assert_eq!(body["total_reviews"], 2);
    }

    #[tokio::test]
    async fn test_submit_missing_rating() {
        let state = default_state();
        let app = build_router(state.clone());

        let (status, body) = send(
            app,
            post_json(
                "/submit_rating_review",
                json!({"workshop_id": "51.5,-0.1", "review": "no stars"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("rating"));
        assert!(state.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_submit_not_json() {
        let app = build_router(default_state());
        let req = Request::builder()
            .method("POST")
            .uri("/submit_rating_review")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("rating=5"))
            .unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_repeated_query_keys_are_json_errors() {
        let app = build_router(default_state());
        for uri in [
            "/get_location?input=a&input=b",
            "/get_reviews?workshop_id=a&workshop_id=b",
        ] {
            let resp = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                resp.headers()[header::CONTENT_TYPE],
                "application/json"
            );
            let (_, body) = send(app.clone(), get(uri)).await;
            assert!(body["error"].as_str().unwrap().contains("duplicate field"));
        }
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_error() {
        let app = build_router(default_state());
        let (status, body) = send(app.clone(), get("/get_workshops")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body["error"].is_string());

        let (status, body) = send(app, post_json("/get_location", json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_get_reviews_missing_id() {
        let app = build_router(default_state());
        let (status, _) = send(app, get("/get_reviews")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let app = build_router(default_state());

        let resp = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (status, body) = send(app.clone(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = send(app, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
