use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, put},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aircraft::Aircraft;
use crate::filter::FilterConfig;
use crate::route::{RouteOverlay, overlay};
use crate::state::{LiveState, Status};

#[derive(Debug, Serialize)]
pub struct Selection {
    pub aircraft: Aircraft,
    pub route: Option<RouteOverlay>,
}

pub fn router(state: LiveState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/aircraft", get(visible_aircraft))
        .route("/status", get(status))
        .route("/filter", get(get_filter).put(set_filter))
        .route("/selection", get(get_selection).delete(clear_selection))
        .route("/selection/:id", put(select))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(concat!(
        "<h1>Skytrail</h1><ul>",
        "<li><a href='/aircraft'>/aircraft</a></li>",
        "<li><a href='/status'>/status</a></li>",
        "<li><a href='/filter'>/filter</a></li>",
        "<li><a href='/selection'>/selection</a></li>",
        "</ul>",
    ))
}

async fn visible_aircraft(State(state): State<LiveState>) -> Json<Vec<Aircraft>> {
    Json(state.visible())
}

async fn status(State(state): State<LiveState>) -> Json<Status> {
    Json(state.status())
}

async fn get_filter(State(state): State<LiveState>) -> Json<FilterConfig> {
    Json(state.filter())
}

async fn set_filter(
    State(state): State<LiveState>,
    Json(filter): Json<FilterConfig>,
) -> Json<FilterConfig> {
    info!("filter changed: {:?}", filter);
    state.set_filter(filter.clone());
    Json(filter)
}

async fn get_selection(State(state): State<LiveState>) -> Response {
    match state.selected() {
        Some(aircraft) => {
            let route = overlay(&aircraft);
            Json(Selection { aircraft, route }).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no aircraft selected").into_response(),
    }
}

async fn select(State(state): State<LiveState>, Path(id): Path<String>) -> StatusCode {
    if state.select(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn clear_selection(State(state): State<LiveState>) -> StatusCode {
    state.clear_selection();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use chrono::Utc;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::geo::Position;

    fn test_state() -> LiveState {
        let mut a = Aircraft::new("a", Position::new(20.0, 80.0));
        a.callsign = "IGO101".to_string();
        a.altitude = Some(5000.0);
        a.origin = "VABB".to_string();
        a.destination = "VIDP".to_string();

        let mut b = Aircraft::new("b", Position::new(21.0, 81.0));
        b.callsign = "AI202".to_string();
        b.on_ground = true;

        let state = LiveState::default();
        state.replace(vec![a, b], Utc::now());
        state
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_aircraft_respects_filter() {
        let state = test_state();
        let (status, json) = send(router(state.clone()), "GET", "/aircraft", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 2);

        let body = r#"{"airline_prefix":"AI"}"#;
        let (status, _) = send(router(state.clone()), "PUT", "/filter", Some(body)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(router(state.clone()), "GET", "/aircraft", None).await;
        let visible = json.as_array().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["callsign"], "AI202");
        assert_eq!(visible[0]["trail"].as_array().unwrap().len(), 1);

        let (_, json) = send(router(state), "GET", "/status", None).await;
        assert_eq!(json["active"], 2);
        assert_eq!(json["visible"], 1);
        assert_eq!(json["version"], 1);
        assert!(json["last_ingest"].is_string());
    }

    #[tokio::test]
    async fn test_selection_with_route() {
        let state = test_state();
        let (status, _) = send(router(state.clone()), "GET", "/selection", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router(state.clone()), "PUT", "/selection/zzz", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(router(state.clone()), "PUT", "/selection/a", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, json) = send(router(state.clone()), "GET", "/selection", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["aircraft"]["id"], "a");
        assert_eq!(json["route"]["kind"], "confirmed");
        assert_eq!(json["route"]["destination"]["name"], "Delhi");

        let (status, _) = send(router(state.clone()), "DELETE", "/selection", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.selected().is_none());
    }
}
