use crate::errors::Error;
use crate::metrics::{
    INGEST_REQUESTS_TOTAL, READINGS_ACCEPTED_TOTAL, REJECTED_INVALID_TOTAL,
    REJECTED_UNAUTHORIZED_TOTAL, RETRIEVALS_TOTAL,
};
use crate::model::{Health, IngestAck, IngestPayload, Reading};
use crate::store::LatestReading;
use crate::validate::validate;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    latest: LatestReading,
    api_key: Arc<str>,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveQuery {
    api_key: Option<String>,
}

pub fn create_router(latest: LatestReading, api_key: String) -> Router {
    let state = AppState {
        latest,
        api_key: api_key.into(),
    };

    Router::new()
        .route("/api/data", post(ingest).get(retrieve))
        .route("/api/status", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestAck>, Error> {
    INGEST_REQUESTS_TOTAL.inc();

    // An absent or unparseable body fails exactly like a wrong key.
    let payload: IngestPayload =
        serde_json::from_slice(&body).map_err(|_| Error::Unauthorized)?;
    if payload.api_key.as_deref() != Some(state.api_key.as_ref()) {
        return Err(Error::Unauthorized);
    }

    let reading = validate(&payload)?;
    info!(
        "Accepted reading: status={} lat={} lon={}",
        reading.status, reading.lat, reading.lon
    );

    let timestamp = state.latest.replace(reading).await;
    READINGS_ACCEPTED_TOTAL.inc();

    Ok(Json(IngestAck {
        message: "Data received successfully",
        timestamp,
    }))
}

async fn retrieve(
    State(state): State<AppState>,
    Query(params): Query<RetrieveQuery>,
) -> Result<Json<Reading>, Error> {
    if params.api_key.as_deref() != Some(state.api_key.as_ref()) {
        return Err(Error::Unauthorized);
    }

    RETRIEVALS_TOTAL.inc();
    Ok(Json(state.latest.snapshot().await))
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "running",
        timestamp: Utc::now(),
        latest_data: state.latest.snapshot().await,
    })
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthorized => {
                REJECTED_UNAUTHORIZED_TOTAL.inc();
                StatusCode::UNAUTHORIZED
            }
            Error::MissingField(_) | Error::InvalidCoordinate { .. } => {
                REJECTED_INVALID_TOTAL.inc();
                StatusCode::BAD_REQUEST
            }
            Error::Internal(source) => {
                error!("Internal fault: {:#}", source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "test-key";

    fn state() -> AppState {
        AppState {
            latest: LatestReading::new(),
            api_key: KEY.into(),
        }
    }

    fn body(value: serde_json::Value) -> Bytes {
        Bytes::from(serde_json::to_vec(&value).unwrap())
    }

    fn query(api_key: Option<&str>) -> Query<RetrieveQuery> {
        Query(RetrieveQuery {
            api_key: api_key.map(str::to_string),
        })
    }

    #[test]
    fn test_ingest_then_retrieve_round_trip() {
        tokio_test::block_on(async {
            let state = state();

            let Json(ack) = ingest(
                State(state.clone()),
                body(json!({
                    "api_key": KEY,
                    "status": "alert",
                    "lat": "-6.3",
                    "lon": "106.9",
                })),
            )
            .await
            .unwrap();
            assert_eq!(ack.message, "Data received successfully");

            let Json(reading) = retrieve(State(state), query(Some(KEY))).await.unwrap();
            assert_eq!(reading.status, "alert");
            assert_eq!(reading.lat, -6.3);
            assert_eq!(reading.lon, 106.9);
            assert_eq!(reading.timestamp, Some(ack.timestamp));
        });
    }

    #[test]
    fn test_ingest_wrong_key_leaves_store_unchanged() {
        tokio_test::block_on(async {
            let state = state();

            let err = ingest(
                State(state.clone()),
                body(json!({
                    "api_key": "wrong",
                    "status": "alert",
                    "lat": 1.0,
                    "lon": 2.0,
                })),
            )
            .await
            .unwrap_err();

            assert!(matches!(err, Error::Unauthorized));
            assert_eq!(state.latest.snapshot().await, Reading::default());
        });
    }

    #[test]
    fn test_ingest_unparseable_body_reads_as_bad_key() {
        tokio_test::block_on(async {
            let state = state();

            let err = ingest(State(state.clone()), Bytes::from_static(b"not json"))
                .await
                .unwrap_err();

            assert!(matches!(err, Error::Unauthorized));
            assert_eq!(err.to_string(), "Invalid API key");
            assert_eq!(state.latest.snapshot().await, Reading::default());
        });
    }

    #[test]
    fn test_ingest_missing_field_is_reported_by_name() {
        tokio_test::block_on(async {
            let state = state();

            let err = ingest(
                State(state.clone()),
                body(json!({ "api_key": KEY, "status": "normal", "lon": 2.0 })),
            )
            .await
            .unwrap_err();

            assert!(matches!(err, Error::MissingField("lat")));
            assert_eq!(state.latest.snapshot().await, Reading::default());
        });
    }

    #[test]
    fn test_ingest_bad_coordinate_is_a_validation_error() {
        tokio_test::block_on(async {
            let state = state();

            let err = ingest(
                State(state.clone()),
                body(json!({
                    "api_key": KEY,
                    "status": "normal",
                    "lat": "north-ish",
                    "lon": 2.0,
                })),
            )
            .await
            .unwrap_err();

            assert!(matches!(err, Error::InvalidCoordinate { field: "lat", .. }));
            assert_eq!(state.latest.snapshot().await, Reading::default());
        });
    }

    #[test]
    fn test_ingest_replay_differs_only_in_timestamp() {
        tokio_test::block_on(async {
            let state = state();
            let payload = json!({
                "api_key": KEY,
                "status": "normal",
                "lat": 10.5,
                "lon": -20.25,
            });

            let Json(first) = ingest(State(state.clone()), body(payload.clone()))
                .await
                .unwrap();
            let after_first = state.latest.snapshot().await;

            let Json(second) = ingest(State(state.clone()), body(payload)).await.unwrap();
            let after_second = state.latest.snapshot().await;

            assert_eq!(after_first.status, after_second.status);
            assert_eq!(after_first.lat, after_second.lat);
            assert_eq!(after_first.lon, after_second.lon);
            assert!(second.timestamp > first.timestamp);
        });
    }

    #[test]
    fn test_retrieve_requires_key() {
        tokio_test::block_on(async {
            let state = state();

            assert!(matches!(
                retrieve(State(state.clone()), query(Some("wrong"))).await,
                Err(Error::Unauthorized)
            ));
            assert!(matches!(
                retrieve(State(state), query(None)).await,
                Err(Error::Unauthorized)
            ));
        });
    }

    #[test]
    fn test_retrieve_before_first_write_has_null_timestamp() {
        tokio_test::block_on(async {
            let Json(reading) = retrieve(State(state()), query(Some(KEY))).await.unwrap();

            assert_eq!(reading, Reading::default());
            assert!(reading.timestamp.is_none());
        });
    }

    #[test]
    fn test_health_is_unauthenticated_and_snapshots() {
        tokio_test::block_on(async {
            let state = state();
            let Json(probe) = health(State(state)).await;

            assert_eq!(probe.status, "running");
            assert_eq!(probe.latest_data, Reading::default());
        });
    }
}
