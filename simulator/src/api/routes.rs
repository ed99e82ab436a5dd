use crate::api::state::ServiceState;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use trafficcore::model::{ConfidenceReply, Coordinate, OptimizationReply, PredictionReply};
use warp::{
    http::StatusCode,
    reply::{Reply, Response},
    Filter, Rejection,
};

#[derive(Debug, Deserialize)]
struct AreaQuery {
    lat: f64,
    lon: f64,
    #[serde(default = "default_radius")]
    radius: u32,
}

fn default_radius() -> u32 {
    1000
}

/// Serializes `build(state, id)` for known ids and answers 404 otherwise.
fn per_intersection<T, F>(state: &ServiceState, id: &str, build: F) -> Response
where
    T: Serialize,
    F: FnOnce(&ServiceState, &str) -> T,
{
    if !state.knows(id) {
        return warp::reply::with_status(
            warp::reply::json(&json!({ "error": format!("unknown intersection {id}") })),
            StatusCode::NOT_FOUND,
        )
        .into_response();
    }
    warp::reply::json(&build(state, id)).into_response()
}

/// Every endpoint the monitor consumes.
pub fn routes(
    state: Arc<ServiceState>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let intersections = warp::path!("api" / "intersections")
        .and(warp::get())
        .and(warp::query::<AreaQuery>())
        .and(state_filter.clone())
        .map(|query: AreaQuery, state: Arc<ServiceState>| {
            let center = Coordinate::new(query.lat, query.lon);
            warp::reply::json(&state.intersections(center, query.radius)).into_response()
        });

    let traffic_data = warp::path!("api" / "traffic-data" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| {
                state.profile(id).traffic_samples(state.config().samples)
            })
        });

    let predict = warp::path!("api" / "predict" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| PredictionReply {
                prediction: state.profile(id).prediction(),
            })
        });

    let impact = warp::path!("api" / "environmental-impact" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| {
                state.profile(id).environmental_impact()
            })
        });

    let alerts = warp::path!("api" / "alerts" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| state.profile(id).alerts())
        });

    let confidence = warp::path!("api" / "ai-confidence" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| ConfidenceReply {
                confidence: state.profile(id).confidence(),
            })
        });

    let optimize = warp::path!("api" / "optimize" / String)
        .and(warp::post())
        .and(state_filter)
        .map(|id: String, state: Arc<ServiceState>| {
            per_intersection(&state, &id, |state, id| {
                let passes = state.optimize(id);
                info!("[simulator] optimization pass {passes} applied to {id}");
                OptimizationReply {
                    message: format!("Signal timing at {id} optimized (pass {passes})"),
                }
            })
        });

    intersections
        .or(traffic_data)
        .unify()
        .or(predict)
        .unify()
        .or(impact)
        .unify()
        .or(alerts)
        .unify()
        .or(confidence)
        .unify()
        .or(optimize)
        .unify()
}
