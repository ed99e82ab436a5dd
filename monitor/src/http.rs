use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use trafficcore::model::{
    AlertRecord, ConfidenceReply, Coordinate, EnvironmentalImpact, Intersection,
    OptimizationReply, PredictionReply, TrafficSample,
};
use trafficcore::{Endpoint, FetchError, FetchResult, TelemetryBackend};

/// Telemetry service reached over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("parsing telemetry base URL {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("telemetry base URL {base_url} cannot carry a path");
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Endpoint URL with `id` as a single percent-encoded path segment.
    /// `Intersections` takes no id; pass an empty string.
    pub fn url(&self, endpoint: Endpoint, id: &str) -> FetchResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| FetchError::Transport {
                endpoint,
                message: format!("{} cannot carry a path", self.base_url),
            })?;
            segments.pop_if_empty().push("api").push(endpoint.name());
            if endpoint != Endpoint::Intersections {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, url: Url) -> FetchResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(endpoint, e))?;
        decode(endpoint, response).await
    }
}

fn transport(endpoint: Endpoint, err: reqwest::Error) -> FetchError {
    FetchError::Transport {
        endpoint,
        message: err.to_string(),
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    response: reqwest::Response,
) -> FetchResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    response.json::<T>().await.map_err(|e| FetchError::Decode {
        endpoint,
        message: e.to_string(),
    })
}

#[async_trait]
impl TelemetryBackend for HttpBackend {
    async fn intersections(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> FetchResult<Vec<Intersection>> {
        let mut url = self.url(Endpoint::Intersections, "")?;
        url.query_pairs_mut()
            .append_pair("lat", &center.lat.to_string())
            .append_pair("lon", &center.lon.to_string())
            .append_pair("radius", &radius.to_string());
        self.get(Endpoint::Intersections, url).await
    }

    async fn traffic_data(&self, id: &str) -> FetchResult<Vec<TrafficSample>> {
        self.get(Endpoint::TrafficData, self.url(Endpoint::TrafficData, id)?)
            .await
    }

    async fn prediction(&self, id: &str) -> FetchResult<String> {
        let reply: PredictionReply = self
            .get(Endpoint::Predict, self.url(Endpoint::Predict, id)?)
            .await?;
        Ok(reply.prediction)
    }

    async fn environmental_impact(&self, id: &str) -> FetchResult<EnvironmentalImpact> {
        self.get(
            Endpoint::EnvironmentalImpact,
            self.url(Endpoint::EnvironmentalImpact, id)?,
        )
        .await
    }

    async fn alerts(&self, id: &str) -> FetchResult<Vec<AlertRecord>> {
        self.get(Endpoint::Alerts, self.url(Endpoint::Alerts, id)?)
            .await
    }

    async fn ai_confidence(&self, id: &str) -> FetchResult<f64> {
        let reply: ConfidenceReply = self
            .get(Endpoint::AiConfidence, self.url(Endpoint::AiConfidence, id)?)
            .await?;
        Ok(reply.confidence)
    }

    async fn optimize(&self, id: &str) -> FetchResult<String> {
        let response = self
            .client
            .post(self.url(Endpoint::Optimize, id)?)
            .send()
            .await
            .map_err(|e| transport(Endpoint::Optimize, e))?;
        let reply: OptimizationReply = decode(Endpoint::Optimize, response).await?;
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warp::Filter;

    async fn serve() -> String {
        let intersections = warp::path!("api" / "intersections")
            .and(warp::query::<std::collections::HashMap<String, String>>())
            .map(|query: std::collections::HashMap<String, String>| {
                warp::reply::json(&json!([{
                    "id": "A",
                    "name": format!("near {}", query.get("lat").cloned().unwrap_or_default()),
                    "lat": -1.95,
                    "lon": 30.09,
                    "trafficLevel": 0.4
                }]))
            });
        // Echoes the raw remainder of the path so tests can see exactly what was requested.
        let predict = warp::path("api")
            .and(warp::path("predict"))
            .and(warp::path::tail())
            .map(|tail: warp::path::Tail| {
                warp::reply::json(&json!({ "prediction": format!("busy at {}", tail.as_str()) }))
            });
        let confidence = warp::path!("api" / "ai-confidence" / String)
            .map(|_id: String| warp::reply::json(&json!({ "confidence": "high" })));
        let alerts = warp::path!("api" / "alerts" / String).map(|_id: String| {
            warp::reply::with_status(
                warp::reply::json(&json!({ "error": "down" })),
                warp::http::StatusCode::SERVICE_UNAVAILABLE,
            )
        });
        let optimize = warp::path!("api" / "optimize" / String)
            .and(warp::post())
            .map(|id: String| warp::reply::json(&json!({ "message": format!("optimized {id}") })));

        let routes = intersections
            .or(predict)
            .or(confidence)
            .or(alerts)
            .or(optimize);
        let (address, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{address}/")
    }

    #[test]
    fn urls_join_base_and_endpoint_path() {
        let backend = HttpBackend::new("http://localhost:5000/").unwrap();
        assert_eq!(
            backend.url(Endpoint::AiConfidence, "INT-001").unwrap().as_str(),
            "http://localhost:5000/api/ai-confidence/INT-001"
        );
        assert_eq!(
            backend.url(Endpoint::Intersections, "").unwrap().as_str(),
            "http://localhost:5000/api/intersections"
        );
    }

    #[test]
    fn urls_keep_a_base_path_prefix() {
        let backend = HttpBackend::new("http://gateway.local/telemetry/").unwrap();
        assert_eq!(
            backend.url(Endpoint::Alerts, "INT-002").unwrap().as_str(),
            "http://gateway.local/telemetry/api/alerts/INT-002"
        );
    }

    #[test]
    fn reserved_characters_stay_inside_the_id_segment() {
        let backend = HttpBackend::new("http://localhost:5000").unwrap();
        assert_eq!(
            backend.url(Endpoint::Predict, "A#2").unwrap().as_str(),
            "http://localhost:5000/api/predict/A%232"
        );
        assert_eq!(
            backend.url(Endpoint::Predict, "A?x=1").unwrap().as_str(),
            "http://localhost:5000/api/predict/A%3Fx=1"
        );
        assert_eq!(
            backend.url(Endpoint::Predict, "A/B").unwrap().as_str(),
            "http://localhost:5000/api/predict/A%2FB"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(HttpBackend::new("not a url").is_err());
        assert!(HttpBackend::new("mailto:ops@example.com").is_err());
    }

    #[tokio::test]
    async fn ids_with_reserved_characters_reach_the_service_intact() {
        let backend = HttpBackend::new(&serve().await).unwrap();
        assert_eq!(backend.prediction("A#2").await.unwrap(), "busy at A%232");
        assert_eq!(backend.prediction("A?x=1").await.unwrap(), "busy at A%3Fx=1");
        assert_eq!(backend.prediction("A/B").await.unwrap(), "busy at A%2FB");
    }

    #[tokio::test]
    async fn decodes_successful_replies() {
        let backend = HttpBackend::new(&serve().await).unwrap();
        let seeded = backend
            .intersections(Coordinate::new(-1.9441, 30.0619), 1000)
            .await
            .unwrap();
        assert_eq!(seeded[0].id, "A");
        assert_eq!(seeded[0].name, "near -1.9441");
        assert_eq!(backend.prediction("A").await.unwrap(), "busy at A");
        assert_eq!(backend.optimize("A").await.unwrap(), "optimized A");
    }

    #[tokio::test]
    async fn maps_failures_to_fetch_errors() {
        let backend = HttpBackend::new(&serve().await).unwrap();
        assert_eq!(
            backend.alerts("A").await.unwrap_err(),
            FetchError::Status {
                endpoint: Endpoint::Alerts,
                status: 503
            }
        );
        assert!(matches!(
            backend.ai_confidence("A").await.unwrap_err(),
            FetchError::Decode {
                endpoint: Endpoint::AiConfidence,
                ..
            }
        ));
        assert!(matches!(
            backend.traffic_data("A").await.unwrap_err(),
            FetchError::Status { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let backend = HttpBackend::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(
            backend.prediction("A").await.unwrap_err(),
            FetchError::Transport { .. }
        ));
    }
}
