use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::RoutingConfig,
    error::{DiscretizeError, DiscretizeResult},
};
use super::TravelTimeService;

#[derive(Serialize)]
struct MatrixRequest<'a> {
    from_points: Vec<[f64; 2]>,
    to_points: Vec<[f64; 2]>,
    vehicle: &'a str,
    out_arrays: [&'static str; 1],
}

#[derive(Deserialize)]
struct MatrixResponse {
    times: Option<Vec<Vec<f64>>>,
    message: Option<String>,
}

/// Client for the GraphHopper Matrix API.
pub struct GraphHopperClient {
    client: Client,
    url: String,
    vehicle: String,
    max_elements: usize,
}

impl GraphHopperClient {
    pub fn new(config: &RoutingConfig) -> DiscretizeResult<Self> {
        let key = config.api_key.as_deref()
            .ok_or_else(|| DiscretizeError::invalid("api_key", "no GraphHopper API key configured"))?;
        let client = Client::builder()
            .user_agent(concat!("discretbox/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DiscretizeError::ExternalService(e.to_string()))?;

        Ok(Self {
            client,
            url: format!("{}?key={key}", config.base_url),
            vehicle: config.vehicle.clone(),
            max_elements: config.max_elements,
        })
    }
}

impl TravelTimeService for GraphHopperClient {
    fn times(&self, from: &[(f64, f64)], to: &[(f64, f64)]) -> DiscretizeResult<Vec<Vec<f64>>> {
        let body = MatrixRequest {
            from_points: from.iter().map(|&(lon, lat)| [lon, lat]).collect(),
            to_points: to.iter().map(|&(lon, lat)| [lon, lat]).collect(),
            vehicle: &self.vehicle,
            out_arrays: ["times"],
        };

        let resp = self.client.post(&self.url).json(&body).send()
            .map_err(|e| DiscretizeError::ExternalService(format!("POST matrix: {e}")))?;
        let status = resp.status();
        let parsed = resp.json::<MatrixResponse>()
            .map_err(|e| DiscretizeError::ExternalService(format!("matrix response ({status}): {e}")))?;

        if !status.is_success() {
            return Err(DiscretizeError::ExternalService(format!(
                "matrix request returned {status}: {}", parsed.message.unwrap_or_default())))
        }
        parsed.times.ok_or_else(|| DiscretizeError::ExternalService("matrix response has no `times` array".into()))
    }

    fn max_elements(&self) -> usize { self.max_elements }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_rejected_before_any_request() {
        let err = GraphHopperClient::new(&RoutingConfig::default()).err().unwrap();
        assert!(matches!(err, DiscretizeError::InvalidParameter { name: "api_key", .. }));
    }

    #[test]
    fn request_body_uses_lon_lat_order() {
        let body = MatrixRequest {
            from_points: vec![[-43.17, -22.90]],
            to_points: vec![[-43.21, -22.95]],
            vehicle: "car",
            out_arrays: ["times"],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from_points"][0][0], -43.17);
        assert_eq!(json["out_arrays"][0], "times");
    }

    #[test]
    fn key_lands_in_query_string() {
        let config = RoutingConfig { api_key: Some("abc".into()), ..Default::default() };
        let client = GraphHopperClient::new(&config).unwrap();
        assert_eq!(client.url, "https://graphhopper.com/api/1/matrix?key=abc");
        assert_eq!(client.max_elements(), 100);
    }
}
