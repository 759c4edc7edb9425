use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::routing::Route;

use super::{DirectionsProvider, Geocoder};

/// Public MapQuest API host.
pub const DEFAULT_MAPQUEST_URL: &str = "https://www.mapquestapi.com";

/// Per-request timeout for MapQuest calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Quality code MapQuest returns when it falls back to the country centroid.
const COUNTRY_QUALITY: &str = "COUNTRY";

/// Connection settings for the MapQuest APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapQuestConfig {
    pub base_url: String,
    pub api_key: String,
}

impl MapQuestConfig {
    /// Read `MAPQUEST_API_KEY` (required) and `MAPQUEST_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MAPQUEST_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::invalid("MAPQUEST_API_KEY is not set"))?;
        let base_url =
            std::env::var("MAPQUEST_URL").unwrap_or_else(|_| DEFAULT_MAPQUEST_URL.to_string());
        Ok(Self { base_url, api_key })
    }
}

/// Blocking MapQuest geocoding and directions client.
#[derive(Debug, Clone)]
pub struct MapQuestClient {
    client: Client,
    config: MapQuestConfig,
}

impl MapQuestClient {
    pub fn new(config: MapQuestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn user_agent() -> String {
    format!("fuelroute-lib/{}", env!("CARGO_PKG_VERSION"))
}

impl Geocoder for MapQuestClient {
    fn geocode(&self, location: &str) -> Result<Coordinate> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::invalid("location must not be empty"));
        }

        debug!(location, "geocoding via MapQuest");
        let body = self
            .client
            .get(self.endpoint("/geocoding/v1/address"))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("location", location),
                ("maxResults", "1"),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        parse_geocode_response(location, &body)
    }
}

impl DirectionsProvider for MapQuestClient {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<Route> {
        let from = format!("{},{}", origin.lat, origin.lon);
        let to = format!("{},{}", destination.lat, destination.lon);

        debug!(%from, %to, "requesting MapQuest directions");
        let body = self
            .client
            .get(self.endpoint("/directions/v2/route"))
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("routeType", "fastest"),
                ("doReverseGeocode", "false"),
                ("fullShape", "true"),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        parse_route_response(&body)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Info {
    #[serde(default)]
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    info: Info,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    locations: Vec<GeocodeLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeocodeLocation {
    lat_lng: LatLng,
    #[serde(default)]
    geocode_quality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Extract the first location from a MapQuest geocoding response body.
pub fn parse_geocode_response(location: &str, body: &str) -> Result<Coordinate> {
    let failure = |message: String| Error::GeocodeFailure {
        location: location.to_string(),
        message,
    };

    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|err| failure(format!("malformed geocoding response: {err}")))?;

    if response.info.statuscode != 0 {
        return Err(failure(join_messages(&response.info)));
    }

    let found = response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.locations.into_iter().next())
        .ok_or_else(|| failure("no matching location".to_string()))?;

    if found.geocode_quality.as_deref() == Some(COUNTRY_QUALITY) {
        warn!(location, "geocoder only matched the country");
        return Err(failure("location is too vague".to_string()));
    }

    Coordinate::new(found.lat_lng.lat, found.lat_lng.lng).map_err(|err| failure(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    info: Info,
    #[serde(default)]
    route: Option<RouteBody>,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    shape: Option<Shape>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Shape {
    #[serde(default)]
    shape_points: Vec<f64>,
}

/// Build a [`Route`] from a MapQuest directions response body.
///
/// `shapePoints` is a flat `[lat, lng, lat, lng, ...]` array. A route without
/// at least two shape points is a routing failure.
pub fn parse_route_response(body: &str) -> Result<Route> {
    let failure = |message: String| Error::RoutingFailure { message };

    let response: DirectionsResponse = serde_json::from_str(body)
        .map_err(|err| failure(format!("malformed directions response: {err}")))?;

    if response.info.statuscode != 0 {
        return Err(failure(join_messages(&response.info)));
    }

    let route = response
        .route
        .ok_or_else(|| failure("response did not include a route".to_string()))?;

    let points: Vec<Coordinate> = route
        .shape
        .map(|shape| {
            shape
                .shape_points
                .chunks_exact(2)
                .map(|pair| Coordinate {
                    lat: pair[0],
                    lon: pair[1],
                })
                .collect()
        })
        .unwrap_or_default();
    if points.len() < 2 {
        return Err(failure("response did not include a route shape".to_string()));
    }

    let distance = match route.distance {
        Some(distance) => distance,
        None => points.windows(2).map(|pair| pair[0].distance_to(&pair[1])).sum(),
    };

    Route::new(points, distance).map_err(|err| failure(err.to_string()))
}

fn join_messages(info: &Info) -> String {
    if info.messages.is_empty() {
        format!("provider returned status {}", info.statuscode)
    } else {
        info.messages.join("; ")
    }
}
