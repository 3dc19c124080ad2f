//! Weather lookup — geocode a city, fetch current conditions (Open-Meteo).

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

const GEOCODING_SERVICE: &str = "Geocoding";
const FORECAST_SERVICE: &str = "Open-Meteo";

// ── Errors ──

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// Empty or whitespace-only city
    #[error("Please enter a city name.")]
    Validation,

    /// Non-success HTTP status
    #[error("{service} API error ({status})")]
    Network { service: &'static str, status: u16 },

    /// Geocoding returned no matches
    #[error("City \"{city}\" not found.")]
    NotFound { city: String },

    /// Forecast response had no current conditions
    #[error("Could not get current weather for {city}.")]
    DataUnavailable { city: String },

    /// Connection, timeout, or body decoding failure
    #[error("Failed to load weather: {0}")]
    Transport(String),
}

impl LookupError {
    /// True for failures of the network round trip itself.
    pub fn is_network(&self) -> bool {
        matches!(self, LookupError::Network { .. } | LookupError::Transport(_))
    }
}

// ── Wire shapes ──

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<GeoMatch>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub weathercode: i32,
    pub windspeed: f64,
}

// ── Result ──

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub weather_code: i32,
    pub wind_speed: f64,
}

impl WeatherReport {
    /// Nearest integer, halves rounded up.
    pub fn rounded_temperature(&self) -> i64 {
        (self.temperature_c + 0.5).floor() as i64
    }

    pub fn description(&self) -> &'static str {
        describe_weather_code(self.weather_code)
    }

    /// "City, Country" — the history label.
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Map an Open-Meteo weather code to a short description.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        61 | 63 | 65 => "rain",
        80..=82 => "showers",
        71 | 73 | 75 => "snow",
        _ => "unknown",
    }
}

// ── Backend ──

/// The two HTTP calls a lookup needs.
#[async_trait]
pub trait WeatherBackend: Send + Sync {
    async fn geocode(&self, city: &str) -> Result<GeocodingResponse, LookupError>;

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, LookupError>;
}

/// reqwest client for the public Open-Meteo endpoints.
pub struct OpenMeteo {
    client: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
    language: String,
}

impl OpenMeteo {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tabdeck/0.1")
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            language: config.language.clone(),
        })
    }

    fn geocode_request(&self, city: &str) -> reqwest::RequestBuilder {
        self.client.get(&self.geocoding_url).query(&[
            ("name", city),
            ("count", "1"),
            ("language", self.language.as_str()),
            ("format", "json"),
        ])
    }

    fn forecast_request(&self, latitude: f64, longitude: f64) -> reqwest::RequestBuilder {
        self.client
            .get(&self.forecast_url)
            .query(&[("latitude", latitude), ("longitude", longitude)])
            .query(&[("current_weather", "true"), ("timezone", "auto")])
    }

    async fn fetch_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        service: &'static str,
    ) -> Result<T, LookupError> {
        let resp = request
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Network {
                service,
                status: status.as_u16(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))
    }
}

#[async_trait]
impl WeatherBackend for OpenMeteo {
    async fn geocode(&self, city: &str) -> Result<GeocodingResponse, LookupError> {
        Self::fetch_json(self.geocode_request(city), GEOCODING_SERVICE).await
    }

    async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, LookupError> {
        Self::fetch_json(self.forecast_request(latitude, longitude), FORECAST_SERVICE).await
    }
}

// ── Service ──

/// Runs the lookup algorithm. Recording the search is left to the caller,
/// which knows whether the result is still wanted.
#[derive(Clone)]
pub struct WeatherService {
    backend: Arc<dyn WeatherBackend>,
}

impl WeatherService {
    pub fn new(backend: Arc<dyn WeatherBackend>) -> Self {
        Self { backend }
    }

    pub async fn lookup(&self, city: &str) -> Result<WeatherReport, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::Validation);
        }

        let geo = self.backend.geocode(city).await?;
        let Some(place) = geo.results.and_then(|r| r.into_iter().next()) else {
            info!("No geocoding match for {:?}", city);
            return Err(LookupError::NotFound {
                city: city.to_string(),
            });
        };

        let forecast = self
            .backend
            .current_weather(place.latitude, place.longitude)
            .await?;
        let Some(current) = forecast.current_weather else {
            return Err(LookupError::DataUnavailable { city: place.name });
        };

        let report = WeatherReport {
            city: place.name,
            country: place.country,
            temperature_c: current.temperature,
            weather_code: current.weathercode,
            wind_speed: current.windspeed,
        };
        info!(
            "Weather for {}: {}°C, code {}",
            report.label(),
            report.temperature_c,
            report.weather_code
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct FakeBackend {
        geo: Result<GeocodingResponse, LookupError>,
        forecast: Result<ForecastResponse, LookupError>,
        geo_calls: AtomicUsize,
        forecast_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(
            geo: Result<GeocodingResponse, LookupError>,
            forecast: Result<ForecastResponse, LookupError>,
        ) -> Self {
            Self {
                geo,
                forecast,
                geo_calls: AtomicUsize::new(0),
                forecast_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherBackend for FakeBackend {
        async fn geocode(&self, _city: &str) -> Result<GeocodingResponse, LookupError> {
            self.geo_calls.fetch_add(1, Ordering::SeqCst);
            self.geo.clone()
        }

        async fn current_weather(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<ForecastResponse, LookupError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            self.forecast.clone()
        }
    }

    fn paris() -> GeocodingResponse {
        GeocodingResponse {
            results: Some(vec![GeoMatch {
                latitude: 48.85,
                longitude: 2.35,
                name: "Paris".to_string(),
                country: "France".to_string(),
            }]),
        }
    }

    fn mild() -> ForecastResponse {
        ForecastResponse {
            current_weather: Some(CurrentWeather {
                temperature: 18.4,
                weathercode: 1,
                windspeed: 5.2,
            }),
        }
    }

    fn make_service(backend: Arc<FakeBackend>) -> WeatherService {
        WeatherService::new(backend)
    }

    fn http_reply(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Serve `replies` in order, one connection each. Returns the base URL.
    async fn serve(replies: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn open_meteo_at(base: &str) -> WeatherService {
        let config = Config {
            geocoding_url: format!("{}/v1/search", base),
            forecast_url: format!("{}/v1/forecast", base),
            ..Config::default()
        };
        WeatherService::new(Arc::new(OpenMeteo::new(&config).unwrap()))
    }

    #[test]
    fn test_describe_weather_code() {
        assert_eq!(describe_weather_code(0), "clear sky");
        assert_eq!(describe_weather_code(2), "partly cloudy");
        assert_eq!(describe_weather_code(48), "fog");
        assert_eq!(describe_weather_code(53), "drizzle");
        assert_eq!(describe_weather_code(65), "rain");
        assert_eq!(describe_weather_code(81), "showers");
        assert_eq!(describe_weather_code(71), "snow");
        assert_eq!(describe_weather_code(52), "unknown");
        assert_eq!(describe_weather_code(999), "unknown");
    }

    #[test]
    fn test_rounded_temperature() {
        let mut report = WeatherReport {
            city: "X".into(),
            country: "Y".into(),
            temperature_c: 18.4,
            weather_code: 0,
            wind_speed: 1.0,
        };
        assert_eq!(report.rounded_temperature(), 18);
        report.temperature_c = 18.5;
        assert_eq!(report.rounded_temperature(), 19);
        report.temperature_c = -2.5;
        assert_eq!(report.rounded_temperature(), -2);
        report.temperature_c = -2.6;
        assert_eq!(report.rounded_temperature(), -3);
    }

    #[tokio::test]
    async fn test_lookup_paris() {
        let backend = Arc::new(FakeBackend::new(Ok(paris()), Ok(mild())));
        let service = make_service(backend.clone());

        let report = service.lookup("Paris").await.unwrap();
        assert_eq!(report.rounded_temperature(), 18);
        assert_eq!(report.description(), "partly cloudy");
        assert_eq!(report.wind_speed, 5.2);
        assert_eq!(report.wind_speed.to_string(), "5.2");
        assert_eq!(report.label(), "Paris, France");
        assert_eq!(backend.forecast_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_city_never_calls_backend() {
        let backend = Arc::new(FakeBackend::new(Ok(paris()), Ok(mild())));
        let service = make_service(backend.clone());

        for input in ["", "   ", "\t\n"] {
            assert_eq!(service.lookup(input).await, Err(LookupError::Validation));
        }
        assert_eq!(backend.geo_calls.load(Ordering::SeqCst), 0);
        assert_eq!(backend.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_results_is_not_found() {
        for geo in [
            GeocodingResponse { results: None },
            GeocodingResponse {
                results: Some(Vec::new()),
            },
        ] {
            let backend = Arc::new(FakeBackend::new(Ok(geo), Ok(mild())));
            let service = make_service(backend.clone());

            let err = service.lookup("Atlantis").await.unwrap_err();
            assert_eq!(
                err,
                LookupError::NotFound {
                    city: "Atlantis".to_string()
                }
            );
            assert!(!err.is_network());
            assert_eq!(backend.forecast_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_geocoding_status_is_network_error() {
        let backend = Arc::new(FakeBackend::new(
            Err(LookupError::Network {
                service: GEOCODING_SERVICE,
                status: 503,
            }),
            Ok(mild()),
        ));
        let service = make_service(backend.clone());

        let err = service.lookup("Paris").await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(err.to_string(), "Geocoding API error (503)");
        assert_eq!(backend.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_forecast_status_is_network_error() {
        let backend = Arc::new(FakeBackend::new(
            Ok(paris()),
            Err(LookupError::Network {
                service: FORECAST_SERVICE,
                status: 500,
            }),
        ));
        let service = make_service(backend);

        let err = service.lookup("Paris").await.unwrap_err();
        assert_eq!(
            err,
            LookupError::Network {
                service: FORECAST_SERVICE,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_missing_current_weather() {
        let backend = Arc::new(FakeBackend::new(
            Ok(paris()),
            Ok(ForecastResponse::default()),
        ));
        let service = make_service(backend);

        let err = service.lookup("Paris").await.unwrap_err();
        assert_eq!(
            err,
            LookupError::DataUnavailable {
                city: "Paris".to_string()
            }
        );
    }

    #[test]
    fn test_wire_shapes_parse() {
        let geo: GeocodingResponse = serde_json::from_str(
            r#"{"results":[{"id":1,"latitude":48.85,"longitude":2.35,"name":"Париж","country":"Франция"}],"generationtime_ms":0.5}"#,
        )
        .unwrap();
        let first = &geo.results.unwrap()[0];
        assert_eq!(first.name, "Париж");
        assert_eq!(first.country, "Франция");

        let none: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(none.results.is_none());

        let forecast: ForecastResponse = serde_json::from_str(
            r#"{"current_weather":{"temperature":18.4,"windspeed":5.2,"winddirection":250,"weathercode":1,"time":"2024-05-01T12:00"}}"#,
        )
        .unwrap();
        assert_eq!(forecast.current_weather.unwrap().weathercode, 1);
    }

    #[test]
    fn test_open_meteo_request_urls() {
        let client = OpenMeteo::new(&Config::default()).unwrap();

        let geo = client.geocode_request("Paris").build().unwrap();
        let query = geo.url().query().unwrap_or("").to_string();
        assert!(geo.url().as_str().starts_with("https://geocoding-api.open-meteo.com/v1/search"));
        assert!(query.contains("name=Paris"));
        assert!(query.contains("count=1"));
        assert!(query.contains("language=ru"));
        assert!(query.contains("format=json"));

        let forecast = client.forecast_request(48.85, 2.35).build().unwrap();
        let query = forecast.url().query().unwrap_or("").to_string();
        assert!(query.contains("latitude=48.85"));
        assert!(query.contains("longitude=2.35"));
        assert!(query.contains("current_weather=true"));
        assert!(query.contains("timezone=auto"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_network_error() {
        let base = serve(vec![http_reply("503 Service Unavailable", "")]).await;
        let err = open_meteo_at(&base).lookup("Paris").await.unwrap_err();
        assert_eq!(
            err,
            LookupError::Network {
                service: GEOCODING_SERVICE,
                status: 503
            }
        );
    }

    #[tokio::test]
    async fn test_http_forecast_status_is_network_error() {
        let geo = r#"{"results":[{"latitude":48.85,"longitude":2.35,"name":"Paris","country":"France"}]}"#;
        let base = serve(vec![
            http_reply("200 OK", geo),
            http_reply("500 Internal Server Error", ""),
        ])
        .await;
        let err = open_meteo_at(&base).lookup("Paris").await.unwrap_err();
        assert_eq!(
            err,
            LookupError::Network {
                service: FORECAST_SERVICE,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_http_empty_geocoding_body_is_not_found() {
        let base = serve(vec![http_reply("200 OK", "{}")]).await;
        let err = open_meteo_at(&base).lookup("Paris").await.unwrap_err();
        assert_eq!(
            err,
            LookupError::NotFound {
                city: "Paris".to_string()
            }
        );
        assert!(!err.is_network());
    }

    #[tokio::test]
    async fn test_http_undecodable_body_is_transport_error() {
        let base = serve(vec![http_reply("200 OK", "<html>oops</html>")]).await;
        let err = open_meteo_at(&base).lookup("Paris").await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_http_full_lookup() {
        let geo = r#"{"results":[{"latitude":48.85,"longitude":2.35,"name":"Paris","country":"France"}]}"#;
        let forecast = r#"{"current_weather":{"temperature":18.4,"windspeed":5.2,"weathercode":1}}"#;
        let base = serve(vec![http_reply("200 OK", geo), http_reply("200 OK", forecast)]).await;

        let report = open_meteo_at(&base).lookup("Paris").await.unwrap();
        assert_eq!(report.label(), "Paris, France");
        assert_eq!(report.rounded_temperature(), 18);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = open_meteo_at(&base).lookup("Paris").await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
