//! Integration tests for HttpBackend using wiremock.
//!
//! These verify the exact request shapes the backend must support and how
//! response bodies are classified.

use weather_dash_core::{
    BackendReply, Coordinates, FetchError, HttpBackend, WeatherBackend,
};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a minimal successful weather body
fn weather_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "current": {
            "name": name,
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60, "pressure": 1012},
            "wind": {"speed": 3.1},
            "weather": [{"description": "light rain"}]
        },
        "predictions": [{"day": "Mon", "probability": 72, "condition": "Rain likely"}],
        "forecast": null
    })
}

#[tokio::test]
async fn test_weather_by_city_posts_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("city=Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Paris")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let reply = backend.weather_by_city("Paris").await.unwrap();

    let BackendReply::Report(report) = reply else {
        panic!("expected a report, got {reply:?}");
    };
    assert_eq!(report.current.name, "Paris");
    assert_eq!(report.predictions[0].probability, 72.0);
    assert!(report.forecast.is_none());
}

#[tokio::test]
async fn test_weather_by_city_encodes_city() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_string("city=S%C3%A3o+Paulo+%26+Co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("São Paulo")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let reply = backend.weather_by_city("São Paulo & Co").await.unwrap();
    assert!(matches!(reply, BackendReply::Report(_)));
}

#[tokio::test]
async fn test_backend_error_field_is_a_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "City not found or API error"})),
        )
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let reply = backend.weather_by_city("Atlantis").await.unwrap();

    assert_eq!(reply, BackendReply::Rejected("City not found or API error".into()));
}

#[tokio::test]
async fn test_weather_by_coordinates_posts_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather/coordinates"))
        .and(body_json(serde_json::json!({"lat": 48.85, "lon": 2.35})))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Paris")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let reply = backend
        .weather_by_coordinates(Coordinates { lat: 48.85, lon: 2.35 })
        .await
        .unwrap();

    assert!(matches!(reply, BackendReply::Report(r) if r.current.name == "Paris"));
}

#[tokio::test]
async fn test_search_cities() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities/search"))
        .and(query_param("q", "pa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Paris", "country": "FR"},
            {"name": "Parma", "country": "IT"}
        ])))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let cities = backend.search_cities("pa").await.unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[1].label(), "Parma, IT");
}

#[tokio::test]
async fn test_search_cities_empty_and_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cities/search"))
        .and(query_param("q", "zz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cities/search"))
        .and(query_param("q", "qq"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    assert!(backend.search_cities("zz").await.unwrap().is_empty());
    assert!(backend.search_cities("qq").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_json_error_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Internal Server Error</h1>"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let err = backend.weather_by_city("Paris").await.unwrap_err();

    match err {
        FetchError::Status { endpoint, status, body } => {
            assert_eq!(endpoint, "/weather");
            assert_eq!(status, 500);
            assert!(body.contains("Internal Server Error"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a listener so nothing answers on the port.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let backend = HttpBackend::new(&uri).unwrap();
    let err = backend.search_cities("pa").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { endpoint: "/cities/search", .. }));
}

#[tokio::test]
async fn test_login_keeps_session_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string("username=alice&password=secret"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/dashboard")
                .insert_header("set-cookie", "session=abc123; Path=/"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>dashboard</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Paris")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    backend.login("alice", "secret").await.unwrap();

    let reply = backend.weather_by_city("Paris").await.unwrap();
    assert!(matches!(reply, BackendReply::Report(_)));
}

#[tokio::test]
async fn test_login_rejected_when_login_page_is_shown_again() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<form>Invalid username or password!</form>"),
        )
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(&mock_server.uri()).unwrap();
    let err = backend.login("alice", "wrong").await.unwrap_err();

    assert!(matches!(err, FetchError::Auth(ref user) if user == "alice"));
}
