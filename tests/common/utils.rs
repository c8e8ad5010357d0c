use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use std::net::TcpListener;
use std::sync::Arc;

use storefront_analytics::auth::session::Claims;
use storefront_analytics::config::jwt::JwtSettings;
use storefront_analytics::run;
use storefront_analytics::telemetry::{get_subscriber, init_subscriber};

use super::recording_analytics::RecordingAnalytics;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_ALLOWED_ORIGIN: &str = "http://shop.test";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub analytics: Arc<RecordingAnalytics>,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let analytics = Arc::new(RecordingAnalytics::default());
    let server = run(
        listener,
        JwtSettings::new(TEST_JWT_SECRET.to_string()),
        vec![TEST_ALLOWED_ORIGIN.to_string()],
        analytics.clone(),
    )
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        analytics,
    }
}

pub fn session_token_for(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode session token")
}

/// POST a tracking payload, optionally with a session token, and return
/// the status code together with the JSON body.
pub async fn post_track(app: &TestApp, payload: &Value, token: Option<&str>) -> (u16, Value) {
    let mut request = Client::new()
        .post(&format!("{}/analytics/track", &app.address))
        .json(payload);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }
    let response = request.send().await.expect("Failed to execute request.");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("Failed to parse response body");
    (status, body)
}
