use axum::{
    Router,
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{
    error::ApiError,
    handlers::{auth, forex, health, settings, users},
    middleware::auth::{is_public, validate_auth},
};
use crate::utils::app_config::AppConfig;

pub fn build_router(app_config: AppConfig) -> Router {
    let auth_service = app_config.auth.clone();

    // Verified claims are stored as a request extension for the handlers
    let auth_layer = middleware::from_fn(move |mut req: Request, next: Next| {
        let auth_service = auth_service.clone();
        async move {
            if req.method() == Method::OPTIONS || is_public(req.uri().path()) {
                return Ok::<Response, ApiError>(next.run(req).await);
            }

            let claims = validate_auth(req.headers(), &auth_service).await?;
            req.extensions_mut().insert(claims);
            Ok::<Response, ApiError>(next.run(req).await)
        }
    });

    Router::new()
        // Health check - public endpoint
        .route("/health", get(health::health))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/info", get(auth::info))
        // Forex candles
        .route("/api/forex/kline", get(forex::get_kline))
        // User management
        .route("/api/users/list", get(users::list_users))
        .route("/api/users/detail", get(users::get_user_detail))
        .route("/api/users/create", post(users::create_user))
        .route("/api/users/update", put(users::update_user))
        .route("/api/users/delete", delete(users::delete_user))
        .route("/api/users/reset-password", post(users::reset_password))
        .route("/api/users/roles", get(users::get_roles))
        // Self service
        .route("/api/users/profile", get(users::get_profile))
        .route("/api/users/profile/update", put(users::update_profile))
        .route("/api/users/change-password", post(users::change_password))
        // Settings
        .route("/api/settings/schema", get(settings::get_schema))
        .route("/api/settings/values", get(settings::get_values))
        .route("/api/settings/save", post(settings::save_settings))
        .layer(TraceLayer::new_for_http())
        .layer(auth_layer)
        .layer(CorsLayer::permissive())
        .with_state(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthService;
    use crate::auth::authenticator::LegacyAuthenticator;
    use crate::auth::config::AuthConfig;
    use crate::forex::config::PlanLimits;
    use crate::forex::data_source::ForexDataSource;
    use crate::forex::tiingo::TiingoClient;
    use crate::settings::store::SettingsStore;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use clap::Parser;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 2024-06-01T00:00:00Z, a Saturday
    const END: i64 = 1_717_200_000;
    // 2024-05-20T00:00:00Z, a Monday
    const MAY_20: i64 = 1_716_163_200;

    fn app(tiingo: &MockServer, dir: &TempDir) -> Router {
        let config = AuthConfig::try_parse_from([
            "auth",
            "--single-user-mode",
            "true",
            "--secret-key",
            "router-test",
            "--admin-user",
            "admin",
            "--admin-password",
            "admin123",
        ])
        .unwrap();
        let auth = AuthService::new(&config, Arc::new(LegacyAuthenticator::new("admin", "admin123")));

        let client = TiingoClient::new(
            Url::parse(&tiingo.uri()).unwrap(),
            Some("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let forex = ForexDataSource::new(client, PlanLimits::default());
        let settings = SettingsStore::new(dir.path().join(".env"));

        build_router(AppConfig::new(None, forex, auth, settings))
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_req(verb: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = axum::http::Request::builder()
            .method(verb)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login(router: &Router) -> String {
        let (status, body) = send(
            router,
            json_req(
                "POST",
                "/api/auth/login",
                None,
                json!({ "username": "admin", "password": "admin123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);

        let (status, body) = send(&router, get_req("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["auth_mode"], "single_user");
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);

        let (status, body) = send(&router, get_req("/api/auth/info", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = send(&router, get_req("/api/auth/info", Some("garbage"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_and_info() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);

        let (status, _) = send(
            &router,
            json_req("POST", "/api/auth/login", None, json!({ "account": "admin", "password": "bad" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &router,
            json_req("POST", "/api/auth/login", None, json!({ "username": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let token = login(&router).await;
        let (status, body) = send(&router, get_req("/api/auth/info", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "admin");
        assert_eq!(body["data"]["avatar"], "/avatar2.jpg");
        assert_eq!(body["data"]["role"]["id"], "admin");
    }

    #[tokio::test]
    async fn test_weekly_kline_is_aggregated_from_daily() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        // two trading weeks of daily bars, Monday through Friday
        let days: Vec<Value> = (0..12)
            .filter(|d| d % 7 < 5)
            .map(|d| {
                let ts = chrono::DateTime::from_timestamp(MAY_20 + d * 86_400, 0).unwrap();
                json!({
                    "date": ts.to_rfc3339(),
                    "ticker": "eurusd",
                    "open": 1.0 + d as f64 / 100.0,
                    "high": 1.5,
                    "low": 0.5,
                    "close": 1.0 + d as f64 / 100.0,
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/fx/eurusd/prices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(days)))
            .mount(&tiingo)
            .await;

        let router = app(&tiingo, &dir);
        let token = login(&router).await;

        let uri = format!(
            "/api/forex/kline?symbol=EURUSD&timeframe=1W&limit=2&before_time={}",
            END
        );
        let (status, body) = send(&router, get_req(&uri, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);

        let candles = body["data"]["candles"].as_array().unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0]["time"], MAY_20);
        assert_eq!(candles[1]["time"], MAY_20 + 7 * 86_400);
        assert_eq!(candles[0]["open"], 1.0);
        assert_eq!(candles[0]["close"], 1.04);
        assert_eq!(candles[1]["close"], 1.11);
    }

    #[tokio::test]
    async fn test_kline_rejects_zero_limit() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);
        let token = login(&router).await;

        let (status, _) = send(
            &router,
            get_req("/api/forex/kline?symbol=EURUSD&timeframe=1D&limit=0", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_timeframe_returns_empty_candles() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);
        let token = login(&router).await;

        let (status, body) = send(
            &router,
            get_req("/api/forex/kline?symbol=EURUSD&timeframe=2W&limit=5", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["candles"], json!([]));
    }

    #[tokio::test]
    async fn test_user_management_needs_multi_user_mode() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);
        let token = login(&router).await;

        let (status, body) = send(&router, get_req("/api/users/list", Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], users::MULTI_USER_REQUIRED);

        let (status, body) = send(&router, get_req("/api/users/roles", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["roles"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_settings_save_and_values() {
        let tiingo = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let router = app(&tiingo, &dir);
        let token = login(&router).await;

        let (status, body) = send(
            &router,
            json_req(
                "POST",
                "/api/settings/save",
                Some(&token),
                json!({ "data_source": { "TIINGO_API_KEY": "secret-key" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated_keys"], json!(["TIINGO_API_KEY"]));
        assert_eq!(body["data"]["requires_restart"], true);

        let (status, body) = send(&router, get_req("/api/settings/values", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["data_source"]["TIINGO_API_KEY"], "secret-key");
        assert_eq!(body["data"]["data_source"]["TIINGO_API_KEY_configured"], true);

        let (status, _) = send(
            &router,
            json_req("POST", "/api/settings/save", Some(&token), json!("nope")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
