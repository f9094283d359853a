//! HTTP source tests
//!
//! Runs the loader against an in-process axum server standing in for the
//! page origin that serves `/config.project.json` and `/config.default.json`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use mfe_config::apps::{Analytics, ThemeMode};
use mfe_config::config::{
    ConfigFetcher, FetchError, Host, HttpFetcher, LayerKind, LoaderOptions, DEFAULT_CONFIG_PATH,
    PROJECT_CONFIG_PATH,
};
use mfe_config::{load_app, MicroApp};
use serde_json::json;

/// A route served by the test origin.
struct Served {
    path: &'static str,
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl Served {
    fn ok(path: &'static str, body: impl Into<String>) -> Self {
        Self {
            path,
            status: StatusCode::OK,
            body: body.into(),
            delay: None,
        }
    }

    fn status(path: &'static str, status: StatusCode) -> Self {
        Self {
            path,
            status,
            body: String::new(),
            delay: None,
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

async fn spawn_origin(routes: Vec<Served>) -> SocketAddr {
    let mut router = Router::new();
    for served in routes {
        let Served {
            path,
            status,
            body,
            delay,
        } = served;
        router = router.route(
            path,
            get(move || {
                let body = body.clone();
                async move {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    (status, body)
                }
            }),
        );
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Fetcher for the test origin; bypasses any proxy configured in the environment.
fn fetcher_for(addr: SocketAddr) -> HttpFetcher {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpFetcher::new(&format!("http://{}/", addr))
        .unwrap()
        .with_client(client)
}

fn http_host(addr: SocketAddr) -> Host {
    Host::new(Arc::new(fetcher_for(addr)))
}

mod fetcher {
    use super::*;

    #[tokio::test]
    async fn test_fetches_object() {
        let addr = spawn_origin(vec![Served::ok(DEFAULT_CONFIG_PATH, r#"{"refreshIntervalMs": 30000}"#)]).await;
        let fetcher = fetcher_for(addr);

        let doc = fetcher.fetch(DEFAULT_CONFIG_PATH).await.unwrap();

        assert_eq!(doc.value, json!({"refreshIntervalMs": 30000}));
        assert_eq!(doc.location, format!("http://{}/config.default.json", addr));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let addr = spawn_origin(vec![]).await;
        let fetcher = fetcher_for(addr);

        let err = fetcher.fetch(PROJECT_CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let addr = spawn_origin(vec![Served::status(PROJECT_CONFIG_PATH, StatusCode::INTERNAL_SERVER_ERROR)]).await;
        let fetcher = fetcher_for(addr);

        let err = fetcher.fetch(PROJECT_CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = fetcher_for(addr);
        let err = fetcher.fetch(DEFAULT_CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let addr = spawn_origin(vec![
            Served::ok(DEFAULT_CONFIG_PATH, "{}").slow(Duration::from_secs(5))
        ])
        .await;
        let fetcher = fetcher_for(addr).with_timeout(Duration::from_millis(100));

        let err = fetcher.fetch(DEFAULT_CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }
}

mod loading {
    use super::*;

    #[tokio::test]
    async fn test_project_and_default_files_merge() {
        let addr = spawn_origin(vec![
            Served::ok(DEFAULT_CONFIG_PATH, r#"{"refreshIntervalMs": 30000, "charts": ["bar"]}"#),
            Served::ok(PROJECT_CONFIG_PATH, r#"{"theme": {"mode": "dark"}}"#),
        ])
        .await;

        let ctx = load_app::<Analytics>(&http_host(addr), None).await.unwrap();

        assert_eq!(ctx.refresh_interval_ms, 30000);
        assert_eq!(ctx.charts, vec!["bar".to_string()]);
        assert_eq!(ctx.theme.mode, ThemeMode::Dark);
        // untouched sibling keeps its default
        assert_eq!(ctx.theme.primary_color, "#61dafb");
        assert_eq!(ctx.resolved().primary_source(), LayerKind::ProjectFile);
    }

    #[tokio::test]
    async fn test_broken_origin_falls_through_to_defaults() {
        let addr = spawn_origin(vec![
            Served::ok(DEFAULT_CONFIG_PATH, "<html>not json</html>"),
            Served::status(PROJECT_CONFIG_PATH, StatusCode::SERVICE_UNAVAILABLE),
        ])
        .await;

        let ctx = load_app::<Analytics>(&http_host(addr), None).await.unwrap();

        assert_eq!(ctx.refresh_interval_ms, 60_000);
        assert_eq!(ctx.resolved().sources.len(), 1);
        assert!(!ctx.resolved().fell_back());
    }

    #[tokio::test]
    async fn test_loader_timeout_skips_slow_layer() {
        let addr = spawn_origin(vec![
            Served::ok(PROJECT_CONFIG_PATH, r#"{"refreshIntervalMs": 15000}"#).slow(Duration::from_secs(5)),
            Served::ok(DEFAULT_CONFIG_PATH, r#"{"refreshIntervalMs": 30000}"#),
        ])
        .await;

        let loader = Analytics::loader().unwrap().with_options(LoaderOptions {
            fetch_timeout: Some(Duration::from_millis(100)),
            ..LoaderOptions::default()
        });
        let resolved = loader.load(&http_host(addr), None).await;

        assert_eq!(resolved.get_u64("refreshIntervalMs"), Some(30000));
        assert_eq!(resolved.primary_source(), LayerKind::DefaultFile);
    }
}
