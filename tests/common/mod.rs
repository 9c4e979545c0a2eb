//! Common test utilities for E2E tests

#![allow(dead_code)]

use soundtrove::{config, AppState};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Temporary directory for the test database and media files
        let temp_dir = TempDir::new().unwrap();

        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: temp_dir.path().join("test.db"),
            },
            storage: config::StorageConfig {
                media_dir: temp_dir.path().join("media"),
                max_upload_bytes: 8 * 1024 * 1024,
            },
            auth: config::AuthConfig {
                token_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                access_token_ttl: 900,
                refresh_token_ttl: 604_800,
                // Minimum cost keeps registration fast in tests
                bcrypt_cost: 4,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = soundtrove::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register a user, asserting success
    ///
    /// # Returns
    /// The new user's ID
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201, "registration of {} failed", username);

        let body: serde_json::Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    /// Log in, asserting success
    ///
    /// # Returns
    /// (access_token, refresh_token)
    pub async fn login(&self, username: &str, password: &str) -> (String, String) {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "login of {} failed", username);

        let body: serde_json::Value = response.json().await.unwrap();
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Register and log in a user
    ///
    /// # Returns
    /// (user_id, access_token)
    pub async fn register_and_login(&self, username: &str) -> (String, String) {
        let user_id = self.register(username, "password123").await;
        let (access, _refresh) = self.login(username, "password123").await;
        (user_id, access)
    }

    /// Upload a track via multipart form, asserting success
    ///
    /// # Returns
    /// The created track as JSON
    pub async fn upload_track(&self, token: &str, title: &str, artist: &str) -> serde_json::Value {
        let form = reqwest::multipart::Form::new()
            .text("title", title.to_string())
            .text("artist", artist.to_string())
            .part(
                "audio",
                reqwest::multipart::Part::bytes(b"fake-audio-bytes".to_vec())
                    .file_name("song.mp3"),
            );

        let response = self
            .client
            .post(self.url("/tracks"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201, "upload of {} failed", title);

        response.json().await.unwrap()
    }
}
