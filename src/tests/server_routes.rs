// Service routes end to end:
//  - issuer mocked with httpmock
//  - agent router served on an ephemeral port, state in a temp dir
//  - configure over HTTP, then read the token and the authorization value

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use http::StatusCode;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::config::settings::{MetricsConfig, ServerConfig, SettingsConfig, StorageConfig, TokenSettings, TransportConfig};
    use crate::server::server::router;
    use crate::server::token_routes::AgentTokenManager;
    use crate::storage::FileStore;
    use crate::tests::common::{build_reqwest_client, spawn_axum};
    use crate::transport::HttpTransport;

    fn settings(state_path: &str) -> SettingsConfig {
        SettingsConfig {
            server: ServerConfig { host: "127.0.0.1".to_owned(), port: "0".to_owned() },
            metrics: MetricsConfig { path: "/metrics".to_owned(), is_enabled: true },
            logging: None,
            storage: StorageConfig { path: state_path.to_owned() },
            transport: TransportConfig { timeout_ms: 2000 },
            token: TokenSettings::default(),
        }
    }

    async fn agent(settings: &SettingsConfig) -> Arc<AgentTokenManager> {
        let transport = HttpTransport::new(Duration::from_millis(settings.transport.timeout_ms)).unwrap();
        let store = FileStore::new(&settings.storage.path);
        Arc::new(AgentTokenManager::new(transport, store, &settings.token).await)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn configure_then_retrieve_over_http() {
        let issuer = MockServer::start_async().await;
        let issuer_mock = issuer
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/webxp/exampleapp/customertokens")
                    .json_body(json!({
                        "project_id": "project",
                        "kid": "kid",
                        "sub": { "registered": "alice" },
                        "exp": 60
                    }));
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "customer_token": "jwt-http", "expire_time": 60 }));
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        let settings = settings(state_path.to_str().unwrap());
        let manager = agent(&settings).await;
        let (handle, addr) = spawn_axum(router(&settings, manager.clone()).await).await;
        let client = build_reqwest_client();

        // not configured yet
        let res = client.get(format!("http://{}/authorization", addr)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = client
            .post(format!("http://{}/configure", addr))
            .json(&json!({
                "host": issuer.base_url(),
                "projectToken": "project",
                "publicKey": "kid",
                "customerIds": { "registered": "alice" },
                "expiration": 60
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(state_path.exists());

        let res = client.get(format!("http://{}/token", addr)).send().await.unwrap();
        assert!(res.status().is_success());
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["customer_token"], "jwt-http");

        let res = client.get(format!("http://{}/authorization", addr)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), "jwt-http");

        issuer_mock.assert_async().await;

        let res = client.get(format!("http://{}/metrics", addr)).send().await.unwrap();
        assert!(res.status().is_success());
        assert!(res.text().await.unwrap().contains("customertokenagent_token_requests_total"));

        handle.abort();
    }

    #[tokio::test]
    async fn unsupported_backend_reports_null_token() {
        let issuer = MockServer::start_async().await;
        issuer
            .mock_async(|when, then| {
                when.method(POST).path("/webxp/exampleapp/customertokens");
                then.status(404);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path().join("state.json").to_str().unwrap());
        let manager = agent(&settings).await;
        let (handle, addr) = spawn_axum(router(&settings, manager).await).await;
        let client = build_reqwest_client();

        client
            .post(format!("http://{}/configure", addr))
            .json(&json!({
                "host": issuer.base_url(),
                "projectToken": "project",
                "publicKey": "kid",
                "customerIds": { "registered": "alice" }
            }))
            .send()
            .await
            .unwrap();

        let body: Value = client
            .get(format!("http://{}/token", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["customer_token"], Value::Null);

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_configure_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path().join("state.json").to_str().unwrap());
        let (handle, addr) = spawn_axum(router(&settings, agent(&settings).await).await).await;

        let res = build_reqwest_client()
            .post(format!("http://{}/configure", addr))
            .header("content-type", "application/json")
            .body("{\"expiration\": \"soon\"}")
            .send()
            .await
            .unwrap();
        assert!(res.status().is_client_error());

        handle.abort();
    }
}
