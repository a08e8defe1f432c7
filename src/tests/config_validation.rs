#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::LogFormat;
    use crate::utils::logging::{resolve, LogLevel};

    const VALID: &str = r#"
settings:
  server:
    host: 127.0.0.1
    port: "8080"
  metrics:
    path: "/metrics"
    is_enabled: true
  logging:
    level: debug
    format: json
  storage:
    path: /tmp/customer-token-agent.json
  token:
    rate_limit_seconds: 120
customer_token:
  host: https://api.example.com
  projectToken: project
  publicKey: kid
  customerIds:
    registered: alice
    loyalty: 42
  expiration: 3600
"#;

    #[tokio::test]
    async fn valid_config_is_parsed_with_defaults() {
        let config = parse_config(VALID.to_owned()).await.unwrap();

        assert_eq!(config.settings.server.port, "8080");
        assert!(config.settings.metrics.is_enabled);
        assert_eq!(config.settings.token.rate_limit_seconds, 120);
        assert_eq!(config.settings.token.endpoint_path, "/webxp/exampleapp/customertokens");
        assert_eq!(config.settings.transport.timeout_ms, 5000);

        let customer_token = config.customer_token.unwrap();
        let ids = customer_token.customer_ids.unwrap();
        assert_eq!(ids["registered"], "alice");
        // scalars are stringified
        assert_eq!(ids["loyalty"], "42");
        assert_eq!(customer_token.expiration, Some(3600));
    }

    #[tokio::test]
    async fn minimal_config_gets_logging_default() {
        let yaml = r#"
settings:
  server:
    host: 0.0.0.0
    port: "9000"
"#;
        let config = parse_config(yaml.to_owned()).await.unwrap();
        let logging = config.settings.logging.clone().unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);
        assert!(config.customer_token.is_none());
        assert!(!config.settings.metrics.is_enabled);

        let overridden = resolve(&config, Some(LogLevel::TRACE));
        assert_eq!(overridden.level, "trace");
    }

    #[tokio::test]
    async fn invalid_config_reports_all_errors() {
        let yaml = r#"
settings:
  server:
    host: 127.0.0.1
    port: "http"
  metrics:
    path: "metrics"
  transport:
    timeout_ms: 0
  token:
    rate_limit_seconds: 0
    endpoint_path: "tokens"
customer_token:
  host: ftp://api.example.com
"#;
        let err = parse_config(yaml.to_owned()).await.unwrap_err().to_string();

        assert!(err.contains("config is not valid"));
        assert!(err.contains("settings.server.port"));
        assert!(err.contains("settings.metrics.path"));
        assert!(err.contains("settings.transport.timeout_ms"));
        assert!(err.contains("settings.token.rate_limit_seconds"));
        assert!(err.contains("settings.token.endpoint_path"));
        assert!(err.contains("customer_token.host"));
    }

    #[tokio::test]
    async fn config_file_expands_env_vars() {
        std::env::set_var("CTA_TEST_ISSUER_HOST", "https://issuer.internal");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
settings:
  server:
    host: 127.0.0.1
    port: "${{CTA_TEST_PORT_UNSET:8181}}"
customer_token:
  host: ${{CTA_TEST_ISSUER_HOST}}
"#
        )
        .unwrap();

        let config = file_to_config(file.path()).await.unwrap();
        assert_eq!(config.settings.server.port, "8181");
        assert_eq!(
            config.customer_token.unwrap().host.as_deref(),
            Some("https://issuer.internal")
        );
    }

    #[test]
    fn missing_env_var_without_default_expands_empty() {
        let expanded = expand_env_vars("a=${CTA_TEST_DEFINITELY_UNSET}").unwrap();
        assert_eq!(expanded, "a=");
    }
}
