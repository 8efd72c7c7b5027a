//! # Integration Tests
//!
//! Cross-crate integration and end-to-end tests.
//!
//! Covers:
//! - Wire format (local TCP listener, through ReqwestTransport)
//! - Simulated broadcast scenarios (MockTransport, no network)
//! - Config -> registry -> dispatcher assembly

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // contracts crate is linkable
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(contracts::NO_RESULT_RESPONSE, "No result");
    }
}

#[cfg(test)]
mod wire_tests {
    use std::time::Duration;

    use contracts::{DispatchStatus, HeadersConfig, Target};
    use dispatcher::{DispatcherBuilder, DispatcherConfig, ReqwestTransport};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    /// One request as it arrived on the socket
    #[derive(Debug)]
    struct CapturedRequest {
        request_line: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Minimal HTTP/1.1 responder: captures each request and answers `status body`
    async fn spawn_responder(
        status: u16,
        body: &'static str,
    ) -> (u16, mpsc::UnboundedReceiver<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(request) = read_request(stream, status, body).await {
                        let _ = tx.send(request);
                    }
                });
            }
        });

        (port, rx)
    }

    async fn read_request(
        mut stream: TcpStream,
        status: u16,
        body: &str,
    ) -> Option<CapturedRequest> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next()?.to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut request_body = buf[header_end + 4..].to_vec();
        while request_body.len() < content_length {
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            request_body.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Test\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;

        Some(CapturedRequest {
            request_line,
            headers,
            body: request_body,
        })
    }

    fn local_transport() -> ReqwestTransport {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        ReqwestTransport::from_client(client)
    }

    fn headers() -> HeadersConfig {
        HeadersConfig {
            api_key: "test-key".to_string(),
            user_agent: "syncpost-tests".to_string(),
            extra: [("x-trace".to_string(), "1".to_string())].into_iter().collect(),
        }
    }

    fn config() -> DispatcherConfig {
        DispatcherConfig {
            headers: headers(),
            ..Default::default()
        }
    }

    async fn assert_wire_contract(payload: &str) {
        let (port, mut rx) = spawn_responder(200, "accepted").await;
        let target = Target::new(
            "local",
            "vhost.example.com",
            format!("http://127.0.0.1:{port}/api/submit"),
        );
        let dispatcher = DispatcherBuilder::new(config(), local_transport())
            .targets(vec![target])
            .build();

        let outcome = dispatcher
            .dispatch(payload, Some(Duration::from_secs(5)))
            .await
            .unwrap();

        let result = &outcome.results[0];
        assert!(result.success, "unexpected result: {result:?}");
        assert_eq!(result.status, DispatchStatus::Http(200));
        assert_eq!(result.response, "accepted");

        let request = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();

        let expected_body = format!("data={payload}");
        assert_eq!(request.request_line, "POST /api/submit HTTP/1.1");
        assert_eq!(request.header("host"), Some("vhost.example.com"));
        assert_eq!(
            request.header("content-length"),
            Some(expected_body.len().to_string().as_str())
        );
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.header("apikey"), Some("test-key"));
        assert_eq!(request.header("user-agent"), Some("syncpost-tests"));
        assert_eq!(request.header("x-trace"), Some("1"));
        assert_eq!(request.body, expected_body.as_bytes());
    }

    #[tokio::test]
    async fn test_wire_contract_ascii() {
        assert_wire_contract("abc").await;
    }

    #[tokio::test]
    async fn test_wire_contract_multibyte() {
        // Byte length, not char count, and no form re-encoding
        assert_wire_contract("数据 & more").await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_success() {
        let (port, _rx) = spawn_responder(500, "boom").await;
        let target = Target::new("local", "127.0.0.1", format!("http://127.0.0.1:{port}/"));
        let dispatcher = DispatcherBuilder::new(config(), local_transport())
            .targets(vec![target])
            .build();

        let outcome = dispatcher.dispatch("abc", None).await.unwrap();
        assert!(outcome.results[0].success);
        assert_eq!(outcome.results[0].status, DispatchStatus::Http(500));
        assert_eq!(outcome.results[0].response, "boom");
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let (live_port, _rx) = spawn_responder(200, "ok").await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let targets = vec![
            Target::new("live", "127.0.0.1", format!("http://127.0.0.1:{live_port}/")),
            Target::new("dead", "127.0.0.1", format!("http://127.0.0.1:{port}/")),
        ];
        let dispatcher = DispatcherBuilder::new(config(), local_transport())
            .targets(targets)
            .build();

        let outcome = dispatcher.dispatch("abc", None).await.unwrap();

        assert_eq!(outcome.results[0].status, DispatchStatus::Http(200));
        let dead = &outcome.results[1];
        assert!(!dead.success);
        assert_eq!(dead.status, DispatchStatus::Error);
        assert!(
            dead.response.to_lowercase().contains("refused"),
            "unexpected message: {}",
            dead.response
        );
        assert!(dead.response.chars().count() <= 123);
        assert!(dead.sent_at.is_some());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use contracts::{DispatchStatus, Target};
    use dispatcher::{
        DispatchError, DispatcherBuilder, DispatcherConfig, MockBehavior, MockTransport,
    };

    fn target(name: &str) -> Target {
        Target::new(
            name,
            format!("{name}.example.com"),
            format!("https://{name}.example.com/api/submit"),
        )
    }

    fn url(name: &str) -> String {
        format!("https://{name}.example.com/api/submit")
    }

    /// A and B answer 200, C refuses the connection
    #[tokio::test]
    async fn test_mixed_outcomes() {
        let transport = MockTransport::new().with_behavior(
            url("c"),
            MockBehavior::Fail("Connection refused (os error 111)".into()),
        );
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), transport)
            .targets(vec![target("a"), target("b"), target("c")])
            .default_payload("abc")
            .build();

        let outcome = dispatcher.dispatch_default(None).await.unwrap();

        assert_eq!(outcome.success_count(), 2);
        let summary = outcome.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(outcome.results[2].status, DispatchStatus::Error);
        assert!(outcome.results[2].response.contains("refused"));
    }

    /// B never answers within the aggregate timeout
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_slow_target_becomes_no_response() {
        let transport = MockTransport::new().with_behavior(
            url("b"),
            MockBehavior::Delayed {
                delay: Duration::from_secs(5),
                status: 200,
                body: "late".into(),
            },
        );
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), transport)
            .targets(vec![target("a"), target("b"), target("c")])
            .build();

        let outcome = dispatcher
            .dispatch("abc", Some(Duration::from_secs(1)))
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].status, DispatchStatus::Http(200));
        assert_eq!(outcome.results[2].status, DispatchStatus::Http(200));
        let slow = &outcome.results[1];
        assert_eq!(slow.target, "b");
        assert_eq!(slow.status, DispatchStatus::NoResponse);
        assert_eq!(slow.response, "No result");
        assert_eq!(slow.network_time_ms, 0.0);
        assert!(outcome.total_time_ms >= 1_000.0);
        assert!(outcome.total_time_ms < 2_000.0);
        assert!(outcome.max_send_time_diff_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_empty_targets_is_configuration_error() {
        let transport = MockTransport::new();
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), transport).build();

        let err = dispatcher.dispatch("abc", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::NoTargets));
        assert!(dispatcher.transport().recorded().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_send_times_are_tight() {
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), MockTransport::new())
            .targets(vec![target("a"), target("b"), target("c")])
            .build();

        let mut worst_skew = 0.0_f64;
        for _ in 0..50 {
            let outcome = dispatcher.dispatch("abc", None).await.unwrap();
            assert!(outcome.results.iter().all(|r| r.sent_at.is_some()));
            worst_skew = worst_skew.max(outcome.max_send_time_diff_ms);
        }

        assert!(worst_skew < 5.0, "worst skew {} ms", worst_skew);
        assert_eq!(dispatcher.metrics().dispatch_count(), 50);
    }

    #[tokio::test]
    async fn test_long_error_is_truncated() {
        let transport = MockTransport::new().with_fallback(MockBehavior::Fail("e".repeat(300)));
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), transport)
            .targets(vec![target("a")])
            .build();

        let outcome = dispatcher.dispatch("abc", None).await.unwrap();

        let response = &outcome.results[0].response;
        assert_eq!(response.len(), 123);
        assert!(response.starts_with(&"e".repeat(120)));
        assert!(response.ends_with("..."));
    }

    #[tokio::test]
    async fn test_outcome_serializes_status() {
        let transport =
            MockTransport::new().with_behavior(url("b"), MockBehavior::Fail("refused".into()));
        let dispatcher = DispatcherBuilder::new(DispatcherConfig::default(), transport)
            .targets(vec![target("a"), target("b")])
            .build();

        let outcome = dispatcher.dispatch("abc", None).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["results"][0]["status"], 200);
        assert_eq!(json["results"][1]["status"], "Error");
        assert!(json["results"][0].get("sent_at").is_none());

        let offsets: Vec<f64> = json["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["sent_offset_ms"].as_f64().unwrap())
            .collect();
        let spread = offsets.iter().cloned().fold(f64::MIN, f64::max)
            - offsets.iter().cloned().fold(f64::MAX, f64::min);
        let skew = json["max_send_time_diff_ms"].as_f64().unwrap();
        assert!((spread - skew).abs() < 1e-6, "spread {spread} vs skew {skew}");
    }
}

#[cfg(test)]
mod assembly_tests {
    use contracts::{StorageConfig, SyncpostConfig};
    use dispatcher::{DispatcherBuilder, DispatcherConfig, MockTransport};
    use registry::{extract_payload, TargetRegistry};

    fn config_in(dir: &std::path::Path) -> SyncpostConfig {
        let toml = format!(
            r#"
[dispatch]
default_timeout_secs = 5

[storage]
targets_file = "{}"
payload_file = "{}"

[registry]
url_path = "/api/ws_send/appSend"
"#,
            dir.join("hosts.json").display(),
            dir.join("default_data.txt").display()
        );
        config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
            .unwrap()
    }

    /// Config -> registry edits -> dispatcher snapshot -> broadcast
    #[tokio::test]
    async fn test_registry_feeds_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let mut registry = TargetRegistry::load(&config);
        while registry.remove_at(0).is_some() {}
        registry.add_host("one.example.com").unwrap();
        registry.set_default_payload(extract_payload("curl -X POST --data 'token=xyz'"));

        // State survives a reload
        let registry = TargetRegistry::load(&config);
        assert_eq!(registry.targets().len(), 1);
        assert_eq!(
            registry.targets()[0].url,
            "https://one.example.com/api/ws_send/appSend"
        );
        assert_eq!(registry.default_payload(), "token=xyz");

        let dispatcher =
            DispatcherBuilder::new(DispatcherConfig::from(&config), MockTransport::new())
                .targets(registry.snapshot())
                .default_payload(registry.default_payload())
                .build();

        let outcome = dispatcher.dispatch_default(None).await.unwrap();
        assert_eq!(outcome.success_count(), 1);

        let sent = dispatcher.transport().recorded();
        assert_eq!(sent[0].body, "data=token=xyz");
        assert_eq!(sent[0].header("Host"), Some("one.example.com"));
        assert_eq!(sent[0].header("content-length"), Some("14"));
    }

    #[test]
    fn test_default_storage_paths() {
        let storage = StorageConfig::default();
        assert_eq!(storage.targets_file.to_str(), Some("hosts.json"));
        assert_eq!(storage.payload_file.to_str(), Some("default_data.txt"));
    }
}
