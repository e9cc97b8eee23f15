//! Tests for fleet-transport.

#[cfg(test)]
mod memory {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use fleet_core::{Coordinate, UnitId, WarehouseId};

    use crate::{ArrivalReport, MemoryTracker, ReportCall, TrackingClient, TransportError};

    fn arrival(unit: u32) -> ArrivalReport {
        ArrivalReport {
            unit:       UnitId(unit),
            warehouse:  WarehouseId(0),
            coordinate: Coordinate::new(1, 1),
            message:    "reached".into(),
        }
    }

    async fn connected(tracker: MemoryTracker) -> MemoryTracker {
        tracker.connect("memory", Duration::from_secs(1)).await.unwrap();
        tracker
    }

    #[tokio::test]
    async fn reports_require_connection() {
        let tracker = MemoryTracker::new();
        let cancel = CancellationToken::new();
        let err = tracker.report_move(&cancel, UnitId(0), Coordinate::new(0, 0)).await;
        assert!(matches!(err, Err(TransportError::NotConnected)));
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let tracker = connected(MemoryTracker::new()).await;
        let cancel = CancellationToken::new();
        tracker.report_move(&cancel, UnitId(3), Coordinate::new(2, 2)).await.unwrap();
        tracker.report_arrival(&cancel, &arrival(3)).await.unwrap();

        let calls = tracker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            ReportCall::Move { unit: UnitId(3), at: Coordinate::new(2, 2), ok: true }
        );
        assert!(matches!(&calls[1], ReportCall::Arrival { ok: true, .. }));
        assert_eq!(tracker.accepted_arrivals(UnitId(3)), 1);
        assert_eq!(tracker.address().as_deref(), Some("memory"));
    }

    #[tokio::test]
    async fn fails_only_the_planned_attempt() {
        let tracker = connected(MemoryTracker::new().fail_arrival_attempt(UnitId(1), 2)).await;
        let cancel = CancellationToken::new();
        assert!(tracker.report_arrival(&cancel, &arrival(1)).await.is_ok());
        assert!(matches!(
            tracker.report_arrival(&cancel, &arrival(1)).await,
            Err(TransportError::Injected(_))
        ));
        assert!(tracker.report_arrival(&cancel, &arrival(1)).await.is_ok());
        // Other units are unaffected.
        assert!(tracker.report_arrival(&cancel, &arrival(2)).await.is_ok());
        assert_eq!(tracker.arrival_calls(UnitId(1)), 3);
        assert_eq!(tracker.accepted_arrivals(UnitId(1)), 2);
    }

    #[tokio::test]
    async fn always_failing_moves() {
        let tracker = connected(MemoryTracker::new().fail_all_moves(UnitId(0))).await;
        let cancel = CancellationToken::new();
        for _ in 0..3 {
            assert!(tracker.report_move(&cancel, UnitId(0), Coordinate::new(0, 0)).await.is_err());
        }
        assert_eq!(tracker.move_calls(UnitId(0)), 3);
        assert!(tracker.calls().iter().all(|c| !c.is_ok()));
    }

    #[tokio::test]
    async fn cancelled_token_fails_fast_without_recording() {
        let tracker = connected(MemoryTracker::new()).await;
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = tracker.report_move(&cancel, UnitId(0), Coordinate::new(0, 0)).await;
        assert!(matches!(err, Err(TransportError::Cancelled)));
        assert_eq!(tracker.move_calls(UnitId(0)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_in_flight_call() {
        let tracker = std::sync::Arc::new(
            connected(MemoryTracker::new().with_latency(Duration::from_secs(60))).await,
        );
        let cancel = CancellationToken::new();

        let call = {
            let tracker = tracker.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { tracker.report_arrival(&cancel, &arrival(0)).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        let result = call.await.unwrap();
        assert!(matches!(result, Err(TransportError::Cancelled)));
        assert_eq!(tracker.arrival_calls(UnitId(0)), 0);
    }

    #[tokio::test]
    async fn disconnect_counts_every_invocation() {
        let tracker = connected(MemoryTracker::new()).await;
        tracker.disconnect().await.unwrap();
        assert!(!tracker.is_connected());
        assert!(matches!(tracker.disconnect().await, Err(TransportError::NotConnected)));
        assert_eq!(tracker.disconnect_count(), 2);
    }

    #[tokio::test]
    async fn refused_connection_times_out() {
        let tracker = MemoryTracker::new().refuse_connections();
        let err = tracker.connect("memory", Duration::from_secs(30)).await;
        assert!(matches!(err, Err(TransportError::ConnectTimeout { .. })));
        assert!(!tracker.is_connected());
    }
}

#[cfg(test)]
mod http {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use fleet_core::{Coordinate, UnitId, WarehouseId};

    use crate::http::parse_base;
    use crate::{ArrivalReport, HttpTrackingClient, TrackingClient, TransportError};

    /// `(request line, body)` of one request seen by the fake service.
    type Seen = (String, String);

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn content_length(head: &str) -> usize {
        head.lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Minimal HTTP/1.1 server answering every request with `status`.
    async fn fake_service(status: u16) -> (String, mpsc::UnboundedReceiver<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    let header_end = loop {
                        let n = sock.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            return;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                        if let Some(pos) = find(&buf, b"\r\n\r\n") {
                            break pos + 4;
                        }
                    };
                    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
                    let len = content_length(&head);
                    while buf.len() < header_end + len {
                        let n = sock.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            return;
                        }
                        buf.extend_from_slice(&chunk[..n]);
                    }
                    let line = head.lines().next().unwrap_or_default().to_owned();
                    let body = String::from_utf8_lossy(&buf[header_end..header_end + len]).into_owned();
                    let _ = tx.send((line, body));

                    let response = format!(
                        "HTTP/1.1 {status} Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    );
                    let _ = sock.write_all(response.as_bytes()).await;
                });
            }
        });

        (format!("http://{addr}"), rx)
    }

    #[test]
    fn base_url_normalisation() {
        assert_eq!(parse_base("127.0.0.1:50051").unwrap().as_str(), "http://127.0.0.1:50051/");
        assert_eq!(parse_base("http://host/svc").unwrap().as_str(), "http://host/svc/");
        assert!(matches!(parse_base("http://"), Err(TransportError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn reports_before_connect_fail() {
        let client = HttpTrackingClient::new();
        let cancel = CancellationToken::new();
        let err = client.report_move(&cancel, UnitId(0), Coordinate::new(1, 2)).await;
        assert!(matches!(err, Err(TransportError::NotConnected)));
        assert!(matches!(client.disconnect().await, Err(TransportError::NotConnected)));
    }

    #[tokio::test]
    async fn posts_json_reports() {
        let (address, mut seen) = fake_service(200).await;
        let client = HttpTrackingClient::new();
        client.connect(&address, Duration::from_secs(5)).await.unwrap();
        assert!(client.is_connected());

        let (probe, _) = seen.recv().await.unwrap();
        assert!(probe.starts_with("GET / "), "probe was {probe}");

        let cancel = CancellationToken::new();
        client.report_move(&cancel, UnitId(4), Coordinate::new(7, 3)).await.unwrap();
        let (line, body) = seen.recv().await.unwrap();
        assert!(line.starts_with("POST /api/v1/move-unit "), "line was {line}");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["cargo_unit_id"], 4);
        assert_eq!(json["location"]["x"], 7);
        assert_eq!(json["location"]["y"], 3);

        let report = ArrivalReport {
            unit:       UnitId(4),
            warehouse:  WarehouseId(2),
            coordinate: Coordinate::new(7, 3),
            message:    "done".into(),
        };
        client.report_arrival(&cancel, &report).await.unwrap();
        let (line, body) = seen.recv().await.unwrap();
        assert!(line.starts_with("POST /api/v1/unit-reached-warehouse "), "line was {line}");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["announcement"]["warehouse_id"], 2);
        assert_eq!(json["announcement"]["message"], "done");

        client.disconnect().await.unwrap();
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn non_success_status_is_rejection() {
        let (address, _seen) = fake_service(503).await;
        let client = HttpTrackingClient::new();
        // The probe accepts any HTTP answer.
        client.connect(&address, Duration::from_secs(5)).await.unwrap();

        let cancel = CancellationToken::new();
        let err = client.report_move(&cancel, UnitId(0), Coordinate::new(0, 0)).await;
        assert!(matches!(
            err,
            Err(TransportError::Rejected { operation: "MoveUnit", status: 503 })
        ));
    }

    #[tokio::test]
    async fn silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });

        let client = HttpTrackingClient::new();
        let err = client
            .connect(&format!("http://{addr}"), Duration::from_millis(200))
            .await;
        assert!(matches!(err, Err(TransportError::ConnectTimeout { .. })));
        assert!(!client.is_connected());
    }
}
