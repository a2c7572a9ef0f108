//! End-to-end session flows against a local mock backend.

use chartsync_controller::{
    ChartSurface, LinePoint, OverlayMarker, OverlayMode, Session, SessionOptions, NoticeSink,
    TradeIntent, UserNotice,
};
use chartsync_core::{Candle, OrderId, OrderSide, RawOrder};
use chartsync_feed::FeedEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Default)]
struct FakeChart {
    series: Vec<Candle>,
    markers: HashMap<OrderId, OverlayMarker>,
    fit_calls: usize,
}

impl ChartSurface for FakeChart {
    fn set_series(&mut self, candles: &[Candle]) {
        self.series = candles.to_vec();
    }
    fn update_bar(&mut self, candle: &Candle) {
        match self.series.last_mut() {
            Some(last) if last.time == candle.time => *last = *candle,
            _ => self.series.push(*candle),
        }
    }
    fn clear_series(&mut self) {
        self.series.clear();
    }
    fn fit_content(&mut self) {
        self.fit_calls += 1;
    }
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn add_marker(&mut self, id: &OrderId, marker: &OverlayMarker) {
        self.markers.insert(id.clone(), marker.clone());
    }
    fn remove_marker(&mut self, id: &OrderId) {
        self.markers.remove(id);
    }
    fn set_side_line(&mut self, _side: OrderSide, _points: &[LinePoint]) {}
    fn clear_side_lines(&mut self) {}
}

#[derive(Debug, Clone, Default)]
struct FakeNotices(Arc<Mutex<Vec<UserNotice>>>);

impl FakeNotices {
    fn taken(&self) -> Vec<UserNotice> {
        self.0.lock().unwrap().clone()
    }
}

impl NoticeSink for FakeNotices {
    fn notify(&self, notice: UserNotice) {
        self.0.lock().unwrap().push(notice);
    }
}

/// Minimal HTTP backend: trade endpoints answer with `trade_status`,
/// everything else (the stream endpoints included) gets a 404.
async fn spawn_backend(trade_status: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut read = 0usize;
                let header_end = loop {
                    let n = match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    read += n;
                    if let Some(pos) = buf[..read].windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                    if read == buf.len() {
                        return;
                    }
                };

                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("Content-Length: "))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while read - header_end < body_len {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => read += n,
                    }
                }

                let response = if head.contains("/api/trade/") {
                    let body =
                        format!("{{\"status\":\"{trade_status}\",\"message\":\"margin\"}}");
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    )
                } else {
                    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string()
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

fn bar(time: i64, close: f64) -> Candle {
    Candle::new(time, 100.0, 104.0, 98.0, close)
}

fn raw_order(id: &str, symbol: &str) -> RawOrder {
    serde_json::from_value(serde_json::json!({
        "order_id": id,
        "symbol": symbol,
        "side": "BUY",
        "price": "101.5",
        "exchange_timestamp": "2024-01-01T00:00:00Z",
        "status": "OPEN",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_trade_without_symbol_is_refused_locally() {
    let notices = FakeNotices::default();
    let (mut session, _rx) = Session::new(
        FakeChart::default(),
        OverlayMode::default(),
        notices.clone(),
        "http://127.0.0.1:9",
        SessionOptions::default(),
    )
    .unwrap();

    session.submit(TradeIntent::OpenStop).await;
    assert_eq!(notices.taken(), vec![UserNotice::NoSymbolSelected]);
}

#[tokio::test]
async fn test_trade_without_history_never_hits_the_network() {
    let notices = FakeNotices::default();
    // Unreachable backend: a request attempt would error, not notice
    // InsufficientData.
    let (mut session, _rx) = Session::new(
        FakeChart::default(),
        OverlayMode::default(),
        notices.clone(),
        "http://127.0.0.1:9",
        SessionOptions::default(),
    )
    .unwrap();

    session.select_symbol("NIFTY");
    let sid = session.controller().session();
    session.handle_event(FeedEvent::CandleSnapshot {
        session: sid,
        candles: vec![bar(100, 102.0)],
    });

    session.submit(TradeIntent::HighStop).await;
    assert_eq!(notices.taken(), vec![UserNotice::InsufficientData]);
    // The single bar survives: nothing was reset.
    assert_eq!(session.controller().candles().len(), 1);
}

#[tokio::test]
async fn test_rejected_trade_notifies_and_clears_overlays_only() {
    let base_url = spawn_backend("failure").await;
    let notices = FakeNotices::default();
    let (mut session, _rx) = Session::new(
        FakeChart::default(),
        OverlayMode::default(),
        notices.clone(),
        &base_url,
        SessionOptions::default(),
    )
    .unwrap();

    session.select_symbol("NIFTY");
    let sid = session.controller().session();
    session.handle_event(FeedEvent::CandleSnapshot {
        session: sid,
        candles: vec![bar(100, 102.0), bar(160, 103.0)],
    });
    session.handle_event(FeedEvent::OrderBatch {
        session: sid,
        orders: vec![raw_order("A", "NIFTY")],
    });
    assert_eq!(session.controller().rendered_ids().len(), 1);

    session.submit(TradeIntent::OpenStop).await;

    let taken = notices.taken();
    assert_eq!(taken.len(), 1);
    assert!(matches!(taken[0], UserNotice::TradeRequestFailed { .. }));
    // Overlays were cleared before the request; candles are untouched.
    assert!(session.controller().rendered_ids().is_empty());
    assert!(session.controller().chart().markers.is_empty());
    assert_eq!(session.controller().candles().len(), 2);
}

#[tokio::test]
async fn test_accepted_trade_resets_overlays_silently() {
    let base_url = spawn_backend("success").await;
    let notices = FakeNotices::default();
    let (mut session, _rx) = Session::new(
        FakeChart::default(),
        OverlayMode::default(),
        notices.clone(),
        &base_url,
        SessionOptions::default(),
    )
    .unwrap();

    session.select_symbol("NIFTY");
    let sid = session.controller().session();
    session.handle_event(FeedEvent::OrderBatch {
        session: sid,
        orders: vec![raw_order("A", "NIFTY")],
    });
    assert_eq!(session.controller().rendered_ids().len(), 1);

    session.submit(TradeIntent::SellAll).await;
    assert!(notices.taken().is_empty());
    assert!(session.controller().rendered_ids().is_empty());
    // The same order may render again on the next push.
    session.handle_event(FeedEvent::OrderBatch {
        session: sid,
        orders: vec![raw_order("A", "NIFTY")],
    });
    assert_eq!(session.controller().rendered_ids().len(), 1);
}

#[tokio::test]
async fn test_symbol_switch_fences_in_flight_events() {
    let notices = FakeNotices::default();
    let (mut session, _rx) = Session::new(
        FakeChart::default(),
        OverlayMode::default(),
        notices.clone(),
        "http://127.0.0.1:9",
        SessionOptions::default(),
    )
    .unwrap();

    session.select_symbol("NIFTY");
    let old_sid = session.controller().session();
    session.select_symbol("BANKNIFTY");

    // Events tagged with the superseded session never mutate state.
    session.handle_event(FeedEvent::CandleSnapshot {
        session: old_sid,
        candles: vec![bar(100, 102.0)],
    });
    session.handle_event(FeedEvent::OrderBatch {
        session: old_sid,
        orders: vec![raw_order("A", "BANKNIFTY")],
    });

    assert!(session.controller().candles().is_empty());
    assert!(session.controller().rendered_ids().is_empty());
    assert_eq!(session.controller().active_symbol(), Some("BANKNIFTY"));
}
