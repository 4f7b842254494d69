// End-to-end: orchestrator + real discovery client against a local HTTP stub

use hotel_finder::{
    Coordinates, DiscoveryConfig, DiscoverySearchClient, Field, HotelSearchClient,
    LifecyclePhase, MarkerDragEvent, RecordingModalService, ScrollContainer, SearchError,
    SearchOutcome, SliderEvent, StaticLocation, SubmissionState, ViewOrchestrator, WidgetConfig,
    BOOKING_MODAL_ID,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

struct StubResponse {
    status: u16,
    body: String,
}

// Serves scripted responses in order and records each request line
struct DiscoveryStub {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl DiscoveryStub {
    async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buffer = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                    }
                }
                let text = String::from_utf8_lossy(&buffer);
                let request_line = text.lines().next().unwrap_or_default().to_string();
                recorded.lock().await.push(request_line);

                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{}/v1/discover", addr),
            requests,
        }
    }

    fn config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            endpoint: self.base_url.clone(),
            ..DiscoveryConfig::with_api_key("test-key")
        }
    }
}

fn ok(body: &str) -> StubResponse {
    StubResponse {
        status: 200,
        body: body.to_string(),
    }
}

struct List {
    scroll: f64,
}

impl ScrollContainer for List {
    fn scroll_left(&self) -> f64 {
        self.scroll
    }
    fn set_scroll_left(&mut self, value: f64) {
        self.scroll = value;
    }
    fn offset_left(&self) -> f64 {
        0.0
    }
    fn max_scroll_left(&self) -> f64 {
        500.0
    }
}

const TWO_HOTELS: &str = r#"{"items":[
    {"title":"Seaside Inn","position":{"lat":52.51,"lng":13.40},"distance":300},
    {"title":"Grand Hotel","position":{"lat":52.53,"lng":13.41},"distance":900}
]}"#;

#[tokio::test]
async fn test_client_sends_expected_query() {
    let stub = DiscoveryStub::start(vec![ok(TWO_HOTELS)]).await;
    let client = DiscoverySearchClient::new(stub.config()).unwrap();

    let records = client
        .search(Coordinates::new(52.52, 13.405).unwrap())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title(), "Seaside Inn");

    let requests = stub.requests.lock().await;
    let line = &requests[0];
    assert!(line.starts_with("GET /v1/discover?"), "{line}");
    assert!(line.contains("at=52.52,13.405&"), "{line}");
    assert!(line.contains("q=hotel"), "{line}");
    assert!(line.contains("lang=en-US"), "{line}");
    assert!(line.contains("apiKey=test-key"), "{line}");
}

#[tokio::test]
async fn test_client_maps_http_failure() {
    let stub = DiscoveryStub::start(vec![StubResponse {
        status: 401,
        body: r#"{"error":"Unauthorized"}"#.to_string(),
    }])
    .await;
    let client = DiscoverySearchClient::new(stub.config()).unwrap();

    let result = client.search(Coordinates::new(0.0, 0.0).unwrap()).await;
    assert_eq!(result, Err(SearchError::HttpStatus { status_code: 401 }));
}

#[tokio::test]
async fn test_full_widget_session() {
    let stub = DiscoveryStub::start(vec![
        ok(TWO_HOTELS),
        StubResponse {
            status: 503,
            body: "{}".to_string(),
        },
        ok(r#"{"items":[]}"#),
    ])
    .await;
    let client = DiscoverySearchClient::new(stub.config()).unwrap();
    let view = ViewOrchestrator::new(
        WidgetConfig::new(stub.config()),
        StaticLocation::Fix(Coordinates::new(52.52, 13.405).unwrap()),
        client,
        RecordingModalService::new(),
    );

    let mut init = view.initialize(List { scroll: 0.0 }).await;
    assert!(matches!(
        init.search,
        Ok(SearchOutcome::Applied { markers: 2, .. })
    ));
    assert_eq!(view.phase(), LifecyclePhase::Ready);

    init.slider.handle(&SliderEvent::MouseDown { page_x: 100.0 });
    init.slider.handle(&SliderEvent::MouseMove { page_x: 70.0 });
    init.slider.handle(&SliderEvent::MouseUp);
    assert_eq!(init.slider.container().scroll, 90.0);

    // Book the second hotel
    view.open_booking_at(1).unwrap();
    assert!(view.modal().is_open(BOOKING_MODAL_ID));
    assert_eq!(view.form().value(Field::Hotel), "Grand Hotel");
    assert_eq!(view.submit_booking(), SubmissionState::Invalid);
    view.input(Field::FirstName, "Ada").unwrap();
    view.input(Field::LastName, "Lovelace").unwrap();
    view.input(Field::Email, "a.b+c@sub-domain.example.com").unwrap();
    view.input(Field::StayFrom, "2025-06-01").unwrap();
    view.input(Field::StayTo, "2025-06-03").unwrap();
    assert_eq!(view.submit_booking(), SubmissionState::Valid);
    let details = view.form().details().unwrap();
    assert_eq!(details.hotel, "Grand Hotel");
    assert_eq!(details.email, "a.b+c@sub-domain.example.com");
    assert_eq!(details.stay_to.to_string(), "2025-06-03");
    view.close_modal(BOOKING_MODAL_ID);

    // Drag lands on a failing search: markers survive
    let outcome = view
        .marker_drag_end(&MarkerDragEvent::new(48.137, 11.575))
        .await
        .unwrap();
    assert_eq!(outcome, Err(SearchError::HttpStatus { status_code: 503 }));
    assert_eq!(view.hotels().len(), 2);

    // Next drag returns zero matches: markers cleared
    let outcome = view
        .marker_drag_end(&MarkerDragEvent::new(48.2, 11.6))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        Ok(SearchOutcome::Applied { markers: 0, .. })
    ));
    assert!(view.hotels().is_empty());
    assert_eq!(stub.requests.lock().await.len(), 3);
}
