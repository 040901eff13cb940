use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use gas_sentinel::{
    error::AlarmError, hardware::DigitalOutput, web::create_app, AlarmConfig, AlarmController,
    Monitor, SimulatedHardware, WebConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup(level: f32) -> (SimulatedHardware, Monitor) {
    let sim = SimulatedHardware::with_level(level);
    let (controller, button) =
        AlarmController::from_hardware(AlarmConfig::default(), sim.hardware()).unwrap();
    let monitor = Monitor::new(controller, button).unwrap();
    (sim, monitor)
}

fn app(sim: &SimulatedHardware, static_path: &str) -> (Arc<AlarmController>, Router) {
    let (controller, _button) =
        AlarmController::from_hardware(AlarmConfig::default(), sim.hardware()).unwrap();
    let config = WebConfig::default().with_static_path(static_path);
    let router = create_app(&config, controller.clone());
    (controller, router)
}

fn static_dir() -> String {
    format!("{}/static", env!("CARGO_MANIFEST_DIR"))
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Monitor loop
// ---------------------------------------------------------------------------

/// Readings at or below the threshold leave both outputs low, armed or not.
#[tokio::test(start_paused = true)]
async fn monitor_quiet_at_or_below_threshold() {
    for level in [0.0, 0.01, 0.029, 0.03] {
        for armed in [false, true] {
            let (sim, monitor) = setup(level);
            if armed {
                sim.button.press();
                assert!(sim.indicator.is_on());
            }
            sim.buzzer.clear_history();

            let report = assert_ok!(monitor.run_cycle().await);

            assert!(!report.alarm, "level {} armed {}", level, armed);
            assert!(!sim.indicator.is_on(), "level {} armed {}", level, armed);
            assert!(!sim.buzzer.is_on());
            assert!(sim.buzzer.transitions().is_empty());
        }
    }
}

/// An armed alarm above threshold plays exactly three 0.5s/0.5s pulses.
#[tokio::test(start_paused = true)]
async fn monitor_alarm_pattern_when_armed() {
    let (sim, monitor) = setup(0.5);
    sim.button.press();

    let started = Instant::now();
    let report = assert_ok!(monitor.run_cycle().await);

    assert!(report.alarm);
    assert_eq!(report.gas_level, 0.5);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
    assert!(sim.indicator.is_on());
    assert!(!sim.buzzer.is_on());

    let transitions = sim.buzzer.transitions();
    assert_eq!(transitions.len(), 6);
    assert_eq!(sim.buzzer.rising_edges(), 3);
    for (i, transition) in transitions.iter().enumerate() {
        assert_eq!(transition.on, i % 2 == 0);
        assert_eq!(transition.at - started, Duration::from_millis(500) * i as u32);
    }
}

/// Above threshold but disarmed: no alarm, outputs low.
#[tokio::test(start_paused = true)]
async fn monitor_ignores_gas_when_disarmed() {
    let (sim, monitor) = setup(1.0);

    let report = assert_ok!(monitor.run_cycle().await);

    assert!(!report.alarm);
    assert!(!sim.indicator.is_on());
    assert_eq!(sim.buzzer.rising_edges(), 0);
}

/// A held button sounds the buzzer for one second before the reading.
#[tokio::test(start_paused = true)]
async fn monitor_button_hold_beeps() {
    let (sim, monitor) = setup(0.0);
    sim.button.hold(true);

    let started = Instant::now();
    let report = assert_ok!(monitor.run_cycle().await);

    assert!(report.button_held);
    assert_eq!(started.elapsed(), Duration::from_secs(1));

    let transitions = sim.buzzer.transitions();
    assert_eq!(transitions.len(), 2);
    assert!(transitions[0].on);
    assert!(!transitions[1].on);
    assert_eq!(transitions[1].at - transitions[0].at, Duration::from_secs(1));
}

/// Two press edges restore the original armed state.
#[tokio::test(start_paused = true)]
async fn button_press_pair_restores_state() {
    let (sim, monitor) = setup(0.0);
    let controller = monitor.controller().clone();

    sim.button.press();
    assert!(controller.is_armed());
    assert!(sim.indicator.is_on());

    sim.button.press();
    assert!(!controller.is_armed());
    assert!(!sim.indicator.is_on());
}

/// The loop waits the poll interval between cycles and stops on shutdown.
#[tokio::test(start_paused = true)]
async fn monitor_run_repeats_until_shutdown() {
    let (sim, monitor) = setup(0.5);
    sim.button.press();

    // Cycles start at 0s, 5s and 10s (3s alarm + 2s pause).
    let result = monitor.run(time::sleep(Duration::from_millis(10_250))).await;

    assert_ok!(result);
    assert_eq!(sim.buzzer.rising_edges(), 7);
    assert!(!sim.buzzer.is_on());
    assert!(!sim.indicator.is_on());
}

/// Sensor faults end the loop with the error.
#[tokio::test(start_paused = true)]
async fn monitor_run_propagates_sensor_fault() {
    let (sim, monitor) = setup(0.0);
    sim.sensor.set_faulty(true);

    let result = monitor.run(std::future::pending()).await;

    let err = assert_err!(result);
    assert!(matches!(err, AlarmError::Sensor(_)));
}

// ---------------------------------------------------------------------------
// Control endpoint
// ---------------------------------------------------------------------------

/// GET / shows the two-decimal reading and the armed text.
#[tokio::test]
async fn status_page_renders_state() {
    let sim = SimulatedHardware::with_level(0.42);
    let (controller, app) = app(&sim, &static_dir());

    let response = get(app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
    let body = body_text(response).await;
    assert!(body.contains("Gas Sensor Value: 0.42"));
    assert!(body.contains("Gas Sensor Status: DISARMED"));
    assert!(body.contains("ALARM! GAS LEVEL EXCEEDS THRESHOLD!"));

    controller.toggle_armed().unwrap();
    sim.sensor.set_level(0.0);
    let body = body_text(get(app, "/").await).await;
    assert!(body.contains("Gas Sensor Value: 0.00"));
    assert!(body.contains("Gas Sensor Status: ARMED"));
    assert!(body.contains("System is normal."));
}

/// POST submit=On while disarmed arms and lights the indicator.
#[tokio::test]
async fn post_on_arms() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    let response = post_form(app, "/", "submit=On").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    assert!(controller.is_armed());
    assert!(sim.indicator.is_on());
}

/// POST submit=On while already armed changes nothing.
#[tokio::test]
async fn post_on_when_armed_is_idempotent() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    post_form(app.clone(), "/", "submit=On").await;
    let response = post_form(app, "/", "submit=On").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(controller.is_armed());
    assert!(sim.indicator.is_on());
    assert_eq!(sim.indicator.rising_edges(), 1);
}

/// POST submit=Off disarms; unknown values also disarm.
#[tokio::test]
async fn post_off_disarms() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    post_form(app.clone(), "/", "submit=On").await;
    let response = post_form(app.clone(), "/", "submit=Off").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!controller.is_armed());
    assert!(!sim.indicator.is_on());

    post_form(app.clone(), "/", "submit=On").await;
    post_form(app, "/", "submit=maybe").await;
    assert!(!controller.is_armed());
}

/// A body without the submit field is rejected without touching state.
#[tokio::test]
async fn post_malformed_body_is_rejected() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    let response = post_form(app.clone(), "/", "nonsense").await;
    assert!(response.status().is_client_error());
    assert!(!controller.is_armed());

    // Server keeps serving afterwards
    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Unknown paths fall through to the root handlers.
#[tokio::test]
async fn unknown_paths_fall_through_to_root() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    let response = get(app.clone(), "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Gas Sensor Status"));

    let response = post_form(app, "/arm", "submit=On").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(controller.is_armed());
}

/// Asset and API paths still accept the arm/disarm form.
#[tokio::test]
async fn post_to_any_path_applies_command() {
    let sim = SimulatedHardware::new();
    let (controller, app) = app(&sim, &static_dir());

    let response = post_form(app.clone(), "/styles.css", "submit=On").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    assert!(controller.is_armed());

    let response = post_form(app.clone(), "/script.js", "submit=Off").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!controller.is_armed());

    for path in ["/api/status", "/api/health"] {
        let response = post_form(app.clone(), path, "submit=On").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {}", path);
    }
    assert!(controller.is_armed());
    assert!(sim.indicator.is_on());
}

/// Static assets are served with their content types.
#[tokio::test]
async fn static_assets_are_served() {
    let sim = SimulatedHardware::new();
    let (_controller, app) = app(&sim, &static_dir());

    let response = get(app.clone(), "/styles.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/css");
    assert!(body_text(response).await.contains(".container"));

    let response = get(app, "/script.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/javascript");
    assert!(body_text(response).await.contains("function refreshPage"));
}

/// Missing assets are 404.
#[tokio::test]
async fn missing_static_assets_are_not_found() {
    let sim = SimulatedHardware::new();
    let (_controller, app) = app(&sim, "/nonexistent/gas-sentinel-static");

    let response = get(app.clone(), "/styles.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(app, "/script.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Sensor faults during a page render are a 500.
#[tokio::test]
async fn sensor_fault_is_server_error() {
    let sim = SimulatedHardware::new();
    let (_controller, app) = app(&sim, &static_dir());
    sim.sensor.set_faulty(true);

    let response = get(app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let response = get(app, "/api/status").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// JSON status mirrors the page's data.
#[tokio::test]
async fn api_status_returns_json() {
    let sim = SimulatedHardware::with_level(0.25);
    let (controller, app) = app(&sim, &static_dir());
    controller.toggle_armed().unwrap();

    let response = get(app, "/api/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(json["armed"], true);
    assert_eq!(json["gas_level"], 0.25);
    assert_eq!(json["over_threshold"], true);
    assert!(json["timestamp"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn api_health_returns_ok() {
    let sim = SimulatedHardware::new();
    let (_controller, app) = app(&sim, &static_dir());

    let response = get(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "gas-sentinel");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn head_root_returns_ok() {
    let sim = SimulatedHardware::new();
    let (_controller, app) = app(&sim, &static_dir());

    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.is_empty());
}
