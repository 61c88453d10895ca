//! End-to-end: load the fixture CSV (from disk and over HTTP), drive the
//! dispatcher like a user would, and check the rendered figures.

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use launch_dashboard::charts::Figure;
use launch_dashboard::dataset::{DataSource, Dataset};
use launch_dashboard::dispatch::{ControlEvent, ControlState, Dispatcher, OutputId};
use launch_dashboard::server::{router, AppState};
use launch_dashboard::types::{PayloadRange, SiteSelection};
use launch_dashboard::verify;

const FIXTURE: &str = include_str!("fixtures/launches.csv");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/launches.csv")
}

async fn load_fixture() -> Arc<Dataset> {
    Dataset::load(&DataSource::Path(fixture_path())).await.unwrap()
}

fn pie(figure: &Figure) -> &launch_dashboard::charts::PieChart {
    match figure {
        Figure::Pie(p) => p,
        other => panic!("expected pie, got {other:?}"),
    }
}

fn scatter(figure: &Figure) -> &launch_dashboard::charts::ScatterChart {
    match figure {
        Figure::Scatter(s) => s,
        other => panic!("expected scatter, got {other:?}"),
    }
}

#[tokio::test]
async fn fixture_derived_state() {
    let ds = load_fixture().await;
    assert_eq!(ds.len(), 24);
    assert_eq!(
        ds.sites(),
        &["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
    );
    assert_eq!(ds.payload_bounds(), PayloadRange::new(0.0, 9600.0));
}

#[tokio::test]
async fn all_sites_example() {
    let ds = load_fixture().await;
    let dispatcher = Dispatcher::new(ds.clone());
    let mut state = ControlState::initial(&ds);

    let updates = dispatcher.apply(&mut state, ControlEvent::PayloadChanged(PayloadRange::new(0.0, 10_000.0)));
    assert_eq!(updates.len(), 1);
    assert_eq!(scatter(&updates[0].figure).point_count(), 24);

    let initial = dispatcher.initial(&state);
    let pie = pie(&initial[0].figure);
    let values: Vec<f64> = pie.slices.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![3.0, 1.0, 5.0, 3.0]);
}

#[tokio::test]
async fn user_session_walkthrough() {
    let ds = load_fixture().await;
    let dispatcher = Dispatcher::new(ds.clone());
    let mut state = ControlState::initial(&ds);

    // Pick KSC LC-39A: both charts re-render.
    let updates = dispatcher.apply(
        &mut state,
        ControlEvent::SiteSelected(SiteSelection::Site("KSC LC-39A".into())),
    );
    assert_eq!(updates.len(), 2);
    let site_pie = pie(&updates[0].figure);
    assert_eq!(site_pie.slices.len(), 2);
    assert_eq!(site_pie.slices[0].value, 1.0);
    assert_eq!(site_pie.slices[1].value, 5.0);
    assert_eq!(scatter(&updates[1].figure).point_count(), 6);

    // Narrow the payload: only the scatter follows.
    let updates = dispatcher.apply(&mut state, ControlEvent::PayloadChanged(PayloadRange::new(3000.0, 5000.0)));
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].output, OutputId::SuccessPayloadScatterChart);
    let chart = scatter(&updates[0].figure);
    let masses: Vec<f64> = chart.points().map(|p| p.payload_mass_kg).collect();
    assert_eq!(masses, vec![3669.0, 3880.0]);
    let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B4", "B5"]);

    // Nothing that heavy.
    let updates = dispatcher.apply(
        &mut state,
        ControlEvent::PayloadChanged(PayloadRange::new(9_999_999.0, 10_000_000.0)),
    );
    assert!(scatter(&updates[0].figure).is_empty());
}

#[tokio::test]
async fn fixture_passes_self_check() {
    let ds = load_fixture().await;
    let summary = verify::run(&ds);
    assert!(summary.ok(), "{summary:?}");
}

#[tokio::test]
async fn loads_over_http() {
    let app = Router::new().route("/launches.csv", get(|| async { FIXTURE }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = format!("http://{addr}/launches.csv");
    let ds = Dataset::load(&DataSource::parse(&url)).await.unwrap();
    assert_eq!(ds.len(), 24);

    let missing = DataSource::parse(&format!("http://{addr}/missing.csv"));
    assert!(Dataset::load(&missing).await.is_err());
}

#[tokio::test]
async fn dashboard_server_round_trip() {
    let ds = load_fixture().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(AppState::new(ds)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "changed": "site-dropdown",
        "state": { "site": "CCAFS SLC-40", "payload": [0, 10000] },
    });
    let response = client
        .post(format!("http://{addr}/api/callback"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let figures: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(figures["success-pie-chart"]["data"][0]["values"], serde_json::json!([1.0, 3.0]));
    assert_eq!(
        figures["success-payload-scatter-chart"]["layout"]["title"]["text"],
        "Payload vs. Outcome for CCAFS SLC-40"
    );
}
