//! HTTP page server.
//!
//! Serves one HTML page with the site dropdown, the payload slider and two
//! Plotly graphs. The page posts every control change to `/api/callback`
//! together with the full control state; the server runs the dispatcher and
//! answers with the re-rendered figures, keyed by output id.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;

use crate::controls::PageLayout;
use crate::dataset::Dataset;
use crate::dispatch::{ControlId, ControlState, Dispatcher, Update};

pub struct AppState {
    pub dispatcher: Dispatcher,
    pub layout: PageLayout,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let layout = PageLayout::new(&dataset);
        Self {
            dispatcher: Dispatcher::new(dataset),
            layout,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    /// Control that changed; `None` re-renders every output.
    #[serde(default)]
    pub changed: Option<ControlId>,
    pub state: ControlState,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(health_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/callback", post(callback_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("dashboard running at http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn layout_handler(State(state): State<Arc<AppState>>) -> Json<PageLayout> {
    Json(state.layout.clone())
}

async fn callback_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallbackRequest>,
) -> Json<Value> {
    let updates = match request.changed {
        Some(control) => state.dispatcher.fire(control, &request.state),
        None => state.dispatcher.initial(&request.state),
    };
    Json(figures_json(&updates))
}

fn figures_json(updates: &[Update]) -> Value {
    let mut out = Map::new();
    for update in updates {
        out.insert(update.output.as_str().to_string(), update.figure.to_plotly());
    }
    Value::Object(out)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SpaceX Launch Records Dashboard</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; }
        h1 { text-align: center; color: #503D36; font-size: 40px; }
        select { width: 100%; padding: 8px; font-size: 14px; }
        .slider { display: flex; gap: 12px; align-items: center; margin: 10px 0 4px; }
        .slider input { flex: 1; }
        .marks { display: flex; justify-content: space-between; color: #666; font-size: 12px; }
        .graph { min-height: 450px; }
    </style>
</head>
<body>
    <h1 id="title"></h1>
    <select id="site-dropdown"></select>
    <div id="success-pie-chart" class="graph"></div>
    <p id="slider-label"></p>
    <div class="slider">
        <input type="range" id="payload-low">
        <input type="range" id="payload-high">
        <span id="payload-value"></span>
    </div>
    <div class="marks" id="payload-marks"></div>
    <div id="success-payload-scatter-chart" class="graph"></div>

    <script>
        const dropdown = document.getElementById('site-dropdown');
        const low = document.getElementById('payload-low');
        const high = document.getElementById('payload-high');

        // Range inputs snap their value to the step; the initial range is
        // the dataset's exact bounds, so it is held here until the user
        // moves a slider.
        let payload = [0, 0];

        function currentState() {
            return { site: dropdown.value, payload };
        }

        function readSliders() {
            const a = Number(low.value), b = Number(high.value);
            payload = [Math.min(a, b), Math.max(a, b)];
        }

        function showPayload() {
            const [a, b] = currentState().payload;
            document.getElementById('payload-value').textContent = `${a} - ${b} kg`;
        }

        async function update(changed) {
            const response = await fetch('/api/callback', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ changed, state: currentState() }),
            });
            const figures = await response.json();
            for (const [id, fig] of Object.entries(figures)) {
                Plotly.react(document.getElementById(id), fig.data, fig.layout, { responsive: true });
            }
        }

        async function init() {
            const layout = await (await fetch('/api/layout')).json();
            document.getElementById('title').textContent = layout.title;
            document.title = layout.title;

            for (const o of layout.dropdown.options) {
                dropdown.add(new Option(o.label, o.value));
            }
            dropdown.value = layout.dropdown.value;

            const s = layout.slider;
            document.getElementById('slider-label').textContent = s.label;
            for (const input of [low, high]) {
                input.min = s.min; input.max = s.max; input.step = s.step;
            }
            payload = [s.value[0], s.value[1]];
            low.value = payload[0];
            high.value = payload[1];
            const marks = document.getElementById('payload-marks');
            for (const m of s.marks) {
                const span = document.createElement('span');
                span.textContent = m.label;
                marks.append(span);
            }
            showPayload();

            dropdown.addEventListener('change', () => update(layout.dropdown.id));
            for (const input of [low, high]) {
                input.addEventListener('input', () => { readSliders(); showPayload(); });
                input.addEventListener('change', () => update(s.id));
            }
            await update(null);
        }

        init();
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::generator::LaunchGenerator;

    fn app() -> (Router, Arc<Dataset>) {
        let dataset = Arc::new(LaunchGenerator::with_seed(21).generate_dataset(60));
        (router(Arc::new(AppState::new(dataset.clone()))), dataset)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn index_serves_page() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("success-pie-chart"));
        assert!(html.contains("payload-low"));
    }

    #[test]
    fn page_keeps_unsnapped_initial_range() {
        // The first callback must carry the layout's exact bounds, not the
        // step-snapped values the range inputs report.
        assert!(INDEX_HTML.contains("payload = [s.value[0], s.value[1]];"));
        assert!(INDEX_HTML.contains("return { site: dropdown.value, payload };"));
    }

    #[test]
    fn page_builds_options_without_html_parsing() {
        assert!(INDEX_HTML.contains("new Option(o.label, o.value)"));
        assert!(!INDEX_HTML.contains("innerHTML"));
    }

    #[tokio::test]
    async fn layout_slider_value_is_exact_dataset_bounds() {
        let (app, dataset) = app();
        let response = app
            .oneshot(Request::get("/api/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["slider"]["value"][0], dataset.min_payload());
        assert_eq!(json["slider"]["value"][1], dataset.max_payload());
    }

    #[tokio::test]
    async fn layout_lists_sites() {
        let (app, dataset) = app();
        let response = app
            .oneshot(Request::get("/api/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        let options = json["dropdown"]["options"].as_array().unwrap();
        assert_eq!(options.len(), dataset.sites().len() + 1);
    }

    #[tokio::test]
    async fn initial_callback_renders_both_figures() {
        let (app, dataset) = app();
        let body = serde_json::json!({
            "changed": null,
            "state": { "site": "ALL", "payload": [0, 10000] },
        });
        let (status, json) = post_json(app, "/api/callback", body).await;
        assert_eq!(status, StatusCode::OK);
        let pie_labels = json["success-pie-chart"]["data"][0]["labels"].as_array().unwrap();
        assert_eq!(pie_labels.len(), dataset.sites().len());
        assert!(json["success-payload-scatter-chart"]["data"].is_array());
    }

    #[tokio::test]
    async fn slider_callback_only_updates_scatter() {
        let (app, _) = app();
        let body = serde_json::json!({
            "changed": "payload-slider",
            "state": { "site": "ALL", "payload": [9999999, 10000000] },
        });
        let (status, json) = post_json(app, "/api/callback", body).await;
        assert_eq!(status, StatusCode::OK);
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(json["success-payload-scatter-chart"]["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn malformed_callback_is_rejected() {
        let (app, _) = app();
        let body = serde_json::json!({ "changed": "nope", "state": {} });
        let (status, _) = post_json(app, "/api/callback", body).await;
        assert!(status.is_client_error());
    }
}
