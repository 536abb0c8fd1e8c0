// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only. Ranking endpoints
// return bare JSON arrays; stock endpoints return an object keyed by code.
//
// CORS is permissive: the dashboard frontend is served from another origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::analytics::{self, IntervalWindow};
use crate::app_state::AppState;
use crate::chart::{self, svg, OhlcRecord, RenderConfig};
use crate::error::{ApiError, ApiResult};
use crate::types::{Direction, StockRow};

const MOVERS_LIMIT: usize = 10;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with tracing, CORS and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        // ── Rankings ────────────────────────────────────────────────
        .route("/api/v1/random", get(random))
        .route("/api/v1/gain", get(gain))
        .route("/api/v1/decline", get(decline))
        .route("/api/v1/interval-close-k", get(interval_close_k))
        .route("/api/v1/interval-change-k", get(interval_change_k))
        // ── Per-stock ───────────────────────────────────────────────
        .route("/api/v1/companies", get(companies))
        .route("/api/v1/stocks/:code", get(stock_history))
        .route("/api/v1/stocks/:code/chart", get(stock_chart))
        .route("/api/v1/stocks/:code/chart.svg", get(stock_chart_svg))
        // ── Middleware & State ───────────────────────────────────────
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    rows: usize,
    companies: usize,
    latest_date: Option<NaiveDate>,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        rows: state.store.row_count(),
        companies: state.store.company_count(),
        latest_date: state.store.latest_date(),
        uptime_secs: state.uptime_secs(),
        server_time: Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Rankings
// =============================================================================

/// Random sample of the latest session.
async fn random(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StockRow>>> {
    let latest = state.store.latest_date().ok_or(ApiError::NoData)?;
    let rows = state.store.rows_on(latest);
    let sample = {
        let mut rng = rand::thread_rng();
        analytics::random_sample(&rows, analytics::sample::DEFAULT_SAMPLE_SIZE, &mut rng)
    };
    debug!(date = %latest, picked = sample.len(), "random sample");
    Ok(Json(sample))
}

fn movers_response(state: &AppState, direction: Direction) -> ApiResult<impl IntoResponse> {
    if state.store.latest_date().is_none() {
        return Err(ApiError::NoData);
    }
    let rows = state.store.all_rows();
    let names = state.store.company_names();
    let out = analytics::movers(&rows, &names, direction, MOVERS_LIMIT);
    debug!(direction = %direction, count = out.len(), "movers computed");
    Ok(Json(out))
}

async fn gain(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    movers_response(&state, Direction::Gainers)
}

async fn decline(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    movers_response(&state, Direction::Decliners)
}

#[derive(Debug, Deserialize)]
struct IntervalQuery {
    /// Epoch milliseconds.
    start: Option<i64>,
    /// Epoch milliseconds.
    end: Option<i64>,
    k: Option<usize>,
}

impl IntervalQuery {
    fn window(&self, max_k: usize) -> ApiResult<IntervalWindow> {
        let today = Utc::now().date_naive();
        IntervalWindow::from_millis(self.start, self.end, self.k, today, max_k)
            .map_err(ApiError::InvalidInput)
    }
}

async fn interval_close_k(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IntervalQuery>,
) -> ApiResult<impl IntoResponse> {
    let window = q.window(state.config.max_top_k)?;
    let rows = state.store.all_rows();
    let out = analytics::interval_close_top_k(&rows, window.start, window.end, window.k);
    debug!(
        start = %window.start,
        end = %window.end,
        k = window.k,
        count = out.len(),
        "interval close ranking"
    );
    Ok(Json(out))
}

async fn interval_change_k(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IntervalQuery>,
) -> ApiResult<impl IntoResponse> {
    let window = q.window(state.config.max_top_k)?;
    let rows = state.store.all_rows();
    let out = analytics::interval_change_top_k(&rows, window.start, window.end, window.k);
    debug!(
        start = %window.start,
        end = %window.end,
        k = window.k,
        count = out.len(),
        "interval change ranking"
    );
    Ok(Json(out))
}

// =============================================================================
// Per-stock endpoints
// =============================================================================

async fn companies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.companies())
}

/// Resolve the date window for `code`: `end` defaults to the code's latest
/// row, `start` to `chart_days` days before that.
fn resolve_window(
    state: &AppState,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ApiResult<(NaiveDate, NaiveDate)> {
    if !state.store.contains_code(code) {
        return Err(ApiError::NotFound(format!("unknown stock code '{code}'")));
    }
    let end = end
        .or_else(|| state.store.latest_date_for(code))
        .unwrap_or_else(|| Utc::now().date_naive());
    let start = match start {
        Some(start) => start,
        None => Duration::try_days(state.config.chart_days.max(1) - 1)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| ApiError::InvalidInput(format!("end {end} is out of range")))?,
    };
    if start > end {
        return Err(ApiError::InvalidInput(format!(
            "start {start} is after end {end}"
        )));
    }
    Ok((start, end))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[derive(Serialize)]
struct HistoryResponse {
    code: String,
    company: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
    prices: Vec<StockRow>,
}

async fn stock_history(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let code = code.to_uppercase();
    let (start, end) = resolve_window(&state, &code, q.start, q.end)?;
    let prices = state.store.history(&code, start, end);
    Ok(Json(HistoryResponse {
        company: state.store.company_name(&code),
        code,
        start,
        end,
        prices,
    }))
}

/// Date window plus per-request overrides of the configured chart options.
#[derive(Debug, Default, Deserialize)]
struct ChartQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    bullish_color: Option<String>,
    bearish_color: Option<String>,
    grid_color: Option<String>,
    grid_opacity: Option<f64>,
    show_grid: Option<bool>,
    show_price_labels: Option<bool>,
    candle_width_ratio: Option<f64>,
}

impl ChartQuery {
    /// Overlay the supplied fields on `base` and reject unusable values.
    fn render_config(&self, base: &RenderConfig) -> ApiResult<RenderConfig> {
        let mut config = base.clone();

        macro_rules! apply_override {
            ($field:ident) => {
                if let Some(val) = &self.$field {
                    config.$field = val.clone();
                }
            };
        }

        apply_override!(width);
        apply_override!(height);
        apply_override!(padding);
        apply_override!(bullish_color);
        apply_override!(bearish_color);
        apply_override!(grid_color);
        apply_override!(grid_opacity);
        apply_override!(show_grid);
        apply_override!(show_price_labels);
        apply_override!(candle_width_ratio);

        if !(config.width > 0.0 && config.width.is_finite())
            || !(config.height > 0.0 && config.height.is_finite())
        {
            return Err(ApiError::InvalidInput(
                "width and height must be positive".to_string(),
            ));
        }
        if !(config.padding >= 0.0 && config.padding.is_finite()) {
            return Err(ApiError::InvalidInput(
                "padding must be non-negative".to_string(),
            ));
        }
        if !(config.candle_width_ratio > 0.0 && config.candle_width_ratio <= 1.0) {
            return Err(ApiError::InvalidInput(
                "candle_width_ratio must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&config.grid_opacity) {
            return Err(ApiError::InvalidInput(
                "grid_opacity must be in [0, 1]".to_string(),
            ));
        }
        for color in [&config.bullish_color, &config.bearish_color, &config.grid_color] {
            if !is_css_color(color) {
                return Err(ApiError::InvalidInput(format!("unsupported color '{color}'")));
            }
        }
        Ok(config)
    }
}

/// Color names, hex values and `rgb()`/`hsl()` forms; nothing that could
/// close an attribute.
fn is_css_color(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '))
}

/// Records and render config for one chart request.
fn chart_inputs(
    state: &AppState,
    code: &str,
    q: &ChartQuery,
) -> ApiResult<(Vec<OhlcRecord>, RenderConfig)> {
    let config = q.render_config(&state.config.chart)?;
    let (start, end) = resolve_window(state, code, q.start, q.end)?;
    let records = state
        .store
        .history(code, start, end)
        .iter()
        .map(OhlcRecord::from)
        .collect();
    Ok((records, config))
}

#[derive(Serialize)]
struct ChartResponse {
    code: String,
    company: Option<String>,
    geometry: chart::ChartGeometry,
}

async fn stock_chart(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(q): Query<ChartQuery>,
) -> ApiResult<impl IntoResponse> {
    let code = code.to_uppercase();
    let (records, config) = chart_inputs(&state, &code, &q)?;

    let geometry = chart::compute_geometry(&records, &config).map_err(|e| {
        warn!(code = %code, error = %e, "chart has no drawable data");
        ApiError::from(e)
    })?;
    if geometry.skipped > 0 {
        debug!(code = %code, skipped = geometry.skipped, "invalid records dropped from chart");
    }

    Ok(Json(ChartResponse {
        company: state.store.company_name(&code),
        code,
        geometry,
    }))
}

async fn stock_chart_svg(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(q): Query<ChartQuery>,
) -> ApiResult<impl IntoResponse> {
    let code = code.to_uppercase();
    let (records, config) = chart_inputs(&state, &code, &q)?;
    let body = svg::render_chart(&records, &config);
    Ok(([(CONTENT_TYPE, "image/svg+xml")], body))
}

// =============================================================================
// Tests
// =============================================================================
