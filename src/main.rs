use anyhow::Result;
use chrono::Local;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sheetview::{
    config::Config,
    fetch::{self, SheetTarget},
    pipeline,
    process::{filter::Period, Record},
};
use std::env;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

#[derive(Debug, Deserialize)]
struct EntriesQuery {
    period: Option<String>,
}

#[derive(Serialize)]
struct EntriesResponse {
    success: bool,
    headers: Vec<String>,
    rows: Vec<Record>,
}

#[derive(Serialize)]
struct FailureResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct PingResponse {
    success: bool,
    now: String,
}

#[derive(Clone)]
struct AppState {
    client: Client,
    target: SheetTarget,
}

async fn entries(query: EntriesQuery, state: AppState) -> Result<impl Reply, Rejection> {
    let period = Period::parse(query.period.as_deref().unwrap_or("all"));
    let now = Local::now().naive_local();

    match pipeline::run(
        || fetch::fetch_grid(&state.client, &state.target),
        period,
        now,
    )
    .await
    {
        Ok(sheet) => {
            info!(rows = sheet.records.len(), ?period, "served entries");
            Ok(warp::reply::with_status(
                warp::reply::json(&EntriesResponse {
                    success: true,
                    headers: sheet.headers,
                    rows: sheet.records,
                }),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            // Full chain goes to the log; the client only sees a
            // generic failure.
            error!("entries request failed: {:?}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&FailureResponse {
                    success: false,
                    message: "failed to read the sheet".to_string(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn ping() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&PingResponse {
        success: true,
        now: Local::now().to_rfc3339(),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    info!("starting sheet view service");

    let config = Config::from_env()?;
    let port = config.port;
    let state = AppState {
        client: Client::new(),
        target: config.sheet_target(),
    };
    let with_state = warp::any().map(move || state.clone());

    let entries_route = warp::path("entries")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<EntriesQuery>())
        .and(with_state)
        .and_then(entries);

    let ping_route = warp::path("ping")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(ping);

    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);
    let routes = entries_route.or(ping_route).with(cors);

    info!("server starting on port {}", port);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
