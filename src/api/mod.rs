use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    FinancialProfile, ProjectionSummary, ValidationError, YearRecord, project, summarize,
};

pub const PROJECTION_ROUTE: &str = "/financial/projections/cash-flow";

const DEFAULT_YEARS: i64 = 10;
const DEFAULT_INFLATION_RATE: f64 = 4.5;
const DEFAULT_INVESTMENT_RETURN: f64 = 10.0;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectionPayload {
    years: Option<i64>,
    monthly_income: Option<f64>,
    monthly_expenses: Option<f64>,
    monthly_savings: Option<f64>,
    inflation_rate: Option<f64>,
    #[serde(alias = "investment_return_rate")]
    investment_return: Option<f64>,
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct ProjectionRequest {
    profile: FinancialProfile,
    years: u32,
    name: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    message: &'static str,
    name: String,
    projections: Vec<YearRecord>,
    summary: ProjectionSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid projection parameters: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to encode projection: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "cashflow",
    about = "Deterministic multi-year cash-flow and net-worth projection"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve projections over HTTP
    Serve(ServeArgs),
    /// Run one projection and print it
    Project(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        long,
        env = "CASHFLOW_HOST",
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    )]
    pub host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(
        long,
        default_value_t = DEFAULT_YEARS,
        allow_negative_numbers = true,
        help = "Projection horizon in years (1-50)"
    )]
    pub years: i64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub monthly_income: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub monthly_expenses: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Amount invested each month"
    )]
    pub monthly_savings: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_INFLATION_RATE,
        allow_negative_numbers = true,
        help = "Expected annual inflation in percent, e.g. 4.5"
    )]
    pub inflation_rate: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_INVESTMENT_RETURN,
        allow_negative_numbers = true,
        help = "Expected annual investment return in percent, e.g. 10"
    )]
    pub investment_return: f64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl From<&ProjectArgs> for ProjectionPayload {
    fn from(args: &ProjectArgs) -> Self {
        ProjectionPayload {
            years: Some(args.years),
            monthly_income: Some(args.monthly_income),
            monthly_expenses: Some(args.monthly_expenses),
            monthly_savings: Some(args.monthly_savings),
            inflation_rate: Some(args.inflation_rate),
            investment_return: Some(args.investment_return),
            name: args.name.clone(),
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route(
            PROJECTION_ROUTE,
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, route = PROJECTION_ROUTE, "cash-flow projection API listening");

    axum::serve(listener, router()).await
}

pub fn run_projection_command(args: &ProjectArgs) -> Result<String, CommandError> {
    let response = build_projection_response(ProjectionPayload::from(args))?;
    match args.format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&response)?)),
        OutputFormat::Table => Ok(render_table(&response)),
    }
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(
    payload: Result<Query<ProjectionPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => projection_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), &rejection.body_text()),
    }
}

async fn projection_post_handler(
    payload: Result<Json<ProjectionPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => projection_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), &rejection.body_text()),
    }
}

fn rejection_response(status: StatusCode, reason: &str) -> Response {
    warn!(%status, reason, "rejected malformed projection request");
    error_response(status, &format!("invalid projection parameters: {reason}"))
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    match build_projection_response(payload) {
        Ok(response) => {
            info!(
                years = response.summary.years,
                final_wealth = response.summary.final_wealth,
                "served cash-flow projection"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(error = %err, field = err.field(), "rejected projection request");
            error_response(
                StatusCode::BAD_REQUEST,
                &format!("invalid projection parameters: {err}"),
            )
        }
    }
}

fn build_projection_response(
    payload: ProjectionPayload,
) -> Result<ProjectionResponse, ValidationError> {
    let request = projection_request_from_payload(payload)?;
    let projections = project(&request.profile, request.years)?;
    let summary = summarize(&projections);
    Ok(ProjectionResponse {
        message: "Cash flow projection calculated successfully",
        name: request.name,
        projections,
        summary,
    })
}

fn projection_request_from_payload(
    payload: ProjectionPayload,
) -> Result<ProjectionRequest, ValidationError> {
    let requested_years = payload.years.unwrap_or(DEFAULT_YEARS);
    let years = u32::try_from(requested_years).map_err(|_| ValidationError::OutOfRange {
        years: requested_years,
    })?;

    let profile = FinancialProfile {
        monthly_income: payload.monthly_income.unwrap_or(0.0),
        monthly_expenses: payload.monthly_expenses.unwrap_or(0.0),
        monthly_savings: payload.monthly_savings.unwrap_or(0.0),
        inflation_rate: payload.inflation_rate.unwrap_or(DEFAULT_INFLATION_RATE),
        investment_return_rate: payload.investment_return.unwrap_or(DEFAULT_INVESTMENT_RETURN),
    };

    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("{years}-year projection"));

    Ok(ProjectionRequest {
        profile,
        years,
        name,
    })
}

fn render_table(response: &ProjectionResponse) -> String {
    let mut out = format!("{}\n", response.name);
    out.push_str(&format!(
        "{:>4}  {:>16}  {:>16}  {:>16}  {:>16}  {:>20}\n",
        "year",
        "annual_income",
        "annual_expenses",
        "annual_savings",
        "net_cash_flow",
        "accumulated_savings"
    ));
    for row in &response.projections {
        out.push_str(&format!(
            "{:>4}  {:>16.2}  {:>16.2}  {:>16.2}  {:>16.2}  {:>20.2}\n",
            row.year,
            row.annual_income,
            row.annual_expenses,
            row.annual_savings,
            row.net_cash_flow,
            row.accumulated_savings
        ));
    }

    let summary = &response.summary;
    out.push_str(&format!("total income:   {:.2}\n", summary.total_income));
    out.push_str(&format!("total expenses: {:.2}\n", summary.total_expenses));
    out.push_str(&format!("total savings:  {:.2}\n", summary.total_savings));
    out.push_str(&format!("final wealth:   {:.2}\n", summary.final_wealth));
    out
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn projection_request_from_json(json: &str) -> Result<ProjectionRequest, String> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    projection_request_from_payload(payload).map_err(|e| e.to_string())
}
