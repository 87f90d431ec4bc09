//! Route handlers

use axum::{extract::State, response::Html, Form, Json};
use serde::Deserialize;

use crate::analysis::AnalysisOutcome;

use super::error::AppError;
use super::page;
use super::AppState;

/// Body of both analyze endpoints
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub passage: String,
}

/// GET / - empty input page
pub async fn index() -> Html<String> {
    Html(page::render("", None))
}

/// POST /analyze - form submit, re-renders the page with results
pub async fn analyze_form(
    State(state): State<AppState>,
    Form(request): Form<AnalyzeRequest>,
) -> Result<Html<String>, AppError> {
    let outcome = state.analyzer.analyze(&request.passage).await?;
    Ok(Html(page::render(&request.passage, Some(&outcome))))
}

/// POST /api/analyze - JSON in, JSON out
pub async fn analyze_json(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
    let outcome = state.analyzer.analyze(&request.passage).await?;
    Ok(Json(outcome))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
