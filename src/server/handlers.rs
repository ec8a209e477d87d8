use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::analysis::analyze;
use crate::error::Error;
use crate::models::analysis::AnalysisResult;
use crate::models::RoastRequest;
use crate::roast::roast_potential;
use crate::server::error::ApiError;
use crate::server::AppState;

/// Analysis supplied by the caller, or computed here when absent.
fn resolve_analysis(request: &RoastRequest) -> AnalysisResult {
    match &request.analysis {
        Some(analysis) => analysis.clone(),
        None => analyze(&request.user, &request.repos, &request.commits, Utc::now()),
    }
}

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "GitShame Roaster API - Ready to serve some digital humble pie! 🔥"
    }))
}

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "gitshame",
        "roast_provider": state.pipeline.roaster().provider_name(),
    }))
}

/// POST /analyze
pub async fn analyze_activity(body: web::Json<RoastRequest>) -> HttpResponse {
    let request = body.into_inner();
    let analysis = analyze(&request.user, &request.repos, &request.commits, Utc::now());
    HttpResponse::Ok().json(analysis)
}

/// POST /generate-roasts
///
/// Always answers 200: provider failures fall back to static roasts.
pub async fn generate_roasts(
    state: web::Data<AppState>,
    body: web::Json<RoastRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let analysis = resolve_analysis(&request);
    let response = state.pipeline.roaster().generate(&request, &analysis).await;
    HttpResponse::Ok().json(response)
}

/// POST /analyze-roast-potential
pub async fn analyze_roast_potential(body: web::Json<RoastRequest>) -> HttpResponse {
    let analysis = resolve_analysis(&body);
    HttpResponse::Ok().json(roast_potential(&analysis))
}

/// GET /roast/{username}
///
/// Full pipeline: fetch from GitHub, analyze, roast and store.
pub async fn roast_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let report = state.pipeline.roast_user(&username).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /roast/{username}/latest
pub async fn latest_roast(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let storage = state.pipeline.storage().clone();
    let lookup = username.clone();
    let latest = web::block(move || storage.latest_report(&lookup))
        .await
        .map_err(|e| ApiError(Error::Storage(e.to_string())))??;

    match latest {
        Some(report) => Ok(HttpResponse::Ok().json(report)),
        None => Err(ApiError(Error::UserNotFound(username))),
    }
}
