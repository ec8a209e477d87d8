use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use super::{configure_routes, AppState};
use crate::analysis::RoastPipeline;
use crate::config::PipelineConfig;
use crate::github::{GitHubClient, ResponseCache};
use crate::roast::RoastService;
use crate::storage::Storage;

fn state() -> web::Data<AppState> {
    // Nothing listens on the discard port, so GitHub calls fail fast
    let github = GitHubClient::new(None, ResponseCache::disabled())
        .unwrap()
        .with_base_url("http://127.0.0.1:9");
    let storage = Arc::new(Storage::in_memory().unwrap());
    let pipeline = RoastPipeline::new(
        github,
        RoastService::default(),
        storage,
        PipelineConfig::default(),
    );
    web::Data::new(AppState { pipeline })
}

fn sample_body() -> Value {
    json!({
        "user": {
            "login": "testuser",
            "name": "Test User",
            "bio": "I love coding at 3 AM",
            "public_repos": 42,
            "followers": 10,
            "following": 100,
            "created_at": "2020-01-01T00:00:00Z",
            "avatar_url": "https://github.com/testuser.png"
        },
        "repos": [
            {
                "name": "my-awesome-project",
                "description": "Yet another TODO app",
                "language": "JavaScript",
                "stargazers_count": 0,
                "forks_count": 0,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-01-02T00:00:00Z"
            },
            {
                "name": "hello-world",
                "description": null,
                "language": "Python",
                "stargazers_count": 1,
                "forks_count": 0,
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-01-01T00:00:00Z"
            }
        ],
        "commits": [
            {"message": "fix stuff", "date": "2024-01-01T03:00:00Z"},
            {"message": "wtf is this???", "date": "2024-01-01T02:30:00Z"},
            {"message": "asdf", "date": "2024-01-02T23:59:00Z"},
            {"message": "Initial commit 🎉", "date": "2024-01-03T14:00:00Z"}
        ]
    })
}

#[actix_web::test]
async fn test_health_and_root() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gitshame");
    assert!(body["roast_provider"].is_null());

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_analyze_returns_camel_case_statistics() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(sample_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let time_of_day = &body["commitPatterns"]["timeOfDay"];
    assert_eq!(time_of_day["night"], 3);
    assert_eq!(time_of_day["afternoon"], 1);
    assert_eq!(body["commitPatterns"]["mostActiveTime"], "night");
    assert_eq!(body["emojiUsage"]["count"], 1);
    assert_eq!(
        body["commitLanguage"]["questionableMessages"],
        json!(["fix stuff", "wtf is this???", "asdf"])
    );
    assert_eq!(body["repoAnalysis"]["abandonedRepos"], 2);
    assert_eq!(body["repoAnalysis"]["namingPatterns"]["kebabCase"], 2);
    assert_eq!(body["userStats"]["followRatio"], 0.1);
}

#[actix_web::test]
async fn test_generate_roasts_falls_back_without_provider() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/generate-roasts")
        .set_json(sample_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["source"], "fallback");
    assert_eq!(body["overall_tone"], "mysterious");
    let roasts = body["roasts"].as_array().unwrap();
    assert!(!roasts.is_empty() && roasts.len() <= 6);
}

#[actix_web::test]
async fn test_roast_potential_uses_supplied_analysis() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let mut body = sample_body();
    body["analysis"] = serde_json::to_value(crate::models::analysis::AnalysisResult::default()).unwrap();

    let req = test::TestRequest::post()
        .uri("/analyze-roast-potential")
        .set_json(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["roast_score"], 35);
    assert_eq!(body["roastability_level"], "moderately_roastable");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_latest_roast_missing_user_is_404() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/roast/ghost/latest").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
}

#[actix_web::test]
async fn test_roast_user_reports_upstream_failure() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/roast/octocat").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn test_latest_roast_matches_login_case_insensitively() {
    use crate::models::analysis::AnalysisResult;
    use crate::models::{RoastReport, RoastRequest};
    use crate::roast::roast_potential;
    use chrono::{TimeZone, Utc};

    let request: RoastRequest = serde_json::from_value(sample_body()).unwrap();
    let analysis = AnalysisResult::default();
    let report = RoastReport {
        repositories_analyzed: request.repos.len() as u32,
        commits_analyzed: request.commits.len() as u32,
        potential: roast_potential(&analysis),
        response: RoastService::default().static_roasts(&request, &analysis),
        user: request.user,
        analysis,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    };

    let state = state();
    state.pipeline.storage().save_report(&report).unwrap();

    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let req = test::TestRequest::get().uri("/roast/TestUser/latest").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["login"], "testuser");
    assert_eq!(body["commits_analyzed"], 4);
}
