use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitshame::models::RoastSource;
use gitshame::{GitHubClient, PipelineConfig, ResponseCache, RoastPipeline, RoastService, Storage};

async fn mock_github() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/nightcoder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "nightcoder",
            "name": null,
            "bio": "commits at 3am",
            "avatar_url": "",
            "public_repos": 3,
            "followers": 1,
            "following": 40,
            "created_at": "2015-06-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/nightcoder/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "todo-app",
                "language": "JavaScript",
                "stargazers_count": 0,
                "fork": false,
                "updated_at": "2019-01-01T00:00:00Z",
                "owner": {"login": "nightcoder"}
            },
            {
                "name": "dotfiles",
                "language": null,
                "stargazers_count": 2,
                "fork": false,
                "updated_at": "2018-01-01T00:00:00Z",
                "owner": {"login": "nightcoder"}
            },
            {
                "name": "someone-elses-lib",
                "language": "Rust",
                "stargazers_count": 900,
                "fork": true,
                "updated_at": "2024-01-01T00:00:00Z",
                "owner": {"login": "nightcoder"}
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/nightcoder/todo-app/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"sha": "1", "commit": {"message": "wip", "author": {"date": "2019-01-01T03:00:00Z"}}},
            {"sha": "2", "commit": {"message": "fix stuff again", "author": {"date": "2019-01-01T02:00:00Z"}}}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/nightcoder/dotfiles/commits"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_roast_user_end_to_end() {
    let server = mock_github().await;
    let github = GitHubClient::new(None, ResponseCache::disabled())
        .unwrap()
        .with_base_url(server.uri());
    let storage = Arc::new(Storage::in_memory().unwrap());
    let pipeline = RoastPipeline::new(
        github,
        RoastService::default(),
        storage.clone(),
        PipelineConfig::default(),
    );

    let report = pipeline.roast_user("nightcoder").await.unwrap();

    // The fork is dropped before analysis
    assert_eq!(report.repositories_analyzed, 2);
    assert_eq!(report.commits_analyzed, 2);
    assert_eq!(report.analysis.commit_patterns.most_active_time, "night");
    assert_eq!(report.analysis.repo_analysis.abandoned_repos, 2);
    assert_eq!(report.analysis.repo_analysis.one_commit_wonders, 0);
    assert_eq!(report.analysis.commit_language.questionable_messages.len(), 2);
    assert_eq!(report.response.source, RoastSource::Fallback);

    let stored = storage.latest_report("nightcoder").unwrap().unwrap();
    assert_eq!(stored.commits_analyzed, 2);
    assert_eq!(storage.list_reports().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_user_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let github = GitHubClient::new(None, ResponseCache::disabled())
        .unwrap()
        .with_base_url(server.uri());
    let storage = Arc::new(Storage::in_memory().unwrap());
    let pipeline = RoastPipeline::new(
        github,
        RoastService::default(),
        storage.clone(),
        PipelineConfig::default(),
    );

    assert!(matches!(
        pipeline.roast_user("ghost").await,
        Err(gitshame::Error::UserNotFound(_))
    ));
    assert!(storage.list_reports().unwrap().is_empty());
}
