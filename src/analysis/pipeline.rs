use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::analysis::analyzer::ActivityAnalyzer;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::{CommitRecord, Repository, RoastReport, RoastRequest};
use crate::roast::{roast_potential, RoastService};
use crate::storage::Storage;

/// Fetch, analyze, roast, store.
pub struct RoastPipeline {
    github: Arc<GitHubClient>,
    roaster: RoastService,
    analyzer: ActivityAnalyzer,
    storage: Arc<Storage>,
    config: PipelineConfig,
    show_progress: bool,
}

impl RoastPipeline {
    pub fn new(
        github: GitHubClient,
        roaster: RoastService,
        storage: Arc<Storage>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            github: Arc::new(github),
            roaster,
            analyzer: ActivityAnalyzer::new(),
            storage,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn roaster(&self) -> &RoastService {
        &self.roaster
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub async fn roast_user(&self, username: &str) -> Result<RoastReport> {
        tracing::info!("Fetching GitHub profile for: {}", username);
        let user = self.github.get_user(username).await?;

        tracing::info!("Fetching repositories...");
        let repos: Vec<_> = self
            .github
            .get_user_repos(username)
            .await?
            .into_iter()
            .filter(|r| self.config.include_forks || !r.fork)
            .collect();
        tracing::info!("Found {} repositories", repos.len());

        // Commit history only for the most recently updated repositories
        let mut recent: Vec<&Repository> = repos.iter().collect();
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        recent.truncate(self.config.max_repos);

        let commits = self.fetch_all_commits(&user.login, &recent).await;
        tracing::info!("Fetched {} commits total", commits.len());

        let analysis = self
            .analyzer
            .analyze(&user, &repos, &commits, Utc::now());
        let potential = roast_potential(&analysis);

        let request = RoastRequest {
            user,
            repos,
            commits,
            analysis: None,
        };
        let response = self.roaster.generate(&request, &analysis).await;

        let report = RoastReport {
            repositories_analyzed: request.repos.len() as u32,
            commits_analyzed: request.commits.len() as u32,
            user: request.user,
            analysis,
            potential,
            response,
            created_at: Utc::now(),
        };

        let storage = self.storage.clone();
        let stored = report.clone();
        tokio::task::spawn_blocking(move || storage.save_report(&stored))
            .await
            .map_err(|e| Error::Storage(format!("save task failed: {}", e)))??;
        tracing::info!("Roast report saved for {}", report.user.login);

        Ok(report)
    }

    async fn fetch_all_commits(&self, username: &str, repos: &[&Repository]) -> Vec<CommitRecord> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit));
        let pb = self.progress_bar(repos.len() as u64);

        let mut commit_futures = Vec::new();

        for repo in repos {
            let github = self.github.clone();
            let sem = semaphore.clone();
            let owner = repo.owner_login(username).to_string();
            let name = repo.name.clone();
            let author = username.to_string();
            let max_commits = self.config.max_commits_per_repo;
            let pb_clone = pb.clone();

            commit_futures.push(async move {
                let _permit = sem.acquire().await.ok()?;

                let result = github
                    .get_repo_commits(&owner, &name, Some(&author), max_commits)
                    .await;
                pb_clone.inc(1);

                match result {
                    Ok(commits) => Some(
                        commits
                            .into_iter()
                            .map(|c| CommitRecord::from_summary(c, &name))
                            .collect::<Vec<_>>(),
                    ),
                    Err(e) => {
                        tracing::warn!("Skipping commits for {}/{}: {}", owner, name, e);
                        None
                    }
                }
            });
        }

        let results = join_all(commit_futures).await;
        pb.finish_and_clear();

        results.into_iter().flatten().flatten().collect()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
