use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, Timelike, Utc};

use crate::analysis::emoji::EmojiTally;
use crate::analysis::patterns::{is_questionable, tally_name};
use crate::models::analysis::{
    AnalysisResult, CommitLanguage, CommitPatterns, DayOfWeek, LanguageCount, NamingPatterns,
    RepoAnalysis, TimeBucket, TimeOfDay, UserStats,
};
use crate::models::{CommitRecord, GitHubUser, Repository};

const SHORT_MESSAGE_CHARS: usize = 10;
const LONG_MESSAGE_CHARS: usize = 100;

/// Turns a profile, its repositories and its commits into an
/// [`AnalysisResult`]. Pure: the reference time is always passed in.
pub struct ActivityAnalyzer {
    top_emoji_limit: usize,
    abandonment_months: u32,
}

impl ActivityAnalyzer {
    pub fn new() -> Self {
        Self {
            top_emoji_limit: 5,
            abandonment_months: 6,
        }
    }

    pub fn analyze(
        &self,
        user: &GitHubUser,
        repos: &[Repository],
        commits: &[CommitRecord],
        now: DateTime<Utc>,
    ) -> AnalysisResult {
        let commit_patterns = self.commit_patterns(commits);
        let emoji_usage = {
            let mut tally = EmojiTally::new();
            for commit in commits {
                tally.record(&commit.message);
            }
            tally.into_usage(self.top_emoji_limit)
        };
        let commit_language = self.commit_language(commits);
        let repo_analysis = self.repo_analysis(repos, commits, now);
        let user_stats = self.user_stats(user, repos.len(), repo_analysis.total_stars, now);

        AnalysisResult {
            commit_patterns,
            emoji_usage,
            commit_language,
            repo_analysis,
            user_stats,
        }
    }

    fn commit_patterns(&self, commits: &[CommitRecord]) -> CommitPatterns {
        let mut time_of_day = TimeOfDay::default();
        let mut day_of_week = DayOfWeek::default();

        for commit in commits {
            // Hour and weekday in the commit's own offset
            time_of_day.increment(TimeBucket::from_hour(commit.date.hour()));
            day_of_week.increment(commit.date.weekday());
        }

        let most_active_time = time_of_day
            .busiest()
            .map(|b| b.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        CommitPatterns {
            time_of_day,
            day_of_week,
            most_active_time,
        }
    }

    fn commit_language(&self, commits: &[CommitRecord]) -> CommitLanguage {
        let mut total_chars = 0usize;
        let mut short_messages = 0;
        let mut long_messages = 0;
        let mut questionable_messages = Vec::new();

        for commit in commits {
            let len = commit.message.chars().count();
            total_chars += len;

            if len < SHORT_MESSAGE_CHARS {
                short_messages += 1;
            }
            if len > LONG_MESSAGE_CHARS {
                long_messages += 1;
            }
            if is_questionable(&commit.message) {
                questionable_messages.push(commit.message.clone());
            }
        }

        let average_length = if commits.is_empty() {
            0.0
        } else {
            total_chars as f64 / commits.len() as f64
        };

        CommitLanguage {
            average_length,
            short_messages,
            long_messages,
            questionable_messages,
        }
    }

    fn repo_analysis(
        &self,
        repos: &[Repository],
        commits: &[CommitRecord],
        now: DateTime<Utc>,
    ) -> RepoAnalysis {
        let cutoff = now
            .checked_sub_months(Months::new(self.abandonment_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut naming_patterns = NamingPatterns::default();
        let mut abandoned_repos = 0;
        let mut total_stars = 0u32;
        let mut languages: HashMap<&str, u32> = HashMap::new();

        for repo in repos {
            tally_name(&mut naming_patterns, &repo.name);

            if repo.updated_at < cutoff {
                abandoned_repos += 1;
            }

            total_stars = total_stars.saturating_add(repo.stargazers_count);

            if let Some(language) = repo.language.as_deref() {
                *languages.entry(language).or_insert(0) += 1;
            }
        }

        let mut commits_per_repo: HashMap<&str, u32> = HashMap::new();
        for repo in commits.iter().filter_map(|c| c.repository.as_deref()) {
            *commits_per_repo.entry(repo).or_insert(0) += 1;
        }
        let one_commit_wonders = repos
            .iter()
            .filter(|r| commits_per_repo.get(r.name.as_str()) == Some(&1))
            .count() as u32;

        let mut languages: Vec<LanguageCount> = languages
            .into_iter()
            .map(|(language, count)| LanguageCount {
                language: language.to_string(),
                count,
            })
            .collect();
        languages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.language.cmp(&b.language)));

        RepoAnalysis {
            naming_patterns,
            abandoned_repos,
            one_commit_wonders,
            languages,
            total_stars,
        }
    }

    fn user_stats(
        &self,
        user: &GitHubUser,
        repo_count: usize,
        total_stars: u32,
        now: DateTime<Utc>,
    ) -> UserStats {
        let following = if user.following == 0 { 1 } else { user.following };
        let follow_ratio = user.followers as f64 / following as f64;

        let repo_to_star_ratio = if repo_count == 0 {
            0.0
        } else {
            total_stars as f64 / repo_count as f64
        };

        let account_age = (now - user.created_at).num_days().max(0);

        UserStats {
            follow_ratio,
            repo_to_star_ratio,
            account_age,
        }
    }
}

impl Default for ActivityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze with the default settings (top 5 emoji, 6 month abandonment).
pub fn analyze(
    user: &GitHubUser,
    repos: &[Repository],
    commits: &[CommitRecord],
    now: DateTime<Utc>,
) -> AnalysisResult {
    ActivityAnalyzer::new().analyze(user, repos, commits, now)
}
