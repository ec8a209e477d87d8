use crate::models::analysis::AnalysisResult;
use crate::models::{RoastPotential, Roastability};

const SUGGESTIONS: &[&str] = &[
    "Try committing at 3 AM for bonus roast points!",
    "Add more emojis to your commit messages!",
    "Create a repo called 'my-awesome-project' and abandon it!",
    "Write commit messages like 'fix stuff' and 'idk anymore'!",
];

/// Score how much roast material a profile offers.
pub fn roast_potential(analysis: &AnalysisResult) -> RoastPotential {
    let mut roast_score = 0;
    let mut roast_factors = Vec::new();

    if !analysis.commit_language.questionable_messages.is_empty() {
        roast_score += 20;
        roast_factors.push("questionable_commits");
    }

    if analysis.emoji_usage.count > 15 {
        roast_score += 15;
        roast_factors.push("emoji_overuse");
    } else if analysis.emoji_usage.count == 0 {
        roast_score += 10;
        roast_factors.push("emoji_drought");
    }

    if analysis.repo_analysis.abandoned_repos > 2 {
        roast_score += 25;
        roast_factors.push("repo_abandonment");
    }

    if analysis.user_stats.follow_ratio < 0.3 {
        roast_score += 15;
        roast_factors.push("social_awkwardness");
    }

    let time_of_day = &analysis.commit_patterns.time_of_day;
    if time_of_day.night as f64 > time_of_day.total() as f64 * 0.5 {
        roast_score += 20;
        roast_factors.push("night_owl_coding");
    }

    if analysis.commit_language.average_length < 10.0 {
        roast_score += 10;
        roast_factors.push("lazy_commit_messages");
    }

    let (roastability_level, message) = match roast_score {
        s if s >= 60 => (
            Roastability::HighlyRoastable,
            "This developer is a goldmine for roasts! 🔥",
        ),
        s if s >= 30 => (
            Roastability::ModeratelyRoastable,
            "Some good roast material here. 😏",
        ),
        _ => (
            Roastability::MinimallyRoastable,
            "This developer is suspiciously well-behaved... 🤔",
        ),
    };

    RoastPotential {
        roast_score,
        roastability_level,
        message: message.to_string(),
        roast_factors: roast_factors.into_iter().map(String::from).collect(),
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}
