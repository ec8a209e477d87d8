use crate::models::analysis::AnalysisResult;
use crate::models::RoastRequest;

pub const SYSTEM_PROMPT: &str = r#"You are a witty, sarcastic GitHub code reviewer who specializes in roasting developers based on their GitHub activity.
Be playful and teasing, but never mean-spirited or personally attacking.

You must respond with valid JSON matching this exact schema:
{
    "roasts": [
        {
            "text": "string (a witty, clever roast, 1-2 sentences)",
            "category": "coding_habits|repo_patterns|commit_messages|social_metrics|general",
            "severity": "mild|medium|savage"
        }
    ],
    "overall_tone": "rookie|veteran|chaos_engineer|perfectionist|mysterious"
}

Categories:
- coding_habits: commit patterns, commit times
- repo_patterns: repositories, naming, organization
- commit_messages: commit message quality
- social_metrics: followers, stars, social coding behavior
- general: overall developer personality/style

Severity levels:
- mild: gentle teasing
- medium: more pointed but still playful
- savage: brutally honest but still humorous"#;

/// Prompt text for one roast request, built from the inputs and their analysis.
#[derive(Debug, Clone)]
pub struct RoastPrompt {
    pub system: &'static str,
    pub user: String,
}

impl RoastPrompt {
    pub fn new(request: &RoastRequest, analysis: &AnalysisResult) -> Self {
        Self {
            system: SYSTEM_PROMPT,
            user: build_user_prompt(request, analysis),
        }
    }

    pub fn estimate_tokens(&self) -> usize {
        // Rough estimate: ~4 characters per token
        (self.system.len() + self.user.len()) / 4
    }
}

fn or_none(items: Vec<String>, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn build_user_prompt(request: &RoastRequest, analysis: &AnalysisResult) -> String {
    let user = &request.user;
    let stats = &analysis.user_stats;
    let repo_analysis = &analysis.repo_analysis;

    let languages: Vec<String> = repo_analysis
        .languages
        .iter()
        .take(3)
        .map(|l| l.language.clone())
        .collect();
    let top_emojis: Vec<String> = analysis
        .emoji_usage
        .top_emojis
        .iter()
        .take(3)
        .map(|e| e.emoji.clone())
        .collect();
    let naming: Vec<String> = repo_analysis
        .naming_patterns
        .observed()
        .into_iter()
        .take(3)
        .map(String::from)
        .collect();

    let mut prompt = String::from("Create 5-8 clever, humorous roasts for this GitHub user.\n\n");

    prompt.push_str("USER PROFILE:\n");
    prompt.push_str(&format!("- Username: {}\n", user.login));
    prompt.push_str(&format!(
        "- Name: {}\n",
        user.name.as_deref().unwrap_or("No name provided")
    ));
    prompt.push_str(&format!("- Bio: {}\n", user.bio.as_deref().unwrap_or("No bio")));
    prompt.push_str(&format!("- Account Age: {} days\n", stats.account_age));
    prompt.push_str(&format!("- Public Repos: {}\n", user.public_repos));
    prompt.push_str(&format!("- Followers: {}\n", user.followers));
    prompt.push_str(&format!("- Following: {}\n\n", user.following));

    prompt.push_str("CODING PATTERNS:\n");
    prompt.push_str(&format!(
        "- Primary Languages: {}\n",
        or_none(languages, "None detected")
    ));
    prompt.push_str(&format!(
        "- Most Active Time: {}\n",
        analysis.commit_patterns.most_active_time
    ));
    prompt.push_str(&format!(
        "- Total Commits Analyzed: {}\n",
        request.commits.len()
    ));
    prompt.push_str(&format!(
        "- Emoji Usage: {} emojis found\n",
        analysis.emoji_usage.count
    ));
    prompt.push_str(&format!("- Top Emojis: {}\n\n", or_none(top_emojis, "none")));

    prompt.push_str("REPOSITORY INSIGHTS:\n");
    prompt.push_str(&format!("- Total Repos: {}\n", request.repos.len()));
    prompt.push_str(&format!(
        "- Abandoned Repos: {}\n",
        repo_analysis.abandoned_repos
    ));
    prompt.push_str(&format!(
        "- One-Commit Wonders: {}\n",
        repo_analysis.one_commit_wonders
    ));
    prompt.push_str(&format!("- Naming Patterns: {}\n", or_none(naming, "none")));
    prompt.push_str(&format!(
        "- Average Stars per Repo: {:.1}\n\n",
        stats.repo_to_star_ratio
    ));

    prompt.push_str("SOCIAL METRICS:\n");
    prompt.push_str(&format!(
        "- Follow Ratio: {:.1} (followers/following)\n\n",
        stats.follow_ratio
    ));

    prompt.push_str("QUESTIONABLE COMMIT MESSAGES:\n");
    for message in analysis.commit_language.questionable_messages.iter().take(3) {
        prompt.push_str(&format!("- {}\n", message.lines().next().unwrap_or("")));
    }

    prompt.push_str("\nRECENT REPOS:\n");
    for repo in request.repos.iter().take(3) {
        prompt.push_str(&format!(
            "- {}: {} ({})\n",
            repo.name,
            repo.description.as_deref().unwrap_or("No description"),
            repo.language.as_deref().unwrap_or("Unknown language")
        ));
    }

    prompt.push_str(
        "\nReference the specific patterns above. Keep each roast tech-savvy, \
         specific to their actual activity and about 1-2 sentences.\n\
         Provide your roasts as JSON:\n",
    );
    prompt
}
