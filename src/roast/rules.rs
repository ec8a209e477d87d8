use crate::models::analysis::{AnalysisResult, TimeBucket};
use crate::models::GitHubUser;

/// What a rule gets to look at.
pub struct RoastContext<'a> {
    pub user: &'a GitHubUser,
    pub analysis: &'a AnalysisResult,
}

type Predicate = fn(&RoastContext) -> bool;
type Template = fn(&RoastContext) -> String;

/// One `(predicate, template)` pair. Rules are evaluated in declaration
/// order and every triggered rule contributes one sentence.
pub struct RoastRule {
    pub name: &'static str,
    pub when: Predicate,
    pub render: Template,
}

const MIN_FALLBACK_ROASTS: usize = 3;
const MAX_FALLBACK_ROASTS: usize = 6;

pub const GENERIC_ROASTS: &[&str] = &[
    "Your code commits tell a story... mostly about debugging at 2 AM! 📚",
    "I've seen more organization in a tornado than in your repository structure! 🌪️",
    "Your commit messages are like modern art - nobody understands them, but everyone pretends they do! 🎨",
];

pub static RULES: &[RoastRule] = &[
    RoastRule {
        name: "newcomer",
        when: |c| c.analysis.user_stats.account_age < 365,
        render: |c| {
            format!(
                "Welcome to GitHub, {}! Still figuring out what a commit is, I see. 🐣",
                c.user.login
            )
        },
    },
    RoastRule {
        name: "veteran",
        when: |c| c.analysis.user_stats.account_age > 3650,
        render: |c| {
            format!(
                "Been here {} years and still haven't learned to write decent commit messages? Classic! 👴",
                c.analysis.user_stats.account_age / 365
            )
        },
    },
    RoastRule {
        name: "night_owl",
        when: |c| c.analysis.commit_patterns.time_of_day.busiest() == Some(TimeBucket::Night),
        render: |c| {
            format!(
                "{} of your commits landed after 10 PM. I see you're a proud member of the '3 AM commit club'. Sleep is overrated anyway! 🦉",
                c.analysis.commit_patterns.time_of_day.night
            )
        },
    },
    RoastRule {
        name: "weekend_warrior",
        when: |c| {
            let days = &c.analysis.commit_patterns.day_of_week;
            days.total() > 0 && days.weekend() * 2 > days.total()
        },
        render: |_| {
            "Most of your commits happen on weekends. Your day job must be thrilled you save the good stuff for Saturday. 🏖️"
                .to_string()
        },
    },
    RoastRule {
        name: "emoji_overload",
        when: |c| c.analysis.emoji_usage.count > 10,
        render: |c| {
            let top = c
                .analysis
                .emoji_usage
                .top_emojis
                .first()
                .map(|e| e.emoji.as_str())
                .unwrap_or("🎭");
            format!(
                "{} emojis in your commits, with {} as your favorite. More emojis than a teenager's text messages. Very professional!",
                c.analysis.emoji_usage.count, top
            )
        },
    },
    RoastRule {
        name: "emoji_drought",
        when: |c| c.analysis.emoji_usage.count == 0,
        render: |_| {
            "Zero emojis in your commits? What are you, a robot? Even robots use emojis now! 🤖"
                .to_string()
        },
    },
    RoastRule {
        name: "questionable_commits",
        when: |c| !c.analysis.commit_language.questionable_messages.is_empty(),
        render: |c| {
            let messages = &c.analysis.commit_language.questionable_messages;
            format!(
                "{} of your commit messages look like cries for help, starting with \"{}\". 🆘",
                messages.len(),
                messages[0].lines().next().unwrap_or_default().trim()
            )
        },
    },
    RoastRule {
        name: "terse_messages",
        when: |c| {
            c.analysis.commit_language.average_length > 0.0
                && c.analysis.commit_language.average_length < 10.0
        },
        render: |c| {
            format!(
                "Your average commit message is {:.1} characters long. Haiku poets think you're too brief. ✂️",
                c.analysis.commit_language.average_length
            )
        },
    },
    RoastRule {
        name: "abandoned_repos",
        when: |c| c.analysis.repo_analysis.abandoned_repos > 0,
        render: |c| {
            format!(
                "You have {} abandoned repos. GitHub isn't a graveyard for your coding dreams! ⚰️",
                c.analysis.repo_analysis.abandoned_repos
            )
        },
    },
    RoastRule {
        name: "tutorial_hell",
        when: |c| {
            let naming = &c.analysis.repo_analysis.naming_patterns;
            naming.has_demo + naming.has_tutorial > 0
        },
        render: |_| {
            "Your repos are named like a bootcamp syllabus. Demos and tutorials everywhere, production nowhere. 🎓"
                .to_string()
        },
    },
    RoastRule {
        name: "one_commit_wonders",
        when: |c| c.analysis.repo_analysis.one_commit_wonders > 1,
        render: |c| {
            format!(
                "{} repos with a single commit. Commitment issues, literally. 💍",
                c.analysis.repo_analysis.one_commit_wonders
            )
        },
    },
    RoastRule {
        name: "unrequited_follows",
        when: |c| c.analysis.user_stats.follow_ratio < 0.5,
        render: |_| {
            "Following more people than follow you back? That's the developer equivalent of unrequited love! 💔"
                .to_string()
        },
    },
];

/// Every triggered sentence, in rule declaration order.
pub fn evaluate(user: &GitHubUser, analysis: &AnalysisResult) -> Vec<String> {
    let ctx = RoastContext { user, analysis };
    RULES
        .iter()
        .filter(|rule| (rule.when)(&ctx))
        .map(|rule| {
            tracing::debug!("Roast rule triggered: {}", rule.name);
            (rule.render)(&ctx)
        })
        .collect()
}

/// Static roasts used when AI generation is unavailable: the triggered rules
/// padded with generic lines when only one or two fire, capped at six.
/// Empty when no rule fires.
pub fn fallback_roasts(user: &GitHubUser, analysis: &AnalysisResult) -> Vec<String> {
    let mut roasts = evaluate(user, analysis);

    if !roasts.is_empty() && roasts.len() < MIN_FALLBACK_ROASTS {
        roasts.extend(GENERIC_ROASTS.iter().map(|s| s.to_string()));
    }

    roasts.truncate(MAX_FALLBACK_ROASTS);
    roasts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{CommitLanguage, TimeOfDay};
    use chrono::{TimeZone, Utc};

    fn user() -> GitHubUser {
        GitHubUser {
            login: "octocat".to_string(),
            name: None,
            bio: None,
            avatar_url: String::new(),
            public_repos: 0,
            followers: 10,
            following: 10,
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn mid_career() -> AnalysisResult {
        let mut analysis = AnalysisResult::default();
        analysis.user_stats.account_age = 1000;
        analysis.user_stats.follow_ratio = 1.0;
        analysis.emoji_usage.count = 3;
        analysis
    }

    #[test]
    fn test_quiet_profile_triggers_nothing() {
        assert!(evaluate(&user(), &mid_career()).is_empty());
    }

    #[test]
    fn test_night_rule_requires_night_to_be_busiest() {
        let mut analysis = mid_career();
        analysis.commit_patterns.time_of_day = TimeOfDay {
            morning: 1,
            afternoon: 2,
            evening: 1,
            night: 5,
        };
        let roasts = evaluate(&user(), &analysis);
        assert_eq!(roasts.len(), 1);
        assert!(roasts[0].starts_with("5 of your commits"));

        analysis.commit_patterns.time_of_day.afternoon = 5;
        assert!(evaluate(&user(), &analysis).is_empty());
    }

    #[test]
    fn test_rules_fire_in_declaration_order() {
        let mut analysis = mid_career();
        analysis.user_stats.account_age = 30;
        analysis.user_stats.follow_ratio = 0.1;
        analysis.repo_analysis.abandoned_repos = 4;
        analysis.commit_language = CommitLanguage {
            average_length: 5.0,
            short_messages: 2,
            long_messages: 0,
            questionable_messages: vec!["wtf".to_string()],
        };

        let roasts = evaluate(&user(), &analysis);
        assert_eq!(roasts.len(), 5);
        assert!(roasts[0].contains("Welcome to GitHub, octocat"));
        assert!(roasts[1].contains("\"wtf\""));
        assert!(roasts[2].contains("5.0 characters"));
        assert!(roasts[3].contains("4 abandoned repos"));
        assert!(roasts[4].contains("unrequited love"));
    }

    #[test]
    fn test_fallback_pads_with_generic_roasts() {
        let mut analysis = mid_career();
        analysis.repo_analysis.abandoned_repos = 2;

        let roasts = fallback_roasts(&user(), &analysis);
        assert_eq!(roasts.len(), 3);
        assert!(roasts[0].contains("2 abandoned repos"));
        assert_eq!(roasts[1], GENERIC_ROASTS[0]);
        assert_eq!(roasts[2], GENERIC_ROASTS[1]);
    }

    #[test]
    fn test_fallback_is_empty_when_nothing_fires() {
        assert!(fallback_roasts(&user(), &mid_career()).is_empty());
    }

    #[test]
    fn test_fallback_caps_at_six() {
        let mut analysis = AnalysisResult::default();
        analysis.user_stats.account_age = 10;
        analysis.commit_patterns.time_of_day.night = 3;
        analysis.commit_patterns.day_of_week.sunday = 3;
        analysis.commit_language.average_length = 4.0;
        analysis.commit_language.questionable_messages = vec!["oops".to_string()];
        analysis.repo_analysis.abandoned_repos = 1;
        analysis.repo_analysis.naming_patterns.has_demo = 1;

        assert!(evaluate(&user(), &analysis).len() > 6);
        assert_eq!(fallback_roasts(&user(), &analysis).len(), 6);
    }
}
