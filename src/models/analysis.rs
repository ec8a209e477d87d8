use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub commit_patterns: CommitPatterns,
    pub emoji_usage: EmojiUsage,
    pub commit_language: CommitLanguage,
    pub repo_analysis: RepoAnalysis,
    pub user_stats: UserStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPatterns {
    pub time_of_day: TimeOfDay,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub most_active_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
    pub night: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    /// 5-11 morning, 12-16 afternoon, 17-21 evening, 22-4 night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeBucket::Morning,
            12..=16 => TimeBucket::Afternoon,
            17..=21 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TimeOfDay {
    pub fn increment(&mut self, bucket: TimeBucket) {
        match bucket {
            TimeBucket::Morning => self.morning += 1,
            TimeBucket::Afternoon => self.afternoon += 1,
            TimeBucket::Evening => self.evening += 1,
            TimeBucket::Night => self.night += 1,
        }
    }

    pub fn get(&self, bucket: TimeBucket) -> u32 {
        match bucket {
            TimeBucket::Morning => self.morning,
            TimeBucket::Afternoon => self.afternoon,
            TimeBucket::Evening => self.evening,
            TimeBucket::Night => self.night,
        }
    }

    pub fn total(&self) -> u32 {
        self.morning + self.afternoon + self.evening + self.night
    }

    /// Largest bucket; earlier buckets win ties. `None` when empty.
    pub fn busiest(&self) -> Option<TimeBucket> {
        let buckets = [
            TimeBucket::Morning,
            TimeBucket::Afternoon,
            TimeBucket::Evening,
            TimeBucket::Night,
        ];
        if self.total() == 0 {
            return None;
        }
        let mut best = buckets[0];
        for bucket in buckets.into_iter().skip(1) {
            if self.get(bucket) > self.get(best) {
                best = bucket;
            }
        }
        Some(best)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayOfWeek {
    pub sunday: u32,
    pub monday: u32,
    pub tuesday: u32,
    pub wednesday: u32,
    pub thursday: u32,
    pub friday: u32,
    pub saturday: u32,
}

impl DayOfWeek {
    pub fn increment(&mut self, weekday: chrono::Weekday) {
        use chrono::Weekday;
        match weekday {
            Weekday::Sun => self.sunday += 1,
            Weekday::Mon => self.monday += 1,
            Weekday::Tue => self.tuesday += 1,
            Weekday::Wed => self.wednesday += 1,
            Weekday::Thu => self.thursday += 1,
            Weekday::Fri => self.friday += 1,
            Weekday::Sat => self.saturday += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.sunday
            + self.monday
            + self.tuesday
            + self.wednesday
            + self.thursday
            + self.friday
            + self.saturday
    }

    pub fn weekend(&self) -> u32 {
        self.saturday + self.sunday
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiUsage {
    pub count: u32,
    pub unique_emojis: u32,
    pub top_emojis: Vec<EmojiCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiCount {
    pub emoji: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitLanguage {
    pub average_length: f64,
    pub short_messages: u32,
    pub long_messages: u32,
    pub questionable_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoAnalysis {
    pub naming_patterns: NamingPatterns,
    pub abandoned_repos: u32,
    #[serde(default)]
    pub one_commit_wonders: u32,
    #[serde(default)]
    pub languages: Vec<LanguageCount>,
    #[serde(default)]
    pub total_stars: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingPatterns {
    pub kebab_case: u32,
    pub snake_case: u32,
    pub camel_case: u32,
    pub pascal_case: u32,
    pub has_numbers: u32,
    pub has_emoji: u32,
    pub has_acronym: u32,
    pub has_demo: u32,
    pub has_tutorial: u32,
    pub has_app: u32,
    pub has_js: u32,
}

impl NamingPatterns {
    /// Labels of every category with at least one match, in declaration order.
    pub fn observed(&self) -> Vec<&'static str> {
        [
            ("kebab-case", self.kebab_case),
            ("snake_case", self.snake_case),
            ("camelCase", self.camel_case),
            ("PascalCase", self.pascal_case),
            ("numbers", self.has_numbers),
            ("emoji", self.has_emoji),
            ("acronyms", self.has_acronym),
            ("demo", self.has_demo),
            ("tutorial", self.has_tutorial),
            ("app", self.has_app),
            ("js", self.has_js),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, _)| label)
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub follow_ratio: f64,
    pub repo_to_star_ratio: f64,
    pub account_age: i64,
}
