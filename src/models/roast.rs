use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;
use super::commit::CommitRecord;
use super::user::{GitHubUser, Repository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastLine {
    pub text: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_severity")]
    pub severity: String,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_severity() -> String {
    "medium".to_string()
}

/// Structured output expected back from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRoasts {
    pub roasts: Vec<RoastLine>,
    #[serde(default = "default_tone")]
    pub overall_tone: String,
}

fn default_tone() -> String {
    "mysterious".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoastSource {
    Ai,
    Fallback,
    Hardcoded,
}

impl std::fmt::Display for RoastSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoastSource::Ai => write!(f, "ai"),
            RoastSource::Fallback => write!(f, "fallback"),
            RoastSource::Hardcoded => write!(f, "hardcoded"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastResponse {
    pub roasts: Vec<String>,
    pub source: RoastSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RoastMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastMetadata {
    pub roast_categories: Vec<String>,
    pub severity_levels: Vec<String>,
}

impl From<GeneratedRoasts> for RoastResponse {
    fn from(generated: GeneratedRoasts) -> Self {
        let metadata = RoastMetadata {
            roast_categories: generated.roasts.iter().map(|r| r.category.clone()).collect(),
            severity_levels: generated.roasts.iter().map(|r| r.severity.clone()).collect(),
        };
        Self {
            roasts: generated.roasts.into_iter().map(|r| r.text).collect(),
            source: RoastSource::Ai,
            overall_tone: Some(generated.overall_tone),
            metadata: Some(metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Roastability {
    HighlyRoastable,
    ModeratelyRoastable,
    MinimallyRoastable,
}

impl std::fmt::Display for Roastability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Roastability::HighlyRoastable => write!(f, "highly_roastable"),
            Roastability::ModeratelyRoastable => write!(f, "moderately_roastable"),
            Roastability::MinimallyRoastable => write!(f, "minimally_roastable"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastPotential {
    pub roast_score: u32,
    pub roastability_level: Roastability,
    pub message: String,
    pub roast_factors: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Everything a roast is computed from. Also the request body of the HTTP
/// roast endpoints; `analysis` is recomputed when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastRequest {
    pub user: GitHubUser,
    #[serde(default)]
    pub repos: Vec<Repository>,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

/// A finished roast as stored and printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastReport {
    pub user: GitHubUser,
    pub repositories_analyzed: u32,
    pub commits_analyzed: u32,
    pub analysis: AnalysisResult,
    pub potential: RoastPotential,
    pub response: RoastResponse,
    pub created_at: DateTime<Utc>,
}
