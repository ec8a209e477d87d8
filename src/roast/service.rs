use std::sync::Arc;

use crate::config::{Config, ProviderKind};
use crate::error::Result;
use crate::llm::{ClaudeProvider, GeminiProvider, RoastGenerator, RoastPrompt};
use crate::models::analysis::AnalysisResult;
use crate::models::{RoastRequest, RoastResponse, RoastSource};
use crate::roast::rules::fallback_roasts;

pub const HARDCODED_ROASTS: &[&str] = &[
    "Your GitHub is so quiet even the roast generator gave up. 🦗",
    "We tried to roast you, but your code already burned itself. 🔥",
    "404: roastable content not found. Impressive, in a sad way. 🕳️",
];

/// Produces roasts with a layered fallback: AI provider, then static rules,
/// then a fixed list. Never fails.
#[derive(Clone, Default)]
pub struct RoastService {
    generator: Option<Arc<dyn RoastGenerator>>,
}

impl RoastService {
    pub fn new(generator: Option<Arc<dyn RoastGenerator>>) -> Self {
        Self { generator }
    }

    /// Service for the provider selected in `config`, or static-only when
    /// no provider is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator: Option<Arc<dyn RoastGenerator>> = match config.provider {
            Some(ProviderKind::Claude) => match &config.anthropic_api_key {
                Some(key) => Some(Arc::new(ClaudeProvider::new(key.clone(), config.model.clone())?)),
                None => None,
            },
            Some(ProviderKind::Gemini) => match &config.gemini_api_key {
                Some(key) => Some(Arc::new(GeminiProvider::new(key.clone(), config.model.clone())?)),
                None => None,
            },
            None => None,
        };

        match &generator {
            Some(g) => tracing::info!("Roasts generated by {}", g.name()),
            None => tracing::info!("No roast provider configured, using static roasts"),
        }

        Ok(Self::new(generator))
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.generator.as_ref().map(|g| g.name())
    }

    pub async fn generate(&self, request: &RoastRequest, analysis: &AnalysisResult) -> RoastResponse {
        if let Some(generator) = &self.generator {
            let prompt = RoastPrompt::new(request, analysis);
            match generator.generate_roasts(&prompt).await {
                Ok(generated) => {
                    tracing::info!(
                        "{} generated {} roasts for {}",
                        generator.name(),
                        generated.roasts.len(),
                        request.user.login
                    );
                    return generated.into();
                }
                Err(e) => {
                    tracing::warn!("{} roast generation failed, using fallback: {}", generator.name(), e);
                }
            }
        }

        self.static_roasts(request, analysis)
    }

    pub fn static_roasts(&self, request: &RoastRequest, analysis: &AnalysisResult) -> RoastResponse {
        let roasts = fallback_roasts(&request.user, analysis);
        if !roasts.is_empty() {
            return RoastResponse {
                roasts,
                source: RoastSource::Fallback,
                overall_tone: Some("mysterious".to_string()),
                metadata: None,
            };
        }

        tracing::warn!("Static roast rules produced nothing for {}", request.user.login);
        RoastResponse {
            roasts: HARDCODED_ROASTS.iter().map(|s| s.to_string()).collect(),
            source: RoastSource::Hardcoded,
            overall_tone: Some("mysterious".to_string()),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{GeneratedRoasts, GitHubUser, RoastLine};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct FixedGenerator(Option<GeneratedRoasts>);

    #[async_trait]
    impl RoastGenerator for FixedGenerator {
        async fn generate_roasts(&self, _prompt: &RoastPrompt) -> Result<GeneratedRoasts> {
            self.0
                .clone()
                .ok_or_else(|| Error::LLMApi("service unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    fn request() -> RoastRequest {
        RoastRequest {
            user: GitHubUser {
                login: "octocat".to_string(),
                name: None,
                bio: None,
                avatar_url: String::new(),
                public_repos: 0,
                followers: 0,
                following: 0,
                created_at: Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap(),
            },
            repos: Vec::new(),
            commits: Vec::new(),
            analysis: None,
        }
    }

    #[tokio::test]
    async fn test_uses_ai_roasts_when_available() {
        let generated = GeneratedRoasts {
            roasts: vec![RoastLine {
                text: "AI says hi".to_string(),
                category: "general".to_string(),
                severity: "mild".to_string(),
            }],
            overall_tone: "veteran".to_string(),
        };
        let service = RoastService::new(Some(Arc::new(FixedGenerator(Some(generated)))));

        let response = service.generate(&request(), &AnalysisResult::default()).await;
        assert_eq!(response.source, RoastSource::Ai);
        assert_eq!(response.roasts, vec!["AI says hi"]);
        assert_eq!(response.overall_tone.as_deref(), Some("veteran"));
        assert!(response.metadata.is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_static_rules_on_error() {
        let service = RoastService::new(Some(Arc::new(FixedGenerator(None))));
        let response = service.generate(&request(), &AnalysisResult::default()).await;

        assert_eq!(response.source, RoastSource::Fallback);
        assert_eq!(response.overall_tone.as_deref(), Some("mysterious"));
        assert!(!response.roasts.is_empty());
        assert!(response.roasts.len() <= 6);
    }

    #[test]
    fn test_from_config_picks_provider() {
        let mut config = Config::from_lookup(|_| None).unwrap();
        assert!(RoastService::from_config(&config).unwrap().provider_name().is_none());

        config.provider = Some(ProviderKind::Gemini);
        config.gemini_api_key = Some("key".to_string());
        let service = RoastService::from_config(&config).unwrap();
        assert_eq!(service.provider_name(), Some("Gemini"));
    }

    #[tokio::test]
    async fn test_quiet_profile_gets_hardcoded_roasts() {
        let mut analysis = AnalysisResult::default();
        analysis.user_stats.account_age = 1000;
        analysis.user_stats.follow_ratio = 1.0;
        analysis.emoji_usage.count = 3;

        let service = RoastService::new(Some(Arc::new(FixedGenerator(None))));
        let response = service.generate(&request(), &analysis).await;

        assert_eq!(response.source, RoastSource::Hardcoded);
        assert_eq!(response.roasts, HARDCODED_ROASTS);
        assert_eq!(response.overall_tone.as_deref(), Some("mysterious"));
    }

    #[tokio::test]
    async fn test_without_provider_uses_static_rules() {
        let service = RoastService::default();
        assert!(service.provider_name().is_none());
        let response = service.generate(&request(), &AnalysisResult::default()).await;
        assert_eq!(response.source, RoastSource::Fallback);
    }
}
