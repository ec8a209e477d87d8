use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitshame::models::RoastReport;
use gitshame::server::{self, AppState};
use gitshame::{Config, GitHubClient, PipelineConfig, ResponseCache, RoastPipeline, RoastService, Storage};

#[derive(Parser, Debug)]
#[command(name = "gitshame")]
#[command(version = "0.1.0")]
#[command(about = "Roast GitHub developers based on their commit history")]
struct Args {
    /// Database path for storing roast reports (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a user's GitHub activity and roast it
    Roast {
        /// GitHub username to roast
        username: String,

        /// Output format (json, text, markdown)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum repositories to pull commits from
        #[arg(long)]
        max_repos: Option<usize>,

        /// Include forked repositories
        #[arg(long)]
        include_forks: bool,

        /// Use the latest stored report if available
        #[arg(long)]
        cached: bool,
    },
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List stored roast reports
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitshame=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let storage = Arc::new(Storage::new(&config.database_path)?);

    match args.command {
        Command::Roast {
            username,
            format,
            output,
            max_repos,
            include_forks,
            cached,
        } => {
            if cached {
                if let Some(report) = storage.latest_report(&username)? {
                    tracing::info!("Using stored roast from {}", report.created_at);
                    return output_report(&report, &format, output.as_deref());
                }
                tracing::info!("No stored roast found, roasting from scratch");
            }

            let mut pipeline_config = PipelineConfig::from(&config);
            if let Some(max_repos) = max_repos {
                pipeline_config.max_repos = max_repos;
            }
            pipeline_config.include_forks |= include_forks;

            let pipeline = build_pipeline(&config, storage, pipeline_config)?.with_progress(true);

            tracing::info!("Roasting GitHub user: {}", username);
            let report = pipeline.roast_user(&username).await?;
            output_report(&report, &format, output.as_deref())?;
        }
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.host.clone());
            let port = port.unwrap_or(config.port);
            let pipeline = build_pipeline(&config, storage, PipelineConfig::from(&config))?;
            server::run(AppState { pipeline }, &host, port).await?;
        }
        Command::History => {
            let reports = storage.list_reports()?;
            if reports.is_empty() {
                println!("No roasts stored yet.");
            }
            for summary in reports {
                println!(
                    "{:<20} {}  score {:>3}  ({})",
                    summary.username,
                    summary.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    summary.roast_score,
                    summary.source
                );
            }
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &Config,
    storage: Arc<Storage>,
    pipeline_config: PipelineConfig,
) -> anyhow::Result<RoastPipeline> {
    let cache = ResponseCache::new(config.cache_capacity, config.cache_ttl);
    let github = GitHubClient::new(config.github_token.as_deref(), cache)?;
    let roaster = RoastService::from_config(config)?;

    Ok(RoastPipeline::new(github, roaster, storage, pipeline_config))
}

fn output_report(report: &RoastReport, format: &str, path: Option<&str>) -> anyhow::Result<()> {
    let output = match format {
        "json" => serde_json::to_string_pretty(report)?,
        "markdown" => format_markdown(report),
        _ => format_text(report),
    };

    if let Some(path) = path {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(report: &RoastReport) -> String {
    let mut output = String::new();
    let analysis = &report.analysis;

    output.push_str(&format!("\n=== Roast: {} ===\n\n", report.user.login));

    if let Some(ref name) = report.user.name {
        output.push_str(&format!("Name: {}\n", name));
    }
    if let Some(ref bio) = report.user.bio {
        output.push_str(&format!("Bio: {}\n", bio));
    }

    output.push_str(&format!("Repositories analyzed: {}\n", report.repositories_analyzed));
    output.push_str(&format!("Commits analyzed: {}\n", report.commits_analyzed));
    output.push_str(&format!(
        "Roast score: {}/100 ({})\n\n",
        report.potential.roast_score, report.potential.roastability_level
    ));

    output.push_str(&format!("Roasts ({}):\n", report.response.source));
    for roast in &report.response.roasts {
        output.push_str(&format!("  * {}\n", roast));
    }
    if let Some(ref tone) = report.response.overall_tone {
        output.push_str(&format!("Overall tone: {}\n", tone));
    }

    output.push_str("\nHabits:\n");
    output.push_str(&format!(
        "  Most active: {}\n",
        analysis.commit_patterns.most_active_time
    ));
    output.push_str(&format!(
        "  Weekend commits: {}\n",
        analysis.commit_patterns.day_of_week.weekend()
    ));
    output.push_str(&format!(
        "  Average message length: {:.1}\n",
        analysis.commit_language.average_length
    ));
    output.push_str(&format!("  Emojis used: {}\n", analysis.emoji_usage.count));
    output.push_str(&format!(
        "  Abandoned repos: {}\n",
        analysis.repo_analysis.abandoned_repos
    ));

    if !report.potential.roast_factors.is_empty() {
        output.push_str("\nRoast factors:\n");
        for factor in &report.potential.roast_factors {
            output.push_str(&format!("  - {}\n", factor));
        }
    }

    output.push_str(&format!(
        "\nRoasted on: {}\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(report: &RoastReport) -> String {
    let mut output = String::new();
    let analysis = &report.analysis;

    output.push_str(&format!("# Roast: {}\n\n", report.user.login));

    if let Some(ref name) = report.user.name {
        output.push_str(&format!("**Name:** {}\n\n", name));
    }
    if let Some(ref bio) = report.user.bio {
        output.push_str(&format!("> {}\n\n", bio));
    }

    output.push_str("## Roasts\n\n");
    for roast in &report.response.roasts {
        output.push_str(&format!("- {}\n", roast));
    }
    output.push_str(&format!("\n*Source: {}*\n", report.response.source));

    output.push_str("\n## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!(
        "| Roast Score | {}/100 |\n",
        report.potential.roast_score
    ));
    output.push_str(&format!(
        "| Roastability | {} |\n",
        report.potential.roastability_level
    ));
    output.push_str(&format!(
        "| Repositories Analyzed | {} |\n",
        report.repositories_analyzed
    ));
    output.push_str(&format!("| Commits Analyzed | {} |\n", report.commits_analyzed));
    output.push_str(&format!(
        "| Most Active Time | {} |\n",
        analysis.commit_patterns.most_active_time
    ));
    output.push_str(&format!(
        "| Questionable Messages | {} |\n",
        analysis.commit_language.questionable_messages.len()
    ));
    output.push_str(&format!(
        "| Total Stars | {} |\n",
        analysis.repo_analysis.total_stars
    ));

    if !analysis.repo_analysis.languages.is_empty() {
        output.push_str("\n## Languages\n\n");
        for language in &analysis.repo_analysis.languages {
            output.push_str(&format!("- **{}**: {}\n", language.language, language.count));
        }
    }

    if !report.potential.suggestions.is_empty() {
        output.push_str("\n## Suggestions\n\n");
        for suggestion in &report.potential.suggestions {
            output.push_str(&format!("- {}\n", suggestion));
        }
    }

    output.push_str(&format!(
        "\n---\n*Roasted on {}*\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
