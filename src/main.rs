use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

mod api;
mod export;
mod filter;
mod models;
mod render;
mod report;
mod stats;

use api::ApiClient;
use filter::FilterState;
use models::{AiSummary, FeedbackItem, OutcomeKind};

#[derive(Parser)]
#[command(name = "feedback-dashboard")]
#[command(about = "Terminal dashboard for an academic feedback API", long_about = None)]
struct Cli {
    /// Base URL of the feedback API (default: FEEDBACK_BASE_URL, then localhost)
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Only include these outcome names (repeatable)
    #[arg(long = "outcome")]
    outcomes: Vec<String>,
    /// Only include these course codes (repeatable)
    #[arg(long = "course")]
    courses: Vec<String>,
    /// Only include these term titles (repeatable)
    #[arg(long = "term")]
    terms: Vec<String>,
    /// Lowest score to include
    #[arg(long, default_value_t = 1.0)]
    min_score: f64,
    /// Highest score to include
    #[arg(long, default_value_t = 5.0)]
    max_score: f64,
}

impl FilterArgs {
    fn into_state(self) -> FilterState {
        FilterState::new(
            self.outcomes,
            self.courses,
            self.terms,
            self.min_score,
            self.max_score,
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindFilter {
    All,
    Hc,
    Lo,
}

impl KindFilter {
    fn as_kind(self) -> Option<OutcomeKind> {
        match self {
            KindFilter::All => None,
            KindFilter::Hc => Some(OutcomeKind::Criterion),
            KindFilter::Lo => Some(OutcomeKind::LearningOutcome),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full dashboard: summary, standings, trend, distribution, courses
    Overview {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Rank outcomes by average score
    Ranking {
        #[command(flatten)]
        filters: FilterArgs,
        /// Restrict to higher-level criteria (hc) or learning outcomes (lo)
        #[arg(long, value_enum, default_value = "all")]
        kind: KindFilter,
        /// Sort the strongest outcomes first instead of the weakest
        #[arg(long)]
        strongest_first: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Also write the ranking as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Average score per calendar month
    Trend {
        #[command(flatten)]
        filters: FilterArgs,
        /// Also write the series as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Count of responses per score
    Distribution {
        #[command(flatten)]
        filters: FilterArgs,
        /// Also write the buckets as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compare course averages against official course scores
    Courses {
        #[command(flatten)]
        filters: FilterArgs,
        /// Also write the comparison as CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Browse individual feedback entries
    Feedback {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Show the oldest entries first
        #[arg(long)]
        oldest_first: bool,
        /// Print full comments instead of previews
        #[arg(long)]
        full: bool,
    },
    /// Show AI-generated outcome summaries
    Summaries {
        /// Show the summary for one outcome only
        #[arg(long)]
        outcome: Option<String>,
    },
    /// List the outcome, course, and term values available for filtering
    Options,
    /// Write a markdown dashboard report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Download a CSV export from the API
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Download every record, ignoring filters
        #[arg(long)]
        all: bool,
        #[arg(long, default_value = "feedback-export.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("FEEDBACK_BASE_URL").ok())
        .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());
    let client = ApiClient::new(&base_url);
    log::info!("using feedback API at {}", client.base_url());

    match cli.command {
        Commands::Overview { filters } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let official = match client.fetch_course_scores().await {
                Ok(scores) => scores,
                Err(err) => {
                    log::warn!("course scores unavailable: {err:#}");
                    Vec::new()
                }
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            render::print_overview(&state, &filtered, &official);
        }
        Commands::Ranking {
            filters,
            kind,
            strongest_first,
            limit,
            csv,
        } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            let standings = stats::outcome_standings(&filtered, kind.as_kind(), strongest_first);
            let order = if strongest_first {
                "strongest first"
            } else {
                "weakest first"
            };
            println!("Outcome ranking ({order}):");
            render::print_standings(&standings, limit);
            if let Some(path) = csv {
                export::write_standings_csv(&path, &standings)?;
                println!("Ranking written to {}.", path.display());
            }
        }
        Commands::Trend { filters, csv } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            let points = stats::monthly_trend(&filtered);
            println!("Average score by month:");
            render::print_trend(&points);
            if let Some(path) = csv {
                export::write_trend_csv(&path, &points)?;
                println!("Trend written to {}.", path.display());
            }
        }
        Commands::Distribution { filters, csv } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            let buckets = stats::score_histogram(&filtered);
            println!("Score distribution:");
            render::print_histogram(&buckets);
            if let Some(path) = csv {
                export::write_histogram_csv(&path, &buckets)?;
                println!("Distribution written to {}.", path.display());
            }
        }
        Commands::Courses { filters, csv } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let official = match client.fetch_course_scores().await {
                Ok(scores) => scores,
                Err(err) => {
                    log::warn!("course scores unavailable: {err:#}");
                    Vec::new()
                }
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            let courses = stats::course_comparisons(&filtered, &official);
            println!("Course comparison:");
            render::print_courses(&courses);
            if let Some(path) = csv {
                export::write_courses_csv(&path, &courses)?;
                println!("Comparison written to {}.", path.display());
            }
        }
        Commands::Feedback {
            filters,
            limit,
            oldest_first,
            full,
        } => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            if filtered.is_empty() {
                render::print_no_data(state.is_default());
                return Ok(());
            }
            render::print_feedback(&filtered, limit, oldest_first, full);
        }
        Commands::Summaries { outcome } => {
            let summaries = match client.fetch_summaries().await {
                Ok(summaries) => summaries,
                Err(err) => {
                    render::print_fetch_error(&err);
                    return Ok(());
                }
            };
            match outcome {
                Some(name) => match AiSummary::first_for(&summaries, &name) {
                    Some(summary) => render::print_ai_summary(summary),
                    None => render::print_missing_summary(&name),
                },
                None => {
                    if summaries.is_empty() {
                        println!("No AI summaries available.");
                    } else {
                        for (index, summary) in summaries.iter().enumerate() {
                            if index > 0 {
                                println!();
                            }
                            render::print_ai_summary(summary);
                        }
                    }
                }
            }
        }
        Commands::Options => {
            let Some(items) = load_feedback(&client).await else {
                return Ok(());
            };
            render::print_filter_options(&items);
        }
        Commands::Report { filters, out } => {
            let items = client.fetch_feedback().await?;
            let official = match client.fetch_course_scores().await {
                Ok(scores) => scores,
                Err(err) => {
                    log::warn!("course scores unavailable: {err:#}");
                    Vec::new()
                }
            };
            let summaries = match client.fetch_summaries().await {
                Ok(summaries) => summaries,
                Err(err) => {
                    log::warn!("ai summaries unavailable: {err:#}");
                    Vec::new()
                }
            };
            let state = filters.into_state();
            let filtered = state.apply(&items);
            let report =
                report::build_report(&state.selection_label(), &filtered, &official, &summaries);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { filters, all, out } => {
            let bytes = if all {
                client.download_export_all().await?
            } else {
                client.download_export(&filters.into_state()).await?
            };
            export::save_download(&out, &bytes)?;
            println!("Export saved to {} ({} bytes).", out.display(), bytes.len());
        }
    }

    Ok(())
}

async fn load_feedback(client: &ApiClient) -> Option<Vec<FeedbackItem>> {
    match client.fetch_feedback().await {
        Ok(items) => Some(items),
        Err(err) => {
            render::print_fetch_error(&err);
            None
        }
    }
}
