use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, builder::BoolishValueParser};

use crate::application::blog::DEFAULT_LATEST_LIMIT;

/// Command-line arguments for the quire binary.
#[derive(Debug, Parser)]
#[command(name = "quire", version, about = "Query the blog and raffle report store")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "QUIRE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL", global = true)]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT", global = true)]
    pub database_max_connections: Option<u32>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Toggle the query result cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub cache_enabled: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show a single post by slug.
    Post(SlugArgs),
    /// List the newest visible posts.
    Latest(LatestArgs),
    /// List one page of visible posts.
    Recent(RecentArgs),
    /// List the newest visible posts except the given one.
    Related(RelatedArgs),
    /// List visible posts in a category.
    Category(SlugArgs),
    /// List visible posts published in a calendar month.
    Archive(ArchiveArgs),
    /// Search visible posts by title, summary and body.
    Search(SearchArgs),
    /// List visible posts carrying a tag.
    Tag(SlugArgs),
    /// Print the raffle participation report for the given media.
    #[command(name = "raffle-report")]
    RaffleReport(RaffleReportArgs),
    /// Apply the bundled database migrations.
    Migrate,
}

#[derive(Debug, Args, Clone)]
pub struct SlugArgs {
    #[arg(value_name = "SLUG")]
    pub slug: String,
}

#[derive(Debug, Args, Clone)]
pub struct LatestArgs {
    /// Maximum number of posts.
    #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Args, Clone)]
pub struct RecentArgs {
    /// Maximum number of posts.
    #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
    pub limit: u32,

    /// Number of posts to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Debug, Args, Clone)]
pub struct RelatedArgs {
    /// Slug of the post to leave out.
    #[arg(value_name = "SLUG")]
    pub slug: String,

    /// Maximum number of posts.
    #[arg(long, default_value_t = DEFAULT_LATEST_LIMIT)]
    pub limit: u32,
}

#[derive(Debug, Args, Clone)]
pub struct ArchiveArgs {
    #[arg(value_name = "YEAR")]
    pub year: i32,

    /// Month number, 1-12.
    #[arg(value_name = "MONTH")]
    pub month: u8,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Literal text to look for; an empty string matches every visible post.
    #[arg(value_name = "TEXT")]
    pub needle: String,
}

#[derive(Debug, Args, Clone)]
pub struct RaffleReportArgs {
    /// Medium identifiers to include.
    #[arg(value_name = "MEDIUM_ID")]
    pub media: Vec<i64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
}
