use std::{
    io::{self, Write},
    process,
    sync::Arc,
};

use quire::{
    application::{
        blog::BlogService,
        clock::{Clock, SystemClock},
        error::AppError,
        raffle::{RaffleReportService, write_csv},
        repos::{PostsRepo, RaffleReportRepo},
    },
    cache::{CacheConfig, QueryCache},
    config::{self, Command, ReportFormat},
    infra::{db::PostgresRepositories, error::InfraError, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(InfraError::from)?;

    telemetry::init(&settings.logging)?;

    let repositories = init_repositories(&settings).await?;

    match cli_args.command {
        Command::Migrate => {
            PostgresRepositories::run_migrations(repositories.pool())
                .await
                .map_err(InfraError::from)?;
            info!("migrations applied");
            Ok(())
        }
        Command::RaffleReport(args) => {
            let repo: Arc<dyn RaffleReportRepo> = repositories;
            let report = RaffleReportService::new(repo);
            let records = report.participation(&args.media).await?;
            match args.format {
                ReportFormat::Csv => write_csv(&records, io::stdout().lock())
                    .map_err(|err| InfraError::output(err.to_string()))?,
                ReportFormat::Json => print_json(&records)?,
            }
            Ok(())
        }
        command => {
            let blog = build_blog_service(repositories, &settings);
            run_blog_command(&blog, command).await
        }
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings.database.url.as_ref().ok_or_else(|| {
        InfraError::configuration(
            "database url is required (provide --database-url or set QUIRE__DATABASE__URL)",
        )
    })?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_blog_service(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> BlogService {
    let posts: Arc<dyn PostsRepo> = repositories;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(QueryCache::new(&cache_config));

    BlogService::new(posts, clock, cache, cache_config.policies())
}

async fn run_blog_command(blog: &BlogService, command: Command) -> Result<(), AppError> {
    match command {
        Command::Post(args) => print_json(&blog.post_by_slug(&args.slug).await?),
        Command::Latest(args) => print_json(&blog.latest_verified(args.limit).await?),
        Command::Recent(args) => print_json(&blog.recent(args.limit, args.offset).await?),
        Command::Related(args) => {
            print_json(&blog.recent_excluding(&args.slug, args.limit).await?)
        }
        Command::Category(args) => print_json(&blog.by_category(&args.slug).await?),
        Command::Archive(args) => print_json(&blog.by_month(args.year, args.month).await?),
        Command::Search(args) => print_json(&blog.search(&args.needle).await?),
        Command::Tag(args) => print_json(&blog.by_tag(&args.slug).await?),
        Command::RaffleReport(_) | Command::Migrate => {
            Err(AppError::unexpected("command is not a blog query"))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)
        .map_err(|err| InfraError::output(err.to_string()))?;
    writeln!(out).map_err(InfraError::from)?;
    Ok(())
}
