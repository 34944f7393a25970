//! hypeblog: management commands for the blog backend.
//!
//! ```text
//! hypeblog import-media-thumbnails
//! hypeblog import-wordpress export.xml --default-category news --author admin
//! hypeblog create-user alice alice@example.com --role editor
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hypeblog")]
#[command(about = "Management commands for the Hypeblog backend")]
struct Cli {
    /// Postgres connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Directory holding uploaded files
    #[arg(long, env = "MEDIA_ROOT", default_value = "./media")]
    media_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register images already present in MEDIA_ROOT/thumbnails/ as media items
    ImportMediaThumbnails,

    /// Import posts and pages from a WordPress WXR export
    ImportWordpress {
        /// Path to the export file
        file: PathBuf,

        /// Slug of the category used for posts without one
        #[arg(long)]
        default_category: Option<String>,

        /// Leave posts and pages whose slug already exists untouched
        #[arg(long)]
        skip_existing: bool,

        /// Username credited as the author of imported posts
        #[arg(long)]
        author: String,
    },

    /// Create a back-office user
    CreateUser {
        username: String,
        email: String,

        /// `admin` or `editor`
        #[arg(long, default_value = "editor")]
        role: String,

        #[arg(long, env = "HYPEBLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hypeblog=info,hypeblog_api=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let pool = hypeblog_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to the database")?;
    hypeblog_db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    match cli.command {
        Command::ImportMediaThumbnails => {
            let report = commands::import_media_thumbnails(&pool, &cli.media_root).await?;
            for line in &report.lines {
                println!("{line}");
            }
            println!("Successfully imported {} new media items.", report.imported);
        }
        Command::ImportWordpress {
            file,
            default_category,
            skip_existing,
            author,
        } => {
            let xml = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = commands::import_wordpress(
                &pool,
                &xml,
                default_category.as_deref(),
                skip_existing,
                &author,
            )
            .await?;

            println!(
                "Posts: {} created, {} updated. Pages: {} created, {} updated.",
                report.posts_created, report.posts_updated, report.pages_created, report.pages_updated
            );
            println!(
                "Skipped {}, ignored {}. New categories: {}, new tags: {}.",
                report.skipped, report.ignored, report.categories_created, report.tags_created
            );
            for error in &report.errors {
                eprintln!("Error: {error}");
            }
        }
        Command::CreateUser {
            username,
            email,
            role,
            password,
        } => {
            let user = commands::create_user(&pool, &username, &email, &role, &password).await?;
            println!("Created {} user '{}' (id {})", user.role, user.username, user.id);
        }
    }

    Ok(())
}
