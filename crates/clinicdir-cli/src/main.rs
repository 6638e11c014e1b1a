mod deleted;
mod drafts;

use clap::{Parser, Subcommand, ValueEnum};
use clinicdir_client::ClinicApiClient;
use clinicdir_review::{PhotoSelection, RatingOptions, RatingSource};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "clinicdir-cli")]
#[command(about = "Review clinic directory drafts from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show a draft and the changes it proposes against its clinic
    Review {
        draft_id: i64,
        /// Print the full review as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Render the listing a draft would publish
    Preview {
        draft_id: i64,
        #[command(flatten)]
        publish: PublishArgs,
        /// Print the preview as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Approve a draft and publish it
    Approve {
        draft_id: i64,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Reject a draft
    Reject {
        draft_id: i64,
        /// Reason recorded with the rejection
        #[arg(long)]
        reason: Option<String>,
    },
    /// Delete a draft without publishing it
    Delete { draft_id: i64 },
    /// List soft-deleted clinics
    Deleted {
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page; defaults to the configured page size
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Restore a soft-deleted clinic
    Restore { clinic_id: i64 },
}

/// Photo and rating choices applied when a draft is previewed or published.
#[derive(Debug, Clone, clap::Args)]
struct PublishArgs {
    /// Which photos to publish
    #[arg(long, value_enum, default_value = "both")]
    photo_source: PhotoArg,
    /// Where the published rating comes from
    #[arg(long, value_enum, default_value = "google")]
    rating_source: RatingArg,
    /// Rating to publish with `--rating-source manual`
    #[arg(long)]
    manual_rating: Option<f64>,
    /// Review count to publish with `--rating-source manual`
    #[arg(long)]
    manual_review_count: Option<u32>,
}

impl PublishArgs {
    fn photo_selection(&self) -> PhotoSelection {
        match self.photo_source {
            PhotoArg::User => PhotoSelection::User,
            PhotoArg::Google => PhotoSelection::Google,
            PhotoArg::Both => PhotoSelection::Both,
        }
    }

    fn rating_options(&self) -> RatingOptions {
        RatingOptions {
            rating_source: match self.rating_source {
                RatingArg::Google => RatingSource::Google,
                RatingArg::Manual => RatingSource::Manual,
            },
            manual_rating: self.manual_rating,
            manual_review_count: self.manual_review_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhotoArg {
    User,
    Google,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RatingArg {
    Google,
    Manual,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("clinicdir-cli: run with --help to list commands");
        return Ok(());
    };

    let config = clinicdir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = ClinicApiClient::new(&config)
        .map_err(|e| anyhow::anyhow!("failed to build clinic API client: {e}"))?;

    match command {
        Commands::Review { draft_id, json } => drafts::run_review(&client, draft_id, json).await,
        Commands::Preview {
            draft_id,
            publish,
            json,
        } => {
            drafts::run_preview(
                &client,
                draft_id,
                publish.photo_selection(),
                &publish.rating_options(),
                json,
            )
            .await
        }
        Commands::Approve { draft_id, publish } => {
            drafts::run_approve(
                &client,
                draft_id,
                publish.photo_selection(),
                &publish.rating_options(),
            )
            .await
        }
        Commands::Reject { draft_id, reason } => {
            drafts::run_reject(&client, draft_id, reason.as_deref()).await
        }
        Commands::Delete { draft_id } => drafts::run_delete(&client, draft_id).await,
        Commands::Deleted { page, limit } => {
            let limit = limit.unwrap_or(config.deleted_page_size);
            deleted::run_deleted_list(&client, page, limit).await
        }
        Commands::Restore { clinic_id } => {
            deleted::run_restore(
                &client,
                clinic_id,
                config.deleted_page_size,
                config.deleted_max_pages,
            )
            .await
        }
    }
}
