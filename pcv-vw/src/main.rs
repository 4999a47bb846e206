//! pcv-vw (Viewer) - terminal front end for the deletion-queue protocol
//!
//! Fetches the scores snapshot and the deletion queue from a queue server,
//! shows the reconciled gallery, and queues images for deletion.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pcv_vw::console::ConsoleOperator;
use pcv_vw::{Operator, QueueClient, SortOrder, ViewSettings, ViewerState};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "pcv-vw")]
#[command(about = "Image curation viewer client")]
#[command(version)]
struct Args {
    /// Queue server base URL
    #[arg(long, env = "PCV_SERVER_URL", default_value = "http://127.0.0.1:5731")]
    server: String,

    /// Hard-delete endpoint (defaults to <server>/api/delete_image)
    #[arg(long, env = "PCV_HARD_DELETE_URL")]
    hard_delete_url: Option<String>,

    /// Snapshot field to sort by
    #[arg(long, default_value = "score_final")]
    sort_by: String,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    order: SortOrder,

    /// Minimum score shown with --hide-low-score
    #[arg(long, default_value_t = 0.0)]
    threshold: f64,

    /// Hide images scoring below --threshold
    #[arg(long)]
    hide_low_score: bool,

    /// Disable the terminal bell after a successful delete request
    #[arg(long)]
    no_sound: bool,

    /// Disable vibration feedback
    #[arg(long)]
    no_vibration: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the visible gallery
    List,
    /// Add images to the server's deletion queue
    Queue {
        /// Image ids, processed in order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Permanently delete one image through the hard-delete endpoint
    HardDelete { id: String },
    /// Show snapshot size, queue size and last sync time
    Status,
}

impl Args {
    fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            sort_by: self.sort_by.clone(),
            sort_order: self.order,
            score_threshold: self.threshold,
            show_low_score: !self.hide_low_score,
            sound_effects: !self.no_sound,
            vibration: !self.no_vibration,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut client = QueueClient::new(&args.server).context("Failed to build HTTP client")?;
    if let Some(url) = &args.hard_delete_url {
        client = client.with_hard_delete_url(url.clone());
    }
    let operator = ConsoleOperator::new(args.yes);

    let mut state = ViewerState::new(args.view_settings());
    client
        .refresh(&mut state)
        .await
        .with_context(|| format!("Failed to load viewer data from {}", client.base_url()))?;
    debug!(images = state.snapshot.len(), queued = state.queue_len(), "Initial refresh done");

    match &args.command {
        Command::List => print_gallery(&state),
        Command::Status => print_status(&client, &state),
        Command::Queue { ids } => queue_images(&client, &mut state, &operator, ids).await?,
        Command::HardDelete { id } => {
            let Some(filename) = filename_of(&state, id) else {
                bail!("Unknown image id: {}", id);
            };
            let outcome = client.hard_delete(&operator, id, &filename).await;
            if state.apply_hard_delete(&outcome) {
                println!("Deleted {} ({})", id, filename);
            }
        }
    }

    Ok(())
}

fn filename_of(state: &ViewerState, id: &str) -> Option<String> {
    state
        .snapshot
        .get(id)
        .map(|entry| entry.filename().unwrap_or(id).to_string())
}

async fn queue_images(
    client: &QueueClient,
    state: &mut ViewerState,
    operator: &dyn Operator,
    ids: &[String],
) -> Result<()> {
    let mut failures = 0usize;

    for id in ids {
        let Some(filename) = filename_of(state, id) else {
            operator.alert(&format!("Unknown image id: {}", id));
            failures += 1;
            continue;
        };
        if state.is_queued(id) {
            info!(id = %id, "Already queued");
            continue;
        }

        let outcome = client.request_deletion(state, operator, id, &filename).await;
        if state.apply_deletion(&outcome) {
            println!("Queued {} ({}); {} in queue", id, filename, state.queue_len());
        } else if matches!(outcome, pcv_vw::DeletionOutcome::Failed(_)) {
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} of {} delete requests failed", failures, ids.len());
    }
    Ok(())
}

fn print_gallery(state: &ViewerState) {
    let visible = state.visible();
    for item in &visible {
        println!("{:>8.3}  {:<24}  {}", item.score(), item.id, item.filename());
    }
    println!(
        "{} visible, {} queued for deletion",
        visible.len(),
        state.queue_len()
    );
}

fn print_status(client: &QueueClient, state: &ViewerState) {
    println!("Server:      {}", client.base_url());
    println!("Images:      {}", state.snapshot.len());
    println!("Visible:     {}", state.visible().len());
    println!("Queued:      {}", state.queue_len());
    match state.last_sync {
        Some(time) => println!("Last sync:   {}", time.to_rfc3339()),
        None => println!("Last sync:   never"),
    }
}
