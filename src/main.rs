use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use audio_ingest::config::EngineConfig;
use audio_ingest::models::{JobKind, UploadStatus};
use audio_ingest::storage;
use audio_ingest::store::JobStore;
use audio_ingest::worker::Worker;
use audio_ingest::{db, DynError};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Ingest uploaded audio and detect voice segments in the background"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema
    Init {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run the background analysis worker until interrupted
    Worker {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Number of concurrent worker loops
        #[arg(short, long, default_value = "1")]
        workers: usize,
    },
    /// Register a WAV file as an upload and queue it for analysis
    Enqueue {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the WAV file to ingest
        file: PathBuf,
    },
    /// List uploads and their status
    List {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show analysis results for one upload
    Show {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Upload id to inspect
        upload_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), DynError> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Init { config } => init(&EngineConfig::load(&config)?).await,
        Command::Worker { config, workers } => {
            run_workers(&EngineConfig::load(&config)?, workers).await
        }
        Command::Enqueue { config, file } => enqueue(&EngineConfig::load(&config)?, &file).await,
        Command::List { config } => list(&EngineConfig::load(&config)?).await,
        Command::Show { config, upload_id } => {
            show(&EngineConfig::load(&config)?, &upload_id).await
        }
    }
}

async fn init(config: &EngineConfig) -> Result<(), DynError> {
    let pool = db::open_database_connection(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    println!("Database ready at {}", config.database_path.display());
    Ok(())
}

async fn run_workers(config: &EngineConfig, workers: usize) -> Result<(), DynError> {
    let pool = db::open_database_connection(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    let store = JobStore::new(pool);

    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();
    for _ in 0..workers.max(1) {
        let worker = Worker::new(
            store.clone(),
            config.worker.clone(),
            config.storage_dir.clone(),
        );
        let token = cancel.clone();
        tracker.spawn(async move { worker.run(token).await });
    }
    tracker.close();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, waiting for in-flight jobs");
    cancel.cancel();
    tracker.wait().await;
    Ok(())
}

async fn enqueue(config: &EngineConfig, file: &Path) -> Result<(), DynError> {
    let pool = db::open_database_connection(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    let store = JobStore::new(pool);

    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| format!("failed to read {}: {}", file.display(), e))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("{} is not a file path", file.display()))?;

    let upload = store
        .create_upload(&filename, "audio/wav", bytes.len() as i64, None)
        .await?;
    storage::stage_upload_file(&config.storage_dir, &upload.id, &bytes).await?;
    store
        .mark_upload_received(&upload.id, bytes.len() as i64)
        .await?;
    let job = store.enqueue_job(&upload.id, JobKind::Analyze, None).await?;

    println!("Upload {} queued for analysis (job {})", upload.id, job.id);
    Ok(())
}

async fn list(config: &EngineConfig) -> Result<(), DynError> {
    let pool = db::open_readonly_connection(&config.database_path).await?;
    let store = JobStore::new(pool);

    for upload in store.list_uploads().await? {
        println!(
            "{}  {:<10}  {}",
            upload.id,
            upload.status.as_str(),
            upload.filename
        );
    }
    Ok(())
}

async fn show(config: &EngineConfig, upload_id: &str) -> Result<(), DynError> {
    let pool = db::open_readonly_connection(&config.database_path).await?;
    let store = JobStore::new(pool);

    let upload = store
        .get_upload(upload_id)
        .await?
        .ok_or_else(|| format!("upload {} not found", upload_id))?;

    println!("Upload {}", upload.id);
    println!("  filename:     {}", upload.filename);
    println!("  content type: {}", upload.content_type);
    println!("  status:       {}", upload.status.as_str());
    if let Some(message) = &upload.error_message {
        println!("  error:        {}", message);
    }

    if upload.status == UploadStatus::Failed {
        if let Some(job) = store.get_job_for_upload(upload_id, JobKind::Analyze).await? {
            if let Some(last_error) = &job.last_error {
                println!(
                    "  analysis failed after {} attempts: {}",
                    job.attempts, last_error
                );
            }
        }
        return Ok(());
    }

    if let Some(audio) = store.get_audio_file(upload_id).await? {
        println!(
            "  audio:        {:.3}s, {} ch @ {} Hz, rms_avg {:.1}, zcr_avg {:.3}",
            audio.duration_s, audio.channels, audio.sample_rate, audio.rms_avg, audio.zcr_avg
        );
        for seg in store.list_segments(&audio.id).await? {
            println!(
                "  segment       {:>8} ms .. {:>8} ms  rms {:.1}  zcr {:.3}",
                seg.start_ms, seg.end_ms, seg.rms, seg.zcr
            );
        }
    } else {
        println!("  (no analysis results yet)");
    }
    Ok(())
}
