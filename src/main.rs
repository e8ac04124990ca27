use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use resume_matcher::config::Config;
use resume_matcher::documents::{allowed_file, extract_text_from_file, load_documents};
use resume_matcher::embedding;
use resume_matcher::ner::{QualificationVocabulary, SkillVocabulary};
use resume_matcher::store::{CandidateStore, JsonFileStore};
use resume_matcher::{MatchResult, RankedBatch, RankingPipeline};

#[derive(Parser, Debug)]
#[command(name = "resume-matcher", version)]
#[command(about = "Rank resumes against a job description by skills, experience, qualifications and semantic similarity")]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank resume files against a job description file
    Rank {
        /// Job description (.txt or .pdf)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Print the ranked batch as JSON
        #[arg(long)]
        json: bool,

        /// Abandon the whole batch after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Show the stored candidates of an earlier ranking
    History {
        job_id: Uuid,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level, args.log_format)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let result = runtime.block_on(run(args));

    // An abandoned ranking may still occupy a blocking thread; do not wait for it.
    runtime.shutdown_background();
    result
}

async fn run(args: Args) -> Result<ExitCode> {
    info!("Starting resume-matcher v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load(Some(args.config.as_path())).context("Failed to load configuration")?;
    info!("Configuration loaded");

    match args.command {
        Command::Rank {
            job,
            resumes,
            json,
            timeout_secs,
        } => rank(&config, &job, &resumes, json, timeout_secs).await,
        Command::History { job_id, json } => history(&config, job_id, json).await,
    }
}

fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

async fn rank(
    config: &Config,
    job_path: &Path,
    resume_paths: &[PathBuf],
    json: bool,
    timeout_secs: Option<u64>,
) -> Result<ExitCode> {
    let allowed = &config.upload.allowed_extensions;
    let job_name = job_path.to_string_lossy();
    if !allowed_file(&job_name, allowed) {
        eprintln!("Invalid job description file type. Use one of: {}", allowed.join(", "));
        return Ok(ExitCode::FAILURE);
    }

    // Load vocabularies and model once for the whole batch
    let skills = SkillVocabulary::load(Path::new(&config.vocabulary.skills_path))
        .context("Failed to load skill vocabulary")?;
    let qualifications =
        QualificationVocabulary::load(Path::new(&config.vocabulary.qualifications_path))
            .context("Failed to load qualification vocabulary")?;

    info!("Initializing language model...");
    let model = embedding::load_language_model(&config.models)
        .context("Failed to initialize language model")?;

    let pipeline = Arc::new(RankingPipeline::with_model(
        model,
        Arc::new(skills),
        Arc::new(qualifications),
        config.scoring.weights(),
    ));

    let job_file = job_path.to_path_buf();
    let job_text = tokio::task::spawn_blocking(move || extract_text_from_file(&job_file))
        .await
        .context("Job description extraction task failed")?;
    let documents = load_documents(resume_paths, allowed).await;
    info!("Loaded {} resume documents", documents.len());

    let task = tokio::task::spawn_blocking(move || pipeline.rank(&job_text, &documents));
    let ranked = await_with_deadline(task, timeout_secs.map(Duration::from_secs)).await?;

    let batch = match ranked {
        Ok(batch) => batch,
        Err(e) => {
            error!("Ranking rejected: {}", e);
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let store = JsonFileStore::new(&config.storage.data_dir);
    if let Err(e) = store.store_batch(&batch).await {
        error!("Error storing candidates for job_id {}: {}", batch.job_id, e);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_batch(&batch);
    }
    Ok(ExitCode::SUCCESS)
}

/// Wait for a blocking task, giving up once `deadline` has passed.
///
/// The task itself keeps running until the runtime is shut down.
async fn await_with_deadline<T>(
    task: tokio::task::JoinHandle<T>,
    deadline: Option<Duration>,
) -> Result<T> {
    let joined = match deadline {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .with_context(|| format!("Ranking did not finish within {:?}", limit))?,
        None => task.await,
    };
    joined.context("Ranking task failed")
}

async fn history(config: &Config, job_id: Uuid, json: bool) -> Result<ExitCode> {
    let store = JsonFileStore::new(&config.storage.data_dir);
    let candidates = store
        .candidates_for_job(&job_id)
        .await
        .with_context(|| format!("Failed to read candidates for job {}", job_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else if candidates.is_empty() {
        println!("No candidates stored for job {}", job_id);
    } else {
        println!("Job {}", job_id);
        print_candidates(&candidates);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_batch(batch: &RankedBatch) {
    println!("Job {}", batch.job_id);
    println!(
        "Requires: {} ({} years experience)",
        batch.job_skills.join(", "),
        batch.job_experience
    );
    if !batch.job_qualifications.is_empty() {
        println!("Qualifications: {}", batch.job_qualifications.join(", "));
    }
    for name in &batch.skipped {
        println!("Could not extract text from {}. Skipping.", name);
    }
    println!();
    print_candidates(&batch.candidates);
}

fn print_candidates(candidates: &[MatchResult]) {
    println!(
        "{:>4}  {:>6}  {:>4}  {:<30}  {}",
        "Rank", "Score", "Exp", "Candidate", "Skills | Qualifications"
    );
    for (rank, c) in candidates.iter().enumerate() {
        println!(
            "{:>4}  {:>6.2}  {:>4}  {:<30}  {} | {}",
            rank + 1,
            c.match_score,
            c.experience,
            c.name,
            c.skills.join(", "),
            c.qualifications.join(", ")
        );
    }
}
