use clap::{Args, Parser, Subcommand};
use sitegen::logger::{self, LoggerConfig};
use sitegen::{
    presets, GeminiClient, GeminiConfig, GenerationError, ImageGenerator, ImageRequest, JobSet,
    RunConfig, Runner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(about = "Generate website imagery with the Gemini image API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging with module and file locations
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append log lines to this file (defaults to SITEGEN_LOG_FILE)
    #[arg(long, global = true)]
    log_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in job sets
    List,

    /// Run a built-in job set or a JSON manifest
    Run(RunArgs),

    /// Generate a single image
    Generate(GenerateArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Built-in job set (see `sitegen list`)
    #[arg(required_unless_present = "manifest", conflicts_with = "manifest")]
    preset: Option<String>,

    /// JSON manifest describing a job set
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Only run jobs with these filenames
    #[arg(long = "only")]
    only: Vec<String>,

    /// Directory the set's output directory is created under
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Model id overriding the set's model
    #[arg(long)]
    model: Option<String>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Text prompt describing the image
    #[arg(short, long)]
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Aspect ratio hint, e.g. 16:9
    #[arg(long)]
    aspect_ratio: Option<String>,

    /// Image size hint, e.g. 2K
    #[arg(long)]
    image_size: Option<String>,

    /// Reference image; missing files are skipped
    #[arg(short, long = "reference")]
    references: Vec<PathBuf>,

    /// Model id overriding GEMINI_MODEL
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let log_file = cli
        .log_file
        .or_else(|| std::env::var("SITEGEN_LOG_FILE").ok())
        .filter(|path| !path.trim().is_empty());
    let logger_config = LoggerConfig::from_flags(cli.verbose, cli.json_logs, log_file.as_deref());
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
        return ExitCode::from(2);
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every requested image was produced.
async fn run(command: Commands) -> Result<bool, GenerationError> {
    let run_config = RunConfig::from_env();

    match command {
        Commands::List => {
            for set in presets::all(&run_config.logo_symbol)? {
                println!(
                    "{:<18} {:>2} job(s) -> {:<20} {}",
                    set.name,
                    set.jobs.len(),
                    set.output_dir.display(),
                    set.description
                );
            }
            Ok(true)
        }
        Commands::Run(args) => {
            let set = match (&args.manifest, &args.preset) {
                (Some(path), _) => JobSet::load(path)?,
                (None, Some(name)) => presets::get(name, &run_config.logo_symbol)?,
                (None, None) => {
                    return Err(GenerationError::InvalidRequest(
                        "a preset name or --manifest is required".into(),
                    ))
                }
            };

            let client = connect()?;
            let output_root = args.output_root.unwrap_or(run_config.output_root);
            let mut runner = Runner::new(Arc::new(client), output_root).with_filter(args.only);
            if let Some(model) = args.model {
                runner = runner.with_model(model);
            }

            let report = runner.run(&set).await;
            report.log_summary();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok(report.is_success())
        }
        Commands::Generate(args) => {
            let mut request = ImageRequest::new(args.prompt);
            request.aspect_ratio = args.aspect_ratio;
            request.image_size = args.image_size;
            for reference in &args.references {
                request = request.with_reference_path(reference)?;
            }
            request.validate()?;

            let client = connect()?;
            let _timer = logger::timer("generate");
            let result = client
                .generate_to_file(&request, args.model.as_deref(), &args.output)
                .await;

            match result {
                Ok(image) => {
                    log::info!(
                        "{} bytes, {}",
                        image.data.len(),
                        image.format.mime_type()
                    );
                    if let Some(text) = image.text {
                        log::info!("📝 {}", text);
                    }
                    Ok(true)
                }
                Err(e) => {
                    log::error!("❌ {}", e);
                    Ok(false)
                }
            }
        }
    }
}

fn connect() -> Result<GeminiClient, GenerationError> {
    let config = GeminiConfig::from_env();
    logger::log_config_info(&config);
    GeminiClient::new(config)
}
