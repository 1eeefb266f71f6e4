use anyhow::{bail, Context};
use clap::Parser;
use garment_detector::{
    DetectionOrchestrator, DetectorConfig, HttpInferenceClient, ImageReference, InferenceClient,
    ScriptedInferenceClient,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Detect color, category and temperature of a garment photo.
#[derive(Debug, Parser)]
#[command(name = "garment-detector", version)]
struct Args {
    /// Photo hosted at an http(s) URL
    #[arg(long, conflicts_with = "image_file", required_unless_present = "image_file")]
    image_url: Option<String>,

    /// Photo on the local disk, sent inline
    #[arg(long)]
    image_file: Option<PathBuf>,

    /// JSON configuration file; environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Seed for the random fallback
    #[arg(long)]
    seed: Option<u64>,

    /// Answer from a built-in script instead of calling an endpoint
    #[arg(long)]
    offline: bool,

    /// Print the full detection report instead of just the attributes
    #[arg(long)]
    provenance: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let client: Arc<dyn InferenceClient> = if args.offline {
        info!("Running offline with the scripted inference client");
        Arc::new(ScriptedInferenceClient::sample())
    } else {
        Arc::new(HttpInferenceClient::new(config.inference.clone()).context("Failed to create inference client")?)
    };

    let image = load_image(&args).await?;
    let orchestrator = DetectionOrchestrator::new(client, &config);

    // Ctrl-C abandons the request
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let report = match orchestrator.detect_until(&image, interrupted).await {
        Ok(report) => report,
        Err(e) => {
            error!("Detection aborted: {}", e);
            return Err(e.into());
        }
    };

    let output = if args.provenance {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.attributes)?
    };
    println!("{}", output);
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    config.apply_env().context("Invalid GARMENT_* environment")?;

    if let Some(endpoint) = &args.endpoint {
        config.inference.endpoint = endpoint.clone();
    }
    if let Some(model) = &args.model {
        config.inference.model = model.clone();
    }
    if let Some(timeout) = args.timeout_secs {
        config.inference.timeout_seconds = timeout;
    }
    if let Some(seed) = args.seed {
        config.strategy.fallback_seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

async fn load_image(args: &Args) -> anyhow::Result<ImageReference> {
    if let Some(url) = &args.image_url {
        return Ok(ImageReference::remote(url.clone()));
    }
    let Some(path) = &args.image_file else {
        bail!("either --image-url or --image-file is required");
    };
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImageReference::inline(mime_type_for(path), data))
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}
