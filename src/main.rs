use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vector_art_generator::app::Workflow;
use vector_art_generator::download::DownloadOutcome;
use vector_art_generator::mime;
use vector_art_generator::models::{Config, SourceFile};

#[derive(Debug, Parser)]
#[command(name = "vector-art-generator")]
#[command(about = "Turn a photo into vector art with a remote image-effects API")]
struct CliArgs {
    /// Image to upload.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Directory the result is saved into.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Effect to apply instead of the configured one.
    #[arg(long, value_name = "ID")]
    effect: Option<String>,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "vector_art_generator=debug"
    } else {
        "vector_art_generator=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn read_source(path: &Path) -> Result<SourceFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?
        .to_string();
    let content_type = mime::content_type_for(&name, &bytes);

    Ok(SourceFile::new(name, content_type, bytes))
}

async fn run(args: CliArgs, config: Config) -> Result<()> {
    let file = read_source(&args.image).await?;
    let mut workflow = Workflow::from_config(&config)?;

    workflow.select_file(&file).await?;
    if workflow.generate().await?.is_none() {
        anyhow::bail!("Nothing was uploaded");
    }

    match workflow.download(&args.output_dir).await? {
        Some(DownloadOutcome::Saved { path, strategy }) => {
            info!("Saved result to {} (via {})", path.display(), strategy);
            println!("{}", path.display());
        }
        Some(DownloadOutcome::Handoff { url, instruction }) => {
            warn!("{}", instruction);
            println!("{}", url);
        }
        None => anyhow::bail!("No result to download"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.debug).unwrap_or(false));

    info!("Starting vector-art-generator");

    match config {
        Ok(mut config) => {
            if let Some(effect) = args.effect.clone() {
                config.effect_id = effect;
            }
            match run(args, config).await {
                Ok(_) => {
                    info!("Generation completed successfully");
                    Ok(())
                }
                Err(e) => {
                    error!("Error: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
