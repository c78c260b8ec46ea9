mod command;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use vizassist_config::{config_dir, config_file_path, load_and_prepare, AssistConfig};
use vizassist_core::{AssistError, Catalog, ImageHandle};
use vizassist_media::{CameraDevice, MediaCapture, NoCamera, PreviewRegistry, StillFrameCamera};
use vizassist_tts::{ConsoleSynthesizer, SpeechFeedback, Voice, VoicePreference};
use vizassist_understanding::AnalysisClient;
use vizassist_workflow::WorkflowController;

use command::{Command, HELP};
use terminal_output::{note_error, note_info, note_success, note_warn, render_details, render_screen};

#[derive(Parser)]
#[command(name = "vizassist")]
#[command(about = "Visual assistance: read text, detect objects, describe scenes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.vizassist/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image served as the camera's live frame
    #[arg(long, value_name = "IMAGE")]
    camera_frame: Option<PathBuf>,

    /// Override the analysis service address
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let mut config = load_and_prepare(&path)
        .await
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(url) = &cli.base_url {
        config.service.base_url = Some(url.clone());
    }

    let log_dir = config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| config_dir().join("logs"));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let _guard = vizassist_logging::init_logger(&log_dir, config.logging.level());

    info!(
        config = %path.display(),
        base_url = %config.service.base_url(),
        language = %config.speech.language(),
        "Starting vizassist"
    );

    let catalog = Catalog::for_tag(config.speech.language());
    let client = Arc::new(
        AnalysisClient::new(config.service.base_url(), Some(config.service.timeout()))?
            .with_no_result_text(catalog.no_result()),
    );
    let speech = speech(&config);
    if !speech.is_available() {
        note_info("speech output is disabled; statuses are shown only");
    }
    let controller = Arc::new(WorkflowController::new(
        MediaCapture::new(camera(&cli)?),
        client.clone(),
        speech,
        catalog,
        PreviewRegistry::new(),
    ));

    run(controller, client).await
}

fn camera(cli: &Cli) -> Result<Arc<dyn CameraDevice>> {
    match &cli.camera_frame {
        Some(path) => Ok(Arc::new(StillFrameCamera::from_file(path)?)),
        None => Ok(Arc::new(NoCamera)),
    }
}

fn speech(config: &AssistConfig) -> SpeechFeedback {
    if !config.speech.enabled() {
        return SpeechFeedback::silent();
    }
    let preference = VoicePreference {
        language: config.speech.language().to_string(),
        fallback_locale: config.speech.fallback_locale().to_string(),
    };
    // The console "voice" speaks whatever locale was asked for.
    let synth = ConsoleSynthesizer::with_voices(vec![Voice::new(
        "console",
        config.speech.fallback_locale(),
    )]);
    SpeechFeedback::new(Arc::new(synth), preference)
}

async fn run(controller: Arc<WorkflowController>, client: Arc<AnalysisClient>) -> Result<()> {
    let mut screen = controller.subscribe();
    let color = terminal_output::supports_color();
    let watcher = tokio::spawn(async move {
        while screen.changed().await.is_ok() {
            let line = render_screen(&screen.borrow_and_update(), color);
            println!("{line}");
        }
    });

    note_info(&controller.snapshot().await.status);
    note_info("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                note_warn(&e);
                continue;
            }
        };
        match command {
            Command::Select(path) => match ImageHandle::load(&path).await {
                Ok(image) => controller.select_file(image).await,
                Err(e) => report(&e),
            },
            Command::Camera => {
                // Acquisition may wait on the device; keep reading input.
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller.open_camera().await;
                });
            }
            Command::Capture => {
                controller.capture().await;
            }
            Command::Retake => {
                controller.retake().await;
            }
            Command::Analyze(operation) => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller.run_analysis(operation).await;
                });
            }
            Command::Repeat => {
                controller.repeat_status().await;
            }
            Command::Status => println!("{}", render_details(&controller.snapshot().await)),
            Command::Health => match client.health().await {
                Ok(message) => note_success(&format!("{} answered: {message}", client.base_url())),
                Err(e) => {
                    error!(error = %e, "Health check failed");
                    report(&e);
                }
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    controller.shutdown().await;
    watcher.abort();
    info!("vizassist stopped");
    Ok(())
}

fn report(error: &AssistError) {
    note_error(&error.to_string());
    if error.is_retryable_by_user() {
        note_info("this may be temporary; try again");
    }
}
