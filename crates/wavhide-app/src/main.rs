#![warn(missing_docs)]
//! # wavhide binary
//!
//! Terminal front end: hides messages in WAV files and extracts them through
//! the remote steganography service.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use wavhide_app::artifacts::{check_health, fetch_artifact, fetch_plot, save_artifact};
use wavhide_app::config::{ClientConfig, ConfigOverrides, resolve_from_env};
use wavhide_app::logging::init_tracing;
use wavhide_app::orchestrator::Orchestrator;
use wavhide_app::{APP_VERSION, AppError, today};
use wavhide_clipboard::select_clipboard;
use wavhide_core::{
    DecodeResult, ErrorReport, OperationKind, RawFormInput, SelectedFile, SuccessReport,
};
use wavhide_transport::HttpTransport;
use wavhide_ui::progress::{ProgressIndicator, TerminalProgress};
use wavhide_ui::{RenderContext, ResultView, ServiceLinks, paint};

/// Exit code when an extraction completed but recovered nothing.
const EXIT_NOTHING_RECOVERED: u8 = 2;

#[derive(Parser)]
#[command(name = "wavhide", version = APP_VERSION)]
#[command(about = "Hide text messages inside WAV audio files through a steganography service")]
struct Cli {
    /// Service base URL (overrides WAVHIDE_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Seconds before the progress line warns about a slow operation; 0 disables
    #[arg(long, global = true)]
    soft_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hide a message inside a WAV file
    Hide {
        /// Carrier WAV file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Message to hide
        #[arg(short, long, default_value = "")]
        message: String,

        /// Use the sequential embedding strategy
        #[arg(long)]
        sequential: bool,

        /// Download name for the produced audio (".wav" is enforced)
        #[arg(long)]
        output_name: Option<String>,

        /// Directory to save the produced audio into
        #[arg(long)]
        save: Option<PathBuf>,

        /// Directory to save the diagnostic plots into
        #[arg(long)]
        save_plots: Option<PathBuf>,

        /// Copy the key id to the clipboard
        #[arg(long)]
        copy_key: bool,

        /// Open the audio player and show its streaming link
        #[arg(long)]
        play: bool,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Extract a hidden message from a WAV file
    ///
    /// Exits with status 2 when the service found no message.
    Extract {
        /// WAV file carrying the message
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Key id printed by `hide`
        #[arg(short, long, default_value = "")]
        key_id: String,

        /// Use the sequential extraction strategy
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Download a previously produced audio file
    Download {
        /// Key id (server file id)
        file_id: String,

        /// Local file name (".wav" is enforced)
        #[arg(long, default_value = "")]
        name: String,

        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Download one diagnostic plot
    Plot {
        /// Plot file name as reported by `hide`
        filename: String,

        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Check that the service is up
    Health,
}

#[derive(clap::Args)]
struct DisplayArgs {
    /// Print the outcome as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Expand technical error details
    #[arg(long)]
    details: bool,
}

/// CLI entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            error!(%error, "command failed");
            eprintln!("wavhide: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let config = resolve_from_env(ConfigOverrides {
        server_url: cli.server,
        soft_timeout_secs: cli.soft_timeout_secs,
    })?;
    info!(server = %config.server_url, version = APP_VERSION, "starting");
    let transport = HttpTransport::new(config.server_url.as_str())?;

    match cli.command {
        Command::Hide {
            file,
            message,
            sequential,
            output_name,
            save,
            save_plots,
            copy_key,
            play,
            display,
        } => {
            let input = RawFormInput {
                operation: OperationKind::Encode,
                file: read_selected(file.as_deref())?,
                message,
                key_id: String::new(),
                sequential,
            };
            let outcome = orchestrator(&config, transport.clone()).run(input).await;
            let mut view = present(&outcome, &config, &display);
            if let Some(panel) = view.download.as_mut() {
                if let Some(name) = output_name.as_deref() {
                    panel.rename(name);
                }
                if play {
                    panel.toggle_playback();
                }
            }

            if !display.json {
                print!("{}", paint(&view));
            }
            if copy_key {
                if let Some(key) = &view.key_id {
                    let mut clipboard = select_clipboard();
                    eprintln!("{}", key.copy_to(clipboard.as_mut()));
                }
            }
            if let (Some(dir), Some(panel)) = (save.as_deref(), view.download.as_ref()) {
                let (name, bytes) =
                    fetch_artifact(&transport, panel.file_id(), panel.filename()).await?;
                let path = save_artifact(dir, &name, &bytes)?;
                eprintln!("Audio guardado en {}", path.display());
            }
            if let (Some(dir), Some(plots)) = (save_plots.as_deref(), view.plots.take()) {
                for entry in &plots.entries {
                    let bytes = fetch_plot(&transport, &entry.filename).await?;
                    let path = save_artifact(dir, &entry.filename, &bytes)?;
                    eprintln!("{} guardado en {}", entry.title, path.display());
                }
            }

            Ok(exit_code(&outcome))
        }
        Command::Extract {
            file,
            key_id,
            sequential,
            display,
        } => {
            let input = RawFormInput {
                operation: OperationKind::Decode,
                file: read_selected(file.as_deref())?,
                message: String::new(),
                key_id,
                sequential,
            };
            let outcome = orchestrator(&config, transport).run(input).await;
            let view = present(&outcome, &config, &display);
            if !display.json {
                print!("{}", paint(&view));
            }
            Ok(exit_code(&outcome))
        }
        Command::Download {
            file_id,
            name,
            output,
        } => {
            let name = if name.trim().is_empty() {
                wavhide_ui::format::default_download_filename(today())
            } else {
                name
            };
            let (name, bytes) = fetch_artifact(&transport, &file_id, &name).await?;
            let path = save_artifact(&output, &name, &bytes)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Plot { filename, output } => {
            let bytes = fetch_plot(&transport, &filename).await?;
            let path = save_artifact(&output, &filename, &bytes)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            let health = check_health(&transport).await?;
            match health.timestamp {
                Some(timestamp) => println!("{} ({timestamp})", health.status),
                None => println!("{}", health.status),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn orchestrator(config: &ClientConfig, transport: HttpTransport) -> Orchestrator<HttpTransport> {
    let progress = ProgressIndicator::new(Arc::new(TerminalProgress))
        .with_soft_timeout(config.soft_timeout_option());
    Orchestrator::new(transport, progress)
}

fn read_selected(path: Option<&Path>) -> Result<Option<SelectedFile>, AppError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Some(SelectedFile::new(name, bytes)))
}

fn present(
    outcome: &Result<SuccessReport, ErrorReport>,
    config: &ClientConfig,
    display: &DisplayArgs,
) -> ResultView {
    if display.json {
        let rendered = match outcome {
            Ok(report) => serde_json::to_string_pretty(report),
            Err(report) => serde_json::to_string_pretty(report),
        };
        match rendered {
            Ok(json) => println!("{json}"),
            Err(error) => error!(%error, "failed to serialize outcome"),
        }
    }

    let mut view = ResultView::new();
    view.render(
        outcome,
        &RenderContext {
            links: ServiceLinks::new(config.server_url.clone()),
            today: today(),
        },
    );
    if display.details {
        if let Some(panel) = view.error.as_mut() {
            panel.toggle_technical();
        }
    }
    view
}

fn exit_code(outcome: &Result<SuccessReport, ErrorReport>) -> ExitCode {
    match outcome {
        Ok(SuccessReport::Decode(report)) if report.result == DecodeResult::NothingRecovered => {
            ExitCode::from(EXIT_NOTHING_RECOVERED)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
