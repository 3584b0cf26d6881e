//! CLI binary for pdf2ar.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `TranslationConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2ar::{
    suggested_output_name, translate, translate_to_file, TranslationConfig, ProgressCallback,
    TranslationProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a spinner with the elapsed timer and a live counter of
/// streamed characters.
struct SpinnerCallback {
    bar: ProgressBar,
}

impl SpinnerCallback {
    fn new() -> std::sync::Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style =
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Translating");
        bar.set_message("waiting for first fragment…");
        bar.enable_steady_tick(Duration::from_millis(80));
        std::sync::Arc::new(Self { bar })
    }
}

impl TranslationProgressCallback for SpinnerCallback {
    fn on_translation_start(&self, file_name: &str, file_bytes: u64) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Translating {file_name} ({} KB)…",
                file_bytes / 1024
            ))
        ));
    }

    fn on_fragment(&self, _fragment_bytes: usize, total_bytes: usize) {
        self.bar.set_message(format!("{total_bytes} bytes received"));
    }

    fn on_translation_complete(&self, total_bytes: usize, duration_ms: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} received in {:.1}s",
            green("✔"),
            bold(&format!("{total_bytes} bytes")),
            duration_ms as f64 / 1000.0
        );
    }

    fn on_translation_error(&self, message: String) {
        self.bar.finish_and_clear();
        // Truncate very long error messages to keep output tidy.
        let msg = if message.len() > 200 {
            format!("{}\u{2026}", &message[..199])
        } else {
            message
        };
        eprintln!("{} {}", red("✘"), red(&msg));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate to stdout
  pdf2ar paper.pdf

  # Write paper.ar.md next to the input
  pdf2ar paper.pdf --save

  # Explicit output path
  pdf2ar paper.pdf -o translated/paper.md

  # Use a specific model
  pdf2ar --model gemini-2.5-pro paper.pdf

  # Structured JSON result (markdown + stats)
  pdf2ar --json paper.pdf > result.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        API credential (required unless --api-key is given)
  PDF2AR_MODEL          Override the model ID
  PDF2AR_API_BASE       Override the API base URL (proxies, gateways)
  PDF2AR_MAX_SIZE_MB    Override the input size ceiling

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Translate:     pdf2ar document.pdf --save
"#;

/// Translate PDF documents to Arabic Markdown using a streaming generative model.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2ar",
    version,
    about = "Translate PDF documents to Arabic Markdown using a streaming generative model",
    long_about = "Send a PDF inline to a generative-language API and stream back an Arabic \
Markdown translation that preserves document structure, with Arabic placeholder \
descriptions for images and figures.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file to translate.
    input: String,

    /// Write the Markdown to this file instead of stdout.
    #[arg(short, long, env = "PDF2AR_OUTPUT", conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write next to the input file, named <stem>.ar.md.
    #[arg(long)]
    save: bool,

    /// Generative model ID.
    #[arg(long, env = "PDF2AR_MODEL", default_value = "gemini-2.5-flash")]
    model: String,

    /// API credential for the translation endpoint.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL (for proxies and self-hosted gateways).
    #[arg(long, env = "PDF2AR_API_BASE")]
    api_base: Option<String>,

    /// Maximum accepted file size in megabytes.
    #[arg(long, env = "PDF2AR_MAX_SIZE_MB", default_value_t = 200)]
    max_size_mb: u64,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "PDF2AR_PROMPT")]
    prompt: Option<PathBuf>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2AR_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Cap on generated tokens (provider default when omitted).
    #[arg(long, env = "PDF2AR_MAX_OUTPUT_TOKENS")]
    max_output_tokens: Option<u32>,

    /// Output structured JSON (TranslationOutput) instead of Markdown.
    #[arg(long, env = "PDF2AR_JSON")]
    json: bool,

    /// Disable the progress display.
    #[arg(long, env = "PDF2AR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2AR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2AR_QUIET")]
    quiet: bool,

    /// HTTP connect timeout in seconds.
    #[arg(long, env = "PDF2AR_CONNECT_TIMEOUT", default_value_t = 30)]
    connect_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(SpinnerCallback::new() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    // ── Resolve output target ────────────────────────────────────────────
    let out_path: Option<PathBuf> = if let Some(ref path) = cli.output {
        Some(path.clone())
    } else if cli.save {
        let input_path = Path::new(&cli.input);
        let Some(name) = input_path.file_name() else {
            bail!("Cannot derive an output name from '{}'", cli.input);
        };
        let artifact = suggested_output_name(&name.to_string_lossy(), &config.language_suffix);
        Some(match input_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(artifact),
            _ => PathBuf::from(artifact),
        })
    } else {
        None
    };

    // ── Run translation ──────────────────────────────────────────────────
    if let Some(ref out_path) = out_path {
        let stats = translate_to_file(&cli.input, out_path, &config)
            .await
            .context("Translation failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} fragments  {} chars  {}ms  →  {}",
                green("✔"),
                stats.fragments,
                stats.chars,
                stats.duration_ms,
                bold(&out_path.display().to_string()),
            );
        }
    } else {
        let output = translate(&cli.input, &config)
            .await
            .context("Translation failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "   {}  {}",
                dim(&format!("{} fragments / {} chars", output.stats.fragments, output.stats.chars)),
                dim(&format!("{}ms total", output.stats.duration_ms)),
            );
        }
    }

    Ok(())
}

/// Map CLI args to `TranslationConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let prompt = if let Some(ref path) = cli.prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = TranslationConfig::builder()
        .model(cli.model.clone())
        .max_file_bytes(cli.max_size_mb.saturating_mul(1024 * 1024))
        .temperature(cli.temperature)
        .connect_timeout_secs(cli.connect_timeout);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref base) = cli.api_base {
        builder = builder.api_base(base.clone());
    }
    if let Some(p) = prompt {
        builder = builder.prompt(p);
    }
    if let Some(n) = cli.max_output_tokens {
        builder = builder.max_output_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
