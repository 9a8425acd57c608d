//! CLI binary for base2img.
//!
//! A thin shim over the library crate that maps CLI flags to `DecodeConfig`,
//! reads the input, and prints and saves the results.

use anyhow::{bail, Context, Result};
use base2img::pipeline::input;
use base2img::{
    decode_text, save_outcomes, CodecKind, DecodeConfig, DecodeProgressCallback, DirectorySink,
    NoopProgressCallback, ProgressCallback, RunSummary,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
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

/// `1234567` → `1,234,567`.
fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the codec registry plus one
/// log line per codec.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len} codecs  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Decoding");
        Arc::new(Self { bar })
    }
}

impl DecodeProgressCallback for CliProgressCallback {
    fn on_decode_start(&self, normalized_chars: usize, codec_count: usize) {
        self.bar.set_length(codec_count as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Trying {codec_count} codecs on {} characters…",
                group_digits(normalized_chars)
            ))
        ));
    }

    fn on_codec_start(&self, codec: CodecKind) {
        self.bar.set_message(codec.name());
    }

    fn on_codec_match(&self, codec: CodecKind, format_tag: &str, byte_length: usize) {
        self.bar.println(format!(
            "  {} {:<7} {}  {}",
            green("✓"),
            codec.name().to_uppercase(),
            bold(&format_tag.to_uppercase()),
            dim(&format!("{} bytes", group_digits(byte_length))),
        ));
        self.bar.inc(1);
    }

    fn on_codec_reject(&self, codec: CodecKind, reason: &str) {
        let msg = if reason.chars().count() > 60 {
            let cut: String = reason.chars().take(59).collect();
            format!("{cut}\u{2026}")
        } else {
            reason.to_string()
        };
        self.bar.println(format!(
            "  {} {:<7} {}",
            red("✗"),
            codec.name().to_uppercase(),
            dim(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_codec_skipped(&self, codec: CodecKind) {
        self.bar.println(format!(
            "  {} {:<7} {}",
            cyan("–"),
            codec.name().to_uppercase(),
            dim("skipped: support not compiled in"),
        ));
        self.bar.inc(1);
    }

    fn on_decode_complete(&self, attempted: usize, matched: usize) {
        self.bar.finish_and_clear();
        if matched == 0 {
            eprintln!(
                "{} no image found after {} codec(s)",
                red("✘"),
                attempted
            );
        } else {
            eprintln!(
                "{} {} image(s) found after {} codec(s)",
                green("✔"),
                bold(&matched.to_string()),
                attempted
            );
        }
    }

    fn on_artifact_saved(&self, codec: CodecKind, path: &Path, byte_length: usize) {
        eprintln!(
            "  {} {:<7} → {}  {}",
            green("↳"),
            codec.name().to_uppercase(),
            bold(&path.display().to_string()),
            dim(&format!("{} bytes", group_digits(byte_length))),
        );
    }

    fn on_artifact_error(&self, codec: CodecKind, error: &str) {
        eprintln!(
            "  {} {:<7} {}",
            red("↳"),
            codec.name().to_uppercase(),
            red(error)
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Try every codec, save matches to ./decoded_images
  base2img blob.txt

  # Save somewhere else
  base2img blob.txt -o recovered/

  # Read from stdin, only report (nothing written)
  cat blob.txt | base2img - --no-save

  # Only try hex and base64
  base2img --codecs hex,base64 blob.txt

  # Machine-readable result
  base2img --json --no-save blob.txt > result.json

CODECS (tried in this order):
  base16   hex digits; odd length left-padded, then 0x / \x prefix stripped
  base32   RFC 4648, case-insensitive
  base64   RFC 4648 standard alphabet
  base85   Ascii85
  base91   basE91 (requires the `base91` build feature)

OUTPUT FILES:
  {codec}_{timestamp}{ext}, e.g. base64_20240309_140507.png
  Formats without a dedicated extension are saved as .bin.

ENVIRONMENT VARIABLES:
  BASE2IMG_OUTPUT        Output directory
  BASE2IMG_CODECS        Comma-separated codec list
  RUST_LOG               Log filter (overrides --verbose / --quiet)
"#;

/// Find the image hidden in encoded text.
#[derive(Parser, Debug)]
#[command(
    name = "base2img",
    version,
    about = "Find the image hidden in encoded text",
    long_about = "Try base16, base32, base64, base85 and base91 decodings of a text file and keep \
every decoding that is a complete, valid image (png, jpeg, gif, bmp, tiff, webp, …). \
All whitespace in the input is ignored.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Text file holding the encoded image, or `-` for stdin.
    input: String,

    /// Directory to write decoded images to.
    #[arg(short, long, env = "BASE2IMG_OUTPUT", default_value = "decoded_images")]
    output: PathBuf,

    /// Codecs to try: all, or a comma-separated list (base16/hex, base32,
    /// base64, base85/ascii85, base91).
    #[arg(long, env = "BASE2IMG_CODECS", default_value = "all")]
    codecs: String,

    /// Report matches without writing any file.
    #[arg(long, env = "BASE2IMG_NO_SAVE")]
    no_save: bool,

    /// chrono strftime pattern used in output filenames.
    #[arg(long, env = "BASE2IMG_TIMESTAMP_FORMAT", default_value = "%Y%m%d_%H%M%S")]
    timestamp_format: String,

    /// Refuse inputs larger than this many bytes.
    #[arg(long, env = "BASE2IMG_MAX_INPUT_BYTES", default_value_t = 64 * 1024 * 1024)]
    max_input_bytes: u64,

    /// Allocation cap, in bytes, for decoding a single candidate image.
    #[arg(long, env = "BASE2IMG_MAX_IMAGE_ALLOC")]
    max_image_alloc: Option<u64>,

    /// Output structured JSON (outcomes, attempts, saved files) on stdout.
    #[arg(long, env = "BASE2IMG_JSON")]
    json: bool,

    /// Disable progress output.
    #[arg(long, env = "BASE2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BASE2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BASE2IMG_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress display already reports every codec; keep library INFO
    // logs out of its way unless asked for.
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
        Some(CliProgressCallback::new() as Arc<dyn DecodeProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Read input ───────────────────────────────────────────────────────
    let text = if cli.input == "-" {
        read_stdin(config.max_input_bytes)?
    } else {
        input::read_text(&cli.input, config.max_input_bytes)
            .with_context(|| format!("Cannot read input '{}'", cli.input))?
    };

    // ── Decode ───────────────────────────────────────────────────────────
    let report = decode_text(&text, &config);

    // ── Save ─────────────────────────────────────────────────────────────
    let saved = if cli.no_save || report.outcomes.is_empty() {
        Vec::new()
    } else {
        let sink = DirectorySink::new(&config.output_dir, &config.timestamp_format)
            .context("Invalid output settings")?;
        let progress: &dyn DecodeProgressCallback = config
            .progress_callback
            .as_deref()
            .unwrap_or(&NoopProgressCallback);
        save_outcomes(&report.outcomes, &sink, progress)
    };
    let summary = RunSummary { report, saved };

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        print_summary(&summary);
        if !cli.quiet && !show_progress {
            eprintln!(
                "Tried {} codec(s) on {} characters in {}ms",
                summary.report.stats.attempted,
                summary.report.stats.normalized_chars,
                summary.report.stats.duration_ms
            );
        }
    }

    // No image found is a normal result, not a failure.
    Ok(())
}

/// Print one line per outcome on stdout: `1. BASE64 -> PNG (12,345 bytes)`.
fn print_summary(summary: &RunSummary) {
    for (i, outcome) in summary.report.outcomes.iter().enumerate() {
        let saved = summary
            .saved
            .iter()
            .find(|a| a.codec == outcome.codec)
            .and_then(|a| a.path.as_ref());
        let location = saved
            .map(|p| format!("  {}", p.display()))
            .unwrap_or_default();
        println!(
            "{}. {} -> {} ({} bytes){}",
            i + 1,
            outcome.codec_name().to_uppercase(),
            outcome.format_tag.to_uppercase(),
            group_digits(outcome.byte_length),
            location
        );
    }
}

/// Read stdin as UTF-8, refusing more than `max_bytes`.
fn read_stdin(max_bytes: u64) -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .take(max_bytes.saturating_add(1))
        .read_to_string(&mut text)
        .context("Failed to read stdin as UTF-8 text")?;
    if text.len() as u64 > max_bytes {
        bail!("stdin is larger than the {max_bytes}-byte limit; raise --max-input-bytes");
    }
    Ok(text)
}

/// Map CLI args to `DecodeConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DecodeConfig> {
    let mut builder = DecodeConfig::builder()
        .codecs(parse_codecs(&cli.codecs)?)
        .output_dir(cli.output.clone())
        .timestamp_format(cli.timestamp_format.clone())
        .max_input_bytes(cli.max_input_bytes);

    if let Some(limit) = cli.max_image_alloc {
        builder = builder.max_image_alloc(limit);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--codecs` into a codec list.
fn parse_codecs(s: &str) -> Result<Vec<CodecKind>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(CodecKind::ALL.to_vec());
    }
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<CodecKind>().map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }

    #[test]
    fn parses_codec_lists() {
        assert_eq!(parse_codecs("all").unwrap(), CodecKind::ALL);
        assert_eq!(
            parse_codecs("hex, base64").unwrap(),
            [CodecKind::Base16, CodecKind::Base64]
        );
        assert!(parse_codecs("base58").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
