//! Decode entry points.
//!
//! [`decode_candidates`] is the core: raw text in, image outcomes out, no
//! side effects. The other entry points wrap it with the collaborators a
//! complete run needs (reading the input file, observing progress, saving
//! matches) without changing which outcomes are produced.

use crate::config::DecodeConfig;
use crate::error::Base2ImgError;
use crate::output::{
    AttemptStatus, CodecAttempt, DecodeOutcome, DecodeReport, DecodeStats, RunSummary,
    SavedArtifact,
};
use crate::pipeline::classify::{Classifier, ImageClassifier};
use crate::pipeline::codecs::CodecRegistry;
use crate::pipeline::input;
use crate::pipeline::normalize::normalize;
use crate::progress::{DecodeProgressCallback, NoopProgressCallback};
use crate::sink::{ArtifactSink, DirectorySink};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Try every codec on `raw_text` and return the decodings that are images.
///
/// This is the primary entry point for the library. Outcomes are in registry
/// order (base16, base32, base64, base85, base91). An empty result means no
/// image was found; it is not an error. Never panics on any input.
///
/// # Example
/// ```rust
/// let outcomes = base2img::decode_candidates("  \n\t ");
/// assert!(outcomes.is_empty());
/// ```
pub fn decode_candidates(raw_text: &str) -> Vec<DecodeOutcome> {
    run_pipeline(
        raw_text,
        CodecRegistry::standard(),
        &ImageClassifier::new(),
        &NoopProgressCallback,
    )
    .outcomes
}

/// Decode `raw_text` with the codecs, limits and callback in `config`.
///
/// Returns the full [`DecodeReport`]: outcomes plus one attempt record per
/// codec and run statistics.
pub fn decode_text(raw_text: &str, config: &DecodeConfig) -> DecodeReport {
    let registry = CodecRegistry::standard().select(&config.codecs);
    let classifier = match config.max_image_alloc {
        Some(limit) => ImageClassifier::with_max_alloc(limit),
        None => ImageClassifier::new(),
    };
    run_pipeline(raw_text, &registry, &classifier, progress_of(config))
}

/// Read `path` and decode its contents.
///
/// # Errors
/// Only input errors are fatal: missing or unreadable file, non-UTF-8
/// content, or a file above `config.max_input_bytes`.
pub fn decode_file(
    path: impl AsRef<Path>,
    config: &DecodeConfig,
) -> Result<DecodeReport, Base2ImgError> {
    let path = path.as_ref();
    info!("Decoding {}", path.display());
    let text = input::read_text(path, config.max_input_bytes)?;
    Ok(decode_text(&text, config))
}

/// Read `path`, decode it, and write every match into `config.output_dir`.
///
/// Write failures are recorded per artifact in the returned summary; they
/// never fail the run.
pub fn decode_file_to_dir(
    path: impl AsRef<Path>,
    config: &DecodeConfig,
) -> Result<RunSummary, Base2ImgError> {
    let sink = DirectorySink::new(&config.output_dir, &config.timestamp_format)?;
    let report = decode_file(path, config)?;
    let saved = save_outcomes(&report.outcomes, &sink, progress_of(config));
    Ok(RunSummary { report, saved })
}

/// Persist each outcome through `sink`, independently.
pub fn save_outcomes(
    outcomes: &[DecodeOutcome],
    sink: &dyn ArtifactSink,
    progress: &dyn DecodeProgressCallback,
) -> Vec<SavedArtifact> {
    outcomes
        .iter()
        .map(|outcome| match sink.persist(outcome) {
            Ok(path) => {
                info!(
                    "Saved {} image from {} ({} bytes) to {}",
                    outcome.format_tag,
                    outcome.codec,
                    outcome.byte_length,
                    path.display()
                );
                progress.on_artifact_saved(outcome.codec, &path, outcome.byte_length);
                SavedArtifact {
                    codec: outcome.codec,
                    format_tag: outcome.format_tag.clone(),
                    byte_length: outcome.byte_length,
                    path: Some(path),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Failed to save {} image: {}", outcome.codec, e);
                progress.on_artifact_error(outcome.codec, &e.to_string());
                SavedArtifact {
                    codec: outcome.codec,
                    format_tag: outcome.format_tag.clone(),
                    byte_length: outcome.byte_length,
                    path: None,
                    error: Some(e),
                }
            }
        })
        .collect()
}

/// The decode pipeline with every collaborator supplied by the caller.
///
/// Normalizes `raw_text`, then visits `registry` in order: unavailable codecs
/// are recorded as skipped, the rest decode and every decoded buffer goes
/// through `classifier`. If the text normalizes to nothing, no codec runs,
/// `attempts` is empty and only `on_decode_complete(0, 0)` is reported.
pub fn run_pipeline(
    raw_text: &str,
    registry: &CodecRegistry,
    classifier: &dyn Classifier,
    progress: &dyn DecodeProgressCallback,
) -> DecodeReport {
    let start = Instant::now();

    // ── Step 1: Normalize ────────────────────────────────────────────────
    let normalized = normalize(raw_text);
    let mut stats = DecodeStats {
        raw_chars: raw_text.chars().count(),
        normalized_chars: normalized.chars().count(),
        ..Default::default()
    };
    if normalized.is_empty() {
        debug!("Input is empty after whitespace removal; no codec attempted");
        progress.on_decode_complete(0, 0);
        stats.duration_ms = start.elapsed().as_millis() as u64;
        return DecodeReport {
            stats,
            ..Default::default()
        };
    }

    info!(
        "Trying {} codecs on {} characters",
        registry.len(),
        stats.normalized_chars
    );
    progress.on_decode_start(stats.normalized_chars, registry.len());

    // ── Step 2: Decode and classify, in registry order ───────────────────
    let mut outcomes = Vec::new();
    let mut attempts = Vec::with_capacity(registry.len());

    for descriptor in registry.iter() {
        let codec = descriptor.kind();

        if !descriptor.is_available() {
            warn!("{} support is not compiled in; skipping", codec);
            progress.on_codec_skipped(codec);
            attempts.push(CodecAttempt {
                codec,
                status: AttemptStatus::Skipped,
            });
            continue;
        }

        progress.on_codec_start(codec);
        let status = match descriptor.decode(&normalized) {
            Err(error) => {
                debug!("{}: {}", codec, error);
                progress.on_codec_reject(codec, &error.to_string());
                AttemptStatus::Failed { error }
            }
            Ok(bytes) => {
                let byte_length = bytes.len();
                let verdict = classifier.classify(&bytes);
                if verdict.is_valid_image {
                    let format_tag = verdict
                        .format_tag
                        .unwrap_or_else(|| "unknown".to_string());
                    info!(
                        "{} decoded a {} image ({} bytes)",
                        codec, format_tag, byte_length
                    );
                    progress.on_codec_match(codec, &format_tag, byte_length);
                    outcomes.push(DecodeOutcome {
                        codec,
                        format_tag: format_tag.clone(),
                        byte_length,
                        bytes,
                    });
                    AttemptStatus::Matched {
                        format_tag,
                        byte_length,
                    }
                } else {
                    debug!("{}: {} bytes, not an image", codec, byte_length);
                    progress.on_codec_reject(
                        codec,
                        &format!("decoded {byte_length} bytes, not a valid image"),
                    );
                    AttemptStatus::NotAnImage { byte_length }
                }
            }
        };
        attempts.push(CodecAttempt { codec, status });
    }

    // ── Step 3: Stats ────────────────────────────────────────────────────
    stats.attempted = attempts.iter().filter(|a| a.was_attempted()).count();
    stats.skipped = attempts.len() - stats.attempted;
    stats.matched = outcomes.len();
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Decode complete: {} image(s) from {} codec(s) in {}ms",
        stats.matched, stats.attempted, stats.duration_ms
    );
    progress.on_decode_complete(stats.attempted, stats.matched);

    DecodeReport {
        outcomes,
        attempts,
        stats,
    }
}

fn progress_of(config: &DecodeConfig) -> &dyn DecodeProgressCallback {
    config
        .progress_callback
        .as_deref()
        .unwrap_or(&NoopProgressCallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use crate::pipeline::classify::Classification;
    use crate::pipeline::codecs::{Capabilities, CodecKind};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Treats every non-empty buffer as an image.
    struct AcceptAll;

    impl Classifier for AcceptAll {
        fn classify(&self, bytes: &[u8]) -> Classification {
            if bytes.is_empty() {
                Classification::rejected()
            } else {
                Classification::image("raw")
            }
        }
    }

    #[derive(Default)]
    struct CountingClassifier {
        calls: AtomicUsize,
    }

    impl Classifier for CountingClassifier {
        fn classify(&self, _bytes: &[u8]) -> Classification {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Classification::rejected()
        }
    }

    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl DecodeProgressCallback for EventLog {
        fn on_codec_start(&self, codec: CodecKind) {
            self.events.lock().unwrap().push(format!("start {codec}"));
        }

        fn on_codec_match(&self, codec: CodecKind, _format_tag: &str, _byte_length: usize) {
            self.events.lock().unwrap().push(format!("match {codec}"));
        }

        fn on_codec_skipped(&self, codec: CodecKind) {
            self.events.lock().unwrap().push(format!("skip {codec}"));
        }

        fn on_decode_complete(&self, attempted: usize, matched: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {attempted}/{matched}"));
        }
    }

    fn no_base91() -> CodecRegistry {
        CodecRegistry::with_capabilities(Capabilities { base91: false })
    }

    #[test]
    fn blank_input_attempts_nothing() {
        let classifier = CountingClassifier::default();
        let log = EventLog::default();
        let report = run_pipeline(" \r\n\t ", CodecRegistry::standard(), &classifier, &log);

        assert!(report.outcomes.is_empty());
        assert!(report.attempts.is_empty());
        assert_eq!(report.stats.attempted, 0);
        assert_eq!(report.stats.raw_chars, 5);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        // the run still completes, so observers can tear down
        assert_eq!(*log.events.lock().unwrap(), ["done 0/0"]);
    }

    #[test]
    fn every_valid_decoding_is_reported_in_registry_order() {
        // valid base32 (case-folded) and base64; 'v' is outside hex and Ascii85
        let report = run_pipeline("vvvvvvvv", &no_base91(), &AcceptAll, &NoopProgressCallback);

        let codecs: Vec<_> = report.outcomes.iter().map(|o| o.codec).collect();
        assert_eq!(codecs, [CodecKind::Base32, CodecKind::Base64]);
        assert_eq!(report.outcomes[0].byte_length, 5);
        assert_eq!(report.outcomes[1].byte_length, 6);
        assert_eq!(report.stats.matched, 2);
    }

    #[test]
    fn unavailable_codec_is_skipped_not_failed() {
        let log = EventLog::default();
        let report = run_pipeline("vvvvvvvv", &no_base91(), &AcceptAll, &log);

        let last = report.attempts.last().unwrap();
        assert_eq!(last.codec, CodecKind::Base91);
        assert_eq!(last.status, AttemptStatus::Skipped);
        assert_eq!(report.stats.attempted, 4);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.skipped().collect::<Vec<_>>(), [CodecKind::Base91]);

        let events = log.events.lock().unwrap();
        assert!(events.contains(&"skip base91".to_string()));
        assert!(!events.contains(&"start base91".to_string()));
        assert_eq!(events.last().unwrap(), "done 4/2");
    }

    #[test]
    fn failures_are_recorded_per_codec() {
        let report = run_pipeline("zz!!", &no_base91(), &AcceptAll, &NoopProgressCallback);

        let base16 = &report.attempts[0];
        assert!(matches!(
            base16.status,
            AttemptStatus::Failed {
                error: crate::error::CodecError::InvalidCharacter { ch: 'z', offset: 0 }
            }
        ));
        // base85 accepts it: "zz" is eight zero bytes, "!!" one more
        assert!(matches!(
            report.attempts[3].status,
            AttemptStatus::Matched { byte_length: 9, .. }
        ));
    }

    #[test]
    fn rejected_decodings_are_not_outcomes() {
        let classifier = CountingClassifier::default();
        let report = run_pipeline("Zm9vYmFy", &no_base91(), &classifier, &NoopProgressCallback);

        assert!(report.outcomes.is_empty());
        assert!(report
            .attempts
            .iter()
            .any(|a| a.codec == CodecKind::Base64
                && a.status == AttemptStatus::NotAnImage { byte_length: 6 }));
        assert_eq!(
            classifier.calls.load(Ordering::SeqCst),
            report
                .attempts
                .iter()
                .filter(|a| matches!(a.status, AttemptStatus::NotAnImage { .. }))
                .count()
        );
    }

    #[test]
    fn run_is_idempotent() {
        let a = run_pipeline("vvvv vvvv", &no_base91(), &AcceptAll, &NoopProgressCallback);
        let b = run_pipeline("vvvv vvvv", &no_base91(), &AcceptAll, &NoopProgressCallback);
        assert_eq!(a.outcomes, b.outcomes);
        assert_eq!(a.attempts, b.attempts);
    }

    #[test]
    fn config_codec_selection_limits_attempts() {
        let config = DecodeConfig::builder()
            .codecs([CodecKind::Base64])
            .build()
            .unwrap();
        let report = decode_text("Zm9vYmFy", &config);
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.attempts[0].codec, CodecKind::Base64);
    }

    struct FlakySink;

    impl ArtifactSink for FlakySink {
        fn persist(&self, outcome: &DecodeOutcome) -> Result<PathBuf, PersistError> {
            match outcome.codec {
                CodecKind::Base32 => Err(PersistError::WriteFailed {
                    path: PathBuf::from("base32.bin"),
                    detail: "disk full".into(),
                }),
                other => Ok(PathBuf::from(format!("{other}.bin"))),
            }
        }
    }

    #[test]
    fn one_failed_save_does_not_block_others() {
        let outcomes: Vec<_> = [CodecKind::Base32, CodecKind::Base64]
            .into_iter()
            .map(|codec| DecodeOutcome {
                codec,
                format_tag: "png".into(),
                byte_length: 1,
                bytes: vec![0],
            })
            .collect();

        let saved = save_outcomes(&outcomes, &FlakySink, &NoopProgressCallback);

        assert_eq!(saved.len(), 2);
        assert!(!saved[0].is_saved());
        assert!(saved[0].error.is_some());
        assert_eq!(saved[1].path, Some(PathBuf::from("base64.bin")));
    }
}
