// Batch runner: walks the input directory, submits each audio file to
// the analyzer in sequence and saves every JSON response. The flow is
// strictly linear; the first failed file aborts the rest of the batch.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::RunConfig;

/// File name suffixes accepted for upload (case-sensitive).
const AUDIO_SUFFIXES: [&str; 2] = [".wav", ".mp3"];

/// Suffix replacing the audio file's final extension in its result file.
const RESULT_SUFFIX: &str = ".BirdNET.results.json";

/// List the audio files directly inside `input_dir`.
///
/// Only immediate entries are considered; names ending in `.wav` or
/// `.mp3` are kept and returned sorted lexicographically by file name.
pub fn list_candidates(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory {}", input_dir.display()))?;
    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in {}", input_dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if AUDIO_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Result file path for `audio_path` under `output_dir`: the base name
/// with only its final extension replaced, so `a.b.mp3` becomes
/// `a.b.BirdNET.results.json`.
pub fn result_path(output_dir: &Path, audio_path: &Path) -> PathBuf {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{RESULT_SUFFIX}"))
}

/// Write `data` to `dest` as UTF-8 JSON with 4-space indentation,
/// creating the destination directory as needed and overwriting any
/// existing file.
pub fn persist(data: &serde_json::Value, dest: &Path) -> Result<()> {
    if let Some(dir) = dest.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create output directory {}", dir.display())
            })?;
        }
    }
    let file = File::create(dest)
        .with_context(|| format!("Failed to create result file {}", dest.display()))?;
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(file, formatter);
    data.serialize(&mut ser)
        .with_context(|| format!("Failed to write result file {}", dest.display()))?;
    debug!(path = %dest.display(), "Saved analysis result");
    Ok(())
}

/// Process the whole batch described by `config`.
///
/// Candidates are submitted one at a time; each response is echoed to
/// stdout with the elapsed request time and then persisted. Results
/// already written stay on disk when a later file fails.
pub fn run(config: &RunConfig) -> Result<()> {
    let api = ApiClient::new(&config.host, config.port)?;
    let output_dir = config.output_dir();
    let candidates = list_candidates(&config.input_dir)?;
    debug!(count = candidates.len(), url = %api.url(), "Discovered audio files");

    for audio_path in &candidates {
        println!("Requesting analysis for {}", audio_path.display());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.set_message("Uploading...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let outcome = api.analyze(audio_path, &config.metadata);
        spinner.finish_and_clear();
        let (data, text, elapsed) = outcome?;

        println!("Response: {}, Time: {:.4}s", text, elapsed.as_secs_f64());
        let _ = io::stdout().flush();

        persist(&data, &result_path(output_dir, audio_path))?;
    }
    Ok(())
}
