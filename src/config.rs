// Configuration module: the command-line surface and the immutable run
// configuration built from it. Flags, defaults and help text mirror the
// analyzer server's client conventions.

use std::path::{Path, PathBuf};

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Command-line arguments for the batch client.
#[derive(Parser, Debug)]
#[command(name = "birdnet-cli")]
#[command(about = "Client that queries an analyzer API endpoint server.")]
#[command(version)]
pub struct Args {
    /// Host name or IP address of API endpoint server.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port of API endpoint server.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Path to directory with audio files to be analyzed.
    #[arg(long = "i", default_value = "example/")]
    pub input: PathBuf,

    /// Path to directory for saving result files. Leave blank to save with audio files.
    #[arg(long = "o", default_value = "", value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub output: PathBuf,

    /// Recording location latitude. Set -1 to ignore.
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub lat: f64,

    /// Recording location longitude. Set -1 to ignore.
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub lon: f64,

    /// Week of the year when the recording was made. Values in [1, 48]. Set -1 for year-round species list.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub week: i32,

    /// Overlap of prediction segments. Values in [0.0, 2.9]. Defaults to 0.0.
    #[arg(long, default_value_t = 0.0)]
    pub overlap: f64,

    /// Detection sensitivity; Higher values result in higher sensitivity. Values in [0.5, 1.5]. Defaults to 1.0.
    #[arg(long, default_value_t = 1.0)]
    pub sensitivity: f64,

    /// Score pooling mode. Values in ['avg', 'max']. Defaults to 'avg'.
    #[arg(long, value_enum, default_value_t = PoolingMode::Avg)]
    pub pmode: PoolingMode,

    /// Number of results per request. Defaults to 5.
    #[arg(long = "num_results", default_value_t = 5)]
    pub num_results: u32,

    /// Minimum species occurrence frequency threshold for location filter. Values in [0.01, 0.99]. Defaults to 0.03.
    #[arg(long = "sf_thresh", default_value_t = 0.03)]
    pub sf_thresh: f64,

    /// Define if files should be stored on server.
    #[arg(long)]
    pub save: bool,
}

/// Score pooling mode applied by the server when aggregating segment
/// predictions.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoolingMode {
    Avg,
    Max,
}

/// Recording context and detection tuning parameters sent alongside each
/// upload. Field names and order mirror the server's expectations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisMetadata {
    pub lat: f64,
    pub lon: f64,
    pub week: i32,
    pub overlap: f64,
    pub sensitivity: f64,
    pub sf_thresh: f64,
    pub pmode: PoolingMode,
    pub num_results: u32,
    pub save: bool,
}

/// Immutable run configuration. Constructed once from the parsed
/// arguments and passed by reference into the batch loop.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub input_dir: PathBuf,
    /// Explicit result directory; `None` when `--o` was left blank.
    pub output_dir: Option<PathBuf>,
    pub metadata: AnalysisMetadata,
}

impl RunConfig {
    /// Build the run configuration from parsed arguments. An empty `--o`
    /// means result files are saved with the audio files.
    pub fn from_args(args: Args) -> Self {
        let output_dir = if args.output.as_os_str().is_empty() {
            None
        } else {
            Some(args.output)
        };
        RunConfig {
            host: args.host,
            port: args.port,
            input_dir: args.input,
            output_dir,
            metadata: AnalysisMetadata {
                lat: args.lat,
                lon: args.lon,
                week: args.week,
                overlap: args.overlap,
                sensitivity: args.sensitivity,
                sf_thresh: args.sf_thresh,
                pmode: args.pmode,
                num_results: args.num_results,
                save: args.save,
            },
        }
    }

    /// Directory result files are written to: the explicit `--o` value
    /// when given, otherwise the input directory.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("birdnet-cli").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_the_documented_cli_surface() {
        let args = parse(&[]);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.port, 8080);
        assert_eq!(args.input, PathBuf::from("example/"));
        assert!(args.output.as_os_str().is_empty());
        assert_eq!(args.lat, -1.0);
        assert_eq!(args.lon, -1.0);
        assert_eq!(args.week, -1);
        assert_eq!(args.overlap, 0.0);
        assert_eq!(args.sensitivity, 1.0);
        assert_eq!(args.pmode, PoolingMode::Avg);
        assert_eq!(args.num_results, 5);
        assert_eq!(args.sf_thresh, 0.03);
        assert!(!args.save);
    }

    #[test]
    fn empty_output_falls_back_to_input_dir() {
        let config = RunConfig::from_args(parse(&["--i", "recordings"]));
        assert_eq!(config.output_dir(), Path::new("recordings"));

        let config = RunConfig::from_args(parse(&["--i", "recordings", "--o", "results"]));
        assert_eq!(config.output_dir(), Path::new("results"));
    }

    #[test]
    fn negative_coordinates_parse_as_values() {
        let args = parse(&["--lat", "42.5", "--lon", "-76.45", "--week", "4"]);
        assert_eq!(args.lat, 42.5);
        assert_eq!(args.lon, -76.45);
        assert_eq!(args.week, 4);
    }

    #[test]
    fn pmode_rejects_unknown_values() {
        let result = Args::try_parse_from(["birdnet-cli", "--pmode", "median"]);
        assert!(result.is_err());
    }

    #[test]
    fn metadata_serializes_to_the_wire_field_names() {
        let config = RunConfig::from_args(parse(&["--save", "--pmode", "max"]));
        let value = serde_json::to_value(&config.metadata).unwrap();
        assert_eq!(value["lat"], -1.0);
        assert_eq!(value["lon"], -1.0);
        assert_eq!(value["week"], -1);
        assert_eq!(value["overlap"], 0.0);
        assert_eq!(value["sensitivity"], 1.0);
        assert_eq!(value["sf_thresh"], 0.03);
        assert_eq!(value["pmode"], "max");
        assert_eq!(value["num_results"], 5);
        assert_eq!(value["save"], true);
    }
}
