use std::path::PathBuf;

use chrono::Local;

/// Default filename prefix for filtered output files
pub const DEFAULT_OUTPUT_PREFIX: &str = "filtered_";

/// Build a timestamped output path in the system temp directory,
/// e.g. `/tmp/filtered_250807_153012.log`
pub fn timestamped_output_path(prefix: &str) -> PathBuf {
    let stamp = Local::now().format("%y%m%d_%H%M%S");
    std::env::temp_dir().join(format!("{prefix}{stamp}.log"))
}
