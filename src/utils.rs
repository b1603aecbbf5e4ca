//! Utility functions for string cleanup and file system operations.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Strip the `[`, `]` and `'` characters a list-coerced title drags along.
///
/// Advisory titles pass through a couple of regex captures on the way here
/// and can arrive wrapped in list punctuation; everything else is preserved
/// in order.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_word("['kernel']"), "kernel");
/// ```
pub fn clean_word(word: &str) -> String {
    word.replace(['[', ']', '\''], "")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
