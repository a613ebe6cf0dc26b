//! Writing a finished round to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::prompt::Theme;
use crate::session::Review;

/// Metadata saved next to the image
#[derive(Debug, Serialize)]
struct ReviewRecord<'a> {
    theme: &'a Theme,
    mode: String,
    width: u32,
    height: u32,
    saved_at: DateTime<Local>,
}

/// Save the sketch as `<stem>.ppm` plus a `<stem>.json` record of the prompt.
/// Returns the image path.
pub fn save_review(review: &Review, dir: &Path, saved_at: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let record = ReviewRecord {
        theme: &review.theme,
        mode: review.mode.to_string(),
        width: review.image.width,
        height: review.image.height,
        saved_at,
    };
    let json = serde_json::to_vec_pretty(&record)?;

    let stem = file_stem(&review.theme, saved_at);
    let image_path = dir.join(format!("{stem}.ppm"));
    fs::write(&image_path, review.image.encode_ppm())?;
    fs::write(dir.join(format!("{stem}.json")), json)?;

    tracing::info!(path = %image_path.display(), "sketch saved");
    Ok(image_path)
}

fn file_stem(theme: &Theme, saved_at: DateTime<Local>) -> String {
    let text: String = theme
        .full_text()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("ponchie-{}-{}", text, saved_at.format("%Y%m%d-%H%M%S"))
}
