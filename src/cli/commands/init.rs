use serde_json::json;

use crate::cli::config::{get_data_dir, open_context};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let data_dir = get_data_dir()?;
    let ctx = open_context()?;
    // Writes the current (possibly empty) documents so every key has a file
    ctx.close()?;

    output_success(
        &output_format,
        &format!("Initialized data directory at {}", data_dir.display()),
        Some(json!({ "data_dir": data_dir })),
    )
}
