use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::ledger::{format_amount, MonthKey};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a listing: `rows` in text mode, `{collection_name: items, ...extra}` in JSON
pub fn output_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    items: Value,
    rows: Vec<String>,
    empty_message: &str,
    extra: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ collection_name: items });
            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), extra) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("{}", empty_message);
            }
            for row in rows {
                println!("{}", row);
            }
        }
    }
    Ok(())
}

/// Open the data directory and fail unless someone is logged in
pub fn open_authenticated() -> anyhow::Result<AppContext> {
    let ctx = crate::cli::config::open_context()?;
    ctx.require_session()
        .map_err(|e| anyhow::anyhow!("{}. Run `tracker auth login <email>` first.", e))?;
    Ok(ctx)
}

pub fn parse_id(input: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(input.trim()).map_err(|_| anyhow::anyhow!("'{}' is not a valid id", input))
}

/// `--month` if given, otherwise the current local month
pub fn resolve_month(month: Option<&str>) -> anyhow::Result<MonthKey> {
    match month {
        Some(text) => Ok(crate::ledger::input::parse_month(text)?),
        None => Ok(MonthKey::current()),
    }
}

pub fn money(value: Decimal) -> String {
    format!("${}", format_amount(value))
}
