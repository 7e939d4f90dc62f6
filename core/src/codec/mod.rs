//! Reading and writing the `data.js` file the benchmark dashboard loads.
//!
//! The file is a single JavaScript assignment,
//! `window.BENCHMARK_DATA = { ... }`, whose right-hand side is plain JSON.
//! Decoding also accepts a bare JSON object so history exported by other
//! tools can be imported directly.

pub mod error;


pub use error::{DecodeError, Position, offset_to_position};

use crate::model::BenchmarkData;
use anyhow::{Context, Result};

pub const DATA_PREFIX: &str = "window.BENCHMARK_DATA = ";
const DATA_BINDING: &str = "window.BENCHMARK_DATA";

pub fn decode(text: &str) -> Result<BenchmarkData, DecodeError> {
    let (body_start, body) = strip_wrapper(text)?;
    serde_json::from_str(body).map_err(|err| {
        let local = error::line_column_to_offset(body, err.line(), err.column());
        let position = offset_to_position(text, body_start + local);
        DecodeError::with_position(json_message(&err), position)
    })
}

pub fn encode(data: &BenchmarkData) -> Result<String> {
    let json = serde_json::to_string_pretty(data).context("serialize benchmark data")?;
    Ok(format!("{}{}", DATA_PREFIX, json))
}

/// Locate the JSON body inside the wrapper, returning its byte offset.
fn strip_wrapper(text: &str) -> Result<(usize, &str), DecodeError> {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let mut start = text.len() - trimmed.len();
    let mut rest = trimmed;

    if let Some(after_binding) = rest.strip_prefix(DATA_BINDING) {
        let after_ws = after_binding.trim_start();
        let Some(after_eq) = after_ws.strip_prefix('=') else {
            let offset = text.len() - after_ws.len();
            return Err(DecodeError::with_position(
                format!("expected '=' after {}", DATA_BINDING),
                offset_to_position(text, offset),
            ));
        };
        rest = after_eq.trim_start();
        start = text.len() - rest.len();
    } else if !rest.starts_with('{') {
        return Err(DecodeError::with_position(
            format!("expected `{}` or a JSON object", DATA_PREFIX.trim_end()),
            offset_to_position(text, start),
        ));
    }

    let body = rest.trim_end();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    if body.is_empty() {
        return Err(DecodeError::with_position(
            "missing benchmark data object",
            offset_to_position(text, start),
        ));
    }
    Ok((start, body))
}

fn json_message(err: &serde_json::Error) -> String {
    let full = err.to_string();
    match full.rsplit_once(" at line ") {
        Some((message, _)) => message.to_string(),
        None => full,
    }
}
