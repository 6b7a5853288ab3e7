use anyhow::{anyhow, Context, Result};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};

/// Loads a JSON array of `{date, open, high, low, close, volume}` objects.
pub fn load_candles_from_json(file_path: &str) -> Result<Vec<Candle>> {
    let file = File::open(file_path).with_context(|| format!("Failed to open JSON file '{}'", file_path))?;
    read_candles(BufReader::new(file))
}

pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let candles: Vec<Candle> = serde_json::from_reader(reader).context("Invalid candle JSON")?;
    for (idx, pair) in candles.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(anyhow!(
                "Dates must be strictly ascending: {} follows {} at index {}",
                pair[1].date,
                pair[0].date,
                idx + 1
            ));
        }
    }
    if let Some(idx) = candles.iter().position(|c| {
        ![c.open, c.high, c.low, c.close, c.volume].iter().all(|v| v.is_finite())
    }) {
        return Err(anyhow!("Non-finite value in candle at index {}", idx));
    }
    tracing::debug!(candles = candles.len(), "Parsed candles from JSON");
    Ok(candles)
}
