use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};

// Dates are ISO (`2024-01-31`); a compact `20240131` form is also accepted.
pub mod daily_format {
    use anyhow::{anyhow, Result};
    use chrono::NaiveDate;
    use std::str::FromStr;

    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

    pub fn parse_number(s: &str) -> Result<f64> {
        let value = f64::from_str(s.trim()).map_err(|e| anyhow!("Failed to parse number '{}': {}", s, e))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(anyhow!("Non-finite number '{}'", s))
        }
    }

}

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvCandleParser;

impl CsvCandleParser {
    // CSV Header: date,open,high,low,close,volume (any column order, extra columns ignored)
    // Example Row: 2024-01-02,10.12,10.40,10.05,10.33,1523400
    pub fn load_candles_from_csv(file_path: &str) -> Result<Vec<Candle>> {
        let file = File::open(file_path).with_context(|| format!("Failed to open CSV file '{}'", file_path))?;
        Self::read_candles(BufReader::new(file))
    }

    pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if let Some(missing) = COLUMNS.iter().find(|name| !headers.iter().any(|h| h.eq_ignore_ascii_case(name))) {
            return Err(anyhow!("Missing '{}' column in CSV header", missing));
        }

        let mut candles = Vec::new();
        let mut previous: Option<NaiveDate> = None;
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let date_str = Self::required(&record, &headers, "date", line)?;
            let date = daily_format::parse_date(date_str)
                .map_err(|e| anyhow!("Error parsing 'date' at line {}: {}", line, e))?;
            if previous.is_some_and(|p| date <= p) {
                return Err(anyhow!("Dates must be strictly ascending: '{}' at line {}", date_str, line));
            }
            previous = Some(date);

            let number = |name: &str| -> Result<f64> {
                let raw = Self::required(&record, &headers, name, line)?;
                daily_format::parse_number(raw).map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
            };

            candles.push(Candle {
                date,
                open: number("open")?,
                high: number("high")?,
                low: number("low")?,
                close: number("close")?,
                volume: number("volume")?,
            });
        }
        tracing::debug!(candles = candles.len(), "Parsed candles from CSV");
        Ok(candles)
    }

    fn required<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    // Looks a field up by header name, case-insensitively.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_candles_from_csv_valid_data() {
        let csv_content = "\
date,open,high,low,close,volume
2024-01-02,10.12,10.40,10.05,10.33,1523400
2024-01-03,10.30,10.52,10.21,10.48,1730000";
        let tmp_file = create_test_csv(csv_content);
        let candles = CsvCandleParser::load_candles_from_csv(tmp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(candles[0].open, 10.12);
        assert_eq!(candles[0].high, 10.40);
        assert_eq!(candles[0].low, 10.05);
        assert_eq!(candles[0].close, 10.33);
        assert_eq!(candles[0].volume, 1523400.0);
        assert_eq!(candles[1].close, 10.48);
    }

    #[test]
    fn test_columns_by_name_in_any_order() {
        let csv_content = "\
Volume,Close,Low,High,Open,Date,code
900,2.5,2.4,2.6,2.45,2024-02-01,600000";
        let candles = CsvCandleParser::read_candles(csv_content.as_bytes()).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, 2.45);
        assert_eq!(candles[0].volume, 900.0);
    }

    #[test]
    fn test_load_candles_from_csv_empty_file() {
        let tmp_file = create_test_csv("date,open,high,low,close,volume");
        let candles = CsvCandleParser::load_candles_from_csv(tmp_file.path().to_str().unwrap()).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let csv_content = "\
date,open,high,low,close
2024-01-02,10.12,10.40,10.05,10.33";
        let err = CsvCandleParser::read_candles(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing 'volume' column"));
    }

    #[test]
    fn test_invalid_data_format() {
        let csv_content = "\
date,open,high,low,close,volume
2024-01-02,invalid,10.40,10.05,10.33,100";
        let err = CsvCandleParser::read_candles(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'open' at line 2"));
    }

    #[test]
    fn test_rejects_out_of_order_dates() {
        let csv_content = "\
date,open,high,low,close,volume
2024-01-03,1,1,1,1,1
2024-01-02,1,1,1,1,1";
        let err = CsvCandleParser::read_candles(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn test_missing_file_keeps_io_error() {
        let err = CsvCandleParser::load_candles_from_csv("/nonexistent/candles.csv").unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
