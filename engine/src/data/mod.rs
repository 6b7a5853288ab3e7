// Candle loaders (CSV / JSON) and interval aggregation.
pub mod aggregate;
pub mod csv_parser;
pub mod json_loader;

pub use aggregate::aggregate;
pub use csv_parser::CsvCandleParser;
pub use json_loader::load_candles_from_json;
