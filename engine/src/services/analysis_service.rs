// Analysis service: load candles, compute the snapshot, score it.
mod calculate_indicator;

use serde::Serialize;
use std::path::Path;

use crate::config::EngineSettings;
use crate::data::{aggregate, load_candles_from_json, CsvCandleParser};
use crate::error::EngineError;
use crate::indicators::{compute, history_context};
use crate::scoring::score;
use shared::models::{Candle, HistoryContext, Indicator, IndicatorSnapshot, MarketData, Suggestion, TimeFrame};

/// The output object handed to the notifier / UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub snapshot: IndicatorSnapshot,
    pub suggestion: Suggestion,
    pub context: HistoryContext,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisService {
    settings: EngineSettings,
}

impl AnalysisService {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(AnalysisService { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Pure with respect to its inputs: same candles and flag, same output.
    pub fn analyze(&self, candles: &[Candle], has_position: bool) -> Analysis {
        let snapshot = compute(candles, &self.settings.indicators);
        if snapshot.is_empty() {
            tracing::debug!(candles = candles.len(), "Not enough history for any indicator");
        }
        let suggestion = score(&snapshot, has_position, &self.settings.scoring);
        let context = history_context(candles, &snapshot);
        Analysis { snapshot, suggestion, context }
    }

    pub fn analyze_market_data(&self, market_data: &MarketData, has_position: bool) -> Analysis {
        let analysis = self.analyze(&market_data.candles, has_position);
        tracing::info!(
            symbol = %market_data.symbol,
            timeframe = ?market_data.timeframe,
            candles = market_data.candles.len(),
            action = ?analysis.suggestion.action,
            score = analysis.suggestion.score,
            "Analysis complete"
        );
        analysis
    }

    /// Reads daily candles from a `.json` or CSV file and rolls them up to `timeframe`.
    pub fn load_candles(&self, path: impl AsRef<Path>, timeframe: TimeFrame) -> Result<Vec<Candle>, EngineError> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| EngineError::MarketDataError(format!("Path is not valid UTF-8: {}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let (loaded, map_err): (_, fn(anyhow::Error) -> EngineError) = if is_json {
            (load_candles_from_json(path_str), EngineError::from_loader)
        } else {
            (CsvCandleParser::load_candles_from_csv(path_str), EngineError::from_csv_loader)
        };
        let daily = loaded.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "Rejected candle file");
            map_err(e)
        })?;
        if daily.is_empty() {
            tracing::warn!(path = %path.display(), "Candle file has no rows");
        }

        let candles = aggregate(&daily, timeframe);
        tracing::debug!(path = %path.display(), ?timeframe, candles = candles.len(), "Loaded candles");
        Ok(candles)
    }

    /// A single named series for chart overlays, see `calculate_indicator::build`.
    pub fn calculate_indicator(&self, candles: &[Candle], kind: &str, params_json: &str) -> Result<Indicator, EngineError> {
        tracing::debug!(indicator_type = %kind, parameters = %params_json, "Calculating indicator series");
        if candles.is_empty() {
            tracing::warn!(indicator_type = %kind, "No candle data found to calculate indicator");
            return Err(EngineError::MarketDataError(format!(
                "No candle data to calculate indicator '{}'",
                kind
            )));
        }
        let calculator = calculate_indicator::build(kind, params_json, &self.settings.indicators)?;
        Ok(Indicator {
            name: calculator.name().to_string(),
            parameters: calculator.parameters(),
            values: calculator.calculate(candles),
        })
    }
}
