// Named indicator series for chart overlays.
use serde_json::Value;

use crate::config::{BollParams, IndicatorSettings, MacdParams};
use crate::error::EngineError;
use crate::indicators::{BollLine, Bollinger, Ema, IndicatorCalculator, Macd, MacdLine, Rsi, Sma};

fn period(params: &Value, default: usize) -> Result<usize, EngineError> {
    let value = usize_param(params, "period", default);
    if value == 0 {
        return Err(EngineError::IndicatorError("Indicator period cannot be 0".to_string()));
    }
    Ok(value)
}

fn usize_param(params: &Value, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

fn macd_params(params: &Value, defaults: &MacdParams) -> Result<MacdParams, EngineError> {
    let macd = MacdParams {
        fast: usize_param(params, "fast", defaults.fast),
        slow: usize_param(params, "slow", defaults.slow),
        signal: usize_param(params, "signal", defaults.signal),
        cross_lookback: defaults.cross_lookback,
    };
    if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
        return Err(EngineError::IndicatorError("MACD periods cannot be 0".to_string()));
    }
    Ok(macd)
}

fn boll_params(params: &Value, defaults: &BollParams) -> Result<BollParams, EngineError> {
    let k = params.get("k").and_then(Value::as_f64).unwrap_or(defaults.k);
    if !k.is_finite() || k < 0.0 {
        return Err(EngineError::IndicatorError(format!("Invalid Bollinger width multiplier: {}", k)));
    }
    Ok(BollParams { period: period(params, defaults.period)?, k })
}

/// Kinds: sma, ema, rsi, macd, macd_signal, macd_hist, boll_upper, boll_mid, boll_lower.
/// Missing parameters fall back to the engine settings (20 for sma / ema).
pub(super) fn build(
    kind: &str,
    params_json: &str,
    settings: &IndicatorSettings,
) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    let params: Value = if params_json.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(params_json).map_err(|e| {
            tracing::error!(indicator_type = %kind, parameters = %params_json, error_detail = ?e, "Invalid JSON parameters for indicator");
            EngineError::ProcessingError(format!("Invalid JSON parameters for indicator '{}': {}", kind, e))
        })?
    };

    let calculator: Box<dyn IndicatorCalculator> = match kind.to_lowercase().as_str() {
        "sma" | "ma" => Box::new(Sma::new(period(&params, 20)?)),
        "ema" => Box::new(Ema::new(period(&params, 20)?)),
        "rsi" => Box::new(Rsi::new(period(&params, settings.rsi.period)?)),
        "macd" => Box::new(Macd::new(macd_params(&params, &settings.macd)?, MacdLine::Macd)),
        "macd_signal" => Box::new(Macd::new(macd_params(&params, &settings.macd)?, MacdLine::Signal)),
        "macd_hist" => Box::new(Macd::new(macd_params(&params, &settings.macd)?, MacdLine::Histogram)),
        "boll_upper" => Box::new(Bollinger::new(boll_params(&params, &settings.boll)?, BollLine::Upper)),
        "boll_mid" => Box::new(Bollinger::new(boll_params(&params, &settings.boll)?, BollLine::Mid)),
        "boll_lower" => Box::new(Bollinger::new(boll_params(&params, &settings.boll)?, BollLine::Lower)),
        _ => {
            tracing::error!(indicator_type = %kind, "Unknown indicator type requested");
            return Err(EngineError::IndicatorError(format!("Unknown indicator type: {}", kind)));
        }
    };
    Ok(calculator)
}

#[cfg(test)]
mod tests {
    use super::super::AnalysisService;
    use crate::error::EngineError;
    use crate::indicators::test_support::{assert_opt_vec_eq, flat_candle};
    use shared::models::Candle;

    fn closes(values: &[f64]) -> Vec<Candle> {
        values.iter().map(|&c| flat_candle(c)).collect()
    }

    #[test]
    fn test_sma_series() {
        let service = AnalysisService::default();
        let data = closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let indicator = service.calculate_indicator(&data, "SMA", r#"{"period": 3}"#).unwrap();
        assert_eq!(indicator.name, "MA3");
        assert_eq!(indicator.parameters, serde_json::json!({ "period": 3 }));
        assert_opt_vec_eq(&indicator.values, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_empty_params_use_defaults() {
        let service = AnalysisService::default();
        let data = closes(&[10.0; 30]);
        let rsi = service.calculate_indicator(&data, "rsi", "").unwrap();
        assert_eq!(rsi.name, "RSI6");
        assert_eq!(rsi.values.len(), 30);
        let boll = service.calculate_indicator(&data, "boll_mid", "{}").unwrap();
        assert_eq!(boll.values[18], None);
        assert_eq!(boll.values[19], Some(10.0));
    }

    #[test]
    fn test_macd_lines() {
        let service = AnalysisService::default();
        let data = closes(&[10.0; 12]);
        let hist = service.calculate_indicator(&data, "macd_hist", r#"{"fast": 12, "slow": 26, "signal": 9}"#).unwrap();
        assert_eq!(hist.values[8], None);
        assert_eq!(hist.values[9], Some(0.0));
        assert_eq!(hist.parameters["signal"], 9);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let service = AnalysisService::default();
        let data = closes(&[1.0, 2.0]);
        let err = service.calculate_indicator(&data, "ema", r#"{"period": 0}"#).unwrap_err();
        assert!(matches!(err, EngineError::IndicatorError(_)));
        let err = service.calculate_indicator(&data, "macd", r#"{"slow": 0}"#).unwrap_err();
        assert!(matches!(err, EngineError::IndicatorError(_)));
    }

    #[test]
    fn test_unknown_kind_and_bad_json() {
        let service = AnalysisService::default();
        let data = closes(&[1.0, 2.0]);
        let unknown = service.calculate_indicator(&data, "vwap", "{}").unwrap_err();
        assert!(unknown.to_string().contains("Unknown indicator type: vwap"));
        let bad = service.calculate_indicator(&data, "sma", "{period").unwrap_err();
        assert!(matches!(bad, EngineError::ProcessingError(_)));
    }
}
