// Volume ratio: latest volume against the average of the candles before it
use crate::config::VolumeParams;
use shared::models::{Candle, VolumeTrend};
use shared::utils::mean;

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeReading {
    pub ratio: f64,
    pub trend: VolumeTrend,
}

/// Needs `baseline + 1` candles. A zero baseline (no trading at all) gives `None`
/// rather than an infinite ratio.
pub fn latest(data: &[Candle], params: &VolumeParams) -> Option<VolumeReading> {
    if params.baseline == 0 || data.len() < params.baseline + 1 {
        return None;
    }
    let last = data.len() - 1;
    let baseline: Vec<f64> = data[last - params.baseline..last].iter().map(|c| c.volume).collect();
    let avg = mean(&baseline)?;
    if avg <= 0.0 {
        return None;
    }
    let ratio = data[last].volume / avg;
    Some(VolumeReading { ratio, trend: classify(ratio, params) })
}

pub fn classify(ratio: f64, params: &VolumeParams) -> VolumeTrend {
    if ratio >= params.heavy_ratio {
        VolumeTrend::Heavy
    } else if ratio <= params.light_ratio {
        VolumeTrend::Light
    } else {
        VolumeTrend::Normal
    }
}
