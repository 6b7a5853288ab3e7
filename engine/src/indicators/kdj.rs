// KDJ stochastic oscillator
use super::find_cross;
use crate::config::KdjParams;
use shared::models::{Candle, KdjStatus, MacdCross};

#[derive(Debug, Clone, PartialEq)]
pub struct KdjReading {
    pub k: f64,
    pub d: f64,
    pub j: f64,
    pub status: KdjStatus,
}

/// K, D and J for every candle from index `period - 1` on (the first full
/// high/low window). K and D start from 50 and are smoothed with factors
/// `k_smooth` / `d_smooth`; `J = 3K - 2D`.
pub fn kdj(data: &[Candle], params: &KdjParams) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let (mut ks, mut ds, mut js) = (Vec::new(), Vec::new(), Vec::new());
    if params.period == 0 || params.k_smooth == 0 || params.d_smooth == 0 || data.len() < params.period {
        return (ks, ds, js);
    }

    let k_smooth = params.k_smooth as f64;
    let d_smooth = params.d_smooth as f64;
    let (mut prev_k, mut prev_d) = (50.0, 50.0);

    for i in (params.period - 1)..data.len() {
        let window = &data[i + 1 - params.period..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        // A window with no range carries no information: treat it as mid-scale.
        let rsv = if range > 0.0 { (data[i].close - lowest) / range * 100.0 } else { 50.0 };

        let k = ((k_smooth - 1.0) * prev_k + rsv) / k_smooth;
        let d = ((d_smooth - 1.0) * prev_d + k) / d_smooth;
        ks.push(k);
        ds.push(d);
        js.push(3.0 * k - 2.0 * d);
        prev_k = k;
        prev_d = d;
    }
    (ks, ds, js)
}

pub fn latest(data: &[Candle], params: &KdjParams) -> Option<KdjReading> {
    let (ks, ds, js) = kdj(data, params);
    let (k, d, j) = (*ks.last()?, *ds.last()?, *js.last()?);

    // Only a cross on the latest candle counts; KDJ turns too often for a wider window.
    let status = match find_cross(&ks, &ds, 0, 1).0 {
        MacdCross::Golden => KdjStatus::GoldenCross,
        MacdCross::Dead => KdjStatus::DeadCross,
        MacdCross::None if k >= params.overbought && d >= params.overbought => KdjStatus::Overbought,
        MacdCross::None if k <= params.oversold && d <= params.oversold => KdjStatus::Oversold,
        MacdCross::None => KdjStatus::Neutral,
    };
    Some(KdjReading { k, d, j, status })
}
