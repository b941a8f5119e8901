//! Five-point moving-average crossover markers.
//!
//! Computed once over a series of at most 30 bars: buy where the close
//! crosses above the 5-bar moving average, sell where it crosses below.
//! Indices are positions into the series' bar vector.

use crate::HistoricalSeries;

/// Moving-average window width.
pub const MA_PERIOD: usize = 5;

/// Bar indices where the close crossed the moving average.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignalPoints {
    pub buy: Vec<usize>,
    pub sell: Vec<usize>,
}

impl SignalPoints {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// Scan the series for crossover points.
///
/// Bar `i` is a buy when its close exceeds the MA over bars
/// `[i - 5, i)` while the previous close was at or below the MA over
/// `[i - 6, i - 1)`; a sell is the mirrored condition. Series too short to
/// carry both windows yield no points.
pub fn crossover_points(series: &HistoricalSeries) -> SignalPoints {
    let closes = series.closes();
    let mut points = SignalPoints::default();

    if closes.len() <= MA_PERIOD + 1 {
        return points;
    }

    for i in (MA_PERIOD + 1)..closes.len() {
        let ma = window_mean(&closes[i - MA_PERIOD..i]);
        let prev_ma = window_mean(&closes[i - MA_PERIOD - 1..i - 1]);

        if closes[i] > ma && closes[i - 1] <= prev_ma {
            points.buy.push(i);
        }
        if closes[i] < ma && closes[i - 1] >= prev_ma {
            points.sell.push(i);
        }
    }

    points
}

fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bar, Symbol, UtcDateTime};

    fn series(closes: &[f64]) -> HistoricalSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(day, close)| {
                let ts =
                    UtcDateTime::from_unix_ms_lossy(1_704_067_200_000 + day as i64 * 86_400_000);
                Bar::sanitized(ts, *close, *close, *close, *close, 1_000)
            })
            .collect();
        HistoricalSeries::from_bars(Symbol::parse("AMZN").expect("valid symbol"), bars)
    }

    #[test]
    fn short_series_yields_no_points() {
        assert!(crossover_points(&series(&[1.0; 6])).is_empty());
        assert!(crossover_points(&series(&[])).is_empty());
    }

    #[test]
    fn rising_cross_marks_a_buy() {
        // Flat under the average, then a jump through it.
        let closes = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 12.0];
        let points = crossover_points(&series(&closes));
        assert_eq!(points.buy, vec![6]);
        assert!(points.sell.is_empty());
    }

    #[test]
    fn falling_cross_marks_a_sell() {
        let closes = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 8.0];
        let points = crossover_points(&series(&closes));
        assert_eq!(points.sell, vec![6]);
        assert!(points.buy.is_empty());
    }

    #[test]
    fn steady_trend_produces_no_repeat_signals() {
        // Once above the average and climbing, every close beats the MA and
        // the previous close beat its MA too, so no further crossings.
        let closes = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 13.0, 14.0, 15.0];
        let points = crossover_points(&series(&closes));
        assert_eq!(points.buy, vec![6]);
        assert!(points.sell.is_empty());
    }
}
