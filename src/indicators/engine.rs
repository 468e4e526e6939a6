// =============================================================================
// Indicator Engine
// =============================================================================
//
// Attaches the dashboard's derived columns to a fetched series:
//   ema_200            trend line, defined on every row
//   rsi_14             momentum oscillator, None for rows 0..=12
//   ma_20 / std_20     rolling mean and sample deviation, None for rows 0..=18
//   upper/lower band   ma_20 ± 2·std_20
//   fib_618            one retracement level over the last 50 bars, copied
//                      onto every row
//
// Every column is a trailing computation over `close` (the retracement uses
// high/low). The engine is a pure function of its input.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::ema::calculate_ema;
use crate::indicators::fibonacci::{retracement_level, FIB_RATIO, SWING_LOOKBACK};
use crate::indicators::rsi::calculate_rsi;
use crate::market_data::{Bar, Series};

pub const TREND_SPAN: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const BAND_PERIOD: usize = 20;
pub const BAND_STD_MULTIPLIER: f64 = 2.0;

/// Derived values for one row. `None` means "not available".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    pub ema_200: Option<f64>,
    pub rsi_14: Option<f64>,
    pub ma_20: Option<f64>,
    pub std_20: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub fib_618: f64,
}

/// A series together with its derived columns, row-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    series: Series,
    rows: Vec<DerivedRow>,
}

impl EnrichedSeries {
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    /// Bars paired with their derived row, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&Bar, &DerivedRow)> {
        self.series.bars().iter().zip(self.rows.iter())
    }

    /// The most recent bar and its derived row.
    pub fn last(&self) -> (&Bar, &DerivedRow) {
        // Both vectors share the series' non-empty length.
        (self.series.last(), &self.rows[self.rows.len() - 1])
    }

    /// The broadcast retracement level.
    pub fn fib_618(&self) -> f64 {
        self.last().1.fib_618
    }
}

/// Compute every derived column for `series`.
pub fn enrich(series: Series) -> EnrichedSeries {
    let closes = series.closes();

    let ema = calculate_ema(&closes, TREND_SPAN);
    let rsi = calculate_rsi(&closes, RSI_PERIOD);
    let bands = calculate_bollinger(&closes, BAND_PERIOD, BAND_STD_MULTIPLIER);

    // Unreachable fallback: a series always has at least one bar.
    let fib_618 = retracement_level(&series.highs(), &series.lows(), SWING_LOOKBACK, FIB_RATIO)
        .unwrap_or(series.last().close);

    let rows: Vec<DerivedRow> = (0..series.len())
        .map(|i| {
            let band = bands[i];
            DerivedRow {
                ema_200: ema.get(i).copied(),
                rsi_14: rsi[i],
                ma_20: band.map(|b| b.middle),
                std_20: band.map(|b| b.std_dev),
                upper_band: band.map(|b| b.upper),
                lower_band: band.map(|b| b.lower),
                fib_618,
            }
        })
        .collect();

    debug!(bars = series.len(), fib_618, "series enriched");

    EnrichedSeries { series, rows }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::bar::tests::series_from_closes;

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + ((i * 7) % 11) as f64 - 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn rows_align_with_bars() {
        let enriched = enrich(series_from_closes(&wavy(30)));
        assert_eq!(enriched.rows().len(), enriched.series().len());
        assert_eq!(enriched.iter().count(), 30);
    }

    #[test]
    fn trend_line_defined_everywhere() {
        let enriched = enrich(series_from_closes(&wavy(220)));
        assert!(enriched.rows().iter().all(|r| r.ema_200.is_some()));
    }

    #[test]
    fn oscillator_undefined_below_fourteen_bars() {
        let enriched = enrich(series_from_closes(&wavy(13)));
        assert!(enriched.rows().iter().all(|r| r.rsi_14.is_none()));
    }

    #[test]
    fn bands_ordered_where_defined() {
        let enriched = enrich(series_from_closes(&wavy(60)));
        let rows = enriched.rows();
        assert!(rows[..19].iter().all(|r| r.ma_20.is_none() && r.upper_band.is_none()));
        for r in &rows[19..] {
            let (up, mid, lo) = (r.upper_band.unwrap(), r.ma_20.unwrap(), r.lower_band.unwrap());
            assert!(up >= mid && mid >= lo);
        }
    }

    #[test]
    fn retracement_broadcast_and_bounded() {
        let enriched = enrich(series_from_closes(&wavy(80)));
        let level = enriched.fib_618();
        assert!(enriched.rows().iter().all(|r| r.fib_618 == level));

        let tail = &enriched.series().bars()[30..];
        let hi = tail.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lo = tail.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert!(lo <= level && level <= hi);
    }

    #[test]
    fn enrichment_is_idempotent() {
        let series = series_from_closes(&wavy(120));
        let first = enrich(series.clone());
        let second = enrich(series);
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn flat_series_collapses_bands_and_hides_oscillator() {
        // 25 bars with a constant close.
        let enriched = enrich(series_from_closes(&[100.0; 25]));
        for r in enriched.rows() {
            assert!(r.rsi_14.is_none());
        }
        for r in &enriched.rows()[19..] {
            assert_eq!(r.std_20, Some(0.0));
            assert_eq!(r.upper_band, r.ma_20);
            assert_eq!(r.lower_band, r.ma_20);
        }
    }

    #[test]
    fn three_rising_bars() {
        let enriched = enrich(series_from_closes(&[10.0, 11.0, 12.0]));
        let (_, last) = enriched.last();
        assert!(last.rsi_14.is_none());
        assert!(last.ema_200.is_some());
        assert!(last.ema_200.unwrap() < 12.0);
    }
}
