// ============================================================================
// Données d'exemple
// ============================================================================
// Série journalière déterministe : même symbole + même taille = mêmes
// chandelles. Les week-ends sont sautés pour ressembler à un marché réel.
//
// Le prix suit une tendance lente + deux oscillations de périodes
// différentes, ce qui donne des croisements d'EMA visibles.
// ============================================================================

use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};

use super::ohlc::{OHLCData, OHLC};

const BASE_PRICE: f64 = 100.0;
const BASE_VOLUME: f64 = 1_000_000.0;

/// Génère `count` chandelles journalières à partir du 2 janvier 2024
pub fn generate_sample_data(symbol: &str, count: usize) -> OHLCData {
    let mut data = OHLCData::new(symbol.to_string());

    // Une graine dérivée du symbole décale les oscillations
    let seed = symbol.bytes().map(f64::from).sum::<f64>() % 17.0;

    let mut day = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single();
    let mut previous_close = price_at(0.0, seed);

    for i in 0..count {
        let Some(timestamp) = day else {
            break;
        };

        let t = i as f64;
        let open = previous_close;
        let close = price_at(t + 1.0, seed);

        // Mèches : proportionnelles à la volatilité locale
        let wick = 0.4 + 0.6 * ((t * 0.7 + seed).sin().abs());
        let high = open.max(close) + wick;
        let low = (open.min(close) - wick * 0.8).max(0.01);

        let swing = ((close - open).abs() / open.max(0.01)) * 40.0;
        let volume = BASE_VOLUME * (0.5 + 0.3 * (t * 0.37 + seed).cos().abs() + swing.min(1.0));

        data.add_candle(OHLC::new(timestamp, open, high, low, close, volume as u64));

        previous_close = close;
        day = next_trading_day(timestamp);
    }

    data
}

fn price_at(t: f64, seed: f64) -> f64 {
    BASE_PRICE + t * 0.05 + 8.0 * (t / 23.0 + seed).sin() + 3.0 * (t / 5.0 + seed * 0.5).cos()
}

fn next_trading_day(day: chrono::DateTime<Utc>) -> Option<chrono::DateTime<Utc>> {
    let mut next = day.checked_add_signed(Duration::days(1))?;
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next = next.checked_add_signed(Duration::days(1))?;
    }
    Some(next)
}
