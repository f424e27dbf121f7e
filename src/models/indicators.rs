// ============================================================================
// Indicateurs techniques
// ============================================================================
// - EMA 12 et EMA 26 sur les clôtures (lignes sur le panneau de prix)
// - Elder Ray : puissance acheteuse / vendeuse autour d'une EMA 13
//
// Les valeurs sont alignées sur les chandelles : None tant que la
// fenêtre n'est pas remplie.
// ============================================================================

use super::ohlc::OHLC;

pub const EMA_FAST_PERIOD: usize = 12;
pub const EMA_SLOW_PERIOD: usize = 26;
pub const ELDER_RAY_PERIOD: usize = 13;

/// Calcule une moyenne mobile exponentielle
///
/// La première valeur (index `period - 1`) est la moyenne simple des
/// `period` premières valeurs, puis `ema = prev + alpha * (x - prev)` avec
/// `alpha = 2 / (period + 1)`.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut ema = vec![None; values.len()];

    if period == 0 || values.len() < period {
        return ema;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    ema[period - 1] = Some(seed);

    let mut prev = seed;
    for (i, value) in values.iter().enumerate().skip(period) {
        prev += alpha * (value - prev);
        ema[i] = Some(prev);
    }

    ema
}

/// Valeurs Elder Ray d'une chandelle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElderRay {
    /// high - EMA
    pub bull_power: f64,
    /// low - EMA
    pub bear_power: f64,
}

/// Calcule l'Elder Ray sur une EMA des clôtures
pub fn calculate_elder_ray(candles: &[OHLC], period: usize) -> Vec<Option<ElderRay>> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    calculate_ema(&closes, period)
        .into_iter()
        .zip(candles)
        .map(|(ema, candle)| {
            ema.map(|ema| ElderRay {
                bull_power: candle.high - ema,
                bear_power: candle.low - ema,
            })
        })
        .collect()
}

/// Séries d'indicateurs calculées une fois au chargement des données
#[derive(Debug, Clone, Default)]
pub struct IndicatorSeries {
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub elder_ray: Vec<Option<ElderRay>>,
}

impl IndicatorSeries {
    pub fn compute(candles: &[OHLC]) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        Self {
            ema_fast: calculate_ema(&closes, EMA_FAST_PERIOD),
            ema_slow: calculate_ema(&closes, EMA_SLOW_PERIOD),
            elder_ray: calculate_elder_ray(candles, ELDER_RAY_PERIOD),
        }
    }

    pub fn ema_fast_at(&self, index: usize) -> Option<f64> {
        self.ema_fast.get(index).copied().flatten()
    }

    pub fn ema_slow_at(&self, index: usize) -> Option<f64> {
        self.ema_slow.get(index).copied().flatten()
    }

    pub fn elder_ray_at(&self, index: usize) -> Option<ElderRay> {
        self.elder_ray.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_calculate_ema() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ema = calculate_ema(&values, 3);

        assert_eq!(ema[0], None); // Pas assez de données
        assert_eq!(ema[1], None);
        assert_eq!(ema[2], Some(2.0)); // Moyenne simple (1+2+3)/3
        assert_eq!(ema[3], Some(3.0)); // 2 + 0.5 * (4 - 2)
        assert_eq!(ema[4], Some(4.0)); // 3 + 0.5 * (5 - 3)
    }

    #[test]
    fn test_ema_short_input() {
        assert!(calculate_ema(&[1.0, 2.0], 3).iter().all(Option::is_none));
        assert!(calculate_ema(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn test_elder_ray() {
        let candles: Vec<OHLC> = (0..3)
            .map(|_| OHLC::new(Utc::now(), 100.0, 104.0, 97.0, 100.0, 1000))
            .collect();

        let elder = calculate_elder_ray(&candles, 2);
        assert_eq!(elder[0], None);
        assert_eq!(
            elder[1],
            Some(ElderRay {
                bull_power: 4.0,
                bear_power: -3.0
            })
        );
    }

    #[test]
    fn test_indicator_series_lengths() {
        let candles: Vec<OHLC> = (0..40)
            .map(|i| OHLC::new(Utc::now(), 100.0, 101.0, 99.0, 100.0 + i as f64, 1000))
            .collect();

        let series = IndicatorSeries::compute(&candles);
        assert_eq!(series.ema_fast.len(), 40);
        assert!(series.ema_fast_at(10).is_none());
        assert!(series.ema_fast_at(11).is_some());
        assert!(series.ema_slow_at(25).is_some());
        assert!(series.elder_ray_at(12).is_some());
        assert!(series.ema_fast_at(1000).is_none());
    }
}
