// ============================================================================
// Structure : OHLC (Open, High, Low, Close)
// ============================================================================
// Représente les données d'une chandelle japonaise (candlestick)
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : type de chrono pour dates avec timezone UTC
// 2. f64 : floating point 64 bits pour les prix
// 3. u64 : unsigned 64 bits pour le volume (toujours positif)
// ============================================================================

use chrono::{DateTime, Utc};

/// Marge ajoutée au-dessus et en dessous des prix extrêmes (2%)
const PRICE_MARGIN_RATIO: f64 = 0.02;

/// Une chandelle japonaise (candlestick)
#[derive(Debug, Clone, PartialEq)]
pub struct OHLC {
    /// Timestamp de la chandelle
    pub timestamp: DateTime<Utc>,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Prix de clôture (Close)
    pub close: f64,

    /// Volume échangé
    pub volume: u64,
}

impl OHLC {
    /// Constructeur : crée une nouvelle chandelle OHLC
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Vérifie si la chandelle est haussière (bullish)
    ///
    /// Une chandelle doji (close == open) est comptée haussière, comme
    /// pour la couleur du rendu.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Variation en pourcentage depuis l'ouverture
    pub fn change_percent(&self) -> f64 {
        if self.open == 0.0 {
            0.0
        } else {
            ((self.close - self.open) / self.open) * 100.0
        }
    }
}

/// Collection de chandelles OHLC pour un symbole
#[derive(Debug, Clone)]
pub struct OHLCData {
    /// Symbole affiché dans le titre
    pub symbol: String,

    /// Liste des chandelles, triées par timestamp croissant
    pub candles: Vec<OHLC>,
}

impl OHLCData {
    /// Crée une nouvelle collection vide
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            candles: Vec::new(),
        }
    }

    /// Ajoute une chandelle
    pub fn add_candle(&mut self, candle: OHLC) {
        self.candles.push(candle);
    }

    /// Retourne le nombre de chandelles
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Vérifie si la collection est vide
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Retourne la chandelle la plus récente (étiquette de l'axe des prix)
    pub fn last(&self) -> Option<&OHLC> {
        self.candles.last()
    }

    pub fn get(&self, index: usize) -> Option<&OHLC> {
        self.candles.get(index)
    }

    /// Calcule le prix minimum sur toute la période
    pub fn min_price(&self) -> Option<f64> {
        self.candles.iter().map(|c| c.low).reduce(f64::min)
    }

    /// Calcule le prix maximum sur toute la période
    pub fn max_price(&self) -> Option<f64> {
        self.candles.iter().map(|c| c.high).reduce(f64::max)
    }

    /// Bornes de l'axe des prix : [min - 2%, max + 2%] de l'amplitude
    ///
    /// Le bas ne descend pas sous 0. Une série plate reçoit une amplitude
    /// artificielle pour garder une échelle inversible.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let min = self.min_price()?;
        let max = self.max_price()?;

        let margin = if max > min {
            (max - min) * PRICE_MARGIN_RATIO
        } else {
            max.abs().max(1.0) * PRICE_MARGIN_RATIO
        };

        Some(((min - margin).max(0.0), max + margin))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_ohlc_bullish() {
        let ohlc = OHLC::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000);
        assert!(ohlc.is_bullish());
        assert_eq!(ohlc.change_percent(), 5.0);
    }

    #[test]
    fn test_ohlc_bearish() {
        let ohlc = OHLC::new(Utc::now(), 100.0, 105.0, 90.0, 95.0, 1000);
        assert!(!ohlc.is_bullish());
    }

    #[test]
    fn test_ohlc_data() {
        let mut data = OHLCData::new("AAPL".to_string());

        assert!(data.is_empty());
        assert!(data.price_bounds().is_none());

        data.add_candle(OHLC::new(Utc::now(), 100.0, 110.0, 95.0, 105.0, 1000));
        data.add_candle(OHLC::new(Utc::now(), 105.0, 115.0, 100.0, 110.0, 1200));

        assert_eq!(data.len(), 2);
        assert_eq!(data.min_price(), Some(95.0));
        assert_eq!(data.max_price(), Some(115.0));
        assert_eq!(data.last().map(|c| c.close), Some(110.0));
    }

    #[test]
    fn test_price_bounds_margin() {
        let mut data = OHLCData::new("AAPL".to_string());
        data.add_candle(OHLC::new(Utc::now(), 100.0, 200.0, 100.0, 150.0, 1000));

        let (low, high) = data.price_bounds().unwrap();
        assert_eq!(low, 98.0);
        assert_eq!(high, 202.0);
    }

    #[test]
    fn test_price_bounds_flat_series() {
        let mut data = OHLCData::new("FLAT".to_string());
        data.add_candle(OHLC::new(Utc::now(), 50.0, 50.0, 50.0, 50.0, 10));

        let (low, high) = data.price_bounds().unwrap();
        assert!(low < 50.0 && high > 50.0);
    }
}
