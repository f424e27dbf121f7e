// ============================================================================
// Module : models
// ============================================================================
// Structures de données du graphique : chandelles, indicateurs, données
// d'exemple.
// ============================================================================

pub mod indicators; // EMA, Elder Ray
pub mod ohlc;       // OHLC, OHLCData
pub mod sample;     // Série d'exemple déterministe

pub use indicators::{ElderRay, IndicatorSeries};
pub use ohlc::{OHLCData, OHLC};
