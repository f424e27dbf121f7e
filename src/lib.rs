// ============================================================================
// candlesketch - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod app;     // État de l'application + routage du pointeur
pub mod chart;   // Chart host : viewport, transformation, pan
pub mod config;  // Réglages (config.json)
pub mod models;  // Structures de données
pub mod overlay; // Couche de dessin
pub mod ui;      // Interface utilisateur
