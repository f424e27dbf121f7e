// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod candlestick_text; // Rendu des chandeliers japonais (Unicode text)
pub mod events;           // Clavier, souris, focus
pub mod indicators;       // EMA et Elder Ray
pub mod overlay;          // Canvas de dessin + crosshair
pub mod screen;           // Composition de l'écran

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use screen::render;
