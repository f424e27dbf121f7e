// ============================================================================
// Module : chart
// ============================================================================
// Le "chart host" : données, fenêtre visible, transformation domaine -> pixels
// et notifications de pan.
// ============================================================================

pub mod host;      // ChartHost + PanEvent / PanNotification
pub mod layout;    // Découpage de l'écran
pub mod transform; // LinearScale, ChartTransform
pub mod viewport;  // Pan / zoom du domaine visible

pub use host::{ChartHost, PanEvent, PanNotification};
pub use layout::ChartLayout;
pub use transform::{ChartTransform, LinearScale};
pub use viewport::Viewport;
