// ============================================================================
// Module : overlay
// ============================================================================
// Couche de dessin au-dessus du graphique : segments en pixels, contrôleur
// conditionné par un modificateur, réconciliation du pan, repaint.
// ============================================================================

pub mod controller; // Machine à états du dessin
pub mod pan;        // Recalage des segments pendant un pan
pub mod segment;    // Point, Segment, PixelDelta
pub mod surface;    // Trait DrawingSurface + repaint

pub use controller::{DrawModifier, DrawingController, DEFAULT_SEGMENT_CAP};
pub use pan::{reference_delta, PanReconciler};
pub use segment::{PixelDelta, Point, Segment};
pub use surface::{repaint, DrawingSurface, StrokeStyle};
