// ============================================================================
// Repaint de l'overlay
// ============================================================================
// Redessin complet à chaque changement : effacer puis tracer chaque segment
// permanent, puis l'aperçu s'il existe. Pas de diff incrémental, la limite
// de segments garde le coût négligeable.
// ============================================================================

use ratatui::{style::Color, symbols::Marker};

use super::controller::DrawingController;
use super::segment::Segment;

/// Style de trait : couleur + épaisseur (le marker du canvas)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub marker: Marker,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::Rgb(255, 0, 0),
            marker: Marker::Braille,
        }
    }
}

/// Surface de dessin en mode immédiat
pub trait DrawingSurface {
    /// Efface toute la surface
    fn clear(&mut self);

    /// Trace un segment droit
    fn stroke_segment(&mut self, segment: &Segment, style: &StrokeStyle);
}

/// Redessine toute la couche de dessin
pub fn repaint<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    drawing: &DrawingController,
    style: &StrokeStyle,
) {
    surface.clear();

    for segment in drawing.segments() {
        surface.stroke_segment(segment, style);
    }

    if let Some(preview) = drawing.preview() {
        surface.stroke_segment(&preview, style);
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{DrawModifier, Point};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Stroke(Segment),
    }

    /// Surface qui mémorise le résultat visible (comme un vrai canvas)
    #[derive(Default)]
    struct RecordingSurface {
        ops: Vec<Op>,
        visible: Vec<Segment>,
    }

    impl DrawingSurface for RecordingSurface {
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
            self.visible.clear();
        }

        fn stroke_segment(&mut self, segment: &Segment, _style: &StrokeStyle) {
            self.ops.push(Op::Stroke(*segment));
            self.visible.push(*segment);
        }
    }

    #[test]
    fn test_repaint_clears_first() {
        let mut surface = RecordingSurface::default();
        let drawing = DrawingController::default();
        repaint(&mut surface, &drawing, &StrokeStyle::default());
        assert_eq!(surface.ops, vec![Op::Clear]);
    }

    #[test]
    fn test_repaint_has_no_ghosting() {
        let mut surface = RecordingSurface::default();
        let style = StrokeStyle::default();
        let mut drawing = DrawingController::default();
        drawing.key_down(DrawModifier::Ctrl);

        // Aperçu pendant le drag
        drawing.pointer_down(Point::new(0.0, 0.0));
        drawing.pointer_move(Point::new(5.0, 5.0));
        repaint(&mut surface, &drawing, &style);
        assert_eq!(surface.visible, vec![Segment::new(0.0, 0.0, 5.0, 5.0)]);

        // L'aperçu suit le pointeur, l'ancien n'est plus visible
        drawing.pointer_move(Point::new(9.0, 2.0));
        repaint(&mut surface, &drawing, &style);
        assert_eq!(surface.visible, vec![Segment::new(0.0, 0.0, 9.0, 2.0)]);

        // Commit : le segment permanent remplace l'aperçu
        drawing.pointer_up(Point::new(9.0, 2.0));
        repaint(&mut surface, &drawing, &style);
        assert_eq!(surface.visible, vec![Segment::new(0.0, 0.0, 9.0, 2.0)]);

        // Le résultat ne dépend que de l'état courant
        let mut fresh = RecordingSurface::default();
        repaint(&mut fresh, &drawing, &style);
        assert_eq!(fresh.visible, surface.visible);
    }

    #[test]
    fn test_repaint_draws_preview_after_segments() {
        let mut surface = RecordingSurface::default();
        let mut drawing = DrawingController::default();
        drawing.key_down(DrawModifier::Ctrl);
        drawing.pointer_down(Point::new(1.0, 1.0));
        drawing.pointer_up(Point::new(2.0, 2.0));
        drawing.pointer_down(Point::new(3.0, 3.0));
        drawing.pointer_move(Point::new(4.0, 4.0));

        repaint(&mut surface, &drawing, &StrokeStyle::default());
        assert_eq!(
            surface.ops,
            vec![
                Op::Clear,
                Op::Stroke(Segment::new(1.0, 1.0, 2.0, 2.0)),
                Op::Stroke(Segment::new(3.0, 3.0, 4.0, 4.0)),
            ]
        );
    }
}
