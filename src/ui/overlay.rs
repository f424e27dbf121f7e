// ============================================================================
// Overlay terminal : canvas transparent au-dessus du graphique
// ============================================================================
// CanvasSurface implémente DrawingSurface avec un Canvas ratatui.
//
// CONCEPTS :
// 1. Transparence : le Canvas n'écrit que les cellules où un point est
//    allumé. Les chandeliers dessous restent visibles partout ailleurs.
// 2. Repère : les segments sont en pixels depuis le coin haut-gauche, le
//    Canvas a son y vers le haut -> y_canvas = hauteur - y.
// 3. Clipping : le Canvas ignore une ligne dont une extrémité sort des
//    bornes. Chaque segment est donc coupé au bord de la surface avant
//    d'être tracé (un segment à moitié sorti reste à moitié visible).
// ============================================================================

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Widget,
    },
};

use crate::overlay::{DrawingSurface, Point, Segment, StrokeStyle};

/// Fond du crosshair : assez sombre pour garder les chandeliers lisibles
const CROSSHAIR_COLOR: Color = Color::Rgb(48, 48, 56);

/// Surface de dessin en cellules terminal
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    width: f64,
    height: f64,
    marker: Marker,
    strokes: Vec<(Segment, Color)>,
}

impl CanvasSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            marker: Marker::Braille,
            strokes: Vec::new(),
        }
    }

    /// Segments effectivement tracés (après clipping)
    pub fn strokes(&self) -> &[(Segment, Color)] {
        &self.strokes
    }
}

impl DrawingSurface for CanvasSurface {
    fn clear(&mut self) {
        self.strokes.clear();
    }

    fn stroke_segment(&mut self, segment: &Segment, style: &StrokeStyle) {
        if let Some(clipped) = segment.clipped(self.width, self.height) {
            self.marker = style.marker;
            self.strokes.push((clipped, style.color));
        }
    }
}

impl Widget for &CanvasSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.strokes.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let height = self.height;
        Canvas::default()
            .marker(self.marker)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for (segment, color) in &self.strokes {
                    ctx.draw(&CanvasLine {
                        x1: segment.start.x,
                        y1: height - segment.start.y,
                        x2: segment.end.x,
                        y2: height - segment.end.y,
                        color: *color,
                    });
                }
            })
            .render(area, buf);
    }
}

/// Crosshair : surligne la ligne et la colonne sous le pointeur
///
/// Seul le fond change, les caractères du graphique restent.
pub struct Crosshair {
    pub point: Point,
}

impl Widget for Crosshair {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.point.x < 0.0 || self.point.y < 0.0 {
            return;
        }

        let column = self.point.x.floor() as u16;
        let row = self.point.y.floor() as u16;
        if column >= area.width || row >= area.height {
            return;
        }

        for x in area.left()..area.right() {
            buf.get_mut(x, area.y + row).set_bg(CROSSHAIR_COLOR);
        }
        for y in area.top()..area.bottom() {
            buf.get_mut(area.x + column, y).set_bg(CROSSHAIR_COLOR);
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{repaint, DrawModifier, DrawingController};
    use ratatui::{backend::TestBackend, Terminal};

    fn blank(symbol: &str) -> bool {
        symbol == " " || symbol == "\u{2800}"
    }

    #[test]
    fn test_overlay_keeps_chart_cells() {
        let backend = TestBackend::new(20, 10);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut drawing = DrawingController::default();
        drawing.key_down(DrawModifier::Ctrl);
        drawing.pointer_down(Point::new(0.5, 0.5));
        drawing.pointer_up(Point::new(19.5, 0.5));

        let mut surface = CanvasSurface::new(20, 10);
        repaint(&mut surface, &drawing, &StrokeStyle::default());

        terminal
            .draw(|frame| {
                let area = frame.size();
                // "Graphique" : un chandelier au milieu
                frame.buffer_mut().get_mut(10, 6).set_symbol("┃");
                frame.render_widget(&surface, area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        // Le chandelier n'est pas effacé par l'overlay
        assert_eq!(buffer.get(10, 6).symbol(), "┃");
        // Le segment est tracé sur la première ligne
        assert!(!blank(buffer.get(5, 0).symbol()));
        assert_eq!(buffer.get(5, 0).fg, Color::Rgb(255, 0, 0));
        // Ailleurs rien n'est écrit
        assert!(blank(buffer.get(5, 8).symbol()));
    }

    #[test]
    fn test_segments_are_clipped_to_surface() {
        let mut surface = CanvasSurface::new(20, 10);
        let style = StrokeStyle::default();

        surface.stroke_segment(&Segment::new(-10.0, 5.0, 10.0, 5.0), &style);
        surface.stroke_segment(&Segment::new(-10.0, 5.0, -1.0, 5.0), &style);

        assert_eq!(surface.strokes().len(), 1);
        assert_eq!(surface.strokes()[0].0, Segment::new(0.0, 5.0, 10.0, 5.0));
    }

    #[test]
    fn test_clear_empties_surface() {
        let mut surface = CanvasSurface::new(20, 10);
        surface.stroke_segment(&Segment::new(1.0, 1.0, 2.0, 2.0), &StrokeStyle::default());
        surface.clear();
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_crosshair_only_changes_background() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        buf.get_mut(3, 2).set_symbol("┃");

        Crosshair {
            point: Point::new(3.5, 2.5),
        }
        .render(area, &mut buf);

        assert_eq!(buf.get(3, 2).symbol(), "┃");
        assert_eq!(buf.get(3, 0).bg, CROSSHAIR_COLOR);
        assert_eq!(buf.get(9, 2).bg, CROSSHAIR_COLOR);
        assert_ne!(buf.get(9, 0).bg, CROSSHAIR_COLOR);
    }
}
