// ============================================================================
// Contrôleur de dessin conditionné par une touche modificatrice
// ============================================================================
// Décide, pour chaque événement pointeur, si l'overlay le consomme (dessin)
// ou le laisse passer au graphique en dessous (pan, zoom, crosshair).
//
// MACHINE À ÉTATS :
//   Idle ──(modifier + pointer_down)──> Drawing ──(pointer_up)──> Idle + segment
//                                          │
//                                (modifier relâché / focus perdu)
//                                          └──> Idle, aperçu abandonné
//
// L'état du modificateur ne vient que des événements reçus par
// l'application quand elle a le focus. Perdre le focus équivaut à relâcher
// la touche.
// ============================================================================

use serde::Deserialize;
use tracing::{debug, info};

use super::segment::{PixelDelta, Point, Segment};

/// Nombre maximum de segments conservés
pub const DEFAULT_SEGMENT_CAP: usize = 5;

/// Touche modificatrice qui active le dessin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawModifier {
    /// Ctrl : la plupart des terminaux réservent Shift+clic à la sélection de texte
    #[default]
    Ctrl,
    Shift,
    Alt,
}

impl DrawModifier {
    pub fn label(&self) -> &'static str {
        match self {
            DrawModifier::Ctrl => "Ctrl",
            DrawModifier::Shift => "Shift",
            DrawModifier::Alt => "Alt",
        }
    }
}

/// Drag en cours : point de départ et position courante du pointeur
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub start: Point,
    pub current: Point,
}

/// État de la couche de dessin
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingController {
    modifier: DrawModifier,
    modifier_held: bool,
    cap: usize,
    segments: Vec<Segment>,
    drag: Option<DragState>,
    panning: bool,
}

impl DrawingController {
    pub fn new(modifier: DrawModifier, cap: usize) -> Self {
        Self {
            modifier,
            modifier_held: false,
            cap,
            segments: Vec::new(),
            drag: None,
            panning: false,
        }
    }

    // ========================================================================
    // Modificateur
    // ========================================================================

    pub fn modifier(&self) -> DrawModifier {
        self.modifier
    }

    pub fn is_modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Appui sur une touche modificatrice
    pub fn key_down(&mut self, key: DrawModifier) {
        if key == self.modifier {
            self.sync_modifier(true);
        }
    }

    /// Relâchement d'une touche modificatrice
    pub fn key_up(&mut self, key: DrawModifier) {
        if key == self.modifier {
            self.sync_modifier(false);
        }
    }

    /// Met à jour l'état à partir des bits de modificateur d'un événement
    ///
    /// Les événements souris transportent l'état courant des modificateurs :
    /// c'est la seule source fiable sur les terminaux sans relâchement de touche.
    pub fn sync_modifier(&mut self, held: bool) {
        if self.modifier_held == held {
            return;
        }

        self.modifier_held = held;
        debug!(modifier = self.modifier.label(), held, "Modifier state changed");

        if !held {
            self.discard_drag();
        }
    }

    /// Perte du focus : plus aucun événement clavier ne nous parviendra
    pub fn focus_lost(&mut self) {
        self.sync_modifier(false);
    }

    // ========================================================================
    // Pointeur
    // ========================================================================

    /// L'overlay laisse-t-il passer les événements pointeur au graphique ?
    pub fn pointer_passthrough(&self) -> bool {
        !self.modifier_held || self.panning
    }

    /// Début d'un segment
    ///
    /// Conditions : modificateur tenu, limite non atteinte, pas de pan en cours.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if self.panning || !self.modifier_held {
            return false;
        }

        if self.segments.len() >= self.cap {
            debug!(cap = self.cap, "Segment cap reached, drawing blocked");
            return false;
        }

        self.drag = Some(DragState {
            start: point,
            current: point,
        });
        true
    }

    /// Déplacement pendant un drag : met à jour l'aperçu
    ///
    /// Retourne true si un repaint est nécessaire.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        if !self.modifier_held {
            return false;
        }

        match self.drag.as_mut() {
            Some(drag) => {
                drag.current = point;
                true
            }
            None => false,
        }
    }

    /// Fin du drag : l'aperçu devient un segment permanent
    pub fn pointer_up(&mut self, point: Point) -> Option<Segment> {
        if !self.modifier_held {
            return None;
        }

        let drag = self.drag.take()?;
        let segment = Segment::from_points(drag.start, point);
        self.segments.push(segment);

        info!(
            count = self.segments.len(),
            cap = self.cap,
            ?segment,
            "Segment committed"
        );
        Some(segment)
    }

    fn discard_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(?drag, "In-progress segment discarded");
        }
    }

    // ========================================================================
    // Pan
    // ========================================================================

    pub fn set_panning(&mut self, panning: bool) {
        self.panning = panning;
        if panning {
            // Dessin et pan sont exclusifs
            self.discard_drag();
        }
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Translate tous les segments permanents (jamais l'aperçu)
    pub fn translate_segments(&mut self, delta: PixelDelta) {
        for segment in &mut self.segments {
            *segment = segment.translated(delta);
        }
    }

    // ========================================================================
    // Lecture
    // ========================================================================

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_drawing(&self) -> bool {
        self.drag.is_some()
    }

    /// Segment d'aperçu entre le point de départ et le pointeur
    pub fn preview(&self) -> Option<Segment> {
        self.drag
            .map(|drag| Segment::from_points(drag.start, drag.current))
    }

    /// Efface toute la couche de dessin
    pub fn clear(&mut self) {
        self.segments.clear();
        self.discard_drag();
    }
}

impl Default for DrawingController {
    fn default() -> Self {
        Self::new(DrawModifier::default(), DEFAULT_SEGMENT_CAP)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(controller: &mut DrawingController, from: (f64, f64), to: (f64, f64)) -> Option<Segment> {
        controller.pointer_down(Point::new(from.0, from.1));
        controller.pointer_move(Point::new(to.0, to.1));
        controller.pointer_up(Point::new(to.0, to.1))
    }

    #[test]
    fn test_cap_blocks_sixth_segment() {
        let mut controller = DrawingController::default();
        controller.key_down(DrawModifier::Ctrl);

        for i in 0..5 {
            let x = i as f64 * 10.0;
            assert!(drag(&mut controller, (x, 0.0), (x + 5.0, 5.0)).is_some());
            assert_eq!(controller.segment_count(), i + 1);
        }

        assert!(!controller.pointer_down(Point::new(1.0, 1.0)));
        assert!(controller.pointer_up(Point::new(2.0, 2.0)).is_none());
        assert_eq!(controller.segment_count(), 5);

        // Les segments les plus anciens sont conservés
        assert_eq!(controller.segments()[0], Segment::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn test_no_modifier_no_segment() {
        let mut controller = DrawingController::default();
        assert!(controller.pointer_passthrough());
        assert!(drag(&mut controller, (0.0, 0.0), (10.0, 10.0)).is_none());
        assert_eq!(controller.segment_count(), 0);
    }

    #[test]
    fn test_other_modifier_is_ignored() {
        let mut controller = DrawingController::new(DrawModifier::Shift, 5);
        controller.key_down(DrawModifier::Ctrl);
        assert!(!controller.is_modifier_held());
        controller.key_down(DrawModifier::Shift);
        assert!(controller.is_modifier_held());
    }

    #[test]
    fn test_release_mid_drag_discards_preview() {
        let mut controller = DrawingController::default();
        controller.key_down(DrawModifier::Ctrl);
        assert!(controller.pointer_down(Point::new(1.0, 1.0)));
        assert!(controller.pointer_move(Point::new(8.0, 3.0)));
        assert_eq!(controller.preview(), Some(Segment::new(1.0, 1.0, 8.0, 3.0)));

        controller.key_up(DrawModifier::Ctrl);
        assert!(controller.preview().is_none());
        assert!(controller.pointer_up(Point::new(9.0, 9.0)).is_none());

        // Même si la touche est à nouveau tenue au relâchement du bouton
        controller.key_down(DrawModifier::Ctrl);
        assert!(controller.pointer_up(Point::new(9.0, 9.0)).is_none());
        assert_eq!(controller.segment_count(), 0);
    }

    #[test]
    fn test_focus_lost_releases_modifier() {
        let mut controller = DrawingController::default();
        controller.sync_modifier(true);
        controller.pointer_down(Point::new(0.0, 0.0));

        controller.focus_lost();
        assert!(!controller.is_modifier_held());
        assert!(!controller.is_drawing());
    }

    #[test]
    fn test_no_drawing_while_panning() {
        let mut controller = DrawingController::default();
        controller.key_down(DrawModifier::Ctrl);
        controller.set_panning(true);

        assert!(controller.pointer_passthrough());
        assert!(!controller.pointer_down(Point::new(0.0, 0.0)));

        controller.set_panning(false);
        assert!(!controller.pointer_passthrough());
        assert!(controller.pointer_down(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_translate_skips_preview() {
        let mut controller = DrawingController::default();
        controller.key_down(DrawModifier::Ctrl);
        drag(&mut controller, (10.0, 10.0), (50.0, 50.0));
        controller.pointer_down(Point::new(0.0, 0.0));
        controller.pointer_move(Point::new(4.0, 4.0));

        controller.translate_segments(PixelDelta::new(20.0, 0.0));
        assert_eq!(controller.segments()[0], Segment::new(30.0, 10.0, 70.0, 50.0));
        assert_eq!(controller.preview(), Some(Segment::new(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn test_huge_cap_does_not_allocate_up_front() {
        let mut controller = DrawingController::new(DrawModifier::Ctrl, usize::MAX);
        controller.key_down(DrawModifier::Ctrl);
        assert!(drag(&mut controller, (1.0, 1.0), (4.0, 4.0)).is_some());
        assert_eq!(controller.segment_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut controller = DrawingController::default();
        controller.key_down(DrawModifier::Ctrl);
        drag(&mut controller, (0.0, 0.0), (1.0, 1.0));
        controller.clear();
        assert!(!controller.has_segments());
    }
}
