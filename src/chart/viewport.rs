// ============================================================================
// Viewport : fenêtre visible sur les chandelles
// ============================================================================
// La fenêtre est décrite dans le domaine des index de chandelle :
// - start : index (fractionnaire) au bord gauche
// - span  : nombre d'index visibles jusqu'au bord droit
//
// Le pan déplace start, le zoom change span. Les deux sont bornés pour
// qu'au moins une chandelle reste toujours visible.
// ============================================================================

use std::ops::Range;

use super::transform::LinearScale;

/// Nombre minimum de chandelles visibles (zoom maximum)
pub const MIN_SPAN: f64 = 10.0;

/// Fenêtre visible sur la série de chandelles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    start: f64,
    span: f64,
    len: usize,
}

impl Viewport {
    /// Fenêtre initiale : les `visible` dernières chandelles + `padding` vides à droite
    ///
    /// Exemple : 300 chandelles, visible = 100, padding = 5
    /// -> domaine [200, 304]
    pub fn new(len: usize, visible: usize, padding: usize) -> Self {
        let visible = visible.clamp(1, len.max(1));
        let start = len.saturating_sub(visible) as f64;
        let end = len.saturating_sub(1) as f64 + padding as f64;

        Self {
            start,
            span: (end - start).max(MIN_SPAN),
            len,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.start + self.span
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    /// Échelle X pour une zone de `width` colonnes
    ///
    /// La chandelle d'index i est centrée sur la position i du domaine,
    /// d'où la demi-unité de marge de chaque côté.
    pub fn x_scale(&self, width: f64) -> LinearScale {
        LinearScale::new((self.start - 0.5, self.end() + 0.5), (0.0, width))
    }

    /// Index des chandelles au moins partiellement visibles
    pub fn visible_range(&self) -> Range<usize> {
        let first = self.start.floor().max(0.0) as usize;
        let last = (self.end().ceil().max(0.0) as usize + 1).min(self.len);
        first.min(last)..last
    }

    /// Déplace la fenêtre de `dx` pixels (dx > 0 : le contenu glisse à droite)
    ///
    /// Retourne le déplacement réellement appliqué, en unités du domaine.
    /// Il peut différer de la demande quand la fenêtre bute sur les bords.
    pub fn pan_by_pixels(&mut self, dx: f64, width: f64) -> f64 {
        let ppu = self.x_scale(width).pixels_per_unit();
        if ppu == 0.0 || !dx.is_finite() {
            return 0.0;
        }

        let before = self.start;
        self.start = self.clamp_start(self.start - dx / ppu);
        before - self.start
    }

    /// Zoom ancré sur la dernière chandelle visible
    ///
    /// factor < 1 : zoom avant (moins de chandelles), factor > 1 : zoom arrière.
    /// L'ancre garde la même position relative dans la fenêtre.
    pub fn zoom(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let max_span = (self.len as f64).max(MIN_SPAN) * 2.0;
        let new_span = (self.span * factor).clamp(MIN_SPAN, max_span);
        if new_span == self.span {
            return false;
        }

        let last_index = self.len.saturating_sub(1) as f64;
        let anchor = self.end().min(last_index).max(self.start);
        let ratio = (anchor - self.start) / self.span;

        self.span = new_span;
        self.start = self.clamp_start(anchor - ratio * new_span);
        true
    }

    /// Borne start pour garder au moins une chandelle dans la fenêtre
    fn clamp_start(&self, start: f64) -> f64 {
        let min_start = -(self.span - 1.0);
        let max_start = self.len.saturating_sub(1) as f64;
        start.clamp(min_start.min(max_start), max_start)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
