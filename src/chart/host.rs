// ============================================================================
// Chart Host : le graphique et sa transformation domaine -> pixels
// ============================================================================
// Le host possède les données, le viewport et l'échelle de prix. Il gère
// son propre pan (drag du pointeur, flèches) et son zoom (molette, +/-),
// et publie le cycle de vie du pan :
//
//   Start(current)  ->  Move(previous, current, delta)*  ->  End
//
// Start est toujours émis avant le premier Move d'un geste, End après le
// dernier. Le contrat est typé (PanEvent) : l'overlay valide les
// transformations reçues avant de s'en servir.
// ============================================================================

use std::ops::Range;

use tracing::{debug, trace};

use super::transform::{ChartTransform, LinearScale};
use super::viewport::Viewport;
use crate::config::Settings;
use crate::models::{IndicatorSeries, OHLCData};
use crate::overlay::{PixelDelta, Point};

/// Facteur de zoom pour un cran de molette / une touche
pub const ZOOM_STEP: f64 = 1.25;

/// Charge utile d'une notification de pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    /// Transformation au début du geste (absente pour Start)
    pub previous: Option<ChartTransform>,
    /// Transformation courante
    pub current: Option<ChartTransform>,
    /// Déplacement brut du pointeur depuis le début du geste
    pub delta: PixelDelta,
}

impl PanEvent {
    /// Transformation courante, si elle est exploitable
    ///
    /// Échoue fermé : une transformation absente ou dégénérée donne None,
    /// et l'appelant doit alors ignorer l'événement.
    pub fn validate(&self) -> Option<ChartTransform> {
        self.current.filter(|t| t.is_usable())
    }
}

/// Cycle de vie d'un geste de pan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanNotification {
    Start(PanEvent),
    Move(PanEvent),
    End,
}

#[derive(Debug, Clone, Copy)]
struct PanGesture {
    start_transform: ChartTransform,
    origin: Point,
    last: Point,
}

/// Graphique en chandeliers avec EMA, volume et Elder Ray
#[derive(Debug, Clone)]
pub struct ChartHost {
    data: OHLCData,
    indicators: IndicatorSeries,
    viewport: Viewport,
    price_bounds: (f64, f64),
    plot_width: f64,
    price_height: f64,
    gesture: Option<PanGesture>,
    hover: Option<Point>,
}

impl ChartHost {
    pub fn new(data: OHLCData, settings: &Settings) -> Self {
        let indicators = IndicatorSeries::compute(&data.candles);
        let viewport = Viewport::new(data.len(), settings.visible_candles, settings.right_padding);
        let price_bounds = data.price_bounds().unwrap_or((0.0, 1.0));

        debug!(
            symbol = %data.symbol,
            candles = data.len(),
            ?price_bounds,
            "Chart host created"
        );

        Self {
            data,
            indicators,
            viewport,
            price_bounds,
            plot_width: 0.0,
            price_height: 0.0,
            gesture: None,
            hover: None,
        }
    }

    // ========================================================================
    // Accès
    // ========================================================================

    pub fn data(&self) -> &OHLCData {
        &self.data
    }

    pub fn indicators(&self) -> &IndicatorSeries {
        &self.indicators
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn price_bounds(&self) -> (f64, f64) {
        self.price_bounds
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.viewport.visible_range()
    }

    /// Taille de la zone de tracé : largeur totale et hauteur du panneau de prix
    pub fn set_plot_size(&mut self, width: u16, price_height: u16) {
        self.plot_width = width as f64;
        self.price_height = price_height as f64;
    }

    /// Transformation domaine -> pixels courante
    ///
    /// L'échelle de prix est fixe (calculée sur toute la série) : le pan
    /// est donc purement horizontal.
    pub fn transform(&self) -> ChartTransform {
        ChartTransform::new(
            self.viewport.x_scale(self.plot_width),
            LinearScale::new(self.price_bounds, (self.price_height, 0.0)),
        )
    }

    // ========================================================================
    // Pan au pointeur
    // ========================================================================

    pub fn is_panning(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn pointer_down(&mut self, point: Point) -> Option<PanNotification> {
        if self.gesture.is_some() {
            return None;
        }

        let start_transform = self.transform();
        self.gesture = Some(PanGesture {
            start_transform,
            origin: point,
            last: point,
        });

        debug!(?point, "Pan started");
        Some(PanNotification::Start(PanEvent {
            previous: None,
            current: Some(start_transform),
            delta: PixelDelta::ZERO,
        }))
    }

    pub fn pointer_drag(&mut self, point: Point) -> Option<PanNotification> {
        let gesture = self.gesture.as_mut()?;
        let step = point.x - gesture.last.x;
        gesture.last = point;

        let previous = gesture.start_transform;
        let delta = PixelDelta::new(point.x - gesture.origin.x, point.y - gesture.origin.y);

        if step != 0.0 {
            let shifted = self.viewport.pan_by_pixels(step, self.plot_width);
            trace!(step, shifted, start = self.viewport.start(), "Pan move");
        }

        Some(PanNotification::Move(PanEvent {
            previous: Some(previous),
            current: Some(self.transform()),
            delta,
        }))
    }

    pub fn pointer_up(&mut self) -> Option<PanNotification> {
        self.gesture.take().map(|gesture| {
            debug!(origin = ?gesture.origin, last = ?gesture.last, "Pan ended");
            PanNotification::End
        })
    }

    // ========================================================================
    // Pan clavier et zoom
    // ========================================================================

    /// Pan d'un bloc de `dx` colonnes : un geste complet Start/Move/End
    pub fn pan_by(&mut self, dx: f64) -> Vec<PanNotification> {
        if self.is_panning() {
            return Vec::new();
        }

        let before = self.transform();
        self.viewport.pan_by_pixels(dx, self.plot_width);
        let after = self.transform();
        debug!(dx, start = self.viewport.start(), "Keyboard pan");

        vec![
            PanNotification::Start(PanEvent {
                previous: None,
                current: Some(before),
                delta: PixelDelta::ZERO,
            }),
            PanNotification::Move(PanEvent {
                previous: Some(before),
                current: Some(after),
                delta: PixelDelta::new(dx, 0.0),
            }),
            PanNotification::End,
        ]
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom(1.0 / ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom(ZOOM_STEP)
    }

    fn zoom(&mut self, factor: f64) -> bool {
        if self.is_panning() {
            return false;
        }
        let changed = self.viewport.zoom(factor);
        if changed {
            debug!(factor, span = self.viewport.span(), "Zoom (drawings are not re-projected)");
        }
        changed
    }

    // ========================================================================
    // Crosshair
    // ========================================================================

    pub fn hover(&mut self, point: Option<Point>) {
        self.hover = point;
    }

    pub fn hover_point(&self) -> Option<Point> {
        self.hover
    }

    /// Index de la chandelle sous le pointeur
    pub fn hovered_index(&self) -> Option<usize> {
        let point = self.hover?;
        let index = self.transform().x.to_domain(point.x).round();
        if index < 0.0 || index >= self.data.len() as f64 {
            return None;
        }
        Some(index as usize)
    }

    /// Chandelle à afficher dans les tooltips : survolée, sinon la dernière
    pub fn focus_index(&self) -> Option<usize> {
        self.hovered_index()
            .or_else(|| self.data.len().checked_sub(1))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
