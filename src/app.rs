// ============================================================================
// Structure : App
// ============================================================================
// État global de l'application : le graphique (ChartHost), la couche de
// dessin (DrawingController), le recalage des segments pendant le pan
// (PanReconciler) et le découpage de l'écran (ChartLayout).
//
// ROUTAGE DU POINTEUR :
// - modificateur tenu et pas de pan en cours : l'overlay consomme le
//   pointeur (dessin de segments)
// - sinon : le pointeur passe au graphique (pan, zoom molette, crosshair)
//
// Chaque notification de pan du graphique est transmise au PanReconciler,
// qui translate les segments pour qu'ils restent accrochés au graphique.
// ============================================================================

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::chart::{ChartHost, ChartLayout, PanNotification};
use crate::config::Settings;
use crate::models::{sample::generate_sample_data, OHLCData};
use crate::overlay::{DrawModifier, DrawingController, PanReconciler, StrokeStyle};
use crate::ui::events::modifier_held_in;

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' -> confirmation demandée
    pub confirm_quit: bool,

    settings: Settings,
    host: ChartHost,
    drawing: DrawingController,
    reconciler: PanReconciler,
    layout: ChartLayout,
    area: Rect,
}

impl App {
    /// Application sur la série d'exemple décrite par les réglages
    pub fn new(settings: Settings) -> Self {
        let data = generate_sample_data(&settings.symbol, settings.sample_candles);
        Self::with_data(data, settings)
    }

    pub fn with_data(data: OHLCData, settings: Settings) -> Self {
        let host = ChartHost::new(data, &settings);
        let drawing = DrawingController::new(settings.draw_modifier, settings.segment_cap);

        Self {
            running: true,
            confirm_quit: false,
            settings,
            host,
            drawing,
            reconciler: PanReconciler::new(),
            layout: ChartLayout::default(),
            area: Rect::default(),
        }
    }

    // ========================================================================
    // Accès (lecture seule, pour le rendu)
    // ========================================================================

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn host(&self) -> &ChartHost {
        &self.host
    }

    pub fn drawing(&self) -> &DrawingController {
        &self.drawing
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        self.settings.stroke_style()
    }

    /// Crosshair visible seulement quand le pointeur va au graphique
    pub fn crosshair_visible(&self) -> bool {
        self.drawing.pointer_passthrough() && self.host.hover_point().is_some()
    }

    // ========================================================================
    // Taille de l'écran
    // ========================================================================

    /// Recalcule le layout pour une nouvelle taille de terminal
    ///
    /// Les segments restent en coordonnées pixel : ils ne sont pas
    /// re-projetés quand la zone de tracé change de taille.
    pub fn resize(&mut self, area: Rect) {
        if area == self.area {
            return;
        }

        self.area = area;
        self.layout = ChartLayout::new(area);
        self.host
            .set_plot_size(self.layout.overlay.width, self.layout.price.height);

        debug!(
            width = area.width,
            height = area.height,
            overlay = ?self.layout.overlay,
            "Layout updated"
        );
    }

    // ========================================================================
    // Souris
    // ========================================================================

    pub fn mouse(&mut self, mouse: MouseEvent) {
        // Les bits de modificateur accompagnent chaque événement souris
        let held = modifier_held_in(mouse.modifiers, self.drawing.modifier());
        self.drawing.sync_modifier(held);

        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(point) = self.layout.to_overlay_point(column, row) else {
                    return;
                };

                if self.drawing.pointer_passthrough() {
                    if let Some(notification) = self.host.pointer_down(point) {
                        self.dispatch(notification);
                    }
                } else {
                    self.host.hover(None);
                    self.drawing.pointer_down(point);
                }
            }

            MouseEventKind::Drag(MouseButton::Left) => {
                let point = self.layout.overlay_relative(column, row);

                if self.drawing.is_drawing() {
                    self.drawing
                        .pointer_move(self.layout.clamp_to_overlay(point));
                } else if self.host.is_panning() {
                    if let Some(notification) = self.host.pointer_drag(point) {
                        self.dispatch(notification);
                    }
                }
            }

            MouseEventKind::Up(MouseButton::Left) => {
                if self.drawing.is_drawing() {
                    let point = self
                        .layout
                        .clamp_to_overlay(self.layout.overlay_relative(column, row));
                    self.drawing.pointer_up(point);
                } else if let Some(notification) = self.host.pointer_up() {
                    self.dispatch(notification);
                }
            }

            MouseEventKind::Moved => {
                self.host.hover(self.layout.to_overlay_point(column, row));
            }

            MouseEventKind::ScrollUp if self.drawing.pointer_passthrough() => {
                if self.layout.to_overlay_point(column, row).is_some() {
                    self.zoom_in();
                }
            }

            MouseEventKind::ScrollDown if self.drawing.pointer_passthrough() => {
                if self.layout.to_overlay_point(column, row).is_some() {
                    self.zoom_out();
                }
            }

            _ => {}
        }
    }

    fn dispatch(&mut self, notification: PanNotification) {
        self.reconciler.handle(&notification, &mut self.drawing);
    }

    // ========================================================================
    // Clavier
    // ========================================================================

    pub fn modifier_pressed(&mut self, modifier: DrawModifier) {
        self.drawing.key_down(modifier);
    }

    pub fn modifier_released(&mut self, modifier: DrawModifier) {
        self.drawing.key_up(modifier);
    }

    /// Perte du focus : le modificateur est considéré relâché
    pub fn focus_lost(&mut self) {
        debug!("Focus lost");
        self.drawing.focus_lost();
        self.host.hover(None);
    }

    /// ← : recule dans le temps (le contenu glisse vers la droite)
    pub fn pan_left(&mut self) {
        self.pan_by(self.settings.pan_step as f64);
    }

    /// → : avance dans le temps
    pub fn pan_right(&mut self) {
        self.pan_by(-(self.settings.pan_step as f64));
    }

    fn pan_by(&mut self, dx: f64) {
        if self.drawing.is_drawing() {
            return;
        }
        for notification in self.host.pan_by(dx) {
            self.dispatch(notification);
        }
    }

    pub fn zoom_in(&mut self) {
        self.host.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.host.zoom_out();
    }

    /// Efface toute la couche de dessin
    pub fn clear_drawings(&mut self) {
        info!(count = self.drawing.segment_count(), "Drawings cleared");
        self.drawing.clear();
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
