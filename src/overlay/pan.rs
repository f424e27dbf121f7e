// ============================================================================
// Réconciliation du pan
// ============================================================================
// Les segments sont stockés en pixels, le graphique raisonne en domaine.
// Quand le graphique est panné, on recale les segments :
//
// 1. Start : on capture la transformation du graphique (référence)
// 2. Move  : on prend la valeur du domaine sous le pixel 0 avec la
//            référence, on la projette avec la référence et avec la
//            transformation courante ; l'écart donne le delta en pixels
// 3. End   : on oublie la référence
//
// LIMITE CONNUE : un seul point de référence suppose un pan pur
// (translation sans changement d'échelle). Si l'échelle change pendant
// le geste, seuls les points proches du pixel 0 restent alignés.
//
// Le delta brut du pointeur (PanEvent::delta) n'est jamais appliqué : aux
// bords des données le viewport est borné et le graphique ne suit plus le
// pointeur, alors que la comparaison des échelles reste exacte.
// ============================================================================

use tracing::{debug, trace};

use super::controller::DrawingController;
use super::segment::PixelDelta;
use crate::chart::{ChartTransform, PanEvent, PanNotification};

/// Delta pixel induit par le passage de `reference` à `current`
///
/// Point de référence : la valeur du domaine au pixel 0 sous `reference`.
pub fn reference_delta(reference: &ChartTransform, current: &ChartTransform) -> PixelDelta {
    let domain_x = reference.x.to_domain(0.0);
    let domain_y = reference.y.to_domain(0.0);

    PixelDelta::new(
        current.x.to_pixel(domain_x) - reference.x.to_pixel(domain_x),
        current.y.to_pixel(domain_y) - reference.y.to_pixel(domain_y),
    )
}

/// État d'un geste de pan côté overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanReconciler {
    reference: Option<ChartTransform>,
    applied: PixelDelta,
}

impl PanReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Référence capturée pour le geste en cours
    pub fn reference(&self) -> Option<&ChartTransform> {
        self.reference.as_ref()
    }

    /// Dispatch d'une notification du chart host
    ///
    /// Retourne le delta appliqué aux segments, s'il y en a un.
    pub fn handle(
        &mut self,
        notification: &PanNotification,
        drawing: &mut DrawingController,
    ) -> Option<PixelDelta> {
        match notification {
            PanNotification::Start(event) => {
                drawing.set_panning(true);
                self.begin(event);
                None
            }
            PanNotification::Move(event) => self.progress(event, drawing),
            PanNotification::End => {
                self.end();
                drawing.set_panning(false);
                None
            }
        }
    }

    pub fn begin(&mut self, event: &PanEvent) {
        self.applied = PixelDelta::ZERO;
        self.reference = event.validate();

        if self.reference.is_none() {
            debug!("Pan started without a usable transform, drawings will not follow");
        }
    }

    /// Recale les segments sur la transformation courante
    ///
    /// Le delta est calculé depuis le début du geste ; seul l'incrément
    /// par rapport au dernier Move est appliqué.
    pub fn progress(&mut self, event: &PanEvent, drawing: &mut DrawingController) -> Option<PixelDelta> {
        if !drawing.has_segments() {
            return None;
        }

        let Some(reference) = self.reference else {
            trace!("No reference transform, pan move ignored");
            return None;
        };

        let Some(current) = event.validate() else {
            debug!(?event, "Invalid pan payload, pan move ignored");
            return None;
        };

        let total = reference_delta(&reference, &current);
        let step = total - self.applied;
        self.applied = total;

        if step.is_zero() {
            return None;
        }

        drawing.translate_segments(step);
        trace!(dx = step.dx, dy = step.dy, pointer = ?event.delta, "Segments translated");
        Some(step)
    }

    pub fn end(&mut self) {
        self.reference = None;
        self.applied = PixelDelta::ZERO;
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LinearScale;
    use crate::overlay::{DrawModifier, Segment};

    fn transform(x_domain: (f64, f64)) -> ChartTransform {
        ChartTransform::new(
            LinearScale::new(x_domain, (0.0, 100.0)),
            LinearScale::new((90.0, 110.0), (20.0, 0.0)),
        )
    }

    fn start(t: ChartTransform) -> PanNotification {
        PanNotification::Start(PanEvent {
            previous: None,
            current: Some(t),
            delta: PixelDelta::ZERO,
        })
    }

    fn moved(previous: ChartTransform, current: ChartTransform) -> PanNotification {
        PanNotification::Move(PanEvent {
            previous: Some(previous),
            current: Some(current),
            delta: PixelDelta::ZERO,
        })
    }

    fn drawing_with(segment: Segment) -> DrawingController {
        let mut drawing = DrawingController::default();
        drawing.key_down(DrawModifier::Ctrl);
        drawing.pointer_down(segment.start);
        drawing.pointer_up(segment.end);
        drawing.key_up(DrawModifier::Ctrl);
        drawing
    }

    #[test]
    fn test_reference_delta() {
        // Domaine décalé de 20 unités vers la gauche à 1 px/unité : +20 px
        let delta = reference_delta(&transform((0.0, 100.0)), &transform((-20.0, 80.0)));
        assert_eq!(delta, PixelDelta::new(20.0, 0.0));
    }

    #[test]
    fn test_pan_translates_segments() {
        let mut drawing = drawing_with(Segment::new(10.0, 10.0, 50.0, 50.0));
        let mut reconciler = PanReconciler::new();
        let t0 = transform((0.0, 100.0));
        let t1 = transform((-20.0, 80.0));

        reconciler.handle(&start(t0), &mut drawing);
        assert!(drawing.is_panning());

        let applied = reconciler.handle(&moved(t0, t1), &mut drawing);
        assert_eq!(applied, Some(PixelDelta::new(20.0, 0.0)));
        assert_eq!(drawing.segments()[0], Segment::new(30.0, 10.0, 70.0, 50.0));

        reconciler.handle(&PanNotification::End, &mut drawing);
        assert!(!drawing.is_panning());
        assert!(reconciler.reference().is_none());
    }

    #[test]
    fn test_successive_moves_do_not_accumulate() {
        let mut drawing = drawing_with(Segment::new(10.0, 10.0, 50.0, 50.0));
        let mut reconciler = PanReconciler::new();
        let t0 = transform((0.0, 100.0));

        reconciler.handle(&start(t0), &mut drawing);
        reconciler.handle(&moved(t0, transform((-10.0, 90.0))), &mut drawing);
        reconciler.handle(&moved(t0, transform((-20.0, 80.0))), &mut drawing);
        // Retour partiel en arrière
        reconciler.handle(&moved(t0, transform((-15.0, 85.0))), &mut drawing);

        assert_eq!(drawing.segments()[0], Segment::new(25.0, 10.0, 65.0, 50.0));
    }

    #[test]
    fn test_zero_delta_is_identity() {
        let segment = Segment::new(10.0, 10.0, 50.0, 50.0);
        let mut drawing = drawing_with(segment);
        let mut reconciler = PanReconciler::new();
        let t0 = transform((0.0, 100.0));

        reconciler.handle(&start(t0), &mut drawing);
        assert_eq!(reconciler.handle(&moved(t0, t0), &mut drawing), None);
        assert_eq!(drawing.segments(), &[segment]);
    }

    #[test]
    fn test_no_segments_fast_path() {
        let mut drawing = DrawingController::default();
        let mut reconciler = PanReconciler::new();
        let before = (drawing.clone(), reconciler.clone());
        let t0 = transform((0.0, 100.0));

        reconciler.handle(&start(t0), &mut drawing);
        assert_eq!(reconciler.handle(&moved(t0, transform((-500.0, -400.0))), &mut drawing), None);
        reconciler.handle(&PanNotification::End, &mut drawing);

        assert_eq!((drawing, reconciler), before);
    }

    #[test]
    fn test_missing_start_skips_reconciliation() {
        let segment = Segment::new(10.0, 10.0, 50.0, 50.0);
        let mut drawing = drawing_with(segment);
        let mut reconciler = PanReconciler::new();

        let applied = reconciler.handle(
            &moved(transform((0.0, 100.0)), transform((-20.0, 80.0))),
            &mut drawing,
        );
        assert_eq!(applied, None);
        assert_eq!(drawing.segments(), &[segment]);
    }

    #[test]
    fn test_unusable_start_transform_skips_gesture() {
        let segment = Segment::new(10.0, 10.0, 50.0, 50.0);
        let mut drawing = drawing_with(segment);
        let mut reconciler = PanReconciler::new();
        let broken = transform((5.0, 5.0));

        reconciler.handle(&start(broken), &mut drawing);
        reconciler.handle(&moved(broken, transform((-20.0, 80.0))), &mut drawing);
        assert_eq!(drawing.segments(), &[segment]);
    }

    #[test]
    fn test_invalid_move_payload_is_skipped() {
        let segment = Segment::new(10.0, 10.0, 50.0, 50.0);
        let mut drawing = drawing_with(segment);
        let mut reconciler = PanReconciler::new();
        let t0 = transform((0.0, 100.0));

        reconciler.handle(&start(t0), &mut drawing);
        let event = PanNotification::Move(PanEvent {
            previous: Some(t0),
            current: None,
            delta: PixelDelta::new(20.0, 0.0),
        });
        assert_eq!(reconciler.handle(&event, &mut drawing), None);
        assert_eq!(drawing.segments(), &[segment]);
    }

    #[test]
    fn test_zoom_during_pan_drifts_away_from_reference() {
        // Limite du point de référence unique : pan + zoom simultanés
        let mut drawing = drawing_with(Segment::new(0.0, 10.0, 50.0, 10.0));
        let mut reconciler = PanReconciler::new();
        let t0 = transform((0.0, 100.0));
        // Décalage de 10 unités ET domaine deux fois plus étroit
        let t1 = transform((-10.0, 40.0));

        reconciler.handle(&start(t0), &mut drawing);
        reconciler.handle(&moved(t0, t1), &mut drawing);
        let segment = drawing.segments()[0];

        // L'extrémité au pixel 0 suit exactement sa valeur du domaine...
        let start_domain = t0.x.to_domain(0.0);
        assert_eq!(segment.start.x, t1.x.to_pixel(start_domain));

        // ...mais pas l'autre : la valeur 50 devrait être à 120 px, pas à 70
        let end_domain = t0.x.to_domain(50.0);
        let exact = t1.x.to_pixel(end_domain);
        assert_eq!(exact, 120.0);
        assert_eq!(segment.end.x, 70.0);
        assert_ne!(segment.end.x, exact);

        // Sans changement d'échelle, les deux extrémités restent alignées
        let mut drawing = drawing_with(Segment::new(0.0, 10.0, 50.0, 10.0));
        let mut reconciler = PanReconciler::new();
        let t2 = transform((-10.0, 90.0));
        reconciler.handle(&start(t0), &mut drawing);
        reconciler.handle(&moved(t0, t2), &mut drawing);
        let segment = drawing.segments()[0];
        assert_eq!(segment.end.x, t2.x.to_pixel(end_domain));
    }
}
