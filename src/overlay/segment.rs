// ============================================================================
// Segments de ligne en coordonnées pixel
// ============================================================================
// Un segment est créé au relâchement du pointeur, puis ne change plus,
// sauf lors d'une translation globale pendant un pan du graphique.
// ============================================================================

use std::ops::Sub;

/// Point dans l'espace pixel de l'overlay (origine en haut à gauche)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, delta: PixelDelta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }
}

/// Déplacement en pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PixelDelta {
    pub const ZERO: PixelDelta = PixelDelta { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl Sub for PixelDelta {
    type Output = PixelDelta;

    fn sub(self, rhs: PixelDelta) -> PixelDelta {
        PixelDelta::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

/// Segment de droite (x1, y1) - (x2, y2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::from_points(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn from_points(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Retourne une copie translatée (les deux extrémités bougent ensemble)
    pub fn translated(&self, delta: PixelDelta) -> Self {
        Self::from_points(self.start.translated(delta), self.end.translated(delta))
    }

    /// Découpe le segment sur le rectangle [0, width] x [0, height]
    ///
    /// Algorithme de Liang-Barsky. Retourne None si le segment est
    /// entièrement hors du rectangle. Un segment qui sort partiellement
    /// de l'écran après un pan reste ainsi visible sur sa partie intérieure.
    pub fn clipped(&self, width: f64, height: f64) -> Option<Segment> {
        let (x1, y1) = (self.start.x, self.start.y);
        let dx = self.end.x - x1;
        let dy = self.end.y - y1;

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        // (p, q) pour les bords gauche, droit, haut, bas
        let edges = [(-dx, x1), (dx, width - x1), (-dy, y1), (dy, height - y1)];

        for (p, q) in edges {
            if p == 0.0 {
                // Parallèle au bord : dehors si q < 0
                if q < 0.0 {
                    return None;
                }
                continue;
            }

            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        // Les arrondis peuvent sortir d'un epsilon du rectangle
        let clamp = |x: f64, y: f64| (x.clamp(0.0, width), y.clamp(0.0, height));
        let (sx, sy) = clamp(x1 + t0 * dx, y1 + t0 * dy);
        let (ex, ey) = clamp(x1 + t1 * dx, y1 + t1 * dy);

        Some(Segment::new(sx, sy, ex, ey))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_moves_both_endpoints() {
        let segment = Segment::new(10.0, 10.0, 50.0, 50.0);
        let moved = segment.translated(PixelDelta::new(20.0, 0.0));
        assert_eq!(moved, Segment::new(30.0, 10.0, 70.0, 50.0));

        // L'original n'est pas modifié
        assert_eq!(segment, Segment::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_delta_sub() {
        let d = PixelDelta::new(20.0, 5.0) - PixelDelta::new(5.0, 5.0);
        assert_eq!(d, PixelDelta::new(15.0, 0.0));
        assert!((d - d).is_zero());
    }

    #[test]
    fn test_clip_inside_is_unchanged() {
        let segment = Segment::new(1.0, 1.0, 5.0, 5.0);
        assert_eq!(segment.clipped(10.0, 10.0), Some(segment));
    }

    #[test]
    fn test_clip_partially_outside() {
        let segment = Segment::new(-10.0, 5.0, 10.0, 5.0);
        assert_eq!(segment.clipped(20.0, 20.0), Some(Segment::new(0.0, 5.0, 10.0, 5.0)));
    }

    #[test]
    fn test_clip_fully_outside() {
        let segment = Segment::new(-10.0, -10.0, -5.0, -1.0);
        assert_eq!(segment.clipped(20.0, 20.0), None);

        let right = Segment::new(25.0, 1.0, 30.0, 2.0);
        assert_eq!(right.clipped(20.0, 20.0), None);
    }
}
