// ============================================================================
// Transformations de coordonnées : domaine <-> pixels
// ============================================================================
// Le chart host convertit les valeurs du domaine (index de chandelle, prix)
// en positions "pixel" (cellules du terminal, en fractions) et inversement.
//
// Le pixel 0 correspond au bord haut/gauche de la surface d'overlay.
// ============================================================================

/// Échelle linéaire sur un axe : domaine [d0, d1] -> plage [r0, r1]
///
/// La plage peut être inversée (r0 > r1) : c'est le cas de l'axe des prix,
/// où un prix plus haut correspond à une ligne plus haute (y plus petit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Mapping direct : valeur du domaine -> position pixel
    pub fn to_pixel(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Mapping inverse : position pixel -> valeur du domaine
    pub fn to_domain(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Nombre de pixels par unité de domaine (signé)
    pub fn pixels_per_unit(&self) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return 0.0;
        }
        (r1 - r0) / (d1 - d0)
    }

    /// Une échelle est utilisable si elle est finie et inversible
    pub fn is_usable(&self) -> bool {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        [d0, d1, r0, r1].iter().all(|v| v.is_finite()) && d0 != d1 && r0 != r1
    }
}

/// Transformation complète du graphique (axe X + axe Y)
///
/// - x : index de chandelle (fractionnaire) -> colonne
/// - y : prix -> ligne
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTransform {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl ChartTransform {
    pub fn new(x: LinearScale, y: LinearScale) -> Self {
        Self { x, y }
    }

    pub fn to_pixel(&self, index: f64, price: f64) -> (f64, f64) {
        (self.x.to_pixel(index), self.y.to_pixel(price))
    }

    pub fn to_domain(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x.to_domain(x), self.y.to_domain(y))
    }

    pub fn is_usable(&self) -> bool {
        self.x.is_usable() && self.y.is_usable()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_inverse() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 50.0));
        assert_eq!(scale.to_pixel(50.0), 25.0);
        assert_eq!(scale.to_domain(25.0), 50.0);
        assert_eq!(scale.pixels_per_unit(), 0.5);
    }

    #[test]
    fn test_inverted_range() {
        // Axe des prix : 110 en haut (pixel 0), 90 en bas (pixel 20)
        let scale = LinearScale::new((90.0, 110.0), (20.0, 0.0));
        assert_eq!(scale.to_pixel(110.0), 0.0);
        assert_eq!(scale.to_pixel(90.0), 20.0);
        assert_eq!(scale.to_domain(10.0), 100.0);
    }

    #[test]
    fn test_degenerate_scale_is_not_usable() {
        assert!(!LinearScale::new((5.0, 5.0), (0.0, 10.0)).is_usable());
        assert!(!LinearScale::new((0.0, 1.0), (3.0, 3.0)).is_usable());
        assert!(!LinearScale::new((0.0, f64::NAN), (0.0, 10.0)).is_usable());

        // Pas de panic sur une échelle dégénérée
        let flat = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(flat.to_pixel(42.0), 0.0);
    }

    #[test]
    fn test_chart_transform() {
        let t = ChartTransform::new(
            LinearScale::new((0.0, 10.0), (0.0, 100.0)),
            LinearScale::new((100.0, 200.0), (40.0, 0.0)),
        );
        assert!(t.is_usable());
        assert_eq!(t.to_pixel(5.0, 150.0), (50.0, 20.0));
        assert_eq!(t.to_domain(50.0, 20.0), (5.0, 150.0));
    }
}
