// ============================================================================
// Layout du graphique
// ============================================================================
// Découpe l'écran en zones :
//
//   ┌ header (3 lignes) ─────────────────────────────┐
//   ┌ corps du graphique ────────────────────────────┐
//   │ prix (chandeliers + EMA, volume en bas) │ axe Y │
//   │ Elder Ray                               │ axe Y │
//   │ axe X (dates)                           │       │
//   └────────────────────────────────────────────────┘
//   footer (1 ligne)
//
// L'overlay de dessin couvre exactement prix + Elder Ray : c'est la surface
// dont l'origine (0, 0) sert de référence à toutes les coordonnées pixel.
// ============================================================================

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

use crate::overlay::Point;

/// Largeur de l'axe des prix (à droite, comme dans la plupart des plateformes)
pub const Y_AXIS_WIDTH: u16 = 11;

/// Hauteur du sous-panneau Elder Ray (titre inclus)
pub const ELDER_ROWS: u16 = 7;

/// Dimensions minimales pour afficher le graphique
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

/// Zones calculées pour une taille d'écran donnée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub price: Rect,
    pub volume: Rect,
    pub elder: Rect,
    pub x_axis: Rect,
    pub price_axis: Rect,
    pub elder_axis: Rect,
    pub overlay: Rect,
}

impl ChartLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Graphique
                Constraint::Length(1), // Footer
            ])
            .split(area)
            .to_vec();

        let body = rows[1];
        let inner = body.inner(&Margin::new(1, 1));

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(Y_AXIS_WIDTH)])
            .split(inner)
            .to_vec();

        let panel_constraints = [
            Constraint::Min(0),
            Constraint::Length(ELDER_ROWS),
            Constraint::Length(1),
        ];
        let plot = Layout::default()
            .direction(Direction::Vertical)
            .constraints(panel_constraints)
            .split(columns[0])
            .to_vec();
        let axis = Layout::default()
            .direction(Direction::Vertical)
            .constraints(panel_constraints)
            .split(columns[1])
            .to_vec();

        let price = plot[0];
        let elder = plot[1];

        // Volume : quart inférieur du panneau de prix
        let volume_height = price.height / 4;
        let volume = Rect {
            y: price.y + price.height - volume_height,
            height: volume_height,
            ..price
        };

        let overlay = Rect {
            height: price.height + elder.height,
            ..price
        };

        Self {
            header: rows[0],
            body,
            footer: rows[2],
            price,
            volume,
            elder,
            x_axis: plot[2],
            price_axis: axis[0],
            elder_axis: axis[1],
            overlay,
        }
    }

    /// L'écran est-il assez grand pour le graphique ?
    pub fn fits(area: Rect) -> bool {
        area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
    }

    /// Position relative à l'overlay, même hors de la surface
    ///
    /// Une cellule est adressée par son centre : la colonne 3 devient x = 3.5.
    pub fn overlay_relative(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as f64 - self.overlay.x as f64 + 0.5,
            row as f64 - self.overlay.y as f64 + 0.5,
        )
    }

    /// Position relative à l'overlay, seulement si la cellule est dessus
    pub fn to_overlay_point(&self, column: u16, row: u16) -> Option<Point> {
        let inside = column >= self.overlay.x
            && column < self.overlay.x + self.overlay.width
            && row >= self.overlay.y
            && row < self.overlay.y + self.overlay.height;

        inside.then(|| self.overlay_relative(column, row))
    }

    /// Ramène un point sur la surface de l'overlay
    pub fn clamp_to_overlay(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, self.overlay.width as f64),
            point.y.clamp(0.0, self.overlay.height as f64),
        )
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
