// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Utilise des caractères Unicode pour dessiner les chandeliers japonais,
// positionnés par la transformation du graphique (ChartTransform) : la
// même qui sert à recaler les segments de l'overlay.
//
// ALGORITHME :
// - Rendu vertical : ligne par ligne de haut en bas
// - Pour chaque ligne, on détermine quel caractère Unicode afficher
// - Logique des 3 zones : mèche supérieure, corps, mèche inférieure
// - Seuils fractionnaires (0.25, 0.75) pour précision sub-caractère
// - Volume : barres en blocs 1/8 dans le quart bas du panneau, derrière
//   les chandeliers
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╻ Demi-corps (bas)     ╹ Demi-corps (haut)
// ╽ Transition top       ╿ Transition bottom
// ╷ Demi-mèche sup       ╵ Demi-mèche inf
// ============================================================================

use std::ops::Range;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::chart::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::chart::ChartTransform;
use crate::models::OHLC;

// ============================================================================
// Constantes
// ============================================================================

/// Caractères Unicode pour le rendu des chandeliers
const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃';              // Corps plein
const UNICODE_HALF_BODY_BOTTOM: char = '╻';  // Corps avec espace en bas
const UNICODE_HALF_BODY_TOP: char = '╹';     // Corps avec espace en haut
const UNICODE_WICK: char = '│';              // Mèche pleine
const UNICODE_TOP: char = '╽';               // Transition corps→mèche (haut)
const UNICODE_BOTTOM: char = '╿';            // Transition corps→mèche (bas)
const UNICODE_UPPER_WICK: char = '╷';        // Demi-mèche supérieure
const UNICODE_LOWER_WICK: char = '╵';        // Demi-mèche inférieure

/// Barres de volume, du 1/8 au bloc plein
const VOLUME_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Couleurs pour chandeliers haussiers et baissiers
pub const BULLISH_COLOR: Color = Color::Rgb(52, 208, 88);   // Vert
pub const BEARISH_COLOR: Color = Color::Rgb(234, 74, 90);   // Rouge

/// Volume : mêmes teintes, assombries pour rester en arrière-plan
const BULLISH_VOLUME_COLOR: Color = Color::Rgb(26, 96, 44);
const BEARISH_VOLUME_COLOR: Color = Color::Rgb(112, 36, 44);

/// Un label de prix toutes les 4 lignes
const Y_LABEL_EVERY: u16 = 4;

/// Espace minimum entre deux dates de l'axe X
const MIN_DATE_SPACING: usize = 3;

// ============================================================================
// Structure principale
// ============================================================================

/// Renderer de chandeliers japonais en mode texte
pub struct CandlestickRenderer<'a> {
    candles: &'a [OHLC],
    transform: ChartTransform,
    visible: Range<usize>,
    width: u16,
    height: u16,
    volume_rows: u16,
    max_volume: u64,
}

impl<'a> CandlestickRenderer<'a> {
    /// Crée un renderer pour le panneau de prix
    ///
    /// `width` x `height` : taille du panneau, `volume_rows` : lignes du bas
    /// réservées aux barres de volume.
    pub fn new(
        candles: &'a [OHLC],
        transform: ChartTransform,
        visible: Range<usize>,
        width: u16,
        height: u16,
        volume_rows: u16,
    ) -> Self {
        let end = visible.end.min(candles.len());
        let visible = visible.start.min(end)..end;
        let max_volume = candles[visible.clone()]
            .iter()
            .map(|c| c.volume)
            .max()
            .unwrap_or(0);

        Self {
            candles,
            transform,
            visible,
            width,
            height,
            volume_rows,
            max_volume,
        }
    }

    /// Convertit un prix en coordonnée de hauteur (0 = bas du panneau)
    fn price_to_height(&self, price: f64) -> f64 {
        self.height as f64 - self.transform.y.to_pixel(price)
    }

    /// Colonne du panneau où tombe le centre de la chandelle `index`
    fn column_of(&self, index: usize) -> Option<usize> {
        let x = self.transform.x.to_pixel(index as f64);
        (x >= 0.0 && x < self.width as f64).then(|| x.floor() as usize)
    }

    /// Retourne la couleur du chandelier
    fn candle_color(candle: &OHLC) -> Color {
        if candle.is_bullish() {
            BULLISH_COLOR
        } else {
            BEARISH_COLOR
        }
    }

    fn volume_color(candle: &OHLC) -> Color {
        if candle.is_bullish() {
            BULLISH_VOLUME_COLOR
        } else {
            BEARISH_VOLUME_COLOR
        }
    }

    /// Rend un chandelier à une hauteur donnée
    ///
    /// Ceci est le cœur de l'algorithme, adapté de cli-candlestick-chart.
    /// Il détermine quel caractère Unicode afficher selon la position verticale.
    fn render_candle(&self, candle: &OHLC, y: u16) -> char {
        let height_unit = y as f64;

        // Convertit les prix en coordonnées de hauteur
        let high_y = self.price_to_height(candle.high);
        let low_y = self.price_to_height(candle.low);
        let max_y = self.price_to_height(candle.open.max(candle.close));
        let min_y = self.price_to_height(candle.close.min(candle.open));

        let mut output = UNICODE_VOID;

        // ZONE 1 : Mèche supérieure (high → max)
        if high_y.ceil() >= height_unit && height_unit >= max_y.floor() {
            if max_y - height_unit > 0.75 {
                output = UNICODE_BODY;
            } else if (max_y - height_unit) > 0.25 {
                if (high_y - height_unit) > 0.75 {
                    output = UNICODE_TOP;
                } else {
                    output = UNICODE_HALF_BODY_BOTTOM;
                }
            } else if (high_y - height_unit) > 0.75 {
                output = UNICODE_WICK;
            } else if (high_y - height_unit) > 0.25 {
                output = UNICODE_UPPER_WICK;
            }
        }
        // ZONE 2 : Corps (min → max)
        else if max_y.floor() >= height_unit && height_unit >= min_y.ceil() {
            output = UNICODE_BODY;
        }
        // ZONE 3 : Mèche inférieure (min → low)
        else if min_y.ceil() >= height_unit && height_unit >= low_y.floor() {
            if (min_y - height_unit) < 0.25 {
                output = UNICODE_BODY;
            } else if (min_y - height_unit) < 0.75 {
                if (low_y - height_unit) < 0.25 {
                    output = UNICODE_BOTTOM;
                } else {
                    output = UNICODE_HALF_BODY_TOP;
                }
            } else if low_y - height_unit < 0.25 {
                output = UNICODE_WICK;
            } else if low_y - height_unit < 0.75 {
                output = UNICODE_LOWER_WICK;
            }
        }

        output
    }

    /// Caractère de la barre de volume à la ligne `row` (0 = ligne du bas)
    fn render_volume(&self, candle: &OHLC, row: u16) -> char {
        if self.max_volume == 0 || row >= self.volume_rows {
            return UNICODE_VOID;
        }

        let bar = candle.volume as f64 / self.max_volume as f64 * self.volume_rows as f64;
        let fill = bar - row as f64;

        if fill >= 1.0 {
            VOLUME_BLOCKS[7]
        } else if fill > 0.0 {
            let eighths = (fill * 8.0).round().clamp(1.0, 8.0) as usize;
            VOLUME_BLOCKS[eighths - 1]
        } else {
            UNICODE_VOID
        }
    }

    /// Grille (caractère, couleur) du panneau, ligne 0 en haut
    fn render_grid(&self) -> Vec<Vec<(char, Color)>> {
        let width = self.width as usize;
        let mut grid = vec![vec![(UNICODE_VOID, Color::Reset); width]; self.height as usize];

        for index in self.visible.clone() {
            let Some(column) = self.column_of(index) else {
                continue;
            };
            let candle = &self.candles[index];

            for (row, line) in grid.iter_mut().enumerate() {
                // Hauteur depuis le bas, comme dans render_candle (1..=height)
                let y = self.height - row as u16;

                let ch = self.render_candle(candle, y);
                if ch != UNICODE_VOID {
                    line[column] = (ch, Self::candle_color(candle));
                    continue;
                }

                let vol = self.render_volume(candle, y - 1);
                if vol != UNICODE_VOID {
                    line[column] = (vol, Self::volume_color(candle));
                }
            }
        }

        grid
    }

    /// Génère toutes les lignes du panneau de prix
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        self.render_grid()
            .into_iter()
            .map(|row| {
                // Regroupe les cellules consécutives de même couleur en un Span
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut run = String::new();
                let mut run_color = Color::Reset;

                for (ch, color) in row {
                    if color != run_color && !run.is_empty() {
                        spans.push(Span::styled(
                            std::mem::take(&mut run),
                            Style::default().fg(run_color),
                        ));
                    }
                    run_color = color;
                    run.push(ch);
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, Style::default().fg(run_color)));
                }

                Line::from(spans)
            })
            .collect()
    }
}

// ============================================================================
// Axes
// ============================================================================

/// Style des étiquettes posées sur un axe (dernière clôture, crosshair)
fn axis_tag_style(fg: Color, bg: Color) -> Style {
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}

/// Ligne de l'axe des prix qui contient l'ordonnée `y`, si elle est visible
fn axis_row(y: f64, height: u16) -> Option<u16> {
    (y.is_finite() && y >= 0.0 && y < height as f64).then(|| y.floor() as u16)
}

/// Labels de l'axe des prix (à droite du panneau)
///
/// Deux étiquettes remplacent le label de leur ligne :
/// - la dernière clôture, sur fond vert ou rouge selon la dernière chandelle
/// - le prix sous le crosshair (`hover_y`, en pixels du panneau), prioritaire
pub fn price_axis_lines(
    transform: &ChartTransform,
    height: u16,
    last: Option<&OHLC>,
    hover_y: Option<f64>,
) -> Vec<Line<'static>> {
    let last_row = last.and_then(|candle| {
        axis_row(transform.y.to_pixel(candle.close), height).map(|row| (row, candle))
    });
    let hover = hover_y.and_then(|y| axis_row(y, height).map(|row| (row, y)));

    (0..height)
        .map(|row| match (hover, last_row) {
            (Some((hover_row, y)), _) if hover_row == row => Line::from(Span::styled(
                format!("◀{:>9.2}", transform.y.to_domain(y)),
                axis_tag_style(Color::White, Color::DarkGray),
            )),
            (_, Some((last_row, candle))) if last_row == row => Line::from(Span::styled(
                format!("◀{:>9.2}", candle.close),
                axis_tag_style(Color::Black, CandlestickRenderer::candle_color(candle)),
            )),
            _ if row % Y_LABEL_EVERY == 0 => {
                let price = transform.y.to_domain(row as f64 + 0.5);
                Line::from(Span::styled(
                    format!("┤{:>9.2}", price),
                    Style::default().fg(Color::Gray),
                ))
            }
            _ => Line::from(Span::styled("│", Style::default().fg(Color::DarkGray))),
        })
        .collect()
}

/// Axe des dates : "04 Mar" sous la chandelle, sans chevauchement
///
/// La date complète de la chandelle `hovered` est écrite par-dessus,
/// centrée sous le crosshair.
pub fn date_axis_line(
    candles: &[OHLC],
    transform: &ChartTransform,
    visible: Range<usize>,
    width: u16,
    hovered: Option<usize>,
) -> Line<'static> {
    let width = width as usize;
    let mut text: Vec<char> = vec![' '; width];
    let mut next_free = 0;

    for index in visible {
        let Some(candle) = candles.get(index) else {
            break;
        };
        let x = transform.x.to_pixel(index as f64);
        if x < 0.0 {
            continue;
        }

        let column = x.floor() as usize;
        let label = candle.timestamp.format("%d %b").to_string();
        let label_len = label.chars().count();

        if column < next_free || column + label_len > width {
            continue;
        }

        for (offset, ch) in label.chars().enumerate() {
            text[column + offset] = ch;
        }
        next_free = column + label_len + MIN_DATE_SPACING;
    }

    let base = Style::default().fg(Color::Gray);

    let Some((start, tag)) = hovered.and_then(|index| hover_date_tag(candles, transform, index, width))
    else {
        return Line::from(Span::styled(text.into_iter().collect::<String>(), base));
    };

    let end = start + tag.chars().count();
    Line::from(vec![
        Span::styled(text[..start].iter().collect::<String>(), base),
        Span::styled(tag, axis_tag_style(Color::White, Color::DarkGray)),
        Span::styled(text[end..].iter().collect::<String>(), base),
    ])
}

/// Colonne de départ et texte de l'étiquette de date du crosshair
fn hover_date_tag(
    candles: &[OHLC],
    transform: &ChartTransform,
    index: usize,
    width: usize,
) -> Option<(usize, String)> {
    let candle = candles.get(index)?;
    let tag = format!(" {} ", candle.timestamp.format("%d/%m/%y"));
    let len = tag.chars().count();

    let x = transform.x.to_pixel(index as f64);
    if len > width || !x.is_finite() || x < 0.0 || x >= width as f64 {
        return None;
    }

    let start = (x.floor() as usize).saturating_sub(len / 2).min(width - len);
    Some((start, tag))
}

// ============================================================================
// Helpers : messages
// ============================================================================

/// Affiche un message quand il n'y a pas de données
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[q] Quitter",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Affiche un message quand le terminal est trop petit
pub fn render_too_small(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ⚠ Terminal trop petit ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Terminal trop petit pour afficher le graphique",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Taille minimale requise : {} x {}", MIN_WIDTH, MIN_HEIGHT),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LinearScale;
    use chrono::{TimeZone, Utc};

    fn candle(open: f64, high: f64, low: f64, close: f64, volume: u64) -> OHLC {
        let ts = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        OHLC::new(ts, open, high, low, close, volume)
    }

    /// 3 chandelles sur 3 colonnes, prix 0..10 sur 10 lignes
    fn transform() -> ChartTransform {
        ChartTransform::new(
            LinearScale::new((-0.5, 2.5), (0.0, 3.0)),
            LinearScale::new((0.0, 10.0), (10.0, 0.0)),
        )
    }

    #[test]
    fn test_candle_columns_follow_transform() {
        let candles = vec![
            candle(2.0, 8.0, 1.0, 7.0, 10),
            candle(7.0, 9.0, 3.0, 4.0, 20),
            candle(4.0, 6.0, 2.0, 5.0, 5),
        ];
        let renderer = CandlestickRenderer::new(&candles, transform(), 0..3, 3, 10, 0);
        let grid = renderer.render_grid();

        // Corps haussier de la première chandelle, en vert
        assert_eq!(grid[5][0], (UNICODE_BODY, BULLISH_COLOR));
        // Corps baissier de la deuxième, en rouge
        assert_eq!(grid[4][1].1, BEARISH_COLOR);
        // Rien au-dessus du plus haut
        assert_eq!(grid[0][0].0, UNICODE_VOID);
    }

    #[test]
    fn test_volume_behind_candles() {
        let candles = vec![candle(8.0, 9.0, 7.0, 8.5, 100), candle(8.0, 9.0, 7.0, 8.5, 50)];
        let renderer = CandlestickRenderer::new(&candles, transform(), 0..2, 3, 10, 2);
        let grid = renderer.render_grid();

        // Plus gros volume : deux lignes pleines
        assert_eq!(grid[9][0].0, '█');
        assert_eq!(grid[8][0].0, '█');
        // Moitié du volume max : une ligne
        assert_eq!(grid[9][1].0, '█');
        assert_eq!(grid[8][1].0, UNICODE_VOID);
    }

    #[test]
    fn test_render_lines_height() {
        let candles = vec![candle(2.0, 8.0, 1.0, 7.0, 10)];
        let renderer = CandlestickRenderer::new(&candles, transform(), 0..1, 3, 10, 2);
        let lines = renderer.render_lines();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.width() == 3));
    }

    #[test]
    fn test_out_of_range_visible_is_clamped() {
        let candles = vec![candle(2.0, 8.0, 1.0, 7.0, 10)];
        let renderer = CandlestickRenderer::new(&candles, transform(), 0..50, 3, 10, 2);
        assert_eq!(renderer.render_lines().len(), 10);
    }

    #[test]
    fn test_date_axis_avoids_overlap() {
        let candles = vec![candle(1.0, 2.0, 0.5, 1.5, 1); 3];
        let line = date_axis_line(&candles, &transform(), 0..3, 20, None);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text.matches("04 Mar").count(), 1);
        assert_eq!(text.chars().count(), 20);
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_date_axis_shows_hovered_date() {
        let candles = vec![candle(1.0, 2.0, 0.5, 1.5, 1); 3];
        let line = date_axis_line(&candles, &transform(), 0..3, 20, Some(1));

        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, " 04/03/24 ");
        assert_eq!(line.spans[1].style.bg, Some(Color::DarkGray));
        // Centrée sur la colonne 1, ramenée au bord gauche
        assert!(line_text(&line).starts_with(" 04/03/24 "));
        assert_eq!(line_text(&line).chars().count(), 20);
    }

    #[test]
    fn test_date_axis_ignores_hover_outside_panel() {
        let candles = vec![candle(1.0, 2.0, 0.5, 1.5, 1); 3];
        let line = date_axis_line(&candles, &transform(), 0..3, 20, Some(7));
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn test_price_axis_marks_last_close() {
        let bullish = candle(2.0, 8.0, 1.0, 7.0, 10);
        let lines = price_axis_lines(&transform(), 10, Some(&bullish), None);

        // Clôture à 7.0 : pixel 3.0, ligne 3
        assert_eq!(line_text(&lines[3]), "◀     7.00");
        assert_eq!(lines[3].spans[0].style.bg, Some(BULLISH_COLOR));

        let bearish = candle(7.0, 8.0, 1.0, 2.0, 10);
        let lines = price_axis_lines(&transform(), 10, Some(&bearish), None);
        assert_eq!(line_text(&lines[8]), "◀     2.00");
        assert_eq!(lines[8].spans[0].style.bg, Some(BEARISH_COLOR));
    }

    #[test]
    fn test_price_axis_hover_takes_the_row() {
        let last = candle(2.0, 8.0, 1.0, 7.0, 10);
        let lines = price_axis_lines(&transform(), 10, Some(&last), Some(3.5));

        // Crosshair au centre de la ligne 3 : 6.50, par-dessus la clôture
        assert_eq!(line_text(&lines[3]), "◀     6.50");
        assert_eq!(lines[3].spans[0].style.bg, Some(Color::DarkGray));

        // Crosshair hors du panneau (Elder Ray) : pas d'étiquette
        let lines = price_axis_lines(&transform(), 10, None, Some(12.5));
        assert!(lines.iter().all(|l| !line_text(l).starts_with('◀')));
    }
}
