// ============================================================================
// Rendu des indicateurs
// ============================================================================
// - EMA 12 / EMA 26 : lignes Braille par-dessus les chandeliers
// - Marqueurs "●" sur chaque EMA, à la chandelle survolée (ou la dernière)
// - Elder Ray : histogramme bull / bear autour d'une ligne zéro
//
// Les deux utilisent la transformation du graphique pour l'axe X : un pan
// déplace chandeliers, indicateurs et segments dessinés ensemble.
// ============================================================================

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Paragraph, Widget,
    },
    Frame,
};

use super::candlestick_text::{BEARISH_COLOR, BULLISH_COLOR};
use super::overlay::CanvasSurface;
use crate::chart::ChartTransform;
use crate::models::indicators::{ELDER_RAY_PERIOD, EMA_FAST_PERIOD, EMA_SLOW_PERIOD};
use crate::models::IndicatorSeries;
use crate::overlay::{DrawingSurface, Point, Segment, StrokeStyle};

pub const EMA_FAST_COLOR: Color = Color::Rgb(255, 193, 7);  // Ambre
pub const EMA_SLOW_COLOR: Color = Color::Rgb(64, 156, 255); // Bleu

const CURRENT_COORDINATE_SYMBOL: &str = "●";

// ============================================================================
// EMA
// ============================================================================

/// Surface des deux EMA pour le panneau de prix
pub fn ema_surface(
    series: &IndicatorSeries,
    transform: &ChartTransform,
    visible: Range<usize>,
    width: u16,
    height: u16,
) -> CanvasSurface {
    let mut surface = CanvasSurface::new(width, height);

    let lines = [
        (&series.ema_fast, EMA_FAST_COLOR),
        (&series.ema_slow, EMA_SLOW_COLOR),
    ];

    for (values, color) in lines {
        let style = StrokeStyle {
            color,
            marker: Marker::Braille,
        };

        // Inclut la chandelle précédente pour que la ligne touche le bord gauche
        let first = visible.start.saturating_sub(1);
        let last = visible.end.min(values.len());

        for index in first..last.saturating_sub(1) {
            let (Some(a), Some(b)) = (values[index], values[index + 1]) else {
                continue;
            };

            let (x1, y1) = transform.to_pixel(index as f64, a);
            let (x2, y2) = transform.to_pixel((index + 1) as f64, b);
            surface.stroke_segment(&Segment::new(x1, y1, x2, y2), &style);
        }
    }

    surface
}

/// Position des deux EMA à la chandelle `index`, en pixels du panneau de prix
///
/// Une EMA encore en période de chauffe n'a pas de marqueur.
pub fn ema_current_coordinates(
    series: &IndicatorSeries,
    transform: &ChartTransform,
    index: usize,
) -> Vec<(Point, Color)> {
    [
        (series.ema_slow_at(index), EMA_SLOW_COLOR),
        (series.ema_fast_at(index), EMA_FAST_COLOR),
    ]
    .into_iter()
    .filter_map(|(value, color)| {
        let (x, y) = transform.to_pixel(index as f64, value?);
        Some((Point::new(x, y), color))
    })
    .collect()
}

/// Marqueurs posés sur les EMA : le fond de la cellule est conservé
pub struct CurrentCoordinates {
    pub points: Vec<(Point, Color)>,
}

impl Widget for CurrentCoordinates {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (point, color) in self.points {
            if !point.x.is_finite() || !point.y.is_finite() || point.x < 0.0 || point.y < 0.0 {
                continue;
            }

            let column = point.x.floor() as u16;
            let row = point.y.floor() as u16;
            if column >= area.width || row >= area.height {
                continue;
            }

            buf.get_mut(area.x + column, area.y + row)
                .set_symbol(CURRENT_COORDINATE_SYMBOL)
                .set_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        }
    }
}

/// Légende des EMA pour la chandelle `index`
pub fn ema_legend(series: &IndicatorSeries, index: usize) -> Vec<Span<'static>> {
    let format = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));

    vec![
        Span::styled(
            format!("EMA{} {}", EMA_FAST_PERIOD, format(series.ema_fast_at(index))),
            Style::default().fg(EMA_FAST_COLOR),
        ),
        Span::raw("  "),
        Span::styled(
            format!("EMA{} {}", EMA_SLOW_PERIOD, format(series.ema_slow_at(index))),
            Style::default().fg(EMA_SLOW_COLOR),
        ),
    ]
}

// ============================================================================
// Elder Ray
// ============================================================================

/// Amplitude max (en valeur absolue) sur la fenêtre visible
fn elder_amplitude(series: &IndicatorSeries, visible: Range<usize>) -> f64 {
    visible
        .filter_map(|i| series.elder_ray_at(i))
        .map(|er| er.bull_power.abs().max(er.bear_power.abs()))
        .fold(0.0, f64::max)
}

/// Panneau Elder Ray : titre (valeurs de la chandelle `focus`) + histogramme
pub fn render_elder_ray(
    frame: &mut Frame,
    area: Rect,
    series: &IndicatorSeries,
    transform: &ChartTransform,
    visible: Range<usize>,
    focus: Option<usize>,
) {
    if area.height < 2 {
        return;
    }

    let title_area = Rect { height: 1, ..area };
    let plot_area = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };

    // Titre avec les valeurs de la chandelle survolée
    let mut title = vec![Span::styled(
        format!("─ Elder Ray ({}) ", ELDER_RAY_PERIOD),
        Style::default().fg(Color::Gray),
    )];
    if let Some(er) = focus.and_then(|i| series.elder_ray_at(i)) {
        title.push(Span::styled(
            format!("Bull {:+.2} ", er.bull_power),
            Style::default().fg(BULLISH_COLOR),
        ));
        title.push(Span::styled(
            format!("Bear {:+.2}", er.bear_power),
            Style::default().fg(BEARISH_COLOR),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), title_area);

    let amplitude = elder_amplitude(series, visible.clone());
    if amplitude == 0.0 {
        return;
    }

    let width = plot_area.width as f64;
    let zero_color = Color::DarkGray;

    let canvas = Canvas::default()
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, width])
        .y_bounds([-amplitude, amplitude])
        .paint(move |ctx| {
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: width,
                y2: 0.0,
                color: zero_color,
            });

            for index in visible.clone() {
                let Some(er) = series.elder_ray_at(index) else {
                    continue;
                };
                let x = transform.x.to_pixel(index as f64);
                if !(0.0..=width).contains(&x) {
                    continue;
                }

                // Bull au-dessus de zéro, bear en dessous (valeurs bornées)
                let bull = er.bull_power.clamp(-amplitude, amplitude);
                let bear = er.bear_power.clamp(-amplitude, amplitude);

                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: 0.0,
                    x2: x,
                    y2: bull.max(0.0),
                    color: BULLISH_COLOR,
                });
                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: 0.0,
                    x2: x,
                    y2: bear.min(0.0),
                    color: BEARISH_COLOR,
                });
            }
        });

    frame.render_widget(canvas, plot_area);
}

/// Labels de l'axe du panneau Elder Ray : +max, 0, -max
///
/// `hover_row` : ligne du panneau sous le crosshair, sa valeur y est écrite.
pub fn elder_axis_lines(
    series: &IndicatorSeries,
    visible: Range<usize>,
    height: u16,
    hover_row: Option<u16>,
) -> Vec<Line<'static>> {
    let amplitude = elder_amplitude(series, visible);
    let style = Style::default().fg(Color::Gray);
    let plot_rows = height.saturating_sub(1);
    let middle = plot_rows / 2;

    // Ligne 0 : titre du panneau, pas de label
    (0..height)
        .map(|row| {
            if row > 0 && hover_row == Some(row) {
                // Centre de la ligne dans l'échelle [-max, +max] du canvas
                let ratio = ((row - 1) as f64 + 0.5) / plot_rows as f64;
                let value = amplitude - ratio * 2.0 * amplitude;
                return Line::from(Span::styled(
                    format!("◀{:>+9.2}", value),
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ));
            }

            let label = if row == 0 {
                String::new()
            } else if row == 1 {
                format!("┤{:>+9.2}", amplitude)
            } else if row == middle + 1 {
                format!("┤{:>9}", "0")
            } else if row + 1 == height {
                format!("┤{:>+9.2}", -amplitude)
            } else {
                "│".to_string()
            };
            Line::from(Span::styled(label, style))
        })
        .collect()
}
