// ============================================================================
// Écran principal
// ============================================================================
// Ordre de rendu (couches, du fond vers le dessus) :
//
//   1. chandeliers + volume (Paragraph)
//   2. EMA (Canvas Braille, transparent) + marqueurs à la chandelle courante
//   3. Elder Ray
//   4. axes (étiquettes dernière clôture et crosshair), header, footer
//   5. overlay de dessin (Canvas transparent, couvre prix + Elder Ray)
//   6. crosshair (fond seulement)
//
// Le layout vient de App : il est recalculé à chaque changement de taille
// et partagé avec le routage de la souris.
// ============================================================================

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Paragraph},
    Frame,
};

use super::candlestick_text::{
    date_axis_line, price_axis_lines, render_no_data, render_too_small, CandlestickRenderer,
};
use super::indicators::{
    elder_axis_lines, ema_current_coordinates, ema_legend, ema_surface, render_elder_ray,
    CurrentCoordinates,
};
use super::overlay::{CanvasSurface, Crosshair};
use crate::app::App;
use crate::chart::ChartLayout;
use crate::overlay::repaint;

/// Dessine toute l'interface
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();

    if !ChartLayout::fits(area) {
        render_too_small(frame, area);
        return;
    }

    let host = app.host();
    if host.data().is_empty() {
        render_no_data(frame, area, "Pas de données à afficher");
        return;
    }

    let layout = app.layout();
    let transform = host.transform();
    let visible = host.visible_range();
    let focus = host.focus_index();

    // Crosshair actif : position en pixels de l'overlay (prix puis Elder Ray)
    let hover = host.hover_point().filter(|_| app.crosshair_visible());
    let price_rows = layout.price.height as f64;
    let hover_price_y = hover.map(|p| p.y).filter(|y| *y < price_rows);
    let hover_elder_row = hover
        .map(|p| p.y - price_rows)
        .filter(|y| *y >= 0.0)
        .map(|y| y.floor() as u16);
    let hovered = hover.and(host.hovered_index());

    render_header(frame, app, layout);

    // Cadre du graphique
    let title = format!(
        " 🕯️ {} ({} chandeliers, {} visibles) ",
        host.data().symbol,
        host.data().len(),
        visible.len()
    );
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
        layout.body,
    );

    // 1. Chandeliers + volume
    let renderer = CandlestickRenderer::new(
        &host.data().candles,
        transform,
        visible.clone(),
        layout.price.width,
        layout.price.height,
        layout.volume.height,
    );
    frame.render_widget(Paragraph::new(renderer.render_lines()), layout.price);

    // 2. EMA
    let emas = ema_surface(
        host.indicators(),
        &transform,
        visible.clone(),
        layout.price.width,
        layout.price.height,
    );
    frame.render_widget(&emas, layout.price);
    if let Some(index) = focus {
        frame.render_widget(
            CurrentCoordinates {
                points: ema_current_coordinates(host.indicators(), &transform, index),
            },
            layout.price,
        );
    }

    // 3. Elder Ray
    render_elder_ray(frame, layout.elder, host.indicators(), &transform, visible.clone(), focus);

    // 4. Axes
    frame.render_widget(
        Paragraph::new(price_axis_lines(
            &transform,
            layout.price.height,
            host.data().last(),
            hover_price_y,
        )),
        layout.price_axis,
    );
    frame.render_widget(
        Paragraph::new(elder_axis_lines(
            host.indicators(),
            visible.clone(),
            layout.elder.height,
            hover_elder_row,
        )),
        layout.elder_axis,
    );
    frame.render_widget(
        Paragraph::new(date_axis_line(
            &host.data().candles,
            &transform,
            visible,
            layout.x_axis.width,
            hovered,
        )),
        layout.x_axis,
    );

    // 5. Overlay de dessin : effacé puis retracé entièrement à chaque frame
    let mut surface = CanvasSurface::new(layout.overlay.width, layout.overlay.height);
    repaint(&mut surface, app.drawing(), &app.stroke_style());
    frame.render_widget(&surface, layout.overlay);

    // 6. Crosshair
    if app.crosshair_visible() {
        if let Some(point) = host.hover_point() {
            frame.render_widget(Crosshair { point }, layout.overlay);
        }
    }

    render_footer(frame, app, layout);
}

// ============================================================================
// Header
// ============================================================================

/// Infos de la chandelle survolée (ou de la dernière) + mode de l'overlay
fn render_header(frame: &mut Frame, app: &App, layout: &ChartLayout) {
    let host = app.host();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", host.data().symbol));

    // Two-step quit : message d'avertissement à la place des infos
    if app.is_awaiting_quit_confirmation() {
        let text = Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            layout.header,
        );
        return;
    }

    let mut spans = Vec::new();

    // Tooltip OHLC
    if let Some(index) = host.focus_index() {
        if let Some(candle) = host.data().get(index) {
            let color = if candle.is_bullish() { Color::Green } else { Color::Red };
            let value = Style::default().fg(color).add_modifier(Modifier::BOLD);

            spans.push(Span::raw(format!("{}  ", candle.timestamp.format("%d/%m/%y"))));
            spans.push(Span::raw("O "));
            spans.push(Span::styled(format!("{:.2} ", candle.open), value));
            spans.push(Span::raw("H "));
            spans.push(Span::styled(format!("{:.2} ", candle.high), value));
            spans.push(Span::raw("L "));
            spans.push(Span::styled(format!("{:.2} ", candle.low), value));
            spans.push(Span::raw("C "));
            spans.push(Span::styled(format!("{:.2} ", candle.close), value));
            spans.push(Span::styled(
                format!("({:+.2}%)  ", candle.change_percent()),
                Style::default().fg(color),
            ));
            spans.extend(ema_legend(host.indicators(), index));
        }
    }

    // Mode de l'overlay + compteur de segments, à droite du titre
    let block = block.title(Title::from(overlay_status(app)).alignment(Alignment::Right));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(block).alignment(Alignment::Center),
        layout.header,
    );
}

/// "✎ Dessin [Ctrl]  Segments 2/5" : état de la couche de dessin
fn overlay_status(app: &App) -> Line<'static> {
    let drawing = app.drawing();

    let (mode, mode_color) = if drawing.is_panning() {
        ("⇔ Pan".to_string(), Color::Cyan)
    } else if !drawing.pointer_passthrough() {
        (format!("✎ Dessin [{}]", drawing.modifier().label()), Color::Yellow)
    } else {
        ("✛ Navigation".to_string(), Color::Gray)
    };

    let full = drawing.segment_count() >= drawing.cap();
    let count = format!(
        "Segments {}/{}{}",
        drawing.segment_count(),
        drawing.cap(),
        if full { " (max)" } else { "" }
    );

    Line::from(vec![
        Span::raw(" "),
        Span::styled(mode, Style::default().fg(mode_color).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(count, Style::default().fg(if full { Color::Red } else { Color::Gray })),
        Span::raw(" "),
    ])
}

// ============================================================================
// Footer
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, layout: &ChartLayout) {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let modifier = app.drawing().modifier().label();

    let help = Line::from(vec![
        Span::styled(format!("[{}+drag]", modifier), key),
        Span::raw(" Dessiner  "),
        Span::styled("[drag]", key),
        Span::raw(" Déplacer  "),
        Span::styled("[←/→]", key),
        Span::raw(" Pan  "),
        Span::styled("[+/-, molette]", key),
        Span::raw(" Zoom  "),
        Span::styled("[c]", key),
        Span::raw(" Effacer  "),
        Span::styled("[q]", key),
        Span::raw(" Quitter"),
    ]);

    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), layout.footer);
}

// ============================================================================
// Tests
// ============================================================================
