// ============================================================================
// candlesketch : graphique en chandeliers avec couche de dessin
// ============================================================================
// Programme TUI : chandeliers, EMA, volume et Elder Ray, plus une couche de
// dessin de segments (Ctrl+drag par défaut) qui reste accrochée au
// graphique quand on le déplace.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Protocole clavier étendu : appuis ET relâchements des modificateurs
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use candlesketch::app::App;
use candlesketch::config::Settings;
use candlesketch::ui::events::{Event, EventHandler};
use candlesketch::ui::render;

// ============================================================================
// Logging
// ============================================================================
// Un TUI occupe stdout : les logs vont dans ./logs/candlesketch.log
// (rotation quotidienne). Filtre par RUST_LOG, par défaut
// "candlesketch=debug,info".
// ============================================================================

fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // CONCEPT : Log rotation
    // - Rotation::DAILY : nouveau fichier chaque jour
    // - Ancien format : candlesketch.log.2024-01-15
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "candlesketch.log");

    // CONCEPT : Builder pattern avec layers
    // try_init() plutôt que init() : une erreur au lieu d'un panic si un
    // subscriber global existe déjà
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: candlesketch::overlay::pan)
                .with_line_number(true), // Inclut le numéro de ligne
        )
        .with(
            // CONCEPT : EnvFilter
            // - RUST_LOG=candlesketch=trace : détail de chaque Move de pan
            // - Par défaut : debug pour candlesketch, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "candlesketch=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("candlesketch starting up");

    // Config invalide : on prévient et on continue avec les valeurs par défaut
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!(error = ?e, "Invalid configuration, using defaults");
        eprintln!("⚠️  {:#}", e);
        Settings::default()
    });

    let app = App::new(settings);

    debug!("Setting up terminal");
    let (mut terminal, enhanced_keyboard) = setup_terminal()?;
    info!(enhanced_keyboard, "Terminal ready");

    let events = EventHandler::new();
    let result = run(&mut terminal, app, &events);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal, enhanced_keyboard)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Adapter le layout à la taille du terminal
//   2. Dessiner l'interface
//   3. Traiter un événement (ou un Tick après 250ms)
//
// CONCEPT RUST : emprunts dans la closure de draw
// - terminal.draw() prend une closure FnOnce(&mut Frame)
// - render() n'emprunte App qu'en lecture : aucune mutation pendant le rendu
// - Les mutations ont lieu ensuite, dans handle_event(&mut app, ...)
//
// Boucle mono-thread : pas de channel ni de worker, tout l'état vit dans App.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    events: &EventHandler,
) -> Result<()> {
    while app.is_running() {
        let area = terminal.size().context("Failed to read terminal size")?;
        app.resize(area);

        terminal
            .draw(|frame| render(frame, &app))
            .context("Failed to draw frame")?;

        // Une erreur de lecture n'arrête pas l'application
        match events.next() {
            Ok(event) => handle_event(&mut app, event),
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT RUST : match guards
// - `Event::Key(_) if is_quit_event(&event)` : le motif ET la condition
// - Les bras sont essayés dans l'ordre : le premier qui correspond gagne
// - Les touches modificatrices seules passent en premier, sinon elles
//   tomberaient dans le bras "toute autre touche"
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: Event) {
    use candlesketch::ui::events::{
        is_clear_event, is_escape_event, is_pan_left_event, is_pan_right_event, is_quit_event,
        is_zoom_in_event, is_zoom_out_event, modifier_of,
    };

    match event {
        // Touches modificatrices seules (protocole clavier étendu)
        Event::Key(key) if modifier_of(&key).is_some() => {
            if let Some(modifier) = modifier_of(&key) {
                app.modifier_pressed(modifier);
            }
        }
        Event::KeyRelease(key) => {
            if let Some(modifier) = modifier_of(&key) {
                app.modifier_released(modifier);
            }
        }

        Event::Key(_) if is_quit_event(&event) => {
            // Two-step quit : première pression -> confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.cancel_quit();
        }

        Event::Key(_) if is_clear_event(&event) => {
            app.cancel_quit();
            app.clear_drawings();
        }

        Event::Key(_) if is_pan_left_event(&event) => {
            app.cancel_quit();
            app.pan_left();
        }
        Event::Key(_) if is_pan_right_event(&event) => {
            app.cancel_quit();
            app.pan_right();
        }

        Event::Key(_) if is_zoom_in_event(&event) => {
            app.cancel_quit();
            app.zoom_in();
        }
        Event::Key(_) if is_zoom_out_event(&event) => {
            app.cancel_quit();
            app.zoom_out();
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        Event::Mouse(mouse) => app.mouse(mouse),

        Event::FocusLost => app.focus_lost(),

        Event::FocusGained => debug!("Focus gained"),

        // Le layout est recalculé au début de chaque itération
        Event::Resize(width, height) => debug!(width, height, "Terminal resized"),

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
///
/// Retourne aussi si le protocole clavier étendu est actif : sans lui, les
/// relâchements de touche n'arrivent pas et seuls les bits de modificateur
/// des événements souris renseignent sur Ctrl/Shift/Alt.
fn setup_terminal() -> Result<(Terminal<CrosstermBackend<io::Stdout>>, bool)> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .context("Failed to enter alternate screen")?;

    // CONCEPT : protocole clavier étendu (kitty)
    // - REPORT_EVENT_TYPES : relâchements de touche
    // - REPORT_ALL_KEYS_AS_ESCAPE_CODES : Ctrl/Shift/Alt seuls
    // - Non supporté : on continue, les bits des événements souris suffisent
    let enhanced_keyboard = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keyboard {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )
        .context("Failed to enable keyboard enhancement")?;
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok((terminal, enhanced_keyboard))
}

/// Restaure le terminal à son état normal
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    enhanced_keyboard: bool,
) -> Result<()> {
    // Ordre inverse du setup : les flags clavier d'abord
    if enhanced_keyboard {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }

    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;

    terminal.show_cursor()?;

    Ok(())
}
