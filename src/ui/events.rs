// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements du terminal (clavier, souris, focus, resize) et les
// convertit en événements de l'application.
//
// CONCEPTS :
// 1. Appui ET relâchement : avec le protocole clavier étendu (kitty), le
//    terminal signale aussi les relâchements et les touches modificatrices
//    seules. Sans lui, seuls les bits de modificateur des événements souris
//    renseignent sur Ctrl/Shift/Alt.
// 2. Focus : le terminal signale la perte de focus (EnableFocusChange).
//    Aucune écoute globale du clavier : on ne voit que ce qui nous est adressé.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    ModifierKeyCode, MouseEvent,
};

use crate::overlay::DrawModifier;

/// Délai d'attente d'un événement avant d'émettre un Tick
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Événements de l'application
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Touche pressée (ou répétée)
    Key(KeyEvent),

    /// Touche relâchée (protocole clavier étendu uniquement)
    KeyRelease(KeyEvent),

    /// Souris : boutons, drag, molette, déplacement
    Mouse(MouseEvent),

    FocusGained,
    FocusLost,

    /// Nouvelle taille du terminal
    Resize(u16, u16),

    /// Aucun événement pendant le délai d'attente
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT RUST : poll + read
    /// - poll() attend au plus POLL_TIMEOUT, read() ne bloque plus ensuite
    /// - Sans événement : Tick, la boucle redessine quand même
    /// - L'opérateur ? propage les erreurs d'E/S du terminal
    pub fn next(&self) -> Result<Event> {
        if !event::poll(POLL_TIMEOUT)? {
            return Ok(Event::Tick);
        }

        // CONCEPT : KeyEventKind
        // Sans protocole étendu, tout arrive comme Press : aucun KeyRelease.
        let event = match event::read()? {
            CrosstermEvent::Key(key) => match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => Event::Key(key),
                KeyEventKind::Release => Event::KeyRelease(key),
            },
            CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
            CrosstermEvent::FocusGained => Event::FocusGained,
            CrosstermEvent::FocusLost => Event::FocusLost,
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        };

        Ok(event)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Modificateurs
// ============================================================================
// Deux sources pour savoir si Ctrl/Shift/Alt est tenu :
// - KeyCode::Modifier : la touche seule, pressée ou relâchée (protocole
//   étendu uniquement)
// - KeyModifiers : les bits portés par chaque événement clavier ou souris
//
// CONCEPT RUST : or-patterns
// `A | B` dans un match regroupe les variantes gauche et droite.
// ============================================================================

/// Touche modificatrice seule (gauche ou droite), si c'en est une
pub fn modifier_of(key: &KeyEvent) -> Option<DrawModifier> {
    match key.code {
        KeyCode::Modifier(ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl) => {
            Some(DrawModifier::Ctrl)
        }
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Some(DrawModifier::Shift)
        }
        KeyCode::Modifier(ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt) => {
            Some(DrawModifier::Alt)
        }
        _ => None,
    }
}

/// Le modificateur est-il présent dans les bits d'un événement ?
pub fn modifier_held_in(modifiers: KeyModifiers, modifier: DrawModifier) -> bool {
    let flag = match modifier {
        DrawModifier::Ctrl => KeyModifiers::CONTROL,
        DrawModifier::Shift => KeyModifiers::SHIFT,
        DrawModifier::Alt => KeyModifiers::ALT,
    };
    modifiers.contains(flag)
}

// ============================================================================
// Helpers : touches de l'application
// ============================================================================
// CONCEPT RUST : matches!
// - Raccourci pour un match qui retourne un bool
// - Permet les or-patterns : KeyCode::Char('q') | KeyCode::Char('Q')
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// 'c' : efface tous les segments
///
/// Ctrl+C est exclu : en raw mode il arrive comme une touche ordinaire et
/// Ctrl peut être le modificateur de dessin.
pub fn is_clear_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && !key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

/// '+' ou '=' (même touche sans Shift sur un clavier US)
pub fn is_zoom_in_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('+') | KeyCode::Char('='))
    } else {
        false
    }
}

pub fn is_zoom_out_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('-') | KeyCode::Char('_'))
    } else {
        false
    }
}

/// Flèche gauche ou 'h' (vim)
pub fn is_pan_left_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Left | KeyCode::Char('h'))
    } else {
        false
    }
}

/// Flèche droite ou 'l' (vim)
pub fn is_pan_right_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Right | KeyCode::Char('l'))
    } else {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_clear_excludes_ctrl_c() {
        assert!(is_clear_event(&key(KeyCode::Char('c'))));

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_clear_event(&ctrl_c));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_zoom_in_event(&key(KeyCode::Char('+'))));
        assert!(is_zoom_in_event(&key(KeyCode::Char('='))));
        assert!(is_zoom_out_event(&key(KeyCode::Char('-'))));
        assert!(is_pan_left_event(&key(KeyCode::Left)));
        assert!(is_pan_right_event(&key(KeyCode::Char('l'))));
        assert!(!is_pan_right_event(&key(KeyCode::Left)));
    }

    #[test]
    fn test_modifier_of() {
        let ctrl = KeyEvent::new(
            KeyCode::Modifier(ModifierKeyCode::RightControl),
            KeyModifiers::CONTROL,
        );
        assert_eq!(modifier_of(&ctrl), Some(DrawModifier::Ctrl));

        let shift = KeyEvent::new(KeyCode::Modifier(ModifierKeyCode::LeftShift), KeyModifiers::SHIFT);
        assert_eq!(modifier_of(&shift), Some(DrawModifier::Shift));

        let letter = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(modifier_of(&letter), None);
    }

    #[test]
    fn test_modifier_held_in() {
        let bits = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        assert!(modifier_held_in(bits, DrawModifier::Ctrl));
        assert!(modifier_held_in(bits, DrawModifier::Shift));
        assert!(!modifier_held_in(bits, DrawModifier::Alt));
        assert!(!modifier_held_in(KeyModifiers::empty(), DrawModifier::Ctrl));
    }
}
