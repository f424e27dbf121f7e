// ============================================================================
// Configuration
// ============================================================================
// Fichier JSON optionnel : $CONFIG_DIR/candlesketch/config.json
// (~/.config/candlesketch/config.json sous Linux)
//
// Tous les champs sont optionnels grâce à #[serde(default)] : un fichier
// contenant seulement { "draw_modifier": "alt" } est valide.
//
// Le filtrage des logs reste sur RUST_LOG, comme dans main.rs.
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::{style::Color, symbols::Marker};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::overlay::{DrawModifier, StrokeStyle, DEFAULT_SEGMENT_CAP};

const APP_DIR: &str = "candlesketch";
const CONFIG_FILE: &str = "config.json";

/// Au-delà, le compteur du header ne tient plus dans le titre
pub const MAX_SEGMENT_CAP: usize = 99;

/// Épaisseur du trait, traduite en marker du canvas ratatui
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMarker {
    /// 2x4 points par cellule : le trait le plus fin
    #[default]
    Braille,
    Dot,
    Block,
}

impl LineMarker {
    pub fn marker(&self) -> Marker {
        match self {
            LineMarker::Braille => Marker::Braille,
            LineMarker::Dot => Marker::Dot,
            LineMarker::Block => Marker::Block,
        }
    }
}

/// Réglages de l'application
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Touche qui active le dessin
    pub draw_modifier: DrawModifier,

    /// Nombre maximum de segments
    pub segment_cap: usize,

    /// Couleur des segments (RGB)
    pub line_color: [u8; 3],

    /// Épaisseur des segments
    pub line_marker: LineMarker,

    /// Chandelles visibles au démarrage
    pub visible_candles: usize,

    /// Chandelles vides à droite de la dernière
    pub right_padding: usize,

    /// Colonnes parcourues par un appui sur ← / →
    pub pan_step: u16,

    /// Symbole affiché dans le titre
    pub symbol: String,

    /// Taille de la série d'exemple
    pub sample_candles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_modifier: DrawModifier::Ctrl,
            segment_cap: DEFAULT_SEGMENT_CAP,
            line_color: [255, 0, 0],
            line_marker: LineMarker::Braille,
            visible_candles: 100,
            right_padding: 5,
            pan_step: 8,
            symbol: "DEMO".to_string(),
            sample_candles: 300,
        }
    }
}

impl Settings {
    /// Charge la configuration depuis l'emplacement standard
    ///
    /// Fichier absent : valeurs par défaut. Fichier invalide : erreur,
    /// l'appelant décide (main.rs logge un warning et continue).
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let settings = Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!(path = %path.display(), ?settings, "Config loaded");
        Ok(settings)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        Ok(settings.sanitized())
    }

    /// Ramène les valeurs hors limites à des valeurs utilisables
    fn sanitized(mut self) -> Self {
        if self.visible_candles == 0 {
            warn!("visible_candles must be at least 1, using default");
            self.visible_candles = Settings::default().visible_candles;
        }
        if self.segment_cap > MAX_SEGMENT_CAP {
            warn!(
                segment_cap = self.segment_cap,
                max = MAX_SEGMENT_CAP,
                "segment_cap too large, clamping"
            );
            self.segment_cap = MAX_SEGMENT_CAP;
        }
        if self.pan_step == 0 {
            warn!("pan_step must be at least 1, using default");
            self.pan_step = Settings::default().pan_step;
        }
        if self.sample_candles == 0 {
            warn!("sample_candles must be at least 1, using default");
            self.sample_candles = Settings::default().sample_candles;
        }
        self
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        let [r, g, b] = self.line_color;
        StrokeStyle {
            color: Color::Rgb(r, g, b),
            marker: self.line_marker.marker(),
        }
    }
}

/// Emplacement du fichier de configuration
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

// ============================================================================
// Tests unitaires
// ============================================================================
