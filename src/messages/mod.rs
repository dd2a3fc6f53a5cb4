//! Localized text for play rejections
//!
//! The play service only ever produces a [`PlayErrorKind`]; this module
//! turns it into something a user can read. Bundles map each kind's key to a
//! message, one bundle per locale. Extra bundles come from a TOML file shaped
//! like:
//!
//! ```toml
//! [fr]
//! BET_CLOSED = "Les paris sont fermés pour ce match."
//! ```

use crate::config::MessagesConfig;
use crate::error::{Error, PlayErrorKind, Result};
use std::collections::HashMap;
use std::path::Path;

type Bundle = HashMap<String, String>;

const EN: &[(&str, &str)] = &[
    ("BET_NOT_VALID", "The selected bet does not exist."),
    ("BET_NOT_VALID_MIN", "The amount is below the minimum allowed for this bet."),
    ("BET_NOT_VALID_MAX", "The amount is above the maximum allowed for this bet."),
    ("CHOICE_NOT_VALID", "The selected option is not valid for this bet."),
    ("BET_CLOSED", "This bet is closed, the match is about to start."),
];

const ES: &[(&str, &str)] = &[
    ("BET_NOT_VALID", "La apuesta seleccionada no existe."),
    ("BET_NOT_VALID_MIN", "El monto es menor al mínimo permitido para esta apuesta."),
    ("BET_NOT_VALID_MAX", "El monto es mayor al máximo permitido para esta apuesta."),
    ("CHOICE_NOT_VALID", "La opción seleccionada no es válida para esta apuesta."),
    ("BET_CLOSED", "La apuesta está cerrada, el partido está por comenzar."),
];

#[derive(Debug, Clone)]
pub struct MessageService {
    bundles: HashMap<String, Bundle>,
    default_locale: String,
}

impl Default for MessageService {
    fn default() -> Self {
        let mut service = Self {
            bundles: HashMap::new(),
            default_locale: "en".to_string(),
        };
        service.add_bundle("en", EN.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        service.add_bundle("es", ES.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        service
    }
}

impl MessageService {
    /// Built-in bundles plus whatever the configuration points at
    pub fn from_config(config: &MessagesConfig) -> Result<Self> {
        let mut service = Self::default();
        service.default_locale = normalize(&config.default_locale);

        if let Some(path) = &config.bundle_path {
            service.load_bundles(path)?;
        }

        Ok(service)
    }

    /// Merge bundles from a TOML file, overriding existing entries
    pub fn load_bundles(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read message bundle: {}", e)))?;
        let parsed: HashMap<String, Bundle> = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse message bundle: {}", e)))?;

        for (locale, bundle) in parsed {
            for key in bundle.keys() {
                if PlayErrorKind::from_key(key).is_none() {
                    tracing::warn!(%locale, %key, "message bundle has unknown key");
                }
            }
            self.add_bundle(&locale, bundle);
        }
        Ok(())
    }

    pub fn add_bundle(&mut self, locale: &str, messages: impl IntoIterator<Item = (String, String)>) {
        self.bundles
            .entry(normalize(locale))
            .or_default()
            .extend(messages);
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.bundles.contains_key(&normalize(locale))
    }

    /// Text for `kind` in `locale`.
    ///
    /// Falls back from `es-MX` to `es`, then to the default locale, then to
    /// the bare key.
    pub fn message(&self, kind: PlayErrorKind, locale: Option<&str>) -> String {
        let key = kind.key();
        let requested = locale.map(normalize);

        let candidates = requested
            .iter()
            .flat_map(|locale| [Some(locale.clone()), language(locale)])
            .flatten()
            .chain(std::iter::once(self.default_locale.clone()));

        for candidate in candidates {
            if let Some(text) = self.bundles.get(&candidate).and_then(|b| b.get(key)) {
                return text.clone();
            }
        }

        key.to_string()
    }

    /// Pick the best supported locale from an `Accept-Language` value
    pub fn negotiate(&self, accept_language: &str) -> Option<String> {
        let mut ranges: Vec<(String, f32)> = accept_language
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((normalize(tag), quality))
            })
            .filter(|(_, quality)| *quality > 0.0)
            .collect();

        // Stable sort keeps header order among equal weights
        ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranges.into_iter().find_map(|(tag, _)| {
            if self.bundles.contains_key(&tag) {
                Some(tag)
            } else {
                language(&tag).filter(|lang| self.bundles.contains_key(lang))
            }
        })
    }
}

fn normalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_lowercase()
}

fn language(locale: &str) -> Option<String> {
    locale
        .split_once('-')
        .map(|(language, _)| language.to_string())
}
