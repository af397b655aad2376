use serde::Serialize;

use crate::config::{DemoConfig, NamedLocation};

/// Flag that attaches the frame-timing overlay.
pub const DEBUG_FLAG: &str = "debug";

const MODE_KEY: &str = "mode=";

/// Camera position and UI flags of the page session.
///
/// There is exactly one per page. It is created from the fragment at load and
/// mutated in place afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub source_id: String,
    pub lat: f64,
    pub lng: f64,
    pub zoom: i32,
    /// Insertion-ordered, no duplicates.
    flags: Vec<String>,
    /// `lat`, `lng`, `zoom` as written in the fragment they were read from.
    /// Dropped as soon as the position changes.
    #[serde(skip)]
    spelling: Option<[String; 3]>,
}

impl ViewState {
    pub fn new(source_id: impl Into<String>, at: NamedLocation) -> Self {
        Self {
            source_id: source_id.into(),
            lat: at.lat,
            lng: at.lng,
            zoom: at.zoom,
            flags: Vec::new(),
            spelling: None,
        }
    }

    /// `lat`, `lng`, `zoom` as fragment text. Reuses the parsed spelling
    /// while the position is unchanged.
    pub fn position_text(&self) -> [String; 3] {
        match &self.spelling {
            Some(text) => text.clone(),
            None => [
                self.lat.to_string(),
                self.lng.to_string(),
                self.zoom.to_string(),
            ],
        }
    }

    pub(crate) fn keep_spelling(&mut self, text: [&str; 3]) {
        self.spelling = Some(text.map(str::to_string));
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Returns `false` if the flag was already set or is empty.
    pub fn set_flag(&mut self, flag: impl Into<String>) -> bool {
        let flag = flag.into();
        if flag.is_empty() || self.has_flag(&flag) {
            return false;
        }
        self.flags.push(flag);
        true
    }

    pub fn clear_flag(&mut self, flag: &str) -> bool {
        let before = self.flags.len();
        self.flags.retain(|f| f != flag);
        self.flags.len() != before
    }

    /// UI mode carried by the last flag token, if that token holds `mode=<word>`.
    ///
    /// Earlier tokens never contribute: a trailing non-mode flag hides any
    /// mode set before it.
    pub fn mode(&self) -> Option<&str> {
        self.flags.last().and_then(|f| mode_word(f))
    }

    /// Replaces every mode-bearing flag with `mode=<word>` at the end.
    pub fn set_mode(&mut self, word: &str) {
        self.flags.retain(|f| mode_word(f).is_none());
        self.set_flag(format!("{MODE_KEY}{word}"));
    }

    /// Records the position the map came to rest at.
    ///
    /// The widget may report fractional zoom; it is rounded to the nearest level.
    /// Non-finite inputs leave the previous value in place.
    pub fn settle(&mut self, lat: f64, lng: f64, zoom: f64, config: &DemoConfig) {
        if lat.is_finite() {
            self.lat = lat.clamp(-90.0, 90.0);
        }
        if lng.is_finite() {
            self.lng = lng.clamp(-180.0, 180.0);
        }
        if zoom.is_finite() {
            self.zoom = config.clamp_zoom(zoom.round() as i32);
        }
        self.spelling = None;
    }

    pub fn jump_to(&mut self, to: &NamedLocation, config: &DemoConfig) {
        self.settle(to.lat, to.lng, f64::from(to.zoom), config);
    }
}

/// First `mode=<word>` occurrence in `token`, where a word is `[A-Za-z0-9_]+`.
pub(crate) fn mode_word(token: &str) -> Option<&str> {
    token.match_indices(MODE_KEY).find_map(|(at, _)| {
        let rest = &token[at + MODE_KEY.len()..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewState {
        ViewState::new("mapzen", NamedLocation::new(0.0, 0.0, 3))
    }

    #[test]
    fn mode_word_matches_anywhere_in_token() {
        assert_eq!(mode_word("mode=night"), Some("night"));
        assert_eq!(mode_word("ui:mode=day_2&x"), Some("day_2"));
        assert_eq!(mode_word("mode=&mode=late"), Some("late"));
        assert_eq!(mode_word("mode="), None);
        assert_eq!(mode_word("debug"), None);
    }

    #[test]
    fn mode_comes_from_last_flag_only() {
        let mut s = state();
        s.set_flag("mode=night");
        assert_eq!(s.mode(), Some("night"));
        s.set_flag("debug");
        assert_eq!(s.mode(), None);
        s.set_mode("day");
        assert_eq!(s.flags(), ["debug", "mode=day"]);
        assert_eq!(s.mode(), Some("day"));
    }

    #[test]
    fn flags_are_a_set() {
        let mut s = state();
        assert!(s.set_flag("x=1"));
        assert!(!s.set_flag("x=1"));
        assert!(!s.set_flag(""));
        assert!(s.clear_flag("x=1"));
        assert!(!s.clear_flag("x=1"));
        assert!(s.flags().is_empty());
    }

    #[test]
    fn settle_keeps_invariants() {
        let config = DemoConfig::default();
        let mut s = state();
        s.settle(95.0, -200.0, 22.4, &config);
        assert_eq!((s.lat, s.lng, s.zoom), (90.0, -180.0, 20));
        s.settle(10.0, 20.0, 4.6, &config);
        assert_eq!((s.lat, s.lng, s.zoom), (10.0, 20.0, 5));
    }

    #[test]
    fn settle_ignores_non_finite_input() {
        let config = DemoConfig::default();
        let mut s = state();
        s.settle(10.0, 20.0, 6.0, &config);
        s.settle(f64::NAN, f64::INFINITY, f64::NAN, &config);
        assert_eq!((s.lat, s.lng, s.zoom), (10.0, 20.0, 6));
        assert_eq!(s.position_text(), ["10", "20", "6"]);
    }

    #[test]
    fn spelling_survives_until_position_changes() {
        let config = DemoConfig::default();
        let mut s = ViewState::new("mapzen", NamedLocation::new(40.7, -74.0, 16));
        s.keep_spelling(["40.70", "-74.0", "16"]);
        assert_eq!(s.position_text(), ["40.70", "-74.0", "16"]);
        s.set_flag("debug");
        assert_eq!(s.position_text(), ["40.70", "-74.0", "16"]);
        s.settle(40.7, -74.0, 16.0, &config);
        assert_eq!(s.position_text(), ["40.7", "-74", "16"]);
    }
}
