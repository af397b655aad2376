//! URL fragment ⇄ [`ViewState`] synchronization.
//!
//! Two fragment layouts are supported, picked per deployment:
//!
//! * [`HashFormat::Comma`]: `#source`, `#source,location name`,
//!   `#lat,lng,zoom` or `#source,lat,lng,zoom[,flag...]`
//! * [`HashFormat::Slash`]: `#zoom/lat/lng`, the map widget's own layout
//!
//! Parsing never fails. Anything it cannot use is replaced by the configured
//! default and reported as a [`HashIssue`].

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{DemoConfig, NamedLocation};
use crate::state::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFormat {
    #[default]
    Comma,
    Slash,
}

impl HashFormat {
    pub fn delimiter(self) -> char {
        match self {
            HashFormat::Comma => ',',
            HashFormat::Slash => '/',
        }
    }
}

/// Something in the fragment that was ignored in favour of a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashIssue {
    #[error("unknown tile source `{0}`")]
    UnknownSource(String),

    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    #[error("malformed {field} `{token}`")]
    MalformedNumeric { field: &'static str, token: String },
}

/// Token layout of a split fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    OneToken(&'a str),
    TwoTokens(&'a str, &'a str),
    ThreeTokens([&'a str; 3]),
    FourPlusTokens {
        head: &'a str,
        coords: [&'a str; 3],
        trailing: &'a [&'a str],
    },
}

impl<'a> Shape<'a> {
    pub fn of(tokens: &'a [&'a str]) -> Self {
        match tokens {
            [] => Shape::OneToken(""),
            [one] => Shape::OneToken(*one),
            [a, b] => Shape::TwoTokens(*a, *b),
            [a, b, c] => Shape::ThreeTokens([*a, *b, *c]),
            [head, a, b, c, trailing @ ..] => Shape::FourPlusTokens {
                head: *head,
                coords: [*a, *b, *c],
                trailing,
            },
        }
    }
}

/// Result of reading a fragment: the state to start from plus whatever was
/// thrown away on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub state: ViewState,
    pub issues: Vec<HashIssue>,
}

/// Where serialized fragments end up.
pub trait FragmentTarget {
    type Error;

    fn write_fragment(&mut self, fragment: &str) -> Result<(), Self::Error>;
}

/// Records every write; handy off-browser.
impl FragmentTarget for Vec<String> {
    type Error = Infallible;

    fn write_fragment(&mut self, fragment: &str) -> Result<(), Self::Error> {
        self.push(fragment.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HashSync<'c> {
    config: &'c DemoConfig,
    format: HashFormat,
}

impl<'c> HashSync<'c> {
    /// Uses the format the config was deployed with.
    pub fn new(config: &'c DemoConfig) -> Self {
        Self::with_format(config, config.format)
    }

    pub fn with_format(config: &'c DemoConfig, format: HashFormat) -> Self {
        Self { config, format }
    }

    pub fn format(&self) -> HashFormat {
        self.format
    }

    pub fn parse(&self, fragment: &str) -> Parsed {
        let body = fragment.strip_prefix('#').unwrap_or(fragment);
        let tokens: Vec<&str> = body.split(self.format.delimiter()).collect();
        let shape = Shape::of(&tokens);

        let mut issues = Vec::new();
        let state = match self.format {
            HashFormat::Comma => self.read_comma(shape, &mut issues),
            HashFormat::Slash => self.read_slash(shape, &mut issues),
        };

        for issue in &issues {
            warn!(%issue, fragment, "fragment value replaced by default");
        }
        debug!(?state, "view state from fragment");

        Parsed { state, issues }
    }

    pub fn serialize(&self, state: &ViewState) -> String {
        match self.format {
            HashFormat::Comma => {
                let [lat, lng, zoom] = state.position_text();
                let mut parts = vec![state.source_id.clone(), lat, lng, zoom];
                parts.extend(state.flags().iter().cloned());
                parts.join(",")
            }
            HashFormat::Slash => {
                let digits = slash_precision(state.zoom);
                format!(
                    "{}/{:.*}/{:.*}",
                    state.zoom, digits, state.lat, digits, state.lng
                )
            }
        }
    }

    /// Serializes `state` and hands it to `target`, returning what was written.
    pub fn publish<T: FragmentTarget>(
        &self,
        state: &ViewState,
        target: &mut T,
    ) -> Result<String, T::Error> {
        let fragment = self.serialize(state);
        target.write_fragment(&fragment)?;
        debug!(%fragment, "fragment published");
        Ok(fragment)
    }

    fn read_comma(&self, shape: Shape<'_>, issues: &mut Vec<HashIssue>) -> ViewState {
        let head = match shape {
            Shape::OneToken(head) | Shape::TwoTokens(head, _) => Some(head),
            Shape::FourPlusTokens { head, .. } => Some(head),
            // `lat,lng,zoom`: the first token is a latitude, but it is still
            // checked against the source table like every other layout.
            Shape::ThreeTokens([first, ..]) => {
                self.config.has_source(first).then_some(first)
            }
        };
        let source = match head {
            Some(id) if self.config.has_source(id) => id.to_string(),
            Some(id) => {
                if !id.is_empty() {
                    issues.push(HashIssue::UnknownSource(id.to_string()));
                }
                self.config.default_source.clone()
            }
            None => self.config.default_source.clone(),
        };

        let location = match shape {
            Shape::OneToken(_) => None,
            Shape::TwoTokens(_, name) => match self.config.locations.get(name) {
                Some(at) => Some(*at),
                None => {
                    issues.push(HashIssue::UnknownLocation(name.to_string()));
                    None
                }
            },
            Shape::ThreeTokens([lat, lng, zoom]) => self.coords(lat, lng, zoom, issues),
            Shape::FourPlusTokens { coords: [lat, lng, zoom], .. } => {
                self.coords(lat, lng, zoom, issues)
            }
        };

        let written = match shape {
            Shape::ThreeTokens(coords) | Shape::FourPlusTokens { coords, .. } => Some(coords),
            _ => None,
        };

        let mut state = self.start(source, location);
        if let (Some(at), Some(text)) = (location, written) {
            if reproducible(&state, &at, text[2]) {
                state.keep_spelling(text.map(str::trim));
            }
        }
        if let Shape::FourPlusTokens { trailing, .. } = shape {
            for flag in trailing.iter().filter(|t| !t.is_empty()) {
                state.set_flag(*flag);
            }
        }
        state
    }

    fn read_slash(&self, shape: Shape<'_>, issues: &mut Vec<HashIssue>) -> ViewState {
        let location = match shape {
            Shape::ThreeTokens([zoom, lat, lng]) => self.coords(lat, lng, zoom, issues),
            other => {
                debug!(?other, "fragment is not zoom/lat/lng");
                None
            }
        };
        self.start(self.config.default_source.clone(), location)
    }

    fn start(&self, source: String, location: Option<NamedLocation>) -> ViewState {
        let at = location.unwrap_or_else(|| self.config.start_location());
        let mut state = ViewState::new(source, at);
        state.jump_to(&at, self.config);
        state
    }

    /// All three numbers or nothing: one bad token discards the position.
    fn coords(
        &self,
        lat: &str,
        lng: &str,
        zoom: &str,
        issues: &mut Vec<HashIssue>,
    ) -> Option<NamedLocation> {
        let lat = number("latitude", lat, issues);
        let lng = number("longitude", lng, issues);
        let zoom = number("zoom", zoom, issues);
        Some(NamedLocation::new(lat?, lng?, zoom?.round() as i32))
    }
}

/// The parsed position survived clamping and rounding untouched, so the
/// fragment's own spelling still describes it.
fn reproducible(state: &ViewState, at: &NamedLocation, zoom_token: &str) -> bool {
    state.lat == at.lat
        && state.lng == at.lng
        && state.zoom == at.zoom
        && zoom_token.trim().parse::<f64>() == Ok(f64::from(at.zoom))
}

fn number(field: &'static str, token: &str, issues: &mut Vec<HashIssue>) -> Option<f64> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            issues.push(HashIssue::MalformedNumeric {
                field,
                token: token.to_string(),
            });
            None
        }
    }
}

/// Decimal places the slash layout keeps at `zoom`: enough to resolve a
/// pixel, never negative.
fn slash_precision(zoom: i32) -> usize {
    f64::from(zoom).log2().ceil().max(0.0) as usize
}
