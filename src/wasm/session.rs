use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlElement, Location};

use super::overlay::{self, Overlay};
use crate::config::DemoConfig;
use crate::controls::{self, CameraMode, LayerControl, LayerPanelEntry};
use crate::hash::{FragmentTarget, HashSync};
use crate::state::{ViewState, DEBUG_FLAG};

/// The address bar, as a fragment sink.
struct AddressBar(Location);

impl FragmentTarget for AddressBar {
    type Error = JsValue;

    fn write_fragment(&mut self, fragment: &str) -> Result<(), JsValue> {
        self.0.set_hash(fragment)
    }
}

fn location() -> Result<Location, JsValue> {
    Ok(web_sys::window().ok_or("no window")?.location())
}

fn rgb(channels: &[f64]) -> Result<[f64; 3], JsValue> {
    <[f64; 3]>::try_from(channels).map_err(|_| JsValue::from_str("expected 3 color channels"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

/// Page session: owns the one view state and keeps the URL in step with it.
///
/// JS calls [`MapSession::publish`] once the map is set up and wires the map
/// widget's `moveend` to [`MapSession::view_settled`].
#[wasm_bindgen]
pub struct MapSession {
    config: DemoConfig,
    state: ViewState,
    overlay: Option<Overlay>,
}

#[wasm_bindgen]
impl MapSession {
    /// Reads the current `location.hash`. Without `config_json` the embedded
    /// deployment document is used.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<MapSession, JsValue> {
        let config = match config_json {
            Some(text) => DemoConfig::from_json(&text),
            None => DemoConfig::embedded(),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let raw = location()?.hash()?;
        // Location names arrive percent-encoded (`New%20York`).
        let fragment = js_sys::decode_uri_component(&raw)
            .map(String::from)
            .unwrap_or(raw);

        let parsed = HashSync::new(&config).parse(&fragment);
        for issue in &parsed.issues {
            console::warn_1(&JsValue::from_str(&format!("url hash: {issue}")));
        }

        Ok(MapSession {
            config,
            state: parsed.state,
            overlay: None,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn lat(&self) -> f64 {
        self.state.lat
    }

    #[wasm_bindgen(getter)]
    pub fn lng(&self) -> f64 {
        self.state.lng
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> i32 {
        self.state.zoom
    }

    #[wasm_bindgen(getter)]
    pub fn min_zoom(&self) -> i32 {
        self.config.min_zoom
    }

    #[wasm_bindgen(getter)]
    pub fn max_zoom(&self) -> i32 {
        self.config.max_zoom
    }

    #[wasm_bindgen(getter)]
    pub fn source_id(&self) -> String {
        self.state.source_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> Option<String> {
        self.state.mode().map(str::to_string)
    }

    /// `{ type, url, layers, styles }` of the active source.
    pub fn tile_source(&self) -> Result<JsValue, JsValue> {
        let source = self
            .config
            .source(&self.state.source_id)
            .ok_or("active source missing from config")?;
        to_js(source)
    }

    /// Fragment for the current state, without the leading `#`.
    pub fn hash(&self) -> String {
        HashSync::new(&self.config).serialize(&self.state)
    }

    /// Call whenever the map comes to rest; rewrites the URL fragment.
    pub fn view_settled(&mut self, lat: f64, lng: f64, zoom: f64) -> Result<String, JsValue> {
        self.state.settle(lat, lng, zoom, &self.config);
        self.publish()
    }

    /// Moves the state to a named location. Returns `false` for unknown names.
    pub fn go_to(&mut self, name: &str) -> Result<bool, JsValue> {
        let Some(at) = self.config.locations.get(name).copied() else {
            console::warn_1(&JsValue::from_str(&format!("unknown location `{name}`")));
            return Ok(false);
        };
        self.state.jump_to(&at, &self.config);
        self.publish()?;
        Ok(true)
    }

    pub fn location_names(&self) -> js_sys::Array {
        self.config
            .locations
            .names()
            .map(JsValue::from_str)
            .collect()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.state.has_flag(flag)
    }

    pub fn set_flag(&mut self, flag: &str) -> Result<bool, JsValue> {
        let added = self.state.set_flag(flag);
        if added {
            self.publish()?;
        }
        Ok(added)
    }

    /// Clearing the debug flag also tears the overlay down.
    pub fn clear_flag(&mut self, flag: &str) -> Result<bool, JsValue> {
        let removed = self.state.clear_flag(flag);
        if removed {
            if flag == DEBUG_FLAG {
                self.overlay = None;
            }
            self.publish()?;
        }
        Ok(removed)
    }

    pub fn set_mode(&mut self, word: &str) -> Result<(), JsValue> {
        self.state.set_mode(word);
        self.publish().map(|_| ())
    }

    /// Starts the frame-timing overlay in `element_id` if the debug flag is
    /// set. Returns whether an overlay is running afterwards.
    pub fn attach_overlay(&mut self, element_id: &str) -> Result<bool, JsValue> {
        if !self.state.has_flag(DEBUG_FLAG) {
            return Ok(false);
        }
        if self.overlay.is_some() {
            return Ok(true);
        }
        let element = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?
            .get_element_by_id(element_id)
            .ok_or("overlay element not found")?
            .dyn_into::<HtmlElement>()?;
        self.overlay = Some(overlay::attach(element)?);
        console::log_1(&JsValue::from_str("frame timing overlay attached"));
        Ok(true)
    }

    pub fn overlay_summary(&self) -> Option<String> {
        self.overlay.as_ref().map(Overlay::summary)
    }

    /// `[{ label, type }]` for the camera menu.
    pub fn camera_modes() -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        struct Entry {
            label: &'static str,
            #[serde(rename = "type")]
            kind: &'static str,
        }
        let entries: Vec<Entry> = CameraMode::ALL
            .into_iter()
            .map(|m| Entry {
                label: m.label(),
                kind: m.style_type(),
            })
            .collect();
        to_js(&entries)
    }

    pub fn lighting_preset_names() -> js_sys::Array {
        controls::lighting_presets()
            .iter()
            .map(|p| JsValue::from_str(p.name))
            .collect()
    }

    /// Light block for a preset name, or `null`.
    pub fn lighting_preset(name: &str) -> Result<JsValue, JsValue> {
        match controls::lighting_preset(name) {
            Some(preset) => to_js(&preset.lighting),
            None => Ok(JsValue::NULL),
        }
    }

    /// Menu entry to preselect for the scene's current light type.
    pub fn initial_lighting(kind: &str) -> Option<String> {
        controls::preset_for_type(kind).map(str::to_string)
    }

    /// `{ name, visible, color, rgb255 }` for a style layer, built from its
    /// `visible` and `color.default` (0..1) entries.
    pub fn layer_control(
        name: &str,
        visible: Option<bool>,
        color: Vec<f64>,
    ) -> Result<JsValue, JsValue> {
        let control = LayerControl::new(name, visible, rgb(&color)?);
        to_js(&LayerPanelEntry::from(control))
    }

    /// Color picker value (0..255) back into renderer space (0..1).
    pub fn layer_color_from_255(rgb255: Vec<f64>) -> Result<Vec<f64>, JsValue> {
        Ok(controls::rgb255_to_unit(rgb(&rgb255)?).to_vec())
    }

    /// Writes the current state into the URL fragment.
    pub fn publish(&self) -> Result<String, JsValue> {
        let mut bar = AddressBar(location()?);
        HashSync::new(&self.config).publish(&self.state, &mut bar)
    }
}
