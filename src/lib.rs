#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! View-state plumbing for the vector map demo page: URL fragment parsing and
//! serialization, deployment config, debug-panel data and frame timing.

pub mod config;
pub mod controls;
pub mod hash;
pub mod state;
pub mod timing;

pub use config::{ConfigError, DemoConfig, LocationRegistry, NamedLocation, TileSource};
pub use hash::{FragmentTarget, HashFormat, HashIssue, HashSync, Parsed, Shape};
pub use state::{ViewState, DEBUG_FLAG};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod overlay;
    mod session;

    pub use session::MapSession;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::MapSession;
