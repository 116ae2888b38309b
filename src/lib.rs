//! Shader gallery - animated point clouds and full-screen fragment shaders
//!
//! The animation core (`core`, `demos`, `gallery`) has no GUI dependency and
//! is shared by the egui app (native and wasm) and the headless CLI.

pub mod assets;
pub mod config;
pub mod core;
pub mod demos;
pub mod error;
pub mod gallery;
pub mod time;

#[cfg(any(feature = "native", feature = "wasm"))]
pub mod app;
#[cfg(any(feature = "native", feature = "wasm"))]
pub mod render;
#[cfg(any(feature = "native", feature = "wasm"))]
pub mod theme;

pub use config::GalleryConfig;
pub use demos::{Demo, DemoId, DemoKind};
pub use error::{GalleryError, Result};
pub use gallery::Gallery;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::GalleryApp;
    use crate::config::GalleryConfig;
    use crate::demos::DemoId;

    /// Demo preselected by the host page through `window.__gallery_demo`.
    fn preselected_demo() -> Option<DemoId> {
        let name = js_sys::eval("window.__gallery_demo").ok()?.as_string()?;
        match name.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring window.__gallery_demo");
                None
            }
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let mut config = GalleryConfig::default();
        if let Some(demo) = preselected_demo() {
            config.demo = demo;
        }

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let Some(canvas) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("canvas"))
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            else {
                tracing::error!("no <canvas id=\"canvas\"> element");
                return;
            };

            let started = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(GalleryApp::new(cc, false, config)))),
                )
                .await;
            if let Err(e) = started {
                tracing::error!(error = ?e, "failed to start eframe");
            }
        });
    }
}
