//! The crop editor as a JavaScript class.
//!
//! # Example
//!
//! ```typescript
//! const editor = JsCropEditor.avatar();
//! editor.loadBytes(new Uint8Array(await file.arrayBuffer()));
//!
//! // slider callbacks
//! editor.setZoom(1.5);
//! editor.setRotation(90);
//! const [x, y, w, h] = editor.fitCropRect();
//!
//! const artifact = editor.apply();
//! if (artifact) form.append('avatar', new Blob([artifact.bytes()]), artifact.suggestedFilename);
//! ```

use serde::Serialize;
use showcrop_core::decode::{ImageSource, OfflineFetcher};
use showcrop_core::{
    AspectPolicy, CropEditor, CropRect, CropSession, EditState, PipelineConfig, SessionError,
};
use wasm_bindgen::prelude::*;

use crate::error::{to_js_error, type_error};
use crate::types::JsArtifact;

fn rect_to_vec(rect: CropRect) -> Vec<f64> {
    vec![rect.x, rect.y, rect.width, rect.height]
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    state: EditState,
    session: Option<&'a CropSession>,
    composite_size: Option<(u32, u32)>,
    last_error: Option<&'static str>,
}

#[wasm_bindgen]
pub struct JsCropEditor {
    inner: CropEditor,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Create an editor from a plain config object.
    ///
    /// Missing fields take the showcase defaults; `undefined` gives the
    /// showcase preset.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| type_error(&format!("Invalid editor config: {}", e)))?
        };
        CropEditor::new(config)
            .map(|inner| JsCropEditor { inner })
            .map_err(to_js_error)
    }

    /// Square avatar editor: 1:1 locked, round guide, JPEG output.
    pub fn avatar() -> JsCropEditor {
        JsCropEditor {
            inner: CropEditor::avatar(),
        }
    }

    /// Showcase cover editor: 16:9 default with 4:3, 3:2 and 1:1 presets.
    pub fn showcase() -> JsCropEditor {
        JsCropEditor {
            inner: CropEditor::showcase(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    /// Decode picked file bytes and start a new session.
    #[wasm_bindgen(js_name = loadBytes)]
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner
            .load(&ImageSource::Bytes(bytes), &OfflineFetcher)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = loadDataUri)]
    pub fn load_data_uri(&mut self, uri: String) -> Result<(), JsValue> {
        self.inner
            .load(&ImageSource::DataUri(uri), &OfflineFetcher)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = acknowledgeFailure)]
    pub fn acknowledge_failure(&mut self) -> Result<(), JsValue> {
        self.inner.acknowledge_failure().map_err(to_js_error)
    }

    pub fn cancel(&mut self) -> Result<(), JsValue> {
        self.inner.cancel().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), JsValue> {
        self.with_session(|s| s.set_zoom(zoom))
    }

    #[wasm_bindgen(js_name = setRotation)]
    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.with_session(|s| s.set_rotation(degrees))
    }

    #[wasm_bindgen(js_name = rotateBy)]
    pub fn rotate_by(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.with_session(|s| s.rotate_by(degrees))
    }

    #[wasm_bindgen(js_name = setAspectRatio)]
    pub fn set_aspect_ratio(&mut self, ratio: f64) -> Result<(), JsValue> {
        self.with_session(|s| s.set_aspect_ratio(ratio))
    }

    #[wasm_bindgen(js_name = setPan)]
    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.with_session(|s| s.set_pan(x, y))
    }

    /// Set the crop rectangle in composite pixels, as reported by the
    /// controller.
    #[wasm_bindgen(js_name = setCropRect)]
    pub fn set_crop_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        self.with_session(|s| s.set_crop_rect(CropRect::new(x, y, width, height)))
    }

    /// Derive the crop rectangle from zoom and pan. Returns `[x, y, w, h]`.
    #[wasm_bindgen(js_name = fitCropRect)]
    pub fn fit_crop_rect(&mut self) -> Result<Vec<f64>, JsValue> {
        let (width, height) = self.source_size()?;
        self.with_session(|s| Ok(rect_to_vec(s.fit_crop_rect(width, height))))
    }

    /// Drop the crop rectangle, e.g. when the controller resets its selection.
    #[wasm_bindgen(js_name = clearCropRect)]
    pub fn clear_crop_rect(&mut self) -> Result<(), JsValue> {
        self.with_session(|s| {
            s.clear_crop_rect();
            Ok(())
        })
    }

    /// Ratios the user may pick from, or `undefined` when the ratio is locked.
    #[wasm_bindgen(getter, js_name = aspectPresets)]
    pub fn aspect_presets(&self) -> Option<Vec<f64>> {
        match self.inner.session()?.aspect_policy() {
            AspectPolicy::Locked => None,
            AspectPolicy::Presets(presets) => Some(presets.clone()),
        }
    }

    /// Current crop rectangle as `[x, y, w, h]`, if one is set.
    #[wasm_bindgen(getter, js_name = cropRect)]
    pub fn crop_rect(&self) -> Option<Vec<f64>> {
        self.inner.session()?.crop_rect().map(rect_to_vec)
    }

    /// Size of the rotated composite as `[width, height]`.
    #[wasm_bindgen(getter, js_name = compositeSize)]
    pub fn composite_size(&self) -> Option<Vec<u32>> {
        let (w, h) = self.inner.raster()?.dimensions();
        let (cw, ch) = self.inner.session()?.composite_size(w, h);
        Some(vec![cw, ch])
    }

    /// User-facing message of the last failure, if any.
    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(|e| e.user_message().to_string())
    }

    /// State, session values and last error as a plain object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let composite_size = match (self.inner.raster(), self.inner.session()) {
            (Some(raster), Some(session)) => {
                Some(session.composite_size(raster.width(), raster.height()))
            }
            _ => None,
        };
        let snapshot = Snapshot {
            state: self.inner.state(),
            session: self.inner.session(),
            composite_size,
            last_error: self.inner.last_error().map(|e| e.user_message()),
        };
        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run the crop and return the artifact, or `undefined` if cancelled.
    ///
    /// On failure the editor stays in `editing` with the session intact.
    pub fn apply(&mut self) -> Result<Option<JsArtifact>, JsValue> {
        self.inner
            .apply()
            .map(|artifact| artifact.map(JsArtifact::from_artifact))
            .map_err(to_js_error)
    }
}

impl JsCropEditor {
    fn with_session<T>(
        &mut self,
        f: impl FnOnce(&mut CropSession) -> Result<T, SessionError>,
    ) -> Result<T, JsValue> {
        let session = self.inner.session_mut().map_err(to_js_error)?;
        f(session).map_err(to_js_error)
    }

    fn source_size(&self) -> Result<(u32, u32), JsValue> {
        match self.inner.raster() {
            Some(raster) => Ok(raster.dimensions()),
            None => Err(to_js_error(SessionError::InvalidTransition {
                from: self.inner.state(),
                action: "fit a crop rectangle",
            })),
        }
    }
}
