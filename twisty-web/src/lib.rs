/// Twisty Web - browser bindings for the shared puzzle client
///
/// The page owns the canvas and the network; this crate owns the session.
/// JavaScript issues a request id with `begin_request`, performs the fetch,
/// and hands the JSON body back so stale answers can be discarded here.
/// Move answers need no id: they are newer than any fetch still in flight.

use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use twisty_core::{
    Applied, ClientConfig, CubeError, CubeResult, MoveResponse, MoveToken, Notice, RequestId,
    Session, StateSnapshot,
};
use wasm_bindgen::prelude::*;

fn to_js(err: CubeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if window.alert_with_message(message).is_err() {
            warn!(text = message, "alert failed");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn alert(message: &str) {
    warn!(text = message, "alert");
}

/// Session state for one browser tab
#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(user: String) -> Result<WebSession, JsValue> {
        Self::start(user).map_err(to_js)
    }

    pub fn user(&self) -> String {
        self.session.user().to_string()
    }

    /// Id for the next fetch; pass it back with the response
    pub fn begin_request(&mut self) -> f64 {
        self.session.next_request() as f64
    }

    /// Apply a `/getstate` body. Returns false when a newer response already landed.
    pub fn apply_state_json(&mut self, request: f64, json: &str) -> Result<bool, JsValue> {
        self.apply_state(request as RequestId, json)
            .map(|applied| matches!(applied, Applied::Fresh(_)))
            .map_err(to_js)
    }

    /// Key path: the token to send for `key`, or nothing if the key is not a turn
    pub fn key_move(&self, key: &str) -> Option<String> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => MoveToken::from_key(c).map(|token| token.to_string()),
            _ => None,
        }
    }

    /// Button path: the button's base letter plus the checked modifier radio value
    pub fn button_move(&mut self, base: &str, radio: &str) -> Result<String, JsValue> {
        self.button_token(base, radio)
            .map(|token| token.to_string())
            .map_err(to_js)
    }

    /// Apply a `/maketurn` body. A rejection alerts the user and returns false.
    pub fn apply_move_response_json(&mut self, token: &str, json: &str) -> Result<bool, JsValue> {
        self.apply_move_response(token, json)
            .map(|applied| matches!(applied, Some(Applied::Fresh(_))))
            .map_err(to_js)
    }

    /// `[px, py, pz, qx, qy, qz, qw]` per cubie, in registry order
    pub fn placements(&self) -> Vec<f32> {
        self.session
            .placements()
            .iter()
            .flat_map(|p| {
                let [qx, qy, qz, qw] = p.orientation.to_array();
                [p.position.x, p.position.y, p.position.z, qx, qy, qz, qw]
            })
            .collect()
    }

    /// Sticker layout for building the scene once; only placements change afterwards
    pub fn stickers_json(&self) -> String {
        let cubies: Vec<_> = self
            .session
            .registry()
            .iter()
            .map(|(index, cubie)| {
                let stickers: Vec<_> = cubie
                    .stickers
                    .iter()
                    .map(|sticker| {
                        json!({
                            "color": sticker.color.name(),
                            "rgb": sticker.color.rgb(),
                            "offset": [sticker.offset.x, sticker.offset.y, sticker.offset.z],
                            "rotation": sticker.rotation.to_array(),
                            "doubleSided": sticker.double_sided,
                        })
                    })
                    .collect();
                json!({
                    "index": index,
                    "extent": cubie.metrics.extent,
                    "stickerSize": cubie.metrics.sticker_size(),
                    "stickerThickness": cubie.metrics.sticker_thickness,
                    "stickers": stickers,
                })
            })
            .collect();
        serde_json::Value::Array(cubies).to_string()
    }

    /// Drain pending notices as display strings
    pub fn take_notices(&mut self) -> Vec<String> {
        self.session
            .take_notices()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl WebSession {
    pub fn start(user: String) -> CubeResult<Self> {
        let session = Session::start(&ClientConfig::default(), user)?;
        info!(user = session.user(), "web session started");
        Ok(Self { session })
    }

    pub fn apply_state(&mut self, request: RequestId, json: &str) -> CubeResult<Applied> {
        let snapshot = StateSnapshot::from_json(json)?;
        self.session.apply_response(request, &snapshot)
    }

    pub fn button_token(&mut self, base: &str, radio: &str) -> CubeResult<MoveToken> {
        MoveToken::from_button(base, radio).map_err(|err| {
            self.notify(Notice::InvalidMove {
                token: format!("{base}{radio}"),
                status: err.to_string(),
            });
            err
        })
    }

    /// `None` when the engine rejected the move
    pub fn apply_move_response(&mut self, token: &str, json: &str) -> CubeResult<Option<Applied>> {
        let response = MoveResponse::from_json(json)?;
        if !response.is_ok() {
            self.notify(Notice::InvalidMove {
                token: token.to_string(),
                status: response.status,
            });
            return Ok(None);
        }
        let snapshot = response
            .into_snapshot()
            .unwrap_or_else(|| StateSnapshot::new(Vec::new()));
        let id = self.session.next_request();
        self.session.apply_response(id, &snapshot).map(Some)
    }

    fn notify(&mut self, notice: Notice) {
        warn!(%notice, "move rejected");
        alert(&notice.to_string());
        self.session.push_notice(notice);
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info"));
    tracing_subscriber::registry().with(fmt_layer).init();
}
