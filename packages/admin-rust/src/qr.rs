//! QR codes for teacher identifiers.
//!
//! The payload is the raw identifier string, with no envelope or schema, so
//! any scanner yields exactly the `teacher_id`.

use qrcode::render::{svg, unicode};
use qrcode::QrCode;

/// Minimum edge length of rendered SVG codes, in pixels.
pub const DEFAULT_SVG_SIZE: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    #[error("cannot encode an empty identifier")]
    EmptyPayload,
    #[error("could not encode QR payload: {0}")]
    Encode(String),
}

fn encode(payload: &str) -> Result<QrCode, QrError> {
    if payload.is_empty() {
        return Err(QrError::EmptyPayload);
    }
    QrCode::new(payload.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))
}

/// Renders `payload` as an SVG document at least `min_size` pixels square.
///
/// # Errors
///
/// Returns an error for an empty payload or one too long for any QR version.
pub fn render_svg(payload: &str, min_size: u32) -> Result<String, QrError> {
    let code = encode(payload)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(min_size, min_size)
        .build())
}

/// Renders `payload` with Unicode half blocks for display in a terminal.
///
/// # Errors
///
/// Returns an error for an empty payload or one too long for any QR version.
pub fn render_terminal(payload: &str) -> Result<String, QrError> {
    let code = encode(payload)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}
