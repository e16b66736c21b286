//! The QR-carrying visual contract.
//!
//! Rendering a QR symbol and scanning one out of a photo are done by external
//! collaborators behind [`QrRenderer`] and [`QrScanner`]. This module owns the
//! parts that decide whether a token survives re-compression and cropping:
//! where the symbol goes, how large it is, and how a scan is attempted.

pub mod qr;
pub mod raster;

pub use qr::{
    composite, recover_token, stamp_token, ErrorCorrection, QrLayout, QrRenderParams, QrRenderer,
    QrScanner, ScanPlan, ScannedCode,
};
pub use raster::Raster;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImagingError {
    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("rendered symbol is {width}x{height}, expected {expected}x{expected}")]
    SymbolSize {
        width: u32,
        height: u32,
        expected: u32,
    },
    #[error("QR rendering failed: {0}")]
    Render(String),
    #[error("no QR code could be read from the image")]
    QrNotFound,
}
