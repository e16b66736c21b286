use super::{ImagingError, Raster};

/// Smallest symbol edge in pixels, whatever the photo size.
pub const MIN_QR_SIZE: u32 = 160;
/// Symbol edge as a fraction of the photo's shorter side.
pub const QR_SIZE_RATIO: f64 = 0.10;
/// White border around the symbol as a fraction of its edge.
pub const QR_PAD_RATIO: f64 = 0.01;
/// Quiet zone in modules, drawn by the renderer inside the symbol.
pub const QR_MARGIN_MODULES: u32 = 2;
/// Longest side a photo is reduced to before scanning.
pub const SCAN_MAX_SIDE: u32 = 1400;

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

/// What the rendering collaborator is asked to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrRenderParams {
    pub error_correction: ErrorCorrection,
    pub margin_modules: u32,
    /// Final edge length in pixels; the symbol is pasted without rescaling.
    pub width: u32,
}

/// Placement of the QR symbol in the bottom-right corner of a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrLayout {
    pub qr_size: u32,
    pub pad: u32,
    /// Edge of the opaque white box: `qr_size + 2 * pad`.
    pub box_size: u32,
    /// Top-left of the white box; negative when the photo is smaller than the box.
    pub box_x: i64,
    pub box_y: i64,
}

impl QrLayout {
    pub fn for_image(width: u32, height: u32) -> Self {
        let shorter = width.min(height);
        let qr_size = MIN_QR_SIZE.max((f64::from(shorter) * QR_SIZE_RATIO).floor() as u32);
        let pad = (f64::from(qr_size) * QR_PAD_RATIO).floor() as u32;
        let box_size = qr_size + pad * 2;
        Self {
            qr_size,
            pad,
            box_size,
            box_x: i64::from(width) - i64::from(box_size),
            box_y: i64::from(height) - i64::from(box_size),
        }
    }

    pub fn render_params(&self) -> QrRenderParams {
        QrRenderParams {
            error_correction: ErrorCorrection::Quartile,
            margin_modules: QR_MARGIN_MODULES,
            width: self.qr_size,
        }
    }
}

/// How a photo is prepared before being handed to the scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPlan {
    /// Never above 1: photos are only ever shrunk.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub smoothing: bool,
    /// Also try the colour-inverted image.
    pub attempt_inverted: bool,
}

impl ScanPlan {
    pub fn for_image(width: u32, height: u32) -> Self {
        let longer = width.max(height).max(1);
        let scale = (f64::from(SCAN_MAX_SIDE) / f64::from(longer)).min(1.0);
        Self {
            scale,
            width: ((f64::from(width) * scale).floor() as u32).max(1),
            height: ((f64::from(height) * scale).floor() as u32).max(1),
            smoothing: true,
            attempt_inverted: true,
        }
    }
}

/// What a scanner reports; `data` is exactly the token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCode {
    pub data: String,
}

/// Draws a QR symbol for a token.
pub trait QrRenderer {
    /// Must return a square raster exactly `params.width` pixels wide.
    fn render(&self, data: &str, params: &QrRenderParams) -> Result<Raster, ImagingError>;
}

/// Finds and decodes a QR symbol in a photo.
pub trait QrScanner {
    /// Implementations resample `raster` to the plan's dimensions themselves.
    fn scan(&self, raster: &Raster, plan: &ScanPlan) -> Option<ScannedCode>;
}

/// Pastes `symbol` into `raster` on an opaque white box, without scaling.
pub fn composite(raster: &mut Raster, symbol: &Raster, layout: &QrLayout) -> Result<(), ImagingError> {
    if symbol.width() != layout.qr_size || symbol.height() != layout.qr_size {
        return Err(ImagingError::SymbolSize {
            width: symbol.width(),
            height: symbol.height(),
            expected: layout.qr_size,
        });
    }

    // Clip the box to the raster when the photo is smaller than the box.
    let box_x = layout.box_x.max(0) as u32;
    let box_y = layout.box_y.max(0) as u32;
    let box_w = (layout.box_x + i64::from(layout.box_size) - i64::from(box_x)).max(0) as u32;
    let box_h = (layout.box_y + i64::from(layout.box_size) - i64::from(box_y)).max(0) as u32;
    raster.fill_rect(box_x, box_y, box_w, box_h, WHITE);

    let symbol_x = layout.box_x + i64::from(layout.pad);
    let symbol_y = layout.box_y + i64::from(layout.pad);
    if symbol_x >= 0 && symbol_y >= 0 {
        raster.blit(symbol, symbol_x as u32, symbol_y as u32);
    } else {
        // Only the part of the symbol that falls inside the raster is kept.
        let skip_x = (-symbol_x).max(0) as u32;
        let skip_y = (-symbol_y).max(0) as u32;
        let visible = symbol.crop(skip_x, skip_y);
        raster.blit(&visible, symbol_x.max(0) as u32, symbol_y.max(0) as u32);
    }
    Ok(())
}

/// Renders `token` and stamps it into the bottom-right corner of `raster`.
pub fn stamp_token<R: QrRenderer + ?Sized>(
    renderer: &R,
    raster: &mut Raster,
    token: &str,
) -> Result<QrLayout, ImagingError> {
    let layout = QrLayout::for_image(raster.width(), raster.height());
    let symbol = renderer.render(token, &layout.render_params())?;
    composite(raster, &symbol, &layout)?;
    log::debug!(
        "stamped {}px QR at ({}, {}) into {}x{} image",
        layout.qr_size,
        layout.box_x,
        layout.box_y,
        raster.width(),
        raster.height()
    );
    Ok(layout)
}

/// Scans `raster` and returns the token it carries, untouched.
pub fn recover_token<S: QrScanner + ?Sized>(scanner: &S, raster: &Raster) -> Result<String, ImagingError> {
    let plan = ScanPlan::for_image(raster.width(), raster.height());
    scanner
        .scan(raster, &plan)
        .map(|code| code.data)
        .filter(|data| !data.is_empty())
        .ok_or(ImagingError::QrNotFound)
}
