use super::ImagingError;

const CHANNELS: usize = 4;

/// A decoded RGBA8 bitmap, row-major with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ImagingError> {
        let expected = width as usize * height as usize * CHANNELS;
        if rgba.len() != expected {
            return Err(ImagingError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A raster of one solid colour.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let rgba = pixel.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.rgba[offset..offset + CHANNELS]);
        Some(pixel)
    }

    /// Writes one pixel; coordinates outside the raster are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        if let Some(offset) = self.offset(x, y) {
            self.rgba[offset..offset + CHANNELS].copy_from_slice(&pixel);
        }
    }

    /// Fills a rectangle, clipped to the raster bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, pixel: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.put_pixel(col, row, pixel);
            }
        }
    }

    /// Copies `source` 1:1 with its top-left corner at `(x, y)`, clipped.
    pub fn blit(&mut self, source: &Raster, x: u32, y: u32) {
        for row in 0..source.height {
            for col in 0..source.width {
                if let Some(pixel) = source.pixel(col, row) {
                    self.put_pixel(x.saturating_add(col), y.saturating_add(row), pixel);
                }
            }
        }
    }

    /// The part of the raster from `(x, y)` to its bottom-right corner.
    pub fn crop(&self, x: u32, y: u32) -> Raster {
        let width = self.width.saturating_sub(x);
        let height = self.height.saturating_sub(y);
        let mut cropped = Raster::filled(width, height, [0; 4]);
        for row in 0..height {
            for col in 0..width {
                if let Some(pixel) = self.pixel(x + col, y + row) {
                    cropped.put_pixel(col, row, pixel);
                }
            }
        }
        cropped
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn test_new_checks_buffer_length() {
        assert_eq!(
            Raster::new(2, 2, vec![0; 15]),
            Err(ImagingError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
        assert!(Raster::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut raster = Raster::filled(4, 4, RED);
        raster.fill_rect(2, 2, 10, 10, BLUE);
        assert_eq!(raster.pixel(1, 1), Some(RED));
        assert_eq!(raster.pixel(3, 3), Some(BLUE));
        assert_eq!(raster.pixel(4, 4), None);
    }

    #[test]
    fn test_crop_keeps_bottom_right() {
        let mut raster = Raster::filled(3, 3, RED);
        raster.put_pixel(2, 2, BLUE);
        let cropped = raster.crop(1, 1);
        assert_eq!((cropped.width(), cropped.height()), (2, 2));
        assert_eq!(cropped.pixel(1, 1), Some(BLUE));
        assert_eq!(cropped.pixel(0, 0), Some(RED));
        assert_eq!(raster.crop(5, 0).width(), 0);
    }

    #[test]
    fn test_blit_copies_without_scaling() {
        let mut target = Raster::filled(5, 5, RED);
        let mut source = Raster::filled(2, 2, BLUE);
        source.put_pixel(1, 1, RED);
        target.blit(&source, 3, 3);
        assert_eq!(target.pixel(3, 3), Some(BLUE));
        assert_eq!(target.pixel(4, 3), Some(BLUE));
        assert_eq!(target.pixel(4, 4), Some(RED));
        assert_eq!(target.pixel(2, 2), Some(RED));
    }
}
