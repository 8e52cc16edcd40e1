use crate::config::GridShape;
use crate::error::{Result, TriageError};
use image::imageops::{self, FilterType};
use image::{GenericImage, RgbImage};

/// Pixel size of one mosaic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Keeps the source aspect ratio; falls back to 16:9 when the source size is unknown.
    #[must_use]
    pub fn fit_width(cell_width: u32, source_width: u32, source_height: u32) -> Self {
        let height = if source_width == 0 || source_height == 0 {
            (u64::from(cell_width) * 9 / 16) as u32
        } else {
            (f64::from(cell_width) * f64::from(source_height) / f64::from(source_width)).round()
                as u32
        };
        Self {
            width: cell_width,
            height: height.max(1),
        }
    }
}

/// Scales a decoded frame to exactly one cell.
#[must_use]
pub fn fit_to_cell(frame: &RgbImage, cell: CellSize) -> RgbImage {
    if frame.dimensions() == (cell.width, cell.height) {
        return frame.clone();
    }
    imageops::resize(frame, cell.width, cell.height, FilterType::Triangle)
}

/// Lays `frames` out row-major: each row left to right, rows top to bottom.
pub fn compose_mosaic(frames: &[RgbImage], grid: GridShape, cell: CellSize) -> Result<RgbImage> {
    if frames.len() != grid.cell_count() {
        return Err(TriageError::Config(format!(
            "a {grid} mosaic needs {} frames, got {}",
            grid.cell_count(),
            frames.len()
        )));
    }

    let (Some(width), Some(height)) = (
        cell.width.checked_mul(grid.cols),
        cell.height.checked_mul(grid.rows),
    ) else {
        return Err(TriageError::Config(format!(
            "a {grid} mosaic of {}x{} cells is too large",
            cell.width, cell.height
        )));
    };
    let mut mosaic = RgbImage::new(width, height);

    for (index, frame) in frames.iter().enumerate() {
        let col = index as u32 % grid.cols;
        let row = index as u32 / grid.cols;
        let tile = fit_to_cell(frame, cell);
        mosaic.copy_from(&tile, col * cell.width, row * cell.height)?;
    }

    Ok(mosaic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, shade: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([shade, shade, shade]))
    }

    #[test]
    fn test_cell_size_keeps_aspect_ratio() {
        assert_eq!(
            CellSize::fit_width(320, 1920, 1080),
            CellSize { width: 320, height: 180 }
        );
        assert_eq!(
            CellSize::fit_width(320, 0, 0),
            CellSize { width: 320, height: 180 }
        );
        assert_eq!(CellSize::fit_width(1, 1000, 1).height, 1);
    }

    #[test]
    fn test_compose_row_major_grid() {
        let grid = GridShape::new(2, 3);
        let cell = CellSize { width: 8, height: 4 };
        let frames: Vec<RgbImage> = (0..6).map(|i| solid(8, 4, i * 40)).collect();

        let mosaic = compose_mosaic(&frames, grid, cell).unwrap();

        assert_eq!(mosaic.dimensions(), (24, 8));
        for index in 0..6u32 {
            let x = (index % 3) * 8 + 4;
            let y = (index / 3) * 4 + 2;
            assert_eq!(mosaic.get_pixel(x, y), &Rgb([index as u8 * 40; 3]));
        }
    }

    #[test]
    fn test_compose_scales_mismatched_frames() {
        let grid = GridShape::new(1, 2);
        let cell = CellSize { width: 10, height: 10 };
        let frames = vec![solid(40, 40, 10), solid(5, 7, 200)];

        let mosaic = compose_mosaic(&frames, grid, cell).unwrap();
        assert_eq!(mosaic.dimensions(), (20, 10));
        assert_eq!(mosaic.get_pixel(15, 5), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_compose_rejects_wrong_frame_count() {
        let frames = vec![solid(4, 4, 0); 3];
        let cell = CellSize { width: 4, height: 4 };
        assert!(compose_mosaic(&frames, GridShape::new(2, 2), cell).is_err());
    }

    #[test]
    fn test_compose_rejects_overflowing_dimensions() {
        let frames = vec![solid(4, 4, 0); 2];
        let cell = CellSize { width: u32::MAX / 2 + 1, height: 4 };

        let err = compose_mosaic(&frames, GridShape::new(1, 2), cell).unwrap_err();
        assert!(matches!(err, TriageError::Config(_)));
    }
}
