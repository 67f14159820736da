//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is split into a `grid x grid` array of equal-sized tiles. When
//! the grid does not divide the image, the image is mirrored past its right
//! and bottom edges (reflect-101) until it does. Each tile gets its own
//! equalization lookup table built from a clipped histogram, and every output
//! pixel is a bilinear blend of the tables of the four nearest tile centres,
//! which hides tile seams.
//!
//! # Clipping
//!
//! A tile histogram bin may hold at most `clip_limit * tile_pixels / 256`
//! counts (and at least 1). The excess is spread evenly over all 256 bins and
//! any leftover is handed out one count at a time at a fixed stride across the
//! histogram. This caps how steep the mapping can get and therefore how much
//! noise is amplified.

use super::EnhanceError;
use crate::GrayImage;

const BINS: usize = 256;

/// Largest accepted tile grid (tiles per side).
pub const MAX_TILE_GRID: u32 = 64;

/// Check that a clip limit is positive and finite.
pub fn validate_clip_limit(clip_limit: f32) -> Result<(), EnhanceError> {
    if clip_limit.is_finite() && clip_limit > 0.0 {
        Ok(())
    } else {
        Err(EnhanceError::InvalidClipLimit(clip_limit))
    }
}

/// Check that a tile grid is in `1..=MAX_TILE_GRID`.
pub fn validate_tile_grid(tile_grid: u32) -> Result<(), EnhanceError> {
    match tile_grid {
        0 => Err(EnhanceError::ZeroTileGrid),
        grid if grid > MAX_TILE_GRID => Err(EnhanceError::TileGridTooLarge {
            grid,
            max: MAX_TILE_GRID,
        }),
        _ => Ok(()),
    }
}

/// Apply CLAHE to a grayscale image.
///
/// Images smaller than the grid along an axis use one tile per pixel on that
/// axis.
///
/// # Errors
///
/// Returns `EnhanceError::InvalidClipLimit`, `EnhanceError::ZeroTileGrid` or
/// `EnhanceError::TileGridTooLarge` for unusable parameters.
pub fn clahe(image: &GrayImage, clip_limit: f32, tile_grid: u32) -> Result<GrayImage, EnhanceError> {
    validate_clip_limit(clip_limit)?;
    validate_tile_grid(tile_grid)?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(image.clone());
    }

    let cols = Axis::new(width, tile_grid);
    let rows = Axis::new(height, tile_grid);
    let luts = tile_luts(image, &cols, &rows, clip_limit);
    let lut = |tx: usize, ty: usize| &luts[ty * cols.tiles as usize + tx];

    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let value = image.get_pixel(x, y)[0] as usize;
        let (tx0, tx1, ax) = cols.neighbours(x);
        let (ty0, ty1, ay) = rows.neighbours(y);

        let top = lerp(lut(tx0, ty0)[value], lut(tx1, ty0)[value], ax);
        let bottom = lerp(lut(tx0, ty1)[value], lut(tx1, ty1)[value], ax);
        let blended = top + (bottom - top) * ay;

        pixel[0] = blended.round().clamp(0.0, 255.0) as u8;
    }

    Ok(output)
}

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}

/// Tiling along one image axis, padded up to a whole number of tiles.
struct Axis {
    extent: u32,
    tiles: u32,
    tile_size: u32,
}

impl Axis {
    fn new(extent: u32, grid: u32) -> Self {
        let tiles = grid.min(extent).max(1);
        Self {
            extent,
            tiles,
            tile_size: extent.div_ceil(tiles),
        }
    }

    /// Range `[start, end)` of tile `i` in padded coordinates.
    fn bounds(&self, i: u32) -> (u32, u32) {
        let start = i * self.tile_size;
        (start, start + self.tile_size)
    }

    /// Source position for a padded position, mirrored without repeating the edge.
    fn source(&self, pos: u32) -> u32 {
        if pos < self.extent {
            return pos;
        }
        if self.extent == 1 {
            return 0;
        }
        let period = 2 * (self.extent - 1);
        let folded = pos % period;
        if folded < self.extent {
            folded
        } else {
            period - folded
        }
    }

    /// The two tiles whose centres bracket `pos`, and the weight of the second.
    fn neighbours(&self, pos: u32) -> (usize, usize, f32) {
        let last = self.tiles as i64 - 1;
        let f = (pos as f32 + 0.5) / self.tile_size as f32 - 0.5;
        let t0 = (f.floor() as i64).clamp(0, last);
        let t1 = (t0 + 1).min(last);
        let weight = if t1 == t0 { 0.0 } else { (f - t0 as f32).clamp(0.0, 1.0) };
        (t0 as usize, t1 as usize, weight)
    }
}

/// Build one equalization lookup table per tile, row-major by tile.
fn tile_luts(image: &GrayImage, cols: &Axis, rows: &Axis, clip_limit: f32) -> Vec<[u8; BINS]> {
    let tile_pixels = cols.tile_size * rows.tile_size;
    let mut luts = Vec::with_capacity((cols.tiles * rows.tiles) as usize);

    for ty in 0..rows.tiles {
        let (y0, y1) = rows.bounds(ty);
        for tx in 0..cols.tiles {
            let (x0, x1) = cols.bounds(tx);

            let mut hist = [0u32; BINS];
            for y in y0..y1 {
                let sy = rows.source(y);
                for x in x0..x1 {
                    hist[image.get_pixel(cols.source(x), sy)[0] as usize] += 1;
                }
            }

            clip_histogram(&mut hist, clip_limit, tile_pixels);
            luts.push(cdf_lut(&hist, tile_pixels));
        }
    }

    luts
}

/// Cap every bin and spread the excess over the histogram.
fn clip_histogram(hist: &mut [u32; BINS], clip_limit: f32, tile_pixels: u32) {
    let limit = ((clip_limit * tile_pixels as f32 / BINS as f32) as u32).max(1);

    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let per_bin = excess / BINS as u32;
    for bin in hist.iter_mut() {
        *bin += per_bin;
    }

    let residual = (excess % BINS as u32) as usize;
    if residual > 0 {
        let step = (BINS / residual).max(1);
        for bin in hist.iter_mut().step_by(step).take(residual) {
            *bin += 1;
        }
    }
}

/// Map each intensity to its scaled cumulative count.
fn cdf_lut(hist: &[u32; BINS], tile_pixels: u32) -> [u8; BINS] {
    let scale = 255.0 / tile_pixels.max(1) as f32;
    let mut lut = [0u8; BINS];
    let mut cumulative = 0u32;

    for (value, &count) in hist.iter().enumerate() {
        cumulative += count;
        lut[value] = (cumulative as f32 * scale).round().min(255.0) as u8;
    }

    lut
}
