//! Pixel cores for the built-in filters.
//!
//! Every function takes an RGBA buffer and returns a new one of the same
//! size. Row loops run in parallel with rayon. Alpha is carried through
//! untouched except where a filter resamples (twirl, pixellate, crystallize).

use super::calculations::{block_start, cell_grid, twirl_source, vignette_factor, vignette_softness};
use image::{RgbaImage, imageops};
use rayon::prelude::*;

/// Run `transform` over every pixel, in parallel by row.
///
/// `transform` receives `(x, y, r, g, b, a)` in `0.0..=255.0` and returns the
/// new channel values, which are rounded and clamped.
fn apply_per_pixel<F>(src: &RgbaImage, transform: F) -> RgbaImage
where
    F: Fn(u32, u32, f32, f32, f32, f32) -> (f32, f32, f32, f32) + Sync,
{
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w * 4;
    let mut dst_raw = vec![0u8; w * h * 4];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                let (r, g, b, a) = transform(
                    x as u32,
                    y as u32,
                    row_in[pi] as f32,
                    row_in[pi + 1] as f32,
                    row_in[pi + 2] as f32,
                    row_in[pi + 3] as f32,
                );
                row_out[pi] = to_u8(r);
                row_out[pi + 1] = to_u8(g);
                row_out[pi + 2] = to_u8(b);
                row_out[pi + 3] = to_u8(a);
            }
        });

    from_raw(src, dst_raw)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Rebuild an image the same size as `like`. The buffer length always
/// matches, so the fallback is unreachable in practice.
fn from_raw(like: &RgbaImage, raw: Vec<u8>) -> RgbaImage {
    RgbaImage::from_raw(like.width(), like.height(), raw).unwrap_or_else(|| like.clone())
}

fn sample_clamped(img: &RgbaImage, x: i64, y: i64) -> [f32; 4] {
    let cx = x.clamp(0, img.width() as i64 - 1) as u32;
    let cy = y.clamp(0, img.height() as i64 - 1) as u32;
    let p = img.get_pixel(cx, cy).0;
    [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
}

fn sample_bilinear(img: &RgbaImage, fx: f32, fy: f32) -> [f32; 4] {
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let dx = fx - x0 as f32;
    let dy = fy - y0 as f32;

    let p00 = sample_clamped(img, x0, y0);
    let p10 = sample_clamped(img, x0 + 1, y0);
    let p01 = sample_clamped(img, x0, y0 + 1);
    let p11 = sample_clamped(img, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = p00[c] * (1.0 - dx) * (1.0 - dy)
            + p10[c] * dx * (1.0 - dy)
            + p01[c] * (1.0 - dx) * dy
            + p11[c] * dx * dy;
    }
    out
}

/// Deterministic per-cell jitter in `0.0..1.0`.
fn hash_f32(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed);
    h = h.wrapping_mul(0x9E3779B9);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EBCA6B);
    h ^= h >> 13;
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

// ============================================================================
// COLOR
// ============================================================================

/// Blend towards the classic sepia matrix. `intensity` 0 is identity, 1 is
/// full sepia; values above 1 extrapolate.
pub fn sepia(src: &RgbaImage, intensity: f32) -> RgbaImage {
    apply_per_pixel(src, |_, _, r, g, b, a| {
        let sr = 0.393 * r + 0.769 * g + 0.189 * b;
        let sg = 0.349 * r + 0.686 * g + 0.168 * b;
        let sb = 0.272 * r + 0.534 * g + 0.131 * b;
        (
            r + (sr - r) * intensity,
            g + (sg - g) * intensity,
            b + (sb - b) * intensity,
            a,
        )
    })
}

/// Darken towards the corners.
pub fn vignette(src: &RgbaImage, intensity: f32, radius: f32) -> RgbaImage {
    let cx = src.width() as f32 / 2.0;
    let cy = src.height() as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
    let softness = vignette_softness(radius);

    apply_per_pixel(src, |x, y, r, g, b, a| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let dist = (dx * dx + dy * dy).sqrt() / max_dist;
        let f = vignette_factor(dist, intensity, softness);
        (r * f, g * f, b * f, a)
    })
}

// ============================================================================
// BLUR / SHARPEN
// ============================================================================

/// Gaussian blur with `sigma = radius`. Radius 0 returns a copy.
pub fn gaussian_blur(src: &RgbaImage, radius: f32) -> RgbaImage {
    if radius <= 0.0 {
        return src.clone();
    }
    imageops::blur(src, radius)
}

/// `src + intensity × (src − blur(src, radius))` on color channels.
pub fn unsharp_mask(src: &RgbaImage, radius: f32, intensity: f32) -> RgbaImage {
    if radius <= 0.0 || intensity == 0.0 {
        return src.clone();
    }
    let blurred = imageops::blur(src, radius);
    let blur_raw = blurred.as_raw();
    let w = src.width() as usize;

    apply_per_pixel(src, |x, y, r, g, b, a| {
        let bi = (y as usize * w + x as usize) * 4;
        let sharpen = |s: f32, c: usize| s + intensity * (s - blur_raw[bi + c] as f32);
        (sharpen(r, 0), sharpen(g, 1), sharpen(b, 2), a)
    })
}

// ============================================================================
// STYLIZE
// ============================================================================

/// Sobel gradient magnitude per color channel, scaled by `intensity / 100`.
///
/// Flat regions go black; with the default slider mapping (`intensity` up
/// to 200) strong edges saturate quickly.
pub fn edges(src: &RgbaImage, intensity: f32) -> RgbaImage {
    const KX: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    const KY: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
    let gain = intensity / 100.0;

    apply_per_pixel(src, |x, y, _, _, _, a| {
        let mut gx = [0.0f32; 3];
        let mut gy = [0.0f32; 3];
        for ky in 0..3 {
            for kx in 0..3 {
                let p = sample_clamped(src, x as i64 + kx as i64 - 1, y as i64 + ky as i64 - 1);
                for c in 0..3 {
                    gx[c] += p[c] * KX[ky][kx];
                    gy[c] += p[c] * KY[ky][kx];
                }
            }
        }
        let mag = |c: usize| (gx[c] * gx[c] + gy[c] * gy[c]).sqrt() * gain;
        (mag(0), mag(1), mag(2), a)
    })
}

/// Square blocks of `scale` pixels, each filled with the pixel at its
/// center. Blocks are aligned so one block edge passes through `origin`.
pub fn pixellate(src: &RgbaImage, scale: f32, origin: (f32, f32)) -> RgbaImage {
    let block = scale.round().max(1.0) as u32;
    let (w, h) = (src.width(), src.height());
    if block <= 1 || w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w as usize * 4;
    let mut dst_raw = vec![0u8; src_raw.len()];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let by = block_start(y as u32, block, origin.1) + (block / 2) as i64;
            let sy = by.clamp(0, h as i64 - 1) as usize;
            for x in 0..w {
                let bx = block_start(x, block, origin.0) + (block / 2) as i64;
                let sx = bx.clamp(0, w as i64 - 1) as usize;
                let si = sy * stride + sx * 4;
                let pi = x as usize * 4;
                row_out[pi..pi + 4].copy_from_slice(&src_raw[si..si + 4]);
            }
        });

    from_raw(src, dst_raw)
}

/// Voronoi polygons of roughly `radius` pixels filled with their average
/// color. Seed points sit on a jittered grid anchored at `origin`, so the
/// same inputs always produce the same cells.
pub fn crystallize(src: &RgbaImage, radius: f32, origin: (f32, f32)) -> RgbaImage {
    let (w, h) = (src.width(), src.height());
    if radius < 1.0 || w == 0 || h == 0 {
        return src.clone();
    }
    let cell = radius;
    // One spare row and column: shifting by origin can expose the far edge.
    let (cells_x, cells_y) = cell_grid(w, h, cell);
    let (cells_x, cells_y) = (cells_x + 1, cells_y + 1);
    let ox = origin.0.rem_euclid(cell);
    let oy = origin.1.rem_euclid(cell);

    // One jittered seed per grid cell, shifted so the grid lines up with origin.
    let mut seeds: Vec<(f32, f32)> = Vec::with_capacity((cells_x * cells_y) as usize);
    for cy in 0..cells_y {
        for cx in 0..cells_x {
            let jx = hash_f32(cx as u32, cy as u32, 0);
            let jy = hash_f32(cx as u32, cy as u32, 77);
            seeds.push((
                (cx as f32 + jx) * cell + ox - cell,
                (cy as f32 + jy) * cell + oy - cell,
            ));
        }
    }

    let nearest = |x: u32, y: u32| -> usize {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let gcx = ((px - ox + cell) / cell) as i32;
        let gcy = ((py - oy + cell) / cell) as i32;
        let mut best = (f32::MAX, 0usize);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let nx = gcx + dx;
                let ny = gcy + dy;
                if nx < 0 || ny < 0 || nx >= cells_x || ny >= cells_y {
                    continue;
                }
                let idx = (ny * cells_x + nx) as usize;
                let (sx, sy) = seeds[idx];
                let d = (px - sx) * (px - sx) + (py - sy) * (py - sy);
                if d < best.0 {
                    best = (d, idx);
                }
            }
        }
        best.1
    };

    // Assign pixels to cells, then average.
    let assignment: Vec<usize> = (0..h)
        .into_par_iter()
        .flat_map_iter(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| nearest(x, y))
        .collect();

    let mut sums = vec![[0.0f64; 4]; seeds.len()];
    let mut counts = vec![0u32; seeds.len()];
    for (i, p) in src.pixels().enumerate() {
        let cell_idx = assignment[i];
        for c in 0..4 {
            sums[cell_idx][c] += p.0[c] as f64;
        }
        counts[cell_idx] += 1;
    }
    let averages: Vec<[u8; 4]> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &n)| {
            if n == 0 {
                return [0; 4];
            }
            let inv = 1.0 / n as f64;
            [0, 1, 2, 3].map(|c| (sum[c] * inv).round().clamp(0.0, 255.0) as u8)
        })
        .collect();

    let mut out = RgbaImage::new(w, h);
    for (i, p) in out.pixels_mut().enumerate() {
        p.0 = averages[assignment[i]];
    }
    out
}

// ============================================================================
// DISTORTION
// ============================================================================

/// Rotate pixels around `center`, by `angle` radians at the center tapering
/// to zero at `radius`. Samples bilinearly, clamping at the borders.
pub fn twirl(src: &RgbaImage, center: (f32, f32), radius: f32, angle: f32) -> RgbaImage {
    apply_per_pixel(src, |x, y, r, g, b, a| {
        let dest = (x as f32 + 0.5, y as f32 + 0.5);
        let (sx, sy) = twirl_source(dest, center, radius, angle);
        if (sx, sy) == dest {
            return (r, g, b, a);
        }
        let p = sample_bilinear(src, sx - 0.5, sy - 0.5);
        (p[0], p[1], p[2], p[3])
    })
}
