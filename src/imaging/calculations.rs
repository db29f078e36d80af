//! Pure geometry for the filter effects.
//!
//! All functions here are pure and testable without any pixels.

/// Source coordinate for a destination pixel under a twirl.
///
/// Pixels at `center` rotate by the full `angle` (radians); the rotation
/// falls off quadratically to zero at `radius`. Pixels outside the radius
/// map to themselves.
///
/// # Examples
/// ```
/// # use instafilter::imaging::calculations::twirl_source;
/// // Outside the radius nothing moves.
/// assert_eq!(twirl_source((50.0, 0.0), (0.0, 0.0), 10.0, 1.0), (50.0, 0.0));
/// ```
pub fn twirl_source(dest: (f32, f32), center: (f32, f32), radius: f32, angle: f32) -> (f32, f32) {
    let dx = dest.0 - center.0;
    let dy = dest.1 - center.1;
    let dist = (dx * dx + dy * dy).sqrt();
    if radius <= 0.0 || dist >= radius {
        return dest;
    }
    let t = 1.0 - dist / radius;
    let theta = angle * t * t;
    let (sin, cos) = theta.sin_cos();
    (
        center.0 + dx * cos - dy * sin,
        center.1 + dx * sin + dy * cos,
    )
}

/// Brightness multiplier for a vignette.
///
/// `dist` is the distance from the image center normalized to the half
/// diagonal (0 at the center, 1 in the corners). `softness` is where the
/// darkening reaches full `amount`; smaller means a wider dark band.
pub fn vignette_factor(dist: f32, amount: f32, softness: f32) -> f32 {
    let soft = softness.max(0.01);
    (1.0 - amount * (dist / soft).min(1.0).powi(2)).clamp(0.0, 1.0)
}

/// Map the vignette's pixel radius onto a softness in `0.25..=1.0`.
///
/// Radius 0 keeps the dark band at the corners; radius 300 and up pulls it
/// to a quarter of the half diagonal.
pub fn vignette_softness(radius: f32) -> f32 {
    (1.0 - radius / 400.0).clamp(0.25, 1.0)
}

/// Start of the block containing `coord` when blocks of `block` pixels are
/// aligned so that one block edge falls on `origin`.
pub fn block_start(coord: u32, block: u32, origin: f32) -> i64 {
    let block = block.max(1) as i64;
    let offset = (origin.round() as i64).rem_euclid(block);
    let shifted = coord as i64 - offset;
    shifted.div_euclid(block) * block + offset
}

/// Number of Voronoi seed cells along each axis for a given cell size.
pub fn cell_grid(width: u32, height: u32, cell: f32) -> (i32, i32) {
    let cell = cell.max(1.0);
    (
        ((width as f32 / cell).ceil() as i32).max(1),
        ((height as f32 / cell).ceil() as i32).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    // =========================================================================
    // twirl_source
    // =========================================================================

    #[test]
    fn twirl_center_is_fixed_point() {
        assert!(close(
            twirl_source((10.0, 10.0), (10.0, 10.0), 5.0, 3.0),
            (10.0, 10.0)
        ));
    }

    #[test]
    fn twirl_zero_angle_is_identity() {
        assert!(close(
            twirl_source((12.0, 7.0), (10.0, 10.0), 50.0, 0.0),
            (12.0, 7.0)
        ));
    }

    #[test]
    fn twirl_outside_radius_is_identity() {
        assert_eq!(
            twirl_source((100.0, 0.0), (0.0, 0.0), 50.0, 2.0),
            (100.0, 0.0)
        );
    }

    #[test]
    fn twirl_preserves_distance_from_center() {
        let (sx, sy) = twirl_source((3.0, 4.0), (0.0, 0.0), 10.0, 1.2);
        let dist = (sx * sx + sy * sy).sqrt();
        assert!((dist - 5.0).abs() < 1e-4);
    }

    #[test]
    fn twirl_zero_radius_is_identity() {
        assert_eq!(twirl_source((1.0, 1.0), (0.0, 0.0), 0.0, 1.0), (1.0, 1.0));
    }

    // =========================================================================
    // vignette
    // =========================================================================

    #[test]
    fn vignette_center_unchanged() {
        assert_eq!(vignette_factor(0.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn vignette_corner_fully_dark_at_full_amount() {
        assert_eq!(vignette_factor(1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn vignette_zero_amount_is_identity() {
        assert_eq!(vignette_factor(0.8, 0.0, 0.5), 1.0);
    }

    #[test]
    fn vignette_softness_clamps() {
        assert_eq!(vignette_softness(0.0), 1.0);
        assert_eq!(vignette_softness(200.0), 0.5);
        assert_eq!(vignette_softness(10_000.0), 0.25);
    }

    // =========================================================================
    // block_start / cell_grid
    // =========================================================================

    #[test]
    fn block_start_without_offset() {
        assert_eq!(block_start(0, 10, 0.0), 0);
        assert_eq!(block_start(9, 10, 0.0), 0);
        assert_eq!(block_start(10, 10, 0.0), 10);
    }

    #[test]
    fn block_start_aligned_to_origin() {
        // Origin 15 with block 10 puts edges at 5, 15, 25...
        assert_eq!(block_start(4, 10, 15.0), -5);
        assert_eq!(block_start(5, 10, 15.0), 5);
        assert_eq!(block_start(16, 10, 15.0), 15);
    }

    #[test]
    fn cell_grid_rounds_up() {
        assert_eq!(cell_grid(100, 50, 30.0), (4, 2));
        assert_eq!(cell_grid(1, 1, 100.0), (1, 1));
    }

    #[test]
    fn cell_grid_tiny_cell_is_clamped() {
        assert_eq!(cell_grid(4, 3, 0.0), (4, 3));
    }
}
