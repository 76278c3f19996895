/// Scanline polygon fill and line drawing into a framebuffer
use log::{debug, trace, warn};
use nalgebra::{Matrix4, Point2, Point3};
use rayon::prelude::*;

use crate::color::{Palette, Rgb};
use crate::framebuffer::Framebuffer;
use crate::geometry::Mesh;
use crate::projection::clip_to_ndc;
use crate::transform::Transform;
use crate::visibility::Renderable;

/// Polygons with a smaller area, in square pixels, are treated as degenerate
const AREA_EPSILON: f32 = 1e-6;

/// Rasterize depth-ordered faces and overlay lines at one resolution.
///
/// `transform` is the combined projection · view matrix. Faces are filled in
/// the given order, so later faces cover earlier ones. A face with any vertex
/// at or behind the eye is skipped, as is a line with such an endpoint.
pub fn rasterize(
    faces: &[Renderable],
    lines: &Mesh,
    transform: &Matrix4<f32>,
    resolution: usize,
    overlay: Palette,
) -> Framebuffer {
    let mut framebuffer = Framebuffer::new(resolution);

    let mut skipped = 0;
    for face in faces {
        match project_all(&face.vertices, transform, resolution) {
            Some(points) => fill_polygon(&mut framebuffer, &points, face.color.rgb()),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        trace!("Skipped {} faces with a vertex behind the camera", skipped);
    }

    let overlay = overlay.rgb();
    for (index, edge) in lines.edges.iter().enumerate() {
        let (Some(a), Some(b)) = (lines.vertices.get(edge[0]), lines.vertices.get(edge[1])) else {
            warn!("Skipping line {} with out-of-range indices {:?}", index, edge);
            continue;
        };
        match project_all(&[*a, *b], transform, resolution) {
            Some(points) => draw_line(&mut framebuffer, points[0], points[1], overlay),
            None => trace!("Skipped line {} crossing behind the camera", index),
        }
    }

    framebuffer
}

/// Rasterize the same ordered faces at several resolutions in parallel.
///
/// The returned framebuffers follow the order of `resolutions`.
pub fn rasterize_resolutions(
    faces: &[Renderable],
    lines: &Mesh,
    transform: &Matrix4<f32>,
    resolutions: &[usize],
    overlay: Palette,
) -> Vec<Framebuffer> {
    resolutions
        .par_iter()
        .map(|&resolution| {
            let framebuffer = rasterize(faces, lines, transform, resolution, overlay);
            debug!(
                "Rasterized {}x{}: {} pixels covered",
                resolution,
                resolution,
                framebuffer.covered()
            );
            framebuffer
        })
        .collect()
}

/// Map a normalized device coordinate in `[-1, 1]` to pixel space `[0, R - 1]`
pub fn ndc_to_pixel(ndc: f32, resolution: usize) -> f32 {
    (ndc + 1.0) / 2.0 * resolution.saturating_sub(1) as f32
}

/// Project points to pixel space, or `None` if any of them is behind the eye
fn project_all<const N: usize>(
    points: &[Point3<f32>; N],
    transform: &Matrix4<f32>,
    resolution: usize,
) -> Option<[Point2<f32>; N]> {
    let mut projected = [Point2::origin(); N];
    for (out, point) in projected.iter_mut().zip(points) {
        let ndc = clip_to_ndc(&Transform::to_clip(transform, point))?;
        *out = Point2::new(ndc_to_pixel(ndc.x, resolution), ndc_to_pixel(ndc.y, resolution));
    }
    Some(projected)
}

/// Twice the signed area of a polygon
fn doubled_area(points: &[Point2<f32>]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

/// Fill a polygon with the even-odd rule.
///
/// Pixel `(x, y)` is sampled at the point `(x, y)` in pixel space. A scanline
/// crosses an edge when exactly one endpoint lies at or below it, and each
/// span between crossings `x_a..x_b` covers the pixels with `x_a <= x < x_b`.
/// Zero-area polygons fill nothing.
pub fn fill_polygon(framebuffer: &mut Framebuffer, points: &[Point2<f32>], color: Rgb) {
    let resolution = framebuffer.resolution() as i64;
    if resolution == 0 || points.len() < 3 {
        return;
    }
    // Also rejects NaN coordinates
    if !(doubled_area(points).abs() / 2.0 > AREA_EPSILON) {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let first_row = (min_y.ceil() as i64).max(0);
    let last_row = (max_y.floor() as i64).min(resolution - 1);

    let mut crossings = Vec::with_capacity(points.len());
    for y in first_row..=last_row {
        let scanline = y as f32;
        crossings.clear();
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            if (a.y <= scanline) != (b.y <= scanline) {
                let t = (scanline - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0].ceil() as i64).max(0);
            let end = (span[1].ceil() as i64 - 1).min(resolution - 1);
            for x in start..=end {
                framebuffer.plot(x, y, color);
            }
        }
    }
}

/// Draw a one-pixel-wide line with Bresenham's algorithm.
///
/// Endpoints are rounded to the nearest pixel. Pixels outside the
/// framebuffer are discarded; the segment is clipped to the framebuffer
/// first, in double precision, so far-away endpoints do not cost a walk
/// across empty space.
pub fn draw_line(framebuffer: &mut Framebuffer, from: Point2<f32>, to: Point2<f32>, color: Rgb) {
    let resolution = framebuffer.resolution();
    if resolution == 0 {
        return;
    }
    let from = Point2::new(from.x as f64, from.y as f64);
    let to = Point2::new(to.x as f64, to.y as f64);
    let Some((from, to)) = clip_segment(from, to, -0.5, resolution as f64 - 0.5) else {
        return;
    };

    let (mut x, mut y) = (from.x.round() as i64, from.y.round() as i64);
    let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let step_x = if x < x1 { 1 } else { -1 };
    let step_y = if y < y1 { 1 } else { -1 };
    let mut error = dx + dy;

    loop {
        framebuffer.plot(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += step_x;
        }
        if doubled <= dx {
            error += dx;
            y += step_y;
        }
    }
}

/// Liang–Barsky clip of a segment to the square `[min, max]²`
fn clip_segment(
    from: Point2<f64>,
    to: Point2<f64>,
    min: f64,
    max: f64,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let delta = to - from;
    let (mut enter, mut exit) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-delta.x, from.x - min),
        (delta.x, max - from.x),
        (-delta.y, from.y - min),
        (delta.y, max - from.y),
    ] {
        if p == 0.0 {
            // Parallel to this boundary; reject if outside it
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                if t > exit {
                    return None;
                }
                enter = enter.max(t);
            } else {
                if t < enter {
                    return None;
                }
                exit = exit.min(t);
            }
        }
    }

    if !(enter <= exit) {
        return None;
    }
    Some((from + delta * enter, from + delta * exit))
}
