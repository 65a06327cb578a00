//! Shape generation for 2D primitives
//!
//! Everything is tessellated to a plain triangle list in pixel coordinates
//! (y down); the pipeline maps pixels to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled axis-aligned rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let (a, b) = (Vec2::new(x, y), Vec2::new(x + w, y));
    let (c, d) = (Vec2::new(x + w, y + h), Vec2::new(x, y + h));
    tri(&mut vertices, a, b, c, color);
    tri(&mut vertices, a, c, d, color);
    vertices
}

/// Quad with separate top and bottom edges (a trapezoid strip)
pub fn trapezoid(
    y_top: f32,
    x_top: (f32, f32),
    y_bottom: f32,
    x_bottom: (f32, f32),
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let a = Vec2::new(x_top.0, y_top);
    let b = Vec2::new(x_top.1, y_top);
    let c = Vec2::new(x_bottom.1, y_bottom);
    let d = Vec2::new(x_bottom.0, y_bottom);
    tri(&mut vertices, a, b, c, color);
    tri(&mut vertices, a, c, d, color);
    vertices
}

/// Vertical gradient from `top` to `bottom` color
pub fn vertical_gradient(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    top: [f32; 4],
    bottom: [f32; 4],
) -> Vec<Vertex> {
    vec![
        Vertex::new(x, y, top),
        Vertex::new(x + w, y, top),
        Vertex::new(x + w, y + h, bottom),
        Vertex::new(x, y, top),
        Vertex::new(x + w, y + h, bottom),
        Vertex::new(x, y + h, bottom),
    ]
}

/// Horizontal gradient from `left` to `right` color
pub fn horizontal_gradient(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    left: [f32; 4],
    right: [f32; 4],
) -> Vec<Vertex> {
    vec![
        Vertex::new(x, y, left),
        Vertex::new(x + w, y, right),
        Vertex::new(x + w, y + h, right),
        Vertex::new(x, y, left),
        Vertex::new(x + w, y + h, right),
        Vertex::new(x, y + h, left),
    ]
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(3);
    tri(&mut vertices, a, b, c, color);
    vertices
}

/// Convex polygon as a fan from the first point
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        tri(&mut vertices, points[0], pair[0], pair[1], color);
    }
    vertices
}

/// Generate vertices for a filled ellipse, rotated by `rotation` radians
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let (sin_r, cos_r) = rotation.sin_cos();
    let point = |theta: f32| {
        let local = Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
        center + Vec2::new(local.x * cos_r - local.y * sin_r, local.x * sin_r + local.y * cos_r)
    };

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        tri(&mut vertices, center, point(theta1), point(theta2), color);
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Segment count that keeps circles smooth without wasting triangles on specks
pub fn segments_for_radius(radius: f32) -> u32 {
    (radius * 1.5).clamp(6.0, 32.0) as u32
}

/// Thick line with round-ish caps
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let mut vertices = Vec::with_capacity(6 + 2 * 18);
    tri(&mut vertices, a + perp, a - perp, b + perp, color);
    tri(&mut vertices, b + perp, a - perp, b - perp, color);
    if width > 1.5 {
        vertices.extend(circle(a, width / 2.0, color, 6));
        vertices.extend(circle(b, width / 2.0, color, 6));
    }
    vertices
}

/// Quadratic Bézier stroke from `p0` to `p2` with control point `p1`
pub fn quadratic_stroke(p0: Vec2, p1: Vec2, p2: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    const STEPS: usize = 8;
    let at = |t: f32| {
        let u = 1.0 - t;
        p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
    };

    let mut vertices = Vec::new();
    let mut prev = p0;
    for i in 1..=STEPS {
        let next = at(i as f32 / STEPS as f32);
        vertices.extend(line(prev, next, width, color));
        prev = next;
    }
    vertices
}

/// Rectangle with rounded corners
pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r <= 0.0 {
        return rect(x, y, w, h, color);
    }

    const CORNER_STEPS: usize = 6;
    let corners = [
        (Vec2::new(x + w - r, y + r), -PI / 2.0),
        (Vec2::new(x + w - r, y + h - r), 0.0),
        (Vec2::new(x + r, y + h - r), PI / 2.0),
        (Vec2::new(x + r, y + r), PI),
    ];

    let mut outline = Vec::with_capacity(4 * (CORNER_STEPS + 1));
    for (center, start) in corners {
        for i in 0..=CORNER_STEPS {
            let theta = start + (i as f32 / CORNER_STEPS as f32) * (PI / 2.0);
            outline.push(center + Vec2::new(theta.cos(), theta.sin()) * r);
        }
    }

    let mut vertices = Vec::with_capacity(outline.len() * 3);
    let center = Vec2::new(x + w / 2.0, y + h / 2.0);
    for i in 0..outline.len() {
        let next = outline[(i + 1) % outline.len()];
        tri(&mut vertices, center, outline[i], next, color);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_polygon_fan() {
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(polygon(&square, [1.0; 4]).len(), 6);
        assert!(polygon(&square[..2], [1.0; 4]).is_empty());
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let v = rounded_rect(12.0, 12.0, 140.0, 62.0, 10.0, [1.0; 4]);
        assert_eq!(v.len() % 3, 0);
        let (min, max) = bounds(&v);
        assert!(min.x >= 12.0 - 1e-3 && min.y >= 12.0 - 1e-3);
        assert!(max.x <= 152.0 + 1e-3 && max.y <= 74.0 + 1e-3);
    }

    #[test]
    fn test_circle_radius() {
        let v = circle(Vec2::new(5.0, 5.0), 3.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for vertex in &v {
            let d = Vec2::from(vertex.position).distance(Vec2::new(5.0, 5.0));
            assert!(d <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_ellipse_rotation() {
        let v = ellipse(Vec2::ZERO, Vec2::new(10.0, 2.0), PI / 2.0, [1.0; 4], 16);
        let (min, max) = bounds(&v);
        // Rotated a quarter turn: tall rather than wide
        assert!(max.y - min.y > 19.0);
        assert!(max.x - min.x < 4.1);
    }
}
