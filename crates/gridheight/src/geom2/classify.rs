use nalgebra::Vector2;

/// Added to `yj - yi` in the intercept so horizontal edges stay finite.
pub const CLASSIFY_EPS: f64 = 1e-12;

/// Even-odd point-in-polygon test.
///
/// Casts a ray from `p` towards +x and toggles on every edge it crosses. Each
/// vertex `i` is paired with its predecessor `j = i - 1 (mod n)`, so the ring is
/// closed implicitly. An edge crosses when exactly one endpoint lies strictly
/// above `p.y`; the toggle fires when `p.x` is left of the edge's intercept.
///
/// Pure, O(n). Fewer than 3 vertices enclose nothing and yield `false`.
pub fn point_in_polygon(vertices: &[Vector2<f64>], p: Vector2<f64>) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y + CLASSIFY_EPS) + vi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
