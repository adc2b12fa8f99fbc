use super::*;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn square(side: f64) -> Vec<Vector2<f64>> {
    vec![
        vector![0.0, 0.0],
        vector![side, 0.0],
        vector![side, side],
        vector![0.0, side],
    ]
}

fn regular_ngon(n: usize, center: Vector2<f64>, r: f64, phase: f64) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| {
            let t = phase + std::f64::consts::TAU * (k as f64) / (n as f64);
            center + vector![t.cos(), t.sin()] * r
        })
        .collect()
}

#[test]
fn square_interior_and_exterior() {
    let sq = square(10.0);
    assert!(point_in_polygon(&sq, vector![5.0, 5.0]));
    assert!(point_in_polygon(&sq, vector![0.5, 9.5]));
    assert!(!point_in_polygon(&sq, vector![-1.0, 5.0]));
    assert!(!point_in_polygon(&sq, vector![11.0, 5.0]));
    assert!(!point_in_polygon(&sq, vector![5.0, -0.1]));
    assert!(!point_in_polygon(&sq, vector![5.0, 10.1]));
}

#[test]
fn concave_l_shape_notch_is_outside() {
    // L-shape: 10x10 square with the upper-right 5x5 quadrant removed.
    let l = vec![
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 5.0],
        vector![5.0, 5.0],
        vector![5.0, 10.0],
        vector![0.0, 10.0],
    ];
    assert!(point_in_polygon(&l, vector![2.5, 2.5]));
    assert!(point_in_polygon(&l, vector![7.5, 2.5]));
    assert!(point_in_polygon(&l, vector![2.5, 7.5]));
    assert!(!point_in_polygon(&l, vector![7.5, 7.5]));
}

#[test]
fn ray_along_a_horizontal_edge_line() {
    // The L-shape's inner horizontal edge lies on y = 5; points left of the notch
    // on that row are interior and must not be flipped by it.
    let l = vec![
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 5.0],
        vector![5.0, 5.0],
        vector![5.0, 10.0],
        vector![0.0, 10.0],
    ];
    for &x in &[0.5, 1.0, 2.5, 4.5] {
        assert!(point_in_polygon(&l, vector![x, 5.0]), "x = {x}");
    }
    assert!(!point_in_polygon(&l, vector![12.0, 5.0]));
}

#[test]
fn degenerate_inputs_are_outside() {
    assert!(!point_in_polygon(&[], vector![0.0, 0.0]));
    assert!(!point_in_polygon(
        &[vector![0.0, 0.0], vector![1.0, 1.0]],
        vector![0.5, 0.5]
    ));
}

#[test]
fn polygon_drops_repeated_closing_vertex() {
    let mut ring = square(1.0);
    ring.push(ring[0]);
    let p = Polygon::new(ring).unwrap();
    assert_eq!(p.vertex_count(), 4);
}

#[test]
fn polygon_rejects_short_and_non_finite_rings() {
    let err = Polygon::new(vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 0.0]])
        .unwrap_err();
    assert_eq!(err, PolygonError::TooFewVertices { count: 2 });

    let err = Polygon::new(vec![
        vector![0.0, 0.0],
        vector![f64::NAN, 0.0],
        vector![1.0, 1.0],
    ])
    .unwrap_err();
    assert_eq!(err, PolygonError::NonFinite { index: 1 });
}

#[test]
fn bounds_cover_all_vertices() {
    let p = Polygon::new(vec![
        vector![2.0, -1.0],
        vector![7.5, 3.0],
        vector![-4.0, 6.25],
    ])
    .unwrap();
    let b = p.bounds();
    assert_eq!(
        b,
        Bounds2 {
            min_x: -4.0,
            max_x: 7.5,
            min_y: -1.0,
            max_y: 6.25
        }
    );
    assert_eq!(b.width(), 11.5);
    assert_eq!(b.height(), 7.25);
    assert!(p.vertices().iter().all(|v| b.contains(*v)));
    assert_eq!(b.to_string(), "X(-4.00 - 7.50), Y(-1.00 - 6.25)");
}

proptest! {
    #[test]
    fn interior_of_regular_polygon_is_inside(
        n in 3usize..24,
        cx in -1e6f64..1e6,
        cy in -1e6f64..1e6,
        r in 1.0f64..500.0,
        phase in 0.0f64..std::f64::consts::TAU,
        dir in 0.0f64..std::f64::consts::TAU,
        frac in 0.0f64..0.5,
    ) {
        let c = vector![cx, cy];
        let ring = regular_ngon(n, c, r, phase);
        // Stay within half the inradius so no boundary is near.
        let inradius = r * (std::f64::consts::PI / n as f64).cos();
        let p = c + vector![dir.cos(), dir.sin()] * (frac * inradius);
        prop_assert!(point_in_polygon(&ring, p));
    }

    #[test]
    fn far_outside_bounds_is_outside(
        n in 3usize..24,
        r in 1.0f64..500.0,
        phase in 0.0f64..std::f64::consts::TAU,
        dir in 0.0f64..std::f64::consts::TAU,
        extra in 1.0f64..1e4,
    ) {
        let ring = regular_ngon(n, vector![0.0, 0.0], r, phase);
        let p = vector![dir.cos(), dir.sin()] * (2.0 * r + extra);
        prop_assert!(!point_in_polygon(&ring, p));
    }

    #[test]
    fn classification_is_invariant_under_cyclic_rotation(
        pts in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..16),
        shift in 0usize..16,
        qx in -120.0f64..120.0,
        qy in -120.0f64..120.0,
    ) {
        let ring: Vec<Vector2<f64>> = pts.iter().map(|&(x, y)| vector![x, y]).collect();
        let mut rotated = ring.clone();
        rotated.rotate_left(shift % ring.len());
        let q = vector![qx, qy];
        prop_assert_eq!(point_in_polygon(&ring, q), point_in_polygon(&rotated, q));
    }
}
