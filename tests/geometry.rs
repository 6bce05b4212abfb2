use lifemap::geometry::*;
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
        "{:?} != {:?}",
        a,
        b
    );
}

fn shape(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::new(kind, Point::new(x, y), Dimensions { width: w, height: h })
}

#[test]
fn rectangle_exits_right_edge_at_vertical_center() {
    let rect = shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 60.0);
    assert_close(rect.boundary_point(Point::new(500.0, 30.0)), Point::new(100.0, 30.0));

    let other = shape(ShapeKind::Rectangle, 300.0, 0.0, 100.0, 60.0);
    let res = resolve_anchors(&rect, &other);
    assert_close(res.source_point, Point::new(100.0, 30.0));
    assert_close(res.target_point, Point::new(300.0, 30.0));
    assert_eq!(res.source_anchor, Anchor::Right);
    assert_eq!(res.target_anchor, Anchor::Left);
}

#[test]
fn rectangle_diagonal_uses_ray_slope() {
    let rect = shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
    // Shallow ray leaves through the right edge.
    assert_close(rect.boundary_point(Point::new(150.0, 100.0)), Point::new(100.0, 75.0));
    // Steep ray leaves through the bottom edge.
    assert_close(rect.boundary_point(Point::new(100.0, 150.0)), Point::new(75.0, 100.0));
    // Straight up.
    assert_close(rect.boundary_point(Point::new(50.0, -400.0)), Point::new(50.0, 0.0));
}

#[test]
fn circle_top_point() {
    let circle = shape(ShapeKind::Circle, 0.0, 0.0, 100.0, 100.0);
    assert_close(circle.boundary_point(Point::new(50.0, -200.0)), Point::new(50.0, 0.0));
}

#[test]
fn cloud_uses_inner_ellipse() {
    let cloud = shape(ShapeKind::Cloud, 0.0, 0.0, 150.0, 80.0);
    assert_close(cloud.boundary_point(Point::new(75.0, 500.0)), Point::new(75.0, 72.0));
    assert_close(cloud.boundary_point(Point::new(-500.0, 40.0)), Point::new(15.0, 40.0));
}

#[test]
fn boundary_points_lie_on_silhouette_and_inside_box() {
    let shapes = [
        shape(ShapeKind::Rectangle, -20.0, 35.0, 150.0, 60.0),
        shape(ShapeKind::Rectangle, 0.0, 0.0, 40.0, 200.0),
        shape(ShapeKind::Circle, 10.0, 10.0, 100.0, 100.0),
        shape(ShapeKind::Cloud, 300.0, -50.0, 150.0, 80.0),
    ];
    for s in shapes {
        let c = s.center();
        let (min, max) = s.bounds();
        for step in 0..72 {
            let a = step as f64 * 5.0_f64.to_radians();
            let reference = Point::new(c.x + 400.0 * a.cos(), c.y + 400.0 * a.sin());
            let p = s.boundary_point(reference);
            assert!(p.is_finite());
            assert!(
                p.x >= min.x - EPS && p.x <= max.x + EPS && p.y >= min.y - EPS && p.y <= max.y + EPS,
                "{:?} outside box for {:?}",
                p,
                s
            );
            match s.kind {
                ShapeKind::Rectangle => {
                    let on_vertical = (p.x - min.x).abs() < EPS || (p.x - max.x).abs() < EPS;
                    let on_horizontal = (p.y - min.y).abs() < EPS || (p.y - max.y).abs() < EPS;
                    assert!(on_vertical || on_horizontal, "{:?} not on edge", p);
                }
                ShapeKind::Circle => {
                    let r = s.dimensions.width / 2.0;
                    let center = Point::new(s.position.x + r, s.position.y + r);
                    assert!((p.distance(center) - r).abs() < EPS);
                }
                ShapeKind::Cloud => {
                    let rx = s.dimensions.width * CLOUD_RADIUS_FACTOR;
                    let ry = s.dimensions.height * CLOUD_RADIUS_FACTOR;
                    let v = ((p.x - c.x) / rx).powi(2) + ((p.y - c.y) / ry).powi(2);
                    assert!((v - 1.0).abs() < 1e-9);
                }
            }
        }
    }
}

#[test]
fn compass_axes_classify_deterministically() {
    assert_eq!(Anchor::from_angle(0.0), Anchor::Right);
    assert_eq!(Anchor::from_angle(PI / 2.0), Anchor::Bottom);
    assert_eq!(Anchor::from_angle(PI), Anchor::Left);
    assert_eq!(Anchor::from_angle(3.0 * PI / 2.0), Anchor::Top);
    assert_eq!(Anchor::from_angle(-PI / 2.0), Anchor::Top);
    assert_eq!(Anchor::from_angle(2.0 * PI), Anchor::Right);
}

#[test]
fn rotated_lookup_is_opposite_anchor() {
    for deg in [10.0, 80.0, 100.0, 170.0, 200.0, 260.0, 300.0, 350.0, -30.0] {
        let a = f64::to_radians(deg);
        assert_eq!(Anchor::from_angle(a + PI), Anchor::from_angle(a).opposite(), "{}", deg);
    }
}

#[test]
fn coincident_centers_fall_back_to_right() {
    let a = shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 60.0);
    let res = resolve_anchors(&a, &a);
    assert!(res.source_point.is_finite() && res.target_point.is_finite());
    assert_eq!((res.source_anchor, res.target_anchor), (Anchor::Right, Anchor::Left));
    assert_close(res.source_point, Point::new(100.0, 30.0));

    let circle = shape(ShapeKind::Circle, 0.0, 0.0, 100.0, 100.0);
    let cloud = shape(ShapeKind::Cloud, -25.0, 10.0, 150.0, 80.0);
    let res = resolve_anchors(&circle, &cloud);
    assert_close(res.source_point, Point::new(100.0, 50.0));
    assert_close(res.target_point, Point::new(110.0, 50.0));
    assert_eq!((res.source_anchor, res.target_anchor), (Anchor::Right, Anchor::Left));
}

#[test]
fn swapping_ends_mirrors_result() {
    let rect = shape(ShapeKind::Rectangle, 0.0, 0.0, 100.0, 60.0);
    let circle = shape(ShapeKind::Circle, 300.0, 200.0, 100.0, 100.0);
    let fwd = resolve_anchors(&rect, &circle);
    let back = resolve_anchors(&circle, &rect);

    assert_close(back.source_point, fwd.target_point);
    assert_close(back.target_point, fwd.source_point);
    assert_eq!(back.source_anchor, fwd.target_anchor);
    assert_eq!(back.target_anchor, fwd.source_anchor);
    assert_eq!(fwd.source_anchor, Anchor::Right);
    assert_eq!(fwd.target_anchor, Anchor::Left);
}

#[test]
fn target_below_gives_bottom_top_pair() {
    let top = shape(ShapeKind::Circle, 0.0, 0.0, 100.0, 100.0);
    let below = shape(ShapeKind::Cloud, -25.0, 300.0, 150.0, 80.0);
    let res = resolve_anchors(&top, &below);
    assert_close(res.source_point, Point::new(50.0, 100.0));
    assert_eq!(res.source_anchor, Anchor::Bottom);
    assert_eq!(res.target_anchor, Anchor::Top);
}

#[test]
fn bad_dimensions_use_default_size() {
    assert_eq!(Dimensions::sanitized(None, None), Dimensions::default());
    assert_eq!(
        Dimensions::sanitized(Some(0.0), Some(-5.0)),
        Dimensions { width: DEFAULT_SIZE, height: DEFAULT_SIZE }
    );
    assert_eq!(
        Dimensions::sanitized(Some(f64::NAN), Some(60.0)),
        Dimensions { width: DEFAULT_SIZE, height: 60.0 }
    );
}

#[test]
fn unknown_type_names_are_rectangles() {
    assert_eq!(ShapeKind::from_type_name("circle"), ShapeKind::Circle);
    assert_eq!(ShapeKind::from_type_name("Cloud"), ShapeKind::Cloud);
    assert_eq!(ShapeKind::from_type_name("default"), ShapeKind::Rectangle);
    assert_eq!(ShapeKind::from_type_name(""), ShapeKind::Rectangle);
}

#[test]
fn zero_and_negative_sizes_resolve_as_default_box() {
    let right = shape(ShapeKind::Rectangle, 300.0, 0.0, 100.0, 100.0);
    for (w, h) in [(100.0, 0.0), (0.0, 0.0), (-50.0, -20.0), (f64::NAN, f64::INFINITY)] {
        for kind in [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Cloud] {
            // Built field by field so nothing sanitizes the size up front.
            let flat = Shape {
                position: Point::new(0.0, 0.0),
                dimensions: Dimensions { width: w, height: h },
                kind,
            };
            let res = resolve_anchors(&flat, &right);
            assert!(res.source_point.is_finite(), "{:?} {:?}", kind, (w, h));
            assert!(res.target_point.is_finite(), "{:?} {:?}", kind, (w, h));
            assert_eq!(res.source_anchor, Anchor::Right);
            assert_eq!(res.target_anchor, Anchor::Left);
            assert_close(res.target_point, Point::new(300.0, 50.0));
            assert_eq!(flat.center(), Point::new(50.0, 50.0));
        }
    }
    let rect = Shape {
        position: Point::new(0.0, 0.0),
        dimensions: Dimensions { width: 100.0, height: 0.0 },
        kind: ShapeKind::Rectangle,
    };
    assert_close(resolve_anchors(&rect, &right).source_point, Point::new(100.0, 50.0));
    assert_eq!(
        Shape::new(ShapeKind::Cloud, Point::default(), Dimensions { width: 0.0, height: 80.0 }).dimensions,
        Dimensions { width: DEFAULT_SIZE, height: 80.0 }
    );
}
