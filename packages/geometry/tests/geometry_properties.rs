use roughrefine_geometry::{
    degrees_to_radians, snap, BoundingBox, Constraints, Handle, Matrix, Point, SnapCandidate,
    SnapContext, SnapKind, SnapSettings, TransformController, TransformMode,
};

const EPS: f64 = 1e-9;

fn matrices() -> Vec<Matrix> {
    vec![
        Matrix::identity(),
        Matrix::translate(12.0, -7.5),
        Matrix::scale(2.0, 0.5),
        Matrix::rotate(degrees_to_radians(30.0)),
        Matrix::new(1.5, 0.2, -0.4, 0.9, 3.0, 4.0),
    ]
}

#[test]
fn test_multiply_is_associative() {
    let all = matrices();
    for a in &all {
        for b in &all {
            for c in &all {
                let left = a.multiply(b).multiply(c);
                let right = a.multiply(&b.multiply(c));
                assert!(left.approx_eq(&right, EPS), "{} vs {}", left, right);
            }
        }
    }
}

#[test]
fn test_identity_on_points() {
    let p = Point::new(3.25, -8.0);
    assert_eq!(Matrix::identity().transform_point(p), p);
}

#[test]
fn test_snap_threshold_boundary() {
    let others = [SnapCandidate::new("a", BoundingBox::new(100.0, 0.0, 20.0, 20.0))];

    let at_threshold = BoundingBox::new(106.0, 500.0, 50.0, 50.0);
    let result = snap(&at_threshold, &[], &others, 1.0);
    assert_eq!(result.kind, SnapKind::EdgeX);
    assert_eq!(result.dx, -6.0);

    let past_threshold = BoundingBox::new(106.001, 500.0, 50.0, 50.0);
    assert!(!snap(&past_threshold, &[], &others, 1.0).is_snapped());

    // Zoomed in, the same screen distance covers fewer document units.
    let zoomed = BoundingBox::new(103.0, 500.0, 50.0, 50.0);
    assert!(snap(&zoomed, &[], &others, 2.0).is_snapped());
    let zoomed = BoundingBox::new(103.001, 500.0, 50.0, 50.0);
    assert!(!snap(&zoomed, &[], &others, 2.0).is_snapped());
}

#[test]
fn test_resize_scenario() {
    let bounds = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
    let mut controller = TransformController::new(SnapSettings::default());
    controller
        .start(
            TransformMode::Resize,
            "se".parse::<Handle>().ok(),
            Point::new(100.0, 100.0),
            bounds,
        )
        .unwrap();

    let update = controller
        .update(Point::new(150.0, 120.0), Constraints::new(true, false), &SnapContext::empty())
        .unwrap();

    assert!((update.matrix.a - 1.35).abs() < EPS);
    assert!((update.matrix.d - 1.35).abs() < EPS);
    // The nw corner stays put.
    let origin = update.matrix.transform_point(Point::new(0.0, 0.0));
    assert!(origin.x.abs() < EPS && origin.y.abs() < EPS);
    assert!((update.bounds.width - 135.0).abs() < 1e-6);
    assert!((update.bounds.height - 135.0).abs() < 1e-6);
}

#[test]
fn test_rotation_keeps_center() {
    let bounds = BoundingBox::new(20.0, 40.0, 60.0, 30.0);
    let mut controller = TransformController::default();
    controller
        .start(TransformMode::Rotate, Some(Handle::Rotate), Point::new(80.0, 55.0), bounds)
        .unwrap();

    let update = controller
        .update(Point::new(50.0, 100.0), Constraints::default(), &SnapContext::empty())
        .unwrap();
    let center = update.matrix.transform_point(bounds.center());
    assert!((center.x - 50.0).abs() < EPS);
    assert!((center.y - 55.0).abs() < EPS);

    let final_update = controller.end(&SnapContext::empty()).unwrap();
    assert!(final_update.matrix.approx_eq(&update.matrix, EPS));
}

#[test]
fn test_move_snaps_to_neighbor() {
    let neighbors = [
        SnapCandidate::new("self", BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
        SnapCandidate::new("wall", BoundingBox::new(0.0, 100.0, 10.0, 10.0)),
    ];
    let exclude = vec!["self".to_string()];
    let context = SnapContext::new(&neighbors, &exclude, 1.0);

    let mut controller = TransformController::default();
    controller
        .start(
            TransformMode::Move,
            None,
            Point::new(5.0, 5.0),
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        )
        .unwrap();
    let update = controller
        .update(Point::new(25.0, 101.0), Constraints::default(), &context)
        .unwrap();

    // Pointer delta (20, 96) plus a 4 unit y snap onto the wall's top edge.
    assert_eq!(update.snap.kind, SnapKind::EdgeY);
    assert_eq!(update.matrix, Matrix::translate(20.0, 100.0));
    assert_eq!(controller.current_snap(), update.snap);
}
