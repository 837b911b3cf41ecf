use geometry::ray::Ray;
use geometry::AffineTransform;
use math::hcm::{Point3, Vec3};
use shape::{Disk, Plane, Shape, ShapeKind, Sphere, TriangleMesh};

fn shapes() -> Vec<ShapeKind> {
    let at = |x, y, z| AffineTransform::translater(Vec3::new(x, y, z));
    let triangle = [
        Point3::new(-1.0, -1.0, 0.0),
        Point3::new(1.0, -1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    vec![
        Plane::new(&(at(0.0, 0.0, 4.0) * AffineTransform::rotater(Vec3::X, 1.2))).into(),
        Disk::new(&(at(0.0, 0.0, 4.0) * AffineTransform::rotater(Vec3::X, 1.2)), 2.0).into(),
        Sphere::new(&at(0.2, -0.1, 6.0), 1.5).into(),
        TriangleMesh::new(&at(0.0, 0.0, 3.0), &triangle, &[0, 1, 2]).into(),
    ]
}

#[test]
fn every_hit_has_an_orthonormal_frame() {
    let ray = Ray::new(Point3::new(0.1, 0.05, -1.0), Vec3::Z);
    for s in shapes().iter() {
        let hit = s
            .intersect(&ray)
            .unwrap_or_else(|| panic!("{} missed", s.summary()));
        assert!(hit.has_valid_frame(), "{}", s.summary());
        assert!((hit.normal.norm() - 1.0).abs() < 1e-5);
        assert!(hit.tangent().dot(hit.normal).abs() < 1e-4);
        assert!(s.occludes(&ray));
        assert!(!s.occludes(&ray.with_extent(hit.ray_t * 0.5)));
    }
}

#[test]
fn hits_are_on_the_ray() {
    let ray = Ray::new(Point3::new(-0.2, 0.1, -2.0), Vec3::new(0.02, -0.01, 1.0).hat());
    for s in shapes().iter() {
        if let Some(hit) = s.intersect(&ray) {
            let expected = ray.position_at(hit.ray_t);
            assert!(expected.distance_to(hit.pos) < 1e-3, "{}", s.summary());
            assert!(hit.ray_t > 0.0);
        }
    }
}
