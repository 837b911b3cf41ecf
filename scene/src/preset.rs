//! Built-in scenes: variations of the Cornell box, in millimeters, viewed by one fixed camera.

use crate::Scene;
use geometry::bxdf::Bsdf;
use geometry::camera::Camera;
use geometry::{AffineTransform, TransformError};
use light::DiffuseAreaLight;
use math::hcm::{Point3, Vec3};
use radiometry::color::Color;
use shape::{Disk, Sphere, TriangleMesh};
use std::f32::consts::FRAC_PI_2;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("unknown scene \"{0}\" (expected one of: cbox_blocks, cbox_spheres, cbox_sphere_inside, cbox_blocks_disk)")]
pub struct UnknownScene(pub String);

/// Names of the built-in scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneName {
    CboxBlocks,
    CboxSpheres,
    CboxSphereInside,
    CboxBlocksDisk,
}

impl SceneName {
    pub const ALL: [SceneName; 4] = [
        Self::CboxBlocks,
        Self::CboxSpheres,
        Self::CboxSphereInside,
        Self::CboxBlocksDisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CboxBlocks => "cbox_blocks",
            Self::CboxSpheres => "cbox_spheres",
            Self::CboxSphereInside => "cbox_sphere_inside",
            Self::CboxBlocksDisk => "cbox_blocks_disk",
        }
    }

    pub fn build(&self) -> Scene {
        let scene = match self {
            Self::CboxBlocks => cbox_blocks(),
            Self::CboxSpheres => cbox_spheres(),
            Self::CboxSphereInside => cbox_sphere_inside(),
            Self::CboxBlocksDisk => cbox_blocks_disk(),
        };
        log::debug!("built scene {}: {}", self, scene.summary());
        scene
    }
}

impl Default for SceneName {
    fn default() -> Self {
        Self::CboxBlocks
    }
}

impl FromStr for SceneName {
    type Err = UnknownScene;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}

impl Display for SceneName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The camera all built-in scenes are viewed with: a 35mm lens on a 25mm square film, standing
/// in front of the open side of the box.
pub fn cornell_camera(resolution: (u32, u32)) -> Result<Camera, TransformError> {
    Camera::new(resolution, (0.025, 0.025), 0.035).looking_at(
        Point3::new(278.0, 273.0, -800.0),
        Point3::new(278.0, 273.0, 0.0),
        Vec3::Y,
    )
}

const WHITE: Color = Color {
    r: 0.740063,
    g: 0.742313,
    b: 0.733934,
};
const RED: Color = Color {
    r: 0.366046,
    g: 0.0371827,
    b: 0.0416385,
};
const GREEN: Color = Color {
    r: 0.162928,
    g: 0.408903,
    b: 0.0833759,
};
const LIGHT_RADIANCE: Color = Color {
    r: 40.0,
    g: 30.902,
    b: 22.4314,
};

const QUAD_INDICES: [usize; 6] = [0, 1, 2, 2, 3, 0];

fn mesh(vertices: &[[f32; 3]], indices: &[usize]) -> TriangleMesh {
    let points = vertices
        .iter()
        .map(|&[x, y, z]| Point3::new(x, y, z))
        .collect::<Vec<_>>();
    TriangleMesh::new(&AffineTransform::identity(), &points, indices)
}

/// Five quads (top and four sides) with the same winding, as `QUAD_INDICES` repeated.
fn block(vertices: &[[f32; 3]; 20]) -> TriangleMesh {
    let indices = (0..5)
        .flat_map(|face| QUAD_INDICES.iter().map(move |i| face * 4 + i))
        .collect::<Vec<_>>();
    mesh(vertices, &indices)
}

fn translated(x: f32, y: f32, z: f32) -> AffineTransform {
    AffineTransform::translater(Vec3::new(x, y, z))
}

/// The empty box: floor, ceiling, three walls, and the light in the ceiling.
#[rustfmt::skip]
pub fn cornell_box() -> Scene {
    let mut scene = Scene::new();
    let floor = [[552.8, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 559.2], [549.6, 0.0, 559.2]];
    let ceiling = [[556.0, 548.8, 0.0], [556.0, 548.8, 559.2], [0.0, 548.8, 559.2], [0.0, 548.8, 0.0]];
    let back = [[549.6, 0.0, 559.2], [0.0, 0.0, 559.2], [0.0, 548.8, 559.2], [556.0, 548.8, 559.2]];
    let left = [[552.8, 0.0, 0.0], [549.6, 0.0, 559.2], [556.0, 548.8, 559.2], [556.0, 548.8, 0.0]];
    let right = [[0.0, 0.0, 559.2], [0.0, 0.0, 0.0], [0.0, 548.8, 0.0], [0.0, 548.8, 559.2]];
    let light = [[343.0, 548.7, 227.0], [343.0, 548.7, 332.0], [213.0, 548.7, 332.0], [213.0, 548.7, 227.0]];

    for wall in [floor, ceiling, back].iter() {
        scene.add_object(mesh(wall, &QUAD_INDICES), Bsdf::lambertian(WHITE));
    }
    scene.add_object(mesh(&left, &QUAD_INDICES), Bsdf::lambertian(RED));
    scene.add_object(mesh(&right, &QUAD_INDICES), Bsdf::lambertian(GREEN));

    let area_light = DiffuseAreaLight::new(LIGHT_RADIANCE, mesh(&light, &QUAD_INDICES).into());
    scene.add_emitter(
        mesh(&light, &QUAD_INDICES),
        Bsdf::lambertian(Color::gray(0.78)),
        area_light,
    );
    scene
}

#[rustfmt::skip]
pub fn cbox_blocks() -> Scene {
    let mut scene = cornell_box();
    let short_block = [
        [130.0, 165.0, 65.0], [82.0, 165.0, 225.0], [240.0, 165.0, 272.0], [290.0, 165.0, 114.0],
        [290.0, 0.0, 114.0], [290.0, 165.0, 114.0], [240.0, 165.0, 272.0], [240.0, 0.0, 272.0],
        [130.0, 0.0, 65.0], [130.0, 165.0, 65.0], [290.0, 165.0, 114.0], [290.0, 0.0, 114.0],
        [82.0, 0.0, 225.0], [82.0, 165.0, 225.0], [130.0, 165.0, 65.0], [130.0, 0.0, 65.0],
        [240.0, 0.0, 272.0], [240.0, 165.0, 272.0], [82.0, 165.0, 225.0], [82.0, 0.0, 225.0],
    ];
    let tall_block = [
        [423.0, 330.0, 247.0], [265.0, 330.0, 296.0], [314.0, 330.0, 456.0], [472.0, 330.0, 406.0],
        [423.0, 0.0, 247.0], [423.0, 330.0, 247.0], [472.0, 330.0, 406.0], [472.0, 0.0, 406.0],
        [472.0, 0.0, 406.0], [472.0, 330.0, 406.0], [314.0, 330.0, 456.0], [314.0, 0.0, 456.0],
        [314.0, 0.0, 456.0], [314.0, 330.0, 456.0], [265.0, 330.0, 296.0], [265.0, 0.0, 296.0],
        [265.0, 0.0, 296.0], [265.0, 330.0, 296.0], [423.0, 330.0, 247.0], [423.0, 0.0, 247.0],
    ];
    scene.add_object(block(&short_block), Bsdf::lambertian(Color::gray(0.8)));
    scene.add_object(block(&tall_block), Bsdf::lambertian(Color::gray(0.8)));
    scene
}

/// A glossy sphere next to a glass one.
pub fn cbox_spheres() -> Scene {
    let mut scene = cornell_box();
    scene.add_object(
        Sphere::new(&translated(110.0, 100.0, 300.0), 100.0),
        Bsdf::phong(Color::gray(0.1), Color::gray(0.8), 1000.0),
    );
    scene.add_object(
        Sphere::new(&translated(320.0, 120.0, 200.0), 120.0),
        Bsdf::glass(1.0, 1.5),
    );
    scene
}

/// A diffuse sphere inside a glass sphere.
pub fn cbox_sphere_inside() -> Scene {
    let mut scene = cornell_box();
    scene.add_object(
        Sphere::new(&translated(225.0, 150.0, 225.0), 75.0),
        Bsdf::lambertian(Color::gray(0.5)),
    );
    scene.add_object(
        Sphere::new(&translated(225.0, 150.0, 225.0), 150.0),
        Bsdf::glass(1.0, 1.5),
    );
    scene
}

/// The two blocks behind an upright glass disk facing the camera.
pub fn cbox_blocks_disk() -> Scene {
    let mut scene = cbox_blocks();
    let upright = translated(250.0, 150.0, 50.0) * AffineTransform::rotater(Vec3::X, FRAC_PI_2);
    scene.add_object(Disk::new(&upright, 90.0), Bsdf::glass(1.0, 1.5));
    scene
}

#[cfg(test)]
mod test {
    use super::*;
    use geometry::bxdf::BxDFType;
    use geometry::ray::Ray;
    use light::Light;

    #[test]
    fn scene_names_round_trip() {
        for name in SceneName::ALL.iter() {
            assert_eq!(name.as_str().parse::<SceneName>().unwrap(), *name);
        }
        assert!("cbox".parse::<SceneName>().is_err());
        assert_eq!(SceneName::default().to_string(), "cbox_blocks");
    }

    #[test]
    fn cornell_box_light_faces_the_floor() {
        let scene = cbox_blocks();
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.objects().len(), 8);
        assert!(!scene.any_object_with(BxDFType::SPECULAR));

        let floor_point = geometry::Interaction::rayless(Point3::new(278.0, 0.0, 280.0), Vec3::Y);
        let sample = scene.lights()[0].sample_li(&floor_point, (0.3, 0.6));
        assert!(sample.pdf > 0.0);
        assert_eq!(sample.radiance, LIGHT_RADIANCE);

        // Looking straight up from the floor hits the light's object.
        let (hit, object) = scene
            .intersect(&Ray::new(Point3::new(278.0, 1.0, 280.0), Vec3::Y))
            .unwrap();
        assert!(object.light.is_some());
        assert_eq!(scene.emitted_radiance(object, &hit, -Vec3::Y), LIGHT_RADIANCE);
    }

    #[test]
    fn camera_sees_into_the_box() {
        let camera = cornell_camera((32, 32)).unwrap();
        let scene = cbox_blocks_disk();
        assert!(scene.any_object_with(BxDFType::TRANSMISSIVE));
        let ray = camera.shoot_ray(16, 16, (0.0, 0.0)).unwrap();
        let (hit, _) = scene.intersect(&ray).unwrap();
        assert!(hit.pos.z > 0.0);
    }
}
