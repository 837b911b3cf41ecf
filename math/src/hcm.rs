use std::{
    fmt,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub},
};

pub use glam::Vec4;

/// Direction or displacement in 3D. Components are reachable as `v.x` or `v[0]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Position in 3D. Subtracting two points gives a `Vec3`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Constructor, indexing and `Display` shared by the xyz triples. `$open`/`$close` bracket the
/// printed components so points and vectors read differently in logs.
macro_rules! impl_xyz {
    ($t:ident, $open:literal, $close:literal) => {
        impl $t {
            pub const fn new(x: f32, y: f32, z: f32) -> $t {
                $t { x, y, z }
            }
        }
        impl Index<usize> for $t {
            type Output = f32;
            fn index(&self, axis: usize) -> &f32 {
                match axis {
                    0 => &self.x,
                    1 => &self.y,
                    2 => &self.z,
                    _ => panic!("axis {} out of range", axis),
                }
            }
        }
        impl IndexMut<usize> for $t {
            fn index_mut(&mut self, axis: usize) -> &mut f32 {
                match axis {
                    0 => &mut self.x,
                    1 => &mut self.y,
                    2 => &mut self.z,
                    _ => panic!("axis {} out of range", axis),
                }
            }
        }
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let p = f.precision().unwrap_or(2);
                write!(
                    f,
                    concat!($open, "{:.p$}, {:.p$}, {:.p$}", $close),
                    self.x,
                    self.y,
                    self.z,
                    p = p
                )
            }
        }
    };
}

impl_xyz!(Vec3, "(", ")");
impl_xyz!(Point3, "[", "]");

impl Vec3 {
    pub const X: Vec3 = Self::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Self::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Self::new(0.0, 0.0, 1.0);
    pub const ZERO: Vec3 = Self::new(0.0, 0.0, 0.0);

    /// Homogeneous form, with w = 0.
    pub fn as_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 0.0)
    }

    pub fn dot(self, v: Vec3) -> f32 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
    pub fn cross(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }
    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }
    pub fn norm(self) -> f32 {
        self.norm_squared().sqrt()
    }

    /// Unit-length copy of `self`. Panics on zero-length or non-finite vectors; use `try_hat()`
    /// when that can happen.
    pub fn hat(self) -> Vec3 {
        match self.try_hat() {
            Some(unit) => unit,
            None => panic!("can't normalize {}", self),
        }
    }
    pub fn try_hat(self) -> Option<Self> {
        let inv_length = self.norm().recip();
        (inv_length.is_finite() && inv_length != 0.0).then(|| self * inv_length)
    }

    /// Chooses from `self` or `-self`, whichever lies in the same hemisphere as `w`.
    /// ```
    /// use math::hcm::Vec3;
    /// assert_eq!(Vec3::Y.flipped_towards(-Vec3::Y + Vec3::X), -Vec3::Y);
    /// assert_eq!(Vec3::Y.flipped_towards(Vec3::Y + Vec3::X), Vec3::Y);
    /// ```
    pub fn flipped_towards(self, w: Self) -> Self {
        if self.dot(w).is_sign_negative() {
            -self
        } else {
            self
        }
    }

    /// Axis of the component with the smallest magnitude.
    pub fn abs_min_dimension(self) -> usize {
        (1..3).fold(0, |best, axis| {
            if self[axis].abs() < self[best].abs() {
                axis
            } else {
                best
            }
        })
    }

    /// Axis of the largest component.
    pub fn max_dimension(self) -> usize {
        (1..3).fold(0, |best, axis| if self[axis] > self[best] { axis } else { best })
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, v: Self) -> Vec3 {
        Vec3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}
impl AddAssign for Vec3 {
    fn add_assign(&mut self, v: Self) {
        *self = *self + v;
    }
}
impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, v: Self) -> Vec3 {
        self + -v
    }
}
impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Vec3 {
        self * -1.0
    }
}
impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}
impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}
impl Div<f32> for Vec3 {
    type Output = Self;
    fn div(self, s: f32) -> Vec3 {
        Vec3::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    /// Homogeneous form, with w = 1.
    pub fn as_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, 1.0)
    }
    pub fn distance_to(self, p: Self) -> f32 {
        (self - p).norm()
    }
    pub fn squared_distance_to(self, p: Self) -> f32 {
        (self - p).norm_squared()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;
    fn add(self, v: Vec3) -> Point3 {
        Point3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}
impl Sub<Vec3> for Point3 {
    type Output = Point3;
    fn sub(self, v: Vec3) -> Point3 {
        self + -v
    }
}
impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, from: Point3) -> Vec3 {
        Vec3::from(self) - Vec3::from(from)
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}
impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}
/// Drops the homogeneous coordinate.
impl From<Vec4> for Vec3 {
    fn from(v: Vec4) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

// -------------------------------------------------------------------------------------------------

/// Column-major 3x3 matrix, used for the tangent-bitangent-normal frames.
#[derive(Debug, Clone, Copy)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub fn from_cols(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { cols: [v0, v1, v2] }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

/// Column-major 4x4 matrix acting on homogeneous coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

/// Matrices whose determinant magnitude is below this are treated as non-invertible.
pub const SINGULAR_DETERMINANT: f32 = 1e-12;

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Mat4 {
        Mat4 {
            cols: [c0, c1, c2, c3],
        }
    }
    pub fn translater(t: Vec3) -> Mat4 {
        let mut mat = Self::IDENTITY;
        mat.cols[3] = Point3::from(t).as_vec4();
        mat
    }
    pub fn nonuniform_scale(s: Vec3) -> Mat4 {
        let mut mat = Self::IDENTITY;
        for axis in 0..3 {
            mat.cols[axis][axis] = s[axis];
        }
        mat
    }
    /// Rotation of `radians` around `axis` (right-hand rule). Column i is the rotated i-th basis
    /// vector, split into its parts along and across the axis.
    pub fn rotater(axis: Vec3, radians: f32) -> Mat4 {
        let mut mat = Self::IDENTITY;
        let (sin_t, cos_t) = radians.sin_cos();
        let axis = axis.hat();
        for (i, basis) in [Vec3::X, Vec3::Y, Vec3::Z].iter().enumerate() {
            let along = basis.dot(axis) * axis;
            let across = *basis - along;
            mat.cols[i] = (along + across * cos_t + axis.cross(across) * sin_t).as_vec4();
        }
        mat
    }
    pub fn determinant(&self) -> f32 {
        self.to_glam().determinant()
    }
    /// Computes the inverse matrix. Returns `None` if the matrix is (numerically) singular.
    pub fn try_inverse(&self) -> Option<Mat4> {
        let m = self.to_glam();
        if m.determinant().abs() < SINGULAR_DETERMINANT {
            return None;
        }
        let inv = m.inverse();
        inv.is_finite().then(|| Mat4::from_glam(inv))
    }
    pub fn transpose(&self) -> Mat4 {
        Mat4::from_glam(self.to_glam().transpose())
    }
    fn to_glam(self) -> glam::Mat4 {
        let [c0, c1, c2, c3] = self.cols;
        glam::Mat4::from_cols(c0, c1, c2, c3)
    }
    fn from_glam(m: glam::Mat4) -> Mat4 {
        Mat4::from_cols(m.x_axis, m.y_axis, m.z_axis, m.w_axis)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, m: Self) -> Mat4 {
        let [c0, c1, c2, c3] = m.cols;
        Mat4::from_cols(self * c0, self * c1, self * c2, self * c3)
    }
}

/// Computes a pair of unit vectors that make an orthonormal basis together with unit `v`.
/// ```
/// use math::hcm::{Vec3, make_coord_system};
/// let v0 = Vec3::new(0.3, 0.4, -0.6).hat();
/// let (v1, v2) = make_coord_system(v0);
/// for (a, b) in [(v0, v1), (v1, v2), (v2, v0)].iter() {
///     assert!(a.dot(*b).abs() < 1e-5);
/// }
/// assert!((v0.cross(v1) - v2).norm() < 1e-5);
/// ```
pub fn make_coord_system(v: Vec3) -> (Vec3, Vec3) {
    // Zeroes the smallest component and swaps the other two, which is never parallel to v.
    let i0 = v.abs_min_dimension();
    let (i1, i2) = ((i0 + 1) % 3, (i0 + 2) % 3);
    let mut v1 = Vec3::ZERO;
    v1[i1] = v[i2];
    v1[i2] = -v[i1];
    let v2 = v.cross(v1);
    (v1.hat(), v2.hat())
}

/// Mirrors `wi` about `normal`; both point away from the surface.
pub fn reflect(normal: Vec3, wi: Vec3) -> Vec3 {
    let along_normal = wi.dot(normal) / normal.norm_squared() * normal;
    2.0 * along_normal - wi
}

/// Outcome of refracting a direction at an interface.
pub enum Refract {
    FullReflect(Vec3),
    Transmit(Vec3),
}

pub use Refract::FullReflect;
pub use Refract::Transmit;

/// Refracts `wi` (pointing away from the surface, on the side of `normal`) through the interface.
/// `ni_over_no` is the ratio of the refraction index on `wi`'s side to the one across. Past the
/// critical angle the result is the mirrored direction.
pub fn refract(normal: Vec3, wi: Vec3, ni_over_no: f32) -> Refract {
    let wi = wi.hat();
    let normal = normal.hat();
    let cos_theta_i = wi.dot(normal).max(0.0);
    // Snell: sin_o = sin_i * ni / no.
    let sin2_theta_o = (1.0 - cos_theta_i * cos_theta_i).max(0.0) * ni_over_no * ni_over_no;
    if sin2_theta_o >= 1.0 {
        return FullReflect(reflect(normal, wi));
    }
    let cos_theta_o = (1.0 - sin2_theta_o).sqrt();
    Transmit(ni_over_no * -wi + (ni_over_no * cos_theta_i - cos_theta_o) * normal)
}

/// Panics unless two vectors or points are within 1e-2 of each other.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        if ($left - $right).norm_squared() > 1e-4 {
            panic!(
                "{} = {} is not close to {} = {}",
                stringify!($left),
                $left,
                stringify!($right),
                $right
            )
        }
    };
}
