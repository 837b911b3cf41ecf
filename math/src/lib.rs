/// Defines useful functions for common floating-point operations and tools:
/// - The `Float` helper trait (safe division, cathetus, closeness),
/// - Evenly spaced sample grids used by numerical integration tests,
/// - Macros to check if two math quantities are less than / greater than (or equal to) each other.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3D points and vectors, 4D vector, 3x3 and 4x4 matrices.
/// - Function `make_coord_system()` to build an orthogonal base from a `Vec3`.
/// - Functions `reflect()` and `refract()` to compute surface interactions.
pub mod hcm;

/// Provides `Prob` struct representing a probability mass or probability density.
pub mod prob;
