/// Largest f32 below 1. Clamping a uniform sample to it keeps it in [0, 1).
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON;

pub trait Float: Sized {
    /// Length of the other leg of a right triangle with hypotenuse `self` and one leg `other`;
    /// 0 if `other` is longer than `self`.
    /// ```
    /// use math::float::Float;
    /// assert_eq!(5.0f32.cathetus(3.0), 4.0);
    /// assert_eq!(5.0f32.cathetus(-4.0), 3.0);
    /// assert_eq!(2.0f32.cathetus(3.0), 0.0);
    /// ```
    fn cathetus(self, other: Self) -> Self;

    /// `self / divisor`, or `None` for a zero divisor.
    /// ```
    /// use math::float::Float;
    /// assert_eq!(1.0f32.try_divide(0.0), None);
    /// assert_eq!(1.0f32.try_divide(2.5), Some(0.4));
    /// assert_eq!(0.0f32.try_divide(2.5), Some(0.0));
    /// ```
    fn try_divide(self, divisor: Self) -> Option<Self>;

    fn dist_to(self, other: Self) -> Self;
}

impl Float for f32 {
    fn cathetus(self, other: f32) -> f32 {
        (self * self - other * other).max(0.0).sqrt()
    }
    fn try_divide(self, divisor: Self) -> Option<Self> {
        (divisor != 0.0).then(|| self / divisor)
    }
    fn dist_to(self, other: Self) -> Self {
        (self - other).abs()
    }
}

/// Splits `interval` into `count` equal cells; returns the cell midpoints and the cell width.
/// Numerical integration in tests runs on these grids.
/// ```
/// let (xs, dx) = math::float::linspace((0.0, 1.0), 4);
/// assert_eq!(xs, vec![0.125, 0.375, 0.625, 0.875]);
/// assert_eq!(dx, 0.25);
/// ```
pub fn linspace((a, b): (f32, f32), count: i32) -> (Vec<f32>, f32) {
    let width = (b - a) / count as f32;
    let midpoints = (0..count).map(|i| a + (i as f32 + 0.5) * width).collect();
    (midpoints, width)
}

/// Like `assert!(left <= right)`, printing both values on failure.
#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "expected {} <= {}, got {} > {}",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}
