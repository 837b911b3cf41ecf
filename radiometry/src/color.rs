use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul};

/// RGB triple used for every spectral quantity: radiance, power, BSDF values and path throughput.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const ONE: Color = Color::gray(1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }
    pub const fn gray(level: f32) -> Color {
        Color::new(level, level, level)
    }
    pub fn black() -> Color {
        Color::gray(0.0)
    }
    pub fn white() -> Color {
        Color::ONE
    }

    fn channels(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
    fn map(self, f: impl Fn(f32) -> f32) -> Color {
        Color::new(f(self.r), f(self.g), f(self.b))
    }
    fn zip_with(self, other: Color, f: impl Fn(f32, f32) -> f32) -> Color {
        Color::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// No channel carries positive energy.
    pub fn is_black(&self) -> bool {
        self.channels().iter().all(|c| *c <= 0.0)
    }
    pub fn is_finite(&self) -> bool {
        self.channels().iter().all(|c| c.is_finite())
    }
    pub fn max_channel(&self) -> f32 {
        self.channels().iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
    pub fn channel_avg(&self) -> f32 {
        self.channels().iter().sum::<f32>() / 3.0
    }

    /// 8-bit channels, saturating. NaN maps to 0.
    pub fn to_u8(&self) -> [u8; 3] {
        let byte = |c: f32| match c {
            c if c >= 1.0 => 255,
            c if c >= 0.0 => (c * 255.0) as u8,
            _ => 0,
        };
        [byte(self.r), byte(self.g), byte(self.b)]
    }

    /// Mean of a batch of colors; black for an empty batch.
    pub fn average(colors: &[Self]) -> Self {
        match colors.len() {
            0 => Self::black(),
            num => colors.iter().copied().sum::<Self>() / num as f32,
        }
    }
}

macro_rules! channelwise_op {
    ($Trait:ident, $method:ident, $op:tt) => {
        impl $Trait for Color {
            type Output = Color;
            fn $method(self, rhs: Color) -> Color {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }
        impl $Trait<f32> for Color {
            type Output = Color;
            fn $method(self, s: f32) -> Color {
                self.map(|a| a $op s)
            }
        }
    };
}

channelwise_op!(Add, add, +);
channelwise_op!(Mul, mul, *);
channelwise_op!(Div, div, /);

impl Mul<Color> for f32 {
    type Output = Color;
    fn mul(self, c: Color) -> Color {
        c * self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = f.precision().unwrap_or(2);
        write!(f, "rgb({:.p$}, {:.p$}, {:.p$})", self.r, self.g, self.b, p = p)
    }
}

#[cfg(test)]
mod test {
    use super::Color;

    #[test]
    fn channel_statistics() {
        let c = Color::new(0.2, 0.9, 0.4);
        assert_eq!(c.max_channel(), 0.9);
        assert!((c.channel_avg() - 0.5).abs() < 1e-6);
        assert_eq!(Color::average(&[]), Color::black());
        assert_eq!(Color::average(&[c, c]), c);
        assert!(!Color::new(0.0, -1.0, 1e-3).is_black());
    }

    #[test]
    fn clamped_byte_output() {
        assert_eq!(Color::new(-1.0, 0.5, 7.0).to_u8(), [0, 127, 255]);
        assert_eq!(Color::new(f32::NAN, 1.0, 0.0).to_u8(), [0, 255, 0]);
    }

    #[test]
    fn arithmetic_is_per_channel() {
        let c = Color::new(1.0, 2.0, 4.0) * Color::gray(0.5) + Color::new(0.0, 0.0, 1.0);
        assert_eq!(c, Color::new(0.5, 1.0, 3.0));
        assert_eq!(2.0 * c / 4.0, Color::new(0.25, 0.5, 1.5));
        assert_eq!(format!("{:.1}", c), "rgb(0.5, 1.0, 3.0)");
    }
}
