/// Represents probability mass (discrete pr) or probability density (continuous pr) of a sampled
/// direction.
/// - Specular scattering picks one of finitely many directions and reports a `Mass`.
/// - Every other sampler reports a `Density` with respect to solid angle.
///
/// Estimators divide by `value()` either way; `is_positive()` guards that division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prob {
    Density(f32),
    Mass(f32),
}

impl Prob {
    pub fn is_density(&self) -> bool {
        matches!(self, Self::Density(_))
    }
    pub fn is_positive(&self) -> bool {
        self.value() > 0.0
    }
    pub fn value(&self) -> f32 {
        match self {
            Self::Density(x) | Self::Mass(x) => *x,
        }
    }
    /// Scales the probability by the chance of picking the sampling strategy that produced it.
    pub fn scaled(self, selection: f32) -> Self {
        match self {
            Self::Density(x) => Self::Density(x * selection),
            Self::Mass(x) => Self::Mass(x * selection),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Prob;

    #[test]
    fn zero_is_not_positive() {
        assert!(!Prob::Mass(0.0).is_positive());
        assert!(!Prob::Density(0.0).is_positive());
        assert!(Prob::Density(0.3).scaled(0.5).is_positive());
        assert_eq!(Prob::Mass(0.4).scaled(0.5), Prob::Mass(0.2));
    }
}
