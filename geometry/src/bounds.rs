use std::fmt::{Display, Formatter, Result};

use math::hcm::Point3;

/// Axis-aligned bounding box. An empty box has `lo > hi` on every axis, so enclosing the first
/// point makes it that point.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    lo: Point3,
    hi: Point3,
}

impl BBox {
    pub fn empty() -> BBox {
        let inf = f32::INFINITY;
        BBox {
            lo: Point3::new(inf, inf, inf),
            hi: Point3::new(-inf, -inf, -inf),
        }
    }

    /// Smallest box holding both corners, given in any order.
    pub fn new(a: Point3, b: Point3) -> BBox {
        BBox::empty().enclose(a).enclose(b)
    }

    pub fn enclose(mut self, p: Point3) -> BBox {
        for axis in 0..3 {
            self.lo[axis] = self.lo[axis].min(p[axis]);
            self.hi[axis] = self.hi[axis].max(p[axis]);
        }
        self
    }

    pub fn merge(self, other: BBox) -> BBox {
        self.enclose(other.lo).enclose(other.hi)
    }

    /// Axis with the largest extent; ties go to the lower index.
    pub fn widest_axis(&self) -> usize {
        (self.hi - self.lo).max_dimension()
    }

    pub fn contains(&self, p: Point3) -> bool {
        (0..3).all(|axis| (self.lo[axis]..=self.hi[axis]).contains(&p[axis]))
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "box[{} -> {}]", self.lo, self.hi)
    }
}

#[cfg(test)]
mod test {
    use super::BBox;
    use math::hcm::Point3;

    #[test]
    fn widest_axis() {
        let b = [
            Point3::new(0.0, 1.0, 2.0),
            Point3::new(3.0, -4.0, 2.5),
            Point3::new(1.0, 0.0, 2.2),
        ]
        .iter()
        .fold(BBox::empty(), |b, p| b.enclose(*p));
        assert_eq!(b.widest_axis(), 1);
        assert!(b.contains(Point3::new(1.5, 0.0, 2.1)));
        assert!(!b.contains(Point3::new(1.5, 0.0, 3.0)));
    }

    #[test]
    fn corners_in_any_order() {
        let b = BBox::new(Point3::new(1.0, -1.0, 0.0), Point3::new(-1.0, 1.0, 2.0));
        let merged = b.merge(BBox::new(Point3::new(0.0, 0.0, 5.0), Point3::ORIGIN));
        assert!(b.contains(Point3::new(0.0, 0.5, 1.0)));
        assert!(merged.contains(Point3::new(0.0, 0.5, 4.0)));
        assert!(!b.contains(Point3::new(0.0, 0.5, 4.0)));
    }
}
