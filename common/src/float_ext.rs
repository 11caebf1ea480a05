pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;

    /// Strict `|self - other| < tolerance`; NaN never compares within.
    fn within(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.within(other, crate::EPSILON)
    }

    fn within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() < tolerance
    }
}
