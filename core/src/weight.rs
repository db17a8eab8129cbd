use std::fmt::Debug;
use std::ops::Add;

/// Numeric edge weight.
///
/// `INFINITY` marks an unreachable vertex and must compare greater than
/// every finite weight, so only floating-point types implement this.
pub trait Weight: Copy + PartialOrd + Add<Output = Self> + Debug {
    const ZERO: Self;
    const INFINITY: Self;

    fn is_finite(self) -> bool;

    fn is_negative(self) -> bool {
        self < Self::ZERO
    }
}

impl Weight for f64 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f64::INFINITY;

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Weight for f32 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f32::INFINITY;

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}
