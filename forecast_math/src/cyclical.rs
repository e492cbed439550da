//! Cyclical encodings for periodic calendar fields

use std::f64::consts::PI;

/// Encode `value` on a cycle of length `period` as a `(sin, cos)` pair
pub fn encode(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_start_of_cycle() {
        let (sin, cos) = encode(0.0, 24.0);
        assert!(sin.abs() < 1e-12);
        assert!((cos - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_cycle() {
        let (sin, cos) = encode(15.0, 60.0);
        assert!((sin - 1.0).abs() < 1e-12);
        assert!(cos.abs() < 1e-12);
    }

    #[test]
    fn test_full_cycle_wraps() {
        let a = encode(0.0, 7.0);
        let b = encode(7.0, 7.0);
        assert!((a.0 - b.0).abs() < 1e-12);
        assert!((a.1 - b.1).abs() < 1e-12);
    }
}
