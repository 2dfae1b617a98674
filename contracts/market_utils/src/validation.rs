//! Input validation predicates

/// Validation utility functions
///
/// Predicates rather than panics: the marketplace rejects invalid input with
/// its own error codes before any external transfer is attempted.
pub struct Validation;

impl Validation {
    /// Amounts entering settlement must be strictly positive
    pub fn is_positive(amount: i128) -> bool {
        amount > 0
    }

    /// Quantities for quantity-bearing assets must be strictly positive;
    /// single-unit assets carry a quantity of exactly zero
    pub fn is_zero(amount: i128) -> bool {
        amount == 0
    }

    /// A time window is valid when it starts before it ends
    pub fn is_valid_window(start: u64, end: u64) -> bool {
        start < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_positive() {
        assert!(Validation::is_positive(1));
        assert!(Validation::is_positive(i128::MAX));
        assert!(!Validation::is_positive(0));
        assert!(!Validation::is_positive(-1));
    }

    #[test]
    fn test_is_zero() {
        assert!(Validation::is_zero(0));
        assert!(!Validation::is_zero(1));
        assert!(!Validation::is_zero(-1));
    }

    #[test]
    fn test_is_valid_window() {
        assert!(Validation::is_valid_window(100, 200));
        assert!(!Validation::is_valid_window(200, 200));
        assert!(!Validation::is_valid_window(300, 200));
    }
}
