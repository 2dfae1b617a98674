//! Fee math and safe arithmetic for marketplace settlement

/// Denominator for fee rates. Rates are whole percent in `[0, FEE_BASIS]`.
pub const FEE_BASIS: u32 = 100;

/// Fee computation helpers
///
/// All operations use checked arithmetic and return `None` on overflow so
/// callers can fail the whole call instead of wrapping.
pub struct FeeMath;

impl FeeMath {
    /// Check that a fee rate is within bounds (0..=100 percent)
    pub fn is_valid_rate(rate: u32) -> bool {
        rate <= FEE_BASIS
    }

    /// Compute a fee amount: `floor(price * rate / FEE_BASIS)`
    ///
    /// Returns `None` if the multiplication overflows.
    pub fn fee_amount(price: i128, rate: u32) -> Option<i128> {
        price
            .checked_mul(rate as i128)?
            .checked_div(FEE_BASIS as i128)
    }

    /// Checked addition for balance arithmetic
    pub fn checked_add(a: i128, b: i128) -> Option<i128> {
        a.checked_add(b)
    }

    /// Checked subtraction for balance arithmetic
    pub fn checked_sub(a: i128, b: i128) -> Option<i128> {
        a.checked_sub(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_rate() {
        assert!(FeeMath::is_valid_rate(0));
        assert!(FeeMath::is_valid_rate(50));
        assert!(FeeMath::is_valid_rate(100));
        assert!(!FeeMath::is_valid_rate(101));
    }

    #[test]
    fn test_fee_amount() {
        assert_eq!(FeeMath::fee_amount(1000, 10), Some(100));
        assert_eq!(FeeMath::fee_amount(1000, 0), Some(0));
        assert_eq!(FeeMath::fee_amount(1000, 100), Some(1000));
        // floor division
        assert_eq!(FeeMath::fee_amount(99, 5), Some(4));
        assert_eq!(FeeMath::fee_amount(1, 5), Some(0));
    }

    #[test]
    fn test_fee_amount_overflow() {
        assert_eq!(FeeMath::fee_amount(i128::MAX, 2), None);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(FeeMath::checked_add(100, 50), Some(150));
        assert_eq!(FeeMath::checked_add(i128::MAX, 1), None);
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(FeeMath::checked_sub(100, 50), Some(50));
        assert_eq!(FeeMath::checked_sub(i128::MIN, 1), None);
    }
}
