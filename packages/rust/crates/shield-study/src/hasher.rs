//! Stable fractional sampling from an identity string.
//!
//! The digest is SHA-256, so the same key yields the same fraction on every
//! platform and in every process.

use sha2::{Digest, Sha256};

use crate::error::StudyError;

/// Precision used by studies unless configured otherwise.
pub const DEFAULT_PRECISION_BITS: u32 = 12;

/// Largest precision whose quotient is exact in an `f64`.
pub const MAX_PRECISION_BITS: u32 = 52;

/// Map `key` to a fraction in `[0, 1)` using the leading `precision_bits`
/// bits of its SHA-256 digest.
///
/// The leading bits are read big-endian as an unsigned integer `v` and the
/// result is `v / 2^precision_bits`.
///
/// # Errors
/// Returns [`StudyError::InvalidArgument`] if `key` is empty or
/// `precision_bits` is outside `1..=52`.
///
/// # Example
///
/// ```rust
/// use shield_study::fraction;
///
/// let f = fraction("abc", 12)?;
/// assert_eq!(f, f64::from(0xba7_u32) / 4096.0);
/// # Ok::<(), shield_study::StudyError>(())
/// ```
pub fn fraction(key: &str, precision_bits: u32) -> Result<f64, StudyError> {
    if key.is_empty() {
        return Err(StudyError::invalid("hash key is empty"));
    }
    if precision_bits == 0 || precision_bits > MAX_PRECISION_BITS {
        return Err(StudyError::invalid(format!(
            "precision must be between 1 and {MAX_PRECISION_BITS} bits, got {precision_bits}"
        )));
    }

    let digest = Sha256::digest(key.as_bytes());
    let mut leading = [0u8; 8];
    leading.copy_from_slice(&digest[..8]);
    let value = u64::from_be_bytes(leading) >> (64 - precision_bits);

    // Both operands are below 2^53, so the division is exact.
    #[allow(clippy::cast_precision_loss)]
    let fraction = value as f64 / (1u64 << precision_bits) as f64;
    Ok(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("abc") = ba7816bf8f01cfea...
    #[test]
    fn test_known_digest_prefix() {
        assert_eq!(fraction("abc", 4).unwrap(), 11.0 / 16.0);
        assert_eq!(fraction("abc", 12).unwrap(), 2983.0 / 4096.0);
        assert_eq!(fraction("abc", 16).unwrap(), f64::from(0xba78_u32) / 65536.0);
    }

    #[test]
    fn test_single_bit() {
        // 0xb = 0b1011, leading bit set
        assert_eq!(fraction("abc", 1).unwrap(), 0.5);
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(matches!(
            fraction("", 12),
            Err(StudyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_bad_precision() {
        assert!(matches!(
            fraction("abc", 0),
            Err(StudyError::InvalidArgument(_))
        ));
        assert!(matches!(
            fraction("abc", MAX_PRECISION_BITS + 1),
            Err(StudyError::InvalidArgument(_))
        ));
        assert!(fraction("abc", MAX_PRECISION_BITS).unwrap() < 1.0);
    }
}
