//! Constant-time operations for security.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// Execution time does not depend on where, or how many, bytes differ.
/// Slices of different length return `false` straight away; the length of a
/// hex signature is public, only its content is compared in constant time.
///
/// # Arguments
/// * `a` - First byte slice
/// * `b` - Second byte slice
///
/// # Returns
/// true if slices are equal, false otherwise
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_slices() {
        assert!(constant_time_compare(b"3e0f2fb9", b"3e0f2fb9"));
    }

    #[test]
    fn test_first_byte_differs() {
        assert!(!constant_time_compare(b"3e0f2fb9", b"4e0f2fb9"));
    }

    #[test]
    fn test_last_byte_differs() {
        assert!(!constant_time_compare(b"3e0f2fb9", b"3e0f2fb8"));
    }

    #[test]
    fn test_different_lengths() {
        assert!(!constant_time_compare(b"3e0f2fb9", b"3e0f"));
        assert!(!constant_time_compare(b"", b"3e"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!constant_time_compare(b"abcdef", b"ABCDEF"));
    }

    #[test]
    fn test_empty_slices() {
        assert!(constant_time_compare(b"", b""));
    }
}
