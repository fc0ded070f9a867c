#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates a text-string payload, returning it as `&str` when it is UTF-8.
#[inline]
pub fn validate(bytes: &[u8]) -> Option<&str> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).ok()
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).ok()
    }
}
