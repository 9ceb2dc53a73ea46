//! Integer log2 used as a sizing hint for the store's table.

/// Returns the ceiling of `log2(value)`, i.e. the smallest `n` such that
/// `1 << n >= value`.
///
/// `value` must be non-zero. Zero trips a debug assertion and yields `0`
/// in release builds.
pub fn log2_ceil(value: u32) -> u32 {
    debug_assert!(value != 0, "log2_ceil is undefined for zero");
    if value <= 1 {
        return 0;
    }
    u32::BITS - (value - 1).leading_zeros()
}
