//! Numeric helpers usable in constant expressions.

/// Square root by Newton-Raphson, evaluable at compile time.
///
/// Returns NaN for negative, infinite, or NaN input.
///
/// # Example
/// ```
/// use aligned_dot::utils::const_math::sqrt;
///
/// const ROOT: f64 = sqrt(144.0);
/// assert_eq!(ROOT, 12.0);
/// ```
pub const fn sqrt(x: f64) -> f64 {
    if !(x >= 0.0 && x < f64::INFINITY) {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }

    let mut prev = 0.0;
    let mut curr = x;
    // Newton halves the error far from the root, so even 1e308 converges
    // well inside the cap; the cap only stops a two-value oscillation.
    let mut steps = 0;
    while curr != prev && steps < 2048 {
        let next = 0.5 * (curr + x / curr);
        prev = curr;
        curr = next;
        steps += 1;
    }
    curr
}
