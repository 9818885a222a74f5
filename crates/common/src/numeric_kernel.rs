use super::error::Error;

/// Converts a compounded rate product into a profit percentage.
pub fn profit_pct_from_product(product: f64) -> f64 {
    (product - 1.0) * 100.0
}

/// Recovers the compounded rate along a closed vertex path and returns its profit percentage.
///
/// Each hop contributes `exp(-w[u][v])`, which undoes the `-ln(rate)` transform, so the
/// product equals the product of the original rates along the path.
///
/// `weight` is queried as `weight(u, v)`; `path` lists vertices with the first repeated at
/// the end (`c[0] == c[k]`).
///
/// # Errors
/// Returns `Error::NumericDegenerate` if any factor, the product, or the percentage is
/// not finite.
pub fn cycle_profit_pct<F>(path: &[usize], weight: F) -> Result<f64, Error>
where
    F: Fn(usize, usize) -> f64,
{
    let mut product = 1.0f64;

    for hop in path.windows(2) {
        let factor = (-weight(hop[0], hop[1])).exp();
        if !factor.is_finite() {
            return Err(Error::NumericDegenerate);
        }
        product *= factor;
    }

    let profit = profit_pct_from_product(product);
    if !product.is_finite() || !profit.is_finite() {
        return Err(Error::NumericDegenerate);
    }

    Ok(profit)
}
