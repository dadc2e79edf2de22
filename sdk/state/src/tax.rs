pub const BPS_DENOMINATOR: u64 = 10_000;

/// `amount * bps / 10_000`, truncating. Widened to u128 so no product overflows.
pub fn calculate_tax(amount: u64, bps: u16) -> u64 {
    let tax = u128::from(amount) * u128::from(bps) / u128::from(BPS_DENOMINATOR);
    // bps above 10_000 could exceed u64::MAX for huge amounts
    u64::try_from(tax).unwrap_or(u64::MAX)
}
