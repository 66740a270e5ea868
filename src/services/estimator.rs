/// Number of creators a budget can pay once the platform fee is taken out.
///
/// `floor(total_budget * (1 - fee/100) / payout_per_creator)`, computed as
/// `total_budget * (100 - fee) / (100 * payout)` to stay exact on whole
/// amounts. Non-finite inputs, a non-positive payout or a fee outside
/// `0..=100` yield 0.
pub fn estimate_reach(
    total_budget: f64,
    payout_per_creator: f64,
    platform_fee_percent: f64,
) -> u64 {
    if !(total_budget.is_finite() && payout_per_creator.is_finite() && platform_fee_percent.is_finite())
    {
        return 0;
    }
    if payout_per_creator <= 0.0 || !(0.0..=100.0).contains(&platform_fee_percent) {
        return 0;
    }

    let reach = (total_budget * (100.0 - platform_fee_percent)) / (100.0 * payout_per_creator);
    if !reach.is_finite() || reach <= 0.0 {
        return 0;
    }

    reach.floor() as u64
}
