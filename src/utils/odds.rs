/// Convert American odds to the market's implied win probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn american_odds_to_probability(odds: i32) -> f64 {
    if odds > 0 {
        100.0 / (odds as f64 + 100.0)
    } else {
        let abs_odds = odds.abs() as f64;
        abs_odds / (abs_odds + 100.0)
    }
}

/// Format American odds with an explicit sign (e.g. +130, -150)
pub fn format_odds(odds: i32) -> String {
    format!("{:+}", odds)
}

/// Format a spread line with an explicit sign (e.g. -3.5)
pub fn format_spread(value: f64) -> String {
    format!("{:+.1}", value)
}

/// Format a probability in [0,1] as a percentage (e.g. 62.0%)
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
