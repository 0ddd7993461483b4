//! Small rounding helpers shared by the statistics code.

/// `round(100 * part / whole)`, with halves rounded up. Returns 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Minutes expressed as hours, rounded to one decimal place.
pub fn hours_one_decimal(minutes: u64) -> f64 {
    (minutes as f64 / 60.0 * 10.0).round() / 10.0
}

/// Integer average rounded to nearest; 0 for an empty population.
pub fn rounded_average(total: u64, count: usize) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}
