/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Numeric id used by the `/api/bill/{id}` endpoints.
///
/// Strips every non-digit character from the order identifier and parses
/// the remaining digits, so `"ORD-42"` becomes `42`. Returns `None` when no
/// digits remain or the number does not fit in a `u64`.
pub fn numeric_order_id(order_id: &str) -> Option<u64> {
    let digits: String = order_id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Keep only ASCII digits of a phone input (`"98765-43210"` → `"9876543210"`)
pub fn phone_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
