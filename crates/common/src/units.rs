//! Balance formatting.

use alloy_primitives::{U256, utils::format_ether};

/// Formats a wei amount in ether, truncated (not rounded) to two decimals.
///
/// `1_234_567_000_000_000_000` wei renders as `"1.23"`.
pub fn format_balance(wei: U256) -> String {
    let value = format_ether(wei);
    match value.find('.') {
        Some(point) => value[..(point + 3).min(value.len())].to_string(),
        None => value,
    }
}
