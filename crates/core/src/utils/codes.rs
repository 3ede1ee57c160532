//! Human-facing document codes

use printshop_domain::constants::{
    GENERIC_SKU_PREFIX, INVOICE_NUMBER_WIDTH, PRODUCTION_ID_PREFIX, PURCHASE_ORDER_PREFIX,
    QUOTE_CODE_PREFIX,
};
use rand::Rng;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `COT-` plus the last six base-36 digits of the millisecond timestamp
pub fn quote_code(now_millis: i64) -> String {
    let encoded = base36(now_millis.max(0) as u64);
    let tail = &encoded[encoded.len().saturating_sub(6)..];
    format!("{QUOTE_CODE_PREFIX}-{tail:0>6}")
}

/// `OT-NNNN` with a random four-digit number
pub fn production_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{PRODUCTION_ID_PREFIX}-{}", rng.gen_range(1000..10000))
}

/// `OC-YYYY-NNNN`
pub fn purchase_order_code<R: Rng + ?Sized>(year: i32, rng: &mut R) -> String {
    format!("{PURCHASE_ORDER_PREFIX}-{year}-{}", rng.gen_range(1000..10000))
}

/// First three letters of the category (or `GEN`) and a random number
pub fn sku<R: Rng + ?Sized>(category: Option<&str>, rng: &mut R) -> String {
    let prefix: String = category
        .map(|name| name.to_uppercase().chars().filter(|c| c.is_alphanumeric()).take(3).collect())
        .filter(|prefix: &String| !prefix.is_empty())
        .unwrap_or_else(|| GENERIC_SKU_PREFIX.to_string());
    format!("{prefix}-{}", rng.gen_range(0..10000))
}

/// `SERIES-NNNNNN`
pub fn invoice_number(series: &str, sequence: u64) -> String {
    format!("{series}-{sequence:0>width$}", width = INVOICE_NUMBER_WIDTH)
}
