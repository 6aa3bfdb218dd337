//! Utility functions shared by the request builders and the receipt parser.

use crate::errors::Result;
use serde::Serialize;

/// Declaration that opens every document sent to the gateway.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Serializes a value under the given root element as a single-line
/// document with the XML declaration prepended.
pub fn to_xml_document<T: Serialize>(root: &str, value: &T) -> Result<String> {
    let body = quick_xml::se::to_string_with_root(root, value)?;
    Ok(single_line(&format!("{}{}", XML_DECLARATION, body)))
}

/// Normalizes a decimal amount to the gateway's two-decimal form.
///
/// Returns `None` if the amount is not a plain non-negative decimal with at
/// most two fraction digits.
///
/// # Examples
///
/// ```
/// use moneris_rs::utils::normalize_amount;
///
/// assert_eq!(normalize_amount("5").as_deref(), Some("5.00"));
/// assert_eq!(normalize_amount("12.5").as_deref(), Some("12.50"));
/// assert_eq!(normalize_amount("-5"), None);
/// assert_eq!(normalize_amount("1.999"), None);
/// ```
pub fn normalize_amount(amount: &str) -> Option<String> {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
        || fraction.len() > 2
    {
        return None;
    }

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    Some(format!("{}.{:0<2}", whole, fraction))
}

/// Returns `true` if a normalized amount is greater than zero.
pub fn is_positive_amount(normalized: &str) -> bool {
    normalized.bytes().any(|b| (b'1'..=b'9').contains(&b))
}

/// Removes line breaks so a document fits on one line.
pub fn single_line(xml: &str) -> String {
    xml.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Returns `true` for `None`, empty and whitespace-only strings.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
