//! Column letter labels (A, B, ..., Z, AA, AB, ...)
//!
//! Labels are bijective base-26: there is no zero digit, so `Z` is 26 and
//! `AA` is 27. All column numbers here are 1-based.

/// Largest column number a worksheet can hold (`XFD`)
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row number a worksheet can hold
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a 1-based column number to its letter label (1 -> A, 27 -> AA)
///
/// Returns an empty string for 0, which has no label.
pub fn column_label(mut col: u32) -> String {
    let mut result = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    result
}

/// Convert a letter label to its 1-based column number (A -> 1, AA -> 27)
///
/// Lowercase letters are accepted. Returns `None` for an empty label, any
/// character outside `A-Z`, or a value that overflows `u32`.
pub fn column_number(label: &str) -> Option<u32> {
    if label.is_empty() {
        return None;
    }

    let mut result: u32 = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result)
}

/// A1-style reference for a 1-based (row, col) pair
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_label(col), row)
}
