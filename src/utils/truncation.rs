const MAX_ERROR_LENGTH: usize = 2_000;

/// Cuts `error` to at most `MAX_ERROR_LENGTH` bytes on a char boundary.
pub fn truncate_error(error: &str) -> String {
    if error.len() <= MAX_ERROR_LENGTH {
        return error.to_string();
    }
    let mut cut = MAX_ERROR_LENGTH;
    while !error.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &error[..cut])
}
