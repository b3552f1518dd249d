//! Screens - local UI state and pure view logic for each tab
//!
//! Fetched data lives in [`crate::app::Queries`]; a screen only owns what the
//! user changes locally (cursors, filters, composer fields, busy flags) and
//! derives its view from the shared query state.

pub mod admin;
pub mod customer;

/// Move a list cursor up, wrapping around
pub fn cursor_up(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        cursor.checked_sub(1).unwrap_or(len - 1).min(len - 1)
    }
}

/// Move a list cursor down, wrapping around
pub fn cursor_down(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (cursor + 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        assert_eq!(cursor_down(2, 3), 0);
        assert_eq!(cursor_up(0, 3), 2);
        assert_eq!(cursor_up(5, 3), 2);
        assert_eq!(cursor_down(0, 0), 0);
        assert_eq!(cursor_up(0, 0), 0);
    }
}
