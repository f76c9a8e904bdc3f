//! Integer division helpers.

/// Floor division. Panics on a zero divisor; callers validate first.
pub fn floor_div(a: usize, b: usize) -> usize {
    assert!(b != 0, "division by zero");
    a / b
}

/// Ceiling division. Panics on a zero divisor; callers validate first.
pub fn ceil_div(a: usize, b: usize) -> usize {
    assert!(b != 0, "division by zero");
    if a % b == 0 {
        a / b
    } else {
        a / b + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_truncates() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(6, 2), 3);
        assert_eq!(floor_div(0, 5), 0);
    }

    #[test]
    fn ceil_div_rounds_up() {
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(6, 2), 3);
        assert_eq!(ceil_div(0, 5), 0);
        assert_eq!(ceil_div(1, 5), 1);
    }
}
