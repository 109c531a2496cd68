use serde_json::Value;

/// Offset change of one results page.
pub const PAGE_STEP: i64 = 10;

/// Read a page offset from a route parameter; anything non-numeric is 0.
pub fn parse_offset(current: &Value) -> i64 {
    let n = match current {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => n.trunc() as i64,
        _ => 0,
    }
}

/// New offset after moving `delta` from `current`, never below `floor`.
pub fn page(current: &Value, delta: i64, floor: i64) -> i64 {
    parse_offset(current).saturating_add(delta).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_back_clamps_at_zero() {
        assert_eq!(page(&json!(5), -PAGE_STEP, 0), 0);
        assert_eq!(page(&json!(30), -PAGE_STEP, 0), 20);
    }

    #[test]
    fn test_non_numeric_treated_as_zero() {
        assert_eq!(page(&json!("abc"), PAGE_STEP, 0), 10);
        assert_eq!(page(&Value::Null, PAGE_STEP, 0), 10);
        assert_eq!(page(&json!({"page": 3}), PAGE_STEP, 0), 10);
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(page(&json!("20"), PAGE_STEP, 0), 30);
        assert_eq!(page(&json!(" 40 "), -PAGE_STEP, 0), 30);
        assert_eq!(page(&json!(""), PAGE_STEP, 0), 10);
    }

    #[test]
    fn test_custom_floor() {
        assert_eq!(page(&json!(15), -PAGE_STEP, 10), 10);
    }
}
