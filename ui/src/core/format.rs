//! Formatting helpers for presenting collection figures.

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "—".into();
    }
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(rounded.unsigned_abs()))
}

pub fn format_rate(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        "—".into()
    }
}

fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{last_three}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_lakh_grouping() {
        assert_eq!(format_amount(999.0), "₹999");
        assert_eq!(format_amount(1000.0), "₹1,000");
        assert_eq!(format_amount(1234567.0), "₹12,34,567");
        assert_eq!(format_amount(-250000.4), "-₹2,50,000");
    }

    #[test]
    fn rates_keep_one_decimal() {
        assert_eq!(format_rate(66.666), "66.7%");
        assert_eq!(format_rate(0.0), "0.0%");
    }
}
