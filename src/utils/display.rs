//! Utilities related to displaying things.

use std::fmt;

use num_format::Locale;
use num_format::ToFormattedString;

/// Utility struct for displaying percentages. The first item in the struct is
/// the numerator and the second item in the struct is the denominator.
pub struct PercentageFormat(pub u64, pub u64);

impl fmt::Display for PercentageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 == 0 {
            f.write_str("N/A")
        } else {
            let (a, b) = (self.0 as f64, self.1 as f64);
            write!(f, "{:.2}%", a / b * 100.0)
        }
    }
}

/// Formats a count with thousands separators for log and table output.
pub fn formatted_count(count: u64) -> String {
    count.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_format() {
        assert_eq!(PercentageFormat(1, 4).to_string(), "25.00%");
        assert_eq!(PercentageFormat(0, 0).to_string(), "N/A");
    }

    #[test]
    fn test_formatted_count() {
        assert_eq!(formatted_count(1_234_567), "1,234,567");
    }
}
