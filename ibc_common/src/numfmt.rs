//! Canonical output formatting for double values.
//!
//! PRINT writes doubles the way C++ iostreams do by default, which is
//! printf's `%g` with six significant digits: fixed notation while the
//! decimal exponent is in `[-4, 5]`, scientific notation otherwise, and
//! trailing zeros dropped either way.

/// Formats a double with `%g`-style six-significant-digit notation.
pub fn format_double(value: f64) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    // Round to six significant digits first; the exponent of the rounded
    // value decides between fixed and scientific form.
    let scientific = format!("{:.5e}", value);
    let (mantissa, exponent) = split_exponent(&scientific);

    if !(-4..6).contains(&exponent) {
        let mantissa = trim_trailing_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let precision = (5 - exponent) as usize;
        trim_trailing_zeros(&format!("{:.*}", precision, value)).to_string()
    }
}

fn split_exponent(scientific: &str) -> (&str, i32) {
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (scientific, 0),
    }
}

fn trim_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_values_print_without_a_decimal_point() {
        assert_eq!(format_double(9.0), "9");
        assert_eq!(format_double(-27.0), "-27");
        assert_eq!(format_double(524288.0), "524288");
        assert_eq!(format_double(0.0), "0");
    }

    #[test]
    fn fractional_values_drop_trailing_zeros() {
        assert_eq!(format_double(1.5), "1.5");
        assert_eq!(format_double(2.9000000000000004), "2.9");
        assert_eq!(format_double(2.1999999999999997), "2.2");
        assert_eq!(format_double(0.0625), "0.0625");
        assert_eq!(format_double(0.00390625), "0.00390625");
    }

    #[test]
    fn large_and_small_values_use_scientific_notation() {
        assert_eq!(format_double(1.345e210), "1.345e+210");
        assert_eq!(format_double(-1.345e210), "-1.345e+210");
        assert_eq!(format_double(1.704e123), "1.704e+123");
        assert_eq!(format_double(7.62939453125e-108), "7.62939e-108");
        assert_eq!(format_double(1e-5), "1e-05");
    }

    #[test]
    fn switches_notation_at_the_same_magnitudes_as_printf_g() {
        assert_eq!(format_double(123456.0), "123456");
        assert_eq!(format_double(1234567.0), "1.23457e+06");
        assert_eq!(format_double(1e6), "1e+06");
        assert_eq!(format_double(0.0001), "0.0001");
        assert_eq!(format_double(0.00001), "1e-05");
    }

    #[test]
    fn rounds_to_six_significant_digits() {
        assert_eq!(format_double(0.123456789), "0.123457");
        assert_eq!(format_double(999999.9), "1e+06");
        assert_eq!(format_double(1.3449999e210), "1.345e+210");
    }
}
