use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating NIK (national ID) fields
    /// Must be exactly 16 digits
    /// - Valid: "3271046504930002"
    /// - Invalid: "12345", "3271-0465-0493", "32710465049300021"
    pub static ref NIK_REGEX: Regex = Regex::new(r"^[0-9]{16}$").unwrap();

    /// Regex for validating Indonesian phone numbers
    /// Accepts the +62/62/0 prefix followed by 8-13 digits
    /// - Valid: "081234567890", "+628123456789", "628123456789"
    /// - Invalid: "12345", "0812-3456-7890", "hello"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^(\+62|62|0)[0-9]{8,13}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nik_regex_valid() {
        assert!(NIK_REGEX.is_match("3271046504930002"));
        assert!(NIK_REGEX.is_match("0000000000000000"));
    }

    #[test]
    fn test_nik_regex_invalid() {
        assert!(!NIK_REGEX.is_match("12345")); // too short
        assert!(!NIK_REGEX.is_match("32710465049300021")); // 17 digits
        assert!(!NIK_REGEX.is_match("3271-0465-0493-00")); // separators
        assert!(!NIK_REGEX.is_match("")); // empty
        assert!(!NIK_REGEX.is_match("327104650493000a")); // letter
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("081234567890"));
        assert!(PHONE_REGEX.is_match("+628123456789"));
        assert!(PHONE_REGEX.is_match("628123456789"));
        assert!(!PHONE_REGEX.is_match("12345"));
        assert!(!PHONE_REGEX.is_match("0812-3456-7890"));
        assert!(!PHONE_REGEX.is_match("hello"));
    }
}
