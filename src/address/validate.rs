//! Field-by-field address validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::Address;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));
static POSTAL_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid postal code regex"));

/// The first rule an address violates
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    #[error("First name is required")]
    MissingFirstName,

    #[error("Last name is required")]
    MissingLastName,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Phone number must be 10 digits")]
    InvalidPhone,

    #[error("Street address is required")]
    MissingStreetAddress,

    #[error("City is required")]
    MissingCity,

    #[error("State is required")]
    MissingState,

    #[error("Please enter a valid 6-digit postal code")]
    InvalidPostalCode,

    #[error("Country is required")]
    MissingCountry,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check `address` rule by rule, stopping at the first failure.
///
/// Order: first name, last name, email, phone, street, city, state, postal
/// code, country.
pub fn validate_address(address: &Address) -> Result<(), AddressError> {
    if blank(&address.first_name) {
        return Err(AddressError::MissingFirstName);
    }
    if blank(&address.last_name) {
        return Err(AddressError::MissingLastName);
    }
    if !EMAIL_RE.is_match(address.email.trim()) {
        return Err(AddressError::InvalidEmail);
    }
    if !PHONE_RE.is_match(address.phone_number.trim()) {
        return Err(AddressError::InvalidPhone);
    }
    if blank(&address.street_address) {
        return Err(AddressError::MissingStreetAddress);
    }
    if blank(&address.city) {
        return Err(AddressError::MissingCity);
    }
    if blank(&address.state) {
        return Err(AddressError::MissingState);
    }
    if !POSTAL_CODE_RE.is_match(address.postal_code.trim()) {
        return Err(AddressError::InvalidPostalCode);
    }
    if blank(&address.country) {
        return Err(AddressError::MissingCountry);
    }
    Ok(())
}

impl Address {
    pub fn validate(&self) -> Result<(), AddressError> {
        validate_address(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Address {
        Address {
            id: "a1".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            street_address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "411001".to_string(),
            country: "India".to_string(),
            ..Address::default()
        }
    }

    #[test]
    fn test_valid_address_passes() {
        assert_eq!(validate_address(&valid()), Ok(()));
    }

    #[test]
    fn test_first_violation_wins() {
        let address = Address {
            first_name: "   ".to_string(),
            email: "not-an-email".to_string(),
            ..valid()
        };
        assert_eq!(validate_address(&address), Err(AddressError::MissingFirstName));
    }

    #[test]
    fn test_rules_in_order() {
        let mut address = Address {
            first_name: String::new(),
            last_name: String::new(),
            email: "x".to_string(),
            phone_number: "12345".to_string(),
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: "012345".to_string(),
            country: " ".to_string(),
            ..valid()
        };

        let expected = [
            AddressError::MissingFirstName,
            AddressError::MissingLastName,
            AddressError::InvalidEmail,
            AddressError::InvalidPhone,
            AddressError::MissingStreetAddress,
            AddressError::MissingCity,
            AddressError::MissingState,
            AddressError::InvalidPostalCode,
            AddressError::MissingCountry,
        ];

        for want in expected {
            assert_eq!(validate_address(&address), Err(want));
            match want {
                AddressError::MissingFirstName => address.first_name = "A".to_string(),
                AddressError::MissingLastName => address.last_name = "R".to_string(),
                AddressError::InvalidEmail => address.email = "a@b.in".to_string(),
                AddressError::InvalidPhone => address.phone_number = "9876543210".to_string(),
                AddressError::MissingStreetAddress => address.street_address = "1 Main".to_string(),
                AddressError::MissingCity => address.city = "Pune".to_string(),
                AddressError::MissingState => address.state = "MH".to_string(),
                AddressError::InvalidPostalCode => address.postal_code = "411001".to_string(),
                AddressError::MissingCountry => address.country = "India".to_string(),
            }
        }
        assert_eq!(validate_address(&address), Ok(()));
    }

    #[test]
    fn test_phone_must_be_exactly_ten_digits() {
        for phone in ["12345", "98765432101", "98765-4321", "abcdefghij", "١٢٣٤٥٦٧٨٩٠", "९८७६५४३२१०"] {
            let address = Address { phone_number: phone.to_string(), ..valid() };
            assert_eq!(validate_address(&address), Err(AddressError::InvalidPhone), "{}", phone);
        }
    }

    #[test]
    fn test_postal_code_cannot_start_with_zero() {
        let address = Address { postal_code: "011001".to_string(), ..valid() };
        assert_eq!(validate_address(&address), Err(AddressError::InvalidPostalCode));

        let address = Address { postal_code: "41100".to_string(), ..valid() };
        assert_eq!(validate_address(&address), Err(AddressError::InvalidPostalCode));
    }

    #[test]
    fn test_email_needs_domain_and_tld() {
        for email in ["asha@", "asha@example", "asha example.com", "@example.com"] {
            let address = Address { email: email.to_string(), ..valid() };
            assert_eq!(validate_address(&address), Err(AddressError::InvalidEmail), "{}", email);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AddressError::InvalidPhone.to_string(), "Phone number must be 10 digits");
        assert_eq!(AddressError::InvalidPostalCode.to_string(), "Please enter a valid 6-digit postal code");
    }
}
