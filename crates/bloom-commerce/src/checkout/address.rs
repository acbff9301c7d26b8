//! Delivery addresses and the address book.

use crate::error::{CommerceError, FieldErrors};
use crate::ids::{AddressId, UserId};
use crate::validate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_COUNTRY: &str = "India";

/// Kind of address, shown as a tag in the address book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AddressType {
    #[default]
    Home,
    Office,
    Other,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Home => "Home",
            AddressType::Office => "Office",
            AddressType::Other => "Other",
        }
    }
}

impl FromStr for AddressType {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(AddressType::Home),
            "office" => Ok(AddressType::Office),
            "other" => Ok(AddressType::Other),
            _ => Err(CommerceError::UnknownAddressType(s.to_string())),
        }
    }
}

/// A saved delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub address_type: AddressType,
    #[serde(default)]
    pub is_default: bool,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Address {
    /// Single-line form used on the review page and in the order payload.
    ///
    /// Joins the non-empty parts with ", ": name, phone, line 1, line 2,
    /// landmark, "city, state postal", country.
    pub fn formatted(&self) -> String {
        let city_line = format!("{}, {} {}", self.city.trim(), self.state.trim(), self.postal_code.trim());
        let parts = [
            Some(self.full_name.as_str()),
            Some(self.phone.as_str()),
            Some(self.address_line1.as_str()),
            self.address_line2.as_deref(),
            self.landmark.as_deref(),
            Some(city_line.as_str()),
            Some(self.country.as_str()),
        ];
        parts
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Convert back into an editable form.
    pub fn to_form(&self) -> AddressForm {
        AddressForm {
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone().unwrap_or_default(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone().unwrap_or_default(),
            landmark: self.landmark.clone().unwrap_or_default(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            address_type: self.address_type,
            is_default: self.is_default,
        }
    }
}

/// Address form input, as typed by the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub landmark: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub address_type: AddressType,
    pub is_default: bool,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            email: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            landmark: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: default_country(),
            address_type: AddressType::Home,
            is_default: false,
        }
    }
}

impl AddressForm {
    /// Check every field, collecting all messages.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if validate::char_len(&self.full_name) < 2 {
            errors.add("fullName", "Full name must be at least 2 characters");
        }
        if !validate::is_indian_mobile(&self.phone) {
            errors.add("phone", "Please enter a valid Indian mobile number");
        }
        if !self.email.is_empty() && !validate::is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }
        if validate::char_len(&self.address_line1) < 5 {
            errors.add("addressLine1", "Address must be at least 5 characters");
        }
        if validate::char_len(&self.city) < 2 {
            errors.add("city", "City must be at least 2 characters");
        }
        if validate::char_len(&self.state) < 2 {
            errors.add("state", "State must be at least 2 characters");
        }
        if !validate::is_indian_pin_code(&self.postal_code) {
            errors.add("postalCode", "Please enter a valid 6-digit postal code");
        }
        if self.country.trim().is_empty() {
            errors.add("country", "Country is required");
        }

        errors.into_result()
    }

    /// Validate and build an address with the given id.
    pub fn into_address(
        self,
        id: AddressId,
        user_id: Option<UserId>,
    ) -> Result<Address, CommerceError> {
        self.validate()?;
        Ok(Address {
            id,
            user_id,
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: non_empty(self.email),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: non_empty(self.address_line2),
            landmark: non_empty(self.landmark),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            address_type: self.address_type,
            is_default: self.is_default,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A customer's saved addresses.
///
/// Whenever the book is non-empty exactly one address is the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a server list, repairing the default flag if needed.
    pub fn from_addresses(addresses: Vec<Address>) -> Self {
        let mut book = Self { addresses };
        let preferred = book.addresses.iter().position(|a| a.is_default).unwrap_or(0);
        book.mark_default(preferred);
        book
    }

    pub fn list(&self) -> &[Address] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Add an address. The first address always becomes the default.
    pub fn add(&mut self, address: Address) -> &Address {
        let make_default = address.is_default || self.addresses.is_empty();
        self.addresses.push(address);
        let index = self.addresses.len() - 1;
        if make_default {
            self.mark_default(index);
        } else {
            self.addresses[index].is_default = false;
        }
        &self.addresses[index]
    }

    /// Replace an address by id.
    pub fn update(&mut self, address: Address) -> Result<(), CommerceError> {
        let index = self.index_of(&address.id)?;
        let was_default = self.addresses[index].is_default;
        let wants_default = address.is_default;
        self.addresses[index] = address;
        if wants_default || was_default {
            // A default can only be moved, never cleared, through update.
            self.mark_default(index);
        }
        Ok(())
    }

    /// Remove an address; if it was the default, the first remaining one
    /// takes over.
    pub fn remove(&mut self, id: &AddressId) -> Result<Address, CommerceError> {
        let index = self.index_of(id)?;
        let removed = self.addresses.remove(index);
        if removed.is_default && !self.addresses.is_empty() {
            self.mark_default(0);
        }
        Ok(removed)
    }

    pub fn set_default(&mut self, id: &AddressId) -> Result<(), CommerceError> {
        let index = self.index_of(id)?;
        self.mark_default(index);
        Ok(())
    }

    fn index_of(&self, id: &AddressId) -> Result<usize, CommerceError> {
        self.addresses
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| CommerceError::ValidationError(format!("address not found: {}", id)))
    }

    fn mark_default(&mut self, index: usize) {
        for (i, address) in self.addresses.iter_mut().enumerate() {
            address.is_default = i == index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AddressForm {
        AddressForm {
            full_name: "Priya Sharma".to_string(),
            phone: "+919876543210".to_string(),
            email: "priya@example.com".to_string(),
            address_line1: "12 MG Road".to_string(),
            address_line2: "Flat 4B".to_string(),
            landmark: String::new(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            ..AddressForm::default()
        }
    }

    fn address(id: &str, is_default: bool) -> Address {
        let mut form = valid_form();
        form.is_default = is_default;
        form.into_address(AddressId::new(id), None).unwrap()
    }

    #[test]
    fn test_valid_form() {
        assert!(valid_form().validate().is_ok());
        assert_eq!(AddressForm::default().country, "India");
        assert_eq!(AddressForm::default().address_type, AddressType::Home);
    }

    #[test]
    fn test_all_errors_reported() {
        let form = AddressForm {
            full_name: "P".to_string(),
            phone: "12345".to_string(),
            email: "not-an-email".to_string(),
            address_line1: "abc".to_string(),
            city: "B".to_string(),
            state: "".to_string(),
            postal_code: "012345".to_string(),
            country: " ".to_string(),
            ..AddressForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 8);
        assert_eq!(
            errors.get("phone"),
            Some("Please enter a valid Indian mobile number")
        );
        assert_eq!(
            errors.get("postalCode"),
            Some("Please enter a valid 6-digit postal code")
        );
    }

    #[test]
    fn test_email_optional() {
        let mut form = valid_form();
        form.email = String::new();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_padded_phone_and_pin_rejected() {
        let mut form = valid_form();
        form.phone = " 9876543210".to_string();
        form.postal_code = "560001 ".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.contains("phone"));
        assert!(errors.contains("postalCode"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_name_length_counts_spaces() {
        let mut form = valid_form();
        form.full_name = " P".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_address_type_parse() {
        assert_eq!("Office".parse::<AddressType>().unwrap(), AddressType::Office);
        assert_eq!(" home ".parse::<AddressType>().unwrap(), AddressType::Home);
        let err = "warehouse".parse::<AddressType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown address type: warehouse");
    }

    #[test]
    fn test_formatted_skips_empty_parts() {
        let addr = address("a1", false);
        assert_eq!(
            addr.formatted(),
            "Priya Sharma, +919876543210, 12 MG Road, Flat 4B, Bengaluru, Karnataka 560001, India"
        );
    }

    #[test]
    fn test_book_first_address_is_default() {
        let mut book = AddressBook::new();
        book.add(address("a1", false));
        book.add(address("a2", false));
        assert_eq!(book.default_address().unwrap().id.as_str(), "a1");
    }

    #[test]
    fn test_book_exactly_one_default() {
        let mut book = AddressBook::new();
        book.add(address("a1", false));
        book.add(address("a2", true));
        book.add(address("a3", false));
        assert_eq!(book.list().iter().filter(|a| a.is_default).count(), 1);
        assert_eq!(book.default_address().unwrap().id.as_str(), "a2");

        book.set_default(&AddressId::new("a3")).unwrap();
        assert_eq!(book.list().iter().filter(|a| a.is_default).count(), 1);
        assert_eq!(book.default_address().unwrap().id.as_str(), "a3");
    }

    #[test]
    fn test_book_remove_default_promotes_first() {
        let mut book = AddressBook::new();
        book.add(address("a1", false));
        book.add(address("a2", true));
        book.remove(&AddressId::new("a2")).unwrap();
        assert_eq!(book.default_address().unwrap().id.as_str(), "a1");
        assert!(book.remove(&AddressId::new("zzz")).is_err());
    }

    #[test]
    fn test_book_update_cannot_clear_default() {
        let mut book = AddressBook::new();
        book.add(address("a1", false));
        let mut edited = address("a1", false);
        edited.city = "Mysuru".to_string();
        book.update(edited).unwrap();
        let current = book.get(&AddressId::new("a1")).unwrap();
        assert!(current.is_default);
        assert_eq!(current.city, "Mysuru");
    }

    #[test]
    fn test_book_from_server_repairs_defaults() {
        let book = AddressBook::from_addresses(vec![
            address("a1", true),
            address("a2", true),
        ]);
        assert_eq!(book.list().iter().filter(|a| a.is_default).count(), 1);
        assert!(AddressBook::from_addresses(vec![]).default_address().is_none());
    }
}
