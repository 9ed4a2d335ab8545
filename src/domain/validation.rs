// src/domain/validation.rs
// Checkout form rules. Everything here is local; nothing reaches the network.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const MIN_NAME_LENGTH: usize = 2;
pub const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    CustomerName,
    PhoneNumber,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::CustomerName => "customerName",
            FormField::PhoneNumber => "phoneNumber",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Name must be at least 2 characters long")]
    NameTooShort,

    #[error("Name can only contain letters and spaces")]
    NameInvalidCharacters,

    #[error("Phone number must be exactly 10 digits")]
    PhoneWrongLength,

    #[error("Please enter a valid phone number")]
    PhoneRepeatedDigits,
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::NameTooShort | FieldError::NameInvalidCharacters => FormField::CustomerName,
            FieldError::PhoneWrongLength | FieldError::PhoneRepeatedDigits => FormField::PhoneNumber,
        }
    }
}

/// Per-field validation failures. A field may fail more than one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<FormField, Vec<FieldError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.fields.entry(error.field()).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields carrying at least one error
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: FormField) -> &[FieldError] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: FormField) -> bool {
        self.fields.contains_key(&field)
    }

    /// All messages for `field`, joined for display under the input
    pub fn message(&self, field: FormField) -> Option<String> {
        let errors = self.fields.get(&field)?;
        Some(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(". "),
        )
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.fields.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field.as_str(), error)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Keeps only the digits of a phone number as typed
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate_name(name: &str) -> Vec<FieldError> {
    let trimmed = name.trim();
    let mut errors = Vec::new();

    if trimmed.chars().count() < MIN_NAME_LENGTH {
        errors.push(FieldError::NameTooShort);
    }
    if trimmed
        .chars()
        .any(|c| !(c.is_ascii_alphabetic() || c.is_whitespace()))
    {
        errors.push(FieldError::NameInvalidCharacters);
    }

    errors
}

pub fn validate_phone(raw: &str) -> Vec<FieldError> {
    let digits = normalize_phone(raw);

    if digits.len() != PHONE_DIGITS {
        return vec![FieldError::PhoneWrongLength];
    }

    let mut chars = digits.chars();
    let first = chars.next();
    if chars.all(|c| Some(c) == first) {
        return vec![FieldError::PhoneRepeatedDigits];
    }

    Vec::new()
}

/// Checkout fields exactly as the customer typed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub phone_number: String,
    pub notes: String,
}

/// Checkout fields that passed validation, ready for an order draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    /// digits only
    pub phone_number: String,
    pub notes: Option<String>,
}

impl CheckoutForm {
    pub fn new(customer_name: &str, phone_number: &str, notes: &str) -> Self {
        Self {
            customer_name: customer_name.to_string(),
            phone_number: phone_number.to_string(),
            notes: notes.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) {
        match field {
            FormField::CustomerName => self.customer_name = value.to_string(),
            FormField::PhoneNumber => self.phone_number = value.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedCheckout, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for error in validate_name(&self.customer_name)
            .into_iter()
            .chain(validate_phone(&self.phone_number))
        {
            errors.push(error);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let notes = self.notes.trim();
        Ok(ValidatedCheckout {
            customer_name: self.customer_name.trim().to_string(),
            phone_number: normalize_phone(&self.phone_number),
            notes: if notes.is_empty() {
                None
            } else {
                Some(self.notes.clone())
            },
        })
    }
}
