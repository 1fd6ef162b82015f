//! Form types and their validation rules.
//!
//! Each form validates to either a cleaned value or a set of per-field
//! messages. Failed forms are re-rendered with the messages next to the
//! fields and the submitted values kept.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use shopeasy_core::Price;

use crate::api::{ProductInput, ProfileUpdate, ShippingAddress};

/// Most new images accepted in one product form submission.
pub const MAX_NEW_IMAGES: usize = 5;

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static LOOSE_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid regex"));

static STRICT_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("Invalid regex")
});

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

fn check_login_email(errors: &mut FieldErrors, email: &str) {
    if require(errors, "email", email, "Email is required") && !LOOSE_EMAIL_RE.is_match(email) {
        errors.add("email", "Email is invalid");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", "Password must be at least 6 characters");
    }
}

// =============================================================================
// Account Forms
// =============================================================================

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_login_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.finish(())
    }
}

/// Registration form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        check_login_email(&mut errors, &self.email);
        require(&mut errors, "phone", &self.phone, "Phone is required");
        check_password(&mut errors, &self.password);
        if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors.finish(())
    }
}

/// Profile form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        if require(&mut errors, "email", &self.email, "Email is required")
            && !STRICT_EMAIL_RE.is_match(self.email.trim())
        {
            errors.add("email", "Invalid email address");
        }
        errors.finish(ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingForm {
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<ShippingAddress, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "address", &self.address, "Address is required");
        require(&mut errors, "city", &self.city, "City is required");
        require(
            &mut errors,
            "postal_code",
            &self.postal_code,
            "Postal code is required",
        );
        require(&mut errors, "country", &self.country, "Country is required");
        errors.finish(ShippingAddress {
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            phone: None,
        })
    }
}

// =============================================================================
// Admin Product Form
// =============================================================================

/// Product form fields, collected from a multipart submission.
///
/// `images` holds the URLs of images already attached to the product that
/// the admin kept; new files are counted separately because they are only
/// uploaded after validation passes.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub brand: String,
    pub images: Vec<String>,
}

impl ProductForm {
    /// Fill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &crate::api::Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount().normalize().to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            images: product.image_urls(),
        }
    }

    /// Validate the form given the number of newly attached files.
    ///
    /// The returned input carries only the kept images; uploaded URLs are
    /// appended by the caller.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self, new_files: usize) -> Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Name is required");
        require(
            &mut errors,
            "description",
            &self.description,
            "Description is required",
        );

        let price = Decimal::from_str(self.price.trim())
            .ok()
            .map(Price::new)
            .filter(Price::is_positive);
        if price.is_none() {
            errors.add("price", "Enter a valid price");
        }

        let stock = self.stock.trim().parse::<u32>().ok();
        if stock.is_none() {
            errors.add("stock", "Enter valid stock");
        }

        if new_files > MAX_NEW_IMAGES {
            errors.add("images", "You can upload a maximum of 5 images.");
        } else if self.images.is_empty() && new_files == 0 {
            errors.add("images", "At least one image is required");
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductInput {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                price,
                category: self.category.trim().to_string(),
                brand: self.brand.trim().to_string(),
                stock,
                images: self.images.clone(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_valid() {
        assert!(login("ada@example.com", "secret1").validate().is_ok());
    }

    #[test]
    fn test_login_missing_fields() {
        let errors = login("", "").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn test_login_invalid_email_and_short_password() {
        let errors = login("ada@example", "12345").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_register_password_mismatch() {
        let form = RegisterForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn test_register_requires_name_and_phone() {
        let form = RegisterForm {
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            ..RegisterForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("phone"));
        assert!(!errors.has("email"));
    }

    #[test]
    fn test_profile_email_pattern() {
        let mut form = ProfileForm {
            name: "Ada".to_string(),
            email: "ADA@Example.COM".to_string(),
            ..ProfileForm::default()
        };
        let update = form.validate().unwrap();
        assert_eq!(update.email, "ADA@Example.COM");
        assert_eq!(update.address, "");

        form.email = "ada@example.c".to_string();
        assert_eq!(
            form.validate().unwrap_err().get("email"),
            Some("Invalid email address")
        );
    }

    #[test]
    fn test_shipping_requires_every_field() {
        let errors = ShippingForm {
            address: "1 Main St".to_string(),
            city: "   ".to_string(),
            ..ShippingForm::default()
        }
        .validate()
        .unwrap_err();
        assert!(!errors.has("address"));
        assert_eq!(errors.get("city"), Some("City is required"));
        assert_eq!(errors.get("postal_code"), Some("Postal code is required"));
        assert_eq!(errors.get("country"), Some("Country is required"));
    }

    #[test]
    fn test_shipping_trims_values() {
        let address = ShippingForm {
            address: " 1 Main St ".to_string(),
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(address.address, "1 Main St");
    }

    fn product_form() -> ProductForm {
        ProductForm {
            name: "Desk Lamp".to_string(),
            description: "Warm light".to_string(),
            price: "24.50".to_string(),
            stock: "0".to_string(),
            category: "Home".to_string(),
            brand: String::new(),
            images: vec!["https://cdn.example.com/lamp.jpg".to_string()],
        }
    }

    #[test]
    fn test_product_form_valid() {
        let input = product_form().validate(0).unwrap();
        assert_eq!(input.price, Price::from_cents(2_450));
        assert_eq!(input.stock, 0);
        assert_eq!(input.images.len(), 1);
    }

    #[test]
    fn test_product_form_rejects_bad_numbers() {
        let mut form = product_form();
        form.price = "0".to_string();
        form.stock = "-1".to_string();
        let errors = form.validate(0).unwrap_err();
        assert_eq!(errors.get("price"), Some("Enter a valid price"));
        assert_eq!(errors.get("stock"), Some("Enter valid stock"));

        form.price = "abc".to_string();
        assert!(form.validate(0).unwrap_err().has("price"));
    }

    #[test]
    fn test_product_form_image_rules() {
        let mut form = product_form();
        form.images.clear();
        assert_eq!(
            form.validate(0).unwrap_err().get("images"),
            Some("At least one image is required")
        );
        assert!(form.validate(1).is_ok());
        assert_eq!(
            form.validate(6).unwrap_err().get("images"),
            Some("You can upload a maximum of 5 images.")
        );
    }

    #[test]
    fn test_product_form_requires_trimmed_text() {
        let mut form = product_form();
        form.name = "  ".to_string();
        form.description = String::new();
        let errors = form.validate(0).unwrap_err();
        assert!(errors.has("name"));
        assert!(errors.has("description"));
    }
}
