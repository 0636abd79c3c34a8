use serde::{Deserialize, Serialize};

use crate::error::ListingError;

/// A phone number offered for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneListing {
    pub id: i64,
    pub phone_number: String,
    /// Asking price in MVR.
    pub price: f64,
    pub postpaid_only: bool,
    pub sold: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Input for creating a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub phone_number: String,
    pub price: f64,
    #[serde(default)]
    pub postpaid_only: bool,
    #[serde(default)]
    pub sold: bool,
}

impl NewListing {
    pub fn new(phone_number: impl Into<String>, price: f64) -> Self {
        Self {
            phone_number: phone_number.into(),
            price,
            postpaid_only: false,
            sold: false,
        }
    }

    /// Trim the phone number and check both required fields.
    pub fn validate(mut self) -> Result<Self, ListingError> {
        self.phone_number = validate_phone_number(&self.phone_number)?;
        validate_price(self.price)?;
        Ok(self)
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub postpaid_only: Option<bool>,
    #[serde(default)]
    pub sold: Option<bool>,
}

impl ListingPatch {
    pub fn mark_sold() -> Self {
        Self {
            sold: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none()
            && self.price.is_none()
            && self.postpaid_only.is_none()
            && self.sold.is_none()
    }

    pub fn validate(mut self) -> Result<Self, ListingError> {
        if let Some(phone) = self.phone_number.as_deref() {
            self.phone_number = Some(validate_phone_number(phone)?);
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(self)
    }

    pub fn apply_to(&self, listing: &mut PhoneListing) {
        if let Some(phone) = &self.phone_number {
            listing.phone_number = phone.clone();
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        if let Some(postpaid_only) = self.postpaid_only {
            listing.postpaid_only = postpaid_only;
        }
        if let Some(sold) = self.sold {
            listing.sold = sold;
        }
    }
}

fn validate_phone_number(raw: &str) -> Result<String, ListingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ListingError::MissingPhoneNumber);
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<(), ListingError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ListingError::InvalidPrice(price));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> PhoneListing {
        PhoneListing {
            id: 1,
            phone_number: "7771234".into(),
            price: 1500.0,
            postpaid_only: false,
            sold: false,
            created_at: 0,
        }
    }

    #[test]
    fn test_new_listing_trims_phone_number() {
        let new = NewListing::new("  7654321 ", 250.0).validate().unwrap();
        assert_eq!(new.phone_number, "7654321");
    }

    #[test]
    fn test_new_listing_rejects_blank_phone() {
        let err = NewListing::new("   ", 250.0).validate().unwrap_err();
        assert!(matches!(err, ListingError::MissingPhoneNumber));
    }

    #[test]
    fn test_new_listing_rejects_zero_and_nan_price() {
        assert!(matches!(
            NewListing::new("7654321", 0.0).validate(),
            Err(ListingError::InvalidPrice(_))
        ));
        assert!(matches!(
            NewListing::new("7654321", f64::NAN).validate(),
            Err(ListingError::InvalidPrice(_))
        ));
        assert!(matches!(
            NewListing::new("7654321", -10.0).validate(),
            Err(ListingError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut l = listing();
        let patch = ListingPatch {
            price: Some(999.5),
            sold: Some(true),
            ..ListingPatch::default()
        };
        patch.apply_to(&mut l);
        assert_eq!(l.phone_number, "7771234");
        assert_eq!(l.price, 999.5);
        assert!(l.sold);
        assert!(!l.postpaid_only);
    }

    #[test]
    fn test_patch_validation_trims_and_checks_price() {
        let patch = ListingPatch {
            phone_number: Some(" 7000000 ".into()),
            ..ListingPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.phone_number.as_deref(), Some("7000000"));

        let bad = ListingPatch {
            price: Some(0.0),
            ..ListingPatch::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_mark_sold_patch() {
        let patch = ListingPatch::mark_sold();
        assert!(!patch.is_empty());
        assert_eq!(patch.sold, Some(true));
        assert!(ListingPatch::default().is_empty());
    }

    #[test]
    fn test_new_listing_deserializes_with_defaults() {
        let new: NewListing =
            serde_json::from_str(r#"{"phone_number":"7123456","price":42.0}"#).unwrap();
        assert!(!new.postpaid_only);
        assert!(!new.sold);
    }
}
