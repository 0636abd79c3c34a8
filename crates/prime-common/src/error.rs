//! Domain-level errors. Exhausting the mirror-code budget is not among them;
//! that is reported as [`crate::mirror::Generation::Exhausted`].

use thiserror::Error;

/// Rejected listing input.
#[derive(Debug, Error, PartialEq)]
pub enum ListingError {
    #[error("Phone number is required")]
    MissingPhoneNumber,

    #[error("Price must be a positive amount, got {0}")]
    InvalidPrice(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("You can only select up to {max} numbers")]
    Full { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_full_mentions_cap() {
        let err = SelectionError::Full { max: 10 };
        assert_eq!(err.to_string(), "You can only select up to 10 numbers");
    }

    #[test]
    fn listing_errors_implement_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ListingError::MissingPhoneNumber);
        assert_std_error(&SelectionError::Full { max: 1 });
    }
}
