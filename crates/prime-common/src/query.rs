//! Filtering and ordering of listings for the list views.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::listing::PhoneListing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceHigh,
    PriceLow,
    Number,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::PriceHigh => "price-high",
            Self::PriceLow => "price-low",
            Self::Number => "number",
        }
    }

    fn compare(&self, a: &PhoneListing, b: &PhoneListing) -> Ordering {
        match self {
            // Same-millisecond inserts fall back to insertion order.
            Self::Newest => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
            Self::Oldest => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            Self::PriceHigh => b.price.total_cmp(&a.price),
            Self::PriceLow => a.price.total_cmp(&b.price),
            Self::Number => a.phone_number.cmp(&b.phone_number),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "price-high" | "price_high" | "pricehigh" => Ok(Self::PriceHigh),
            "price-low" | "price_low" | "pricelow" => Ok(Self::PriceLow),
            "number" => Ok(Self::Number),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid values: newest, oldest, price-high, price-low, number",
                s
            )),
        }
    }
}

/// Search, filter and sort settings of a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub postpaid_only: bool,
    #[serde(default)]
    pub hide_sold: bool,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn matches(&self, listing: &PhoneListing) -> bool {
        let term = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(term) = term {
            if !listing
                .phone_number
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if self.postpaid_only && !listing.postpaid_only {
            return false;
        }
        if self.hide_sold && listing.sold {
            return false;
        }
        true
    }

    /// Matching listings in the requested order. The sort is stable.
    pub fn apply<'a, I>(&self, listings: I) -> Vec<&'a PhoneListing>
    where
        I: IntoIterator<Item = &'a PhoneListing>,
    {
        let mut matched: Vec<&PhoneListing> =
            listings.into_iter().filter(|l| self.matches(l)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}
