//! Content of the shareable promo image: a title, the selected numbers with
//! their prices, and a footer. Drawing it is left to whoever displays it.

use serde::{Deserialize, Serialize};

use crate::listing::PhoneListing;
use crate::price::format_price;
use crate::selection::DEFAULT_MAX_SELECTED;

pub const PROMO_TITLE: &str = "Prime Numbers";
pub const PROMO_FOOTER: &str = "Contact us for premium numbers";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoEntry {
    pub phone_number: String,
    pub price_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoSheet {
    pub title: String,
    pub entries: Vec<PromoEntry>,
    pub footer: String,
}

impl PromoSheet {
    /// Listings in selection order; anything past the first
    /// [`DEFAULT_MAX_SELECTED`] is left off the sheet.
    pub fn from_listings<'a, I>(listings: I) -> Self
    where
        I: IntoIterator<Item = &'a PhoneListing>,
    {
        let entries = listings
            .into_iter()
            .take(DEFAULT_MAX_SELECTED)
            .map(|l| PromoEntry {
                phone_number: l.phone_number.clone(),
                price_label: format_price(l.price),
            })
            .collect();
        Self {
            title: PROMO_TITLE.to_string(),
            entries,
            footer: PROMO_FOOTER.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text rendering: numbers left, prices right-aligned.
    pub fn render_text(&self) -> String {
        let number_width = self
            .entries
            .iter()
            .map(|e| e.phone_number.chars().count())
            .max()
            .unwrap_or(0);
        let price_width = self
            .entries
            .iter()
            .map(|e| e.price_label.chars().count())
            .max()
            .unwrap_or(0);
        let rule_width = (number_width + price_width + 4)
            .max(self.title.len())
            .max(self.footer.len());

        let mut out = String::new();
        out.push_str(&format!("{:^width$}\n", self.title, width = rule_width));
        out.push_str(&"=".repeat(rule_width));
        out.push('\n');
        for entry in &self.entries {
            let gap = rule_width - entry.phone_number.chars().count();
            out.push_str(&format!(
                "{}{:>gap$}\n",
                entry.phone_number,
                entry.price_label,
                gap = gap
            ));
        }
        out.push_str(&"-".repeat(rule_width));
        out.push('\n');
        out.push_str(&format!("{:^width$}\n", self.footer, width = rule_width));
        out
    }
}
