//! Listing management — `prime-numbers phones`.

use anyhow::Result;
use console::style;
use std::path::Path;

use prime_common::{ListingPatch, ListingQuery, NewListing, PhoneListing, format_price};

use super::super::PhonesCommands;

pub async fn cmd_phones(project_dir: &Path, command: PhonesCommands) -> Result<()> {
    let inventory = super::open_inventory(project_dir)?;

    match command {
        PhonesCommands::Add {
            phone_number,
            price,
            postpaid,
            sold,
        } => {
            let new = NewListing {
                phone_number,
                price,
                postpaid_only: postpaid,
                sold,
            };
            let listing = inventory.add_listing(new).await?;
            println!(
                "Added {} (id {}) at {}",
                style(&listing.phone_number).bold(),
                listing.id,
                format_price(listing.price)
            );
        }
        PhonesCommands::List {
            search,
            postpaid_only,
            hide_sold,
            sort,
            json,
        } => {
            let query = ListingQuery {
                search,
                postpaid_only,
                hide_sold,
                sort,
            };
            let listings = inventory.list_listings(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listings)?);
            } else {
                print_listings(&listings);
            }
        }
        PhonesCommands::Edit {
            id,
            number,
            price,
            postpaid,
            sold,
        } => {
            let patch = ListingPatch {
                phone_number: number,
                price,
                postpaid_only: postpaid,
                sold,
            };
            let listing = inventory.update_listing(id, patch).await?;
            println!("Updated {}", describe(&listing));
        }
        PhonesCommands::Sold { id } => {
            let listing = inventory.mark_sold(id).await?;
            println!("Marked {} as sold", style(&listing.phone_number).bold());
        }
        PhonesCommands::Delete { id, yes } => {
            let listing = inventory.get_listing(id).await?;

            if !yes {
                use dialoguer::Confirm;

                let confirm = Confirm::new()
                    .with_prompt(format!("Delete {}?", listing.phone_number))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirm {
                    println!("Delete cancelled");
                    return Ok(());
                }
            }

            inventory.delete_listing(id).await?;
            println!("Deleted {}", listing.phone_number);
        }
    }

    Ok(())
}

fn print_listings(listings: &[PhoneListing]) {
    if listings.is_empty() {
        println!();
        println!("No phone numbers found.");
        println!();
        return;
    }

    println!();
    println!("{:<6} {:<16} {:>16}  Status", "ID", "Phone number", "Price");
    println!(
        "{:<6} {:<16} {:>16}  ------",
        "------", "----------------", "----------------"
    );
    for listing in listings {
        println!(
            "{:<6} {:<16} {:>16}  {}",
            listing.id,
            listing.phone_number,
            format_price(listing.price),
            status_label(listing)
        );
    }
    println!();
    println!("{} phone number(s)", listings.len());
    println!();
}

fn status_label(listing: &PhoneListing) -> String {
    let availability = if listing.sold {
        style("sold").red().to_string()
    } else {
        style("available").green().to_string()
    };
    if listing.postpaid_only {
        format!("{} {}", availability, style("(postpaid)").dim())
    } else {
        availability
    }
}

fn describe(listing: &PhoneListing) -> String {
    format!(
        "{} (id {}): {}, {}{}",
        listing.phone_number,
        listing.id,
        format_price(listing.price),
        if listing.sold { "sold" } else { "available" },
        if listing.postpaid_only {
            ", postpaid only"
        } else {
            ""
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(sold: bool, postpaid_only: bool) -> PhoneListing {
        PhoneListing {
            id: 3,
            phone_number: "7771234".to_string(),
            price: 1500.0,
            postpaid_only,
            sold,
            created_at: 0,
        }
    }

    #[test]
    fn test_describe_mentions_state() {
        assert_eq!(
            describe(&listing(false, false)),
            "7771234 (id 3): MVR 1,500.00, available"
        );
        assert_eq!(
            describe(&listing(true, true)),
            "7771234 (id 3): MVR 1,500.00, sold, postpaid only"
        );
    }

    #[test]
    fn test_status_label_marks_postpaid() {
        console::set_colors_enabled(false);
        assert_eq!(status_label(&listing(false, true)), "available (postpaid)");
        assert_eq!(status_label(&listing(true, false)), "sold");
    }
}
