//! Promo sheet — `prime-numbers promo`.

use anyhow::Result;
use std::path::Path;

pub async fn cmd_promo(project_dir: &Path, ids: Vec<i64>, json: bool) -> Result<()> {
    let inventory = super::open_inventory(project_dir)?;
    let sheet = inventory.promo_sheet(ids).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
    } else {
        print!("{}", sheet.render_text());
    }
    Ok(())
}
