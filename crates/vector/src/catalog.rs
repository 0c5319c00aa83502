use std::path::Path;
use tracing::info;
use trendvec_common::{Result, TrendvecError};

use crate::types::Record;

/// Built-in sample products
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new(
            "sample-1",
            "Classic White Sneakers",
            "Comfortable and stylish white sneakers perfect for everyday wear",
            "Shoes",
            tags(&["sneakers", "casual", "white"]),
        )
        .with_price(89.99),
        Record::new(
            "sample-2",
            "Denim Jacket",
            "Classic denim jacket with modern fit and styling",
            "Clothes",
            tags(&["jacket", "denim", "casual"]),
        )
        .with_price(129.99),
        Record::new(
            "sample-3",
            "Leather Tote Bag",
            "Genuine leather tote bag with spacious interior",
            "Bags",
            tags(&["tote", "leather", "spacious"]),
        )
        .with_price(159.99),
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Load records from a JSON array file
pub async fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(TrendvecError::not_found(format!(
            "catalog file {}",
            path.display()
        )));
    }

    let data = tokio::fs::read_to_string(path).await?;
    let records: Vec<Record> = serde_json::from_str(&data)?;

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
