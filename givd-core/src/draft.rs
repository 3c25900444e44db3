use crate::stock::{Category, NewStockItem};

/// A stock row as typed into the add-product form: amounts are still
/// strings.
#[derive(Debug, Clone, Default)]
pub struct StockDraft {
    pub name: String,
    pub category: Category,
    pub quantity: String,
    pub unit: String,
    pub threshold: String,
}

impl StockDraft {
    /// Parses the amounts and stamps the derived status.
    ///
    /// Unparseable amounts become NaN and are forwarded as-is; the store is
    /// the only validation layer.
    pub fn to_record(&self) -> NewStockItem {
        NewStockItem::new(
            self.name.clone(),
            self.category,
            parse_amount(&self.quantity),
            self.unit.clone(),
            parse_amount(&self.threshold),
        )
    }
}

fn parse_amount(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}
