use serde::{Deserialize, Serialize};

/// A row of the remote `stocks` table.
///
/// Remote-owned: `id` is assigned by the store on insert and `status` is
/// whatever was derived at write time. The controller never recomputes
/// `status` after a fetch; it trusts the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    pub threshold: f64,
    pub status: StockStatus,
}

/// Product category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Food,
    Household,
    Hygiene,
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "household" => Ok(Category::Household),
            "hygiene" => Ok(Category::Hygiene),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Food => write!(f, "Food"),
            Category::Household => write!(f, "Household"),
            Category::Hygiene => write!(f, "Hygiene"),
        }
    }
}

/// Stock level classification, derived from quantity vs. threshold when the
/// row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    Ok,
    Low,
    Critical,
}

impl StockStatus {
    /// Write-time derivation: CRITICAL at or below zero, LOW at or below the
    /// threshold, OK above it.
    ///
    /// A NaN quantity compares false everywhere and lands on OK; amounts are
    /// not validated upstream.
    pub fn derive(quantity: f64, threshold: f64) -> Self {
        if quantity <= 0.0 {
            StockStatus::Critical
        } else if quantity <= threshold {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }

    pub fn is_alert(&self) -> bool {
        *self != StockStatus::Ok
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Ok => write!(f, "OK"),
            StockStatus::Low => write!(f, "LOW"),
            StockStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A record to insert, with the status stamped at write time. The store
/// assigns the `id`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStockItem {
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: String,
    pub threshold: f64,
    pub status: StockStatus,
}

impl NewStockItem {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        quantity: f64,
        unit: impl Into<String>,
        threshold: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            quantity,
            unit: unit.into(),
            threshold,
            status: StockStatus::derive(quantity, threshold),
        }
    }

    /// The row as the store will return it once an id is assigned.
    pub fn into_item(self, id: impl Into<String>) -> StockItem {
        StockItem {
            id: id.into(),
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            threshold: self.threshold,
            status: self.status,
        }
    }
}

/// The demo rows shown before the first successful fetch, and kept whenever
/// the store is unreachable or empty. One CRITICAL, one OK.
pub fn fallback_stocks() -> Vec<StockItem> {
    vec![
        StockItem {
            id: "demo-1".to_string(),
            name: "Lait demi-écrémé (Demo)".to_string(),
            category: Category::Food,
            quantity: 1.0,
            unit: "L".to_string(),
            threshold: 2.0,
            status: StockStatus::Critical,
        },
        StockItem {
            id: "demo-2".to_string(),
            name: "Café grains (Demo)".to_string(),
            category: Category::Food,
            quantity: 500.0,
            unit: "g".to_string(),
            threshold: 200.0,
            status: StockStatus::Ok,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_critical_at_zero() {
        assert_eq!(StockStatus::derive(0.0, 2.0), StockStatus::Critical);
        assert_eq!(StockStatus::derive(-1.0, 2.0), StockStatus::Critical);
    }

    #[test]
    fn derive_low_within_threshold() {
        assert_eq!(StockStatus::derive(1.0, 2.0), StockStatus::Low);
        assert_eq!(StockStatus::derive(2.0, 2.0), StockStatus::Low);
    }

    #[test]
    fn derive_ok_above_threshold() {
        assert_eq!(StockStatus::derive(5.0, 2.0), StockStatus::Ok);
    }

    #[test]
    fn derive_nan_quantity_falls_through_to_ok() {
        assert_eq!(StockStatus::derive(f64::NAN, 2.0), StockStatus::Ok);
    }

    #[test]
    fn status_wire_form_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&StockStatus::Critical).unwrap(),
            "\"CRITICAL\""
        );
        let low: StockStatus = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(low, StockStatus::Low);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("hygiene".parse::<Category>().unwrap(), Category::Hygiene);
        assert_eq!("Food".parse::<Category>().unwrap(), Category::Food);
        assert!("fruit".parse::<Category>().is_err());
    }

    #[test]
    fn new_item_stamps_derived_status() {
        let record = NewStockItem::new("Lait", Category::Food, 1.0, "L", 2.0);
        assert_eq!(record.status, StockStatus::Low);

        let item = record.into_item("row-1");
        assert_eq!(item.id, "row-1");
        assert_eq!(item.status, StockStatus::Low);
    }

    #[test]
    fn fallback_has_one_critical_and_one_ok() {
        let rows = fallback_stocks();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, StockStatus::Critical);
        assert_eq!(rows[1].status, StockStatus::Ok);
    }
}
