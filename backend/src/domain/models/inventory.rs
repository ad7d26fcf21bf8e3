use rust_decimal::Decimal;
use serde::Serialize;
use shared::StockStatus;

use super::money::{checked_mul, ensure_non_negative};
use crate::domain::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    id: String,
    item_name: String,
    quantity: u32,
    min_stock_level: u32,
    unit_price: Decimal,
    category: String,
}

fn count(field: &str, value: i64) -> EngineResult<u32> {
    u32::try_from(value).map_err(|_| EngineError::invalid(field, format!("{} is not a valid count", value)))
}

impl InventoryItem {
    pub fn new(
        id: impl Into<String>,
        item_name: impl Into<String>,
        quantity: i64,
        min_stock_level: i64,
        unit_price: Decimal,
        category: impl Into<String>,
    ) -> EngineResult<Self> {
        let quantity = count("quantity", quantity)?;
        let unit_price = ensure_non_negative("unitPrice", unit_price)?;
        checked_mul("unitPrice", Decimal::from(quantity), unit_price)?;

        Ok(Self {
            id: id.into(),
            item_name: item_name.into(),
            quantity,
            min_stock_level: count("minStockLevel", min_stock_level)?,
            unit_price,
            category: category.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn min_stock_level(&self) -> u32 {
        self.min_stock_level
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.quantity, self.min_stock_level)
    }

    /// quantity × unit price, which construction guarantees fits
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}
