use shared::{InventoryRecord, RawAmount};

use crate::domain::errors::EngineResult;
use crate::domain::models::money::parse_money;
use crate::domain::models::InventoryItem;

pub struct InventoryMapper;

impl InventoryMapper {
    pub fn to_domain(record: &InventoryRecord) -> EngineResult<InventoryItem> {
        InventoryItem::new(
            record.id.clone(),
            record.item_name.clone(),
            record.quantity,
            record.min_stock_level,
            parse_money("unitPrice", &record.unit_price)?,
            record.category.clone(),
        )
    }

    pub fn to_domain_all(records: &[InventoryRecord]) -> EngineResult<Vec<InventoryItem>> {
        records.iter().map(Self::to_domain).collect()
    }

    pub fn to_dto(item: &InventoryItem) -> InventoryRecord {
        InventoryRecord {
            id: item.id().to_string(),
            item_name: item.item_name().to_string(),
            quantity: i64::from(item.quantity()),
            min_stock_level: i64::from(item.min_stock_level()),
            unit_price: RawAmount::Text(item.unit_price().to_string()),
            category: item.category().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::EngineError;
    use shared::StockStatus;

    #[test]
    fn test_to_domain_and_back() {
        let record = InventoryRecord {
            id: "3".to_string(),
            item_name: "A4 paper".to_string(),
            quantity: 0,
            min_stock_level: 5,
            unit_price: RawAmount::from("4.99"),
            category: "Stationery".to_string(),
        };

        let item = InventoryMapper::to_domain(&record).unwrap();
        assert_eq!(item.stock_status(), StockStatus::OutOfStock);
        assert_eq!(InventoryMapper::to_dto(&item), record);
    }

    #[test]
    fn test_negative_quantity_is_invalid() {
        let record = InventoryRecord {
            id: "4".to_string(),
            item_name: "Toner".to_string(),
            quantity: -2,
            min_stock_level: 1,
            unit_price: RawAmount::from("80"),
            category: "Stationery".to_string(),
        };
        let err = InventoryMapper::to_domain(&record).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "quantity"));
    }
}
