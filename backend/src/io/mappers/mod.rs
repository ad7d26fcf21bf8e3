//! Mappers between record store payloads (`shared` DTOs) and validated
//! domain models. Mapping into the domain is the single validation point
//! for records coming from the store.

pub mod expense_mapper;
pub mod inventory_mapper;
pub mod invoice_mapper;

pub use expense_mapper::ExpenseMapper;
pub use inventory_mapper::InventoryMapper;
pub use invoice_mapper::InvoiceMapper;
