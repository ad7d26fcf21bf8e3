pub mod dates;
pub mod expense;
pub mod inventory;
pub mod invoice;
pub mod money;

pub use expense::{Expense, NewExpense};
pub use inventory::InventoryItem;
pub use invoice::{Invoice, InvoiceItem, NewInvoice, StoredTotals};
pub use money::{format_money, format_net_gst, round2};
