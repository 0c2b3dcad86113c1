//! Database operations for the `repair_shops` table.

mod read;
mod types;
mod write;

pub use read::{count_repair_shops, keep_alive, list_repair_shops};
pub use types::RepairShopRow;
pub use write::insert_repair_shops;
