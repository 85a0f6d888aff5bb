//! Inventory domain models: materials, categories, movements and the snapshot root.

pub mod category;
pub mod material;
pub mod snapshot;
pub mod transaction;

pub use category::Category;
pub use material::{Material, NewMaterial};
pub use snapshot::{
    SiteInfo, Snapshot, CURRENT_SCHEMA_VERSION, GENERAL_MATERIALS, PAINT_MATERIALS,
};
pub use transaction::{Movement, Transaction, TransactionKind};
