//! Inventory data model for the stock watchdog.
//!
//! Records are owned by external workflows (registry, requisitions); the only
//! fields written by this system are the derived forecast fields on
//! [`InventoryItem`].

pub mod category;
pub mod item;
pub mod record;
pub mod school;
pub mod urgency;

pub use category::Category;
pub use item::{ForecastUpdate, InventoryItem};
pub use record::{ConsumptionRecord, RequisitionStatus};
pub use school::School;
pub use urgency::{DaysRemaining, Urgency};
