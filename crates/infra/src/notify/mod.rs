//! Notification channels for tenant alert batches.
//!
//! Delivery transport (e-mail, SMS, push) is an external concern; these
//! adapters cover local runs and tests.

pub mod in_memory;
pub mod tracing_channel;

pub use in_memory::InMemoryNotificationChannel;
pub use tracing_channel::TracingNotificationChannel;
