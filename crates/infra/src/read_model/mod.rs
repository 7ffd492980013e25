//! Tenant-isolated storage: the in-memory registry and history source.

pub mod inventory_store;
pub mod tenant_store;

pub use inventory_store::InMemoryInventoryStore;
pub use tenant_store::{InMemoryTenantStore, TenantStore};
