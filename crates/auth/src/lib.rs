//! `carestock-auth`: school-scope access control at the API boundary.
//!
//! Decoupled from HTTP and storage. The forecasting engine never re-checks
//! authorization; it trusts the tenant id it is handed.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, StockAction, authorize_network, authorize_school};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::{Principal, PrincipalId};
pub use roles::SchoolRole;
