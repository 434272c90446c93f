//! Role-based access control for the dashboard area.
//!
//! Split into three pieces so the decision itself stays a pure function:
//! - [`route`]: classify a request path against the protected prefixes
//! - [`role`]: the closed role enumeration
//! - [`decision`]: the per-request access decision procedure
//!
//! The axum adapter that turns a [`decision::Decision`] into an actual
//! redirect lives in `middleware::access`, not here.

pub mod decision;
pub mod role;
pub mod route;

pub use decision::{Decision, Grant, decide};
pub use role::Role;
pub use route::{RouteClass, classify};
