/*
 * Responsibility
 * - Resolve the caller's identity from the identity provider's session token
 * - The resolver never fails: anything ambiguous resolves to Anonymous
 */
pub mod resolver;

pub use resolver::{Identity, JwtSessionResolver, SessionResolver};
