/*
 * Responsibility
 * - Router-level middleware (re-exported per concern)
 * - access: the RBAC gate adapter; the rest are transport concerns
 */
pub mod access;
pub mod cors;
pub mod http;
pub mod security_headers;
