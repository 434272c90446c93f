/*
 * Responsibility
 * - Service layer (no axum types in here)
 * - access: the RBAC gate decision logic
 * - session / content: external collaborator clients
 */
pub mod access;
pub mod content;
pub mod session;
pub mod webhook;
