/*
 * Responsibility
 * - Request/response DTOs per area
 * - DTOs carry validate() (shape checks only; policy stays in handlers)
 */
pub mod assignments;
pub mod metadata;
pub mod submissions;
pub mod users;
pub mod webhooks;
