/*
 * Responsibility
 * - Handlers per area; routing decides who can reach them (the gate),
 *   handlers only enforce ownership and shape
 */
pub mod admin;
pub mod health;
pub mod lecturer;
pub mod pages;
pub mod student;
pub mod webhooks;
