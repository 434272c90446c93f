/*
 * Responsibility
 * - Client for the headless content/document store (holds all portal data)
 * - client: the trait + wire types, http: the reqwest implementation
 */
pub mod client;
pub mod http;

pub use client::{AssetKind, AssetRef, ContentError, ContentResult, ContentStore, Mutation};
pub use http::HttpContentStore;
