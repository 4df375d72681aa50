//! Core type definitions.
//!
//! All types here are plain data with serde support - no behavior beyond
//! construction and accessors.

pub mod id;
pub mod product;

pub use id::{CartId, ItemId, ProductId, SuggestionId, UserId};
pub use product::Product;
