//! Domain models for the cart service.
//!
//! The persisted types (`Cart`, `CartItem`, `ActivityEntry`) live in
//! [`cart`]; the recomputed-on-every-mutation [`suggestion`] sum type and
//! the enriched response [`view`] types are never persisted in enriched
//! form.

pub mod cart;
pub mod suggestion;
pub mod view;

pub use cart::{ActivityEntry, ActivityKind, Cart, CartItem};
pub use suggestion::Suggestion;
pub use view::{CartItemView, CartView, MemberView};
