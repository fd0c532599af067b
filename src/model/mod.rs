mod cart;
mod product;

pub use cart::{Cart, CartError, CartItem};
pub use product::{default_catalog, Product};
