use serde::{Deserialize, Serialize};

use super::Product;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
    #[error("Only {stock} of {product} left in stock, cannot have {requested}")]
    QuantityExceedsStock {
        product: String,
        requested: u32,
        stock: u32,
    },
    #[error("Product {0} is not in the cart")]
    NotInCart(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| &*i.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units in the cart
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total price in pence. Items whose product is no longer in `products`
    /// do not count.
    pub fn total(&self, products: &[Product]) -> u64 {
        self.items
            .iter()
            .filter_map(|item| {
                products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|p| p.price * item.quantity as u64)
            })
            .sum()
    }

    /// Add `quantity` units of `product`, on top of what is already in the cart
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        let current = self.item(&product.id).map(|i| i.quantity).unwrap_or(0);
        let requested = current.saturating_add(quantity);
        check_stock(product, requested)?;

        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity = requested,
            None => self.items.push(CartItem {
                product_id: product.id.clone(),
                quantity: requested,
            }),
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> Result<(), CartError> {
        let len = self.items.len();
        self.items.retain(|i| &*i.product_id != product_id);
        if self.items.len() == len {
            return Err(CartError::NotInCart(product_id.into()));
        }
        Ok(())
    }

    pub fn update_quantity(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        check_stock(product, quantity)?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id)
            .ok_or_else(|| CartError::NotInCart(product.id.clone()))?;
        item.quantity = quantity;
        Ok(())
    }
}

fn check_stock(product: &Product, requested: u32) -> Result<(), CartError> {
    if requested > product.stock {
        return Err(CartError::QuantityExceedsStock {
            product: product.name.clone(),
            requested,
            stock: product.stock,
        });
    }
    Ok(())
}
