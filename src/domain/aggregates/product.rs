//! Product Aggregate
//!
//! The storefront sells exactly one product; `Product::urban_athletics` is the
//! whole catalog.

use serde::Serialize;
use crate::domain::aggregates::cart::NewCartItem;
use crate::domain::value_objects::{Money, Quantity, ShoeSize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    name: String,
    tagline: String,
    price: Money,
    compare_at_price: Money,
    sizes: Vec<ShoeSize>,
    specifications: Vec<String>,
    image: String,
}

impl Product {
    pub fn urban_athletics() -> Self {
        Self {
            name: "Urban Athletics Series".into(),
            tagline: "Where Style Meets Performance".into(),
            price: Money::rupees(3700),
            compare_at_price: Money::rupees(4500),
            sizes: ShoeSize::ALL.to_vec(),
            specifications: [
                "Premium Breathable Mesh Upper",
                "Advanced Cushioning System",
                "Non-Slip Rubber Outsole",
                "Lightweight EVA Midsole",
                "Reinforced Heel Counter",
                "Moisture-Wicking Insole",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            image: "/assets/urban-athletics-shoe.png".into(),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> Money { self.price }
    pub fn compare_at_price(&self) -> Money { self.compare_at_price }
    pub fn sizes(&self) -> &[ShoeSize] { &self.sizes }
    pub fn specifications(&self) -> &[String] { &self.specifications }
    pub fn image(&self) -> &str { &self.image }

    /// Whole-percent saving against the compare-at price, rounded to nearest.
    pub fn discount_percent(&self) -> u64 {
        let was = self.compare_at_price.amount();
        if was == 0 || was <= self.price.amount() { return 0; }
        ((was - self.price.amount()).saturating_mul(100).saturating_add(was / 2)) / was
    }

    /// Builds the cart line for the selected size.
    pub fn line_for(&self, size: Option<ShoeSize>, quantity: Option<Quantity>) -> Result<NewCartItem, ProductError> {
        let size = size.ok_or(ProductError::SizeNotSelected)?;
        if !self.sizes.contains(&size) { return Err(ProductError::SizeUnavailable(size)); }
        Ok(NewCartItem {
            name: self.name.clone(),
            price: self.price,
            size,
            quantity: quantity.unwrap_or(Quantity::ONE),
            image: self.image.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("Please select a size first!")]
    SizeNotSelected,
    #[error("Size EU {0} is not available")]
    SizeUnavailable(ShoeSize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry() {
        let p = Product::urban_athletics();
        assert_eq!(p.name(), "Urban Athletics Series");
        assert_eq!(p.price(), Money::rupees(3700));
        assert_eq!(p.sizes().first(), Some(&ShoeSize::Eu37));
        assert_eq!(p.sizes().last(), Some(&ShoeSize::Eu42));
        assert_eq!(p.specifications().len(), 6);
        assert_eq!(p.discount_percent(), 18);
    }

    #[test]
    fn test_discount_rounds_to_nearest() {
        let priced = |price, was| Product {
            price: Money::rupees(price),
            compare_at_price: Money::rupees(was),
            ..Product::urban_athletics()
        };
        assert_eq!(priced(3700, 4500).discount_percent(), 18);
        assert_eq!(priced(3000, 4000).discount_percent(), 25);
        assert_eq!(priced(995, 1000).discount_percent(), 1);
        assert_eq!(priced(999, 1000).discount_percent(), 0);
        assert_eq!(priced(4500, 4500).discount_percent(), 0);
        assert_eq!(priced(100, 0).discount_percent(), 0);
    }

    #[test]
    fn test_line_requires_size() {
        let p = Product::urban_athletics();
        assert_eq!(p.line_for(None, None), Err(ProductError::SizeNotSelected));
        let line = p.line_for(Some(ShoeSize::Eu40), None).unwrap();
        assert_eq!(line.quantity, Quantity::ONE);
        assert_eq!(line.price, Money::rupees(3700));
        assert_eq!(line.size, ShoeSize::Eu40);
    }
}
