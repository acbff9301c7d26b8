//! Shop filters.
//!
//! Products carry no structured flower type, arrangement, occasion or colour
//! attributes, so those facets match case-insensitively against the
//! product's name, category and description. An empty facet list matches
//! everything.

use crate::catalog::{FlowerCategory, Product};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Filter state for the shop listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    pub category: FlowerCategory,
    /// Inclusive lower bound.
    pub min_price: Option<Money>,
    /// Inclusive upper bound.
    pub max_price: Option<Money>,
    pub flower_types: Vec<String>,
    pub arrangements: Vec<String>,
    pub occasions: Vec<String>,
    pub colors: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: FlowerCategory) -> Self {
        self.category = category;
        self
    }

    pub fn price_range(mut self, min: Money, max: Money) -> Self {
        self.min_price = Some(min);
        self.max_price = Some(max);
        self
    }

    pub fn flower_type(mut self, value: impl Into<String>) -> Self {
        self.flower_types.push(value.into());
        self
    }

    pub fn arrangement(mut self, value: impl Into<String>) -> Self {
        self.arrangements.push(value.into());
        self
    }

    pub fn occasion(mut self, value: impl Into<String>) -> Self {
        self.occasions.push(value.into());
        self
    }

    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.colors.push(value.into());
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Whether any filter beyond the defaults is set.
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Check whether a single product passes every facet.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.category.includes(&product.category) {
            return false;
        }
        if self.in_stock && !product.in_stock {
            return false;
        }
        if self.featured && !product.featured {
            return false;
        }
        if let Some(min) = self.min_price {
            if product.price.amount_cents < min.amount_cents {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price.amount_cents > max.amount_cents {
                return false;
            }
        }

        let haystack = format!(
            "{} {} {}",
            product.name, product.category, product.description
        )
        .to_lowercase();

        [
            &self.flower_types,
            &self.arrangements,
            &self.occasions,
            &self.colors,
        ]
        .into_iter()
        .all(|facet| facet_matches(facet, &haystack))
    }

    /// Filter a product list, preserving order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

fn facet_matches(terms: &[String], haystack: &str) -> bool {
    terms.is_empty()
        || terms
            .iter()
            .any(|term| haystack.contains(&term.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "Red Rose Bouquet", Money::inr(1299))
                .with_category("roses")
                .with_description("Romantic anniversary bunch")
                .with_featured(true),
            Product::new("2", "White Orchid Pot", Money::inr(899))
                .with_category("orchids")
                .with_stock(false),
            Product::new("3", "Pink Bridal Basket", Money::inr(2499))
                .with_category("wedding")
                .with_description("Basket arrangement in blush pink"),
        ]
    }

    #[test]
    fn test_default_filter_matches_all() {
        let products = catalog();
        assert!(!ProductFilter::new().is_active());
        assert_eq!(ProductFilter::new().apply(&products).len(), 3);
    }

    #[test]
    fn test_category_and_stock() {
        let products = catalog();
        let orchids = ProductFilter::new().category(FlowerCategory::Orchids);
        assert_eq!(orchids.apply(&products).len(), 1);
        assert!(orchids.clone().in_stock_only().apply(&products).is_empty());
    }

    #[test]
    fn test_price_range_inclusive() {
        let products = catalog();
        let filter = ProductFilter::new().price_range(Money::inr(899), Money::inr(1299));
        let ids: Vec<_> = filter.apply(&products).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_text_facets() {
        let products = catalog();
        let filter = ProductFilter::new().color("Pink").arrangement("basket");
        let matched = filter.apply(&products);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.as_str(), "3");

        let anniversary = ProductFilter::new().occasion("anniversary").featured_only();
        assert_eq!(anniversary.apply(&products).len(), 1);
    }
}
