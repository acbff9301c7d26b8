//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Shop category a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlowerCategory {
    /// No category filter.
    #[default]
    All,
    Roses,
    Orchids,
    Wedding,
    Gifts,
    Seasonal,
}

impl FlowerCategory {
    pub const ALL: [FlowerCategory; 6] = [
        FlowerCategory::All,
        FlowerCategory::Roses,
        FlowerCategory::Orchids,
        FlowerCategory::Wedding,
        FlowerCategory::Gifts,
        FlowerCategory::Seasonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowerCategory::All => "all",
            FlowerCategory::Roses => "roses",
            FlowerCategory::Orchids => "orchids",
            FlowerCategory::Wedding => "wedding",
            FlowerCategory::Gifts => "gifts",
            FlowerCategory::Seasonal => "seasonal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlowerCategory::All => "All",
            FlowerCategory::Roses => "Roses",
            FlowerCategory::Orchids => "Orchids",
            FlowerCategory::Wedding => "Wedding",
            FlowerCategory::Gifts => "Gifts",
            FlowerCategory::Seasonal => "Seasonal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(FlowerCategory::All),
            "roses" => Some(FlowerCategory::Roses),
            "orchids" => Some(FlowerCategory::Orchids),
            "wedding" => Some(FlowerCategory::Wedding),
            "gifts" => Some(FlowerCategory::Gifts),
            "seasonal" => Some(FlowerCategory::Seasonal),
            _ => None,
        }
    }

    /// Whether a product's free-form category string falls under this one.
    pub fn includes(&self, category: &str) -> bool {
        match self {
            FlowerCategory::All => true,
            other => category.trim().eq_ignore_ascii_case(other.as_str()),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    /// Primary image first, then the gallery images.
    pub images: Vec<String>,
    /// Free-form category string as stored by the backend.
    pub category: String,
    pub in_stock: bool,
    pub featured: bool,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            images: Vec::new(),
            category: String::new(),
            in_stock: true,
            featured: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// The image shown on product cards and in the cart.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Check if the product can be added to a cart.
    pub fn is_available(&self) -> bool {
        self.in_stock && !self.price.is_negative()
    }
}

/// Price as sent by the API: either a JSON number or a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WirePrice {
    Text(String),
    Number(f64),
}

impl WirePrice {
    pub fn to_money(&self, currency: Currency) -> Option<Money> {
        match self {
            WirePrice::Text(s) => Money::parse_decimal(s, currency),
            WirePrice::Number(n) if n.is_finite() => {
                let minor = (n * 10_f64.powi(currency.decimal_places() as i32)).round();
                Some(Money::new(minor as i64, currency))
            }
            WirePrice::Number(_) => None,
        }
    }
}

/// The product shape served by `/api/products`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: WirePrice,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "imagefirst")]
    pub image_first: Option<String>,
    #[serde(default, rename = "imagesecond")]
    pub image_second: Option<String>,
    #[serde(default, rename = "imagethirder")]
    pub image_third: Option<String>,
    #[serde(default, rename = "imagefoure")]
    pub image_fourth: Option<String>,
    #[serde(default, rename = "imagefive")]
    pub image_fifth: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_true() -> bool {
    true
}

impl TryFrom<ProductRecord> for Product {
    type Error = CommerceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let price = record.price.to_money(Currency::INR).ok_or_else(|| {
            CommerceError::ValidationError(format!("invalid price for product {}", record.id))
        })?;
        let images = [
            record.image,
            record.image_first,
            record.image_second,
            record.image_third,
            record.image_fourth,
            record.image_fifth,
        ]
        .into_iter()
        .flatten()
        .filter(|url| !url.trim().is_empty())
        .collect();

        Ok(Product {
            id: ProductId::new(record.id),
            name: record.name,
            description: record.description,
            price,
            images,
            category: record.category,
            in_stock: record.in_stock,
            featured: record.featured,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        let mut images = product.images.into_iter();
        ProductRecord {
            id: product.id.into_inner(),
            name: product.name,
            description: product.description,
            price: WirePrice::Text(product.price.to_decimal_string()),
            image: images.next(),
            image_first: images.next(),
            image_second: images.next(),
            image_third: images.next(),
            image_fourth: images.next(),
            image_fifth: images.next(),
            category: product.category,
            in_stock: product.in_stock,
            featured: product.featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{
            "id": "12",
            "name": "Red Rose Bouquet",
            "description": "A dozen long-stem roses",
            "price": "1299.00",
            "image": "/img/rose.jpg",
            "imagefirst": "/img/rose-1.jpg",
            "imagesecond": "",
            "category": "Roses",
            "inStock": true,
            "featured": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "12");
        assert_eq!(product.price, Money::inr(1299));
        assert_eq!(product.images, vec!["/img/rose.jpg", "/img/rose-1.jpg"]);
        assert_eq!(product.primary_image(), Some("/img/rose.jpg"));
        assert!(product.featured);
    }

    #[test]
    fn test_product_numeric_price() {
        let json = r#"{"id":"3","name":"Orchid","price":849.5,"category":"orchids"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.amount_cents, 84950);
        assert!(product.in_stock);
    }

    #[test]
    fn test_product_bad_price_rejected() {
        let json = r#"{"id":"3","name":"Orchid","price":"12.345"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_product_serializes_in_wire_shape() {
        let product = Product::new("7", "Tulips", Money::inr(499)).with_image("/t.jpg");
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], "499.00");
        assert_eq!(value["image"], "/t.jpg");
        assert_eq!(value["inStock"], true);
    }

    #[test]
    fn test_category_matching() {
        assert!(FlowerCategory::All.includes("anything"));
        assert!(FlowerCategory::Roses.includes("Roses"));
        assert!(!FlowerCategory::Orchids.includes("roses"));
        assert_eq!(FlowerCategory::from_str("Wedding"), Some(FlowerCategory::Wedding));
    }

    #[test]
    fn test_out_of_stock_unavailable() {
        let product = Product::new("1", "Lily", Money::inr(300)).with_stock(false);
        assert!(!product.is_available());
    }
}
