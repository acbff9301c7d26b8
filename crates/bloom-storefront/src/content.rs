//! Marketing content served by the API, and the shop's fixed details.

use bloom_commerce::checkout::parse_timestamp;
use bloom_commerce::{Currency, Money};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Who left a testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialKind {
    Shop,
    School,
}

impl TestimonialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestimonialKind::Shop => "shop",
            TestimonialKind::School => "school",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TestimonialKind::Shop => "Shop Customer",
            TestimonialKind::School => "School Student",
        }
    }
}

/// A customer or student review from `/api/testimonials`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub kind: TestimonialKind,
}

impl Testimonial {
    /// Five stars, filled up to the rating.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// Testimonials of one kind, in served order.
pub fn testimonials_of(testimonials: &[Testimonial], kind: TestimonialKind) -> Vec<&Testimonial> {
    testimonials.iter().filter(|t| t.kind == kind).collect()
}

/// A post from `/api/blog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "published_at")]
    pub published_at: Option<String>,
}

impl BlogPost {
    pub fn published(&self) -> Option<NaiveDateTime> {
        self.published_at.as_deref().and_then(parse_timestamp)
    }

    /// Publication date as `March 15, 2025`; empty when unknown.
    pub fn published_label(&self) -> String {
        self.published()
            .map(|at| at.format("%B %-d, %Y").to_string())
            .unwrap_or_default()
    }
}

/// Sort posts newest first. Undated posts go last.
pub fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.published().cmp(&a.published()));
}

/// Discount when enrolling in every course at once, in basis points.
pub const BUNDLE_DISCOUNT_BPS: u32 = 500;
/// Courses needed for the bundle discount.
pub const BUNDLE_MIN_COURSES: usize = 3;

/// A floristry course from `/api/courses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display price, e.g. `75,000`.
    pub price: String,
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl Course {
    /// Fee as money. Thousands separators and the rupee sign are ignored.
    pub fn fee(&self) -> Option<Money> {
        let digits: String = self
            .price
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        Money::parse_decimal(&digits, Currency::INR)
    }

    /// Combined fee for `courses`, with the bundle discount once enough
    /// courses are chosen. `None` if any fee is unreadable.
    pub fn bundle_total(courses: &[Course]) -> Option<Money> {
        let fees = courses.iter().map(Course::fee).collect::<Option<Vec<_>>>()?;
        let total = Money::try_sum(fees.iter(), Currency::INR)?;
        if courses.len() >= BUNDLE_MIN_COURSES {
            total.try_subtract(&total.percentage_bps(BUNDLE_DISCOUNT_BPS)?)
        } else {
            Some(total)
        }
    }
}

/// Postal address of the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioAddress {
    pub street: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub pincode: &'static str,
}

impl StudioAddress {
    pub fn full(&self) -> String {
        format!(
            "{}, {} - {}, {}",
            self.street, self.city, self.pincode, self.state
        )
    }
}

/// How to reach the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone: &'static str,
    pub email: &'static str,
    /// WhatsApp number in international form.
    pub whatsapp: &'static str,
    pub address: StudioAddress,
    pub weekday_hours: &'static str,
    pub weekend_hours: &'static str,
}

impl ContactInfo {
    pub fn hours(&self) -> String {
        format!("{}, {}", self.weekday_hours, self.weekend_hours)
    }

    /// `https://wa.me/<number>` link.
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/{}", self.whatsapp.trim_start_matches('+'))
    }
}

pub const CONTACT_INFO: ContactInfo = ContactInfo {
    phone: "+91 98765 43210",
    email: "hello@bouquetbar.com",
    whatsapp: "+919876543210",
    address: StudioAddress {
        street: "123 Flower Street, Indiranagar",
        city: "Bengaluru",
        state: "Karnataka",
        pincode: "560038",
    },
    weekday_hours: "Mon-Sat: 9AM-8PM",
    weekend_hours: "Sun: 10AM-6PM",
};

/// Facts about the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyInfo {
    pub name: &'static str,
    pub tagline: &'static str,
    pub location: &'static str,
    pub founded_year: u16,
    pub students_count: &'static str,
}

pub const COMPANY_INFO: CompanyInfo = CompanyInfo {
    name: "Bouquet Bar",
    tagline: "Buy Fresh Flowers & Learn Floral Art with Us",
    location: "Bengaluru",
    founded_year: 2020,
    students_count: "500+",
};

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, published_at: Option<&str>) -> BlogPost {
        BlogPost {
            id: id.to_string(),
            title: format!("Post {}", id),
            excerpt: String::new(),
            image: None,
            category: "Tips".to_string(),
            published_at: published_at.map(str::to_string),
        }
    }

    #[test]
    fn test_testimonial_from_api() {
        let json = r#"[
            {"id":"1","name":"Ananya","location":"Koramangala","rating":5,"comment":"Lovely roses","type":"shop"},
            {"id":"2","name":"Rahul","rating":4,"comment":"Great course","type":"school"}
        ]"#;
        let list: Vec<Testimonial> = serde_json::from_str(json).unwrap();
        assert_eq!(list[1].stars(), "★★★★☆");
        assert_eq!(list[1].kind.display_name(), "School Student");

        let shop = testimonials_of(&list, TestimonialKind::Shop);
        assert_eq!(shop.len(), 1);
        assert_eq!(shop[0].name, "Ananya");
    }

    #[test]
    fn test_blog_newest_first() {
        let mut posts = vec![
            post("old", Some("2024-01-10T08:00:00Z")),
            post("undated", None),
            post("new", Some("2025-03-15")),
        ];
        sort_newest_first(&mut posts);
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
        assert_eq!(posts[0].published_label(), "March 15, 2025");
        assert_eq!(posts[2].published_label(), "");
    }

    #[test]
    fn test_course_fee_and_bundle() {
        let course = |id: &str| Course {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            price: "75,000".to_string(),
            duration: "4 weeks".to_string(),
            features: Vec::new(),
            popular: false,
        };
        assert_eq!(course("a").fee(), Some(Money::inr(75_000)));

        let two = [course("a"), course("b")];
        assert_eq!(Course::bundle_total(&two), Some(Money::inr(150_000)));

        let three = [course("a"), course("b"), course("c")];
        assert_eq!(Course::bundle_total(&three), Some(Money::inr(213_750)));
    }

    #[test]
    fn test_contact_details() {
        assert_eq!(CONTACT_INFO.whatsapp_link(), "https://wa.me/919876543210");
        assert_eq!(CONTACT_INFO.hours(), "Mon-Sat: 9AM-8PM, Sun: 10AM-6PM");
        assert_eq!(
            CONTACT_INFO.address.full(),
            "123 Flower Street, Indiranagar, Bengaluru - 560038, Karnataka"
        );
        assert_eq!(COMPANY_INFO.founded_year, 2020);
    }
}
