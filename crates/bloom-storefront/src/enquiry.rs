//! Custom bouquet requests, course enrollment and landing-page sign-ups.

use bloom_commerce::validate::{char_len, is_indian_mobile, is_valid_email};
use bloom_commerce::FieldErrors;
use serde::{Deserialize, Serialize};

/// Occasion a custom bouquet is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Birthday,
    Anniversary,
    Wedding,
    Corporate,
    Other,
}

impl Occasion {
    pub const ALL: [Occasion; 5] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Wedding,
        Occasion::Corporate,
        Occasion::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Anniversary => "anniversary",
            Occasion::Wedding => "wedding",
            Occasion::Corporate => "corporate",
            Occasion::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Occasion::Birthday => "Birthday",
            Occasion::Anniversary => "Anniversary",
            Occasion::Wedding => "Wedding",
            Occasion::Corporate => "Corporate Event",
            Occasion::Other => "Other",
        }
    }
}

/// An upcoming class batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub value: &'static str,
    pub label: &'static str,
}

pub const BATCH_OPTIONS: [Batch; 3] = [
    Batch {
        value: "march-15-morning",
        label: "March 15, 2024 - Morning",
    },
    Batch {
        value: "march-20-evening",
        label: "March 20, 2024 - Evening",
    },
    Batch {
        value: "march-25-weekend",
        label: "March 25, 2024 - Weekend",
    },
];

pub fn find_batch(value: &str) -> Option<&'static Batch> {
    BATCH_OPTIONS.iter().find(|b| b.value == value.trim())
}

/// Toast shown after an enquiry is sent or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ORDER_REQUEST_SENT: Notice = Notice {
    title: "Order Request Sent!",
    description: "We'll contact you soon to confirm your flower order.",
};

pub const ORDER_REQUEST_FAILED: Notice = Notice {
    title: "Error",
    description: "Failed to send order request. Please try again.",
};

pub const ENROLLMENT_SENT: Notice = Notice {
    title: "Enrollment Request Sent!",
    description: "We'll contact you soon with course details and batch information.",
};

pub const ENROLLMENT_FAILED: Notice = Notice {
    title: "Error",
    description: "Failed to send enrollment request. Please try again.",
};

fn check_name(errors: &mut FieldErrors, field: &str, value: &str) {
    if char_len(value) < 2 {
        errors.add(field, "Name must be at least 2 characters");
    }
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(value) {
        errors.add("email", "Please enter a valid email address");
    }
}

fn check_phone(errors: &mut FieldErrors, value: &str) {
    let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if !is_indian_mobile(&compact) {
        errors.add("phone", "Please enter a valid phone number");
    }
}

/// "Design your own bouquet" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomBouquetForm {
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub occasion: String,
    pub requirements: String,
}

/// Body posted to `/api/orders` for a custom bouquet: an order with no
/// items and a zero total that the shop prices later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBouquetRequest {
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub occasion: Occasion,
    pub requirements: String,
    pub items: Vec<serde_json::Value>,
    pub total: String,
}

impl CustomBouquetForm {
    pub fn validate(&self) -> Result<CustomBouquetRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, "customerName", &self.customer_name);
        check_phone(&mut errors, &self.phone);
        check_email(&mut errors, &self.email);
        let occasion = Occasion::from_str(&self.occasion);
        if occasion.is_none() {
            errors.add("occasion", "Please select an occasion");
        }
        if self.requirements.trim().is_empty() {
            errors.add("requirements", "Please describe your requirements");
        }
        errors.into_result()?;

        Ok(CustomBouquetRequest {
            customer_name: self.customer_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            occasion: occasion.unwrap_or(Occasion::Other),
            requirements: self.requirements.trim().to_string(),
            items: Vec::new(),
            total: "0.00".to_string(),
        })
    }
}

/// Course enrollment form, also the body of `POST /api/enrollments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub course_id: String,
    pub batch: String,
    pub questions: String,
}

impl EnrollmentForm {
    /// Check the form and return a trimmed copy to send.
    pub fn validate(&self) -> Result<EnrollmentForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, "fullName", &self.full_name);
        check_email(&mut errors, &self.email);
        check_phone(&mut errors, &self.phone);
        if self.course_id.trim().is_empty() {
            errors.add("courseId", "Please select a course");
        }
        if find_batch(&self.batch).is_none() {
            errors.add("batch", "Please select a batch");
        }
        errors.into_result()?;

        Ok(EnrollmentForm {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            course_id: self.course_id.trim().to_string(),
            batch: self.batch.trim().to_string(),
            questions: self.questions.trim().to_string(),
        })
    }
}

/// Landing-page call-back request, body of `POST /api/landing/contact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, "name", &self.name);
        check_phone(&mut errors, &self.phone);
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}

/// Newsletter sign-up, body of `POST /api/landing/email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
}

impl NewsletterSignup {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}
