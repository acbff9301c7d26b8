//! Checkout wizard and order review.

use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Cart review.
    Cart,
    /// Address and delivery option.
    Shipping,
    /// Payment method.
    Payment,
    /// Final confirmation.
    Review,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Cart,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart Review",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Order Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Review your items",
            CheckoutStep::Shipping => "Address & delivery",
            CheckoutStep::Payment => "Payment method",
            CheckoutStep::Review => "Final confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => Some(CheckoutStep::Shipping),
            CheckoutStep::Shipping => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => None,
        }
    }

    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => None,
            CheckoutStep::Shipping => Some(CheckoutStep::Cart),
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
        }
    }
}

/// What the checkout currently has, as seen by the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub has_items: bool,
    pub has_shipping_address: bool,
    pub has_delivery_option: bool,
    pub payment_valid: bool,
}

impl Readiness {
    /// Review messages for everything missing, in display order.
    pub fn missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if !self.has_items {
            missing.push("Cart is empty".to_string());
        }
        if !self.has_shipping_address {
            missing.push("Shipping address not selected".to_string());
        }
        if !self.has_delivery_option {
            missing.push("Delivery option not selected".to_string());
        }
        if !self.payment_valid {
            missing.push("Payment information incomplete".to_string());
        }
        missing
    }

    /// What must be present before leaving `step`.
    fn missing_to_leave(&self, step: CheckoutStep) -> Vec<String> {
        let upto = Readiness {
            has_items: self.has_items,
            has_shipping_address: self.has_shipping_address || step < CheckoutStep::Shipping,
            has_delivery_option: self.has_delivery_option || step < CheckoutStep::Shipping,
            payment_valid: self.payment_valid || step < CheckoutStep::Payment,
        };
        upto.missing()
    }
}

/// Per-step status on the progress header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// Checkout wizard state: cart → shipping → payment → review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFlow {
    pub step: CheckoutStep,
    pub completed_steps: Vec<CheckoutStep>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Cart,
            completed_steps: Vec::new(),
        }
    }

    /// Advance to the next step if the current one is satisfied.
    pub fn advance(&mut self, readiness: &Readiness) -> Result<CheckoutStep, CommerceError> {
        let next = self
            .step
            .next()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;

        let missing = readiness.missing_to_leave(self.step);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing));
        }

        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        self.step = next;
        Ok(next)
    }

    /// Go back to the previous step.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = self
            .step
            .previous()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;
        self.step = prev;
        Ok(prev)
    }

    /// Whether a step on the progress header can be clicked.
    pub fn is_clickable(&self, step: CheckoutStep) -> bool {
        step == self.step || self.completed_steps.contains(&step)
    }

    /// Jump to a completed step or stay on the current one.
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CommerceError> {
        if self.is_clickable(step) {
            self.step = step;
            Ok(())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            })
        }
    }

    pub fn status_of(&self, step: CheckoutStep) -> StepStatus {
        if self.completed_steps.contains(&step) {
            StepStatus::Completed
        } else if step == self.step {
            StepStatus::Current
        } else {
            StepStatus::Upcoming
        }
    }

    /// Forget completed steps from `step` onward, e.g. after the cart
    /// empties or the address is cleared.
    pub fn invalidate_from(&mut self, step: CheckoutStep) {
        self.completed_steps.retain(|s| *s < step);
        if self.step > step {
            self.step = step;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Confirmation checkboxes on the review page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConsent {
    pub accept_terms: bool,
    pub accept_privacy: bool,
    pub confirm_order: bool,
}

impl ReviewConsent {
    pub fn all_given() -> Self {
        Self {
            accept_terms: true,
            accept_privacy: true,
            confirm_order: true,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.accept_terms && self.accept_privacy && self.confirm_order
    }
}

/// Review-page validation, in display order.
pub fn validation_errors(readiness: &Readiness) -> Vec<String> {
    readiness.missing()
}

/// The place-order button is enabled only with no validation errors, every
/// consent given and no placement in flight.
pub fn can_place_order(readiness: &Readiness, consent: &ReviewConsent, placing: bool) -> bool {
    validation_errors(readiness).is_empty() && consent.is_complete() && !placing
}
