//! Per-method payment data and validation.

use crate::error::FieldErrors;
use crate::money::Money;
use crate::payment::{
    CardDetails, NetBankingDetails, PaymentError, PaymentMethod, QrCodeDetails, UpiDetails,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodDetails {
    pub confirmed: bool,
}

impl CodDetails {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.confirmed {
            errors.add("confirmed", "Please confirm COD payment");
        }
        errors.into_result()
    }
}

/// Inputs that validation depends on besides the form itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentContext {
    /// Date used for card expiry checks.
    pub today: NaiveDate,
    /// Final amount of the order, for the QR code amount check.
    pub order_total: Money,
}

/// Validated-shape payment data for one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "data")]
pub enum PaymentDetails {
    #[serde(rename = "card")]
    Card(CardDetails),
    #[serde(rename = "upi")]
    Upi(UpiDetails),
    #[serde(rename = "netbanking")]
    NetBanking(NetBankingDetails),
    #[serde(rename = "cod")]
    CashOnDelivery(CodDetails),
    #[serde(rename = "qrcode")]
    QrCode(QrCodeDetails),
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::Card(_) => PaymentMethod::Card,
            PaymentDetails::Upi(_) => PaymentMethod::Upi,
            PaymentDetails::NetBanking(_) => PaymentMethod::NetBanking,
            PaymentDetails::CashOnDelivery(_) => PaymentMethod::CashOnDelivery,
            PaymentDetails::QrCode(_) => PaymentMethod::QrCode,
        }
    }

    /// Run the method's own rules.
    pub fn validate(&self, ctx: &PaymentContext) -> Result<(), PaymentError> {
        let result = match self {
            PaymentDetails::Card(card) => card.validate(ctx.today),
            PaymentDetails::Upi(upi) => upi.validate(),
            PaymentDetails::NetBanking(bank) => bank.validate(),
            PaymentDetails::CashOnDelivery(cod) => cod.validate(),
            PaymentDetails::QrCode(qr) => qr.validate(ctx.order_total),
        };
        result.map_err(|errors| PaymentError::Invalid {
            method: self.method(),
            errors,
        })
    }

    /// Summary safe to show and to send with the order.
    pub fn masked_summary(&self) -> String {
        match self {
            PaymentDetails::Card(card) => card.masked_summary(),
            PaymentDetails::Upi(upi) => upi.masked_summary(),
            PaymentDetails::NetBanking(bank) => bank.masked_summary(),
            PaymentDetails::CashOnDelivery(_) => "Cash on Delivery".to_string(),
            PaymentDetails::QrCode(qr) => qr.masked_summary(),
        }
    }
}

/// Payment form state across all methods.
///
/// Each method keeps its own slot so switching back and forth does not
/// discard what was typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentData {
    pub selected_method: Option<PaymentMethod>,
    pub card_data: Option<CardDetails>,
    pub upi_data: Option<UpiDetails>,
    pub netbanking_data: Option<NetBankingDetails>,
    pub cod_data: Option<CodDetails>,
    pub qrcode_data: Option<QrCodeDetails>,
}

impl PaymentData {
    pub fn select(&mut self, method: PaymentMethod) {
        self.selected_method = Some(method);
    }

    /// Store details in their method's slot and select that method.
    pub fn update(&mut self, details: PaymentDetails) {
        self.selected_method = Some(details.method());
        match details {
            PaymentDetails::Card(d) => self.card_data = Some(d),
            PaymentDetails::Upi(d) => self.upi_data = Some(d),
            PaymentDetails::NetBanking(d) => self.netbanking_data = Some(d),
            PaymentDetails::CashOnDelivery(d) => self.cod_data = Some(d),
            PaymentDetails::QrCode(d) => self.qrcode_data = Some(d),
        }
    }

    /// Details for the selected method, if that form has been filled in.
    pub fn selected_details(&self) -> Option<PaymentDetails> {
        match self.selected_method? {
            PaymentMethod::Card => self.card_data.clone().map(PaymentDetails::Card),
            PaymentMethod::Upi => self.upi_data.clone().map(PaymentDetails::Upi),
            PaymentMethod::NetBanking => {
                self.netbanking_data.clone().map(PaymentDetails::NetBanking)
            }
            PaymentMethod::CashOnDelivery => self.cod_data.map(PaymentDetails::CashOnDelivery),
            PaymentMethod::QrCode => self.qrcode_data.clone().map(PaymentDetails::QrCode),
        }
    }

    /// Validate the selected method's details.
    pub fn validate(&self, ctx: &PaymentContext) -> Result<PaymentDetails, PaymentError> {
        let method = self.selected_method.ok_or(PaymentError::NoMethodSelected)?;
        let details = self
            .selected_details()
            .ok_or(PaymentError::MissingDetails(method))?;
        details.validate(ctx)?;
        Ok(details)
    }

    pub fn is_valid(&self, ctx: &PaymentContext) -> bool {
        self.validate(ctx).is_ok()
    }

    /// Surcharge of the selected method, zero when none is selected.
    pub fn charge(&self, cod_fee: Money) -> Money {
        match self.selected_method {
            Some(method) => method.fee(cod_fee),
            None => Money::zero(cod_fee.currency),
        }
    }

    /// Display name of the selected method, "Not Selected" otherwise.
    pub fn method_name(&self) -> &'static str {
        self.selected_method
            .map_or("Not Selected", |m| m.display_name())
    }

    /// Masked description of the selected method's details.
    pub fn masked_summary(&self) -> String {
        match (self.selected_method, self.selected_details()) {
            (None, _) => "No payment method selected".to_string(),
            (Some(_), Some(details)) => details.masked_summary(),
            (Some(method), None) => method.display_name().to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
