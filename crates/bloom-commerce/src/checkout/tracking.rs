//! Order tracking data and its view model.

use crate::checkout::OrderStatus;
use crate::ids::OrderId;
use crate::money::{Currency, Money};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Order fields served with tracking data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOrder {
    pub id: OrderId,
    pub order_number: String,
    /// Raw status string; unknown values are shown verbatim.
    pub status: String,
    pub total: String,
    pub created_at: String,
    #[serde(default)]
    pub status_updated_at: Option<String>,
    #[serde(default)]
    pub estimated_delivery_date: Option<String>,
    #[serde(default)]
    pub points_awarded: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: String,
    pub order_id: OrderId,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStep {
    /// Label, e.g. "Order Placed".
    pub step: String,
    pub status: String,
    pub completed: bool,
}

/// Response of `/api/orders/{id}/tracking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    pub order: TrackedOrder,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(default)]
    pub progress_steps: Vec<ProgressStep>,
    #[serde(default)]
    pub can_cancel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

impl StepState {
    /// Badge text on the timeline.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            StepState::Completed => Some("Complete"),
            StepState::Current => Some("In Progress"),
            StepState::Upcoming => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryLine {
    pub status: String,
    /// `MMM dd, yyyy at h:mm a`
    pub when: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStep {
    pub label: String,
    pub state: StepState,
    /// History entries for completed steps only.
    pub history: Vec<HistoryLine>,
}

/// Everything the tracking page shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingView {
    pub title: String,
    pub status: Option<OrderStatus>,
    /// Label of the matching progress step, falling back to the raw status.
    pub status_label: String,
    pub total: String,
    /// "Estimated Delivery" or "Order Date".
    pub date_caption: &'static str,
    /// `MMM dd, yyyy`
    pub date: String,
    pub points_note: Option<String>,
    pub timeline: Vec<TimelineStep>,
    /// Newest first.
    pub history: Vec<HistoryLine>,
    pub can_cancel: bool,
}

impl TrackingData {
    /// Build the view model.
    pub fn view(&self) -> TrackingView {
        let order = &self.order;
        let status_label = self
            .progress_steps
            .iter()
            .find(|s| s.status == order.status)
            .map(|s| s.step.clone())
            .unwrap_or_else(|| order.status.clone());

        let total = Money::parse_decimal(&order.total, Currency::INR)
            .map(|m| m.display())
            .unwrap_or_else(|| "N/A".to_string());

        let (date_caption, date_source) = match &order.estimated_delivery_date {
            Some(date) => ("Estimated Delivery", date.as_str()),
            None => ("Order Date", order.created_at.as_str()),
        };

        let points_note = order
            .points_awarded
            .filter(|p| *p > 0)
            .map(|p| format!("You earned {} reward points from this order!", p));

        let timeline = self
            .progress_steps
            .iter()
            .map(|step| {
                let state = if step.completed {
                    StepState::Completed
                } else if step.status == order.status {
                    StepState::Current
                } else {
                    StepState::Upcoming
                };
                let history = if step.completed {
                    self.status_history
                        .iter()
                        .filter(|h| h.status == step.status)
                        .map(history_line)
                        .collect()
                } else {
                    Vec::new()
                };
                TimelineStep {
                    label: step.step.clone(),
                    state,
                    history,
                }
            })
            .collect();

        let mut entries: Vec<&StatusHistoryEntry> = self.status_history.iter().collect();
        entries.sort_by_key(|h| std::cmp::Reverse(parse_timestamp(&h.created_at)));

        TrackingView {
            title: format!("Order {}", order.order_number),
            status: OrderStatus::from_str(&order.status),
            status_label,
            total,
            date_caption,
            date: format_date(date_source),
            points_note,
            timeline,
            history: entries.into_iter().map(history_line).collect(),
            can_cancel: self.can_cancel,
        }
    }
}

fn history_line(entry: &StatusHistoryEntry) -> HistoryLine {
    HistoryLine {
        status: entry.status.clone(),
        when: format_date_time(&entry.created_at),
        notes: entry.notes.clone().filter(|n| !n.trim().is_empty()),
    }
}

/// Parse an ISO 8601 date or date-time as sent by the API.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `Feb 15, 2025`; the raw input when it cannot be parsed.
pub fn format_date(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| input.to_string())
}

/// `Feb 15, 2025 at 3:05 PM`
pub fn format_date_time(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%b %d, %Y at %-I:%M %p").to_string())
        .unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrackingData {
        serde_json::from_str(
            r#"{
                "order": {
                    "id": "42",
                    "orderNumber": "BB-0042",
                    "status": "shipped",
                    "total": "123456.50",
                    "createdAt": "2025-02-10T09:30:00Z",
                    "estimatedDeliveryDate": "2025-02-15",
                    "pointsAwarded": 120
                },
                "statusHistory": [
                    {"id": "h1", "orderId": "42", "status": "pending", "createdAt": "2025-02-10T09:30:00Z"},
                    {"id": "h2", "orderId": "42", "status": "confirmed", "notes": "Payment verified", "createdAt": "2025-02-10T15:05:00Z"}
                ],
                "progressSteps": [
                    {"step": "Order Placed", "status": "pending", "completed": true},
                    {"step": "Confirmed", "status": "confirmed", "completed": true},
                    {"step": "Out for Delivery", "status": "shipped", "completed": false},
                    {"step": "Delivered", "status": "delivered", "completed": false}
                ],
                "canCancel": false
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_view_headline() {
        let view = sample().view();
        assert_eq!(view.title, "Order BB-0042");
        assert_eq!(view.status, Some(OrderStatus::Shipped));
        assert_eq!(view.status_label, "Out for Delivery");
        assert_eq!(view.total, "\u{20b9}1,23,456.5");
        assert_eq!(view.date_caption, "Estimated Delivery");
        assert_eq!(view.date, "Feb 15, 2025");
        assert_eq!(
            view.points_note.as_deref(),
            Some("You earned 120 reward points from this order!")
        );
        assert!(!view.can_cancel);
    }

    #[test]
    fn test_timeline_states() {
        let view = sample().view();
        let states: Vec<StepState> = view.timeline.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Current,
                StepState::Upcoming
            ]
        );
        assert_eq!(view.timeline[1].history.len(), 1);
        assert_eq!(view.timeline[1].history[0].when, "Feb 10, 2025 at 3:05 PM");
        assert!(view.timeline[2].history.is_empty());
    }

    #[test]
    fn test_history_newest_first() {
        let view = sample().view();
        assert_eq!(view.history[0].status, "confirmed");
        assert_eq!(view.history[0].notes.as_deref(), Some("Payment verified"));
        assert_eq!(view.history[1].status, "pending");
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let mut data = sample();
        data.order.status = "on_hold".to_string();
        data.order.estimated_delivery_date = None;
        data.order.points_awarded = Some(0);
        let view = data.view();
        assert_eq!(view.status, None);
        assert_eq!(view.status_label, "on_hold");
        assert_eq!(view.date_caption, "Order Date");
        assert_eq!(view.date, "Feb 10, 2025");
        assert!(view.points_note.is_none());
    }
}
