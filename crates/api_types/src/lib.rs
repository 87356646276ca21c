//! Wire types shared by the server and its clients.
//!
//! All monetary amounts travel as integer minor units (`*_minor` fields).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Bank,
    AccountBased,
    ClosedLoop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Active,
    Expired,
    Suspended,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapDirection {
    Entry,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapOutcome {
    Success,
    Failure,
    InsufficientBalance,
    Timeout,
}

/// Offset/limit query parameters for list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub customer_id: Option<String>,
}

fn default_limit() -> u64 {
    100
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
            customer_id: None,
        }
    }
}

pub mod envelope {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AckStatus {
        Success,
        Error,
    }

    /// Response envelope for the POS and CRM integration endpoints. Every
    /// response carries a fresh transaction id so external callers can
    /// correlate their logs with ours.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Envelope<T> {
        pub status: AckStatus,
        pub timestamp: DateTime<Utc>,
        pub transaction_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub robot_run_id: Option<String>,
        pub message: String,
        pub data: T,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub email: String,
        pub phone: String,
        pub notifications: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CustomerUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub notifications: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: String,
        pub name: String,
        pub email: String,
        pub phone: String,
        pub notifications: String,
        pub join_date: DateTime<Utc>,
    }
}

pub mod card {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardIssue {
        /// Physical serial, if the card carries one. Omit to have an id
        /// allocated.
        pub card_id: Option<String>,
        pub card_type: CardType,
        pub customer_id: String,
        pub issue_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub initial_balance_minor: i64,
        pub product: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardView {
        pub id: String,
        pub card_type: CardType,
        pub status: CardStatus,
        pub balance_minor: i64,
        pub product: Option<String>,
        pub issue_date: DateTime<Utc>,
        pub customer_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub card_id: String,
        pub balance_minor: i64,
        pub status: CardStatus,
        pub card_type: CardType,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Reload {
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReloadReceiptView {
        pub card_id: String,
        pub amount_minor: i64,
        pub previous_balance_minor: i64,
        pub new_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductAdd {
        pub product: String,
        /// Stored value bundled with the product, credited when positive.
        #[serde(default)]
        pub value_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusSet {
        pub status: CardStatus,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentSimulate {
        pub card_id: String,
        pub amount_minor: i64,
        pub method: String,
    }

    /// A declined payment is a normal response, not an HTTP error; the two
    /// outcomes are tagged so clients cannot confuse them.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "result", rename_all = "snake_case")]
    pub enum PaymentResult {
        Approved {
            card_id: String,
            new_balance_minor: i64,
            method: String,
        },
        Declined {
            card_id: String,
            current_balance_minor: i64,
            required_minor: i64,
        },
    }
}

pub mod tap {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TapSimulate {
        pub card_id: String,
        pub location: String,
        pub device_id: String,
        pub transit_mode: String,
        pub direction: TapDirection,
    }

    /// Manual tap-history insertion, e.g. a reader batch upload.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TapRecord {
        pub customer_id: String,
        pub tap_time: DateTime<Utc>,
        pub location: String,
        pub device_id: String,
        pub transit_mode: String,
        pub direction: TapDirection,
        pub outcome: TapOutcome,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TapView {
        pub id: String,
        pub tap_time: DateTime<Utc>,
        pub location: String,
        pub device_id: String,
        pub transit_mode: String,
        pub direction: TapDirection,
        pub customer_id: String,
        pub outcome: TapOutcome,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TapReceiptView {
        pub tap: TapView,
        pub card_id: String,
        pub remaining_balance_minor: i64,
    }
}

pub mod trip {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub id: Option<String>,
        pub card_id: String,
        pub start_time: DateTime<Utc>,
        pub end_time: DateTime<Utc>,
        pub entry_location: String,
        pub exit_location: String,
        pub fare_minor: i64,
        pub route: String,
        pub operator: String,
        pub transit_mode: String,
        #[serde(default)]
        pub adjustable: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripUpdate {
        pub start_time: Option<DateTime<Utc>>,
        pub end_time: Option<DateTime<Utc>>,
        pub entry_location: Option<String>,
        pub exit_location: Option<String>,
        pub fare_minor: Option<i64>,
        pub route: Option<String>,
        pub operator: Option<String>,
        pub transit_mode: Option<String>,
        pub adjustable: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: String,
        pub start_time: DateTime<Utc>,
        pub end_time: DateTime<Utc>,
        pub entry_location: String,
        pub exit_location: String,
        pub fare_minor: i64,
        pub route: String,
        pub operator: String,
        pub transit_mode: String,
        pub adjustable: bool,
        pub card_id: String,
    }

    /// Trip and tap activity for one card.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardTransactionsView {
        pub card_id: String,
        pub card_balance_minor: i64,
        pub trips: Vec<TripView>,
        pub tap_history: Vec<super::tap::TapView>,
    }
}

pub mod case {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CaseNew {
        pub customer_id: String,
        pub card_id: Option<String>,
        pub case_status: String,
        pub priority: String,
        pub category: String,
        pub assigned_agent: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CaseUpdate {
        pub case_status: Option<String>,
        pub priority: Option<String>,
        pub category: Option<String>,
        pub assigned_agent: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CaseView {
        pub id: String,
        pub created_date: DateTime<Utc>,
        pub last_updated: DateTime<Utc>,
        pub customer_id: String,
        pub card_id: Option<String>,
        pub case_status: String,
        pub priority: String,
        pub category: String,
        pub assigned_agent: String,
        pub notes: Option<String>,
    }
}

pub mod dispute {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DisputeNew {
        pub card_id: String,
        pub trip_id: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub dispute_type: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DisputeUpdate {
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub dispute_type: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DisputeView {
        pub id: i32,
        pub dispute_date: DateTime<Utc>,
        pub card_id: String,
        pub trip_id: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub dispute_type: String,
    }
}

pub mod crm {
    use super::*;

    /// CRM-originated card mutation. Unknown actions are acknowledged as
    /// plain syncs rather than rejected.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardSync {
        pub card_id: String,
        pub action: String,
        pub amount_minor: Option<i64>,
        pub product: Option<String>,
        pub robot_run_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerRegister {
        pub card_id: String,
        pub robot_run_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CrmCardView {
        #[serde(flatten)]
        pub card: super::card::CardView,
        pub customer_name: Option<String>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_cards: i64,
        pub total_customers: i64,
        pub total_trips: i64,
        pub total_cases: i64,
        pub total_tap_entries: i64,
        pub total_balance_minor: i64,
        pub generated_at: DateTime<Utc>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_result_is_tagged() {
        let declined = payment::PaymentResult::Declined {
            card_id: "CD001".to_string(),
            current_balance_minor: 100,
            required_minor: 750,
        };
        let json = serde_json::to_value(&declined).unwrap();
        assert_eq!(json["result"], "declined");
        assert_eq!(json["required_minor"], 750);
    }

    #[test]
    fn list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 100);
        assert_eq!(query.customer_id, None);
    }

    #[test]
    fn card_issue_balance_defaults_to_zero() {
        let issue: card::CardIssue = serde_json::from_str(
            r#"{"card_type": "closed_loop", "customer_id": "C001"}"#,
        )
        .unwrap();
        assert_eq!(issue.initial_balance_minor, 0);
        assert_eq!(issue.card_id, None);
    }
}
