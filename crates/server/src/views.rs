//! Conversions between engine types and wire views.

use api_types::{CardStatus, CardType, TapDirection, TapOutcome};
use api_types::{card, case, customer, dispute, report, tap, trip};

pub fn card_type_to_engine(value: CardType) -> engine::CardType {
    match value {
        CardType::Bank => engine::CardType::Bank,
        CardType::AccountBased => engine::CardType::AccountBased,
        CardType::ClosedLoop => engine::CardType::ClosedLoop,
    }
}

fn card_type_view(value: engine::CardType) -> CardType {
    match value {
        engine::CardType::Bank => CardType::Bank,
        engine::CardType::AccountBased => CardType::AccountBased,
        engine::CardType::ClosedLoop => CardType::ClosedLoop,
    }
}

pub fn card_status_to_engine(value: CardStatus) -> engine::CardStatus {
    match value {
        CardStatus::Active => engine::CardStatus::Active,
        CardStatus::Expired => engine::CardStatus::Expired,
        CardStatus::Suspended => engine::CardStatus::Suspended,
        CardStatus::Blocked => engine::CardStatus::Blocked,
    }
}

fn card_status_view(value: engine::CardStatus) -> CardStatus {
    match value {
        engine::CardStatus::Active => CardStatus::Active,
        engine::CardStatus::Expired => CardStatus::Expired,
        engine::CardStatus::Suspended => CardStatus::Suspended,
        engine::CardStatus::Blocked => CardStatus::Blocked,
    }
}

pub fn tap_direction_to_engine(value: TapDirection) -> engine::TapDirection {
    match value {
        TapDirection::Entry => engine::TapDirection::Entry,
        TapDirection::Exit => engine::TapDirection::Exit,
    }
}

fn tap_direction_view(value: engine::TapDirection) -> TapDirection {
    match value {
        engine::TapDirection::Entry => TapDirection::Entry,
        engine::TapDirection::Exit => TapDirection::Exit,
    }
}

pub fn tap_outcome_to_engine(value: TapOutcome) -> engine::TapOutcome {
    match value {
        TapOutcome::Success => engine::TapOutcome::Success,
        TapOutcome::Failure => engine::TapOutcome::Failure,
        TapOutcome::InsufficientBalance => engine::TapOutcome::InsufficientBalance,
        TapOutcome::Timeout => engine::TapOutcome::Timeout,
    }
}

fn tap_outcome_view(value: engine::TapOutcome) -> TapOutcome {
    match value {
        engine::TapOutcome::Success => TapOutcome::Success,
        engine::TapOutcome::Failure => TapOutcome::Failure,
        engine::TapOutcome::InsufficientBalance => TapOutcome::InsufficientBalance,
        engine::TapOutcome::Timeout => TapOutcome::Timeout,
    }
}

pub fn card_view(card: engine::Card) -> card::CardView {
    card::CardView {
        id: card.id,
        card_type: card_type_view(card.card_type),
        status: card_status_view(card.status),
        balance_minor: card.balance.cents(),
        product: card.product,
        issue_date: card.issue_date,
        customer_id: card.customer_id,
    }
}

pub fn balance_view(card: engine::Card) -> card::BalanceView {
    card::BalanceView {
        card_id: card.id,
        balance_minor: card.balance.cents(),
        status: card_status_view(card.status),
        card_type: card_type_view(card.card_type),
    }
}

pub fn customer_view(customer: engine::Customer) -> customer::CustomerView {
    customer::CustomerView {
        id: customer.id,
        name: customer.name,
        email: customer.email,
        phone: customer.phone,
        notifications: customer.notifications,
        join_date: customer.join_date,
    }
}

pub fn trip_view(value: engine::Trip) -> trip::TripView {
    trip::TripView {
        id: value.id,
        start_time: value.start_time,
        end_time: value.end_time,
        entry_location: value.entry_location,
        exit_location: value.exit_location,
        fare_minor: value.fare.cents(),
        route: value.route,
        operator: value.operator,
        transit_mode: value.transit_mode,
        adjustable: value.adjustable,
        card_id: value.card_id,
    }
}

pub fn tap_view(value: engine::Tap) -> tap::TapView {
    tap::TapView {
        id: value.id,
        tap_time: value.tap_time,
        location: value.location,
        device_id: value.device_id,
        transit_mode: value.transit_mode,
        direction: tap_direction_view(value.direction),
        customer_id: value.customer_id,
        outcome: tap_outcome_view(value.outcome),
    }
}

pub fn case_view(value: engine::Case) -> case::CaseView {
    case::CaseView {
        id: value.id,
        created_date: value.created_date,
        last_updated: value.last_updated,
        customer_id: value.customer_id,
        card_id: value.card_id,
        case_status: value.case_status,
        priority: value.priority,
        category: value.category,
        assigned_agent: value.assigned_agent,
        notes: value.notes,
    }
}

pub fn dispute_view(value: engine::FareDispute) -> dispute::DisputeView {
    dispute::DisputeView {
        id: value.id,
        dispute_date: value.dispute_date,
        card_id: value.card_id,
        trip_id: value.trip_id,
        amount_minor: value.amount.cents(),
        description: value.description,
        dispute_type: value.dispute_type,
    }
}

pub fn summary_view(value: engine::SummaryReport) -> report::SummaryView {
    report::SummaryView {
        total_cards: value.total_cards,
        total_customers: value.total_customers,
        total_trips: value.total_trips,
        total_cases: value.total_cases,
        total_tap_entries: value.total_tap_entries,
        total_balance_minor: value.total_balance.cents(),
        generated_at: value.generated_at,
    }
}
