use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{cards, cases, crm, customers, disputes, payments, reports, taps, trips};
use engine::Engine;

static API_KEY_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-api-key");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub api_key: Arc<str>,
}

/// `TypedHeader` for the POS/CRM shared secret
///
/// Every request must carry an "x-api-key" entry in the header.
#[derive(Debug)]
struct ApiKeyHeader(String);

impl Header for ApiKeyHeader {
    fn name() -> &'static axum::http::HeaderName {
        &API_KEY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(ApiKeyHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-api-key header"),
        }
    }
}

async fn auth(
    api_key: Option<TypedHeader<ApiKeyHeader>>,
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(ApiKeyHeader(key))) = api_key else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if key.is_empty() || key != *state.api_key {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/cards/issue", post(cards::issue))
        .route("/cards", get(cards::list))
        .route("/cards/{card_id}", get(cards::get).delete(cards::delete))
        .route("/cards/{card_id}/balance", get(cards::balance))
        .route("/cards/{card_id}/reload", post(cards::reload))
        .route("/cards/{card_id}/products", post(cards::add_product))
        .route("/cards/{card_id}/status", post(cards::set_status))
        .route("/cards/{card_id}/transactions", get(cards::transactions))
        .route("/payments/simulate", post(payments::simulate))
        .route("/taps/simulate", post(payments::tap))
        .route("/taps", get(taps::list).post(taps::record))
        .route("/taps/{tap_id}", get(taps::get))
        .route("/crm/cards/sync", post(crm::sync_card))
        .route(
            "/crm/customers/{customer_id}/register",
            post(crm::register_card),
        )
        .route("/crm/cards/{card_id}", get(crm::card_status))
        .route("/crm/customers/{customer_id}", get(crm::customer_status))
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{customer_id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/trips", get(trips::list).post(trips::create))
        .route(
            "/trips/{trip_id}",
            get(trips::get).put(trips::update).delete(trips::delete),
        )
        .route("/cases", get(cases::list).post(cases::create))
        .route(
            "/cases/{case_id}",
            get(cases::get).put(cases::update).delete(cases::delete),
        )
        .route("/fare-disputes", get(disputes::list).post(disputes::create))
        .route(
            "/fare-disputes/{dispute_id}",
            get(disputes::get)
                .put(disputes::update)
                .delete(disputes::delete),
        )
        .route("/reports/summary", get(reports::summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, api_key: String) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, api_key, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    api_key: String,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        api_key: api_key.into(),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    api_key: String,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, api_key, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
