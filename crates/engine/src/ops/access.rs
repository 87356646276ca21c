use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, cards, cases, customers, disputes, taps, trips};

use super::Engine;

/// Generates a `require_*` lookup that fails with the right error variant
/// when the row does not exist.
macro_rules! impl_require {
    ($require_fn:ident, $module:ident, $err:expr) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| $err(id.to_string()))
        }
    };
}

impl Engine {
    impl_require!(require_card, cards, EngineError::CardNotFound);
    impl_require!(require_customer, customers, EngineError::CustomerNotFound);
    impl_require!(require_trip, trips, EngineError::KeyNotFound);
    impl_require!(require_case, cases, EngineError::KeyNotFound);
    impl_require!(require_tap, taps, EngineError::KeyNotFound);

    pub(super) async fn require_dispute(
        &self,
        db: &DatabaseTransaction,
        id: i32,
    ) -> ResultEngine<disputes::Model> {
        disputes::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("dispute {id}")))
    }
}
