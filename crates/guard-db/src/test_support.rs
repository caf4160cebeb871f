//! Shared test utilities for guard-db unit tests.

pub(crate) mod helpers {
    use guard_core::entities::{CloudAccount, Policy};
    use guard_core::enums::Provider;

    use crate::GuardDb;
    use crate::inputs::{AccountCreate, PolicyCreate};
    use crate::service::GuardService;

    /// Create an in-memory `GuardService`.
    pub async fn test_service() -> GuardService {
        let db = GuardDb::open_local(":memory:").await.unwrap();
        GuardService::from_db(db)
    }

    pub async fn seed_policy(svc: &GuardService, provider: Provider, control_id: &str) -> Policy {
        svc.create_policy(PolicyCreate::new(
            provider,
            format!("Control {control_id}"),
            control_id,
            "Identity",
        ))
        .await
        .unwrap()
    }

    pub async fn seed_account(
        svc: &GuardService,
        provider: Provider,
        external_id: &str,
    ) -> CloudAccount {
        svc.create_account(AccountCreate::new(
            provider,
            external_id,
            format!("Account {external_id}"),
        ))
        .await
        .unwrap()
    }

    /// Row count of `table`, read directly.
    pub async fn count_rows(svc: &GuardService, table: &str) -> i64 {
        let conn = svc.db().conn().await;
        let mut rows = conn
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }
}
