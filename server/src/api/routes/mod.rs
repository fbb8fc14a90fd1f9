//! API route handlers

pub mod health;
pub mod reports;
pub mod stats;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::data::UploadRepository;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::upload::tests::{insert_raw_for, setup_test_pool};

    /// SQLite-backed repository holding `(username, shift, created_at)` rows
    ///
    /// Each row's user id is its username.
    pub(crate) async fn seeded_repository(
        rows: &[(&str, Option<&str>, &str)],
    ) -> Arc<dyn UploadRepository> {
        let pool = setup_test_pool().await;
        for (i, (username, shift, created_at)) in rows.iter().enumerate() {
            let id = format!("up-{}", i);
            insert_raw_for(&pool, &id, Some(username), username, *shift, created_at).await;
        }
        Arc::new(Arc::new(SqliteService::from_pool(pool)))
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub(crate) fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Drive one request through the router and decode the JSON body
    pub(crate) async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
