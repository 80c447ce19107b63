mod cart;
mod checkout;
mod cloudinary;
mod landing;
mod products;
mod users;

use axum::{Router, middleware::from_fn, response::Redirect, routing::get};
use storefront_axum::require_login;

/// Assemble the full application router and run it through the shared
/// request pipeline. The payment webhook is the only route that skips CSRF
/// verification; it authenticates with a gateway signature instead.
pub(crate) fn router() -> Router {
    let protected = Router::new()
        .route("/", get(|| async { Redirect::to("/landing") }))
        .nest("/landing", landing::router())
        .nest("/products", products::router())
        .nest("/users", users::router())
        .nest("/cloudinary", cloudinary::router())
        .nest("/cart", cart::router().layer(from_fn(require_login)))
        .nest("/checkout", checkout::router());

    let exempt = Router::new().nest("/checkout", checkout::webhook_router());

    storefront_axum::apply(protected, exempt)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode, header::LOCATION};
    use tower::ServiceExt;

    use crate::test_utils::init_test_environment;

    #[tokio::test]
    #[serial_test::serial]
    async fn test_root_redirects_to_landing() {
        init_test_environment().await;
        let app = super::router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/landing");
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_landing_page_renders() {
        init_test_environment().await;
        let app = super::router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/landing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
