use askama::Template;
use axum::{Extension, Router, response::Html, routing::get};
use http::StatusCode;
use storefront_axum::RequestLocals;

use crate::db::ShopStore;
use crate::errors::IntoResponseError;
use crate::types::Product;

pub(super) fn router() -> Router<()> {
    Router::new().route("/", get(landing))
}

#[derive(Template)]
#[template(path = "landing.j2")]
struct LandingTemplate {
    locals: RequestLocals,
    products: Vec<Product>,
}

async fn landing(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let products = ShopStore::list_products().await.into_response_error()?;

    let template = LandingTemplate { locals, products };
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}
