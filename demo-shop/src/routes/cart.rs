use askama::Template;
use axum::{
    Extension, Router,
    extract::{Form, Path},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use http::StatusCode;
use serde::Deserialize;
use storefront_axum::{AuthUser, RequestLocals, Session};

use crate::db::ShopStore;
use crate::errors::IntoResponseError;
use crate::types::CartLine;

pub(super) fn router() -> Router<()> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add/{product_id}", post(add_item))
        .route("/update/{product_id}", post(update_item))
        .route("/remove/{product_id}", post(remove_item))
}

#[derive(Template)]
#[template(path = "cart.j2")]
struct CartTemplate {
    locals: RequestLocals,
    lines: Vec<CartLine>,
    total_display: String,
}

#[derive(Deserialize)]
struct QuantityForm {
    quantity: i64,
}

async fn view_cart(
    user: AuthUser,
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let lines = ShopStore::cart_lines(&user.id).await.into_response_error()?;
    let total: i64 = lines.iter().map(CartLine::line_total_cents).sum();

    let template = CartTemplate {
        locals,
        lines,
        total_display: format!("${}.{:02}", total / 100, total % 100),
    };
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}

async fn add_item(
    user: AuthUser,
    Path(product_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ShopStore::add_to_cart(&user.id, &product_id)
        .await
        .into_response_error()?;
    session.flash_success("Added to your cart").await;
    Ok(Redirect::to("/cart"))
}

async fn update_item(
    user: AuthUser,
    Path(product_id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ShopStore::set_cart_quantity(&user.id, &product_id, form.quantity)
        .await
        .into_response_error()?;
    Ok(Redirect::to("/cart"))
}

async fn remove_item(
    user: AuthUser,
    Path(product_id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ShopStore::remove_from_cart(&user.id, &product_id)
        .await
        .into_response_error()?;
    session.flash_success("Removed from your cart").await;
    Ok(Redirect::to("/cart"))
}
