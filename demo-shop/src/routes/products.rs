use askama::Template;
use axum::{
    Extension, Router,
    extract::{Form, Path},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use http::StatusCode;
use serde::Deserialize;
use storefront_axum::{RequestLocals, Session};

use crate::db::ShopStore;
use crate::errors::{IntoResponseError, ShopError};
use crate::types::Product;

pub(super) fn router() -> Router<()> {
    Router::new()
        .route("/", get(list_products))
        .route("/create", get(new_product_form).post(create_product))
        .route("/{id}/update", get(edit_product_form).post(update_product))
        .route("/{id}/delete", post(delete_product))
}

#[derive(Template)]
#[template(path = "products.j2")]
struct ProductListTemplate {
    locals: RequestLocals,
    products: Vec<Product>,
}

#[derive(Template)]
#[template(path = "product_form.j2")]
struct ProductFormTemplate {
    locals: RequestLocals,
    product: Option<Product>,
}

#[derive(Deserialize)]
struct ProductForm {
    name: String,
    description: String,
    price_cents: i64,
    image_url: Option<String>,
}

async fn list_products(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let products = ShopStore::list_products().await.into_response_error()?;
    render(ProductListTemplate { locals, products })
}

async fn new_product_form(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    render(ProductFormTemplate {
        locals,
        product: None,
    })
}

async fn edit_product_form(
    Path(id): Path<String>,
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let product = ShopStore::get_product(&id)
        .await
        .into_response_error()?
        .ok_or_else(|| not_found(&id))
        .into_response_error()?;

    render(ProductFormTemplate {
        locals,
        product: Some(product),
    })
}

async fn create_product(
    Extension(session): Extension<Session>,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let product = ShopStore::create_product(
        &form.name,
        &form.description,
        form.price_cents,
        form.image_url.as_deref().filter(|s| !s.is_empty()),
    )
    .await
    .into_response_error()?;

    tracing::info!("Created product {}", product.id);
    session.flash_success("Product created").await;
    Ok(Redirect::to("/products"))
}

async fn update_product(
    Path(id): Path<String>,
    Extension(session): Extension<Session>,
    Form(form): Form<ProductForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let updated = ShopStore::update_product(
        &id,
        &form.name,
        &form.description,
        form.price_cents,
        form.image_url.as_deref().filter(|s| !s.is_empty()),
    )
    .await
    .into_response_error()?;

    if !updated {
        return Err::<Redirect, _>(not_found(&id)).into_response_error();
    }

    session.flash_success("Product updated").await;
    Ok(Redirect::to("/products"))
}

async fn delete_product(
    Path(id): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ShopStore::delete_product(&id).await.into_response_error()?;
    session.flash_success("Product deleted").await;
    Ok(Redirect::to("/products"))
}

fn not_found(id: &str) -> ShopError {
    ShopError::ResourceNotFound {
        resource_type: "Product".to_string(),
        resource_id: id.to_string(),
    }
}

fn render<T: Template>(template: T) -> Result<Html<String>, (StatusCode, String)> {
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}
