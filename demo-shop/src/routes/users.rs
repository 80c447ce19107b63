use askama::Template;
use axum::{
    Extension, Router,
    extract::Form,
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use http::StatusCode;
use serde::Deserialize;
use storefront::SessionUser;
use storefront_axum::{AuthUser, RequestLocals, Session};

use crate::db::ShopStore;
use crate::errors::IntoResponseError;
use crate::password;

pub(super) fn router() -> Router<()> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/profile", get(profile))
}

#[derive(Template)]
#[template(path = "signup.j2")]
struct SignupTemplate {
    locals: RequestLocals,
}

#[derive(Template)]
#[template(path = "login.j2")]
struct LoginTemplate {
    locals: RequestLocals,
}

#[derive(Template)]
#[template(path = "profile.j2")]
struct ProfileTemplate {
    locals: RequestLocals,
    user: AuthUser,
}

#[derive(Deserialize)]
struct SignupForm {
    email: String,
    name: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn signup_form(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    render(SignupTemplate { locals })
}

async fn signup(
    Extension(session): Extension<Session>,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if form.email.is_empty() || form.password.is_empty() {
        session
            .flash_error("Email and password are required")
            .await;
        return Ok(Redirect::to("/users/signup"));
    }

    if ShopStore::get_user_by_email(&form.email)
        .await
        .into_response_error()?
        .is_some()
    {
        session
            .flash_error("An account with that email already exists")
            .await;
        return Ok(Redirect::to("/users/signup"));
    }

    let hash = password::hash_password(&form.password).into_response_error()?;
    let user = ShopStore::create_user(&form.email, &form.name, &hash)
        .await
        .into_response_error()?;

    tracing::info!("Created account {} for {}", user.id, user.email);
    session
        .flash_success("Your account has been created. Please log in")
        .await;
    Ok(Redirect::to("/users/login"))
}

async fn login_form(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    render(LoginTemplate { locals })
}

async fn login(
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = ShopStore::get_user_by_email(&form.email)
        .await
        .into_response_error()?;

    // Same flash for a missing account and a wrong password
    let Some(user) = user else {
        session.flash_error("Invalid email or password").await;
        return Ok(Redirect::to("/users/login"));
    };

    let verified =
        password::verify_password(&form.password, &user.password_hash).into_response_error()?;
    if !verified {
        tracing::debug!("Password verification failed for {}", user.email);
        session.flash_error("Invalid email or password").await;
        return Ok(Redirect::to("/users/login"));
    }

    session
        .set_user(SessionUser {
            id: user.id,
            email: user.email,
            name: user.name,
        })
        .await;
    session.flash_success("You are now logged in").await;
    Ok(Redirect::to("/landing"))
}

async fn logout(Extension(session): Extension<Session>) -> impl IntoResponse {
    session.clear_user().await;
    session.flash_success("You have been logged out").await;
    Redirect::to("/users/login")
}

async fn profile(
    user: AuthUser,
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    render(ProfileTemplate { locals, user })
}

fn render<T: Template>(template: T) -> Result<Html<String>, (StatusCode, String)> {
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}
