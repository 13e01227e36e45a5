//! Login, registration and logout handlers.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::middleware::{OptionalAuth, SESSION_COOKIE_NAME};
use super::store::Credentials;
use crate::api::{self, ApiError};
use crate::domain::TokenResponse;
use crate::config;
use crate::filters;
use crate::handlers::NavContext;
use crate::session::generate_session_id;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: NavContext,
    pub error: Option<String>,
    pub email: String,
}

impl LoginTemplate {
    fn render_with(error: Option<&str>, email: &str) -> Html<String> {
        let template = LoginTemplate {
            nav: NavContext::anonymous(),
            error: error.map(str::to_string),
            email: email.to_string(),
        };
        Html(template.render().unwrap_or_default())
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub nav: NavContext,
    pub error: Option<String>,
    pub email: String,
    pub full_name: String,
}

impl RegisterTemplate {
    fn render_with(error: Option<&str>, form: &RegisterForm) -> Html<String> {
        let template = RegisterTemplate {
            nav: NavContext::anonymous(),
            error: error.map(str::to_string),
            email: form.email.trim().to_string(),
            full_name: form.full_name.trim().to_string(),
        };
        Html(template.render().unwrap_or_default())
    }
}

#[derive(Deserialize, Default)]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Passwords shorter than this are refused before reaching the backend
const MIN_PASSWORD_LEN: usize = 6;

impl RegisterForm {
    fn validate(&self) -> Result<(), &'static str> {
        if self.full_name.trim().is_empty() {
            return Err("Please enter your name");
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("Please enter a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        Ok(())
    }
}

/// Remember the tokens under a fresh session id and hand the browser its cookie
fn start_login(state: &AppState, jar: CookieJar, tokens: TokenResponse) -> Response {
    let session_id = generate_session_id();
    state.tokens.insert(&session_id, Credentials::new(tokens));

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(config::AUTH_COOKIE_HOURS))
        .build();

    (jar.add(session_cookie), Redirect::to("/")).into_response()
}

/// GET /login - Show login page
pub async fn login_page(OptionalAuth(auth): OptionalAuth) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate::render_with(None, "").into_response()
}

/// POST /login - Log in against the backend
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return LoginTemplate::render_with(Some("Email and password are required"), email)
            .into_response();
    }

    let tokens = match api::auth::login(&state.api, email, &form.password).await {
        Ok(tokens) => tokens,
        Err(ApiError::Unauthorized) => {
            return LoginTemplate::render_with(Some("Invalid email or password"), email)
                .into_response();
        }
        Err(ApiError::Status { status, .. }) if status.is_client_error() => {
            return LoginTemplate::render_with(Some("Invalid email or password"), email)
                .into_response();
        }
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", email, e);
            return LoginTemplate::render_with(Some(e.user_message()), email).into_response();
        }
    };

    tracing::info!("User {} logged in", email);
    start_login(&state, jar, tokens)
}

/// GET /register - Show the sign-up page
pub async fn register_page(OptionalAuth(auth): OptionalAuth) -> Response {
    if auth.is_some() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate::render_with(None, &RegisterForm::default()).into_response()
}

/// POST /register - Create an account and log straight in
pub async fn register_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(message) = form.validate() {
        return RegisterTemplate::render_with(Some(message), &form).into_response();
    }

    let email = form.email.trim();
    let full_name = form.full_name.trim();
    let tokens = match api::auth::register(&state.api, email, &form.password, full_name).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!("Registration failed for {}: {}", email, e);
            let message = e.detail().unwrap_or_else(|| e.user_message().to_string());
            return RegisterTemplate::render_with(Some(&message), &form).into_response();
        }
    };

    tracing::info!("Registered new user {}", email);
    start_login(&state, jar, tokens)
}

/// POST /logout - Forget the tokens and clear the cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE_NAME) {
        state.tokens.remove(session_cookie.value());
    }

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(session_cookie), Redirect::to("/login"))
}
