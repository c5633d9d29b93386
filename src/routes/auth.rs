use crate::{
    config::Config,
    error::{AppError, AppResult},
    forms::{FormErrors, LoginForm, RegisterForm},
    routes::{render, render_with, HOME_URL},
    services,
    types::DbPool,
    utils::{redirect, Identity, USER_ID},
};
use actix_session::Session;
use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use serde_json::json;

const TEMPLATE: &str = "base/login_register.html";
const REGISTRATION_FAILED: &str = "An error has occurred during registration";

fn sign_in(session: &Session, user_id: &str) -> AppResult<()> {
    session.renew();
    session.insert(USER_ID, user_id)?;
    Ok(())
}

#[get("/login")]
pub async fn login_page(identity: Option<Identity>) -> HttpResponse {
    if identity.is_some() {
        return redirect(HOME_URL);
    }

    render(
        TEMPLATE,
        json!({
            "page": "login",
            "form": LoginForm::default(),
            "messages": [],
        }),
    )
}

#[post("/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    identity: Option<Identity>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    if identity.is_some() {
        return Ok(redirect(HOME_URL));
    }

    let LoginForm { username, password } = form.into_inner();

    let result = {
        let username = username.clone();
        services::run(&pool, move |conn| {
            services::users::authenticate(conn, &username, &password)
        })
        .await
    };

    match result {
        Ok(user) => {
            sign_in(&session, &user.id)?;
            log::info!("user {} signed in", user.username);
            Ok(redirect(HOME_URL))
        }
        Err(AppError::Authentication(message)) => Ok(render_with(
            StatusCode::UNAUTHORIZED,
            TEMPLATE,
            json!({
                "page": "login",
                "form": LoginForm { username, password: String::new() },
                "messages": [message],
            }),
        )),
        Err(err) => Err(err),
    }
}

#[get("/logout")]
pub async fn logout(session: Session) -> HttpResponse {
    if let Some(identity) = Identity::from_session(&session) {
        log::info!("user {} signed out", identity.user_id);
    }
    session.purge();

    redirect(HOME_URL)
}

fn registration_failed(form: &RegisterForm, errors: FormErrors) -> HttpResponse {
    render_with(
        StatusCode::UNPROCESSABLE_ENTITY,
        TEMPLATE,
        json!({
            "page": "register",
            "form": form,
            "errors": errors,
            "messages": [REGISTRATION_FAILED],
        }),
    )
}

#[get("/register")]
pub async fn register_page() -> HttpResponse {
    render(
        TEMPLATE,
        json!({
            "page": "register",
            "form": RegisterForm::default(),
            "errors": FormErrors::default(),
            "messages": [],
        }),
    )
}

#[post("/register")]
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let new_user = match form.validate() {
        Ok(new_user) => new_user,
        Err(errors) => return Ok(registration_failed(&form, errors)),
    };

    let cost = config.bcrypt_cost;
    let result = services::run(&pool, move |conn| {
        services::users::register(conn, &new_user, cost)
    })
    .await;

    match result {
        Ok(user) => {
            sign_in(&session, &user.id)?;
            Ok(redirect(HOME_URL))
        }
        Err(AppError::Invalid(errors)) => Ok(registration_failed(&form, errors)),
        Err(err) => Err(err),
    }
}
