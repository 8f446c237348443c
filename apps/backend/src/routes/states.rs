use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::{StateCreate, StateUpdate};
use crate::error::AppError;
use crate::extractors::{RequestMeta, ValidatedJson};
use crate::routes::page;
use crate::services::states as service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct ListStatesQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "super::default_limit")]
    limit: i64,
    country_id: Option<i32>,
}

async fn create_state(
    meta: RequestMeta,
    body: ValidatedJson<StateCreate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::CREATED);

    let state = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::create_state(txn, req, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(state))
}

async fn list_states(
    query: web::Query<ListStatesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = page(query.skip, query.limit)?;
    let db = require_db(&app_state)?;
    let states = service::list_states(db, page, query.country_id).await?;
    Ok(HttpResponse::Ok().json(states))
}

async fn get_state(
    path: web::Path<i32>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let state = service::get_state(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(state))
}

async fn update_state(
    path: web::Path<i32>,
    meta: RequestMeta,
    body: ValidatedJson<StateUpdate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::OK);

    let state = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::update_state(txn, id, req, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(state))
}

async fn delete_state(
    path: web::Path<i32>,
    meta: RequestMeta,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let ctx = meta.event_context(StatusCode::OK);

    let state = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::delete_state(txn, id, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(state))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::post().to(create_state))
            .route(web::get().to(list_states)),
    )
    .service(
        web::resource("/{state_id}")
            .route(web::get().to(get_state))
            .route(web::put().to(update_state))
            .route(web::delete().to(delete_state)),
    );
}
