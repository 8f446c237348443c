use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::{CountryCreate, CountryUpdate};
use crate::error::AppError;
use crate::extractors::{RequestMeta, ValidatedJson};
use crate::routes::PageQuery;
use crate::services::countries as service;
use crate::state::app_state::AppState;

async fn create_country(
    meta: RequestMeta,
    body: ValidatedJson<CountryCreate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::CREATED);

    let country = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::create_country(txn, req, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(country))
}

async fn list_countries(
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page()?;
    let db = require_db(&app_state)?;
    let countries = service::list_countries(db, page).await?;
    Ok(HttpResponse::Ok().json(countries))
}

async fn get_country(
    path: web::Path<i32>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let country = service::get_country(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(country))
}

async fn update_country(
    path: web::Path<i32>,
    meta: RequestMeta,
    body: ValidatedJson<CountryUpdate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::OK);

    let country = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::update_country(txn, id, req, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(country))
}

async fn delete_country(
    path: web::Path<i32>,
    meta: RequestMeta,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let ctx = meta.event_context(StatusCode::OK);

    let country = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::delete_country(txn, id, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(country))
}

async fn list_country_states(
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page()?;
    let db = require_db(&app_state)?;
    let states = service::list_country_states(db, path.into_inner(), page).await?;
    Ok(HttpResponse::Ok().json(states))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::post().to(create_country))
            .route(web::get().to(list_countries)),
    )
    .service(
        web::resource("/{country_id}")
            .route(web::get().to(get_country))
            .route(web::put().to(update_country))
            .route(web::delete().to(delete_country)),
    )
    .service(web::resource("/{country_id}/states").route(web::get().to(list_country_states)));
}
