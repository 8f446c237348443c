use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::adapters::cities_sea::CityScope;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::{CityCreate, CityUpdate};
use crate::error::AppError;
use crate::extractors::{RequestMeta, ValidatedJson};
use crate::routes::page;
use crate::services::cities as service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct ListCitiesQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "super::default_limit")]
    limit: i64,
    #[serde(default)]
    include_inactive: bool,
}

/// Single-city lookups hide inactive rows unless asked.
#[derive(Debug, Deserialize)]
struct InactiveQuery {
    #[serde(default)]
    include_inactive: bool,
}

async fn create_city(
    meta: RequestMeta,
    body: ValidatedJson<CityCreate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::CREATED);

    let city = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::create_city(txn, req, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Created().json(city))
}

async fn list_cities(
    query: web::Query<ListCitiesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = page(query.skip, query.limit)?;
    let scope = CityScope {
        include_inactive: query.include_inactive,
        state_id: None,
    };
    let db = require_db(&app_state)?;
    let cities = service::list_cities(db, page, scope).await?;
    Ok(HttpResponse::Ok().json(cities))
}

async fn get_city(
    path: web::Path<i32>,
    query: web::Query<InactiveQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let city = service::get_city(db, path.into_inner(), query.include_inactive).await?;
    Ok(HttpResponse::Ok().json(city))
}

async fn update_city(
    path: web::Path<i32>,
    query: web::Query<InactiveQuery>,
    meta: RequestMeta,
    body: ValidatedJson<CityUpdate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let include_inactive = query.include_inactive;
    let req = body.into_inner().normalize()?;
    let ctx = meta.event_context(StatusCode::OK);

    let city = with_txn(&app_state, |txn| {
        Box::pin(async move {
            Ok(service::update_city(txn, id, req, include_inactive, ctx).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(city))
}

async fn delete_city(
    path: web::Path<i32>,
    query: web::Query<InactiveQuery>,
    meta: RequestMeta,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let include_inactive = query.include_inactive;
    let ctx = meta.event_context(StatusCode::OK);

    let city = with_txn(&app_state, |txn| {
        Box::pin(async move { Ok(service::delete_city(txn, id, include_inactive, ctx).await?) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(city))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::post().to(create_city))
            .route(web::get().to(list_cities)),
    )
    .service(
        web::resource("/{city_id}")
            .route(web::get().to(get_city))
            .route(web::put().to(update_city))
            .route(web::delete().to(delete_city)),
    );
}
