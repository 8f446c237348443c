use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::adapters::Page;
use crate::error::AppError;

pub mod cities;
pub mod countries;
pub mod states;

pub const MAX_LIMIT: i64 = 1000;

/// Register every route plus the query/path error handlers.
///
/// `main.rs` wraps this in the tracing middleware; tests mount it on a bare
/// `App` so endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::invalid(format!("Invalid query: {err}")).into()),
    );
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::invalid(format!("Invalid path: {err}")).into()),
    );

    cfg.route("/", web::get().to(root));
    cfg.service(web::scope("/countries").configure(countries::configure_routes));
    cfg.service(web::scope("/states").configure(states::configure_routes));
    cfg.service(web::scope("/cities").configure(cities::configure_routes));
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "Hello": "World" }))
}

fn default_limit() -> i64 {
    100
}

/// `skip` / `limit` as sent by the client.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl PageQuery {
    pub fn page(&self) -> Result<Page, AppError> {
        page(self.skip, self.limit)
    }
}

/// `skip >= 0` and `1 <= limit <= 1000`, else 422.
pub fn page(skip: i64, limit: i64) -> Result<Page, AppError> {
    let skip = u64::try_from(skip)
        .map_err(|_| AppError::invalid("skip must be greater than or equal to 0"))?;
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::invalid(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(Page {
        skip,
        limit: limit.unsigned_abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_hundred() {
        let query: PageQuery = parse_query("");
        assert_eq!(query.page().unwrap(), Page::default());
    }

    #[test]
    fn bounds_are_enforced() {
        assert!(page(-1, 10).is_err());
        assert!(page(0, 0).is_err());
        assert!(page(0, 1001).is_err());
        assert_eq!(page(5, 1000).unwrap(), Page { skip: 5, limit: 1000 });
    }

    fn parse_query(qs: &str) -> PageQuery {
        web::Query::<PageQuery>::from_query(qs).unwrap().into_inner()
    }
}
