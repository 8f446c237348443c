#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::web;
use backend::entities::{cities, countries, states};
use backend::AppState;
use sea_orm::{DatabaseConnection, MockExecResult};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// `App` with the production route table and trace middleware over `$state`.
macro_rules! test_app {
    (data = $data:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(backend::middleware::RequestTrace)
                .app_data($data)
                .configure(backend::routes::configure),
        )
        .await
    };
    ($state:expr) => {
        test_app!(data = actix_web::web::Data::new($state))
    };
}

/// Everything the mock connection behind `data` has executed so far, as
/// `Debug` text.
pub fn drain_log(data: &web::Data<AppState>) -> String {
    let db = data.db().expect("mock state has a connection");
    // `get_mocker_mutex` is crate-private in sea-orm; drain through a second
    // handle on the same shared mock connection instead.
    let mock = match db {
        DatabaseConnection::MockDatabaseConnection(mock) => mock.clone(),
        _ => panic!("Not mock connection"),
    };
    format!(
        "{:?}",
        DatabaseConnection::MockDatabaseConnection(mock).into_transaction_log()
    )
}

pub fn ok_exec() -> MockExecResult {
    MockExecResult {
        last_insert_id: 1,
        rows_affected: 1,
    }
}

pub fn japan() -> countries::Model {
    countries::Model {
        id: 1,
        name: "Japan".into(),
        code: "JP".into(),
    }
}

pub fn tokyo() -> states::Model {
    states::Model {
        id: 7,
        country_id: 1,
        name: "Tokyo".into(),
        code: "JP-13".into(),
    }
}

pub fn minato(is_active: bool) -> cities::Model {
    cities::Model {
        id: 11,
        state_id: 7,
        name: "Minato".into(),
        code: "131016".into(),
        is_active,
    }
}
