use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_FILTER: &str = "info,actix_web=info,sqlx=warn,sea_orm=warn";

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` sets the base level for the
/// default directives.
pub fn filter_directives(rust_log: Option<&str>, log_level: Option<&str>) -> String {
    if let Some(directives) = rust_log.filter(|s| !s.trim().is_empty()) {
        return directives.to_string();
    }
    match log_level.map(str::trim).filter(|s| !s.is_empty()) {
        Some(level) => format!(
            "{},actix_web=info,sqlx=warn,sea_orm=warn",
            level.to_ascii_lowercase()
        ),
        None => DEFAULT_FILTER.to_string(),
    }
}

pub fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let directives = filter_directives(rust_log.as_deref(), log_level.as_deref());
    let env_filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_takes_precedence() {
        assert_eq!(filter_directives(Some("debug"), Some("warn")), "debug");
    }

    #[test]
    fn log_level_sets_base_level() {
        assert_eq!(
            filter_directives(None, Some("DEBUG")),
            "debug,actix_web=info,sqlx=warn,sea_orm=warn"
        );
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(filter_directives(None, None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some(" "), Some("")), DEFAULT_FILTER);
    }
}
