pub mod request_meta;
pub mod validated_json;

pub use request_meta::RequestMeta;
pub use validated_json::ValidatedJson;
