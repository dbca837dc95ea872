pub mod join_code;
pub mod jwt;
pub mod pagination;
pub mod pwd;
pub mod record_id;
pub mod respond;
pub mod time;
pub mod validated_json;
