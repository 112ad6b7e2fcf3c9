//! API 处理器

pub mod admin;
pub mod intake;
pub mod locale;
pub mod translate;
