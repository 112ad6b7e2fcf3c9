//! Web 处理器

pub mod api;
pub mod pages;
