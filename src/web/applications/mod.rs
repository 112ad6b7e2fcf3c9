//! 申请管理
//!
//! 提交入库、管理列表、变更订阅与简历文件处理。

pub mod service;
pub mod types;

pub use service::{rejection_links, resume_file_name, ApplicationService};
pub use types::{
    ApplicationEvent, ApplicationListRequest, ApplicationListResponse, ApplicationRecord,
    ApplicationSummary, RejectionLinks, PAGE_SIZE,
};
