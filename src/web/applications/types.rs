//! 申请数据类型

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// 管理列表每页条数
pub const PAGE_SIZE: u64 = 50;

/// MongoDB中存储的申请记录
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApplicationRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 意向岗位
    pub preferred_role: String,
    /// 姓名
    pub name: String,
    /// 邮箱
    pub email: String,
    /// GitHub 主页
    pub github_profile: String,
    /// LinkedIn/Twitter 主页（可选）
    pub linkedin_twitter_profile: Option<String>,
    /// 简历文件相对路径
    pub resume_file_path: String,
    /// 在读学校（可选）
    pub current_school: Option<String>,
    /// 自述
    pub pitch: String,
    /// 提交时间
    pub created_at: DateTime,
}

/// 列表查询参数
#[derive(Debug, Deserialize, Default)]
pub struct ApplicationListRequest {
    pub page: Option<u64>,
    /// 按岗位过滤，缺省为全部
    pub role: Option<String>,
}

/// 预生成的拒信撰写链接
#[derive(Debug, Serialize, Clone)]
pub struct RejectionLinks {
    pub gmail: String,
    pub outlook: String,
}

/// 面向管理界面的申请摘要
#[derive(Debug, Serialize, Clone)]
pub struct ApplicationSummary {
    pub id: String,
    pub preferred_role: String,
    pub name: String,
    pub email: String,
    pub github_profile: String,
    pub linkedin_twitter_profile: Option<String>,
    pub current_school: Option<String>,
    pub pitch: String,
    /// 简历下载地址（服务端路由，不暴露磁盘路径）
    pub resume_url: String,
    pub created_at: String,
    pub rejection_links: RejectionLinks,
}

/// 列表响应
#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationSummary>,
    /// 符合当前过滤条件的总数
    pub filtered_total: u64,
    /// 全部申请总数
    pub overall_total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

/// 变更事件（经 SSE 推送给管理界面）
#[derive(Debug, Serialize, Clone)]
pub struct ApplicationEvent {
    /// insert / update / delete / replace
    pub operation: String,
    pub id: Option<String>,
}
