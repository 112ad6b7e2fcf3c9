//! 申请服务层
//!
//! 基于 MongoDB 的申请记录存取：提交落库、分页列表、变更订阅，
//! 以及简历文件的落盘与安全读取。

use std::path::{Path, PathBuf};

use bson::doc;
use bson::oid::ObjectId;
use chrono::{SecondsFormat, Utc};
use futures::stream::TryStreamExt;
use mongodb::change_stream::event::ChangeStreamEvent;
use mongodb::change_stream::ChangeStream;
use mongodb::{Collection, Database};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::types::*;

/// 拒信模板
const REJECTION_SUBJECT: &str = "Update on your application";

fn rejection_body(name: &str) -> String {
    format!(
        "Hi {},\n\nThank you for taking the time to apply and for your interest in joining us. \
After careful consideration, we regret to inform you that you were not selected to move \
forward at this time.\n\nWe genuinely appreciate the effort you put into your application \
and wish you the very best in your future endeavors.\n\nWarm regards,\nThe Team",
        name
    )
}

/// 生成 Gmail / Outlook 的拒信撰写链接
pub fn rejection_links(name: &str, email: &str) -> RejectionLinks {
    let to = utf8_percent_encode(email, NON_ALPHANUMERIC).to_string();
    let subject = utf8_percent_encode(REJECTION_SUBJECT, NON_ALPHANUMERIC).to_string();
    let body = rejection_body(name);
    let body = utf8_percent_encode(&body, NON_ALPHANUMERIC).to_string();

    RejectionLinks {
        gmail: format!(
            "https://mail.google.com/mail/?view=cm&fs=1&to={}&su={}&body={}",
            to, subject, body
        ),
        outlook: format!(
            "https://outlook.live.com/mail/0/deeplink/compose?to={}&subject={}&body={}",
            to, subject, body
        ),
    }
}

/// 生成简历落盘文件名：`<时间戳>-<姓名标识>-resume.pdf`
///
/// 时间戳里的冒号和句点替换为连字符，姓名小写后仅保留字母数字，
/// 其余字符替换为连字符。时间戳前缀保证了同名申请人不冲突。
pub fn resume_file_name(applicant: &str, now: chrono::DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    let slug: String = applicant
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-{}-resume.pdf", stamp, slug)
}

/// 从过滤后总数计算总页数
pub fn total_pages(filtered: u64) -> u64 {
    filtered.div_ceil(PAGE_SIZE)
}

/// 申请服务
pub struct ApplicationService {
    collection: Collection<ApplicationRecord>,
    upload_dir: PathBuf,
}

impl ApplicationService {
    pub fn new(db: Database, collection_name: &str, upload_dir: impl Into<PathBuf>) -> Self {
        let collection = db.collection::<ApplicationRecord>(collection_name);
        Self {
            collection,
            upload_dir: upload_dir.into(),
        }
    }

    /// 创建数据库索引
    pub async fn create_indexes(&self) -> Result<(), String> {
        use mongodb::{options::IndexOptions, IndexModel};

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("created_at_desc".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "preferred_role": 1 })
                .options(
                    IndexOptions::builder()
                        .name("preferred_role_1".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection
            .create_indexes(indexes)
            .await
            .map_err(|e| format!("创建索引失败: {}", e))?;

        Ok(())
    }

    /// 插入一条申请记录
    pub async fn insert(&self, record: ApplicationRecord) -> Result<ObjectId, String> {
        let result = self
            .collection
            .insert_one(record)
            .await
            .map_err(|e| format!("插入申请失败: {}", e))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| "插入结果缺少 _id".to_string())
    }

    /// 分页查询申请列表（按提交时间倒序）
    pub async fn list(
        &self,
        page: u64,
        role: Option<&str>,
    ) -> Result<ApplicationListResponse, String> {
        let page = page.max(1);

        let mut filter = doc! {};
        if let Some(role) = role {
            if !role.trim().is_empty() {
                filter.insert("preferred_role", role.trim());
            }
        }

        let filtered_total = self
            .collection
            .count_documents(filter.clone())
            .await
            .map_err(|e| format!("查询总数失败: {}", e))?;
        let overall_total = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(|e| format!("查询总数失败: {}", e))?;

        let mut cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip((page - 1) * PAGE_SIZE)
            .limit(PAGE_SIZE as i64)
            .await
            .map_err(|e| format!("查询申请失败: {}", e))?;

        let mut applications = Vec::new();
        while let Some(record) = cursor
            .try_next()
            .await
            .map_err(|e| format!("读取结果失败: {}", e))?
        {
            if let Some(summary) = summarize(record) {
                applications.push(summary);
            }
        }

        Ok(ApplicationListResponse {
            applications,
            filtered_total,
            overall_total,
            page,
            page_size: PAGE_SIZE,
            total_pages: total_pages(filtered_total),
        })
    }

    /// 按 id 读取单条申请
    pub async fn get(&self, id: &str) -> Result<Option<ApplicationRecord>, String> {
        let oid = ObjectId::parse_str(id).map_err(|_| format!("无效的申请 id: {}", id))?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| format!("查询申请失败: {}", e))
    }

    /// 订阅集合变更（需要 MongoDB 副本集）
    pub async fn watch(
        &self,
    ) -> Result<ChangeStream<ChangeStreamEvent<ApplicationRecord>>, String> {
        self.collection
            .watch()
            .await
            .map_err(|e| format!("订阅变更流失败: {}", e))
    }

    /// 保存简历文件，返回存入记录的文件名
    pub async fn save_resume(&self, applicant: &str, bytes: &[u8]) -> Result<String, String> {
        let file_name = resume_file_name(applicant, Utc::now());

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| format!("创建上传目录失败: {}", e))?;
        tokio::fs::write(self.upload_dir.join(&file_name), bytes)
            .await
            .map_err(|e| format!("写入简历文件失败: {}", e))?;

        Ok(file_name)
    }

    /// 把记录里的文件名解析为磁盘路径，拒绝任何目录穿越
    pub fn resolve_resume(&self, stored_name: &str) -> Result<PathBuf, String> {
        resolve_resume_path(&self.upload_dir, stored_name)
    }
}

fn resolve_resume_path(upload_dir: &Path, stored_name: &str) -> Result<PathBuf, String> {
    let candidate = Path::new(stored_name);
    let escapes_dir = candidate.is_absolute()
        || candidate
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)));
    if escapes_dir || stored_name.is_empty() {
        return Err(format!("非法的简历路径: {}", stored_name));
    }
    Ok(upload_dir.join(candidate))
}

/// 把存储记录转换为管理界面摘要（缺少 _id 的记录跳过）
pub fn summarize(record: ApplicationRecord) -> Option<ApplicationSummary> {
    let id = record.id?.to_hex();
    let rejection_links = rejection_links(&record.name, &record.email);
    Some(ApplicationSummary {
        resume_url: format!("/api/admin/applications/{}/resume", id),
        id,
        preferred_role: record.preferred_role,
        name: record.name,
        email: record.email,
        github_profile: record.github_profile,
        linkedin_twitter_profile: record.linkedin_twitter_profile,
        current_school: record.current_school,
        pitch: record.pitch,
        created_at: record
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        rejection_links,
    })
}
