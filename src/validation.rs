//! 申请表单校验
//!
//! 所有规则在服务端强制执行，逐字段收集错误消息而不是遇错即停，
//! 这样一次提交就能把所有问题反馈给申请人。

use std::sync::OnceLock;

use regex::Regex;

/// 简历文件大小上限
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// 姓名长度范围
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
/// 自述长度范围
const PITCH_MIN: usize = 10;
const PITCH_MAX: usize = 500;
/// 学校名称长度上限
const SCHOOL_MAX: usize = 200;

/// 申请表单的原始输入（未清洗）
#[derive(Debug, Clone, Default)]
pub struct ApplicationInput {
    pub preferred_role: String,
    pub name: String,
    pub email: String,
    pub github_profile: String,
    pub linkedin_twitter_profile: String,
    pub current_school: String,
    pub pitch: String,
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z\s\-'\.]+$").unwrap_or_else(|e| panic!("姓名正则无效: {}", e))
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("邮箱正则无效: {}", e))
    })
}

/// 清洗文本输入：去除首尾空白与尖括号
pub fn sanitize_string(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

/// 校验表单字段，返回全部错误消息（空向量表示通过）
pub fn validate_application(input: &ApplicationInput) -> Vec<String> {
    let mut errors = Vec::new();

    if input.preferred_role.trim().is_empty() {
        errors.push("Preferred role is required".to_string());
    }

    let name = input.name.trim();
    if name.len() < NAME_MIN || name.len() > NAME_MAX {
        errors.push(format!(
            "Name must be between {} and {} characters",
            NAME_MIN, NAME_MAX
        ));
    } else if !name_pattern().is_match(name) {
        errors.push("Name contains invalid characters".to_string());
    }

    let email = input.email.trim();
    if !email_pattern().is_match(email) {
        errors.push("A valid email address is required".to_string());
    }

    let github = input.github_profile.trim();
    match url::Url::parse(github) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| h.contains("github.com")) => {}
        _ => errors.push("GitHub profile must be a valid github.com URL".to_string()),
    }

    // 社交链接可选，留空视为未填
    let social = input.linkedin_twitter_profile.trim();
    if !social.is_empty() && url::Url::parse(social).is_err() {
        errors.push("LinkedIn/Twitter profile must be a valid URL".to_string());
    }

    let school = input.current_school.trim();
    if school.len() > SCHOOL_MAX {
        errors.push(format!(
            "Current school must be at most {} characters",
            SCHOOL_MAX
        ));
    }

    let pitch = input.pitch.trim();
    if pitch.len() < PITCH_MIN || pitch.len() > PITCH_MAX {
        errors.push(format!(
            "Pitch must be between {} and {} characters",
            PITCH_MIN, PITCH_MAX
        ));
    }

    errors
}

// 常见可执行/脚本扩展名，出现在文件名任何位置都拒绝
const SUSPICIOUS_EXTENSIONS: &[&str] = &[
    ".exe", ".bat", ".cmd", ".sh", ".php", ".js", ".jar", ".scr", ".msi",
];

/// 校验简历文件（只看元数据，不做内容嗅探）
pub fn validate_resume(file_name: &str, content_type: &str, size: usize) -> Vec<String> {
    let mut errors = Vec::new();

    let lowered = file_name.to_lowercase();
    if !lowered.ends_with(".pdf") || content_type != "application/pdf" {
        errors.push("Resume must be a PDF file".to_string());
    }
    if SUSPICIOUS_EXTENSIONS.iter().any(|ext| {
        lowered
            .strip_suffix(".pdf")
            .unwrap_or(&lowered)
            .contains(ext)
    }) {
        errors.push("Resume file name is not allowed".to_string());
    }

    if size == 0 {
        errors.push("Resume file is empty".to_string());
    } else if size > MAX_RESUME_BYTES {
        errors.push("Resume file must be 10MB or smaller".to_string());
    }

    errors
}
