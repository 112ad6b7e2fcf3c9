//! 管理后台认证
//!
//! 登录凭据与环境配置比对，通过后签发服务端签名的会话令牌。
//! 令牌格式为 `<签发毫秒时间戳>.<blake3 keyed 签名的十六进制>`，
//! 验证时重新计算签名并检查有效期，服务端不保存会话状态。

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// 认证错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("邮箱或口令不正确")]
    InvalidCredentials,
    #[error("会话令牌格式无效")]
    MalformedToken,
    #[error("会话令牌签名不匹配")]
    BadSignature,
    #[error("会话已过期")]
    Expired,
}

/// 认证配置
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub session_secret: String,
    pub session_ttl: Duration,
}

/// 会话管理器
///
/// 签名密钥由配置的 secret 经 blake3 派生，长度固定为 32 字节。
pub struct SessionManager {
    key: [u8; 32],
    admin_email: String,
    admin_password: String,
    ttl: Duration,
}

// 容忍的时钟偏差：签发时间略晚于本机时钟时不立即判为伪造
const CLOCK_SKEW: Duration = Duration::from_secs(60);

impl SessionManager {
    pub fn new(config: AuthConfig) -> Self {
        let key = *blake3::hash(config.session_secret.as_bytes()).as_bytes();
        Self {
            key,
            admin_email: config.admin_email,
            admin_password: config.admin_password,
            ttl: config.session_ttl,
        }
    }

    /// 校验登录凭据（邮箱不区分大小写，口令逐字节比对）
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email_ok = email.trim().eq_ignore_ascii_case(&self.admin_email);
        let password_ok = constant_time_eq(password.as_bytes(), self.admin_password.as_bytes());
        if email_ok && password_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// 签发会话令牌
    pub fn issue_token(&self) -> String {
        self.issue_token_at(SystemTime::now())
    }

    fn issue_token_at(&self, issued: SystemTime) -> String {
        let millis = issued
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        format!("{}.{}", millis, self.sign(millis))
    }

    /// 验证会话令牌
    pub fn verify_token(&self, token: &str) -> Result<(), AuthError> {
        self.verify_token_at(token, SystemTime::now())
    }

    fn verify_token_at(&self, token: &str, now: SystemTime) -> Result<(), AuthError> {
        let (millis_part, sig_part) = token
            .split_once('.')
            .ok_or(AuthError::MalformedToken)?;
        let millis: u64 = millis_part
            .parse()
            .map_err(|_| AuthError::MalformedToken)?;

        let expected = self.sign(millis);
        if !constant_time_eq(expected.as_bytes(), sig_part.as_bytes()) {
            return Err(AuthError::BadSignature);
        }

        let issued = UNIX_EPOCH + Duration::from_millis(millis);
        match now.duration_since(issued) {
            Ok(age) if age <= self.ttl => Ok(()),
            Ok(_) => Err(AuthError::Expired),
            // 签发时间在未来：允许小幅时钟偏差，超出视为伪造
            Err(_) => match issued.duration_since(now) {
                Ok(skew) if skew <= CLOCK_SKEW => Ok(()),
                _ => Err(AuthError::BadSignature),
            },
        }
    }

    fn sign(&self, millis: u64) -> String {
        blake3::keyed_hash(&self.key, millis.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}

/// 定长时间比较，长度不同直接为假但仍遍历较短者
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl: Duration) -> SessionManager {
        SessionManager::new(AuthConfig {
            admin_email: "admin@example.com".to_string(),
            admin_password: "correct-horse-battery".to_string(),
            session_secret: "0123456789abcdef0123456789abcdef".to_string(),
            session_ttl: ttl,
        })
    }

    #[test]
    fn test_credentials() {
        let m = manager(Duration::from_secs(3600));
        assert!(m.verify_credentials("admin@example.com", "correct-horse-battery").is_ok());
        // 邮箱不区分大小写
        assert!(m.verify_credentials("Admin@Example.COM", "correct-horse-battery").is_ok());
        assert_eq!(
            m.verify_credentials("admin@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            m.verify_credentials("other@example.com", "correct-horse-battery"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_token_roundtrip() {
        let m = manager(Duration::from_secs(3600));
        let token = m.issue_token();
        assert!(m.verify_token(&token).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let m = manager(Duration::from_secs(3600));
        let token = m.issue_token();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('0');
        assert!(matches!(
            m.verify_token(&tampered),
            Err(AuthError::BadSignature) | Err(AuthError::MalformedToken)
        ));

        // 改时间戳也会破坏签名
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("1.{}", sig);
        assert_eq!(m.verify_token(&forged), Err(AuthError::BadSignature));

        assert_eq!(m.verify_token("garbage"), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let m = manager(Duration::from_secs(60));
        let issued = SystemTime::now() - Duration::from_secs(3600);
        let token = m.issue_token_at(issued);
        assert_eq!(m.verify_token(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_different_secret_rejects() {
        let m1 = manager(Duration::from_secs(3600));
        let m2 = SessionManager::new(AuthConfig {
            admin_email: "admin@example.com".to_string(),
            admin_password: "correct-horse-battery".to_string(),
            session_secret: "another-secret-entirely-here".to_string(),
            session_ttl: Duration::from_secs(3600),
        });
        let token = m1.issue_token();
        assert_eq!(m2.verify_token(&token), Err(AuthError::BadSignature));
    }
}
