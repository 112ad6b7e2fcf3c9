//! 管理会话集成测试

use std::time::Duration;

use atelier::auth::{AuthConfig, AuthError, SessionManager};

fn manager(ttl: Duration) -> SessionManager {
    SessionManager::new(AuthConfig {
        admin_email: "admin@studio.dev".to_string(),
        admin_password: "a-long-admin-password".to_string(),
        session_secret: "integration-test-session-secret".to_string(),
        session_ttl: ttl,
    })
}

/// 登录成功后签发的令牌立即可用
#[test]
fn test_login_issues_verifiable_token() {
    let sessions = manager(Duration::from_secs(3600));

    sessions
        .verify_credentials("admin@studio.dev", "a-long-admin-password")
        .expect("valid credentials must pass");

    let token = sessions.issue_token();
    sessions.verify_token(&token).expect("fresh token must verify");

    println!("✅ Login token test passed");
}

/// 错误凭据一律拒绝，错误消息不区分邮箱与口令
#[test]
fn test_bad_credentials_rejected() {
    let sessions = manager(Duration::from_secs(3600));

    let wrong_email = sessions.verify_credentials("root@studio.dev", "a-long-admin-password");
    let wrong_password = sessions.verify_credentials("admin@studio.dev", "guess");
    assert_eq!(wrong_email, Err(AuthError::InvalidCredentials));
    assert_eq!(wrong_password, wrong_email);

    println!("✅ Bad credentials test passed");
}

/// 篡改过的令牌必然失败
#[test]
fn test_tampered_tokens_fail() {
    let sessions = manager(Duration::from_secs(3600));
    let token = sessions.issue_token();

    // 翻转签名最后一个字符
    let mut tampered = token.clone();
    let last = tampered.pop().expect("token is non-empty");
    tampered.push(if last == '0' { '1' } else { '0' });
    assert!(sessions.verify_token(&tampered).is_err());

    // 伪造时间戳
    let sig = token.split_once('.').expect("token has two parts").1;
    assert_eq!(
        sessions.verify_token(&format!("9999999999999.{}", sig)),
        Err(AuthError::BadSignature)
    );

    // 格式不对
    assert_eq!(
        sessions.verify_token("no-dot-here"),
        Err(AuthError::MalformedToken)
    );

    println!("✅ Tampered token test passed");
}

/// 令牌在 TTL 之后过期
#[test]
fn test_token_expiry() {
    let sessions = manager(Duration::from_millis(40));
    let token = sessions.issue_token();
    sessions.verify_token(&token).expect("token valid within ttl");

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(sessions.verify_token(&token), Err(AuthError::Expired));

    println!("✅ Token expiry test passed");
}

/// 换一个签名密钥后旧令牌全部失效
#[test]
fn test_secret_rotation_invalidates_tokens() {
    let old = manager(Duration::from_secs(3600));
    let token = old.issue_token();

    let rotated = SessionManager::new(AuthConfig {
        admin_email: "admin@studio.dev".to_string(),
        admin_password: "a-long-admin-password".to_string(),
        session_secret: "a-brand-new-session-secret".to_string(),
        session_ttl: Duration::from_secs(3600),
    });
    assert_eq!(rotated.verify_token(&token), Err(AuthError::BadSignature));

    println!("✅ Secret rotation test passed");
}
