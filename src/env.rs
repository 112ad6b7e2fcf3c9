//! 统一的环境变量管理
//!
//! 类型安全、可验证的环境变量访问。每个变量是一个零尺寸类型，
//! 实现 `EnvVar` 特性以声明名称、默认值、描述和解析规则。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 翻译端点 URL
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "ATELIER_TRANSLATION_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("https://engine.lingo.dev/api/translate".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 翻译端点密钥（未设置时翻译降级为原样回显）
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "ATELIER_TRANSLATION_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Translation API key (translation disabled when unset)";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API key cannot be empty".to_string(),
                });
            }
            Ok(key.to_string())
        }
    }

    /// 译文缓存 TTL
    pub struct CacheTtl;
    impl EnvVar<Duration> for CacheTtl {
        const NAME: &'static str = "ATELIER_TRANSLATION_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(7 * 24 * 60 * 60));
        const DESCRIPTION: &'static str = "Translation cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_duration_secs(value, Self::NAME, 60, 30 * 24 * 60 * 60)
        }
    }

    /// 译文缓存容量上限（字节）
    pub struct CacheMaxBytes;
    impl EnvVar<usize> for CacheMaxBytes {
        const NAME: &'static str = "ATELIER_TRANSLATION_CACHE_MAX_BYTES";
        const DEFAULT: Option<usize> = Some(5 * 1024 * 1024);
        const DESCRIPTION: &'static str = "Translation cache size budget in bytes";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1024, 256 * 1024 * 1024)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "ATELIER_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "ATELIER_WEB_PORT";
        const DEFAULT: Option<u16> = Some(7080);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })
        }
    }

    /// 静态文件目录
    pub struct StaticDir;
    impl EnvVar<String> for StaticDir {
        const NAME: &'static str = "ATELIER_WEB_STATIC_DIR";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("static".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Static files directory";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 简历上传目录
    pub struct UploadDir;
    impl EnvVar<String> for UploadDir {
        const NAME: &'static str = "ATELIER_WEB_UPLOAD_DIR";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("uploads/resumes".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Directory for uploaded resume files";

        fn parse(value: &str) -> EnvResult<String> {
            let dir = value.trim();
            if dir.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Upload directory cannot be empty".to_string(),
                });
            }
            Ok(dir.to_string())
        }
    }
}

/// MongoDB相关环境变量
pub mod mongodb {
    use super::*;

    /// MongoDB连接字符串
    pub struct ConnectionString;
    impl EnvVar<String> for ConnectionString {
        const NAME: &'static str = "MONGODB_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("mongodb://localhost:27017".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB connection string";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "MongoDB URL must start with mongodb:// or mongodb+srv://".to_string(),
                })
            }
        }
    }

    /// 数据库名称
    pub struct DatabaseName;
    impl EnvVar<String> for DatabaseName {
        const NAME: &'static str = "MONGODB_DATABASE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("atelier".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB database name";

        fn parse(value: &str) -> EnvResult<String> {
            parse_nonempty(value, Self::NAME, "Database name cannot be empty")
        }
    }

    /// 申请集合名称
    pub struct CollectionName;
    impl EnvVar<String> for CollectionName {
        const NAME: &'static str = "MONGODB_COLLECTION";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("applications".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB collection holding applications";

        fn parse(value: &str) -> EnvResult<String> {
            parse_nonempty(value, Self::NAME, "Collection name cannot be empty")
        }
    }
}

/// 管理后台认证相关环境变量
pub mod auth {
    use super::*;

    /// 管理员邮箱
    pub struct AdminEmail;
    impl EnvVar<String> for AdminEmail {
        const NAME: &'static str = "ATELIER_ADMIN_EMAIL";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Admin login email";

        fn parse(value: &str) -> EnvResult<String> {
            let email = value.trim();
            if !email.contains('@') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Admin email must contain '@'".to_string(),
                });
            }
            Ok(email.to_string())
        }
    }

    /// 管理员口令
    pub struct AdminPassword;
    impl EnvVar<String> for AdminPassword {
        const NAME: &'static str = "ATELIER_ADMIN_PASSWORD";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Admin login password";

        fn parse(value: &str) -> EnvResult<String> {
            if value.len() < 8 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Admin password must be at least 8 characters".to_string(),
                });
            }
            Ok(value.to_string())
        }
    }

    /// 会话令牌签名密钥
    pub struct SessionSecret;
    impl EnvVar<String> for SessionSecret {
        const NAME: &'static str = "ATELIER_SESSION_SECRET";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Secret used to sign admin session tokens";

        fn parse(value: &str) -> EnvResult<String> {
            if value.len() < 16 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Session secret must be at least 16 characters".to_string(),
                });
            }
            Ok(value.to_string())
        }
    }

    /// 会话有效期
    pub struct SessionTtl;
    impl EnvVar<Duration> for SessionTtl {
        const NAME: &'static str = "ATELIER_SESSION_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30 * 24 * 60 * 60));
        const DESCRIPTION: &'static str = "Admin session lifetime in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_duration_secs(value, Self::NAME, 60, 365 * 24 * 60 * 60)
        }
    }
}

/// 申请提交相关环境变量
pub mod intake {
    use super::*;

    /// 限流窗口内允许的提交次数
    pub struct RateLimitQuota;
    impl EnvVar<u32> for RateLimitQuota {
        const NAME: &'static str = "ATELIER_INTAKE_RATE_LIMIT_QUOTA";
        const DEFAULT: Option<u32> = Some(2);
        const DESCRIPTION: &'static str = "Submissions allowed per rate-limit window";

        fn parse(value: &str) -> EnvResult<u32> {
            let quota: u32 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid positive number".to_string(),
            })?;
            if quota == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Quota must be greater than 0".to_string(),
                });
            }
            Ok(quota)
        }
    }

    /// 限流窗口长度
    pub struct RateLimitWindow;
    impl EnvVar<Duration> for RateLimitWindow {
        const NAME: &'static str = "ATELIER_INTAKE_RATE_LIMIT_WINDOW";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(600));
        const DESCRIPTION: &'static str = "Rate-limit window in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_duration_secs(value, Self::NAME, 1, 24 * 60 * 60)
        }
    }
}

/// 辅助函数
fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_duration_secs(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<Duration> {
    let seconds: u64 = value.parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of seconds".to_string(),
    })?;

    if seconds < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {} seconds", seconds, min),
        });
    }

    if seconds > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {} seconds", seconds, max),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_nonempty(value: &str, var_name: &str, message: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: message.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
