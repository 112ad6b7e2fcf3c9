//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use std::time::Duration;

use crate::auth::AuthConfig;
use crate::env::{EnvError, EnvResult, EnvVar};

/// MongoDB 配置
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB 连接字符串
    pub connection_string: String,
    /// 数据库名称
    pub database_name: String,
    /// 申请集合名称
    pub collection_name: String,
}

impl MongoConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::mongodb;

        Ok(Self {
            connection_string: mongodb::ConnectionString::get()?,
            database_name: mongodb::DatabaseName::get()?,
            collection_name: mongodb::CollectionName::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.connection_string.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_URL".to_string(),
                message: "Connection string cannot be empty".to_string(),
            });
        }

        if self.database_name.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_DATABASE".to_string(),
                message: "Database name cannot be empty".to_string(),
            });
        }

        if self.collection_name.is_empty() {
            return Err(EnvError {
                variable: "MONGODB_COLLECTION".to_string(),
                message: "Collection name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// 申请提交配置
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// 限流窗口内允许的提交次数
    pub rate_limit_quota: u32,
    /// 限流窗口长度
    pub rate_limit_window: Duration,
    /// 简历上传目录
    pub upload_dir: String,
}

impl IntakeConfig {
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::{intake, web};

        Ok(Self {
            rate_limit_quota: intake::RateLimitQuota::get()?,
            rate_limit_window: intake::RateLimitWindow::get()?,
            upload_dir: web::UploadDir::get()?,
        })
    }
}

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 静态文件目录
    pub static_dir: Option<String>,
    /// MongoDB 配置
    pub mongo: MongoConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// 申请提交配置
    pub intake: IntakeConfig,
}

impl WebConfig {
    /// 从环境变量创建配置
    ///
    /// 管理员凭据和会话密钥没有默认值，缺失时启动失败。
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::{auth, web};

        let bind_addr = web::BindAddress::get()?;
        let port = web::Port::get()?;
        let static_dir_str = web::StaticDir::get()?;
        let static_dir = if static_dir_str.is_empty() {
            None
        } else {
            Some(static_dir_str)
        };

        let auth = AuthConfig {
            admin_email: auth::AdminEmail::get()?,
            admin_password: auth::AdminPassword::get()?,
            session_secret: auth::SessionSecret::get()?,
            session_ttl: auth::SessionTtl::get()?,
        };

        Ok(Self {
            bind_addr,
            port,
            static_dir,
            mongo: MongoConfig::from_env()?,
            auth,
            intake: IntakeConfig::from_env()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: "ATELIER_WEB_BIND_ADDRESS".to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: "ATELIER_WEB_PORT".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if let Some(ref static_dir) = self.static_dir {
            let path = std::path::Path::new(static_dir);
            if !path.exists() {
                tracing::warn!("静态文件目录 '{}' 不存在", static_dir);
            }
        }

        self.mongo.validate()?;

        if self.intake.rate_limit_quota == 0 {
            return Err(EnvError {
                variable: "ATELIER_INTAKE_RATE_LIMIT_QUOTA".to_string(),
                message: "Quota must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
