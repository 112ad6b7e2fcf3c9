//! Web 服务器模块
//!
//! 站点页面、翻译代理、申请提交与管理后台的 HTTP 服务。

pub mod applications;
pub mod config;
pub mod handlers;
pub mod routes;
pub mod templates;
pub mod types;
pub mod visitor;

pub use config::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::auth::SessionManager;
use crate::rate_limit::RateLimiter;
use crate::translation::{TranslationClient, TranslationConfig};
use crate::web::applications::ApplicationService;

/// Web 服务器错误
#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("配置无效: {0}")]
    Config(String),
    #[error("数据库连接失败: {0}")]
    Database(String),
    #[error("服务器错误: {0}")]
    Server(String),
}

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> Result<(), WebServerError> {
        self.config
            .validate()
            .map_err(|e| WebServerError::Config(e.to_string()))?;

        // MongoDB 连接
        let client = mongodb::Client::with_uri_str(&self.config.mongo.connection_string)
            .await
            .map_err(|e| WebServerError::Database(e.to_string()))?;
        let db = client.database(&self.config.mongo.database_name);

        let applications = Arc::new(ApplicationService::new(
            db,
            &self.config.mongo.collection_name,
            &self.config.intake.upload_dir,
        ));
        if let Err(e) = applications.create_indexes().await {
            tracing::warn!("索引创建失败，继续启动: {}", e);
        }

        // 翻译客户端
        let translation_config =
            TranslationConfig::load().map_err(|e| WebServerError::Config(e.to_string()))?;
        if !translation_config.vendor_enabled() {
            tracing::warn!("未配置翻译 API 密钥，站点将以源语言运行");
        }
        let translator = Arc::new(TranslationClient::new(translation_config));

        let app_state = Arc::new(AppState {
            translator,
            applications,
            limiter: Arc::new(RateLimiter::new(
                self.config.intake.rate_limit_quota,
                self.config.intake.rate_limit_window,
            )),
            sessions: Arc::new(SessionManager::new(self.config.auth.clone())),
            config: self.config.clone(),
        });

        let app = create_router(app_state, &self.config);

        let listener = tokio::net::TcpListener::bind(self.config.listen_address())
            .await
            .map_err(|e| WebServerError::Server(format!("Failed to bind server: {}", e)))?;

        tracing::info!("Web 服务器启动: http://{}", self.config.listen_address());

        axum::serve(listener, app)
            .await
            .map_err(|e| WebServerError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器
fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let mut app = create_routes().with_state(app_state);

    // 添加CORS支持
    app = app.layer(CorsLayer::permissive());

    // 添加静态文件服务（如果配置了）
    if let Some(static_dir) = &config.static_dir {
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app
}
