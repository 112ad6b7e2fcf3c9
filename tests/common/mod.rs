//! 测试辅助工具

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use atelier::locale::Locale;
use atelier::translation::{CacheConfig, TranslationConfig};

/// 进程内的翻译端点替身
///
/// 把收到的文本加上 `[目标语言]` 前缀返回，并统计调用次数。
/// 切到失败模式后所有请求返回 500。
pub struct StubVendor {
    pub addr: SocketAddr,
    pub calls: Arc<AtomicUsize>,
    pub fail: Arc<AtomicBool>,
}

impl StubVendor {
    pub async fn start() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let fail = Arc::new(AtomicBool::new(false));

        let calls_handle = calls.clone();
        let fail_handle = fail.clone();
        let app = Router::new().route(
            "/api/translate",
            post(move |Json(body): Json<Value>| {
                let calls = calls_handle.clone();
                let fail = fail_handle.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if fail.load(Ordering::SeqCst) {
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({ "error": "vendor exploded" })),
                        );
                    }

                    let target = body
                        .get("targetLocale")
                        .and_then(|v| v.as_str())
                        .unwrap_or("?")
                        .to_string();
                    let content = body
                        .get("text")
                        .or_else(|| body.get("html"))
                        .or_else(|| body.get("object"))
                        .cloned()
                        .unwrap_or(Value::Null);
                    let translated = translate_value(&content, &target);
                    (StatusCode::OK, Json(json!({ "translated": translated })))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub vendor");
        let addr = listener.local_addr().expect("stub vendor addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, calls, fail }
    }

    pub fn url(&self) -> String {
        format!("http://{}/api/translate", self.addr)
    }

    /// 指向替身端点的翻译配置
    pub fn translation_config(&self) -> TranslationConfig {
        TranslationConfig {
            api_url: self.url(),
            api_key: Some("test-key".to_string()),
            source_locale: Locale::En,
            request_timeout: Duration::from_secs(5),
            cache: CacheConfig::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

/// 字符串加目标语言前缀，对象/数组逐值递归
fn translate_value(value: &Value, target: &str) -> Value {
    match value {
        Value::String(s) => Value::String(format!("[{}] {}", target, s)),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| translate_value(v, target)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), translate_value(v, target)))
                .collect(),
        ),
        other => other.clone(),
    }
}
