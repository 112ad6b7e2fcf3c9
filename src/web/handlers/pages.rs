//! 站点页面处理器
//!
//! 每个页面按请求头解析访客语言，把英文源文案翻译后（翻译失败
//! 回退英文）再渲染 HTML。翻译结果走进程内缓存，重复访问不会
//! 反复请求上游。

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use serde_json::json;

use crate::locale::Locale;
use crate::web::templates::{self, NavItem};
use crate::web::types::AppState;
use crate::web::visitor;

/// 导航源文案（英文）
const NAV_SOURCE: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/approach", "Approach"),
    ("/collaboration", "Collaboration"),
    ("/contact", "Contact"),
    ("/blog", "Blog"),
];

/// 翻译导航文案
async fn nav_items(state: &AppState, locale: Locale) -> Vec<NavItem> {
    let labels: Vec<&str> = NAV_SOURCE.iter().map(|(_, label)| *label).collect();
    let translated = state
        .translator
        .translate_object(locale, &json!(labels))
        .await;

    NAV_SOURCE
        .iter()
        .enumerate()
        .map(|(i, (href, fallback))| {
            let label = translated
                .get(i)
                .and_then(|v| v.as_str())
                .unwrap_or(fallback)
                .to_string();
            (href.to_string(), label)
        })
        .collect()
}

async fn render(state: &AppState, headers: &HeaderMap, title: &str, body_source: &str) -> Html<String> {
    let locale = visitor::visitor_locale(headers);
    let nav = nav_items(state, locale).await;
    let title = state.translator.translate_text(locale, title).await;
    let body = state.translator.translate_html(locale, body_source).await;
    Html(templates::render_page(locale.code(), &title, &nav, &body))
}

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    render(
        &state,
        &headers,
        "Home",
        "<h1>We build products with ambitious founders</h1>\n\
         <p>A small studio partnering with early-stage startups on design and engineering.</p>",
    )
    .await
}

pub async fn approach(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    render(
        &state,
        &headers,
        "Approach",
        "<h1>Our approach</h1>\n\
         <p>Small teams, short feedback loops, and working software every week.</p>",
    )
    .await
}

pub async fn collaboration(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    render(
        &state,
        &headers,
        "Collaboration",
        "<h1>Working together</h1>\n\
         <p>We embed with your team from the first sketch to the first thousand users.</p>",
    )
    .await
}

pub async fn contact(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    render(
        &state,
        &headers,
        "Contact",
        "<h1>Get in touch</h1>\n\
         <p>Tell us about your project, or apply to join the studio below.</p>",
    )
    .await
}

pub async fn blog(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    render(
        &state,
        &headers,
        "Blog",
        "<h1>Notes</h1>\n\
         <p>Writing on product, craft, and the studio.</p>",
    )
    .await
}
