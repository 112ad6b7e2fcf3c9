//! 页面模板
//!
//! 服务端渲染的极简 HTML 外壳。导航文案由调用方按当前语言翻译
//! 后传入，模板本身不关心语言。

/// 导航条目：(链接, 文案)
pub type NavItem = (String, String);

pub fn render_page(lang: &str, title: &str, nav: &[NavItem], body: &str) -> String {
    let nav_html: String = nav
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\">{}</a>", href, escape(label)))
        .collect::<Vec<_>>()
        .join("\n      ");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/site.css">
  </head>
  <body>
    <nav>
      {nav_html}
    </nav>
    <main>
{body}
    </main>
  </body>
</html>
"#,
        lang = lang,
        title = escape(title),
        nav_html = nav_html,
        body = body,
    )
}

/// HTML 文本转义
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_render_page_sets_lang() {
        let nav = vec![("/".to_string(), "Home".to_string())];
        let html = render_page("fr", "Accueil", &nav, "<p>bonjour</p>");
        assert!(html.contains("<html lang=\"fr\">"));
        assert!(html.contains("<a href=\"/\">Home</a>"));
        assert!(html.contains("<p>bonjour</p>"));
    }
}
