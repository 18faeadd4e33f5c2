//! Shared page chrome and escaping helpers.

use axum::response::Html;

const STYLE: &str = r#"
*{box-sizing:border-box}
body{margin:0;min-height:100vh;display:flex;align-items:center;justify-content:center;
  padding:1rem;background:#0a0a0a;color:#f5f5f5;font-family:system-ui,-apple-system,sans-serif}
main{width:100%;max-width:28rem;text-align:center}
main.wide{max-width:42rem;text-align:left}
h1{font-size:2.5rem;font-weight:300;margin:0 0 1rem}
h2{font-size:1.25rem;font-weight:300;letter-spacing:.05em}
p{color:#b3b3b3;line-height:1.6}
.muted{color:#6b6b6b;font-size:.875rem}
.button{display:block;width:100%;padding:1rem 2rem;margin:.75rem 0;font-size:1.125rem;
  font-weight:500;text-decoration:none;border-radius:2px;border:1px solid #2a2a2a;
  background:#141414;color:#fff;cursor:pointer}
.button.primary{background:#fff;color:#000;border-color:#fff}
.button:disabled{opacity:.4;cursor:not-allowed}
textarea{width:100%;min-height:8rem;padding:1rem;background:#141414;color:#fff;
  border:1px solid #2a2a2a;border-radius:2px;font:inherit;resize:none}
label{display:flex;gap:.75rem;align-items:center;margin:1rem 0;text-align:left}
.verdict{font-size:4rem;font-weight:700;margin:0}
.card{background:#141414;border:1px solid #2a2a2a;padding:2rem;border-radius:2px}
.pulse{animation:pulse 1.2s ease-in-out infinite}
@keyframes pulse{50%{opacity:.4}}
@media print{body{background:#fff;color:#000}.card{background:#fff;border-color:#000}
  p{color:#000}.no-print{display:none}}
"#;

/// Wrap `body` in the full document. `title` is escaped here.
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"description\" content=\"Pay ₹5. Get a verdict. Move on.\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    ))
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A JavaScript string literal safe to place inside a `<script>` element.
pub fn script_string(raw: &str) -> String {
    serde_json::to_string(raw)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}
