//! Server-rendered HTML. All user-supplied text goes through [`escape`].

pub mod gallery;
pub mod preview;

/// HTML-escapes text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Escapes an already percent-encoded URL for a quoted attribute.
pub fn escape_href(url: &str) -> String {
    url.replace('&', "&amp;").replace('"', "%22")
}

/// Serializes a value for embedding inside a `<script type="application/json">` block.
pub fn embed_json<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    // '<' only occurs inside JSON strings, where < is equivalent
    Ok(json.replace('<', "\\u003c"))
}

const HEAD_ASSETS: &str = r#"<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css">
    <link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600&display=swap">
    <link rel="stylesheet" href="/styles.css">"#;

const NAVIGATION: &str = r#"<nav class="main-navigation">
        <div class="nav-logo">
            <span class="nav-title">Micro-apps</span>
        </div>
        <div class="nav-links">
            <a href="/index.html" class="nav-link">Generator</a>
            <a href="/gallery" class="nav-link">Gallery</a>
            <a href="/gallery?kind=card" class="nav-link">Cards</a>
            <a href="/preview.html" class="nav-link">Preview</a>
        </div>
    </nav>"#;

fn page_shell(title: &str, extra_head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    {HEAD_ASSETS}
    {extra_head}
</head>
<body>
    {NAVIGATION}
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralises_markup() {
        let escaped = escape(r#"<script>alert("x")</script>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('"'));
    }

    #[test]
    fn embedded_json_cannot_close_script_tag() {
        let embedded = embed_json(&serde_json::json!({"title": "</script><script>alert(1)"})).unwrap();
        assert!(!embedded.contains("</script>"));
        let back: serde_json::Value = serde_json::from_str(&embedded).unwrap();
        assert_eq!(back["title"], "</script><script>alert(1)");
    }
}
