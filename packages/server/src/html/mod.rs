//! Embedded HTML pages served by the dashboard.
//!
//! The pages are kept as `&'static str` so they ship inside the binary.

pub mod dashboard;

/// The dashboard with its map frame sized `width` x `height` pixels.
#[must_use]
pub fn dashboard_page(width: u32, height: u32) -> String {
    dashboard::DASHBOARD_HTML
        .replace("{{MAP_WIDTH}}", &width.to_string())
        .replace("{{MAP_HEIGHT}}", &height.to_string())
}

/// A page showing only `message` as a warning, rendered in place of the
/// map when the pipeline halts.
#[must_use]
pub fn warning_page(message: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="ja">
<head>
  <meta charset="UTF-8" />
  <style>
    body {{ margin: 0; padding: 16px; font-family: sans-serif; }}
    .warning {{ background: #fffce7; color: #926c05; border-radius: 6px; padding: 16px; }}
  </style>
</head>
<body>
  <div class="warning" role="alert">{}</div>
</body>
</html>
"#,
        escape_html(message)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
