//! Landing page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Weather Map Tile Server</title>
</head>
<body>
    <h1>Weather Map Tile Server</h1>
    <p>Access tiles at: /tiles/{z}/{x}/{y}.svg or /tiles/{z}/{x}/{y}.png</p>
    <p>Example: <a href="/tiles/10/512/512.svg">/tiles/10/512/512.svg</a></p>
</body>
</html>
"#;

/// GET / - Describes the tile URL pattern
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
