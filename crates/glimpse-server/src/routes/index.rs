use axum::{
    extract::Path,
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::ApiError;

// The page and its assets are compiled in, so the binary runs from any directory
const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");
const STYLE_CSS: &str = include_str!("../../static/style.css");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn asset(Path(name): Path<String>) -> Result<Response, ApiError> {
    let (content_type, body) = match name.as_str() {
        "script.js" => ("text/javascript; charset=utf-8", SCRIPT_JS),
        "style.css" => ("text/css; charset=utf-8", STYLE_CSS),
        _ => return Err(ApiError::NotFound),
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

pub fn routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/:name", get(asset))
}
