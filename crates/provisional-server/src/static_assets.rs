use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
#[include = "*"]
pub struct Assets;

pub async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() {
        return serve("index.html");
    }

    if Assets::get(path).is_some() {
        return serve(path);
    }

    // Extensionless routes map to their page ("/chat" -> chat.html).
    if !path.contains('.') {
        let page = format!("{path}.html");
        if Assets::get(&page).is_some() {
            return serve(&page);
        }
        return serve("index.html");
    }

    not_found()
}

fn serve(path: &str) -> Response {
    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(content.data.to_vec()))
                .unwrap_or_else(|_| not_found())
        }
        None => not_found(),
    }
}

fn not_found() -> Response {
    let mut response = Response::new(Body::from("404 Not Found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}
