use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use std::sync::Arc;

const HELP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Ferry</title>
</head>
<body>
    <h1>Ferry file transfer</h1>
    <p>Upload and download files of any size with a short-lived token.</p>

    <h2>Usage</h2>
    <ol>
        <li><strong>Get a token:</strong><br>
            <code>curl -X POST http://{origin}/token</code>
        </li>
        <li><strong>Upload a file:</strong><br>
            <code>curl -X POST -F "file=@yourfile.txt" http://{origin}/upload?token=TOKEN</code>
        </li>
        <li><strong>Download a file:</strong><br>
            <code>curl -X GET http://{origin}/download/yourfile.txt?token=TOKEN -o yourfile.txt</code>
        </li>
    </ol>

    <p>TOKEN is the value returned by the first step. It expires after {ttl_minutes} minutes.
    It can also be sent as the <code>Authorization</code> header.</p>
</body>
</html>
"#;

pub fn render_help(host: &str, port: u16, ttl_minutes: u64) -> String {
    HELP_TEMPLATE
        .replace("{origin}", &format!("{}:{}", host, port))
        .replace("{ttl_minutes}", &ttl_minutes.to_string())
}

pub async fn help_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let config = &state.config;
    Html(render_help(
        &config.server_addr,
        config.port,
        config.token_ttl.as_secs() / 60,
    ))
}
