//! Development server for the output folder.
//!
//! Serves compiled files only; there is no on-demand compilation, so
//! the server is honest about what a production host would see. When a
//! reload hub is running, served HTML gets a WebSocket client script
//! injected before `</body>`.

mod mime;
mod path;
mod reload;

pub use reload::ReloadHub;

use crate::config::SiteConfig;
use crate::log;
use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// HTTP port used when the config does not set `devServerPort`.
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Base WebSocket port for the reload hub.
pub const DEFAULT_WS_PORT: u16 = 35729;

/// Maximum port retry attempts when the base port is taken.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind and run the HTTP server (blocking).
pub fn serve(config: &SiteConfig, reload: Option<Arc<ReloadHub>>) -> Result<()> {
    let output = Arc::new(config.output_dir());
    let base_port = config.dev_server_port.unwrap_or(DEFAULT_HTTP_PORT);
    let (server, port) = bind_http(base_port)?;
    log!("serve"; "http://localhost:{port}");

    let ws_port = reload.as_ref().map(|hub| hub.port());

    // Small pool so one slow response never blocks the rest
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;
    for request in server.incoming_requests() {
        let output = Arc::clone(&output);
        pool.spawn(move || {
            if let Err(err) = handle_request(request, &output, ws_port) {
                log!("serve"; "request error: {err}");
            }
        });
    }
    Ok(())
}

/// Bind tiny_http, retrying on the next port if the base one is taken.
fn bind_http(base_port: u16) -> Result<(Server, u16)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match Server::http(format!("127.0.0.1:{port}")) {
            Ok(server) => return Ok((server, port)),
            Err(err) => {
                last_error = Some(err);
            }
        }
    }

    Err(anyhow!(
        "failed to bind dev server after {MAX_PORT_RETRIES} attempts: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn handle_request(request: Request, output: &Path, ws_port: Option<u16>) -> Result<()> {
    match path::resolve_path(request.url(), output) {
        Some(file) => respond_file(request, &file, ws_port),
        None => respond_not_found(request, output, ws_port),
    }
}

/// Respond with a file from the output tree.
fn respond_file(request: Request, path: &Path, ws_port: Option<u16>) -> Result<()> {
    let content_type = mime::from_path(path);
    let body = fs::read(path)?;
    let body = maybe_inject_reload(body, content_type, ws_port);
    send_body(request, 200, content_type, body)
}

/// Respond with the site's own 404 page when it has one.
fn respond_not_found(request: Request, output: &Path, ws_port: Option<u16>) -> Result<()> {
    let custom = output.join("404.html");
    if let Ok(body) = fs::read(&custom) {
        let body = maybe_inject_reload(body, mime::HTML, ws_port);
        return send_body(request, 404, mime::HTML, body);
    }
    send_body(request, 404, mime::PLAIN, b"404 Not Found".to_vec())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(
            Header::from_bytes("Content-Type", content_type)
                .map_err(|()| anyhow!("invalid content-type header"))?,
        );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// reload script injection
// ============================================================================

fn reload_script(ws_port: u16) -> String {
    format!(
        "<script>(function(){{\
         var ws=new WebSocket(\"ws://localhost:{ws_port}/\");\
         ws.onmessage=function(){{location.reload();}};\
         }})();</script>"
    )
}

fn maybe_inject_reload(body: Vec<u8>, content_type: &str, ws_port: Option<u16>) -> Vec<u8> {
    match (content_type.starts_with("text/html"), ws_port) {
        (true, Some(port)) => inject_reload_script(&body, port),
        _ => body,
    }
}

/// Inject the reload client before the final `</body>` tag, or append
/// when there is none (browsers tolerate trailing scripts).
fn inject_reload_script(content: &[u8], ws_port: u16) -> Vec<u8> {
    let script = reload_script(ws_port);
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";
    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
    } else {
        result.extend_from_slice(content);
        result.extend_from_slice(script_bytes);
    }
    result
}
