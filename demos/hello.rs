//! A small application mounted under `/api`.
//!
//! ```text
//! cargo run --example hello
//! curl http://localhost:8082/api/greet/World
//! curl -X POST -d '{"message":"hola"}' http://localhost:8082/api/data
//! ```
use ligero::{App, Config};

use std::time::{SystemTime, UNIX_EPOCH};

use hyper::StatusCode;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Ligero</title></head>
<body>
  <h1>Welcome to Ligero</h1>
  <ul>
    <li><a href="/api/greet/World">GET /api/greet/{name}</a></li>
    <li>POST a JSON body to /api/data</li>
    <li><a href="/api/missing">GET /api/missing</a></li>
  </ul>
</body>
</html>"#;

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn main() -> Result<(), ligero::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default().with_port(8082).with_context_path("/api"),
    };

    App::new(config)
        .get("/", |_, res| {
            res.content_type("text/html; charset=utf-8").send(INDEX);
            Ok(())
        })
        .get("/greet/{name}", |req, res| {
            res.json(&json!({
                "message": format!("Hello, {}!", req.param("name").unwrap_or_default()),
                "timestamp": timestamp(),
            }))?;
            Ok(())
        })
        .post("/data", |req, res| {
            res.json(&json!({
                "status": "received",
                "data": req.text()?,
                "timestamp": timestamp(),
            }))?;
            Ok(())
        })
        .fallback(|req, res| {
            res.status(StatusCode::NOT_FOUND).json(&json!({
                "error": "route not found",
                "path": req.uri().to_string(),
                "method": req.method().as_str(),
            }))?;
            Ok(())
        })
        .run()
}
