//! Logger module
//!
//! Timestamped logging to stdout/stderr:
//! - server lifecycle and endpoint registration lines
//! - per-request access lines (method + URI, emitted before dispatch)
//! - warnings and errors, including traversal attempts

use chrono::Local;
use hyper::{Method, Uri};
use std::net::SocketAddr;
use std::path::Path;

/// Write to the info/access channel (stdout)
fn write_info(message: &str) {
    println!("[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

/// Write to the error channel (stderr)
fn write_error(message: &str) {
    eprintln!("[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

pub fn log_server_start(addr: &SocketAddr) {
    write_info(&format!("listening on http://{addr}"));
}

/// One line per registered endpoint, printed at startup
pub fn log_endpoint_registered(mount_point: &str, destination: &str) {
    write_info(&format!("{mount_point} = {destination}"));
}

pub fn log_serving_root(root: &Path) {
    write_info(&format!("serving from {}", root.display()));
}

/// Access line for every request, matched or not. Fire-and-forget.
pub fn log_request(method: &Method, uri: &Uri) {
    write_info(&format!("{method} - {uri}"));
}

/// Security-relevant: a normalized path escaped its static root
pub fn log_traversal_attempt(path: &Path) {
    write_error(&format!("[WARN] path traversal blocked: {}", path.display()));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] failed to serve connection: {err:?}"));
}
