//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use serde_json::{Value, json};

pub const DATABASE: &str = "credential_rotation_test";
pub const MANAGING_USER: &str = "managing_user";
pub const MANAGING_PASSWORD: &str = "manager_password";
pub const TARGET_USER: &str = "target_user";
pub const INITIAL_PASSWORD: &str = "initial_password";
pub const NEW_PASSWORD: &str = "new_password";

/// Rotation envelope for `target_user` on `host:port`
pub fn rotation_payload(tag: &str, host: &str, port: u16, new_password: &str) -> Value {
    json!({
        "type": tag,
        "host": host,
        "port": port,
        "database": DATABASE,
        "managingUser": { "username": MANAGING_USER, "password": MANAGING_PASSWORD },
        "rotateUser": {
            "username": TARGET_USER,
            "password": INITIAL_PASSWORD,
            "newPassword": new_password
        }
    })
}

/// A local port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
