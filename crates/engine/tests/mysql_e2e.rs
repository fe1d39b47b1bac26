//! End-to-end MySQL rotation against a real server
//!
//! Needs Docker: `cargo test -p rotator-engine --test mysql_e2e -- --ignored`

mod common;

use std::time::Duration;

use common::{
    DATABASE, INITIAL_PASSWORD, MANAGING_PASSWORD, MANAGING_USER, NEW_PASSWORD, TARGET_USER,
    rotation_payload,
};
use rotator_core::{ErrorKind, RotationContext, RotationResponse};
use rotator_engine::Dispatcher;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mysql::Mysql;

struct Server {
    _container: ContainerAsync<Mysql>,
    host: String,
    port: u16,
}

impl Server {
    fn options(&self, username: &str, password: &str) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(username)
            .password(password)
            .database(DATABASE)
    }

    /// Run administrative statements as root
    async fn as_root(&self, statements: &[String]) {
        let mut root: MySqlConnection = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username("root")
            .connect()
            .await
            .expect("Failed to connect as root");
        for statement in statements {
            sqlx::raw_sql(statement).execute(&mut root).await.unwrap();
        }
        root.close().await.unwrap();
    }

    async fn can_login(&self, username: &str, password: &str) -> bool {
        match self.options(username, password).connect().await {
            Ok(conn) => {
                conn.close().await.ok();
                true
            }
            Err(_) => false,
        }
    }
}

/// Start MySQL with a managing user allowed to alter other accounts and a
/// target user holding its initial password.
async fn start_server() -> Server {
    let container = Mysql::default()
        .start()
        .await
        .expect("Failed to start MySQL container");
    let host = container.get_host().await.unwrap().to_string();
    let port = container.get_host_port_ipv4(3306).await.unwrap();

    let server = Server {
        _container: container,
        host,
        port,
    };
    server
        .as_root(&[
            format!("CREATE DATABASE {DATABASE}"),
            format!("CREATE USER '{MANAGING_USER}'@'%' IDENTIFIED BY '{MANAGING_PASSWORD}'"),
            format!("GRANT CREATE USER ON *.* TO '{MANAGING_USER}'@'%'"),
            format!("GRANT ALL ON {DATABASE}.* TO '{MANAGING_USER}'@'%'"),
            format!("CREATE USER '{TARGET_USER}'@'%' IDENTIFIED BY '{INITIAL_PASSWORD}'"),
            format!("GRANT ALL ON {DATABASE}.* TO '{TARGET_USER}'@'%'"),
        ])
        .await;
    server
}

fn context() -> RotationContext {
    RotationContext::new().with_timeout(Duration::from_secs(60))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_rotation_changes_password() {
    let server = start_server().await;
    assert!(server.can_login(TARGET_USER, INITIAL_PASSWORD).await);

    let result = Dispatcher::new()
        .dispatch(
            &context(),
            &rotation_payload("mysql", &server.host, server.port, NEW_PASSWORD),
        )
        .await;

    assert_eq!(RotationResponse::from_result(&result), RotationResponse::ok());
    assert!(server.can_login(TARGET_USER, NEW_PASSWORD).await);
    assert!(!server.can_login(TARGET_USER, INITIAL_PASSWORD).await);
    assert!(server.can_login(MANAGING_USER, MANAGING_PASSWORD).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_repeated_rotation_succeeds() {
    let server = start_server().await;
    let dispatcher = Dispatcher::new();
    let payload = rotation_payload("mysql", &server.host, server.port, NEW_PASSWORD);

    dispatcher.dispatch(&context(), &payload).await.unwrap();
    dispatcher.dispatch(&context(), &payload).await.unwrap();

    assert!(server.can_login(TARGET_USER, NEW_PASSWORD).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_password_with_quotes_and_backslashes() {
    let server = start_server().await;
    let tricky = r#"it's "quoted" \ and; -- not a comment"#;

    Dispatcher::new()
        .dispatch(
            &context(),
            &rotation_payload("mysql", &server.host, server.port, tricky),
        )
        .await
        .unwrap();

    assert!(server.can_login(TARGET_USER, tricky).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_no_backslash_escapes_mode() {
    let server = start_server().await;
    server
        .as_root(&[
            "SET GLOBAL sql_mode = CONCAT(@@GLOBAL.sql_mode, ',NO_BACKSLASH_ESCAPES')".to_string(),
        ])
        .await;
    // Under backslash escaping `\'` would end the literal early
    let tricky = r"back\slash \' and it's";

    Dispatcher::new()
        .dispatch(
            &context(),
            &rotation_payload("mysql", &server.host, server.port, tricky),
        )
        .await
        .unwrap();

    assert!(server.can_login(TARGET_USER, tricky).await);
    assert!(!server.can_login(TARGET_USER, INITIAL_PASSWORD).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_wrong_managing_password_is_connection_failed() {
    let server = start_server().await;
    let mut payload = rotation_payload("mysql", &server.host, server.port, NEW_PASSWORD);
    payload["managingUser"]["password"] = "wrong".into();

    let err = Dispatcher::new()
        .dispatch(&context(), &payload)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionFailed);
    assert!(server.can_login(TARGET_USER, INITIAL_PASSWORD).await);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_mysql_unknown_target_user_is_rotation_failed() {
    let server = start_server().await;
    let mut payload = rotation_payload("mysql", &server.host, server.port, NEW_PASSWORD);
    payload["rotateUser"]["username"] = "nobody".into();

    let err = Dispatcher::new()
        .dispatch(&context(), &payload)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RotationFailed);
    assert!(!err.report().contains(NEW_PASSWORD));
}
