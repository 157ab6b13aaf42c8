//! Integration tests for registration and admin login.

mod common;

use std::time::Duration;

use common::TestServer;
use parlor_proto::{fold_name, Reply};

#[tokio::test]
async fn test_register_welcomes_and_announces() {
    let server = TestServer::start().await.expect("start relay");
    let mut bob = server.member("bob").await.expect("bob");

    let mut alice = server.connect().await.expect("connect");
    let reply = alice.try_register("alice").await.expect("reply");
    assert_eq!(reply, Reply::Success("Welcome to the chatroom, alice".into()));

    assert_eq!(
        bob.recv().await.expect("join notice"),
        Reply::notice("'alice' has joined the chatroom")
    );
    alice
        .expect_silence(Duration::from_millis(100))
        .await
        .expect("no self join notice");
}

#[tokio::test]
async fn test_unregistered_commands_are_rejected() {
    let server = TestServer::start().await.expect("start relay");
    let mut client = server.connect().await.expect("connect");

    for line in ["message hi", "onlineCount", "changeUsername bob", "ban x"] {
        client.send_raw(line).await.expect("send");
        match client.recv().await.expect("reply") {
            Reply::Error(text) => assert!(text.starts_with("You must register first"), "{text}"),
            other => panic!("{line}: unexpected {other:?}"),
        }
    }

    // Still open and able to register.
    client.register("alice").await.expect("register after rejections");
}

#[tokio::test]
async fn test_duplicate_name_is_case_insensitive() {
    let server = TestServer::start().await.expect("start relay");
    let _alice = server.member("Alice").await.expect("alice");

    let mut other = server.connect().await.expect("connect");
    assert_eq!(
        other.try_register("aLiCe").await.expect("reply"),
        Reply::error("Username is already in use")
    );
    other.register("carol").await.expect("other name still works");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_registrations() {
    let server = TestServer::start().await.expect("start relay");
    let address = server.address();

    let tasks: Vec<_> = (0..24)
        .map(|i| {
            let address = address.clone();
            tokio::spawn(async move {
                let mut client = common::TestClient::connect(&address).await?;
                client.register(&format!("user{i}")).await?;
                anyhow::Ok(client)
            })
        })
        .collect();

    let mut clients = Vec::new();
    for task in tasks {
        clients.push(task.await.expect("join").expect("register"));
    }

    let names = server.hub().presence.names();
    assert_eq!(names.len(), 24);
    for i in 0..24 {
        let name = format!("user{i}");
        assert_eq!(names.iter().filter(|n| **n == name).count(), 1, "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_name_has_one_winner() {
    let server = TestServer::start().await.expect("start relay");

    for round in 0..10 {
        let name = format!("same{round}");
        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let address = server.address();
                let name = name.clone();
                tokio::spawn(async move {
                    let mut client = common::TestClient::connect(&address).await?;
                    let reply = client.try_register(&name).await?;
                    anyhow::Ok((client, reply))
                })
            })
            .collect();

        let mut successes = 0;
        let mut errors = 0;
        let mut keep = Vec::new();
        for task in tasks {
            let (client, reply) = task.await.expect("join").expect("client");
            match reply {
                Reply::Success(_) => successes += 1,
                Reply::Error(text) => {
                    assert_eq!(text, "Username is already in use");
                    errors += 1;
                }
                other => panic!("unexpected {other:?}"),
            }
            keep.push(client);
        }
        assert_eq!((successes, errors), (1, 5), "round {round}");
        let owners = server
            .hub()
            .presence
            .names()
            .into_iter()
            .filter(|n| fold_name(n) == name)
            .count();
        assert_eq!(owners, 1);
    }
}

#[tokio::test]
async fn test_admin_login() {
    let server = TestServer::start().await.expect("start relay");

    let mut client = server.connect().await.expect("connect");
    client.send_raw("adminLogin admin--wrong").await.expect("send");
    assert_eq!(
        client.recv().await.expect("reply"),
        Reply::error("Invalid admin credentials")
    );
    client.send_raw("adminLogin admin").await.expect("send");
    assert!(matches!(client.recv().await.expect("reply"), Reply::Error(_)));

    let _admin = server.admin().await.expect("admin login");

    let mut second = server.connect().await.expect("connect");
    second
        .send_raw(&format!("adminLogin admin--{}", common::server::ADMIN_PASSWORD))
        .await
        .expect("send");
    assert_eq!(
        second.recv().await.expect("reply"),
        Reply::error("An admin is already logged in")
    );

    let mut impostor = server.connect().await.expect("connect");
    assert!(matches!(
        impostor.try_register("ADMIN").await.expect("reply"),
        Reply::Error(_)
    ));
}
