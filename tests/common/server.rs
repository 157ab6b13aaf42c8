//! Test relay management.
//!
//! Runs a relay inside the test's runtime on an ephemeral port.

use std::sync::Arc;

use parlor::config::Config;
use parlor::network::Relay;
use parlor::state::Hub;

use super::TestClient;

/// Admin password every test relay is configured with.
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "letmein";

/// A test relay instance.
pub struct TestServer {
    relay: Relay,
}

impl TestServer {
    /// Start a relay with test defaults on `127.0.0.1:0`.
    pub async fn start() -> anyhow::Result<Self> {
        Self::with_config(Config::default()).await
    }

    /// Start a relay with `config`, overriding the listen address and
    /// admin password.
    pub async fn with_config(mut config: Config) -> anyhow::Result<Self> {
        config.listen.address = "127.0.0.1:0".parse()?;
        config.admin.password = ADMIN_PASSWORD.to_string();
        let relay = Relay::start(&config).await?;
        Ok(Self { relay })
    }

    pub fn address(&self) -> String {
        self.relay.local_addr().to_string()
    }

    #[allow(dead_code)]
    pub fn hub(&self) -> &Arc<Hub> {
        self.relay.hub()
    }

    /// Connect a new, unregistered client.
    pub async fn connect(&self) -> anyhow::Result<TestClient> {
        TestClient::connect(&self.address()).await
    }

    /// Connect and register as `name`, failing the test on rejection.
    #[allow(dead_code)]
    pub async fn member(&self, name: &str) -> anyhow::Result<TestClient> {
        let mut client = self.connect().await?;
        client.register(name).await?;
        Ok(client)
    }

    /// Connect and log in as the admin.
    #[allow(dead_code)]
    pub async fn admin(&self) -> anyhow::Result<TestClient> {
        let mut client = self.connect().await?;
        client
            .send_raw(&format!("adminLogin admin--{ADMIN_PASSWORD}"))
            .await?;
        match client.recv().await? {
            parlor_proto::Reply::Success(_) => Ok(client),
            other => anyhow::bail!("admin login failed: {other:?}"),
        }
    }

    #[allow(dead_code)]
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.relay.shutdown().await?;
        Ok(())
    }
}
