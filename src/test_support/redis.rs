use anyhow::{Context, Result};
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use super::{runtime, unique_name};

const REDIS_PORT: u16 = 6379;

#[derive(Debug)]
pub struct RedisContainer {
    _container: ContainerAsync<GenericImage>,
    host_port: u16,
}

impl RedisContainer {
    /// Start a throwaway Redis server.
    ///
    /// # Errors
    /// Returns an error if the container fails to start or the port cannot be resolved.
    pub async fn start() -> Result<Self> {
        runtime::ensure_container_runtime()?;
        let container = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .with_container_name(unique_name("redis"))
            .start()
            .await
            .context("Failed to start Redis container")?;
        let host_port = container
            .get_host_port_ipv4(REDIS_PORT.tcp())
            .await
            .context("Failed to resolve Redis host port")?;

        Ok(Self {
            _container: container,
            host_port,
        })
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("redis://127.0.0.1:{}", self.host_port)
    }
}
