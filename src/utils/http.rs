use anyhow::Result;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub fn create_client(user_agent: &str) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(25))
        .pool_max_idle_per_host(2)
        .build()?;

    Ok(client)
}
