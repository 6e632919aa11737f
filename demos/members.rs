use slamp_rs::{ClientConfig, WebClient};
use tracing_subscriber::EnvFilter;

// Lists the members of a channel, resolving each member ID into a full user.
//
//   SLAMP_TOKEN=xoxb-... cargo run --example members -- C0B67RUE7
#[tokio::main]
async fn main() -> slamp_rs::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let channel_id = std::env::args().nth(1).unwrap_or_else(|| "C0B67RUE7".to_owned());
    let client = WebClient::from_config(ClientConfig::load()?)?;

    let channel = client.get_channel(&channel_id).await?;
    let members = channel.members().await?;

    println!("#{} has {} members", channel.name()?, members.len());
    for member in &members {
        println!("  {} ({})", member.name()?, member.real_name()?.unwrap_or("-"));
    }
    Ok(())
}
