//! Ping example

use v4link::LinkSession;

#[tokio::main]
async fn main() -> v4link::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("DEVICE_PORT").unwrap_or_else(|_| "/dev/ttyACM0".to_string());

    let mut link = LinkSession::open_target(&port, 115_200)?;
    link.connect().await?;

    println!("Connected to {}", port);

    let status = link.ping().await?;
    println!("PING: {}", status);

    link.disconnect().await?;

    Ok(())
}
