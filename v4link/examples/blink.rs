//! Blink the on-board LED with a generated program

use std::time::Duration;

use v4link::{LinkSession, StatusExt, samples};

#[tokio::main]
async fn main() -> v4link::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("DEVICE_PORT").unwrap_or_else(|_| "/dev/ttyACM0".to_string());

    // Five blinks at 200 ms take about two seconds on the device
    let mut link = LinkSession::open_target(&port, 115_200)?.with_timeout(Duration::from_secs(5));
    link.connect().await?;

    let program = samples::blink(7, 5, 200);
    println!("Sending {}:\n{}", program, program.disassemble());

    link.exec(&program).await?.ensure_ok()?;
    println!("Blink done");

    // Leave the VM clean for the next run
    println!("RESET: {}", link.reset().await?);

    link.disconnect().await?;

    Ok(())
}
