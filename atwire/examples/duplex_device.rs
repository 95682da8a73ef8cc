//! Talk to a fake ExpressLink module over an in-process byte pipe.
//!
//! The "module" runs as a tokio task on the far end of `tokio::io::duplex`,
//! answering each line the way a real module would, including a slow
//! `AT+CONNECT`. The session side uses `StreamSink`, exactly as it would
//! with a serial port stream.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example duplex_device -- --timeout 3
//! ```

use std::env;
use std::time::Duration;

use atwire::SessionBuilder;
use atwire::transport::StreamSink;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let (uart, module_end) = tokio::io::duplex(1024);
    let module = tokio::spawn(fake_module(module_end));

    let mut session = SessionBuilder::new()
        .profile("expresslink")
        .timeout(Duration::from_secs(args.timeout))
        .build(StreamSink::new(uart))?;

    for command in ["AT", "AT+CONF? About", "AT+CONNECT", "AT+SEND1 hello"] {
        let response = session.exchange(command).await?;
        println!(
            "{:<18} -> {:?} in {:?}",
            command,
            response.text().trim(),
            response.elapsed
        );
    }

    session
        .exchange_hidden("AT+CONF Passphrase=correct-horse")
        .await?;

    drop(session);
    module.await?;
    Ok(())
}

/// Line-oriented responder standing in for the module firmware.
async fn fake_module(stream: DuplexStream) {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let reply = match line.trim() {
            "AT" => "OK\n".to_string(),
            "AT+CONF? About" => "OK atwire fake module v0.1\n".to_string(),
            "AT+CONNECT" => {
                tokio::time::sleep(Duration::from_millis(800)).await;
                "OK 1 CONNECTED\n".to_string()
            }
            cmd if cmd.starts_with("AT+SEND") => "ERR14 UNABLE TO CONNECT\n".to_string(),
            cmd if cmd.starts_with("AT+CONF ") => "OK\n".to_string(),
            _ => "ERR3 COMMAND NOT FOUND\n".to_string(),
        };
        if writer.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut timeout = 5u64;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(5);
                    }
                }
                "--help" => {
                    println!("USAGE:\n    cargo run --example duplex_device -- [--timeout <SECS>]");
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self { timeout }
    }
}
