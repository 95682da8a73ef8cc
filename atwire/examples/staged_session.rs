//! Staged bring-up against a simulated BT840 module.
//!
//! Walks the POWER_UP -> CONFIG -> EXAMPLE stages a board application runs,
//! printing the captured text of every exchange and stopping at the first
//! stage that does not succeed.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --example staged_session
//! ```
//!
//! Pass `--fail-config` to make the simulated module reject the name change.

use std::env;

use atwire::profile::devices;
use atwire::session::{Outcome, SessionEngine};
use atwire::transport::ScriptedSink;

#[derive(Debug, Clone, Copy)]
enum Stage {
    PowerUp,
    Config,
    Example,
}

impl Stage {
    fn commands(&self) -> &'static [&'static str] {
        match self {
            Stage::PowerUp => &["AT", "ATE0"],
            Stage::Config => &["AT+NAME=atwire-demo", "AT+ADVINT=160"],
            Stage::Example => &["AT+ADVSTART"],
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let fail_config = env::args().any(|a| a == "--fail-config");

    let name_reply = if fail_config { "ERROR\r\n" } else { "OK\r\n" };
    let sink = ScriptedSink::new()
        .reply("ATE0", ["ATE0\r\n", "OK\r\n"])
        .reply("AT+NAME", [name_reply])
        .reply("AT+ADVINT", ["OK\r\n"])
        .reply_after("AT+ADVSTART", 40, ["OK\r\n", "+ADVERTISING\r\n"])
        .reply("AT", ["OK\r\n"]);

    let mut engine = SessionEngine::new(sink, devices::bt840::profile())?;

    for stage in [Stage::PowerUp, Stage::Config, Stage::Example] {
        println!("== {:?}", stage);

        let responses = engine.exchange_all(stage.commands()).await?;
        for response in &responses {
            println!("> {}", response.command);
            for line in response.lines() {
                println!("  {}", line);
            }
            println!("  ({:?}, {} ticks)", response.elapsed, response.ticks);
        }

        let last = responses.last().map(|r| &r.outcome);
        match last {
            Some(Outcome::Ok(_)) => continue,
            Some(Outcome::DeviceReported { token, .. }) => {
                eprintln!("Stage {:?} rejected by device ({})", stage, token);
            }
            Some(Outcome::Timeout { .. }) => eprintln!("Stage {:?} timed out", stage),
            Some(Outcome::Unknown { .. }) | None => eprintln!("Stage {:?} inconclusive", stage),
        }
        break;
    }

    println!("Wrote to module:\n{}", engine.sink().written_str());
    Ok(())
}
