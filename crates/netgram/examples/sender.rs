//! Simple datagram sender using netgram.
//!
//! Sends one message per second to the receiver example.
//!
//! Run:
//! - cargo run -p netgram --example sender
//! - cargo run -p netgram --example sender -- 9000 "some message"

use std::{env, thread, time::Duration};

use netgram::UdpEndpoint;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let port: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(9000);
    let message = args.next().unwrap_or_else(|| "hello from netgram".to_string());

    let endpoint = UdpEndpoint::bind_any()?;
    endpoint.configure_remote_loopback(port)?;
    println!(
        "netgram sender on {} -> 127.0.0.1:{}",
        endpoint.local_addr()?,
        port
    );

    loop {
        let sent = endpoint.send(message.as_bytes())?;
        println!("[sent] {} bytes", sent);
        thread::sleep(Duration::from_secs(1));
    }
}
