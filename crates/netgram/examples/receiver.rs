//! Simple datagram receiver using netgram.
//!
//! Run:
//! - cargo run -p netgram --example receiver
//! - cargo run -p netgram --example receiver -- 9000

use std::env;

use netgram::UdpEndpoint;

fn parse_port() -> Option<u16> {
    let mut args = env::args().skip(1);
    args.next().and_then(|s| s.parse().ok())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = parse_port().unwrap_or(9000);
    let endpoint = UdpEndpoint::bind(port, "")?;
    println!("netgram receiver listening on {}", endpoint.local_addr()?);

    loop {
        let datagram = endpoint.recv()?;
        println!(
            "[datagram] {} bytes: \"{}\"",
            datagram.len(),
            String::from_utf8_lossy(&datagram)
        );
    }
}
