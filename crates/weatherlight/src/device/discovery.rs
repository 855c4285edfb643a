//! Finding lights on the local network.

use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::UdpSocket;

use super::{Device, DeviceDiscovery, DiscoveryError};

/// Multicast group and port bulbs answer searches on.
pub const SSDP_MULTICAST_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1982));

const SEARCH_REQUEST: &str = "M-SEARCH * HTTP/1.1\r\n\
HOST: 239.255.255.250:1982\r\n\
MAN: \"ssdp:discover\"\r\n\
ST: wifi_bulb\r\n";

/// Parse a search response into a device.
///
/// Only the `Location: yeelight://host:port` header is required.
pub fn parse_ssdp_response(response: &str) -> Option<Device> {
    let mut address = None;
    let mut id = None;
    let mut name = None;

    for line in response.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "location" => {
                address = value
                    .strip_prefix("yeelight://")
                    .and_then(|hostport| hostport.parse::<SocketAddr>().ok());
            }
            "id" if !value.is_empty() => id = Some(value.to_string()),
            "name" if !value.is_empty() => name = Some(value.to_string()),
            _ => {}
        }
    }

    address.map(|address| Device { address, id, name })
}

/// Distinct devices gathered from search replies.
#[derive(Debug, Default)]
struct ReplyCollector {
    seen: HashSet<SocketAddr>,
    devices: Vec<Device>,
}

impl ReplyCollector {
    /// Record one received datagram; returns `false` when receiving should stop.
    fn accept(&mut self, received: io::Result<(&[u8], SocketAddr)>) -> bool {
        let (datagram, from) = match received {
            Ok(received) => received,
            Err(e) => {
                log::warn!(
                    "Discovery receive failed, keeping {} light(s) found so far: {}",
                    self.devices.len(),
                    e
                );
                return false;
            }
        };

        let response = String::from_utf8_lossy(datagram);
        match parse_ssdp_response(&response) {
            Some(device) if self.seen.insert(device.address) => {
                log::info!("Found light {}", device);
                self.devices.push(device);
            }
            Some(device) => log::debug!("Duplicate reply from {}", device),
            None => log::debug!("Ignoring unrecognised reply from {}", from),
        }
        true
    }
}

/// Multicast search for bulbs, collecting replies until the timeout.
#[derive(Debug, Clone)]
pub struct SsdpDiscovery {
    target: SocketAddr,
    timeout: Duration,
}

impl SsdpDiscovery {
    pub fn new(timeout: Duration) -> Self {
        Self::with_target(SSDP_MULTICAST_ADDR, timeout)
    }

    /// Send the search to `target` instead of the multicast group.
    pub fn with_target(target: SocketAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

#[async_trait]
impl DeviceDiscovery for SsdpDiscovery {
    async fn discover(&self) -> Result<Vec<Device>, DiscoveryError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.send_to(SEARCH_REQUEST.as_bytes(), self.target).await?;
        log::info!("Searching for lights on {} ({:?})", self.target, self.timeout);

        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut collector = ReplyCollector::default();
        let mut buf = [0u8; 2048];

        loop {
            let received =
                match tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await {
                    Ok(received) => received,
                    Err(_) => break,
                };
            if !collector.accept(received.map(|(len, from)| (&buf[..len], from))) {
                break;
            }
        }

        Ok(collector.devices)
    }
}

/// Fixed device list from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    devices: Vec<Device>,
}

impl StaticDiscovery {
    pub fn new(addresses: impl IntoIterator<Item = SocketAddr>) -> Self {
        Self {
            devices: addresses.into_iter().map(Device::new).collect(),
        }
    }
}

#[async_trait]
impl DeviceDiscovery for StaticDiscovery {
    async fn discover(&self) -> Result<Vec<Device>, DiscoveryError> {
        Ok(self.devices.clone())
    }
}
