//! Networked lights: discovery, flow translation and the LAN control protocol.

mod discovery;
mod flow;
mod yeelight;

use async_trait::async_trait;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

pub use discovery::{parse_ssdp_response, SsdpDiscovery, StaticDiscovery, SSDP_MULTICAST_ADDR};
pub use flow::{hsv_to_rgb, Flow, FlowAction, Transition};
pub use yeelight::{encode_command, YeelightController, DEFAULT_CONTROL_PORT};

/// A light found on the local network for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub address: SocketAddr,
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Device {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            id: None,
            name: None,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Failure of a single device. Never fatal for the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("device unreachable: {0}")]
    Unreachable(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("device task failed: {0}")]
    TaskFailed(String),
}

/// Failure of the discovery mechanism itself.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of the devices to drive in a run. An empty list is valid.
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    async fn discover(&self) -> Result<Vec<Device>, DiscoveryError>;
}

/// Command sink for a light.
#[async_trait]
pub trait LightController: Send + Sync {
    async fn power_on(&self, device: &Device) -> Result<(), DeviceError>;

    async fn start_flow(&self, device: &Device, flow: &Flow) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_name() {
        let mut device = Device::new("192.168.1.20:55443".parse().unwrap());
        assert_eq!(device.to_string(), "192.168.1.20:55443");
        device.name = Some("desk".to_string());
        assert_eq!(device.to_string(), "desk (192.168.1.20:55443)");
    }
}
