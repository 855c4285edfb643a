//! In-memory collaborators for run and orchestrator tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use weatherlight::device::{
    Device, DeviceDiscovery, DeviceError, DiscoveryError, Flow, LightController,
};
use weatherlight::weather::{ForecastSample, ForecastSource, SourceError};

pub fn device(last_octet: u8) -> Device {
    Device::new(SocketAddr::from(([192, 168, 1, last_octet], 55443)))
}

pub fn sample(precip: u8, rain: u8, snow: u8, temp: f64) -> ForecastSample {
    ForecastSample {
        precipitation_probability: precip,
        heavy_rain_probability: rain,
        heavy_snow_probability: snow,
        feels_like_temp: temp,
    }
}

/// Forecast source returning fixed samples, or failing when `None`
pub struct FakeSource {
    pub samples: Option<Vec<ForecastSample>>,
}

#[async_trait]
impl ForecastSource for FakeSource {
    async fn fetch(&self) -> Result<Vec<ForecastSample>, SourceError> {
        self.samples.clone().ok_or(SourceError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// Discovery returning fixed devices, or failing when `None`
pub struct FakeDiscovery {
    pub devices: Option<Vec<Device>>,
}

#[async_trait]
impl DeviceDiscovery for FakeDiscovery {
    async fn discover(&self) -> Result<Vec<Device>, DiscoveryError> {
        self.devices.clone().ok_or_else(|| {
            DiscoveryError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "no multicast route",
            ))
        })
    }
}

/// How a fake device reacts to commands
#[derive(Debug, Clone)]
pub enum Behavior {
    Fail(DeviceError),
    Hang,
    Panic,
    Delay(Duration),
}

/// Controller recording every command it receives
#[derive(Default)]
pub struct RecordingController {
    behaviors: HashMap<SocketAddr, Behavior>,
    pub calls: Mutex<Vec<(SocketAddr, String)>>,
    pub flows: Mutex<Vec<Flow>>,
}

impl RecordingController {
    pub fn with(mut self, device: &Device, behavior: Behavior) -> Self {
        self.behaviors.insert(device.address, behavior);
        self
    }

    pub fn calls_for(&self, device: &Device) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(address, _)| *address == device.address)
            .map(|(_, method)| method.clone())
            .collect()
    }

    async fn act(&self, device: &Device, method: &str) -> Result<(), DeviceError> {
        self.calls
            .lock()
            .unwrap()
            .push((device.address, method.to_string()));

        match self.behaviors.get(&device.address).cloned() {
            Some(Behavior::Fail(e)) => Err(e),
            Some(Behavior::Hang) => std::future::pending().await,
            Some(Behavior::Panic) => panic!("bulb firmware exploded"),
            Some(Behavior::Delay(d)) => {
                tokio::time::sleep(d).await;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LightController for RecordingController {
    async fn power_on(&self, device: &Device) -> Result<(), DeviceError> {
        self.act(device, "power_on").await
    }

    async fn start_flow(&self, device: &Device, flow: &Flow) -> Result<(), DeviceError> {
        self.flows.lock().unwrap().push(flow.clone());
        self.act(device, "start_flow").await
    }
}
