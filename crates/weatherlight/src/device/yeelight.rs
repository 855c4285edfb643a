//! Yeelight LAN control: one JSON command per line over TCP.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::{Device, DeviceError, Flow, LightController};

/// TCP port bulbs listen on for control commands.
pub const DEFAULT_CONTROL_PORT: u16 = 55443;

/// Fade used when powering on.
const POWER_ON_FADE_MS: u32 = 500;

/// Encode a command as a CRLF-terminated JSON line.
pub fn encode_command(id: u32, method: &str, params: Value) -> String {
    let mut line = json!({ "id": id, "method": method, "params": params }).to_string();
    line.push_str("\r\n");
    line
}

/// Interpret one response line for the command `id`.
///
/// Returns `None` for lines that belong to something else, such as the
/// `props` notifications bulbs push to every connected client.
fn parse_response(line: &str, id: u32) -> Option<Result<(), DeviceError>> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(Err(DeviceError::Protocol(format!(
                "invalid response {:?}: {}",
                line, e
            ))))
        }
    };

    if value.get("id").and_then(Value::as_u64) != Some(u64::from(id)) {
        return None;
    }

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        return Some(Err(DeviceError::Protocol(format!("{} (code {})", message, code))));
    }

    if value.get("result").is_some() {
        Some(Ok(()))
    } else {
        Some(Err(DeviceError::Protocol(format!(
            "response without result: {}",
            line
        ))))
    }
}

/// Controller speaking the Yeelight LAN protocol.
///
/// Each command uses its own connection; bulbs limit concurrent clients and
/// drop idle ones.
#[derive(Debug)]
pub struct YeelightController {
    connect_timeout: Duration,
    next_id: AtomicU32,
}

impl YeelightController {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            next_id: AtomicU32::new(1),
        }
    }

    async fn send(
        &self,
        address: SocketAddr,
        method: &str,
        params: Value,
    ) -> Result<(), DeviceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| DeviceError::Unreachable(format!("connect to {} timed out", address)))?
            .map_err(|e| DeviceError::Unreachable(format!("connect to {}: {}", address, e)))?;

        let (reader, mut writer) = stream.into_split();
        let command = encode_command(id, method, params);
        log::debug!("{} <- {}", address, command.trim_end());
        writer
            .write_all(command.as_bytes())
            .await
            .map_err(|e| DeviceError::Protocol(format!("write failed: {}", e)))?;

        let mut lines = BufReader::new(reader).lines();
        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| DeviceError::Protocol(format!("read failed: {}", e)))?
                .ok_or_else(|| {
                    DeviceError::Protocol(format!("connection closed before reply to {}", method))
                })?;
            log::debug!("{} -> {}", address, line);

            if let Some(result) = parse_response(&line, id) {
                return result;
            }
        }
    }
}

impl Default for YeelightController {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl LightController for YeelightController {
    async fn power_on(&self, device: &Device) -> Result<(), DeviceError> {
        self.send(
            device.address,
            "set_power",
            json!(["on", "smooth", POWER_ON_FADE_MS]),
        )
        .await
    }

    async fn start_flow(&self, device: &Device, flow: &Flow) -> Result<(), DeviceError> {
        self.send(
            device.address,
            "start_cf",
            json!([flow.state_changes(), flow.action as u8, flow.expression()]),
        )
        .await
    }
}
