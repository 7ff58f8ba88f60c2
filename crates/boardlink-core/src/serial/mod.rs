//! Serial port enumeration and single-shot request/response transactions.
//!
//! One transaction at a time: open the port, write a newline-terminated
//! message, read back at most one line within the caller-supplied timeout.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio_serial::{
    SerialPortBuilderExt, SerialPortInfo, SerialPortType, SerialStream, available_ports,
};

const READ_CHUNK_BYTES: usize = 256;

/// A serial port as reported to MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortInfo {
    pub device: String,
    pub description: String,
    pub hwid: String,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (description, hwid) = describe_port_type(&info.port_type);
        Self {
            device: info.port_name,
            description,
            hwid,
        }
    }
}

fn describe_port_type(port_type: &SerialPortType) -> (String, String) {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let description = usb
                .product
                .clone()
                .or_else(|| usb.manufacturer.clone())
                .unwrap_or_else(|| "n/a".to_string());
            let mut hwid = format!("USB VID:PID={:04X}:{:04X}", usb.vid, usb.pid);
            if let Some(serial) = &usb.serial_number {
                hwid.push_str(&format!(" SER={serial}"));
            }
            (description, hwid)
        }
        SerialPortType::PciPort => ("PCI device".to_string(), "PCI".to_string()),
        SerialPortType::BluetoothPort => ("Bluetooth device".to_string(), "Bluetooth".to_string()),
        SerialPortType::Unknown => ("n/a".to_string(), "n/a".to_string()),
    }
}

/// Enumerate serial ports on the system.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = available_ports().map_err(|e| CoreError::PortList(e.to_string()))?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

fn open(port: &str, baud: u32) -> Result<SerialStream> {
    tokio_serial::new(port, baud)
        .open_native_async()
        .map_err(|e| CoreError::PortOpen {
            port: port.to_string(),
            reason: e.to_string(),
        })
}

/// Write a newline-terminated line to the port.
async fn write_line(stream: &mut SerialStream, message: &str) -> Result<()> {
    stream
        .write_all(message.as_bytes())
        .await
        .map_err(|e| CoreError::PortWrite(e.to_string()))?;
    stream
        .write_all(b"\n")
        .await
        .map_err(|e| CoreError::PortWrite(e.to_string()))?;
    stream
        .flush()
        .await
        .map_err(|e| CoreError::PortWrite(e.to_string()))
}

async fn read_until_newline<R>(stream: &mut R, buf: &mut Vec<u8>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK_BYTES];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        // Keep at most one line; bytes after the first newline belong to
        // the next transaction.
        match chunk[..n].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                buf.extend_from_slice(&chunk[..=pos]);
                return Ok(());
            }
            None => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Read one line from the stream, returning whatever arrived by the timeout.
async fn read_line<R>(stream: &mut R, timeout: Duration) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    match tokio::time::timeout(timeout, read_until_newline(stream, &mut buf)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(CoreError::PortRead(e.to_string())),
        // Timeout is not an error: mirror a blocking readline that ran out
        // of time and hand back the partial (possibly empty) buffer.
        Err(_) => {}
    }
    Ok(trim_reply(&buf))
}

fn trim_reply(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).trim().to_string()
}

/// Write a line and read one reply.
pub async fn send(port: &str, baud: u32, message: &str, timeout: Duration) -> Result<String> {
    let mut stream = open(port, baud)?;
    write_line(&mut stream, message).await?;
    read_line(&mut stream, timeout).await
}

/// Write a line without waiting for a reply.
pub async fn write(port: &str, baud: u32, message: &str) -> Result<String> {
    let mut stream = open(port, baud)?;
    write_line(&mut stream, message).await?;
    Ok(format!("Message sent successfully to {port}"))
}

/// Read one line without sending anything.
pub async fn read(port: &str, baud: u32, timeout: Duration) -> Result<String> {
    let mut stream = open(port, baud)?;
    read_line(&mut stream, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_serial::UsbPortInfo;

    #[test]
    fn usb_port_description_and_hwid() {
        let port_type = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x2341,
            pid: 0x0043,
            serial_number: Some("85736323".to_string()),
            manufacturer: Some("Arduino".to_string()),
            product: Some("Arduino Uno".to_string()),
        });
        let (description, hwid) = describe_port_type(&port_type);
        assert_eq!(description, "Arduino Uno");
        assert_eq!(hwid, "USB VID:PID=2341:0043 SER=85736323");
    }

    #[test]
    fn usb_port_without_product_falls_back() {
        let port_type = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x1A86,
            pid: 0x7523,
            serial_number: None,
            manufacturer: None,
            product: None,
        });
        let (description, hwid) = describe_port_type(&port_type);
        assert_eq!(description, "n/a");
        assert_eq!(hwid, "USB VID:PID=1A86:7523");
    }

    #[test]
    fn unknown_port_reports_na() {
        let (description, hwid) = describe_port_type(&SerialPortType::Unknown);
        assert_eq!(description, "n/a");
        assert_eq!(hwid, "n/a");
    }

    #[test]
    fn replies_are_trimmed() {
        assert_eq!(trim_reply(b"ECHO: hello\r\n"), "ECHO: hello");
        assert_eq!(trim_reply(b"  \r\n"), "");
        assert_eq!(trim_reply(b""), "");
    }

    #[test]
    fn reply_decoding_is_lossy() {
        assert_eq!(trim_reply(&[0xff, b'o', b'k', b'\n']), "\u{fffd}ok");
    }

    #[tokio::test]
    async fn read_stops_at_first_newline() {
        let mut input: &[u8] = b"ECHO: one\nECHO: two\n";
        let line = read_line(&mut input, Duration::from_secs(1)).await.unwrap();
        assert_eq!(line, "ECHO: one");
    }

    #[tokio::test]
    async fn read_returns_partial_line_at_eof() {
        let mut input: &[u8] = b"no newline";
        let line = read_line(&mut input, Duration::from_secs(1)).await.unwrap();
        assert_eq!(line, "no newline");
    }

    #[tokio::test]
    async fn open_nonexistent_port_fails() {
        let err = send("/dev/ttyBOGUS99", 115200, "hi", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PortOpen { .. }));
    }
}
