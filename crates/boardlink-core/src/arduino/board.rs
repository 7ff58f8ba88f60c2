//! Board detection via `arduino-cli board list`.
//!
//! Maps detected ports to their FQBNs so compile/upload can run without the
//! caller naming the board explicitly.

use crate::arduino::cli::ArduinoCli;
use crate::error::{CoreError, Result};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{info, warn};

/// Parsed output of `arduino-cli board list --format json`.
#[derive(Debug, Default, Deserialize)]
pub struct BoardListReport {
    #[serde(default)]
    pub detected_ports: Vec<DetectedPort>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetectedPort {
    #[serde(default)]
    pub port: PortAddress,
    #[serde(default)]
    pub matching_boards: Vec<MatchingBoard>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchingBoard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fqbn: Option<String>,
}

impl BoardListReport {
    /// First FQBN reported for the given port address, if any.
    pub fn fqbn_for(&self, port: &str) -> Option<&str> {
        self.detected_ports
            .iter()
            .filter(|detected| detected.port.address == port)
            .flat_map(|detected| detected.matching_boards.iter())
            .find_map(|board| board.fqbn.as_deref())
    }
}

/// Port-to-FQBN cache, primed once at startup and filled lazily afterwards.
#[derive(Debug, Default)]
pub struct FqbnCache {
    map: DashMap<String, String>,
}

impl FqbnCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, port: &str) -> Option<String> {
        self.map.get(port).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, port: impl Into<String>, fqbn: impl Into<String>) {
        self.map.insert(port.into(), fqbn.into());
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Populate the cache from one board list call and log a detection summary.
    pub async fn prime(&self, cli: &ArduinoCli) -> Result<()> {
        let report = cli.board_list().await?;
        self.prime_from(&report);
        Ok(())
    }

    pub fn prime_from(&self, report: &BoardListReport) {
        info!("Arduino board detection summary:");
        for detected in &report.detected_ports {
            let port = &detected.port.address;
            if port.is_empty() {
                continue;
            }
            let mut found = false;
            for board in &detected.matching_boards {
                if let Some(fqbn) = &board.fqbn {
                    self.map.insert(port.clone(), fqbn.clone());
                    info!(port = %port, fqbn = %fqbn, "detected board");
                    found = true;
                }
            }
            if !found {
                warn!(port = %port, "no FQBN detected; board may be unrecognized or missing a core package");
            }
        }
    }

    /// Detect the FQBN for a port, consulting the cache before arduino-cli.
    pub async fn detect(&self, cli: &ArduinoCli, port: &str) -> Result<String> {
        if let Some(fqbn) = self.get(port) {
            return Ok(fqbn);
        }

        let report = cli.board_list().await?;
        if let Some(fqbn) = report.fqbn_for(port) {
            self.map.insert(port.to_string(), fqbn.to_string());
            return Ok(fqbn.to_string());
        }

        Err(CoreError::FqbnDetection(port.to_string()))
    }
}
