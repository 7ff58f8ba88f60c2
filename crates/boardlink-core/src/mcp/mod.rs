//! MCP (Model Context Protocol) server implementation for Boardlink
//!
//! This module implements an MCP server that allows Claude Code and other
//! MCP-compatible AI assistants to compile, upload, and talk to Arduino
//! boards through arduino-cli and the OS serial driver.

pub mod server;

pub use server::{ArduinoBackend, BoardlinkMcpServer, CliBackend};
