//! MCP server exposing Arduino board operations as tools.
//!
//! Every tool is a direct pass-through: compile/upload delegate to
//! arduino-cli, the serial tools perform one transaction against the OS
//! serial driver. Failures from either are reported verbatim as tool errors.

use crate::arduino::{ArduinoCli, FqbnCache};
use crate::serial::{self, PortInfo};
use crate::validate;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::schema_for_type,
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    schemars::{self, JsonSchema},
    service::{RequestContext, RoleServer},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{stdin, stdout};

/// Boardlink MCP Server
///
/// Exposes port enumeration, sketch compile/upload, and serial round-trips
/// via the MCP protocol.
#[derive(Clone)]
pub struct BoardlinkMcpServer {
    backend: Arc<dyn ArduinoBackend>,
}

/// Backend seam for the MCP tools.
///
/// The production implementation shells out to arduino-cli and opens real
/// serial ports; tests substitute a fake.
#[async_trait::async_trait]
pub trait ArduinoBackend: Send + Sync {
    async fn list_ports(&self) -> Result<Vec<PortInfo>, String>;
    async fn detect_fqbn(&self, port: &str) -> Result<String, String>;
    async fn compile(&self, fqbn: &str, sketch: &str) -> Result<String, String>;
    async fn upload(&self, sketch: &str, port: &str, fqbn: &str) -> Result<String, String>;
    async fn serial_send(
        &self,
        port: &str,
        baud: u32,
        message: &str,
        timeout: Duration,
    ) -> Result<String, String>;
    async fn serial_write(&self, port: &str, baud: u32, message: &str) -> Result<String, String>;
    async fn serial_read(&self, port: &str, baud: u32, timeout: Duration)
    -> Result<String, String>;
}

/// Production backend: arduino-cli plus the OS serial driver.
pub struct CliBackend {
    cli: ArduinoCli,
    fqbns: FqbnCache,
}

impl CliBackend {
    pub fn new(cli: ArduinoCli) -> Self {
        Self {
            cli,
            fqbns: FqbnCache::new(),
        }
    }

    /// Prime the FQBN cache from one `board list` call, logging the summary.
    /// Detection failure is not fatal; tools fall back to live detection.
    pub async fn prime(&self) {
        match self.fqbns.prime(&self.cli).await {
            Ok(()) if self.fqbns.is_empty() => {
                tracing::info!("No boards with a known FQBN detected");
            }
            Ok(()) => {}
            Err(e) => tracing::warn!("Failed to prime board cache: {e}"),
        }
    }
}

#[async_trait::async_trait]
impl ArduinoBackend for CliBackend {
    async fn list_ports(&self) -> Result<Vec<PortInfo>, String> {
        serial::list_ports().map_err(|e| e.to_string())
    }

    async fn detect_fqbn(&self, port: &str) -> Result<String, String> {
        self.fqbns
            .detect(&self.cli, port)
            .await
            .map_err(|e| e.to_string())
    }

    async fn compile(&self, fqbn: &str, sketch: &str) -> Result<String, String> {
        self.cli
            .compile(fqbn, sketch)
            .await
            .map_err(|e| e.to_string())
    }

    async fn upload(&self, sketch: &str, port: &str, fqbn: &str) -> Result<String, String> {
        self.cli
            .upload(sketch, port, fqbn)
            .await
            .map_err(|e| e.to_string())
    }

    async fn serial_send(
        &self,
        port: &str,
        baud: u32,
        message: &str,
        timeout: Duration,
    ) -> Result<String, String> {
        serial::send(port, baud, message, timeout)
            .await
            .map_err(|e| e.to_string())
    }

    async fn serial_write(&self, port: &str, baud: u32, message: &str) -> Result<String, String> {
        serial::write(port, baud, message)
            .await
            .map_err(|e| e.to_string())
    }

    async fn serial_read(
        &self,
        port: &str,
        baud: u32,
        timeout: Duration,
    ) -> Result<String, String> {
        serial::read(port, baud, timeout)
            .await
            .map_err(|e| e.to_string())
    }
}

impl BoardlinkMcpServer {
    /// Create a server backed by the given arduino-cli handle.
    pub fn new(cli: ArduinoCli) -> Self {
        Self::with_backend(Arc::new(CliBackend::new(cli)))
    }

    /// Create a server with a custom backend.
    pub fn with_backend(backend: Arc<dyn ArduinoBackend>) -> Self {
        Self { backend }
    }

    /// Run the MCP server using stdio transport.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Starting Boardlink MCP server...");
        let server = self.serve(stdio()).await?;
        tracing::info!("MCP server initialized, waiting for requests...");
        server.waiting().await?;
        Ok(())
    }
}

/// Create stdio transport for MCP communication
fn stdio() -> (tokio::io::Stdin, tokio::io::Stdout) {
    (stdin(), stdout())
}

// ============================================================================
// Tool Parameter Types
// ============================================================================

/// Parameters for the compile tool
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CompileParams {
    /// Path to the sketch directory (e.g. "sketches/echo_serial")
    pub sketch: String,
    /// Fully qualified board name (e.g. "arduino:avr:uno"); auto-detected from port when omitted
    #[serde(default)]
    pub fqbn: Option<String>,
    /// Serial port used to auto-detect the FQBN when it is not given
    #[serde(default)]
    pub port: Option<String>,
}

/// Parameters for the upload tool
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UploadParams {
    /// Path to the sketch directory (e.g. "sketches/echo_serial")
    pub sketch: String,
    /// Serial port the board is connected to (e.g. "/dev/ttyACM0")
    pub port: String,
    /// Fully qualified board name; auto-detected from the port when omitted
    #[serde(default)]
    pub fqbn: Option<String>,
}

/// Parameters for the serial_send tool
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SerialSendParams {
    /// Serial port to open (e.g. "/dev/ttyACM0")
    pub port: String,
    /// Baud rate (e.g. 9600, 115200)
    pub baud: u32,
    /// Message to send; a newline is appended
    pub message: String,
    /// Seconds to wait for the reply
    #[serde(default = "default_serial_timeout")]
    pub timeout: f64,
}

/// Parameters for the serial_write tool
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SerialWriteParams {
    /// Serial port to open (e.g. "/dev/ttyACM0")
    pub port: String,
    /// Baud rate (e.g. 9600, 115200)
    pub baud: u32,
    /// Message to send; a newline is appended
    pub message: String,
}

/// Parameters for the serial_read tool
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SerialReadParams {
    /// Serial port to open (e.g. "/dev/ttyACM0")
    pub port: String,
    /// Baud rate (e.g. 9600, 115200)
    pub baud: u32,
    /// Seconds to wait for a line
    #[serde(default = "default_serial_timeout")]
    pub timeout: f64,
}

/// Empty parameters (for tools with no parameters)
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EmptyParams {}

fn default_serial_timeout() -> f64 {
    2.0
}

/// Convert a caller-supplied timeout into a Duration.
/// Negative values clamp to zero; non-finite or oversized values are
/// rejected rather than allowed to panic the serving task.
fn serial_timeout(secs: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(secs.max(0.0)).map_err(|_| format!("Invalid timeout: {secs}"))
}

// ============================================================================
// Tool Implementations
// ============================================================================

impl BoardlinkMcpServer {
    async fn resolve_fqbn(
        &self,
        fqbn: Option<String>,
        port: Option<&str>,
        operation: &str,
    ) -> Result<String, String> {
        match fqbn {
            Some(fqbn) => Ok(fqbn),
            None => match port {
                Some(port) => self.backend.detect_fqbn(port).await,
                None => Err(format!(
                    "Either fqbn or port must be provided for {operation}."
                )),
            },
        }
    }

    async fn handle_list_ports(&self) -> Result<String, String> {
        let ports = self
            .backend
            .list_ports()
            .await
            .map_err(|e| format!("Failed to list ports: {e}"))?;

        serde_json::to_string_pretty(&ports).map_err(|e| format!("Failed to serialize ports: {e}"))
    }

    async fn handle_ping(&self) -> Result<String, String> {
        Ok("pong".to_string())
    }

    async fn handle_compile(&self, params: CompileParams) -> Result<String, String> {
        let fqbn = self
            .resolve_fqbn(params.fqbn, params.port.as_deref(), "compile")
            .await?;
        validate::ensure_fqbn(&fqbn).map_err(|e| e.to_string())?;
        validate::ensure_sketch_exists(&params.sketch).map_err(|e| e.to_string())?;

        self.backend.compile(&fqbn, &params.sketch).await
    }

    async fn handle_upload(&self, params: UploadParams) -> Result<String, String> {
        let fqbn = self
            .resolve_fqbn(params.fqbn, Some(&params.port), "upload")
            .await?;
        validate::ensure_fqbn(&fqbn).map_err(|e| e.to_string())?;
        validate::ensure_sketch_exists(&params.sketch).map_err(|e| e.to_string())?;
        validate::ensure_port(&params.port).map_err(|e| e.to_string())?;

        self.backend.upload(&params.sketch, &params.port, &fqbn).await
    }

    async fn handle_serial_send(&self, params: SerialSendParams) -> Result<String, String> {
        validate::ensure_port(&params.port).map_err(|e| e.to_string())?;
        let timeout = serial_timeout(params.timeout)?;

        self.backend
            .serial_send(&params.port, params.baud, &params.message, timeout)
            .await
    }

    async fn handle_serial_write(&self, params: SerialWriteParams) -> Result<String, String> {
        validate::ensure_port(&params.port).map_err(|e| e.to_string())?;

        self.backend
            .serial_write(&params.port, params.baud, &params.message)
            .await
    }

    async fn handle_serial_read(&self, params: SerialReadParams) -> Result<String, String> {
        validate::ensure_port(&params.port).map_err(|e| e.to_string())?;
        let timeout = serial_timeout(params.timeout)?;

        self.backend
            .serial_read(&params.port, params.baud, timeout)
            .await
    }
}

fn parse_params<T: DeserializeOwned>(
    arguments: Option<serde_json::Map<String, Value>>,
) -> Result<T, McpError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))
}

impl ServerHandler for BoardlinkMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "boardlink".to_string(),
                title: Some("Boardlink MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Boardlink MCP Server - Compile, upload, and talk to Arduino boards. \
                Use list_ports to find connected boards, compile/upload to build and flash \
                sketches via arduino-cli (FQBN is auto-detected from the port when omitted), \
                and serial_send/serial_write/serial_read for newline-delimited serial I/O."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "list_ports",
                "List all available USB/serial ports on the system. Returns device, description, and hardware ID for each port.",
                schema_for_type::<EmptyParams>(),
            ),
            Tool::new(
                "ping",
                "Simple health check to verify the MCP server is running. Always returns \"pong\".",
                schema_for_type::<EmptyParams>(),
            ),
            Tool::new(
                "compile",
                "Compile an Arduino sketch with arduino-cli. If fqbn is not provided it is auto-detected from the port. Returns the compiler output verbatim.",
                schema_for_type::<CompileParams>(),
            ),
            Tool::new(
                "upload",
                "Upload a compiled Arduino sketch to the board on the given port. If fqbn is not provided it is auto-detected. Returns the uploader output verbatim.",
                schema_for_type::<UploadParams>(),
            ),
            Tool::new(
                "serial_send",
                "Write a newline-terminated message to a serial port and read one reply line, waiting up to the timeout.",
                schema_for_type::<SerialSendParams>(),
            ),
            Tool::new(
                "serial_write",
                "Write a newline-terminated message to a serial port without reading a response.",
                schema_for_type::<SerialWriteParams>(),
            ),
            Tool::new(
                "serial_read",
                "Read one line from a serial port without sending anything. Returns an empty string on timeout.",
                schema_for_type::<SerialReadParams>(),
            ),
        ];

        Ok(ListToolsResult {
            meta: None,
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let result = match request.name.as_ref() {
            "list_ports" => self.handle_list_ports().await,
            "ping" => self.handle_ping().await,
            "compile" => {
                let params: CompileParams = parse_params(request.arguments)?;
                self.handle_compile(params).await
            }
            "upload" => {
                let params: UploadParams = parse_params(request.arguments)?;
                self.handle_upload(params).await
            }
            "serial_send" => {
                let params: SerialSendParams = parse_params(request.arguments)?;
                self.handle_serial_send(params).await
            }
            "serial_write" => {
                let params: SerialWriteParams = parse_params(request.arguments)?;
                self.handle_serial_write(params).await
            }
            "serial_read" => {
                let params: SerialReadParams = parse_params(request.arguments)?;
                self.handle_serial_read(params).await
            }
            other => {
                return Err(McpError::invalid_params(
                    format!("Unknown tool: {other}"),
                    None,
                ));
            }
        };

        match result {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(error) => Ok(CallToolResult::error(vec![Content::text(error)])),
        }
    }
}
