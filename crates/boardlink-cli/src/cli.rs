use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "boardlink")]
#[command(version, about = "Boardlink - Arduino MCP server and board toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Run the MCP server on stdio (default when no subcommand is given)
    Serve,

    /// List available serial ports
    Ports,

    /// Detect the FQBN of the board on a port
    Detect {
        /// Serial port address (e.g. /dev/ttyACM0)
        port: String,
    },

    /// Compile a sketch with arduino-cli
    Compile {
        /// Path to the sketch directory
        sketch: String,

        /// Fully qualified board name (auto-detected from --port when omitted)
        #[arg(long)]
        fqbn: Option<String>,

        /// Serial port used for FQBN auto-detection
        #[arg(long)]
        port: Option<String>,
    },

    /// Upload a sketch to the board on a port
    Upload {
        /// Path to the sketch directory
        sketch: String,

        /// Serial port the board is connected to
        #[arg(short, long)]
        port: String,

        /// Fully qualified board name (auto-detected when omitted)
        #[arg(long)]
        fqbn: Option<String>,
    },

    /// Send one line over serial and print the reply
    Send {
        /// Serial port address (e.g. /dev/ttyACM0)
        port: String,

        /// Message to send; a newline is appended
        message: String,

        /// Baud rate
        #[arg(long, default_value_t = 115200)]
        baud: u32,

        /// Seconds to wait for the reply
        #[arg(long, default_value_t = 2.0)]
        timeout: f64,
    },
}
