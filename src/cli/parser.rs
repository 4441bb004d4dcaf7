use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// CLI application to check in, take breaks and verify office presence
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance tracking CLI: check-in with office location verification, work timer and break ledger",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Read the configuration from this file instead of the default one
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start today's work session
    Checkin {
        /// Work mode (office|wfh|client_site|field_work, or O/H/C/F)
        #[arg(long = "mode", short = 'm')]
        mode: Option<String>,

        #[arg(long = "lat", allow_hyphen_values = true, help = "Current latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", allow_hyphen_values = true, help = "Current longitude")]
        lon: Option<f64>,

        #[arg(long = "at", help = "Check-in time (HH:MM or YYYY-MM-DD HH:MM)")]
        at: Option<String>,
    },

    /// Close today's work session
    Checkout {
        #[arg(long = "at", help = "Check-out time (HH:MM or YYYY-MM-DD HH:MM)")]
        at: Option<String>,
    },

    /// Start or end a break
    Break {
        #[command(subcommand)]
        action: BreakCommand,
    },

    /// Show the current attendance status
    Status {
        #[arg(long = "lat", allow_hyphen_values = true, help = "Current latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", allow_hyphen_values = true, help = "Current longitude")]
        lon: Option<f64>,

        #[arg(long = "at", help = "Evaluate the status at this time")]
        at: Option<String>,

        #[arg(long = "json", help = "Print the status snapshot as JSON")]
        json: bool,

        #[arg(long = "watch", conflicts_with_all = ["at", "json"], help = "Refresh the status on every tick")]
        watch: bool,

        #[arg(long = "interval", help = "Seconds between refreshes (default: tick_interval_secs)")]
        interval: Option<u64>,

        #[arg(long = "count", help = "Stop after this many refreshes")]
        count: Option<u32>,
    },

    /// List the configured offices, with distances from a position
    Offices {
        #[arg(long = "lat", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long = "lon", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List sessions
    List {
        #[arg(long, short, help = "Filter by year/month/day, a custom range or 'all'")]
        period: Option<String>,
    },

    /// Export sessions or breaks
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute path of the output file")]
        file: String,

        #[arg(long, help = "Filter by year/month/day, a custom range or 'all'")]
        range: Option<String>,

        #[arg(long = "breaks", help = "Export break records instead of sessions")]
        breaks: bool,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum BreakCommand {
    /// Start a break
    Start {
        /// Break type (lunch|tea|meeting|personal|general)
        #[arg(long = "type", short = 't', default_value = "general")]
        kind: String,

        #[arg(long = "at", help = "Start time (HH:MM or YYYY-MM-DD HH:MM)")]
        at: Option<String>,
    },

    /// End the break in progress
    End {
        #[arg(long = "at", help = "End time (HH:MM or YYYY-MM-DD HH:MM)")]
        at: Option<String>,
    },
}
