//! Clap derive structures for the `hydrawise` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hydrawise -- control Hydrawise irrigation controllers from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "hydrawise",
    version,
    about = "Control Hydrawise irrigation controllers from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "HYDRAWISE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// GraphQL endpoint URL (overrides profile)
    #[arg(long, env = "HYDRAWISE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// OAuth access token
    #[arg(long, env = "HYDRAWISE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HYDRAWISE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HYDRAWISE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the authenticated account
    #[command(alias = "me")]
    User,

    /// Manage irrigation controllers
    #[command(alias = "ctl", alias = "c")]
    Controllers(ControllersArgs),

    /// Manage watering zones
    #[command(alias = "z")]
    Zones(ZonesArgs),

    /// Manage zone suspensions
    Suspensions(SuspensionsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Argument Groups ───────────────────────────────────────────

/// Options for starting a run.
#[derive(Debug, Args)]
pub struct RunOpts {
    /// Record the run as if it came from the watering schedule
    #[arg(long)]
    pub scheduled: bool,

    /// Run length (e.g. "10m", "1h 30m"); defaults to the zone's own setting
    #[arg(long, short = 'd')]
    pub duration: Option<humantime::Duration>,
}

/// When a suspension ends: an absolute time or a length from now.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SuspendOpts {
    /// End time in RFC 3339 (e.g. 2030-06-01T08:00:00Z)
    #[arg(long)]
    pub until: Option<String>,

    /// Suspend for a duration from now (e.g. "3days", "12h")
    #[arg(long = "for", value_name = "DURATION")]
    pub for_duration: Option<humantime::Duration>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTROLLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ControllersArgs {
    #[command(subcommand)]
    pub command: ControllersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ControllersCommand {
    /// List the account's controllers
    #[command(alias = "ls")]
    List,

    /// Show one controller
    Get {
        /// Controller ID
        id: i64,
    },

    /// Start every zone on a controller
    StartAll {
        /// Controller ID
        id: i64,

        #[command(flatten)]
        run: RunOpts,
    },

    /// Stop every zone on a controller
    StopAll {
        /// Controller ID
        id: i64,
    },

    /// Suspend every zone on a controller
    SuspendAll {
        /// Controller ID
        id: i64,

        #[command(flatten)]
        when: SuspendOpts,
    },

    /// Resume every zone on a controller
    ResumeAll {
        /// Controller ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ZONES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ZonesArgs {
    #[command(subcommand)]
    pub command: ZonesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ZonesCommand {
    /// List a controller's zones
    #[command(alias = "ls")]
    List {
        /// Controller ID
        #[arg(long, short = 'c')]
        controller: i64,
    },

    /// Show one zone
    Get {
        /// Zone ID
        id: i64,
    },

    /// Start a zone
    Start {
        /// Zone ID
        id: i64,

        #[command(flatten)]
        run: RunOpts,
    },

    /// Stop a zone
    Stop {
        /// Zone ID
        id: i64,
    },

    /// Suspend a zone's schedule
    Suspend {
        /// Zone ID
        id: i64,

        #[command(flatten)]
        when: SuspendOpts,
    },

    /// Resume a suspended zone
    Resume {
        /// Zone ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUSPENSIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SuspensionsArgs {
    #[command(subcommand)]
    pub command: SuspensionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SuspensionsCommand {
    /// Delete one suspension from a zone
    #[command(alias = "rm")]
    Delete {
        /// Suspension ID
        id: i64,

        /// Zone the suspension belongs to
        #[arg(long, short = 'z')]
        zone: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration with secrets masked
    Show,

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
