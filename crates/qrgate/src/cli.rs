//! Clap derive structures for the `qrgate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qrgate -- QR sticker lookup and assignment for RME agents
#[derive(Debug, Parser)]
#[command(
    name = "qrgate",
    version,
    about = "Look up, scan and assign RME QR codes from the command line",
    long_about = "Resolve QR sticker codes typed by hand, pasted as landing URLs, \
        decoded from photos or scanned from a frame source, check whether they \
        are free, and bind them to verified businesses.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "QRGATE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// GraphQL endpoint URL (overrides profile)
    #[arg(long, short = 'e', env = "QRGATE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Agent session token
    #[arg(long, env = "QRGATE_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "QRGATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (default from profile, else 30)
    #[arg(long, env = "QRGATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a code (or its landing URL) is free to assign
    #[command(alias = "l")]
    Lookup(LookupArgs),

    /// Decode a QR code from a photo or screenshot
    Decode(DecodeArgs),

    /// Scan frames until a QR code is found
    Scan(ScanArgs),

    /// List codes available for assignment
    #[command(alias = "free")]
    Unassigned(UnassignedArgs),

    /// Assign a code to an already verified business
    Assign(AssignArgs),

    /// Verify a business (GSTIN + owner OTP) and assign a code to it
    Onboard(OnboardArgs),

    /// Log in as an agent and store the session token
    Login(LoginArgs),

    /// List business categories
    Categories,

    /// Manage field agent accounts (super admin)
    #[command(alias = "agent")]
    Agents(AgentsArgs),

    /// Generate printable QR code batches (super admin)
    Batch(BatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QR CODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Code or landing URL (e.g. https://rme.app/qr/code/ABC123)
    pub input: String,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Image file (PNG, JPEG, GIF, BMP, WebP), or `-` to read stdin
    pub image: PathBuf,

    /// Also look the decoded code up
    #[arg(long)]
    pub lookup: bool,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory of frames, replayed in file-name order
    #[arg(long, value_name = "DIR")]
    pub frames: PathBuf,

    /// Milliseconds between decode attempts (default from profile, else 300)
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS", default_value = "60")]
    pub max_wait: u64,

    /// Ask for the front-facing camera instead of the rear one
    #[arg(long)]
    pub front: bool,

    /// Also look the decoded code up
    #[arg(long)]
    pub lookup: bool,
}

#[derive(Debug, Args)]
pub struct UnassignedArgs {
    /// Max codes to list (default 100)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Code or landing URL to assign
    pub input: String,

    /// Id of a business that already completed verification
    #[arg(long, short = 'b')]
    pub business_id: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ONBOARDING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OnboardArgs {
    /// Business GSTIN
    #[arg(long, short = 'g')]
    pub gstin: String,

    /// Code or landing URL to assign (default: first unassigned code)
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Display name (default: prompt, suggested from the GSTIN record)
    #[arg(long)]
    pub display_name: Option<String>,

    /// Category id (default: prompt from `categories`)
    #[arg(long)]
    pub category: Option<i64>,

    /// Owner phone number (default: prompt)
    #[arg(long)]
    pub phone: Option<String>,

    /// Business email
    #[arg(long)]
    pub email: Option<String>,

    /// Owner OTP (default: prompt after details are submitted)
    #[arg(long)]
    pub otp: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoginRole {
    Agent,
    SuperAdmin,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Mobile number (10 digits get +91)
    #[arg(long)]
    pub phone: String,

    /// Role to log in as
    #[arg(long, default_value = "agent")]
    pub role: LoginRole,

    /// OTP, if already received (default: prompt)
    #[arg(long)]
    pub otp: Option<String>,

    /// Print the token instead of storing it in the keyring
    #[arg(long)]
    pub print_token: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMINISTRATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: AgentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    /// List field agents
    #[command(alias = "ls")]
    List,

    /// Create a field agent account
    Create {
        /// Agent name
        #[arg(long)]
        name: String,

        /// Mobile number (first 10 digits are used, +91 is added)
        #[arg(long)]
        phone: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,
    },

    /// Deactivate a field agent account
    Deactivate {
        /// Agent id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(subcommand)]
    pub command: BatchCommand,
}

#[derive(Debug, Subcommand)]
pub enum BatchCommand {
    /// Mint new codes and write one PNG per code
    Generate {
        /// Number of codes to mint
        #[arg(long, short = 'n', default_value = "50")]
        count: u32,

        /// Directory for `{code}.png` files
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: endpoint, token, token_env, timeout, scan_interval_ms
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a session token in the system keyring
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
