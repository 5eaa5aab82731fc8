//! Clap derive structures for the `rackbook` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rackbook -- terminal client for datacenter inventory and runbooks
#[derive(Debug, Parser)]
#[command(
    name = "rackbook",
    version,
    about = "Browse datacenter inventory and runbooks from the command line",
    long_about = "A terminal client for the Rackbook documentation server.\n\n\
        Browse the company / datacenter / object tree, read and edit runbook\n\
        pages, and attach documents without leaving the shell.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "RACKBOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "RACKBOOK_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (bypasses the stored session)
    #[arg(long, env = "RACKBOOK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RACKBOOK_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "RACKBOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "RACKBOOK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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

// ── Shared Value Enums ───────────────────────────────────────────────

/// Runbook page section, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SectionArg {
    /// General overview
    Overview,
    /// Related links
    Links,
    /// Architecture notes
    Arch,
    /// Network notes
    Net,
    /// Incident history
    Inc,
    /// Attached documents
    Docs,
}

/// Inventory object kind filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Service,
    Server,
    Network,
}

/// Object health status filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Ok,
    Warn,
    Bad,
    Unknown,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, sign out, and inspect the current session
    Auth(AuthArgs),

    /// Show the company / datacenter / object tree
    #[command(alias = "t")]
    Tree(TreeArgs),

    /// List companies without the datacenter tree
    #[command(alias = "co")]
    Companies,

    /// Browse inventory objects
    #[command(alias = "obj", alias = "o")]
    Objects(ObjectsArgs),

    /// Read and edit runbook pages
    #[command(alias = "pg")]
    Pages(PagesArgs),

    /// List and attach documents
    Docs(DocsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and store the session
    Login {
        /// Username (prompted for when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in identity, verified against the server
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TREE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Only show companies whose name contains this text
    #[arg(long)]
    pub company: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OBJECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ObjectsArgs {
    #[command(subcommand)]
    pub command: ObjectsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ObjectsCommand {
    /// List objects across the whole tree
    #[command(alias = "ls")]
    List(ObjectsListArgs),

    /// Show one object with pages, relations, documents, and incidents
    #[command(alias = "get")]
    Show {
        /// Object id (see `objects list`)
        object: i64,
    },
}

#[derive(Debug, Args)]
pub struct ObjectsListArgs {
    /// Only objects of this kind
    #[arg(long)]
    pub kind: Option<KindArg>,

    /// Only objects with this status
    #[arg(long)]
    pub status: Option<StatusArg>,

    /// Only objects whose name or IP contains this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Only objects under companies whose name contains this text
    #[arg(long)]
    pub company: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PAGES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PagesArgs {
    #[command(subcommand)]
    pub command: PagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PagesCommand {
    /// Print a page's markdown
    #[command(alias = "cat")]
    Show {
        /// Object id the page belongs to
        object: i64,

        /// Page section
        #[arg(value_enum, default_value = "overview")]
        section: SectionArg,
    },

    /// Edit a page in $EDITOR (or from a file) and save it back
    Edit {
        /// Object id the page belongs to
        object: i64,

        /// Page section
        #[arg(value_enum, default_value = "overview")]
        section: SectionArg,

        /// Take the new content from this file instead of opening $EDITOR
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOCS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DocsArgs {
    #[command(subcommand)]
    pub command: DocsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DocsCommand {
    /// List the documents attached to an object
    #[command(alias = "ls")]
    List {
        /// Object id
        object: i64,
    },

    /// Attach a link or upload a file
    Add {
        /// Object id
        object: i64,

        /// Document title
        #[arg(long, short = 't')]
        title: String,

        /// External URL (makes a link document)
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Local file to upload (makes a file document)
        #[arg(long)]
        file: Option<PathBuf>,
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
    /// Interactive wizard to create or update a profile
    Init,

    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Store a bearer token in the system keyring for a profile
    SetToken {
        /// Profile to store the token for (defaults to the active profile)
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
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
