use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "license-decisions")]
#[command(about = "Record and review license compliance decisions for project dependencies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Decisions file (default: from Cargo.toml metadata, else doc/dependency_decisions.yml)
    #[arg(long, global = true)]
    pub decisions_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manually add or remove dependencies
    Dependencies {
        #[command(subcommand)]
        action: DependencyAction,
    },
    /// Set or clear the license of a dependency
    Licenses {
        #[command(subcommand)]
        action: LicenseAction,
    },
    /// Approve dependencies regardless of their license
    Approvals {
        #[command(subcommand)]
        action: ApprovalAction,
    },
    /// Licenses every dependency may use
    PermittedLicenses {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Licenses no dependency may use
    RestrictedLicenses {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Dependencies excluded from review
    IgnoredDependencies {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Dependency groups excluded from review
    IgnoredGroups {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Name shown in reports
    ProjectName {
        #[command(subcommand)]
        action: ProjectNameAction,
    },
    /// Decision files whose rules are merged into this one
    InheritedDecisions {
        #[command(subcommand)]
        action: InheritanceAction,
    },
    /// Record the homepage of a dependency
    Homepage {
        name: String,
        url: String,

        #[command(flatten)]
        txn: TxnArgs,
    },
    /// Show every recorded decision
    Show {
        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// List discovered dependencies that still need approval
    ActionItems {
        /// JSON array of discovered packages
        packages: PathBuf,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Exit with code 0 even when action items remain
        #[arg(long)]
        exit_zero: bool,
    },
}

/// Who, why and which versions a change applies to
#[derive(Args, Clone, Default)]
pub struct TxnArgs {
    /// Person responsible for the decision (default: $USER)
    #[arg(long)]
    pub who: Option<String>,

    /// Reason for the decision
    #[arg(long)]
    pub why: Option<String>,

    /// Restrict the decision to a version (repeatable)
    #[arg(long = "version", value_name = "VERSION")]
    pub versions: Vec<String>,
}

#[derive(Subcommand)]
pub enum DependencyAction {
    /// Add a dependency the scanners cannot find
    Add {
        name: String,
        license: String,
        package_version: Option<String>,

        /// Approve the dependency as well
        #[arg(long)]
        approve: bool,

        #[command(flatten)]
        txn: TxnArgs,
    },
    Remove {
        name: String,

        #[command(flatten)]
        txn: TxnArgs,
    },
    List,
}

#[derive(Subcommand)]
pub enum LicenseAction {
    Add {
        name: String,
        license: String,

        #[command(flatten)]
        txn: TxnArgs,
    },
    /// Remove one license, or every license when none is given
    Remove {
        name: String,
        license: Option<String>,

        #[command(flatten)]
        txn: TxnArgs,
    },
}

#[derive(Subcommand)]
pub enum ApprovalAction {
    Add {
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        txn: TxnArgs,
    },
    Remove {
        name: String,

        #[command(flatten)]
        txn: TxnArgs,
    },
}

#[derive(Subcommand)]
pub enum ListAction {
    Add {
        #[arg(required = true)]
        values: Vec<String>,

        #[command(flatten)]
        txn: TxnArgs,
    },
    Remove {
        #[arg(required = true)]
        values: Vec<String>,

        #[command(flatten)]
        txn: TxnArgs,
    },
    List,
}

#[derive(Subcommand)]
pub enum ProjectNameAction {
    Set {
        name: String,

        #[command(flatten)]
        txn: TxnArgs,
    },
    Remove {
        #[command(flatten)]
        txn: TxnArgs,
    },
    Show,
}

#[derive(Subcommand)]
pub enum InheritanceAction {
    /// Inherit from a local path or URL
    Add {
        location: String,

        /// Authorization header for a private URL; `$NAME` reads an environment variable
        #[arg(long)]
        auth: Option<String>,
    },
    /// Inherit from a decisions file shipped inside a library
    AddLibrary {
        library: String,
        path: String,
    },
    /// Stop inheriting from a source, written as `inherited-decisions list` shows it
    ///
    /// Library sources are listed as `LIBRARY:PATH`; `remove-library` takes them apart.
    Remove {
        location: String,
    },
    /// Stop inheriting from a library-embedded decisions file
    RemoveLibrary {
        library: String,
        path: String,
    },
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
