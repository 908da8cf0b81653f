use clap::{Args, Parser, Subcommand};
use sbol::core::policy::NucleotidePolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "sbol - build, check and inspect SBOL core designs written as TOML manifests.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a design from a manifest and report consistency problems.
    Check(CheckArgs),
    /// Print the collection, component and annotation tree of a design.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the design manifest in TOML format.
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub deny_warnings: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path to the design manifest in TOML format.
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Where the model policy comes from, and per-switch overrides.
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Path to a model policy file in TOML format.
    #[arg(long, value_name = "PATH", conflicts_with = "strict")]
    pub policy: Option<PathBuf>,

    /// Start from the policy with every check turned on.
    #[arg(long)]
    pub strict: bool,

    /// Treat a repeated add of an equal member as an error.
    #[arg(long)]
    pub reject_duplicates: bool,

    #[command(flatten)]
    pub alphabet: AlphabetChoice,

    /// Reject display ids that are not letters, digits and underscores.
    #[arg(long)]
    pub check_display_ids: bool,

    /// Include precedes links when comparing annotations.
    #[arg(long)]
    pub compare_precedes: bool,

    /// Refuse precedes links that would close a cycle.
    #[arg(long)]
    pub forbid_cycles: bool,

    /// Refuse precedes links between annotations of different components.
    #[arg(long)]
    pub same_component_precedes: bool,
}

/// Mutually exclusive ways of choosing the nucleotide alphabet.
#[derive(Args, Debug, Default, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct AlphabetChoice {
    /// Accepted nucleotide symbols: iupac, canonical or unchecked.
    #[arg(long, value_name = "POLICY")]
    pub alphabet: Option<NucleotidePolicy>,
    /// Accept only A, C, G and T (same as --alphabet canonical).
    #[arg(long)]
    pub strict_alphabet: bool,
}

impl AlphabetChoice {
    pub fn resolve(&self) -> Option<NucleotidePolicy> {
        if self.strict_alphabet {
            Some(NucleotidePolicy::Canonical)
        } else {
            self.alphabet
        }
    }
}
