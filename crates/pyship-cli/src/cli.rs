use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand};

pub const PYSHIP_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const PYSHIP_BEFORE_HELP: &str = concat!(
    "pyship ",
    env!("CARGO_PKG_VERSION"),
    " – Release automation for Python packages\n\n",
    "\x1b[1;36mPipeline\x1b[0m\n",
    "  check            Verify version and README consistency before releasing.\n",
    "  clean            Remove dist/, build/, and *.egg-info output.\n",
    "  build            Produce the sdist and wheel with python -m build.\n",
    "  verify           Validate built artifacts with twine check.\n",
    "  publish          Upload dist/ artifacts with twine (asks first).\n",
    "  release          Run every step in order: check, clean, build, verify, publish.\n",
);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = PYSHIP_BEFORE_HELP,
    help_template = PYSHIP_HELP_TEMPLATE
)]
pub struct PyshipCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandCli {
    #[command(
        about = "Check version and README consistency without touching files.",
        override_usage = "pyship check [--version-file PATH] [--readme-heading TEXT]",
        after_help = "Examples:\n  pyship check\n  pyship check --version-file src/demo_pkg/version.py\n"
    )]
    Check(CheckArgs),
    #[command(
        about = "Remove dist/, build/, and *.egg-info from the project tree.",
        override_usage = "pyship clean [--dry-run]",
        after_help = "Examples:\n  pyship clean\n  pyship clean --dry-run\n"
    )]
    Clean(CleanArgs),
    #[command(
        about = "Build the sdist and wheel into dist/ (installs build tools first).",
        override_usage = "pyship build [--skip-tools] [--dry-run]",
        after_help = "Examples:\n  pyship build\n  pyship build --skip-tools\n"
    )]
    Build(BuildArgs),
    #[command(
        about = "Run twine check against everything in dist/.",
        override_usage = "pyship verify [--dry-run]",
        after_help = "Example:\n  pyship verify\n"
    )]
    Verify(VerifyArgs),
    #[command(
        about = "Upload dist/ artifacts with twine; prompts unless --yes.",
        override_usage = "pyship publish [--registry NAME] [--yes] [--dry-run]",
        after_help = "Examples:\n  pyship publish --dry-run\n  PYSHIP_ONLINE=1 pyship publish --yes\n  PYSHIP_ONLINE=1 pyship publish --registry testpypi\n"
    )]
    Publish(PublishArgs),
    #[command(
        about = "Run the full pipeline: check, clean, build, verify, publish.",
        override_usage = "pyship release [--registry NAME] [--yes] [--skip-tools] [--dry-run]",
        after_help = "Examples:\n  pyship release --dry-run\n  PYSHIP_ONLINE=1 pyship release\n"
    )]
    Release(ReleaseArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(
        long,
        value_parser = value_parser!(PathBuf),
        value_name = "PATH",
        help = "Explicit version file (defaults to the package's version.py or __init__.py)"
    )]
    pub version_file: Option<PathBuf>,
    #[arg(
        long,
        value_name = "TEXT",
        help = "README heading whose section must match across variants (default: \"## Features\")"
    )]
    pub readme_heading: Option<String>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[arg(long, help = "List what would be removed without deleting anything")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[arg(
        long,
        help = "Skip `pip install --user --upgrade build twine` before building"
    )]
    pub skip_tools: bool,
    #[arg(long, help = "Print the planned commands without running them")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(long, help = "List the artifacts that would be checked")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    #[arg(
        long,
        value_name = "NAME",
        help = "Target registry: pypi (default), testpypi, a host, or an upload URL"
    )]
    pub registry: Option<String>,
    #[arg(short = 'y', long, help = "Upload without asking for confirmation")]
    pub yes: bool,
    #[arg(long, help = "Show what would be uploaded without contacting the registry")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    #[arg(
        long,
        value_name = "NAME",
        help = "Target registry: pypi (default), testpypi, a host, or an upload URL"
    )]
    pub registry: Option<String>,
    #[arg(short = 'y', long, help = "Upload without asking for confirmation")]
    pub yes: bool,
    #[arg(
        long,
        help = "Skip `pip install --user --upgrade build twine` before building"
    )]
    pub skip_tools: bool,
    #[arg(long, help = "Run the pipeline without executing external tools")]
    pub dry_run: bool,
}
