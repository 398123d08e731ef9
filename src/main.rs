//! Binary entry point for the qtport CLI.
//!
//! ## Usage
//!
//! ```bash
//! # List callback registrations and widget declarations
//! qtport analyze src/toolkit.cpp
//!
//! # Convert a header and an implementation file
//! qtport convert-header inc/toolkit.h inc/toolkit_qt.h
//! qtport convert-impl src/toolkit.cpp src/toolkit_qt.cpp
//! ```
//!
//! Running without a command prints usage. An unknown command, an unknown
//! flag or a missing path prints a message; none of them is reported through
//! the exit status. Extra trailing paths are ignored.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};

use qtport::cli::{run_analyze, run_convert_header, run_convert_impl, OutputFormat, USAGE};
use qtport_core::error::PortError;
use qtport_core::output::{emit_response, ErrorResponse};
use qtport_core::pipeline::{ConvertOptions, DEFAULT_CALLBACK_PREFIX};

// ============================================================================
// CLI Structure
// ============================================================================

/// Convert FLTK callback code to Qt signals and slots.
#[derive(Parser, Debug)]
#[command(
    name = "qtport",
    version,
    about = "Convert FLTK callback code to Qt signals and slots",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Report format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: FormatArg,

    /// Receiving class for generated connections (default: class of the
    /// first constructor definition).
    #[arg(long = "class", global = true)]
    class_name: Option<String>,

    /// Prefix that marks callback names.
    #[arg(long, global = true, default_value = DEFAULT_CALLBACK_PREFIX)]
    callback_prefix: String,
}

impl GlobalArgs {
    fn options(&self) -> Result<ConvertOptions, PortError> {
        if self.callback_prefix.is_empty() {
            return Err(PortError::invalid_args("--callback-prefix must not be empty"));
        }
        if self.class_name.as_deref().is_some_and(str::is_empty) {
            return Err(PortError::invalid_args("--class must not be empty"));
        }
        Ok(ConvertOptions {
            class_name: self.class_name.clone(),
            callback_prefix: self.callback_prefix.clone(),
        })
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Progress lines (default).
    #[default]
    Text,
    /// JSON response.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Report callback registrations and widget declarations in a file.
    Analyze {
        /// File to analyze.
        file: Option<PathBuf>,
        #[arg(hide = true)]
        extra: Vec<String>,
    },
    /// Convert an FLTK header to Qt.
    ConvertHeader {
        /// FLTK header to read.
        input: Option<PathBuf>,
        /// Qt header to write.
        output: Option<PathBuf>,
        #[arg(hide = true)]
        extra: Vec<String>,
    },
    /// Convert an FLTK implementation file to Qt.
    ConvertImpl {
        /// FLTK implementation file to read.
        input: Option<PathBuf>,
        /// Qt implementation file to write.
        output: Option<PathBuf>,
        #[arg(hide = true)]
        extra: Vec<String>,
    },
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage_error(err),
    };

    init_tracing(cli.global.log_level);

    let format = OutputFormat::from(cli.global.format);
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, format);
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Help and version exit the usual clap way. Any other parse failure is
/// printed and the run ends normally, like a missing path.
fn report_usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {
            print!("{}", err.render());
            ExitCode::SUCCESS
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn report_error(err: &PortError, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let _ = emit_response(&ErrorResponse::new(err), &mut io::stdout());
            let _ = io::stdout().flush();
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", err);
        }
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), PortError> {
    let options = cli.global.options()?;
    let format = OutputFormat::from(cli.global.format);
    let mut stdout = io::stdout();

    match cli.command {
        None => {
            print!("{}", USAGE);
        }
        Some(Command::Analyze {
            file: Some(file), ..
        }) => {
            run_analyze(&file, &options, format, &mut stdout)?;
        }
        Some(Command::Analyze { file: None, .. }) => {
            println!("Error: Please provide file path");
        }
        Some(Command::ConvertHeader {
            input: Some(input),
            output: Some(output),
            ..
        }) => {
            run_convert_header(&input, &output, &options, format, &mut stdout)?;
        }
        Some(Command::ConvertImpl {
            input: Some(input),
            output: Some(output),
            ..
        }) => {
            run_convert_impl(&input, &output, &options, format, &mut stdout)?;
        }
        Some(Command::ConvertHeader { .. }) | Some(Command::ConvertImpl { .. }) => {
            println!("Error: Please provide input and output file paths");
        }
        Some(Command::Unknown(args)) => {
            let name = args.first().map(String::as_str).unwrap_or_default();
            println!("Error: Unknown command '{}'", name);
        }
    }
    Ok(())
}
