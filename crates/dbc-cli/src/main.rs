use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dbc_core::{
    check_all_declared_arguments, check_argument, check_declared_output, check_output,
    ConstraintSet, Error, Frame, Signature, TypeDescriptor, Value,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// DBC — design-by-contract checker
///
/// Check argument and return values against declared type contracts.
#[derive(Parser)]
#[command(name = "dbc", version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind arguments to a JSON signature and check every declared parameter
    Check {
        /// Path to a signature .json file
        signature: PathBuf,
        /// JSON array of positional arguments
        #[arg(long, default_value = "[]")]
        args: String,
        /// JSON return value to check against the declared return type
        #[arg(long)]
        returns: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single JSON value against a list of types
    Value {
        /// JSON value to check
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Comma-separated type names (int, float, str, bool, list, dict, null)
        #[arg(long, value_delimiter = ',', required = true)]
        types: Vec<String>,
        /// Parameter name; checks an argument when given, a return value otherwise
        #[arg(long)]
        param: Option<String>,
        /// Function name the diagnostic is attributed to
        #[arg(long, default_value = "main")]
        subject: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let exit_code = match cli.command {
        Commands::Check {
            signature,
            args,
            returns,
            json,
        } => run_check(&signature, &args, returns.as_deref())
            .map(|result| report(result, None, json))
            .unwrap_or_else(usage_error),
        Commands::Value {
            value,
            types,
            param,
            subject,
            json,
        } => run_value(&value, &types, param.as_deref(), &subject)
            .map(|(value, result)| report(result, Some(&value), json))
            .unwrap_or_else(usage_error),
        Commands::Version => {
            println!("dbc {} (dbc-core {})", env!("CARGO_PKG_VERSION"), dbc_core::VERSION);
            0
        }
    };

    process::exit(exit_code);
}

/// Install a stderr subscriber; RUST_LOG wins over `--log-level`
fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn run_check(path: &Path, args: &str, returns: Option<&str>) -> anyhow::Result<dbc_core::Result<()>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read signature {}", path.display()))?;
    let args: serde_json::Value = serde_json::from_str(args).context("--args is not valid JSON")?;
    let serde_json::Value::Array(args) = args else {
        bail!("--args must be a JSON array");
    };
    let returns = returns
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("--returns is not valid JSON")?;

    debug!(signature = %path.display(), arguments = args.len(), "checking call");
    Ok(check_call(&text, &args, returns.as_ref()))
}

fn check_call(
    signature: &str,
    args: &[serde_json::Value],
    returns: Option<&serde_json::Value>,
) -> dbc_core::Result<()> {
    let signature = Signature::from_json_str(signature)?;
    let frame = Frame::root(&signature, args.iter().map(Value::from_json).collect())?;
    check_all_declared_arguments(&frame)?;
    if let Some(out) = returns {
        check_declared_output(&frame, &Value::from_json(out))?;
    }
    Ok(())
}

fn run_value(
    value: &str,
    types: &[String],
    param: Option<&str>,
    subject: &str,
) -> anyhow::Result<(Value, dbc_core::Result<()>)> {
    let value: serde_json::Value = serde_json::from_str(value).context("value is not valid JSON")?;
    let value = Value::from_json(&value);
    let result = check_value(&value, types, param, subject);
    Ok((value, result))
}

fn check_value(value: &Value, types: &[String], param: Option<&str>, subject: &str) -> dbc_core::Result<()> {
    let descriptors = types
        .iter()
        .map(|name| {
            TypeDescriptor::lookup(name.trim())
                .ok_or_else(|| Error::Shape(format!("unknown type '{}'", name)))
        })
        .collect::<dbc_core::Result<Vec<_>>>()?;
    let constraints = ConstraintSet::any_of(descriptors)?;

    let signature = Signature::new(subject.to_string());
    let frame = Frame::root(&signature, Vec::new())?;
    match param {
        Some(parameter) => check_argument(&frame, value, parameter, &constraints),
        None => check_output(&frame, value, &constraints),
    }
}

// ── Output ────────────────────────────────────────────────

/// Print the outcome and map it to an exit code:
/// 0 = contract holds, 1 = violation, 2 = misuse
fn report(result: dbc_core::Result<()>, checked: Option<&Value>, json: bool) -> i32 {
    let code = match &result {
        Ok(()) => 0,
        Err(e) if e.is_violation() => 1,
        Err(_) => 2,
    };

    if json {
        let err = result.as_ref().err();
        let diagnostic = err.and_then(Error::diagnostic);
        let doc = serde_json::json!({
            "ok": err.is_none(),
            "kind": err.map(Error::kind),
            "message": err.map(ToString::to_string),
            "subject": diagnostic.map(|d| d.subject()),
            "parameter": diagnostic.and_then(|d| d.parameter()),
            "value": checked.map(Value::to_json),
        });
        println!("{:#}", doc);
        return code;
    }

    match result {
        Ok(()) => println!("{}", "ok".green().bold()),
        Err(e) if e.is_violation() => {
            eprintln!("{} {}", "violation:".red().bold(), e);
            if let Some(value) = checked {
                eprintln!("  {} {} ({})", "found:".dimmed(), value, value.type_name());
            }
        }
        Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
    }
    code
}

fn usage_error(err: anyhow::Error) -> i32 {
    debug!(error = ?err, "usage error");
    eprintln!("{} {:#}", "error:".red().bold(), err);
    2
}
