//! Human-facing console output. Diagnostics for operators go through
//! `tracing`; this is the short per-file status the scripts always printed.

use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::cli::AppContext;
use crate::xliff::ParseError;

/// `<label> <detail>` on stdout, unless `--quiet`.
pub fn status(
    ctx: &AppContext,
    label: &str,
    detail: impl Display,
) {
    if ctx.quiet {
        return;
    }
    if ctx.no_color {
        println!("{label} {detail}");
    } else {
        println!("{} {detail}", label.green().bold());
    }
}

/// Indented secondary line (counts, destinations).
pub fn detail(
    ctx: &AppContext,
    text: impl Display,
) {
    if ctx.quiet {
        return;
    }
    if ctx.no_color {
        println!("  {text}");
    } else {
        println!("  {}", text.dimmed());
    }
}

/// Problems are always shown, even with `--quiet`.
pub fn problem(
    ctx: &AppContext,
    text: impl Display,
) {
    if ctx.no_color {
        eprintln!("  ERROR: {text}");
    } else {
        eprintln!("  {} {text}", "ERROR:".red().bold());
    }
}

/// Render a parse failure with its source snippet.
pub fn parse_failure(err: ParseError) {
    tracing::error!(document = %err.name, error = %err.message, "parse failure");
    eprintln!("{:?}", miette::Report::new(err));
}
