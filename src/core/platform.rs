//! Process-level entry helpers and error reporting.

/// Report a failed run and exit.
///
/// Inkscape shows whatever the extension wrote to stderr, so the full error
/// chain is printed there and the process exits with code 1, which tells
/// Inkscape to discard the document.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("layers2font failed:");
    eprintln!("{error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse command line arguments.
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    crate::core::cli::CliArgs::parse()
}
