// File: src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use std::path::PathBuf;

/// Parsed command line. Parsing is tolerant: unknown flags are collected
/// so the binary can refuse them with a usable message.
#[derive(Debug, Default)]
pub struct CliArgs {
    pub target: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub help: bool,
    pub unknown: Vec<String>,
}

impl CliArgs {
    /// Walks the raw argument list (binary name already stripped).
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut parsed = Self::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" | "help" => parsed.help = true,
                "-r" | "--root" => {
                    parsed.root = iter.next().map(PathBuf::from);
                }
                flag if flag.starts_with('-') => parsed.unknown.push(arg),
                _ => {
                    if parsed.target.is_none() {
                        parsed.target = Some(PathBuf::from(arg));
                    } else {
                        parsed.unknown.push(arg);
                    }
                }
            }
        }

        parsed
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "icsmend v{} - Repairs malformed iCalendar exports",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} <path/to/file.ics>", binary_name);
    println!("    {} <path/to/folder>", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for the config file.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("WHAT IT FIXES:");
    println!("    - Several complete VCALENDAR containers concatenated into one file");
    println!("    - Occurrences of one recurring series scattered over inconsistent UIDs");
    println!("    - Exact duplicate occurrences (same UID and start)");
    println!();
    println!("BEHAVIOR:");
    println!("    A folder is scanned non-recursively for .ics files. Before a file is");
    println!("    overwritten a sibling backup copy (original name + '.backup') is");
    println!("    created; without a backup the file is never touched. One broken file");
    println!("    does not stop the rest of a folder run.");
    println!();
    println!("EXAMPLES:");
    println!("    {} ~/Downloads/export.ics", binary_name);
    println!("    {} ~/calendars/", binary_name);
}
