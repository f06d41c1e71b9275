mod checker;
mod discover;
mod error;
mod external;
mod index;
mod issue;
mod navigation;
mod remote;
mod resolver;
mod scanner;
mod types;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use crate::checker::{Options, Report};

#[derive(Parser)]
#[command(
    name = "sitecheck",
    about = "Link and resource integrity checker for the static site",
    version
)]
struct Cli {
    /// Probe external http(s) links after the local pass (best-effort).
    #[arg(long)]
    check_external: bool,

    /// Validate project hrefs stored in Supabase against the local pages tree.
    #[arg(long)]
    check_projects: bool,

    /// Skip the admin/ pages tree.
    #[arg(long)]
    no_admin: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = Options {
        check_external: cli.check_external,
        check_projects: cli.check_projects,
        include_admin: !cli.no_admin,
    };

    match checker::run(Path::new("."), &options) {
        Ok(report) => report_outcome(&report, &options),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Print the run outcome: a one-line summary on success, the full issue
/// list with a total on failure. Exit code 0 iff zero issues.
fn report_outcome(report: &Report, options: &Options) -> ExitCode {
    if report.issues.is_empty() {
        println!(
            "OK: {} HTML file(s) scanned. No broken internal links/resources found.",
            report.scanned
        );
        if options.check_external && !report.external.is_empty() {
            println!("Checked {} external link(s).", report.external.len());
        }
        return ExitCode::SUCCESS;
    }

    eprintln!("Broken links/resources found:");
    eprintln!();
    for issue in &report.issues {
        eprintln!("- {issue}");
    }
    eprintln!();
    eprintln!("Total: {} issue(s)", report.issues.len());
    ExitCode::FAILURE
}
