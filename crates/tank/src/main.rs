//! # Tank CLI
//!
//! The `tank` binary is a thin client of the `tankapp` library. Each
//! subcommand maps to one API call; the result is printed to stdout as a
//! JSON envelope.
//!
//! ```text
//! tank [--root DIR] [--config FILE] [--log-file FILE] [-v] <command>
//!
//!   create [JSON]            add a fish          {"status", "roomID"}
//!   list [--hide-deleted]    all fish by name    {"<name>": {...}, ...}
//!   get NAME                 one fish            {...}
//!   update [JSON]            merge attributes    {"status", "info"}
//!   delete NAME              remove a fish       {"status"}
//!   sweep                    remove orphans      {"status", "removedUnits", ...}
//!   noop [JSON]              echo parsed input   {"status": "noop", "input"}
//! ```
//!
//! JSON arguments are read from stdin when omitted.
//!
//! ## Failures
//!
//! A failed operation prints `{"status", "error": {"message"}, "path"?}` to
//! stdout, its status class (`400`, `404`, `409` or `500`) to stderr, and
//! exits with code 1. Problems outside an operation (unreadable config,
//! unreadable stdin) print `Error: ...` to stderr and also exit with 1.
//!
//! Diagnostics use `env_logger`: warnings by default, debug with `-v`, or
//! whatever `RUST_LOG` says.

mod cli;

fn main() {
    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
