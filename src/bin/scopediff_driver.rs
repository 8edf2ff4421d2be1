//! scopediff-driver binary — git merge driver protocol.
//!
//! Configure in git with:
//!
//! ```text
//! [merge "scopediff"]
//!     driver = scopediff-driver %O %A %B %A
//! ```
//!
//! Exit codes follow the merge driver convention: 0 when the conflict was
//! resolved and written to the output path, 1 when it was left unresolved,
//! 2 on usage or invocation failure.

use scopediff::merge::{resolve, MergeOptions, MergeOutcome, MergeRequest};
use std::path::Path;
use std::process::exit;
use std::{env, fs};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 4 {
        eprintln!("usage: scopediff-driver <base> <ours> <theirs> <output>");
        exit(2);
    }

    let request = match MergeRequest::from_paths(
        Path::new(&args[0]),
        Path::new(&args[1]),
        Path::new(&args[2]),
    ) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("scopediff-driver: {e}");
            exit(2);
        }
    };

    match resolve(&request, &MergeOptions::default()) {
        Ok(MergeOutcome::Resolved { body, .. }) => {
            if let Err(e) = fs::write(&args[3], body) {
                eprintln!("scopediff-driver: {}: {e}", args[3]);
                exit(2);
            }
            exit(0);
        }
        Ok(MergeOutcome::Unresolved) => exit(1),
        Err(e) => {
            eprintln!("scopediff-driver: {e}");
            exit(2);
        }
    }
}
