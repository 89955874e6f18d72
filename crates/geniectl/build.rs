use std::fs;
use std::path::PathBuf;

use clap::CommandFactory;

// Pull in cli.rs directly -- it only depends on clap + clap_complete (both
// listed as build-dependencies), so it compiles without the rest of the
// crate.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .expect("OUT_DIR not set by Cargo")
        .into();
    let man_path = out_dir.join("geniectl.1");

    let mut buf = Vec::new();
    clap_mangen::Man::new(cli::Cli::command())
        .render(&mut buf)
        .expect("failed to render man page");
    fs::write(&man_path, buf)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", man_path.display()));
}
