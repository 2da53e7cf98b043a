//! Build script for generating the `envpreserve` man pages.
//!
//! One page is rendered for the top-level command and one per subcommand
//! (`envpreserve-exec.1` and so on) into the build output directory.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir =
        PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR was not set")
        })?);

    let command = Cli::command();
    render_page(&out_dir, "envpreserve", command.clone())?;
    for subcommand in command.get_subcommands() {
        let name = format!("envpreserve-{}", subcommand.get_name());
        render_page(&out_dir, &name, subcommand.clone())?;
    }

    Ok(())
}

fn render_page(
    out_dir: &Path,
    name: &str,
    command: clap::Command,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;
    fs::write(out_dir.join(format!("{name}.1")), buffer)?;
    Ok(())
}
