//! `cargo xtask` entrypoint.

use std::process::ExitCode;

fn main() -> ExitCode {
    xtask::runtime::logging::init();
    xtask::exit_code(xtask::execute_from_env())
}
