//! # Shader Stripper (Binary)
//!
//! Main executable entry point.

fn main() {
    std::process::exit(match stripper_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    });
}
