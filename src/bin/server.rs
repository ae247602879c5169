//! Food Forge HTTP server binary.
//! Run with: cargo run --bin food-forge-server

use std::process::ExitCode;

use food_forge::start_food_forge;

fn main() -> ExitCode {
    start_food_forge::run()
}
