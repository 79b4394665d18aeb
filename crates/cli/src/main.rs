//! Mainline CLI - run a train dispatch simulation from a roster file.
//!
//! Usage: `mainline <input-file>`. Events are written to `output.txt`
//! in the working directory. Exit code is 0 on a completed run and
//! non-zero on any load or setup failure.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use mainline_sim::log::EventLog;
use mainline_sim::roster;
use mainline_sim::worker::{SimConfig, Simulation};

const OUTPUT_PATH: &str = "output.txt";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("mainline");
        eprintln!("Usage: {} <input-file>", program);
        return ExitCode::FAILURE;
    }

    let roster = match roster::load_path(&args[1]) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("Failed to load roster {}: {}", args[1], err);
            return ExitCode::FAILURE;
        }
    };

    let out = match File::create(OUTPUT_PATH) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot create {}: {}", OUTPUT_PATH, err);
            return ExitCode::FAILURE;
        }
    };
    let log = EventLog::new(Box::new(BufWriter::new(out)));

    let simulation = Simulation::new(SimConfig::default(), log);
    match simulation.run(&roster) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
