//! Stable Marriage - Binary Entry Point
//!
//! ```text
//! marriages              random instance of size 4
//! marriages 5            random instance of size 5
//! marriages 3-hhJSYYA    decode an instance code
//! marriages 3 63         canonical instance at ordinal 63
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::process::ExitCode;

use stable_marriage::printed::summary;
use stable_marriage::{Instance, MatchError, MatchingEngine, PrintedInstance};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SIZE: usize = 4;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Instance selected by the command line, with a header line describing it.
fn load_instance(args: &[String]) -> Result<Option<(Instance, String)>, String> {
    let bad_number = |arg: &str| format!("`{arg}` is not a number");

    match args {
        [] => {
            let instance = Instance::random(DEFAULT_SIZE);
            let header = format!("code: {}", instance.encode());
            Ok(Some((instance, header)))
        }
        [single] if single.contains('-') => {
            let instance = Instance::decode(single).map_err(|e| e.to_string())?;
            Ok(Some((instance, format!("code: {single}"))))
        }
        [single] => {
            let size: usize = single.parse().map_err(|_| bad_number(single))?;
            let instance = Instance::random(size);
            let header = format!("code: {}", instance.encode());
            Ok(Some((instance, header)))
        }
        [size, ordinal, ..] => {
            let size: usize = size.parse().map_err(|_| bad_number(size))?;
            let ordinal: i128 = ordinal.parse().map_err(|_| bad_number(ordinal))?;
            let count = Instance::count(size).map_err(|e| e.to_string())?;
            match Instance::from_ordinal(size, ordinal) {
                Ok(instance) => {
                    let header = format!(
                        "ord: {ordinal} of {count}\ncode: {}",
                        instance.encode()
                    );
                    Ok(Some((instance, header)))
                }
                Err(MatchError::OrdinalOutOfRange { .. }) => Ok(None),
                Err(e) => Err(e.to_string()),
            }
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (instance, header) = match load_instance(&args) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            println!("no instance");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("===========================================");
    println!("  Stable Marriage - size {}", instance.size());
    println!("===========================================");
    println!("{header}");
    println!();

    let printed = PrintedInstance::new(&instance);
    println!("{}", printed.print());

    let mut engine = MatchingEngine::new(&instance);
    let best = engine.solve();
    println!("{}", printed.print_matching(&best));
    println!("{}", summary(&best));
    println!();

    let all = engine.quick_all_stable();
    info!(
        stable = all.len(),
        proposals = engine.proposals(),
        breaks = engine.breaks_attempted(),
        "enumeration complete"
    );
    println!("{} stable matching(s):", all.len());
    println!();
    print!("{}", printed.print_ranked(&all));

    ExitCode::SUCCESS
}
