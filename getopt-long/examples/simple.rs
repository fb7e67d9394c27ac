//! The smallest useful scanner: one short and one long option, both
//! requiring an argument.
use getopt_long::{HasArg, LongOpt, Outcome, Scanner};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let longopts = [LongOpt::new("foo", HasArg::Required, 0)];
    let mut scanner = match Scanner::from_env("a:", &longopts) {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    };

    while let Some(step) = scanner.next_step() {
        if let Outcome::Matched { param, .. } = step.outcome() {
            println!("option '{:#}' has argument '{}'", param, step.optarg());
        }
    }
}
