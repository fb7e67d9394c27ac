//! Mixes short options with every argument policy, long options returning
//! values, long options writing into a flag cell and switching error
//! reporting off in the middle of a scan.
use std::cell::Cell;

use getopt_long::{Flag, HasArg, LongOpt, Scanner};
use tracing_subscriber::{fmt, EnvFilter};

const FROB_UNSET: i32 = -1;
const FROB_OFF: i32 = 0;
const FROB_ON: i32 = 1;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let frob = Cell::new(FROB_UNSET);
    let longopts = [
        LongOpt::new("foo", HasArg::No, 'a' as i32),
        LongOpt::new("bar", HasArg::Optional, 'b' as i32),
        LongOpt::new("baz", HasArg::Required, 'c' as i32),
        LongOpt::new("on", HasArg::No, FROB_ON).with_flag(&frob),
        LongOpt::new("off", HasArg::No, FROB_OFF).with_flag(&frob),
        LongOpt::new("silent", HasArg::No, 's' as i32),
    ];
    let mut scanner = match Scanner::from_env("ab::c:", &longopts) {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    };

    loop {
        let step = scanner.scan();
        match step.code() {
            -1 => break,
            0 => {
                let name = step
                    .long_index()
                    .map(|idx| longopts[idx].name())
                    .unwrap_or_default();
                println!("option '{}' changed frob state to '{}'", name, frob.get());
            }
            code if code == 'a' as i32 || code == 'b' as i32 || code == 'c' as i32 => {
                if let Some(param) = step.param() {
                    println!("option '{:#}' has argument '{}'", param, step.optarg());
                }
            }
            code if code == 's' as i32 => scanner.set_flag(Flag::ReportErrors, false),
            _ => {}
        }
    }

    if !scanner.remaining().is_empty() {
        println!("positional arguments: {}", scanner.remaining().join(" "));
    }
}
