//! The example program from the `getopt_long(3)` manual page.
use getopt_long::{Error, HasArg, LongOpt, Outcome, Scanner};
use tracing_subscriber::{fmt, EnvFilter};

fn execute() -> Result<(), Error> {
    let longopts = [
        LongOpt::new("add", HasArg::Required, 0),
        LongOpt::new("append", HasArg::No, 0),
        LongOpt::new("delete", HasArg::Required, 0),
        LongOpt::new("verbose", HasArg::No, 0),
        LongOpt::new("create", HasArg::Required, 'c' as i32),
        LongOpt::new("file", HasArg::Required, 0),
    ];
    let mut scanner = Scanner::from_env("abc:d:012", &longopts)?;
    let mut digit_index = None;

    loop {
        let this_index = scanner.index();
        let step = scanner.scan();
        let (param, val) = match step.outcome() {
            Outcome::End => break,
            Outcome::Matched { param, val } => (param, *val),
            Outcome::Unrecognized(_) | Outcome::MissingArgument { .. } => continue,
            Outcome::MatchedFlag { .. } => return Err("unexpected flag option".into()),
        };

        if val == 0 {
            print!("option {:#}", param);
            if let Some(arg) = step.arg() {
                print!(" with arg {}", arg);
            }
            println!();
        } else if param.is_short('0') || param.is_short('1') || param.is_short('2') {
            if digit_index.is_some_and(|idx| idx != this_index) {
                println!("digits occur in two different argv-elements.");
            }
            digit_index = Some(this_index);
            println!("option {:#}", param);
        } else if param.is_short('a') || param.is_short('b') {
            println!("option {:#}", param);
        } else if param.is_either('c', "create") || param.is_short('d') {
            println!("option {:#} with value '{}'", param, step.string_value()?);
        } else {
            println!("?? scanner returned character code 0{:o} ??", val);
        }
    }

    if !scanner.remaining().is_empty() {
        println!("non-option ARGV-elements: {}", scanner.remaining().join(" "));
    }

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if let Err(err) = execute() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
