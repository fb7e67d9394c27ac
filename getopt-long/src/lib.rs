//! This crate implements a command line scanner following the `getopt_long`
//! contract.  Options are described the classic way, with a short option
//! specification string and a table of long options, and the scanner steps
//! through the command line one option at a time.
//!
//! Unlike the C interface there is no global state.  Every scan uses its own
//! [`Scanner`] and every call returns a [`Step`] that carries everything the
//! call produced: what was found, the option argument and the position of
//! the scanner.
//!
//! # Example
//!
//! ```
//! use getopt_long::{HasArg, LongOpt, Scanner};
//!
//! let longopts = [
//!     LongOpt::new("number", HasArg::Required, 'n' as i32),
//!     LongOpt::new("shout", HasArg::No, 's' as i32),
//! ];
//! let mut scanner = Scanner::new(["prog", "-n23", "--shout", "file"], "n:", &longopts);
//!
//! let mut numbers = Vec::<i32>::new();
//! let mut shout = false;
//! while let Some(step) = scanner.next_step() {
//!     match step.code() {
//!         c if c == 'n' as i32 => numbers.push(step.value()?),
//!         c if c == 's' as i32 => shout = true,
//!         _ => return Err(step.error().unwrap_or_else(|| "unexpected option".into())),
//!     }
//! }
//!
//! assert_eq!(numbers, [23]);
//! assert!(shout);
//! assert_eq!(scanner.remaining(), ["file"]);
//! # Ok::<(), getopt_long::Error>(())
//! ```
//!
//! Here is what's happening:
//!
//! * [`Scanner::new`] takes the full command line (the first element is
//!   the program name), the short option specification and the long option
//!   table.
//! * [`Scanner::next_step`] yields one [`Step`] per option until the end
//!   of the options is reached.  [`Scanner::scan`] does the same but
//!   returns the end as a step of its own.
//! * [`Step::code`] gives the classic integer result, [`Step::outcome`] the
//!   same information as an enum.
//! * [`Step::value`] parses the option argument with [`FromStr`].
//! * [`Scanner::remaining`] returns the positional arguments once the scan
//!   is over.
//!
//! # Behavior
//!
//! * Scanning stops at the first positional argument.  The command line is
//!   never permuted, so options following a positional argument are left
//!   alone.
//! * `--` ends the options.  It is consumed exactly once and everything
//!   after it is left untouched.
//! * A lone `-` is a positional argument.
//! * Short options can be clustered (`-abc`).  An option taking an argument
//!   consumes the rest of the cluster (`-ofile`).
//! * Long options are matched by exact name.  Values are attached with `=`
//!   (`--output=file`) or, for required arguments, given as the next
//!   argument (`--output file`).
//! * Optional arguments must always be attached.
//!
//! # Error Handling
//!
//! Errors don't stop the scanner.  Unknown options and missing arguments
//! are reported as [`Outcome::Unrecognized`] and [`Outcome::MissingArgument`]
//! and the scanner is ready for the next call.  Unless disabled with
//! [`Flag::ReportErrors`] or a leading `:` in the short specification, a
//! diagnostic line is also written to the error stream (stderr by default,
//! see [`Scanner::with_diagnostics`]).  If you would rather deal with errors
//! as values, [`Scanner::try_next`] turns them into [`Error`]s.
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::iter::once;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, trace};

mod error;
mod options;

pub use crate::error::{Error, ErrorKind};
pub use crate::options::{HasArg, LongOpt, ShortSpec};

/// Names an option.
///
/// Displays as `-c` or `--name`; the alternate form (`{:#}`) leaves off the
/// dashes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    /// A single character option (`-c`).
    Short(char),
    /// A long option (`--name`), without the leading dashes.
    Long(String),
}

impl Param {
    /// Is this a specific short option?
    pub fn is_short(&self, c: char) -> bool {
        match self {
            Param::Short(r) => c == *r,
            Param::Long(_) => false,
        }
    }

    /// Is this a specific long option?
    pub fn is_long(&self, name: &str) -> bool {
        match self {
            Param::Long(s) => s == name,
            Param::Short(_) => false,
        }
    }

    /// Is this either the given short or long option?
    pub fn is_either(&self, c: char, name: &str) -> bool {
        self.is_short(c) || self.is_long(name)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, f.alternate()) {
            (Param::Short(c), false) => write!(f, "-{}", c),
            (Param::Long(name), false) => write!(f, "--{}", name),
            (Param::Short(c), true) => write!(f, "{}", c),
            (Param::Long(name), true) => write!(f, "{}", name),
        }
    }
}

/// Scanner behavior flags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// When set the scanner still accepts options.
    ///
    /// This is unset once `--` was consumed and set again by
    /// [`Scanner::set_index`].
    ///
    /// **Default:** flag is set
    OptionsEnabled,
    /// When set, errors are written to the diagnostic stream.
    ///
    /// A short specification starting with `:` silences the scanner no
    /// matter what this flag says.
    ///
    /// **Default:** flag is set
    ReportErrors,
    /// When set, diagnostics are prefixed with the program name
    /// (`prog: invalid option -- x`).
    ///
    /// **Default:** flag is unset
    PrefixProgramName,
}

impl Flag {
    fn as_u8(self) -> u8 {
        match self {
            Flag::OptionsEnabled => 1,
            Flag::ReportErrors => 2,
            Flag::PrefixProgramName => 4,
        }
    }
}

/// What a single call to [`Scanner::scan`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A known option was matched.
    ///
    /// For short options `val` is the character code, for long options it's
    /// the value of the [`LongOpt`].
    Matched { param: Param, val: i32 },
    /// A long option with a flag cell was matched and `val` was stored in
    /// the cell.
    MatchedFlag { param: Param, val: i32 },
    /// The option is not known.
    Unrecognized(Param),
    /// The option requires an argument but there is none.
    ///
    /// `silent` is set if error reporting was off.
    MissingArgument { param: Param, silent: bool },
    /// There are no more options.
    End,
}

/// The result of one scanning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    outcome: Outcome,
    arg: Option<String>,
    index: usize,
    long_index: Option<usize>,
}

impl Step {
    /// Returns what was found.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Consumes the step and returns what was found.
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Returns `true` if the end of the options was reached.
    pub fn is_end(&self) -> bool {
        matches!(self.outcome, Outcome::End)
    }

    /// Returns the option this step is about.
    pub fn param(&self) -> Option<&Param> {
        match self.outcome {
            Outcome::Matched { ref param, .. }
            | Outcome::MatchedFlag { ref param, .. }
            | Outcome::Unrecognized(ref param)
            | Outcome::MissingArgument { ref param, .. } => Some(param),
            Outcome::End => None,
        }
    }

    /// The argument consumed for the option, if any.
    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }

    /// The argument consumed for the option or an empty string.
    pub fn optarg(&self) -> &str {
        self.arg().unwrap_or_default()
    }

    /// The index of the next unconsumed argument after this step.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The position of the matched long option in the option table.
    ///
    /// This is also set when a known long option is missing its argument.
    pub fn long_index(&self) -> Option<usize> {
        self.long_index
    }

    /// Returns the classic `getopt_long` return code.
    ///
    /// That's `-1` at the end of options, the character code of a short
    /// option, the value of a long option, `0` for a long option with a
    /// flag cell, `'?'` for errors and `':'` for a missing argument when
    /// error reporting is off.
    pub fn code(&self) -> i32 {
        match self.outcome {
            Outcome::Matched { val, .. } => val,
            Outcome::MatchedFlag { .. } => 0,
            Outcome::Unrecognized(_) => '?' as i32,
            Outcome::MissingArgument { silent: true, .. } => ':' as i32,
            Outcome::MissingArgument { silent: false, .. } => '?' as i32,
            Outcome::End => -1,
        }
    }

    /// Converts an error outcome into an [`Error`].
    pub fn error(&self) -> Option<Error> {
        match self.outcome {
            Outcome::Unrecognized(ref param) => {
                Some(Error::new(ErrorKind::UnrecognizedOption).with_param(param.clone()))
            }
            Outcome::MissingArgument { ref param, .. } => {
                Some(Error::new(ErrorKind::MissingArgument).with_param(param.clone()))
            }
            _ => None,
        }
    }

    /// Returns the option argument, failing if there is none.
    pub fn string_value(&self) -> Result<&str, Error> {
        self.arg()
            .ok_or_else(|| self.attach_param(Error::new(ErrorKind::MissingArgument)))
    }

    /// Parses the option argument with [`FromStr`].
    pub fn value<V>(&self) -> Result<V, Error>
    where
        V: FromStr,
        V::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        let value = self.string_value()?;
        V::from_str(value).map_err(|err| {
            self.attach_param(
                Error::new(ErrorKind::InvalidValue)
                    .with_value(value.to_string())
                    .with_source(err.into()),
            )
        })
    }

    fn attach_param(&self, err: Error) -> Error {
        match self.param() {
            Some(param) => err.with_param(param.clone()),
            None => err,
        }
    }
}

/// Marks a required argument that could not be found.
struct ArgumentMissing;

/// Steps through a command line `getopt_long` style.
///
/// The scanner owns the command line and borrows the option descriptions.
/// Each call to [`scan`](Self::scan) handles one option.  For basic
/// instructions consult the crate documentation.
pub struct Scanner<'a> {
    args: Vec<String>,
    short: ShortSpec<'a>,
    long: &'a [LongOpt<'a>],
    index: usize,
    offset: usize,
    flags: u8,
    last_error: Option<Param>,
    diagnostics: Box<dyn Write + 'a>,
}

impl fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("prog", &self.raw_prog())
            .field("index", &self.index)
            .field("offset", &self.offset)
            .field("finished", &self.finished())
            .finish()
    }
}

impl<'a> Scanner<'a> {
    /// Creates a scanner for the command line of the current process.
    ///
    /// Fails if an argument is not valid unicode.
    pub fn from_env(short: &'a str, long: &'a [LongOpt<'a>]) -> Result<Scanner<'a>, Error> {
        Scanner::from_os_cmdline(std::env::args_os(), short, long)
    }

    /// Creates a scanner for a split command line of raw OS strings.
    ///
    /// Like [`new`](Self::new) the first argument is the name of the
    /// program.  Fails with [`ErrorKind::InvalidUnicode`] if an argument is
    /// not valid unicode.
    pub fn from_os_cmdline<I, S>(
        cmdline: I,
        short: &'a str,
        long: &'a [LongOpt<'a>],
    ) -> Result<Scanner<'a>, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args = cmdline
            .into_iter()
            .map(|arg| os_string_into_string(arg.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scanner::new(args, short, long))
    }

    /// Creates a scanner for the given split command line.
    ///
    /// The first argument must be the name of the program, scanning starts
    /// with the second one.
    pub fn new<I, S>(cmdline: I, short: &'a str, long: &'a [LongOpt<'a>]) -> Scanner<'a>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scanner {
            args: cmdline.into_iter().map(Into::into).collect(),
            short: ShortSpec::new(short),
            long,
            index: 1,
            offset: 0,
            flags: Flag::OptionsEnabled.as_u8() | Flag::ReportErrors.as_u8(),
            last_error: None,
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Creates a scanner from just the arguments.
    ///
    /// In this case the program name is empty.  Fails if an argument is not
    /// valid unicode.
    pub fn from_args<I, S>(
        args: I,
        short: &'a str,
        long: &'a [LongOpt<'a>],
    ) -> Result<Scanner<'a>, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let cmdline = once(OsString::new()).chain(args.into_iter().map(Into::into));
        Scanner::from_os_cmdline(cmdline, short, long)
    }

    /// Sends diagnostics to the given writer instead of stderr.
    pub fn with_diagnostics<W: Write + 'a>(mut self, diagnostics: W) -> Scanner<'a> {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Returns the normalized program name (first argument).
    ///
    /// This will only have the file name portion of the first argument if
    /// it was passed as full path.
    pub fn prog(&self) -> &str {
        self.raw_prog()
            .map(Path::new)
            .and_then(|x| x.file_name())
            .and_then(|x| x.to_str())
            .unwrap_or_default()
    }

    /// Returns the raw first argument.
    pub fn raw_prog(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Returns the full command line.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the short option specification.
    pub fn short_spec(&self) -> ShortSpec<'a> {
        self.short
    }

    /// Returns the long option table.
    pub fn long_opts(&self) -> &'a [LongOpt<'a>] {
        self.long
    }

    /// The index of the next unconsumed argument.
    ///
    /// Once the scan is over this points at the first positional argument.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the scanner to another argument.
    ///
    /// This abandons a short option cluster in progress and accepts options
    /// again after `--`.
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
        self.offset = 0;
        self.set_flag(Flag::OptionsEnabled, true);
    }

    /// Returns the arguments that were not consumed yet.
    pub fn remaining(&self) -> &[String] {
        self.args.get(self.index..).unwrap_or_default()
    }

    /// Returns `true` if all arguments were consumed.
    pub fn finished(&self) -> bool {
        self.index >= self.args.len()
    }

    /// Returns the option that caused the last error.
    pub fn last_error(&self) -> Option<&Param> {
        self.last_error.as_ref()
    }

    /// Check if a [`Flag`] is currently set.
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.flags & flag.as_u8() != 0
    }

    /// Sets or unsets a [`Flag`].
    #[inline]
    pub fn set_flag(&mut self, flag: Flag, yes: bool) {
        if yes {
            self.flags |= flag.as_u8();
        } else {
            self.flags &= !flag.as_u8();
        }
    }

    /// Returns `true` if errors are currently written out.
    pub fn reports_errors(&self) -> bool {
        self.get_flag(Flag::ReportErrors) && !self.short.is_silent()
    }

    /// Scans the next option.
    ///
    /// Once the end of the options is reached this keeps returning
    /// [`Outcome::End`] until the scanner is moved with
    /// [`set_index`](Self::set_index).
    pub fn scan(&mut self) -> Step {
        if !self.get_flag(Flag::OptionsEnabled) {
            return self.end();
        }
        let arg = match self.args.get(self.index) {
            Some(arg) => arg,
            None => return self.end(),
        };

        if self.offset == 0 {
            if !arg.starts_with('-') || arg == "-" {
                trace!(index = self.index, "reached positional argument");
                return self.end();
            }
            if arg == "--" {
                trace!(index = self.index, "reached end of options marker");
                self.index += 1;
                self.set_flag(Flag::OptionsEnabled, false);
                return self.end();
            }
            if arg.starts_with("--") {
                return self.scan_long();
            }
            self.offset = 1;
        }

        self.scan_short()
    }

    /// Scans the next option, returning `None` at the end of the options.
    ///
    /// This is the usual way to drive the scanner in a loop:
    /// `while let Some(step) = scanner.next_step() { ... }`.
    pub fn next_step(&mut self) -> Option<Step> {
        let step = self.scan();
        if step.is_end() {
            None
        } else {
            Some(step)
        }
    }

    /// Scans the next option and turns error outcomes into errors.
    ///
    /// Returns `Ok(None)` at the end of the options.  Diagnostics are still
    /// written unless error reporting is switched off.
    pub fn try_next(&mut self) -> Result<Option<Step>, Error> {
        let step = self.scan();
        if step.is_end() {
            return Ok(None);
        }
        match step.error() {
            Some(err) => Err(err),
            None => Ok(Some(step)),
        }
    }

    fn scan_short(&mut self) -> Step {
        let arg = &self.args[self.index];
        let ch = match arg.get(self.offset..).and_then(|rest| rest.chars().next()) {
            Some(ch) => ch,
            None => {
                self.next_arg();
                return self.scan();
            }
        };

        let param = Param::Short(ch);
        let has_arg = match self.short.lookup(ch) {
            Some(has_arg) => has_arg,
            None => return self.unrecognized(param),
        };
        trace!(option = %param, ?has_arg, "matched short option");

        self.offset += ch.len_utf8();
        let inline = if self.offset >= arg.len() {
            self.next_arg();
            None
        } else {
            Some(self.offset)
        };

        match self.take_argument(has_arg, inline) {
            Ok(arg) => self.step(
                Outcome::Matched {
                    param,
                    val: ch as i32,
                },
                arg,
                None,
            ),
            Err(ArgumentMissing) => self.missing_argument(param, None),
        }
    }

    fn scan_long(&mut self) -> Step {
        let arg = &self.args[self.index];
        let eq = arg[2..]
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '=')
            .map(|(pos, _)| pos + 2);
        let name = match eq {
            Some(eq) => &arg[2..eq],
            None => &arg[2..],
        };
        let param = Param::Long(name.to_string());

        let long_index = match self.long.iter().position(|opt| opt.name() == name) {
            Some(long_index) => long_index,
            None => return self.unrecognized(param),
        };
        let opt = self.long[long_index];
        trace!(option = %param, long_index, "matched long option");

        let inline = match (opt.has_arg(), eq) {
            (HasArg::Required | HasArg::Optional, Some(eq)) => Some(eq + 1),
            _ => {
                self.next_arg();
                None
            }
        };

        match self.take_argument(opt.has_arg(), inline) {
            Ok(arg) => match opt.flag() {
                Some(flag) => {
                    flag.set(opt.val());
                    let outcome = Outcome::MatchedFlag {
                        param,
                        val: opt.val(),
                    };
                    self.step(outcome, arg, Some(long_index))
                }
                None => {
                    let outcome = Outcome::Matched {
                        param,
                        val: opt.val(),
                    };
                    self.step(outcome, arg, Some(long_index))
                }
            },
            Err(ArgumentMissing) => self.missing_argument(param, Some(long_index)),
        }
    }

    /// Resolves the argument of a matched option.
    ///
    /// `inline` is the byte offset of attached argument text in the current
    /// argument.  Taking an argument always moves past the argument it came
    /// from.
    fn take_argument(
        &mut self,
        has_arg: HasArg,
        inline: Option<usize>,
    ) -> Result<Option<String>, ArgumentMissing> {
        match (has_arg, inline) {
            (HasArg::No, _) | (HasArg::Optional, None) => Ok(None),
            (_, Some(start)) => {
                let value = self.args[self.index][start..].to_string();
                self.next_arg();
                Ok(Some(value))
            }
            (HasArg::Required, None) => match self.args.get(self.index) {
                Some(value) => {
                    let value = value.clone();
                    self.next_arg();
                    Ok(Some(value))
                }
                None => Err(ArgumentMissing),
            },
        }
    }

    fn unrecognized(&mut self, param: Param) -> Step {
        self.next_arg();
        if self.reports_errors() {
            self.report(&Error::new(ErrorKind::UnrecognizedOption).with_param(param.clone()));
        }
        self.last_error = Some(param.clone());
        self.step(Outcome::Unrecognized(param), None, None)
    }

    fn missing_argument(&mut self, param: Param, long_index: Option<usize>) -> Step {
        let silent = !self.reports_errors();
        if !silent {
            self.report(&Error::new(ErrorKind::MissingArgument).with_param(param.clone()));
        }
        self.last_error = Some(param.clone());
        self.step(Outcome::MissingArgument { param, silent }, None, long_index)
    }

    /// Writes a diagnostic line.
    fn report(&mut self, err: &Error) {
        debug!(error = %err, "reporting scan error");
        let prefix = if self.get_flag(Flag::PrefixProgramName) {
            format!("{}: ", self.prog())
        } else {
            String::new()
        };
        if let Err(err) = writeln!(self.diagnostics, "{}{}", prefix, err) {
            debug!(error = %err, "failed to write diagnostic");
        }
    }

    /// Moves ahead one argument and closes the current cluster.
    fn next_arg(&mut self) {
        self.index += 1;
        self.offset = 0;
    }

    fn end(&self) -> Step {
        self.step(Outcome::End, None, None)
    }

    fn step(&self, outcome: Outcome, arg: Option<String>, long_index: Option<usize>) -> Step {
        Step {
            outcome,
            arg,
            index: self.index,
            long_index,
        }
    }
}

fn os_string_into_string(s: OsString) -> Result<String, Error> {
    s.into_string()
        .map_err(|s| Error::new(ErrorKind::InvalidUnicode).with_raw_value(s))
}
