use std::cell::Cell;
use std::fmt;

/// Declares whether an option takes an argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HasArg {
    /// The option never takes an argument.
    #[default]
    No,
    /// The option needs an argument.
    ///
    /// The argument is either attached (`-ovalue`, `--option=value`) or
    /// taken from the next argument (`-o value`, `--option value`).
    Required,
    /// The option takes an argument only if it's attached.
    ///
    /// A following argument is never consumed, so `--option value` leaves
    /// `value` as a positional argument.
    Optional,
}

/// Describes a single long option.
///
/// Long options are matched by their exact name.  When matched, the scanner
/// either reports the option's value directly or, when a flag cell is
/// attached, stores the value into the cell instead.
///
/// ```
/// use std::cell::Cell;
/// use getopt_long::{HasArg, LongOpt};
///
/// let verbose = Cell::new(0);
/// let opts = [
///     LongOpt::new("output", HasArg::Required, 'o' as i32),
///     LongOpt::new("verbose", HasArg::No, 1).with_flag(&verbose),
/// ];
/// assert_eq!(opts[0].name(), "output");
/// assert!(opts[1].flag().is_some());
/// ```
#[derive(Clone, Copy)]
pub struct LongOpt<'a> {
    name: &'a str,
    has_arg: HasArg,
    flag: Option<&'a Cell<i32>>,
    val: i32,
}

impl<'a> LongOpt<'a> {
    /// Creates a long option that reports `val` when matched.
    pub const fn new(name: &'a str, has_arg: HasArg, val: i32) -> LongOpt<'a> {
        LongOpt {
            name,
            has_arg,
            flag: None,
            val,
        }
    }

    /// Attaches a flag cell that receives the value instead.
    pub fn with_flag(mut self, flag: &'a Cell<i32>) -> LongOpt<'a> {
        self.flag = Some(flag);
        self
    }

    /// The name of the option without the leading `--`.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The argument policy of the option.
    pub fn has_arg(&self) -> HasArg {
        self.has_arg
    }

    /// The flag cell, if one is attached.
    pub fn flag(&self) -> Option<&'a Cell<i32>> {
        self.flag
    }

    /// The value reported or stored when the option matches.
    pub fn val(&self) -> i32 {
        self.val
    }
}

impl fmt::Debug for LongOpt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongOpt")
            .field("name", &self.name)
            .field("has_arg", &self.has_arg)
            .field("flag", &self.flag.map(Cell::get))
            .field("val", &self.val)
            .finish()
    }
}

/// The short option specification string.
///
/// Every character is an option letter.  A letter followed by `:` requires
/// an argument, a letter followed by `::` takes an optional argument.  A
/// leading `:` silences missing argument diagnostics for the whole scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ShortSpec<'a> {
    spec: &'a str,
}

impl<'a> ShortSpec<'a> {
    /// Wraps a specification string.
    pub const fn new(spec: &'a str) -> ShortSpec<'a> {
        ShortSpec { spec }
    }

    /// Returns the raw specification string.
    pub fn as_str(&self) -> &'a str {
        self.spec
    }

    /// Returns `true` if the specification starts with `:`.
    pub fn is_silent(&self) -> bool {
        self.spec.starts_with(':')
    }

    /// Looks up an option letter and returns its argument policy.
    ///
    /// Returns `None` if the letter is not part of the specification.  The
    /// colon is never an option letter.
    pub fn lookup(&self, c: char) -> Option<HasArg> {
        if c == ':' {
            return None;
        }
        let pos = self.spec.find(c)?;
        let rest = &self.spec[pos + c.len_utf8()..];
        Some(if rest.starts_with("::") {
            HasArg::Optional
        } else if rest.starts_with(':') {
            HasArg::Required
        } else {
            HasArg::No
        })
    }
}

impl<'a> From<&'a str> for ShortSpec<'a> {
    fn from(spec: &'a str) -> ShortSpec<'a> {
        ShortSpec::new(spec)
    }
}
