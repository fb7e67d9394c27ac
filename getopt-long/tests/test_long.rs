use std::cell::Cell;

use getopt_long::{Flag, HasArg, LongOpt, Outcome, Param, Scanner, Step};

/// Scans until the end and returns the steps, the final index and
/// everything written to the diagnostic stream.
fn scan_all(args: &[&str], long: &[LongOpt<'_>], report: bool) -> (Vec<Step>, usize, String) {
    let mut diagnostics = Vec::new();
    let mut scanner = Scanner::new(args.iter().copied(), "", long).with_diagnostics(&mut diagnostics);
    scanner.set_flag(Flag::ReportErrors, report);
    let steps = std::iter::from_fn(|| scanner.next_step()).collect::<Vec<_>>();
    let index = scanner.index();
    drop(scanner);
    (steps, index, String::from_utf8(diagnostics).unwrap())
}

#[test]
fn test_end_of_options_delimiter() {
    let args = ["", "--foo", "--", "--bar"];
    let long = [
        LongOpt::new("foo", HasArg::No, 'f' as i32),
        LongOpt::new("bar", HasArg::No, 'b' as i32),
    ];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 'f' as i32);
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(args[index], "--bar");
}

#[test]
fn test_flag() {
    let args = ["", "--foo", "bar"];
    let foo = Cell::new(0);
    let long = [LongOpt::new("foo", HasArg::No, 1).with_flag(&foo)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(
        steps[0].outcome(),
        &Outcome::MatchedFlag {
            param: Param::Long("foo".into()),
            val: 1
        }
    );
    assert_eq!(steps[0].arg(), None);
    assert_eq!(foo.get(), 1);
    assert_eq!(args[index], "bar");
}

#[test]
fn test_flag_cell_keeps_last_value() {
    let args = ["", "--on", "--off", "--on", "--off"];
    let state = Cell::new(-1);
    let long = [
        LongOpt::new("on", HasArg::No, 1).with_flag(&state),
        LongOpt::new("off", HasArg::No, 0).with_flag(&state),
    ];
    let (steps, _, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 4);
    assert!(steps.iter().all(|step| step.code() == 0));
    assert_eq!(state.get(), 0);
}

#[test]
fn test_index_pointer() {
    let args = ["", "--bar", "qux"];
    let long = [
        LongOpt::new("foo", HasArg::No, 0),
        LongOpt::new("bar", HasArg::No, 0),
        LongOpt::new("baz", HasArg::No, 0),
    ];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].long_index().map(|idx| long[idx].name()), Some("bar"));
    assert_eq!(args[index], "qux");
}

#[test]
fn test_first_match_wins() {
    let args = ["", "--dup"];
    let long = [
        LongOpt::new("dup", HasArg::No, 1),
        LongOpt::new("dup", HasArg::No, 2),
    ];
    let (steps, _, _) = scan_all(&args, &long, true);
    assert_eq!(steps[0].code(), 1);
    assert_eq!(steps[0].long_index(), Some(0));
}

#[test]
fn test_invalid_option_silent() {
    let args = ["", "--foo", "bar"];
    let long = [LongOpt::new("", HasArg::No, 0)];
    let (steps, index, diagnostics) = scan_all(&args, &long, false);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), '?' as i32);
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(diagnostics, "");
    assert_eq!(args[index], "bar");
}

#[test]
fn test_invalid_option() {
    let args = ["", "--foo", "bar"];
    let long = [LongOpt::new("", HasArg::No, 0)];
    let (steps, index, diagnostics) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(
        steps[0].outcome(),
        &Outcome::Unrecognized(Param::Long("foo".into()))
    );
    assert_eq!(steps[0].code(), '?' as i32);
    assert_eq!(diagnostics, "unrecognized option '--foo'\n");
    assert_eq!(args[index], "bar");
}

#[test]
fn test_invalid_option_with_value() {
    let args = ["", "--foo=bar", "baz"];
    let (steps, index, diagnostics) = scan_all(&args, &[], true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].param(), Some(&Param::Long("foo".into())));
    assert_eq!(diagnostics, "unrecognized option '--foo'\n");
    assert_eq!(args[index], "baz");
}

#[test]
fn test_equal_sign_right_after_dashes() {
    let args = ["", "--=x"];
    let long = [LongOpt::new("", HasArg::Optional, 0)];
    let (steps, _, diagnostics) = scan_all(&args, &long, true);
    assert_eq!(
        steps[0].outcome(),
        &Outcome::Unrecognized(Param::Long("=x".into()))
    );
    assert_eq!(diagnostics, "unrecognized option '--=x'\n");
}

#[test]
fn test_expects_no_argument_passed_optional_argument() {
    let args = ["", "--foo=bar", "baz"];
    let long = [LongOpt::new("foo", HasArg::No, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].arg(), None);
    assert_eq!(args[index], "baz");
}

#[test]
fn test_expects_no_argument() {
    let args = ["", "--foo", "bar"];
    let long = [LongOpt::new("foo", HasArg::No, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(args[index], "bar");
}

#[test]
fn test_expects_optional_argument_passed_no_argument() {
    let args = ["", "--foo", "bar"];
    let long = [LongOpt::new("foo", HasArg::Optional, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].arg(), None);
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(args[index], "bar");
}

#[test]
fn test_expects_optional_argument_passed_optional_argument() {
    let args = ["", "--foo=bar", "baz"];
    let long = [LongOpt::new("foo", HasArg::Optional, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].optarg(), "bar");
    assert_eq!(steps[0].index(), 2);
    assert_eq!(args[index], "baz");
}

#[test]
fn test_expects_required_argument_passed_no_argument_silent() {
    let args = ["", "--foo"];
    let long = [LongOpt::new("foo", HasArg::Required, 0)];
    let (steps, index, diagnostics) = scan_all(&args, &long, false);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), ':' as i32);
    assert_eq!(
        steps[0].outcome(),
        &Outcome::MissingArgument {
            param: Param::Long("foo".into()),
            silent: true
        }
    );
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(diagnostics, "");
    assert_eq!(args[index - 1], "--foo");
}

#[test]
fn test_expects_required_argument_passed_no_argument() {
    let args = ["", "--foo"];
    let long = [LongOpt::new("foo", HasArg::Required, 0)];
    let (steps, index, diagnostics) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), '?' as i32);
    assert_eq!(steps[0].long_index(), Some(0));
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(diagnostics, "option '--foo' requires an argument\n");
    assert_eq!(args[index - 1], "--foo");
}

#[test]
fn test_expects_required_argument_passed_optional_argument() {
    let args = ["", "--foo=bar", "baz"];
    let long = [LongOpt::new("foo", HasArg::Required, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].optarg(), "bar");
    assert_eq!(args[index], "baz");
}

#[test]
fn test_expects_required_argument_passed_empty_argument() {
    let args = ["", "--foo=", "baz"];
    let long = [LongOpt::new("foo", HasArg::Required, 0)];
    let (steps, index, diagnostics) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].arg(), Some(""));
    assert_eq!(diagnostics, "");
    assert_eq!(args[index], "baz");
}

#[test]
fn test_expects_required_argument_passed_required_argument() {
    let args = ["", "--foo", "bar", "baz"];
    let long = [LongOpt::new("foo", HasArg::Required, 0)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 0);
    assert_eq!(steps[0].optarg(), "bar");
    assert_eq!(args[index], "baz");
}

#[test]
fn test_required_argument_may_look_like_an_option() {
    let args = ["", "--foo", "--bar", "baz"];
    let long = [
        LongOpt::new("foo", HasArg::Required, 'f' as i32),
        LongOpt::new("bar", HasArg::No, 'b' as i32),
    ];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].optarg(), "--bar");
    assert_eq!(args[index], "baz");
}

#[test]
fn test_value_with_equal_signs() {
    let args = ["", "--define=key=value"];
    let long = [LongOpt::new("define", HasArg::Required, 'D' as i32)];
    let (steps, _, _) = scan_all(&args, &long, true);
    assert_eq!(steps[0].optarg(), "key=value");
}

#[test]
fn test_val() {
    let args = ["", "--foo", "bar"];
    let long = [LongOpt::new("foo", HasArg::No, 'f' as i32)];
    let (steps, index, _) = scan_all(&args, &long, true);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].code(), 'f' as i32);
    assert_eq!(steps[0].optarg(), "");
    assert_eq!(args[index], "bar");
}

#[test]
fn test_mixed_with_short_options() {
    let args = ["", "-v", "--output", "out.txt", "-x3", "input"];
    let long = [LongOpt::new("output", HasArg::Required, 'o' as i32)];
    let mut scanner = Scanner::new(args, "vx:o:", &long);

    let step = scanner.scan();
    assert_eq!(step.code(), 'v' as i32);
    let step = scanner.scan();
    assert_eq!(step.code(), 'o' as i32);
    assert_eq!(step.optarg(), "out.txt");
    let step = scanner.scan();
    assert_eq!(step.code(), 'x' as i32);
    assert_eq!(step.optarg(), "3");
    assert!(scanner.scan().is_end());
    assert_eq!(scanner.remaining(), ["input"]);
}
