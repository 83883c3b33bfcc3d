use std::ffi::OsString;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use env_logger::Env;

use msort_rs::common::reset_sigpipe;
use msort_rs::sort::{SortConfig, SortError, sort_and_output};

// No short flags: every `-X` operand must reach the key-spec parser.
#[derive(Parser, Debug)]
#[command(
    name = "msort",
    version,
    about = "Stable merge sort of text lines",
    long_about = "Sort lines of the given files, concatenated in argument order, and write them \
                  to standard output. Lines with equal keys keep their input order.\n\n\
                  -POS[,LEN] restricts the key to LEN bytes starting at byte offset POS \
                  (0-based). A line too short for the key contributes only the bytes it has.",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print help
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Print version
    #[arg(long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Optional -POS[,LEN] key followed by the files to sort
    #[arg(value_name = "[-POS[,LEN]] FILE", allow_hyphen_values = true)]
    operands: Vec<String>,
}

/// Parse the command line. clap swallows a leading `--` as its
/// end-of-options marker; here it is an operand like any other `-...`
/// argument, so it is put back in front.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut cli = Cli::try_parse_from(&args)?;
    if args.get(1).is_some_and(|a| a == "--") {
        cli.operands.insert(0, "--".to_string());
    }
    Ok(cli)
}

fn main() {
    reset_sigpipe();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let result = SortConfig::from_operands(&cli.operands).and_then(|config| sort_and_output(&config));

    if let Err(e) = result {
        let code = report(&e, &mut io::stderr().lock());
        process::exit(code);
    }
}

/// Write a diagnostic for `e` to `err` and return the exit status.
fn report(e: &SortError, err: &mut impl Write) -> i32 {
    // Nothing useful can be done if stderr itself is gone.
    let _ = match e {
        SortError::MissingOperand => writeln!(err, "msort: {}\nUsage: msort [-POS[,LEN]] FILE...", e),
        e if e.is_validation() => writeln!(err, "{}", e),
        e => writeln!(err, "msort: {}", e),
    };
    if e.is_validation() { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msort_rs::sort::KeySpec;

    fn report_str(e: SortError) -> (String, i32) {
        let mut buf = Vec::new();
        let code = report(&e, &mut buf);
        (String::from_utf8(buf).unwrap(), code)
    }

    fn config_for(args: &[&str]) -> Result<SortConfig, SortError> {
        let cli = parse_cli(args.iter().copied()).unwrap();
        SortConfig::from_operands(&cli.operands)
    }

    #[test]
    fn test_report_invalid_key_is_bare_message() {
        assert_eq!(
            report_str(SortError::InvalidKeySpec),
            ("Invalid -POS,[LEN]\n".to_string(), 1)
        );
    }

    #[test]
    fn test_report_nonexistent_file_is_bare_message() {
        let e = SortError::NonexistentFile {
            path: "nope.txt".into(),
        };
        assert_eq!(report_str(e), ("Nonexistent file name\n".to_string(), 1));
    }

    #[test]
    fn test_report_missing_operand_prints_usage() {
        assert_eq!(
            report_str(SortError::MissingOperand),
            (
                "msort: missing file operand\nUsage: msort [-POS[,LEN]] FILE...\n".to_string(),
                1
            )
        );
    }

    #[test]
    fn test_report_internal_errors_exit_2() {
        let (msg, code) = report_str(SortError::EmptyQueue { op: "pop" });
        assert_eq!(msg, "msort: pop() called on an empty queue\n");
        assert_eq!(code, 2);

        let (msg, code) = report_str(SortError::LineCountMismatch {
            expected: 3,
            written: 2,
        });
        assert_eq!(msg, "msort: wrote 2 lines but read 3\n");
        assert_eq!(code, 2);

        let (msg, code) = report_str(SortError::Io(io::Error::other("disk full")));
        assert_eq!(msg, "msort: disk full\n");
        assert_eq!(code, 2);
    }

    #[test]
    fn test_report_allocation_failure_exits_2() {
        let overflow = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let (msg, code) = report_str(SortError::Allocation(overflow));
        assert!(msg.starts_with("msort: queue allocation failed"), "got: {}", msg);
        assert_eq!(code, 2);
    }

    #[test]
    fn test_short_v_is_a_malformed_key() {
        assert!(matches!(
            config_for(&["msort", "-V", "f1"]),
            Err(SortError::InvalidKeySpec)
        ));
    }

    #[test]
    fn test_short_h_is_a_malformed_key() {
        assert!(matches!(
            config_for(&["msort", "-h", "f1"]),
            Err(SortError::InvalidKeySpec)
        ));
    }

    #[test]
    fn test_leading_double_dash_is_a_malformed_key() {
        assert!(matches!(
            config_for(&["msort", "--", "f1"]),
            Err(SortError::InvalidKeySpec)
        ));
        assert!(matches!(
            config_for(&["msort", "--"]),
            Err(SortError::InvalidKeySpec)
        ));
    }

    #[test]
    fn test_unknown_long_option_is_a_malformed_key() {
        assert!(matches!(
            config_for(&["msort", "--1", "f1"]),
            Err(SortError::InvalidKeySpec)
        ));
    }

    #[test]
    fn test_key_and_files_reach_config() {
        let config = config_for(&["msort", "-2,3", "a.txt", "b.txt"]).unwrap();
        assert_eq!(config.key, KeySpec::new(2, Some(3)));
        assert_eq!(config.files.len(), 2);

        let config = config_for(&["msort", "a.txt"]).unwrap();
        assert_eq!(config.key, KeySpec::WHOLE_LINE);
    }

    #[test]
    fn test_no_operands_is_missing_operand() {
        assert!(matches!(config_for(&["msort"]), Err(SortError::MissingOperand)));
    }

    #[test]
    fn test_long_help_and_version_still_work() {
        let e = parse_cli(["msort", "--version"]).unwrap_err();
        assert_eq!(e.kind(), clap::error::ErrorKind::DisplayVersion);
        let e = parse_cli(["msort", "--help"]).unwrap_err();
        assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
