//! Accept command handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{AcceptRow, Reporter};
use crate::AcceptArgs;
use gesto::{guess_mime_type, AcceptFilter, FileDescriptor};

/// Check every file argument against the constraint and render the result
pub fn execute_accept(config: &CliConfig, args: &AcceptArgs) -> CliResult<String> {
    let files = args
        .files
        .iter()
        .map(|arg| parse_file_arg(arg))
        .collect::<CliResult<Vec<_>>>()?;
    let rows = check_files(&args.constraint, &files);
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    reporter.render_accept(&args.constraint, &rows, args.format.into())
}

/// `name` or `name:type`; the type is guessed from the extension when absent
pub fn parse_file_arg(arg: &str) -> CliResult<FileDescriptor> {
    let (name, mime) = match arg.split_once(':') {
        Some((name, mime)) => (name, mime.to_string()),
        None => (arg, guess_mime_type(arg)),
    };
    if name.is_empty() {
        return Err(CliError::invalid_argument(format!("empty file name in '{arg}'")));
    }
    if mime.is_empty() {
        return Err(CliError::invalid_argument(format!("empty MIME type in '{arg}'")));
    }
    Ok(FileDescriptor::new(name, mime, Vec::new()))
}

/// Classify `files` against `constraint`, keeping their order
#[must_use]
pub fn check_files(constraint: &str, files: &[FileDescriptor]) -> Vec<AcceptRow> {
    let filter = AcceptFilter::from_attribute(Some(constraint));
    files
        .iter()
        .map(|file| AcceptRow {
            name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            accepted: filter.accepts(file),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::FormatArg;
    use crate::config::ColorChoice;

    #[test]
    fn test_parse_file_arg_guesses_type() {
        let file = parse_file_arg("photo.JPG").unwrap();
        assert_eq!(file.name(), "photo.JPG");
        assert_eq!(file.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_parse_file_arg_explicit_type() {
        let file = parse_file_arg("blob:application/x-custom").unwrap();
        assert_eq!(file.name(), "blob");
        assert_eq!(file.mime_type(), "application/x-custom");
    }

    #[test]
    fn test_parse_file_arg_rejects_empty_parts() {
        assert!(parse_file_arg(":image/png").is_err());
        assert!(parse_file_arg("a.png:").is_err());
    }

    #[test]
    fn test_check_files_mixed() {
        let files = vec![
            parse_file_arg("a.png").unwrap(),
            parse_file_arg("report.PDF:application/octet-stream").unwrap(),
            parse_file_arg("clip.mp4").unwrap(),
        ];
        let rows = check_files("image/*,.pdf", &files);
        let accepted: Vec<_> = rows.iter().map(|r| r.accepted).collect();
        assert_eq!(accepted, vec![true, true, false]);
    }

    #[test]
    fn test_malformed_constraint_accepts_everything() {
        let files = vec![parse_file_arg("a.bin:application/octet-stream").unwrap()];
        assert!(check_files("garbage", &files)[0].accepted);
    }

    #[test]
    fn test_execute_accept_text() {
        let args = AcceptArgs {
            constraint: "text/csv".into(),
            files: vec!["a.csv".into(), "b.txt".into()],
            format: FormatArg::Text,
        };
        let config = CliConfig::new().with_color(ColorChoice::Never);
        let out = execute_accept(&config, &args).unwrap();
        assert!(out.contains("  accept a.csv (text/csv)"));
        assert!(out.contains("  reject b.txt (text/plain)"));
    }
}
