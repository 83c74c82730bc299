//! Parser for the `artix-checkupdates` table
//!
//! Example output:
//! ```text
//! Package basename  Artix repo  Artix version  Arch repo  Arch version  Packager
//! vim               world       9.1.0-1        extra      9.1.0-2       alice
//! ```

use crate::compliance::apply_compliance;
use crate::types::{ArchRepo, ArtixRepo, UpdateRecord};

/// Text that marks the table header line
pub const HEADER_MARKER: &str = "Package basename";

/// Trim a line and collapse every whitespace run to a single space
#[must_use]
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a single line, `None` for blank and header lines
///
/// Missing columns become empty strings. Extra columns are ignored.
#[must_use]
pub fn parse_line(line: &str, compliance: bool) -> Option<UpdateRecord> {
    let normalized = normalize_line(line);
    if normalized.is_empty() || normalized.contains(HEADER_MARKER) {
        return None;
    }

    let mut cols = normalized.split(' ');
    let mut next = || cols.next().unwrap_or_default();

    let basename = next();
    let basename = if compliance {
        apply_compliance(basename)
    } else {
        basename.to_string()
    };

    Some(UpdateRecord {
        basename,
        source_repository: ArtixRepo::from_tag(next()),
        source_version: next().to_string(),
        target_repository: ArchRepo::from_tag(next()),
        target_version: next().to_string(),
        packager: next().to_string(),
    })
}

/// Lazily parse every record in `output`, in line order
pub fn parse_lines(output: &str, compliance: bool) -> impl Iterator<Item = UpdateRecord> + '_ {
    output
        .split('\n')
        .filter_map(move |line| parse_line(line, compliance))
}

/// Parse the full scanner output into records
///
/// Never fails: malformed lines still yield a best-effort record.
#[must_use]
pub fn parse_output(output: &str, compliance: bool) -> Vec<UpdateRecord> {
    parse_lines(output, compliance).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Package basename      Artix repo   Artix version   Arch repo   Arch version   Packager
vim                   world        9.1.0-1         extra       9.1.0-2        alice
lib32-mesa            lib32        24.0.1-1        multilib    24.0.2-1       bob
";

    #[test]
    fn test_parse_sample() {
        let records = parse_output(SAMPLE, false);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].basename, "vim");
        assert_eq!(records[0].source_repository, ArtixRepo::World);
        assert_eq!(records[0].source_version, "9.1.0-1");
        assert_eq!(records[0].target_repository, ArchRepo::Extra);
        assert_eq!(records[0].target_version, "9.1.0-2");
        assert_eq!(records[0].packager, "alice");
        assert_eq!(records[1].basename, "lib32-mesa");
        assert_eq!(records[1].target_repository, ArchRepo::Multilib);
    }

    #[test]
    fn test_no_data_lines() {
        assert!(parse_output("", false).is_empty());
        assert!(parse_output("\n   \n\t\n", false).is_empty());
        assert!(parse_output("Package basename Artix repo\n", false).is_empty());
    }

    #[test]
    fn test_header_marker_anywhere() {
        let output = "   some prefix Package basename suffix   \nfoo world 1 extra 2 carol";
        let records = parse_output(output, false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].basename, "foo");
    }

    #[test]
    fn test_whitespace_normalization_is_idempotent() {
        let messy = "  foo \t world   1.0-1\t\textra  1.1-1    dave  \r\n\nbar system 2 core 3 erin";
        let clean = "foo world 1.0-1 extra 1.1-1 dave\nbar system 2 core 3 erin";

        assert_eq!(parse_output(messy, false), parse_output(clean, false));
        assert_eq!(normalize_line(&normalize_line(messy)), normalize_line(messy));
    }

    #[test]
    fn test_short_line_best_effort() {
        let records = parse_output("foo world", false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].basename, "foo");
        assert_eq!(records[0].source_repository, ArtixRepo::World);
        assert_eq!(records[0].source_version, "");
        assert_eq!(records[0].target_repository, ArchRepo::Unrecognized(String::new()));
        assert_eq!(records[0].target_version, "");
        assert_eq!(records[0].packager, "");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let records = parse_output("foo world 1 extra 2 frank trailing junk", false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].packager, "frank");
    }

    #[test]
    fn test_compliance_only_touches_basename() {
        let records = parse_output("foo+bar world 1+x extra 2 g+h", true);

        assert_eq!(records[0].basename, "foo-bar");
        assert_eq!(records[0].source_version, "1+x");
        assert_eq!(records[0].packager, "g+h");

        let raw = parse_output("foo+bar world 1+x extra 2 g+h", false);
        assert_eq!(raw[0].basename, "foo+bar");
    }

    #[test]
    fn test_unknown_repo_tag_is_kept() {
        let records = parse_output("foo universe 1 community 2 gina", false);

        assert_eq!(
            records[0].source_repository,
            ArtixRepo::Unrecognized("universe".to_string())
        );
        assert_eq!(records[0].unrecognized_repository(), Some("universe"));
    }

    #[test]
    fn test_order_preserved() {
        let output = "c world 1 extra 2 p\na world 1 extra 2 p\nb world 1 extra 2 p";
        let names: Vec<_> = parse_lines(output, false).map(|r| r.basename).collect();

        assert_eq!(names, ["c", "a", "b"]);
    }
}
