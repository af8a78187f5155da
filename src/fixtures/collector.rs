use crate::config::types::{resolve_parts, FixtureRole, HarnessError, Part, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static FIXTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^test_(?:p(?P<part>1|2)_)?(?P<index>\d+)_(?P<role>in|out)\.txt$")
        .expect("valid fixture pattern")
});

/// A grouped (input, expected-output) pair for one puzzle part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub index: u64,
    pub part: Part,
    pub input: Option<PathBuf>,
    pub expected: Option<PathBuf>,
}

/// Decoded fixture filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureName {
    pub index: u64,
    pub part: Option<Part>,
    pub role: FixtureRole,
}

/// Parse `test_[p<part>_]<index>_<in|out>.txt`.
pub fn parse_fixture_name(file_name: &str) -> Option<FixtureName> {
    let caps = FIXTURE_RE.captures(file_name)?;
    let index = caps.name("index")?.as_str().parse::<u64>().ok()?;
    let part = match caps.name("part") {
        Some(part) => Some(part.as_str().parse::<Part>().ok()?),
        None => None,
    };
    let role = match caps.name("role")?.as_str() {
        "in" => FixtureRole::In,
        _ => FixtureRole::Out,
    };
    Some(FixtureName { index, part, role })
}

impl Fixture {
    fn new(index: u64, part: Part) -> Self {
        Self {
            index,
            part,
            input: None,
            expected: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.input.is_some() && self.expected.is_some()
    }

    fn require<'a>(&self, path: &'a Option<PathBuf>, role: FixtureRole) -> Result<&'a Path> {
        let path = path.as_deref().ok_or(HarnessError::FixtureIncomplete {
            index: self.index,
            part: self.part,
            role,
        })?;
        if !path.exists() {
            return Err(HarnessError::FixtureFileMissing(path.to_path_buf()));
        }
        Ok(path)
    }

    /// Check both paths are set and still exist. Returns `(input, expected)`.
    pub fn validate(&self) -> Result<(&Path, &Path)> {
        let input = self.require(&self.input, FixtureRole::In)?;
        let expected = self.require(&self.expected, FixtureRole::Out)?;
        Ok((input, expected))
    }

    /// First non-empty line of the expected-output file.
    pub fn expected_answer(&self) -> Result<String> {
        let (_, expected) = self.validate()?;
        let content = std::fs::read_to_string(expected)?;
        content
            .lines()
            .map(str::trim_end)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| HarnessError::FixtureEmpty(expected.to_path_buf()))
    }
}

/// A path claim for one `(index, part, role)` slot. Explicit-part files
/// outrank files that apply to both parts.
struct Claim {
    path: PathBuf,
    explicit: bool,
}

fn claim(slot: &mut Option<Claim>, path: &Path, explicit: bool) {
    let replace = match slot {
        None => true,
        Some(existing) => explicit && !existing.explicit,
    };
    if replace {
        *slot = Some(Claim {
            path: path.to_path_buf(),
            explicit,
        });
    }
}

/// Scan `root_dir` (non-recursively) and group fixture files.
///
/// Output is sorted by `(index, part)`; fixtures missing either file are
/// dropped silently.
pub fn collect(root_dir: &Path) -> Result<Vec<Fixture>> {
    let mut slots: BTreeMap<(u64, Part), (Option<Claim>, Option<Claim>)> = BTreeMap::new();

    let mut entries: Vec<PathBuf> = std::fs::read_dir(root_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(parsed) = parse_fixture_name(name) else {
            continue;
        };
        for part in resolve_parts(parsed.part) {
            let (input, expected) = slots.entry((parsed.index, part)).or_default();
            let slot = match parsed.role {
                FixtureRole::In => input,
                FixtureRole::Out => expected,
            };
            claim(slot, &path, parsed.part.is_some());
        }
    }

    let fixtures: Vec<Fixture> = slots
        .into_iter()
        .map(|((index, part), (input, expected))| {
            let mut fixture = Fixture::new(index, part);
            fixture.input = input.map(|c| c.path);
            fixture.expected = expected.map(|c| c.path);
            fixture
        })
        .filter(|fixture| {
            if !fixture.is_complete() {
                log::debug!(
                    "Skipping incomplete fixture {} (part {})",
                    fixture.index,
                    fixture.part
                );
            }
            fixture.is_complete()
        })
        .collect();

    log::info!(
        "Collected {} fixture(s) from {}",
        fixtures.len(),
        root_dir.display()
    );
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_fixture_name() {
        assert_eq!(
            parse_fixture_name("test_p2_10_out.txt"),
            Some(FixtureName {
                index: 10,
                part: Some(Part::Two),
                role: FixtureRole::Out
            })
        );
        assert_eq!(
            parse_fixture_name("test_3_in.txt"),
            Some(FixtureName {
                index: 3,
                part: None,
                role: FixtureRole::In
            })
        );
        assert_eq!(parse_fixture_name("test_p3_1_in.txt"), None);
        assert_eq!(parse_fixture_name("input.txt"), None);
        assert_eq!(parse_fixture_name("test_1_in.txt.bak"), None);
    }

    #[test]
    fn test_collect_groups_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test_p2_2_in.txt", "b");
        touch(dir.path(), "test_p2_2_out.txt", "B");
        touch(dir.path(), "test_1_in.txt", "a");
        touch(dir.path(), "test_1_out.txt", "A");
        touch(dir.path(), "test_p1_10_in.txt", "c");
        touch(dir.path(), "test_p1_10_out.txt", "C");
        touch(dir.path(), "input.txt", "puzzle");

        let fixtures = collect(dir.path()).unwrap();
        let keys: Vec<(u64, Part)> = fixtures.iter().map(|f| (f.index, f.part)).collect();
        assert_eq!(
            keys,
            vec![
                (1, Part::One),
                (1, Part::Two),
                (2, Part::Two),
                (10, Part::One)
            ]
        );
        assert_eq!(
            fixtures[1].input.as_deref(),
            Some(dir.path().join("test_1_in.txt").as_path())
        );
    }

    #[test]
    fn test_missing_out_file_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test_p1_1_in.txt", "3\n4");
        touch(dir.path(), "test_p1_1_out.txt", "7");
        touch(dir.path(), "test_p2_1_in.txt", "3\n4");

        let fixtures = collect(dir.path()).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].part, Part::One);
    }

    #[test]
    fn test_explicit_part_wins_over_shared_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "test_1_in.txt", "shared");
        touch(dir.path(), "test_p2_1_in.txt", "second");
        touch(dir.path(), "test_1_out.txt", "x");

        let fixtures = collect(dir.path()).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(
            fixtures[0].input.as_deref(),
            Some(dir.path().join("test_1_in.txt").as_path())
        );
        assert_eq!(
            fixtures[1].input.as_deref(),
            Some(dir.path().join("test_p2_1_in.txt").as_path())
        );
    }

    #[test]
    fn test_validation_errors_at_consumption() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "test_1_in.txt", "1");
        let expected = touch(dir.path(), "test_1_out.txt", "\n\n");

        let incomplete = Fixture {
            index: 1,
            part: Part::One,
            input: Some(input.clone()),
            expected: None,
        };
        assert!(matches!(
            incomplete.validate(),
            Err(HarnessError::FixtureIncomplete {
                role: FixtureRole::Out,
                ..
            })
        ));

        let empty = Fixture {
            index: 1,
            part: Part::One,
            input: Some(input.clone()),
            expected: Some(expected.clone()),
        };
        assert!(matches!(
            empty.expected_answer(),
            Err(HarnessError::FixtureEmpty(_))
        ));

        fs::remove_file(&input).unwrap();
        assert!(matches!(
            empty.validate(),
            Err(HarnessError::FixtureFileMissing(path)) if path == input
        ));
    }

    #[test]
    fn test_expected_answer_uses_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Fixture {
            index: 1,
            part: Part::Two,
            input: Some(touch(dir.path(), "test_p2_1_in.txt", "x")),
            expected: Some(touch(dir.path(), "test_p2_1_out.txt", "42  \nignored\n")),
        };
        assert_eq!(fixture.expected_answer().unwrap(), "42");
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let err = collect(Path::new("/nonexistent/puzzlebox/fixtures")).unwrap_err();
        assert!(matches!(err, HarnessError::Io(_)));
    }
}
