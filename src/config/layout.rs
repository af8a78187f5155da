use std::path::{Path, PathBuf};

/// Identifies one daily puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleId {
    pub year: i32,
    pub day: u32,
}

impl PuzzleId {
    pub fn new(year: i32, day: u32) -> Self {
        Self { year, day }
    }

    fn segments(&self) -> (String, String) {
        (format!("y{}", self.year), format!("d{:02}", self.day))
    }
}

/// On-disk project layout.
///
/// ```text
/// <root>/presents/y2023/d06/{input.txt,test_*_in.txt,test_*_out.txt}
/// <root>/solutions/<lang>/events/y2023/d06/<entrypoint>
/// ```
#[derive(Clone, Debug)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn presents_root(&self) -> PathBuf {
        self.root.join("presents")
    }

    pub fn solutions_root(&self) -> PathBuf {
        self.root.join("solutions")
    }

    pub fn daily_present_root(&self, puzzle: PuzzleId) -> PathBuf {
        let (year, day) = puzzle.segments();
        self.presents_root().join(year).join(day)
    }

    pub fn daily_input(&self, puzzle: PuzzleId) -> PathBuf {
        self.daily_present_root(puzzle).join("input.txt")
    }

    pub fn language_root(&self, backend_id: &str) -> PathBuf {
        self.solutions_root().join(backend_id)
    }

    pub fn daily_solution_root(&self, backend_id: &str, puzzle: PuzzleId) -> PathBuf {
        let (year, day) = puzzle.segments();
        self.language_root(backend_id)
            .join("events")
            .join(year)
            .join(day)
    }
}
