use std::fmt;
use std::time::{Duration, Instant};

/// Session operation that touches the engine or the file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Open,
    Unpack,
    UnpackThumbnail,
    Process,
    Save,
    SaveNative,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Open => "open",
            Stage::Unpack => "unpack",
            Stage::UnpackThumbnail => "unpack_thumbnail",
            Stage::Process => "process",
            Stage::Save => "save",
            Stage::SaveNative => "save_native",
        };
        // Pad through the formatter so table columns line up.
        f.pad(name)
    }
}

/// Wall-clock time of every completed stage run, in call order.
///
/// Failed runs are not recorded.
#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    runs: Vec<(Stage, Duration)>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_since(&mut self, stage: Stage, started: Instant) {
        self.runs.push((stage, started.elapsed()));
    }

    pub fn total(&self) -> Duration {
        self.runs.iter().map(|(_, d)| *d).sum()
    }

    /// Time summed over every run of `stage`, `None` if it never completed.
    pub fn get(&self, stage: Stage) -> Option<Duration> {
        let mut runs = self.runs.iter().filter(|(s, _)| *s == stage).peekable();
        runs.peek()?;
        Some(runs.map(|(_, d)| *d).sum())
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.runs.iter().filter(|(s, _)| *s == stage).count()
    }

    /// Stages in order of first completion.
    fn distinct(&self) -> Vec<Stage> {
        let mut seen = Vec::new();
        for (stage, _) in &self.runs {
            if !seen.contains(stage) {
                seen.push(*stage);
            }
        }
        seen
    }
}

impl fmt::Display for StageTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        writeln!(f, "Session Timing Summary:")?;
        writeln!(f, "{:-<60}", "")?;
        for stage in self.distinct() {
            let spent = self.get(stage).unwrap_or_default();
            let share = if total.is_zero() {
                0.0
            } else {
                spent.as_secs_f64() / total.as_secs_f64() * 100.0
            };
            writeln!(
                f,
                "{:<20} x{:<4} {:>12.3}ms ({:>5.1}%)",
                stage,
                self.count(stage),
                spent.as_secs_f64() * 1000.0,
                share
            )?;
        }
        writeln!(f, "{:-<60}", "")?;
        write!(f, "{:<26} {:>12.3}ms", "Total", total.as_secs_f64() * 1000.0)
    }
}
