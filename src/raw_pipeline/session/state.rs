use std::fmt;

/// Main pipeline stage of a session. Later variants imply the earlier ones
/// have run, except for `Closed`, which can be reached from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
    Unopened,
    Opened,
    Unpacked,
    Processed,
    Exported,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unopened => "unopened",
            SessionState::Opened => "opened",
            SessionState::Unpacked => "unpacked",
            SessionState::Processed => "processed",
            SessionState::Exported => "exported",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Embedded preview extraction, tracked apart from the main pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailState {
    #[default]
    NotUnpacked,
    Unpacked,
}
