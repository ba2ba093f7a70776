use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::raw_pipeline::engine::mock::{MOCK_MAGIC, MockEngine};
use crate::raw_pipeline::{
    EngineLocator, ProcessingOptions, RawError, Result, SessionState, VersionResolver,
    open_session_on, open_session_with,
};

struct CountingLocator {
    path: PathBuf,
    calls: AtomicUsize,
}

impl EngineLocator for CountingLocator {
    fn locate(&self) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.path.clone())
    }
}

#[test]
fn test_unsupported_version_fails_before_file_io() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("never-created.raw");

    let resolver = VersionResolver::new(CountingLocator {
        path: PathBuf::from("/usr/lib/libraw.so.7"),
        calls: AtomicUsize::new(0),
    });

    for _ in 0..2 {
        match open_session_with(&resolver, &input) {
            Err(RawError::UnsupportedVersion(7)) => {}
            Err(other) => panic!("expected UnsupportedVersion, got {}", other),
            Ok(_) => panic!("expected UnsupportedVersion, got a session"),
        }
    }
    assert_eq!(resolver.locator().calls.load(Ordering::SeqCst), 1);
    assert!(!input.exists());
}

#[test]
fn test_open_process_to_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fixture.raw");
    std::fs::write(&input, MOCK_MAGIC).unwrap();

    let mut session = open_session_on(Arc::new(MockEngine::new(10)), &input).unwrap();
    assert_eq!(session.state(), SessionState::Opened);

    session.process(&ProcessingOptions::default()).unwrap();
    let buffer = session.to_buffer().unwrap();
    let frame = session.frame().unwrap();
    assert_eq!(
        buffer.len(),
        frame.width() as usize * frame.height() as usize * frame.colors() as usize
            * frame.bits() as usize
            / 8
    );
    session.close();
}
