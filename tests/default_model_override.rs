//! The process-wide default parser honors `USADDR_MODEL_PATH`, and a failed
//! override load poisons it: every call fails, nothing falls back to the
//! built-in weights and nothing retries the load.
//!
//! This lives in its own test binary because the default parser is
//! initialized once per process; the override must be in place before any
//! crate-level call.

use usaddr::{parse, tag, ModelError, ParseError, MODEL_PATH_ENV};

#[test]
fn failed_override_load_is_sticky() {
    std::env::set_var(MODEL_PATH_ENV, "/nonexistent/usaddr.model.json");

    // twice: the second round proves the failure is cached, not retried
    for _ in 0..2 {
        let err = parse("123 Main St, Springfield, IL 62704").unwrap_err();
        match &err {
            ParseError::ModelNotLoaded(source) => {
                assert!(matches!(source.as_ref(), ModelError::Io { .. }));
            }
            other => panic!("expected ModelNotLoaded, got {other:?}"),
        }

        let err = tag("123 Main St, Springfield, IL 62704").unwrap_err();
        assert!(matches!(err, ParseError::ModelNotLoaded(_)));
    }
}
