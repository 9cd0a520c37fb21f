//! In-memory adapters for integration tests.
//!
//! Compiled for unit tests and behind the `test-support` feature so the
//! suites under `backend/tests/` can drive the domain services without a
//! database or SMTP relay.

mod clock;
mod mailer;
mod store;

pub use clock::MutableClock;
pub use mailer::RecordingMailer;
pub use store::InMemoryStore;
