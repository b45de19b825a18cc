//! Thread-safe string sequence with concurrent append and atomic replace.
//!
//! - [`store`] holds [`SequenceStore`](store::SequenceStore), a `Mutex`-guarded
//!   `Vec<String>` whose append, replace and snapshot operations are each a
//!   single critical section. Values are copied on the way in and out.
//! - [`driver`] runs the demo: N workers append concurrently on OS threads,
//!   rayon, or tokio tasks, then the contents are replaced and read back.
//! - [`cli`] parses the command-line flags for the driver.
//! - [`report`] captures and renders what the driver observed.

pub mod cli;
pub mod driver;
pub mod report;
pub mod store;
