/*!
 * Validation of raw word-level timing data.
 *
 * # Architecture
 *
 * - `raw`: reads the loosely-typed input document, failing on bad shape
 * - `timecodes`: local timing repair rules and `TimingWarning`
 * - `validator`: orchestrates reading, unit conversion and repair
 */

pub mod raw;
pub mod timecodes;
pub mod validator;

// Re-export main types
pub use timecodes::{MAX_TIMESTAMP_MS, MIN_WORD_DURATION_MS, TimingIssue, TimingWarning};
pub use validator::{TimeUnit, Validated, Validator};
