//! Scheduling module for natural language parsing and conflict detection.
//!
//! This module provides the core scheduling functionality:
//!
//! - **Text Parsing**: Turn a scheduling sentence into a structured event draft
//! - **Validation**: Collect every problem with a draft, not just the first
//! - **Conflict Detection**: Classified interval overlaps against stored events
//! - **Alternative Suggestions**: Free windows near the conflicting events
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   Schedule Layer                        │
//! │  ┌──────────────────────────────────────────────────┐  │
//! │  │              ScheduleParser                      │  │
//! │  │  - Date / time / duration resolution             │  │
//! │  │  - Title extraction                              │  │
//! │  │  - Draft validation                              │  │
//! │  └──────────────────────────────────────────────────┘  │
//! │                         │                               │
//! │                         ▼                               │
//! │  ┌──────────────────────────────────────────────────┐  │
//! │  │              ConflictDetector                    │  │
//! │  │  - Half-open interval overlap                    │  │
//! │  │  - Overlap classification                        │  │
//! │  │  - Alternative slot suggestion                   │  │
//! │  └──────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use cadence::schedule::{CandidateEvent, ConflictDetector, ScheduleParser};
//!
//! let parser = ScheduleParser::default();
//! let parsed = parser.parse("Schedule a meeting tomorrow at 2pm for 1 hour");
//!
//! let detector = ConflictDetector::default();
//! let candidate = CandidateEvent::from_parsed(&parsed).unwrap();
//! let report = detector.check_conflicts(&candidate, &existing);
//! if report.has_conflict {
//!     let suggestions = detector.suggest_alternatives(&candidate, &existing);
//! }
//! ```

mod conflicts;
mod parser;
pub mod types;

pub use conflicts::ConflictDetector;
pub use parser::{validate_event_data, ScheduleParser};
pub use types::{
    CandidateEvent, Conflict, ConflictReport, Event, EventPatch, OverlapKind, ParsedEvent,
    Suggestion, ValidationReport,
};
