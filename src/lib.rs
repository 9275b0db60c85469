//! Shift roster optimization.
//!
//! Turns staff availability submissions and a per-day staffing requirement
//! table into a roster: one person per single-assignment role, everyone else
//! placed first-fit with substitution toward later, narrower slots, never
//! beyond the required headcount. The coverage checker reports what is still
//! missing afterwards.
//!
//! The core (`schedule`) is pure and synchronous. `parser`, `config::load_setup`
//! and `display` are the file and terminal plumbing used by the binary.

pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod schedule;
pub mod validation;

pub use config::{RosterSetup, ScheduleConfig, StaffOrder};
pub use error::{Result, RosterError};
pub use model::{
    Availability, AvailabilityEntry, OptimizedRoster, Role, StaffDirectory, StaffMember,
    UnassignedReason, UnassignedRequest,
};
pub use schedule::{check_date, check_roster, optimize, SlotCoverage, SlotModel};
