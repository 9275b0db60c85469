pub mod slots;
pub mod requirements;
pub mod optimizer;
pub mod coverage;

pub use slots::{build_substitution_map, CoveragePolicy, FullDayPair, SlotModel, SubstitutionPolicy};
pub use requirements::{DayBucket, RequirementConfig, RequirementTable};
pub use optimizer::{optimize, optimize_date, DayOutcome};
pub use coverage::{check_date, check_roster, known_roles, RoleCoverage, SlotCoverage};
