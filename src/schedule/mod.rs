pub mod day;
pub mod types;
pub mod day_index;
pub mod priority;
pub mod critical;
pub mod assigner;
pub mod double_play;
pub mod choice;
pub mod optimizer;
pub mod resolution;

pub use day::Day;
pub use types::{
    Availability, ChoiceScenario, IncompletePod, OptimizationResult, PlayerId, PlayerVote,
    PodAssignment, Preference, Preferences, POD_SIZE,
};
pub use day_index::{index_by_day, DayIndex};
pub use priority::{day_priorities, prioritize_days, DayPriority};
pub use critical::{detect_critical_players, Reservations};
pub use assigner::{assign_pods, can_assign_to_day, AssignmentState};
pub use optimizer::optimize;
