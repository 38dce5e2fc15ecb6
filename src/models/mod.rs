pub mod facts;
pub mod session;
pub mod workout;

pub use facts::{AthleteDayRollup, SessionFact, WorkoutFact};
pub use session::{Session, SetLog};
pub use workout::{WorkoutLog, WorkoutLogEntry, WorkoutRoundLog};
