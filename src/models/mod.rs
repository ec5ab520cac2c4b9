pub mod caregiver;
pub mod enums;
pub mod intake;
pub mod medicine;
pub mod patient;
pub mod schedule;

pub use caregiver::Caregiver;
pub use intake::Intake;
pub use medicine::Medicine;
pub use patient::Patient;
pub use schedule::{Schedule, TimeOfDay};
