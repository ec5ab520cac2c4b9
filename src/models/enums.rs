use crate::engine::EngineError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(MedicineForm {
    Tablet => "tablet",
    Capsule => "capsule",
    Syrup => "syrup",
    Injection => "injection",
    Drops => "drops",
});

/// Status of a recorded intake row.
str_enum!(IntakeStatus {
    Pending => "pending",
    Taken => "taken",
    Missed => "missed",
    Skipped => "skipped",
});

/// Classification of one occurrence. Superset of `IntakeStatus`:
/// `Upcoming` exists only as a derived state, never as a record.
str_enum!(DoseStatus {
    Upcoming => "upcoming",
    Pending => "pending",
    Taken => "taken",
    Missed => "missed",
    Skipped => "skipped",
});

str_enum!(AlertKind {
    MedicationReminder => "medication_reminder",
    RefillReminder => "refill_reminder",
    MissedDoseAlert => "missed_dose_alert",
});

str_enum!(AlertTarget {
    Patient => "patient",
    Caregiver => "caregiver",
});
