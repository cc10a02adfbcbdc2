//! The domain data model: patients, triage colors, specialties, outcomes.

use std::fmt;

use serde::Serialize;

/// Unique, monotonically increasing patient identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Triage color, in descending order of urgency.
///
/// Ordering matters: `Red < Yellow < Green` so `#[derive(PartialOrd, Ord)]`
/// gives the priority comparator the specialist queues sort by directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
        };
        write!(f, "{s}")
    }
}

/// The six specialist categories. `Pediatrics` is the fixed routing target
/// for every minor patient; adults are routed to one of the other five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Specialty {
    Cardiology,
    Neurology,
    Ophthalmology,
    Ent,
    Surgery,
    Pediatrics,
}

impl Specialty {
    pub const ALL: [Specialty; 6] = [
        Specialty::Cardiology,
        Specialty::Neurology,
        Specialty::Ophthalmology,
        Specialty::Ent,
        Specialty::Surgery,
        Specialty::Pediatrics,
    ];

    /// The five specialties an adult patient may be routed to (everything
    /// but `Pediatrics`, which is reserved for minors).
    pub const ADULT: [Specialty; 5] = [
        Specialty::Cardiology,
        Specialty::Neurology,
        Specialty::Ophthalmology,
        Specialty::Ent,
        Specialty::Surgery,
    ];

    pub fn index(self) -> usize {
        match self {
            Specialty::Cardiology => 0,
            Specialty::Neurology => 1,
            Specialty::Ophthalmology => 2,
            Specialty::Ent => 3,
            Specialty::Surgery => 4,
            Specialty::Pediatrics => 5,
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Specialty::Cardiology => "cardiology",
            Specialty::Neurology => "neurology",
            Specialty::Ophthalmology => "ophthalmology",
            Specialty::Ent => "ent",
            Specialty::Surgery => "surgery",
            Specialty::Pediatrics => "pediatrics",
        };
        write!(f, "{s}")
    }
}

/// What happens to a patient after a specialist visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    SentHome,
    AdmittedToWard,
    TransferredElsewhere,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::SentHome => "sent home",
            Outcome::AdmittedToWard => "admitted to ward",
            Outcome::TransferredElsewhere => "transferred to another facility",
        };
        write!(f, "{s}")
    }
}

/// A single patient's full record as it accumulates through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRecord {
    pub id: PatientId,
    pub age: u32,
    pub is_minor: bool,
    pub is_vip: bool,
    pub has_guardian: bool,
    pub color: Option<Color>,
    pub specialty: Option<Specialty>,
    pub outcome: Option<Outcome>,
}

impl PatientRecord {
    pub fn new(id: PatientId, age: u32, is_minor: bool, is_vip: bool, has_guardian: bool) -> Self {
        PatientRecord {
            id,
            age,
            is_minor,
            is_vip,
            has_guardian,
            color: None,
            specialty: None,
            outcome: None,
        }
    }

    /// Number of waitroom seats this patient occupies: 2 if a minor needs a
    /// guardian seated alongside them, 1 otherwise.
    pub fn waitroom_seats(&self) -> u32 {
        if self.is_minor && self.has_guardian {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_priority_order() {
        assert!(Color::Red < Color::Yellow);
        assert!(Color::Yellow < Color::Green);
    }

    #[test]
    fn specialty_index_round_trips_all() {
        for (i, s) in Specialty::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn adult_specialties_exclude_pediatrics() {
        assert!(!Specialty::ADULT.contains(&Specialty::Pediatrics));
        assert_eq!(Specialty::ADULT.len(), 5);
    }

    #[test]
    fn minor_with_guardian_takes_two_seats() {
        let p = PatientRecord::new(PatientId(1), 10, true, false, true);
        assert_eq!(p.waitroom_seats(), 2);
    }

    #[test]
    fn adult_takes_one_seat() {
        let p = PatientRecord::new(PatientId(2), 40, false, false, false);
        assert_eq!(p.waitroom_seats(), 1);
    }
}
