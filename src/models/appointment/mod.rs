// Appointment module
// Appointment blocks placed on the weekly grid

use chrono::NaiveDate;

use crate::models::placement::Placement;

/// Shortest appointment the grid accepts, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;
/// Longest appointment the grid accepts (12 hours), in minutes.
pub const MAX_DURATION_MINUTES: u32 = 720;

/// An appointment placed on a single day of the displayed week.
///
/// `start_slot` is an index into the grid's slot lattice, not a clock time;
/// the store converts between the two using the configured `TimeGrid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Option<i64>,
    pub day: NaiveDate,
    pub start_slot: usize,
    pub duration_minutes: u32,
    pub label: String,
    pub color: Option<String>,
}

impl Appointment {
    /// Create a new, unsaved appointment
    ///
    /// # Examples
    /// ```
    /// use appointment_grid::models::appointment::Appointment;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    /// let appointment = Appointment::new("Jane Doe", day, 0, 30).unwrap();
    /// assert!(appointment.id.is_none());
    /// ```
    pub fn new(
        label: impl Into<String>,
        day: NaiveDate,
        start_slot: usize,
        duration_minutes: u32,
    ) -> Result<Self, String> {
        let appointment = Self {
            id: None,
            day,
            start_slot,
            duration_minutes,
            label: label.into(),
            color: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Create a builder for constructing appointments with optional fields
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the appointment independently of any grid.
    ///
    /// The slot range is checked against the grid by `TimeGrid::contains_slot`;
    /// here only duration, label and colour are validated.
    pub fn validate(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("Appointment label cannot be empty".to_string());
        }

        if self.duration_minutes < MIN_DURATION_MINUTES {
            return Err(format!(
                "Appointment must last at least {} minutes",
                MIN_DURATION_MINUTES
            ));
        }

        if self.duration_minutes > MAX_DURATION_MINUTES {
            return Err(format!(
                "Appointment cannot last longer than {} minutes",
                MAX_DURATION_MINUTES
            ));
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || color.len() != 7 {
                return Err("Color must be in hex format (#RRGGBB)".to_string());
            }
        }

        Ok(())
    }

    /// The appointment's current placement on the grid
    pub fn placement(&self) -> Placement {
        Placement::new(self.day, self.start_slot, self.duration_minutes)
    }

    /// Copy of this appointment moved/resized to `placement`
    pub fn with_placement(&self, placement: Placement) -> Self {
        Self {
            day: placement.day,
            start_slot: placement.start_slot,
            duration_minutes: placement.duration_minutes,
            ..self.clone()
        }
    }
}

/// Builder for creating appointments with optional fields
pub struct AppointmentBuilder {
    label: Option<String>,
    day: Option<NaiveDate>,
    start_slot: Option<usize>,
    duration_minutes: Option<u32>,
    color: Option<String>,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self {
            label: None,
            day: None,
            start_slot: None,
            duration_minutes: None,
            color: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }

    pub fn start_slot(mut self, start_slot: usize) -> Self {
        self.start_slot = Some(start_slot);
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Set the display colour (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the appointment
    pub fn build(self) -> Result<Appointment, String> {
        let label = self.label.ok_or("Appointment label is required")?;
        let day = self.day.ok_or("Appointment day is required")?;
        let start_slot = self.start_slot.ok_or("Appointment start slot is required")?;
        let duration_minutes = self
            .duration_minutes
            .ok_or("Appointment duration is required")?;

        let appointment = Appointment {
            id: None,
            day,
            start_slot,
            duration_minutes,
            label,
            color: self.color,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[test]
    fn test_new_appointment_success() {
        let appointment = Appointment::new("Jane Doe", monday(), 4, 45).unwrap();

        assert_eq!(appointment.label, "Jane Doe");
        assert_eq!(appointment.day, monday());
        assert_eq!(appointment.start_slot, 4);
        assert_eq!(appointment.duration_minutes, 45);
        assert!(appointment.id.is_none());
        assert!(appointment.color.is_none());
    }

    #[test]
    fn test_new_appointment_empty_label() {
        let result = Appointment::new("  ", monday(), 0, 30);
        assert_eq!(result.unwrap_err(), "Appointment label cannot be empty");
    }

    #[test]
    fn test_duration_bounds() {
        assert!(Appointment::new("A", monday(), 0, 4).is_err());
        assert!(Appointment::new("A", monday(), 0, 5).is_ok());
        assert!(Appointment::new("A", monday(), 0, 720).is_ok());
        assert!(Appointment::new("A", monday(), 0, 721).is_err());
    }

    #[test]
    fn test_builder_with_color() {
        let appointment = Appointment::builder()
            .label("Checkup")
            .day(monday())
            .start_slot(2)
            .duration_minutes(20)
            .color("#3366CC")
            .build()
            .unwrap();

        assert_eq!(appointment.color, Some("#3366CC".to_string()));
        assert_eq!(appointment.duration_minutes, 20);
    }

    #[test]
    fn test_builder_missing_day() {
        let result = Appointment::builder()
            .label("Checkup")
            .start_slot(0)
            .duration_minutes(15)
            .build();

        assert_eq!(result.unwrap_err(), "Appointment day is required");
    }

    #[test]
    fn test_validate_invalid_color() {
        let mut appointment = Appointment::new("Checkup", monday(), 0, 15).unwrap();
        appointment.color = Some("blue".to_string());
        assert!(appointment.validate().unwrap_err().contains("hex format"));
    }

    #[test]
    fn test_with_placement_keeps_identity() {
        let mut appointment = Appointment::new("Checkup", monday(), 0, 15).unwrap();
        appointment.id = Some(7);

        let tuesday = monday().succ_opt().unwrap();
        let moved = appointment.with_placement(Placement::new(tuesday, 6, 15));

        assert_eq!(moved.id, Some(7));
        assert_eq!(moved.label, "Checkup");
        assert_eq!(moved.day, tuesday);
        assert_eq!(moved.start_slot, 6);
    }
}
