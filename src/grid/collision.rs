//! The single legality predicate shared by creation, move and resize.

use chrono::NaiveDate;
use thiserror::Error;

use super::occupancy::OccupancyIndex;
use super::time_grid::TimeGrid;
use crate::models::placement::Placement;

/// Why a placement is not legal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementRejection {
    #[error("{0} is not in the displayed week")]
    OutsideWeek(NaiveDate),

    #[error("{count} slot(s) from slot {start_slot} run past the last slot")]
    PastGridEnd { start_slot: usize, count: usize },

    #[error("slot {slot} is already taken by appointment #{owner}")]
    Occupied { slot: usize, owner: usize },
}

/// Check `candidate` against `index`.
///
/// `index` must have been built without the appointment being placed,
/// otherwise it collides with itself.
pub fn check(
    grid: &TimeGrid,
    index: &OccupancyIndex,
    candidate: &Placement,
) -> Result<(), PlacementRejection> {
    let count = grid.slots_for_duration(candidate.duration_minutes);
    let past_end = candidate
        .start_slot
        .checked_add(count)
        .map_or(true, |end| end > grid.slot_count());
    if past_end {
        return Err(PlacementRejection::PastGridEnd {
            start_slot: candidate.start_slot,
            count,
        });
    }

    let day = index
        .columns()
        .column_of(candidate.day)
        .ok_or(PlacementRejection::OutsideWeek(candidate.day))?;

    for slot in candidate.start_slot..candidate.start_slot + count {
        if let Some(owner) = index.owner(slot, day) {
            return Err(PlacementRejection::Occupied { slot, owner });
        }
    }

    Ok(())
}

/// Whether `candidate` may be placed.
pub fn can_place(grid: &TimeGrid, index: &OccupancyIndex, candidate: &Placement) -> bool {
    check(grid, index, candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::week::WeekColumns;
    use crate::models::appointment::Appointment;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn appointment(id: i64, start_slot: usize, minutes: u32) -> Appointment {
        let mut appointment = Appointment::new(format!("a{}", id), monday(), start_slot, minutes).unwrap();
        appointment.id = Some(id);
        appointment
    }

    fn index(appointments: &[Appointment], exclude: Option<i64>) -> OccupancyIndex {
        OccupancyIndex::build(
            &TimeGrid::reference(),
            &WeekColumns::starting(monday()),
            appointments,
            exclude,
        )
    }

    #[test]
    fn test_adjacent_appointment_does_not_collide() {
        // A covers slots {0, 1}; B starting at slot 2 sits right below it
        let appointments = [appointment(1, 0, 30), appointment(2, 2, 15)];
        let index = index(&appointments, Some(2));

        assert!(can_place(
            &TimeGrid::reference(),
            &index,
            &Placement::new(monday(), 2, 15)
        ));
    }

    #[test]
    fn test_overlapping_appointment_collides() {
        // A covers slots {0, 1, 2}
        let appointments = [appointment(1, 0, 45), appointment(2, 2, 15)];
        let index = index(&appointments, Some(2));

        assert_eq!(
            check(&TimeGrid::reference(), &index, &Placement::new(monday(), 2, 15)),
            Err(PlacementRejection::Occupied { slot: 2, owner: 0 })
        );
    }

    #[test]
    fn test_sixty_minutes_at_last_slot_is_rejected() {
        let index = index(&[], None);
        let grid = TimeGrid::reference();

        assert_eq!(
            check(&grid, &index, &Placement::new(monday(), 39, 60)),
            Err(PlacementRejection::PastGridEnd {
                start_slot: 39,
                count: 4
            })
        );
        assert!(can_place(&grid, &index, &Placement::new(monday(), 36, 60)));
    }

    #[test]
    fn test_day_outside_week_is_rejected() {
        let index = index(&[], None);
        let sunday_before = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

        assert_eq!(
            check(
                &TimeGrid::reference(),
                &index,
                &Placement::new(sunday_before, 0, 15)
            ),
            Err(PlacementRejection::OutsideWeek(sunday_before))
        );
    }

    #[test]
    fn test_subject_collides_with_itself_unless_excluded() {
        let appointments = [appointment(1, 4, 30)];
        let grid = TimeGrid::reference();
        let placement = appointments[0].placement();

        assert!(!can_place(&grid, &index(&appointments, None), &placement));
        assert!(can_place(&grid, &index(&appointments, Some(1)), &placement));
    }

    #[test]
    fn test_start_slot_overflow_is_rejected() {
        let index = index(&[], None);
        assert!(!can_place(
            &TimeGrid::reference(),
            &index,
            &Placement::new(monday(), usize::MAX, 15)
        ));
    }
}
