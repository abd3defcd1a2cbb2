use chrono::{Datelike, NaiveDate};

use crate::models::schedule::{DayService, MealType};

/// Weekly service policy, indexed Sunday-first (0 = Sunday .. 6 = Saturday),
/// same convention as the booking form's calendar.
///
/// Sunday: lunch · Monday: dinner · Tuesday: closed · Wed-Fri: dinner ·
/// Saturday: both.
pub const WEEKLY_SCHEDULE: [DayService; 7] = [
    DayService::Lunch,
    DayService::Dinner,
    DayService::Closed,
    DayService::Dinner,
    DayService::Dinner,
    DayService::Dinner,
    DayService::Both,
];

/// Bookable lunch slots, 30-minute cadence.
pub const LUNCH_SLOTS: &[&str] = &["12:00", "12:30", "13:00", "13:30", "14:00", "14:30"];

/// Bookable dinner slots, 30-minute cadence.
pub const DINNER_SLOTS: &[&str] = &[
    "19:00", "19:30", "20:00", "20:30", "21:00", "21:30", "22:00", "22:30",
];

const DAY_NAMES: [&str; 7] = [
    "domenica",
    "lunedì",
    "martedì",
    "mercoledì",
    "giovedì",
    "venerdì",
    "sabato",
];

/// Answers, for any calendar date, whether the restaurant serves a given meal
/// that weekday, and enumerates the bookable slots per meal.
///
/// Pure and stateless: dates are civil dates (`NaiveDate`, no time-of-day
/// component), so deriving the weekday cannot drift across a timezone
/// boundary. The tables are injected so tests can substitute an alternate
/// calendar; `Default` is the production one.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    week: [DayService; 7],
    lunch_slots: Vec<String>,
    dinner_slots: Vec<String>,
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new(WEEKLY_SCHEDULE, LUNCH_SLOTS, DINNER_SLOTS)
    }
}

impl ScheduleEngine {
    pub fn new(week: [DayService; 7], lunch_slots: &[&str], dinner_slots: &[&str]) -> Self {
        Self {
            week,
            lunch_slots: lunch_slots.iter().map(|s| s.to_string()).collect(),
            dinner_slots: dinner_slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Service offered on the given date's weekday. Total over all dates.
    pub fn day_service(&self, date: NaiveDate) -> DayService {
        self.week[date.weekday().num_days_from_sunday() as usize]
    }

    /// True when at least one meal is served that day.
    pub fn is_day_open(&self, date: NaiveDate) -> bool {
        self.day_service(date) != DayService::Closed
    }

    /// The single source of truth for "can this meal be booked on this date".
    /// Both server-side validation and the calendar endpoints go through here.
    pub fn is_meal_available(&self, date: NaiveDate, meal: MealType) -> bool {
        match self.day_service(date) {
            DayService::Closed => false,
            DayService::Both => true,
            DayService::Lunch => meal == MealType::Lunch,
            DayService::Dinner => meal == MealType::Dinner,
        }
    }

    /// Fixed bookable slots for the meal, in time order.
    pub fn time_slots(&self, meal: MealType) -> &[String] {
        match meal {
            MealType::Lunch => &self.lunch_slots,
            MealType::Dinner => &self.dinner_slots,
        }
    }

    /// Italian weekday label, presentation only.
    pub fn day_name(&self, date: NaiveDate) -> &'static str {
        DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScheduleEngine {
        ScheduleEngine::default()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn closed_day_serves_no_meal() {
        let e = engine();
        // 2026-02-17 is a Tuesday
        let tuesday = date("2026-02-17");
        assert_eq!(e.day_service(tuesday), DayService::Closed);
        assert!(!e.is_day_open(tuesday));
        assert!(!e.is_meal_available(tuesday, MealType::Lunch));
        assert!(!e.is_meal_available(tuesday, MealType::Dinner));
    }

    #[test]
    fn both_day_serves_both_meals() {
        let e = engine();
        // 2026-02-14 is a Saturday
        let saturday = date("2026-02-14");
        assert_eq!(e.day_service(saturday), DayService::Both);
        assert!(e.is_meal_available(saturday, MealType::Lunch));
        assert!(e.is_meal_available(saturday, MealType::Dinner));
    }

    #[test]
    fn single_service_day_rejects_the_other_meal() {
        let e = engine();
        // Sunday: lunch only
        let sunday = date("2026-02-15");
        assert!(e.is_meal_available(sunday, MealType::Lunch));
        assert!(!e.is_meal_available(sunday, MealType::Dinner));
        // Monday: dinner only
        let monday = date("2026-02-16");
        assert!(!e.is_meal_available(monday, MealType::Lunch));
        assert!(e.is_meal_available(monday, MealType::Dinner));
    }

    #[test]
    fn slots_are_nonempty_increasing_and_stable() {
        let e = engine();
        for meal in [MealType::Lunch, MealType::Dinner] {
            let slots = e.time_slots(meal);
            assert!(!slots.is_empty());
            // HH:MM strings sort lexicographically in time order
            for pair in slots.windows(2) {
                assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
            }
            assert_eq!(slots, e.time_slots(meal));
        }
    }

    #[test]
    fn weekday_derivation_is_calendar_stable() {
        let e = engine();
        // Same weekday a week apart maps to the same service
        assert_eq!(
            e.day_service(date("2026-02-10")),
            e.day_service(date("2026-02-17"))
        );
        // Year boundary: 2025-12-31 is a Wednesday
        assert_eq!(e.day_service(date("2025-12-31")), DayService::Dinner);
    }

    #[test]
    fn day_names_follow_the_same_index() {
        let e = engine();
        assert_eq!(e.day_name(date("2026-02-14")), "sabato");
        assert_eq!(e.day_name(date("2026-02-15")), "domenica");
        assert_eq!(e.day_name(date("2026-02-17")), "martedì");
    }

    #[test]
    fn alternate_calendar_is_honored() {
        // A restaurant closed on Mondays and open for lunch the rest of the week
        let week = [
            DayService::Lunch,
            DayService::Closed,
            DayService::Lunch,
            DayService::Lunch,
            DayService::Lunch,
            DayService::Lunch,
            DayService::Lunch,
        ];
        let e = ScheduleEngine::new(week, &["12:00"], &["19:00"]);
        let monday = date("2026-02-16");
        assert!(!e.is_day_open(monday));
        assert!(e.is_meal_available(date("2026-02-18"), MealType::Lunch));
        assert!(!e.is_meal_available(date("2026-02-18"), MealType::Dinner));
    }
}
