use serde::{Serialize, Serializer};
use time::{Date, Duration};

use crate::food_entries::repo_types::FoodEntry;
use crate::profiles::repo_types::Profile;

pub const DEFAULT_CALORIES: i32 = 2000;
pub const DEFAULT_PROTEIN: i32 = 150;
pub const DEFAULT_CARBS: i32 = 250;
pub const DEFAULT_FAT: i32 = 70;

/// A day is on target when its total is within this fraction of the goal.
const ON_TARGET_TOLERANCE: f64 = 0.10;
pub const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Missing macros count as zero.
pub fn sum_entries<'a>(entries: impl IntoIterator<Item = &'a FoodEntry>) -> NutritionTotals {
    entries
        .into_iter()
        .fold(NutritionTotals::default(), |acc, e| NutritionTotals {
            calories: acc.calories + e.calories,
            protein: acc.protein + e.protein.unwrap_or(0.0),
            carbs: acc.carbs + e.carbs.unwrap_or(0.0),
            fat: acc.fat + e.fat.unwrap_or(0.0),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Goals {
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: DEFAULT_CALORIES,
            protein: DEFAULT_PROTEIN,
            carbs: DEFAULT_CARBS,
            fat: DEFAULT_FAT,
        }
    }
}

impl Goals {
    /// Unset or non-positive targets fall back to the defaults.
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        let d = Goals::default();
        let Some(p) = profile else { return d };
        let positive_or = |v: Option<i32>, default: i32| v.filter(|v| *v > 0).unwrap_or(default);
        Self {
            calories: positive_or(p.daily_calories, d.calories),
            protein: positive_or(p.protein_goal, d.protein),
            carbs: positive_or(p.carbs_goal, d.carbs),
            fat: positive_or(p.fat_goal, d.fat),
        }
    }
}

/// `value / goal * 100`, or 0 for a non-positive goal.
pub fn percent(value: f64, goal: i32) -> f64 {
    if goal <= 0 {
        return 0.0;
    }
    value / f64::from(goal) * 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    pub totals: NutritionTotals,
    pub goals: Goals,
    pub percent: NutritionTotals,
    pub entry_count: usize,
}

impl DailyProgress {
    pub fn new(entries: &[FoodEntry], goals: Goals) -> Self {
        let totals = sum_entries(entries);
        Self {
            percent: NutritionTotals {
                calories: percent(totals.calories, goals.calories),
                protein: percent(totals.protein, goals.protein),
                carbs: percent(totals.carbs, goals.carbs),
                fat: percent(totals.fat, goals.fat),
            },
            totals,
            goals,
            entry_count: entries.len(),
        }
    }
}

fn iso_date<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(date)
}

fn iso_date_opt<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.collect_str(d),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCalories {
    #[serde(serialize_with = "iso_date")]
    pub date: Date,
    pub calories: f64,
    pub goal: i32,
    pub entries: usize,
}

impl DayCalories {
    fn on_target(&self) -> bool {
        self.entries > 0
            && (self.calories - f64::from(self.goal)).abs()
                <= f64::from(self.goal) * ON_TARGET_TOLERANCE
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub days: Vec<DayCalories>,
    pub average_calories: f64,
    pub days_on_target: usize,
    #[serde(serialize_with = "iso_date_opt")]
    pub best_day: Option<Date>,
    pub macro_averages: NutritionTotals,
}

/// Summarises the seven UTC days ending with `today`.
pub fn weekly_summary(entries: &[FoodEntry], goals: Goals, today: Date) -> WeeklySummary {
    let first = today - Duration::days(WEEK_DAYS - 1);
    let in_week = |e: &&FoodEntry| {
        let d = e.meal_time.to_offset(time::UtcOffset::UTC).date();
        d >= first && d <= today
    };

    let days: Vec<DayCalories> = (0..WEEK_DAYS)
        .map(|i| {
            let date = first + Duration::days(i);
            let on_day: Vec<&FoodEntry> = entries
                .iter()
                .filter(|e| e.meal_time.to_offset(time::UtcOffset::UTC).date() == date)
                .collect();
            DayCalories {
                date,
                calories: sum_entries(on_day.iter().copied()).calories,
                goal: goals.calories,
                entries: on_day.len(),
            }
        })
        .collect();

    let week = sum_entries(entries.iter().filter(in_week));
    let n = WEEK_DAYS as f64;

    let mut best: Option<&DayCalories> = None;
    for day in days.iter().filter(|d| d.entries > 0) {
        let gap = (day.calories - f64::from(goals.calories)).abs();
        let better = match best {
            None => true,
            Some(b) => gap < (b.calories - f64::from(goals.calories)).abs(),
        };
        if better {
            best = Some(day);
        }
    }

    WeeklySummary {
        average_calories: week.calories / n,
        days_on_target: days.iter().filter(|d| d.on_target()).count(),
        best_day: best.map(|d| d.date),
        macro_averages: NutritionTotals {
            calories: week.calories / n,
            protein: week.protein / n,
            carbs: week.carbs / n,
            fat: week.fat / n,
        },
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn totals_treat_missing_macros_as_zero() {
        let mut a = FoodEntry::sample(datetime!(2026-03-01 08:00 UTC), 300.0, Some(20.0));
        a.fat = Some(5.0);
        let b = FoodEntry::sample(datetime!(2026-03-01 12:00 UTC), 450.5, None);
        let t = sum_entries(&[a, b]);
        assert_eq!(t.calories, 750.5);
        assert_eq!(t.protein, 20.0);
        assert_eq!(t.carbs, 0.0);
        assert_eq!(t.fat, 5.0);
        let none: [FoodEntry; 0] = [];
        assert_eq!(sum_entries(&none), NutritionTotals::default());
    }

    #[test]
    fn percent_guards_zero_goal() {
        assert_eq!(percent(1000.0, 2000), 50.0);
        assert_eq!(percent(150.0, 0), 0.0);
        assert_eq!(percent(150.0, -5), 0.0);
    }

    #[test]
    fn goals_fall_back_per_field() {
        assert_eq!(Goals::from_profile(None), Goals::default());

        let mut p = Profile::empty(Uuid::nil());
        p.daily_calories = Some(1800);
        p.fat_goal = Some(60);
        let g = Goals::from_profile(Some(&p));
        assert_eq!(
            g,
            Goals {
                calories: 1800,
                protein: 150,
                carbs: 250,
                fat: 60
            }
        );

        p.daily_calories = Some(0);
        p.protein_goal = Some(0);
        p.carbs_goal = Some(-10);
        let g = Goals::from_profile(Some(&p));
        assert_eq!(g.calories, 2000);
        assert_eq!(g.protein, 150);
        assert_eq!(g.carbs, 250);
        assert_eq!(g.fat, 60);
    }

    #[test]
    fn daily_progress_reports_count_and_percent() {
        let entries = vec![
            FoodEntry::sample(datetime!(2026-03-01 08:00 UTC), 500.0, Some(30.0)),
            FoodEntry::sample(datetime!(2026-03-01 19:00 UTC), 500.0, Some(45.0)),
        ];
        let p = DailyProgress::new(&entries, Goals::default());
        assert_eq!(p.entry_count, 2);
        assert_eq!(p.totals.calories, 1000.0);
        assert_eq!(p.percent.calories, 50.0);
        assert_eq!(p.percent.protein, 50.0);
    }

    #[test]
    fn weekly_summary_covers_seven_days() {
        let today = date!(2026-03-07);
        let entries = vec![
            // outside the window
            FoodEntry::sample(datetime!(2026-02-28 12:00 UTC), 9000.0, None),
            FoodEntry::sample(datetime!(2026-03-01 12:00 UTC), 1900.0, Some(100.0)),
            FoodEntry::sample(datetime!(2026-03-03 09:00 UTC), 1500.0, None),
            FoodEntry::sample(datetime!(2026-03-03 20:00 UTC), 600.0, None),
            FoodEntry::sample(datetime!(2026-03-07 13:00 UTC), 2500.0, Some(40.0)),
        ];
        let s = weekly_summary(&entries, Goals::default(), today);

        assert_eq!(s.days.len(), 7);
        assert_eq!(s.days[0].date, date!(2026-03-01));
        assert_eq!(s.days[6].date, today);
        assert_eq!(s.days[2].calories, 2100.0);
        assert_eq!(s.days[2].entries, 2);
        assert_eq!(s.days[1].entries, 0);

        // 1900 + 2100 + 2500 over seven days
        assert_eq!(s.average_calories, 6500.0 / 7.0);
        assert_eq!(s.macro_averages.protein, 140.0 / 7.0);
        // 1900 and 2100 are within 10% of 2000, 2500 is not
        assert_eq!(s.days_on_target, 2);
        // 1900 and 2100 tie; earliest wins
        assert_eq!(s.best_day, Some(date!(2026-03-01)));
    }

    #[test]
    fn empty_week_has_no_best_day() {
        let s = weekly_summary(&[], Goals::default(), date!(2026-03-07));
        assert_eq!(s.average_calories, 0.0);
        assert_eq!(s.days_on_target, 0);
        assert_eq!(s.best_day, None);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["best_day"], serde_json::Value::Null);
        assert_eq!(json["days"][0]["date"], "2026-03-01");
    }
}
