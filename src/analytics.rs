// src/analytics.rs
//! Read-only statistics over the saved sessions.
use crate::models::{Sessions, SetEntry, WorkoutSession};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverallStats {
    pub total_workouts: usize,
    pub total_volume: f64,
    pub total_sets: usize,
    pub total_reps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub max_weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyPartShare {
    pub body_part: String,
    pub count: usize,
}

/// One session's figures for a single exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_volume: f64,
    pub max_reps: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgressReport {
    pub unique_exercises: Vec<String>,
    pub overall: OverallStats,
    pub personal_records: Vec<PersonalRecord>,
    pub body_parts: Vec<BodyPartShare>,
}

#[must_use]
pub fn overall_stats(sessions: &Sessions) -> OverallStats {
    let mut stats = OverallStats {
        total_workouts: sessions.len(),
        ..OverallStats::default()
    };
    for set in sessions
        .values()
        .flat_map(|s| s.exercises.iter())
        .filter(|ex| !ex.name.is_empty())
        .flat_map(|ex| ex.sets.iter())
    {
        stats.total_volume += set.volume();
        stats.total_sets += 1;
        stats.total_reps += u64::from(set.reps);
    }
    stats
}

/// Heaviest set per exercise name, heaviest first. A record is only taken
/// by a strictly heavier set, so ties keep the earliest date and
/// exercises never lifted above zero have no record.
#[must_use]
pub fn personal_records(sessions: &Sessions) -> Vec<PersonalRecord> {
    let mut records: Vec<PersonalRecord> = Vec::new();
    for session in sessions.values() {
        for exercise in session.exercises.iter().filter(|ex| !ex.name.is_empty()) {
            for set in &exercise.sets {
                match records.iter_mut().find(|r| r.exercise_name == exercise.name) {
                    Some(record) if set.weight > record.max_weight => {
                        record.max_weight = set.weight;
                        record.date = session.date;
                    }
                    Some(_) => {}
                    None if set.weight > 0.0 => records.push(PersonalRecord {
                        exercise_name: exercise.name.clone(),
                        max_weight: set.weight,
                        date: session.date,
                    }),
                    None => {}
                }
            }
        }
    }
    records.sort_by(|a, b| b.max_weight.total_cmp(&a.max_weight));
    records
}

/// Exercise occurrences per body part, in first-seen order.
#[must_use]
pub fn body_part_distribution(sessions: &Sessions) -> Vec<BodyPartShare> {
    let mut shares: Vec<BodyPartShare> = Vec::new();
    for exercise in sessions.values().flat_map(|s| s.exercises.iter()) {
        if exercise.name.is_empty() || exercise.body_part.is_empty() {
            continue;
        }
        match shares.iter_mut().find(|s| s.body_part == exercise.body_part) {
            Some(share) => share.count += 1,
            None => shares.push(BodyPartShare {
                body_part: exercise.body_part.clone(),
                count: 1,
            }),
        }
    }
    shares
}

/// Distinct exercise names ever logged, sorted.
#[must_use]
pub fn unique_exercise_names(sessions: &Sessions) -> Vec<String> {
    let mut names: Vec<String> = sessions
        .values()
        .flat_map(|s| s.exercises.iter())
        .filter(|ex| !ex.name.is_empty())
        .map(|ex| ex.name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[must_use]
pub fn progress_report(sessions: &Sessions) -> ProgressReport {
    ProgressReport {
        unique_exercises: unique_exercise_names(sessions),
        overall: overall_stats(sessions),
        personal_records: personal_records(sessions),
        body_parts: body_part_distribution(sessions),
    }
}

/// Per-session figures for `name`, oldest first. Only the first matching
/// exercise of a session counts.
#[must_use]
pub fn exercise_series(sessions: &Sessions, name: &str) -> Vec<SeriesPoint> {
    sessions
        .values()
        .filter_map(|session| {
            let exercise = session.exercises.iter().find(|ex| ex.name == name)?;
            let sets = &exercise.sets;
            Some(SeriesPoint {
                date: session.date,
                max_weight: sets.iter().map(|s| s.weight).fold(0.0, f64::max),
                total_volume: sets.iter().map(SetEntry::volume).sum(),
                max_reps: sets.iter().map(|s| s.reps).max().unwrap_or(0),
            })
        })
        .collect()
}

/// The last session strictly before `before` where `name` had a set with
/// reps or weight entered.
#[must_use]
pub fn last_performance<'a>(
    sessions: &'a Sessions,
    name: &str,
    before: NaiveDate,
) -> Option<&'a WorkoutSession> {
    sessions.range(..before).rev().map(|(_, s)| s).find(|session| {
        session
            .exercises
            .iter()
            .filter(|ex| ex.name == name)
            .any(|ex| ex.sets.iter().any(|s| s.reps > 0 || s.weight > 0.0))
    })
}

/// Every day of the month paired with whether a workout was saved on it.
/// An invalid month yields nothing.
#[must_use]
pub fn month_overview(sessions: &Sessions, year: i32, month: u32) -> Vec<(NaiveDate, bool)> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|d| (d, sessions.contains_key(&d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Exercise;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn exercise(name: &str, body_part: &str, sets: &[(u32, f64)]) -> Exercise {
        Exercise {
            id: format!("{name}-id"),
            name: name.into(),
            body_part: body_part.into(),
            image_url: None,
            is_custom: false,
            sets: sets
                .iter()
                .map(|(reps, weight)| SetEntry {
                    id: "set".into(),
                    reps: *reps,
                    weight: *weight,
                })
                .collect(),
        }
    }

    fn sessions(list: Vec<(NaiveDate, Vec<Exercise>)>) -> Sessions {
        list.into_iter()
            .map(|(date, exercises)| (date, WorkoutSession { date, exercises }))
            .collect()
    }

    #[test]
    fn test_personal_record_and_volume() {
        let data = sessions(vec![
            (date(1), vec![exercise("Squat", "Legs", &[(5, 100.0)])]),
            (date(3), vec![exercise("Squat", "Legs", &[(5, 90.0)])]),
            (date(5), vec![exercise("Squat", "Legs", &[(3, 120.0)])]),
        ]);
        let report = progress_report(&data);
        assert_eq!(report.overall.total_workouts, 3);
        assert_eq!(report.overall.total_volume, 1310.0);
        assert_eq!(report.overall.total_sets, 3);
        assert_eq!(report.overall.total_reps, 13);
        assert_eq!(
            report.personal_records,
            vec![PersonalRecord {
                exercise_name: "Squat".into(),
                max_weight: 120.0,
                date: date(5),
            }]
        );
    }

    #[test]
    fn test_volume_across_sets() {
        let data = sessions(vec![(
            date(2),
            vec![exercise("Squat", "Legs", &[(10, 50.0), (8, 60.0)])],
        )]);
        assert_eq!(exercise_series(&data, "Squat")[0].total_volume, 980.0);
        assert_eq!(overall_stats(&data).total_volume, 980.0);
    }

    #[test]
    fn test_records_sorted_and_zero_weight_skipped() {
        let data = sessions(vec![
            (
                date(1),
                vec![
                    exercise("Squat", "Legs", &[(5, 140.0)]),
                    exercise("Plank", "Core", &[(60, 0.0)]),
                    exercise("Curl", "Arms", &[(10, 15.0)]),
                ],
            ),
            (date(2), vec![exercise("Squat", "Legs", &[(5, 140.0)])]),
        ]);
        let records = personal_records(&data);
        let names: Vec<&str> = records.iter().map(|r| r.exercise_name.as_str()).collect();
        assert_eq!(names, ["Squat", "Curl"]);
        assert_eq!(records[0].date, date(1));
    }

    #[test]
    fn test_body_part_distribution_first_seen() {
        let data = sessions(vec![
            (
                date(1),
                vec![
                    exercise("Squat", "Legs", &[]),
                    exercise("Bench Press", "Chest", &[]),
                ],
            ),
            (date(2), vec![exercise("Lunge", "Legs", &[]), exercise("?", "", &[])]),
        ]);
        assert_eq!(
            body_part_distribution(&data),
            vec![
                BodyPartShare {
                    body_part: "Legs".into(),
                    count: 2
                },
                BodyPartShare {
                    body_part: "Chest".into(),
                    count: 1
                },
            ]
        );
        assert_eq!(unique_exercise_names(&data), ["?", "Bench Press", "Lunge", "Squat"]);
    }

    #[test]
    fn test_unnamed_exercises_are_not_counted() {
        let data = sessions(vec![(
            date(6),
            vec![
                exercise("Squat", "Legs", &[(5, 100.0)]),
                exercise("", "Core", &[(20, 10.0), (20, 10.0)]),
            ],
        )]);
        let stats = overall_stats(&data);
        assert_eq!(stats.total_workouts, 1);
        assert_eq!(stats.total_sets, 1);
        assert_eq!(stats.total_reps, 5);
        assert_eq!(stats.total_volume, 500.0);
        assert_eq!(
            body_part_distribution(&data),
            vec![BodyPartShare {
                body_part: "Legs".into(),
                count: 1
            }]
        );
        assert!(personal_records(&data).iter().all(|r| r.exercise_name == "Squat"));
    }

    #[test]
    fn test_exercise_series_oldest_first() {
        let data = sessions(vec![
            (date(9), vec![exercise("Squat", "Legs", &[(5, 110.0), (3, 120.0)])]),
            (date(2), vec![exercise("Squat", "Legs", &[(5, 100.0)])]),
            (date(4), vec![exercise("Lunge", "Legs", &[(10, 20.0)])]),
        ]);
        let series = exercise_series(&data, "Squat");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(2));
        assert_eq!(series[1].max_weight, 120.0);
        assert_eq!(series[1].total_volume, 910.0);
        assert_eq!(series[1].max_reps, 5);
        assert!(exercise_series(&data, "Deadlift").is_empty());
    }

    #[test]
    fn test_last_performance_skips_empty_sets() {
        let data = sessions(vec![
            (date(1), vec![exercise("Squat", "Legs", &[(5, 100.0)])]),
            (date(5), vec![exercise("Squat", "Legs", &[(0, 0.0)])]),
            (date(8), vec![exercise("Squat", "Legs", &[(5, 105.0)])]),
        ]);
        let last = last_performance(&data, "Squat", date(8)).unwrap();
        assert_eq!(last.date, date(1));
        assert!(last_performance(&data, "Squat", date(1)).is_none());
    }

    #[test]
    fn test_month_overview() {
        let data = sessions(vec![(date(19), vec![])]);
        let days = month_overview(&data, 2026, 10);
        assert_eq!(days.len(), 31);
        assert_eq!(days.iter().filter(|(_, worked)| *worked).count(), 1);
        assert!(days[18].1);
        assert_eq!(month_overview(&data, 2026, 2).len(), 28);
        assert!(month_overview(&data, 2026, 13).is_empty());
    }
}
