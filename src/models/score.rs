// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user score aggregate for the dashboard and tracker screens.
//!
//! One row per user in `user_scores`, upserted after each logged carbon
//! activity so the dashboard reads O(1) rows instead of re-scanning the
//! activity log.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eco score a brand-new user starts from.
const STARTING_ECO_SCORE: f64 = 50.0;

/// Points awarded for logging any activity, before the per-kg bonus.
const POINTS_PER_ACTIVITY: i64 = 10;

/// Pre-computed score row for a user.
///
/// Stored in `user_scores`, keyed by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserScore {
    /// Owning user
    pub user_id: Uuid,
    /// Gamified 0–100 score
    pub eco_score: f64,
    /// Running total of tracked emissions (kg CO₂)
    pub co2_saved: f64,
    /// Lifetime points
    pub points_earned: i64,
    /// Consecutive days with at least one logged activity
    pub streak_days: u32,
    /// Emissions per weekday of the current ISO week (Mon..Sun, kg CO₂)
    pub weekly_data: Vec<f64>,
    /// When an activity was last applied
    pub updated_at: DateTime<Utc>,
}

impl UserScore {
    /// Fresh score row for a user with no logged activity.
    pub fn new(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            eco_score: STARTING_ECO_SCORE,
            co2_saved: 0.0,
            points_earned: 0,
            streak_days: 0,
            weekly_data: vec![0.0; 7],
            updated_at: now,
        }
    }

    /// Fold one logged activity into the aggregate.
    ///
    /// `activity_date` drives the streak and weekly bucketing, so backdated
    /// entries land in the right weekday slot.
    pub fn apply_activity(&mut self, co2_kg: f64, activity_date: DateTime<Utc>) {
        let day = activity_date.date_naive();
        let last = self.updated_at.date_naive();

        let points = POINTS_PER_ACTIVITY + co2_kg.ceil().max(0.0) as i64;
        self.points_earned += points;
        self.co2_saved += co2_kg;
        self.eco_score = (self.eco_score + points as f64 / 10.0).min(100.0);

        if self.streak_days == 0 {
            self.streak_days = 1;
        } else if day == last {
            // Second activity on the same day leaves the streak alone
        } else if (day - last).num_days() == 1 {
            self.streak_days += 1;
        } else {
            self.streak_days = 1;
        }

        if self.weekly_data.len() != 7 || week_key(day) != week_key(last) {
            self.weekly_data = vec![0.0; 7];
        }
        let slot = day.weekday().num_days_from_monday() as usize;
        self.weekly_data[slot] += co2_kg;

        self.updated_at = activity_date;
    }

    /// Mean of the weekly buckets, shown as "average daily" on the tracker.
    pub fn average_daily(&self) -> f64 {
        self.weekly_data.iter().sum::<f64>() / 7.0
    }

    /// Progress (0–100 each) toward the three weekly goals shown on the
    /// dashboard: eco score, activity logging, and streak keeping.
    pub fn goal_progress(&self, recent_activity_count: usize) -> [u32; 3] {
        [
            (self.eco_score.floor() as u32).min(100),
            ((recent_activity_count as u32) * 20).min(100),
            if self.streak_days > 0 { 100 } else { 0 },
        ]
    }
}

/// ISO week identity of a date ("which week is this"), year + week number.
fn week_key(day: NaiveDate) -> (i32, u32) {
    let week = day.iso_week();
    (week.year(), week.week())
}
