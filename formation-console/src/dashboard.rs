//! Home dashboards: the recent-activity feed and the manager statistics.

use chrono::{DateTime, Utc};
use formation_client::ActivityApi;
use formation_core::{ActivityRecord, EntityId, EntityKind, Participant, Role, Trainer, Training};
use futures_util::future::join_all;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const NON_ADMIN_FEEDS: [EntityKind; 3] = [
    EntityKind::Trainings,
    EntityKind::Trainers,
    EntityKind::Participants,
];

/// Entities whose activity feed a role sees.
pub fn feed_kinds(role: Role) -> &'static [EntityKind] {
    match role {
        Role::Admin => EntityKind::all(),
        Role::User | Role::Manager => &NON_ADMIN_FEEDS,
    }
}

/// One rendered feed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub kind: EntityKind,
    pub id: EntityId,
    pub label: String,
    pub time_ago: String,
}

/// Per-entity activity feeds, in tab order.
#[derive(Debug, Clone, Default)]
pub struct RecentActivities {
    feeds: Vec<(EntityKind, Vec<ActivityRecord>)>,
}

impl RecentActivities {
    /// Fetch every feed the role sees, concurrently. A failed feed is
    /// logged and shows as empty.
    pub async fn load<A>(api: &A, role: Role) -> Self
    where
        A: ActivityApi + ?Sized,
    {
        let kinds = feed_kinds(role);
        let results = join_all(kinds.iter().map(|kind| api.recent_activities(*kind))).await;

        let feeds = kinds
            .iter()
            .zip(results)
            .map(|(kind, result)| match result {
                Ok(records) => {
                    debug!(entity = %kind, count = records.len(), "loaded recent activity");
                    (*kind, records)
                }
                Err(e) => {
                    warn!(entity = %kind, error = %e, "recent activity unavailable");
                    (*kind, Vec::new())
                }
            })
            .collect();
        Self { feeds }
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.feeds.iter().map(|(kind, _)| *kind)
    }

    pub fn records(&self, kind: EntityKind) -> &[ActivityRecord] {
        self.feeds
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn entries(&self, kind: EntityKind, now: DateTime<Utc>) -> Vec<ActivityEntry> {
        self.records(kind)
            .iter()
            .map(|record| ActivityEntry {
                kind,
                id: record.id.clone(),
                label: record.label(kind),
                time_ago: format_time_ago(now, record.updated_at),
            })
            .collect()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Relative age of a timestamp. Past 30 days the ISO date is shown.
pub fn format_time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    then.format("%Y-%m-%d").to_string()
}

/// Aggregates shown on the manager statistics section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub training_count: usize,
    pub total_budget: i64,
    pub trainer_count: usize,
    pub participant_count: usize,
    pub trainings_per_year: BTreeMap<i64, usize>,
    pub trainings_per_field: BTreeMap<String, usize>,
    pub participants_per_profile: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn compute(trainings: &[Training], trainers: &[Trainer], participants: &[Participant]) -> Self {
        let mut stats = Statistics {
            training_count: trainings.len(),
            trainer_count: trainers.len(),
            participant_count: participants.len(),
            ..Statistics::default()
        };

        for training in trainings {
            stats.total_budget += training.budget.unwrap_or(0);
            if let Some(year) = training.year {
                *stats.trainings_per_year.entry(year).or_default() += 1;
            }
            if !training.field.is_empty() {
                *stats
                    .trainings_per_field
                    .entry(training.field.clone())
                    .or_default() += 1;
            }
        }

        for participant in participants {
            if let Some(profile) = participant.profile {
                *stats
                    .participants_per_profile
                    .entry(profile.label().to_string())
                    .or_default() += 1;
            }
        }
        stats
    }
}
