//! Growth measurements and daily care logs, plus the per-day summary.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{DiaperSummary, FeedingSummary, LogType, SleepSummary};
use tracing::info;

use crate::domain::calendar::LocalCalendar;
use crate::domain::child_service::find_owned_child;
use crate::domain::commands::tracking::{CreateDailyLogCommand, CreateGrowthRecordCommand, DailySummaryResult};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::daily_log::{DailyLog, LogPayload};
use crate::domain::models::growth::GrowthRecord;
use crate::storage::traits::{ChildStorage, DailyLogStorage, GrowthStorage};

const MAX_HEIGHT_CM: f64 = 200.0;
const MAX_WEIGHT_KG: f64 = 50.0;
const MAX_HEAD_CIRCUMFERENCE_CM: f64 = 100.0;

/// Tally one local day of logs into sleep, feeding and diaper buckets.
/// Sleep logs missing either end still count but add no minutes.
pub fn summarize_day(date: NaiveDate, logs: &[DailyLog]) -> DailySummaryResult {
    let mut sleep = SleepSummary::default();
    let mut feeding = FeedingSummary::default();
    let mut diaper = DiaperSummary::default();

    for log in logs {
        match log.log_type() {
            LogType::Sleep => {
                sleep.count += 1;
                sleep.total_minutes += log.duration_minutes().unwrap_or(0);
            }
            LogType::FeedBreast => feeding.breast += 1,
            LogType::FeedBottle => feeding.bottle += 1,
            LogType::FeedSolid => feeding.solid += 1,
            LogType::DiaperWet => diaper.wet += 1,
            LogType::DiaperDirty => diaper.dirty += 1,
            LogType::DiaperMixed => diaper.mixed += 1,
            LogType::Medication | LogType::Symptom | LogType::Activity => {}
        }
    }

    feeding.count = feeding.breast + feeding.bottle + feeding.solid;
    diaper.count = diaper.wet + diaper.dirty + diaper.mixed;
    sleep.total_hours = (sleep.total_minutes as f64 / 60.0 * 10.0).round() / 10.0;

    DailySummaryResult {
        date,
        sleep,
        feeding,
        diaper,
    }
}

fn check_range(field: &str, value: Option<f64>, max: f64) -> DomainResult<()> {
    match value {
        Some(v) if !(v > 0.0 && v <= max) => Err(DomainError::validation(format!(
            "{} must be greater than 0 and at most {}",
            field, max
        ))),
        _ => Ok(()),
    }
}

/// Service for growth records and daily logs
#[derive(Clone)]
pub struct TrackingService {
    children: Arc<dyn ChildStorage>,
    growth: Arc<dyn GrowthStorage>,
    logs: Arc<dyn DailyLogStorage>,
    calendar: LocalCalendar,
}

impl TrackingService {
    pub fn new(
        children: Arc<dyn ChildStorage>,
        growth: Arc<dyn GrowthStorage>,
        logs: Arc<dyn DailyLogStorage>,
        calendar: LocalCalendar,
    ) -> Self {
        Self {
            children,
            growth,
            logs,
            calendar,
        }
    }

    pub async fn create_growth_record(
        &self,
        user_id: &str,
        child_id: &str,
        command: CreateGrowthRecordCommand,
    ) -> DomainResult<GrowthRecord> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;

        check_range("heightCm", command.height_cm, MAX_HEIGHT_CM)?;
        check_range("weightKg", command.weight_kg, MAX_WEIGHT_KG)?;
        check_range("headCircumferenceCm", command.head_circumference_cm, MAX_HEAD_CIRCUMFERENCE_CM)?;

        let recorded_at = match &command.recorded_at {
            Some(value) => self.calendar.parse_past_timestamp(value, "recordedAt")?,
            None => self.calendar.now(),
        };

        let record = GrowthRecord {
            id: GrowthRecord::generate_id(),
            child_id: child.id,
            height_cm: command.height_cm,
            weight_kg: command.weight_kg,
            head_circumference_cm: command.head_circumference_cm,
            recorded_at,
            notes: command.notes,
            created_at: self.calendar.now(),
        };

        if !record.has_measurement() {
            return Err(DomainError::validation(
                "At least one of heightCm, weightKg or headCircumferenceCm is required",
            ));
        }

        self.growth.store_growth_record(&record).await?;
        info!("Stored growth record {} for child {}", record.id, record.child_id);
        Ok(record)
    }

    pub async fn list_growth_records(&self, user_id: &str, child_id: &str) -> DomainResult<Vec<GrowthRecord>> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        Ok(self.growth.list_growth_records(&child.id).await?)
    }

    pub async fn latest_growth_record(&self, user_id: &str, child_id: &str) -> DomainResult<Option<GrowthRecord>> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        Ok(self.growth.latest_growth_record(&child.id).await?)
    }

    pub async fn create_daily_log(
        &self,
        user_id: &str,
        child_id: &str,
        command: CreateDailyLogCommand,
    ) -> DomainResult<DailyLog> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;

        let payload = LogPayload::from_parts(command.log_type, command.data).map_err(|e| {
            DomainError::validation(format!("Invalid data for {} log: {}", command.log_type, e))
        })?;

        let started_at = command
            .started_at
            .as_deref()
            .map(|v| self.calendar.parse_timestamp(v))
            .transpose()?;
        let ended_at = command
            .ended_at
            .as_deref()
            .map(|v| self.calendar.parse_timestamp(v))
            .transpose()?;
        if let (Some(start), Some(end)) = (started_at, ended_at) {
            if end < start {
                return Err(DomainError::validation("endedAt cannot be before startedAt"));
            }
        }

        let now = self.calendar.now();
        let log = DailyLog {
            id: DailyLog::generate_id(),
            child_id: child.id,
            payload,
            started_at,
            ended_at,
            notes: command.notes,
            created_at: now,
            updated_at: now,
        };

        self.logs.store_daily_log(&log).await?;
        info!("Stored {} log {} for child {}", log.log_type(), log.id, log.child_id);
        Ok(log)
    }

    /// Logs created on the local day named by `date` (today when absent)
    pub async fn list_daily_logs(
        &self,
        user_id: &str,
        child_id: &str,
        date: Option<&str>,
    ) -> DomainResult<Vec<DailyLog>> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        let day = self.calendar.parse_day(date)?;
        self.logs_on(&child.id, day).await
    }

    pub async fn daily_summary(
        &self,
        user_id: &str,
        child_id: &str,
        date: Option<&str>,
    ) -> DomainResult<DailySummaryResult> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        let day = self.calendar.parse_day(date)?;
        let logs = self.logs_on(&child.id, day).await?;
        Ok(summarize_day(day, &logs))
    }

    async fn logs_on(&self, child_id: &str, day: NaiveDate) -> DomainResult<Vec<DailyLog>> {
        let (start, end) = self.calendar.day_bounds(day)?;
        Ok(self.logs.list_daily_logs_between(child_id, start, end).await?)
    }
}
