use anyhow::Result;
use shared::{
    CreateDailyLogRequest, CreateGrowthRecordRequest, DailyLog as SharedDailyLog, DailySummary,
    GrowthRecord as SharedGrowthRecord,
};

use crate::domain::calendar::{format_date, format_timestamp};
use crate::domain::commands::tracking::{CreateDailyLogCommand, CreateGrowthRecordCommand, DailySummaryResult};
use crate::domain::models::daily_log::DailyLog;
use crate::domain::models::growth::GrowthRecord;

/// Mapper between the tracking DTOs and the growth/daily log models
pub struct TrackingMapper;

impl TrackingMapper {
    pub fn to_growth_dto(domain: GrowthRecord) -> SharedGrowthRecord {
        SharedGrowthRecord {
            id: domain.id,
            child_id: domain.child_id,
            height_cm: domain.height_cm,
            weight_kg: domain.weight_kg,
            head_circumference_cm: domain.head_circumference_cm,
            recorded_at: format_timestamp(&domain.recorded_at),
            notes: domain.notes,
            created_at: format_timestamp(&domain.created_at),
        }
    }

    pub fn to_growth_command(request: CreateGrowthRecordRequest) -> CreateGrowthRecordCommand {
        CreateGrowthRecordCommand {
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            head_circumference_cm: request.head_circumference_cm,
            recorded_at: request.recorded_at,
            notes: request.notes,
        }
    }

    /// The typed payload goes back on the wire as a plain `data` object
    pub fn to_log_dto(domain: DailyLog) -> Result<SharedDailyLog> {
        Ok(SharedDailyLog {
            log_type: domain.log_type(),
            data: domain.payload.to_value()?,
            id: domain.id,
            child_id: domain.child_id,
            started_at: domain.started_at.as_ref().map(format_timestamp),
            ended_at: domain.ended_at.as_ref().map(format_timestamp),
            notes: domain.notes,
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
        })
    }

    pub fn to_log_command(request: CreateDailyLogRequest) -> CreateDailyLogCommand {
        CreateDailyLogCommand {
            log_type: request.log_type,
            data: request.data,
            started_at: request.started_at,
            ended_at: request.ended_at,
            notes: request.notes,
        }
    }

    pub fn to_summary_dto(summary: DailySummaryResult) -> DailySummary {
        DailySummary {
            date: format_date(summary.date),
            sleep: summary.sleep,
            feeding: summary.feeding,
            diaper: summary.diaper,
        }
    }
}
