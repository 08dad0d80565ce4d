use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

/// Booking status lifecycle. Stored as TEXT; every status except the two
/// terminal ones reserves the assigned vehicles against other bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Inquiry,
    Tentative,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Inquiry => "INQUIRY",
            BookingStatus::Tentative => "TENTATIVE",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Ongoing => "ONGOING",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INQUIRY" => Some(BookingStatus::Inquiry),
            "TENTATIVE" => Some(BookingStatus::Tentative),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "ONGOING" => Some(BookingStatus::Ongoing),
            "COMPLETED" => Some(BookingStatus::Completed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// A blocking status reserves the vehicle: everything except the
    /// terminal states.
    pub fn is_blocking(&self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub org_id: String,
    pub reference: String,
    pub status: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub trip_type: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub org_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub trip_type: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();

        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            org_id: params.org_id,
            reference: format!("BK-{}", suffix),
            status: BookingStatus::Inquiry.as_str().to_string(),
            customer_name: params.customer_name,
            customer_phone: params.customer_phone,
            trip_type: params.trip_type,
            start_at: params.start_at,
            end_at: params.end_at,
            pickup_location: params.pickup_location,
            dropoff_location: params.dropoff_location,
            notes: params.notes,
            created_by: params.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> BookingStatus {
        // Rows only ever hold values written through BookingStatus.
        BookingStatus::parse(&self.status).unwrap_or_else(|| {
            tracing::warn!(
                booking_id = %self.id,
                status = %self.status,
                "Unparseable stored booking status, treating as INQUIRY"
            );
            BookingStatus::Inquiry
        })
    }
}

pub const RATE_TYPES: &[&str] = &["TOTAL", "PER_DAY", "PER_KM", "HYBRID"];
pub const RATE_TOTAL: &str = "TOTAL";

/// Vehicle assignment on a booking. Carries its own interval (defaulted from
/// the booking dates) plus driver contact and rate configuration.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingVehicle {
    pub id: String,
    pub org_id: String,
    pub booking_id: String,
    pub vehicle_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub rate_type: String,
    pub rate_per_day: Option<i64>,
    pub rate_per_km: Option<i64>,
    pub total_amount: i64,
    pub advance_amount: i64,
    pub payment_status: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl BookingVehicle {
    /// Total for a per-day rate, rounding partial days up. Other rate types
    /// keep whatever total the operator entered (per-km totals are only
    /// known once the trip closes).
    pub fn computed_total(rate_type: &str, rate_per_day: Option<i64>, entered_total: Option<i64>, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> i64 {
        if rate_type == "PER_DAY" {
            if let Some(rate) = rate_per_day {
                let minutes = (end_at - start_at).num_minutes().max(0);
                let days = (minutes + 1439) / 1440;
                return rate * days.max(1);
            }
        }
        entered_total.unwrap_or(0)
    }
}

/// Blocking interval row fetched for availability checks: one vehicle
/// assignment joined with its parent booking's reference and creator.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct BlockingRow {
    pub booking_id: String,
    pub reference: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub booked_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        Booking::new(NewBookingParams {
            org_id: "org-1".into(),
            customer_name: "Asha".into(),
            customer_phone: None,
            trip_type: None,
            start_at: Utc::now(),
            end_at: Utc::now() + chrono::Duration::hours(4),
            pickup_location: None,
            dropoff_location: None,
            notes: None,
            created_by: "user-1".into(),
        })
    }

    #[test]
    fn unparseable_stored_status_falls_back_to_inquiry() {
        let mut booking = sample_booking();
        booking.status = "GARBAGE".into();
        assert_eq!(booking.status(), BookingStatus::Inquiry);
        assert!(!booking.status().is_terminal());
    }
}
