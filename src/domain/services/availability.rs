use chrono::{DateTime, Duration, Utc};
use crate::domain::models::booking::BlockingRow;
use crate::error::{AppError, ConflictDetails};

/// A stored interval padded by the gap buffer on both ends. Overlap testing
/// pads the stored side before the half-open comparison, so two bookings
/// separated by exactly the gap do not collide.
pub fn padded_interval(start_at: DateTime<Utc>, end_at: DateTime<Utc>, gap: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
    (start_at - gap, end_at + gap)
}

/// Half-open intersection: [a1,a2) and [b1,b2) intersect iff a1 < b2 AND b1 < a2.
/// Touching endpoints do not count.
pub fn intervals_intersect(a1: DateTime<Utc>, a2: DateTime<Utc>, b1: DateTime<Utc>, b2: DateTime<Utc>) -> bool {
    a1 < b2 && b1 < a2
}

/// Filters the blocking rows of one vehicle down to those whose padded
/// interval intersects the queried range, ordered by interval start so the
/// first entry is the earliest conflict. Deterministic, no side effects.
pub fn find_conflicts(
    rows: &[BlockingRow],
    query_start: DateTime<Utc>,
    query_end: DateTime<Utc>,
    gap: Duration,
) -> Vec<ConflictDetails> {
    let mut conflicts: Vec<ConflictDetails> = rows
        .iter()
        .filter_map(|row| {
            let (padded_start, padded_end) = padded_interval(row.start_at, row.end_at, gap);
            if intervals_intersect(padded_start, padded_end, query_start, query_end) {
                Some(ConflictDetails {
                    booking_reference: row.reference.clone(),
                    start_at: padded_start,
                    end_at: padded_end,
                    booked_by: row.booked_by.clone(),
                })
            } else {
                None
            }
        })
        .collect();

    conflicts.sort_by_key(|c| c.start_at);
    conflicts
}

/// Conflict details for one blocking row, with the padded interval the
/// caller actually collided with.
pub fn conflict_from_row(row: &BlockingRow, gap: Duration) -> ConflictDetails {
    let (padded_start, padded_end) = padded_interval(row.start_at, row.end_at, gap);
    ConflictDetails {
        booking_reference: row.reference.clone(),
        start_at: padded_start,
        end_at: padded_end,
        booked_by: row.booked_by.clone(),
    }
}

/// Rejects malformed query ranges before any storage access.
pub fn validate_range(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), AppError> {
    if start_at >= end_at {
        return Err(AppError::InvalidRange(format!(
            "start_at ({}) must be before end_at ({})",
            start_at.to_rfc3339(),
            end_at.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(reference: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BlockingRow {
        BlockingRow {
            booking_id: format!("id-{}", reference),
            reference: reference.to_string(),
            start_at: start,
            end_at: end,
            booked_by: "ops".to_string(),
        }
    }

    fn jan5(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, h, m, 0).unwrap()
    }

    #[test]
    fn test_gap_buffer_blocks_within_sixty_minutes() {
        let rows = vec![row("BK-A1", jan5(10, 0), jan5(14, 0))];
        let gap = Duration::minutes(60);

        // 14:30 falls inside the padded end (15:00) -> conflict
        let conflicts = find_conflicts(&rows, jan5(14, 30), jan5(16, 0), gap);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].booking_reference, "BK-A1");
        assert_eq!(conflicts[0].end_at, jan5(15, 0));

        // 15:01 clears the padded end -> free
        let conflicts = find_conflicts(&rows, jan5(15, 1), jan5(16, 0), gap);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_touching_padded_endpoint_is_not_a_conflict() {
        let rows = vec![row("BK-A1", jan5(10, 0), jan5(14, 0))];
        let gap = Duration::minutes(60);

        // Query starting exactly at the padded end: half-open, no overlap.
        let conflicts = find_conflicts(&rows, jan5(15, 0), jan5(16, 0), gap);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_earliest_conflict_reported_first() {
        let rows = vec![
            row("BK-LATE", jan5(12, 0), jan5(13, 0)),
            row("BK-EARLY", jan5(8, 0), jan5(9, 0)),
        ];
        let conflicts = find_conflicts(&rows, jan5(0, 0), jan5(23, 0), Duration::minutes(60));
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].booking_reference, "BK-EARLY");
    }

    #[test]
    fn test_zero_gap_back_to_back_is_free() {
        let rows = vec![row("BK-A1", jan5(10, 0), jan5(14, 0))];
        let conflicts = find_conflicts(&rows, jan5(14, 0), jan5(16, 0), Duration::zero());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_validate_range_rejects_inverted_and_empty() {
        assert!(validate_range(jan5(10, 0), jan5(9, 0)).is_err());
        assert!(validate_range(jan5(10, 0), jan5(10, 0)).is_err());
        assert!(validate_range(jan5(10, 0), jan5(10, 1)).is_ok());
    }
}
