use std::sync::Arc;

use crate::db::queries;
use crate::models::ActivityKind;
use crate::state::AppState;

/// Persists an activity event and fans it out to live subscribers.
/// Failures are logged; the request that triggered the event has already succeeded.
pub fn record_activity(
    state: &Arc<AppState>,
    club_id: &str,
    booking_id: Option<&str>,
    kind: ActivityKind,
    summary: &str,
) {
    let event = match state.db.lock() {
        Ok(db) => queries::insert_activity_event(&db, club_id, booking_id, kind, summary),
        Err(_) => Err(anyhow::anyhow!("database mutex poisoned")),
    };

    match event {
        Ok(event) => {
            // No receivers is fine
            let _ = state.activity_tx.send(event);
        }
        Err(e) => {
            tracing::error!(error = %e, club_id = %club_id, kind = kind.as_str(), "failed to record activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db;

    fn test_state() -> Arc<AppState> {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO clubs (id, name, slug, created_at, updated_at)
             VALUES ('club1', 'Club', 'club', '2030-01-01 00:00:00', '2030-01-01 00:00:00')",
            [],
        )
        .unwrap();
        let config = AppConfig {
            port: 0,
            database_url: ":memory:".to_string(),
            admin_token: String::new(),
            activity_channel_capacity: 16,
        };
        Arc::new(AppState::new(conn, config))
    }

    #[test]
    fn test_record_activity_persists_and_broadcasts() {
        let state = test_state();
        let mut rx = state.activity_tx.subscribe();

        record_activity(&state, "club1", Some("b1"), ActivityKind::BookingCreated, "Ana booked Central");

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, ActivityKind::BookingCreated);
        assert_eq!(event.booking_id.as_deref(), Some("b1"));

        let db = state.db.lock().unwrap();
        let stored = queries::get_recent_activity(&db, "club1", 10).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, event.id);
    }

    #[test]
    fn test_record_activity_without_subscribers() {
        let state = test_state();
        record_activity(&state, "club1", None, ActivityKind::CourtCreated, "Court Central added");

        let db = state.db.lock().unwrap();
        assert_eq!(queries::get_activity_since(&db, "club1", 0).unwrap().len(), 1);
    }
}
