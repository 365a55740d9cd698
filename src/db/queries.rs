use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    ActivityEvent, ActivityKind, BookedSlot, Booking, BookingStatus, Club, Court, CourtStatus,
    CourtSummary, CourtSurface, CourtType, OperatingHours, PaymentMethod, TimeOfDay, User,
    UserSummary,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid stored date {s:?}: {e}"))
}

fn parse_minutes(minutes: i64) -> anyhow::Result<TimeOfDay> {
    u16::try_from(minutes)
        .ok()
        .and_then(TimeOfDay::from_minutes)
        .ok_or_else(|| anyhow::anyhow!("invalid stored time: {minutes}"))
}

fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<anyhow::Result<T>>>,
) -> anyhow::Result<Vec<T>> {
    let mut out = vec![];
    for row in rows {
        out.push(row??);
    }
    Ok(out)
}

// ── Users ──

const USER_COLUMNS: &str = "id, email, username, is_admin, club_id, api_token";

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        is_admin: row.get(3)?,
        club_id: row.get(4)?,
        api_token: row.get(5)?,
    })
}

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    let now = fmt_ts(&Utc::now().naive_utc());
    conn.execute(
        "INSERT INTO users (id, email, username, is_admin, club_id, api_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.email,
            user.username,
            user.is_admin,
            user.club_id,
            user.api_token,
            now,
        ],
    )?;
    Ok(())
}

pub fn get_user_by_token(conn: &Connection, token: &str) -> anyhow::Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE api_token = ?1"),
            params![token],
            parse_user_row,
        )
        .optional()?;
    Ok(user)
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            parse_user_row,
        )
        .optional()?;
    Ok(user)
}

pub fn set_user_club(conn: &Connection, user_id: &str, club_id: Option<&str>) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET club_id = ?1 WHERE id = ?2",
        params![club_id, user_id],
    )?;
    Ok(count > 0)
}

pub fn list_club_members(conn: &Connection, club_id: &str) -> anyhow::Result<Vec<UserSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, username, is_admin FROM users WHERE club_id = ?1 ORDER BY username ASC",
    )?;
    let rows = stmt.query_map(params![club_id], |row| {
        Ok(UserSummary {
            id: row.get(0)?,
            email: row.get(1)?,
            username: row.get(2)?,
            is_admin: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Makes sure a platform admin holding `token` exists. Returns true if one was created.
pub fn ensure_admin_user(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    if get_user_by_token(conn, token)?.is_some() {
        return Ok(false);
    }
    let admin = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: "admin@localhost".to_string(),
        username: "admin".to_string(),
        is_admin: true,
        club_id: None,
        api_token: token.to_string(),
    };
    conn.execute(
        "INSERT INTO users (id, email, username, is_admin, club_id, api_token, created_at)
         VALUES (?1, ?2, ?3, 1, NULL, ?4, ?5)
         ON CONFLICT(email) DO UPDATE SET api_token = excluded.api_token, is_admin = 1",
        params![admin.id, admin.email, admin.username, admin.api_token, fmt_ts(&Utc::now().naive_utc())],
    )?;
    Ok(true)
}

// ── Clubs ──

const CLUB_COLUMNS: &str = "id, name, slug, address, city, country, phone, email, website, timezone, currency, settings, is_active, created_at, updated_at";

fn parse_club_row(row: &rusqlite::Row) -> anyhow::Result<Club> {
    let settings_json: String = row.get(11)?;
    let created_at: String = row.get(13)?;
    let updated_at: String = row.get(14)?;

    Ok(Club {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        country: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        website: row.get(8)?,
        timezone: row.get(9)?,
        currency: row.get(10)?,
        settings: serde_json::from_str(&settings_json).unwrap_or(serde_json::json!({})),
        is_active: row.get(12)?,
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    })
}

pub fn create_club(conn: &Connection, club: &Club) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO clubs ({CLUB_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ),
        params![
            club.id,
            club.name,
            club.slug,
            club.address,
            club.city,
            club.country,
            club.phone,
            club.email,
            club.website,
            club.timezone,
            club.currency,
            club.settings.to_string(),
            club.is_active,
            fmt_ts(&club.created_at),
            fmt_ts(&club.updated_at),
        ],
    )?;
    Ok(())
}

pub fn update_club(conn: &Connection, club: &Club) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE clubs SET name = ?2, slug = ?3, address = ?4, city = ?5, country = ?6, phone = ?7,
           email = ?8, website = ?9, timezone = ?10, currency = ?11, settings = ?12,
           is_active = ?13, updated_at = ?14
         WHERE id = ?1",
        params![
            club.id,
            club.name,
            club.slug,
            club.address,
            club.city,
            club.country,
            club.phone,
            club.email,
            club.website,
            club.timezone,
            club.currency,
            club.settings.to_string(),
            club.is_active,
            fmt_ts(&club.updated_at),
        ],
    )?;
    Ok(count > 0)
}

pub fn get_club(conn: &Connection, id: &str) -> anyhow::Result<Option<Club>> {
    let result = conn.query_row(
        &format!("SELECT {CLUB_COLUMNS} FROM clubs WHERE id = ?1"),
        params![id],
        |row| Ok(parse_club_row(row)),
    );

    match result {
        Ok(club) => Ok(Some(club?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_club_by_slug(conn: &Connection, slug: &str) -> anyhow::Result<Option<Club>> {
    let result = conn.query_row(
        &format!("SELECT {CLUB_COLUMNS} FROM clubs WHERE slug = ?1"),
        params![slug],
        |row| Ok(parse_club_row(row)),
    );

    match result {
        Ok(club) => Ok(Some(club?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_club_courts(conn: &Connection, club_id: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM courts WHERE club_id = ?1",
        params![club_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn count_club_bookings(conn: &Connection, club_id: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE club_id = ?1",
        params![club_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Courts ──

const COURT_COLUMNS: &str = "id, club_id, name, description, court_type, surface, status, is_available, price_per_hour, operating_hours, created_at, updated_at";

fn parse_court_row(row: &rusqlite::Row) -> anyhow::Result<Court> {
    let court_type: String = row.get(4)?;
    let surface: String = row.get(5)?;
    let status: String = row.get(6)?;
    let operating_hours: Option<String> = row.get(9)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    let operating_hours = match operating_hours {
        Some(json) => Some(OperatingHours::from_json(&json)?),
        None => None,
    };

    Ok(Court {
        id: row.get(0)?,
        club_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        court_type: CourtType::parse(&court_type),
        surface: CourtSurface::parse(&surface),
        status: CourtStatus::parse(&status),
        is_available: row.get(7)?,
        price_per_hour: row.get(8)?,
        operating_hours,
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    })
}

fn operating_hours_json(court: &Court) -> anyhow::Result<Option<String>> {
    Ok(match &court.operating_hours {
        Some(hours) => Some(serde_json::to_string(hours)?),
        None => None,
    })
}

pub fn create_court(conn: &Connection, court: &Court) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO courts ({COURT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        params![
            court.id,
            court.club_id,
            court.name,
            court.description,
            court.court_type.as_str(),
            court.surface.as_str(),
            court.status.as_str(),
            court.is_available,
            court.price_per_hour,
            operating_hours_json(court)?,
            fmt_ts(&court.created_at),
            fmt_ts(&court.updated_at),
        ],
    )?;
    Ok(())
}

pub fn update_court(conn: &Connection, court: &Court) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE courts SET name = ?2, description = ?3, court_type = ?4, surface = ?5, status = ?6,
           is_available = ?7, price_per_hour = ?8, operating_hours = ?9, updated_at = ?10
         WHERE id = ?1",
        params![
            court.id,
            court.name,
            court.description,
            court.court_type.as_str(),
            court.surface.as_str(),
            court.status.as_str(),
            court.is_available,
            court.price_per_hour,
            operating_hours_json(court)?,
            fmt_ts(&court.updated_at),
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_court(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM courts WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_court(conn: &Connection, id: &str) -> anyhow::Result<Option<Court>> {
    let result = conn.query_row(
        &format!("SELECT {COURT_COLUMNS} FROM courts WHERE id = ?1"),
        params![id],
        |row| Ok(parse_court_row(row)),
    );

    match result {
        Ok(court) => Ok(Some(court?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Whether another court in the club already uses `name`.
pub fn court_name_taken(
    conn: &Connection,
    club_id: &str,
    name: &str,
    exclude_court_id: Option<&str>,
) -> anyhow::Result<bool> {
    let taken: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM courts WHERE club_id = ?1 AND name = ?2 AND (?3 IS NULL OR id != ?3)",
        params![club_id, name, exclude_court_id],
        |row| row.get(0),
    )?;
    Ok(taken)
}

pub fn list_courts(
    conn: &Connection,
    club_id: &str,
    status: Option<CourtStatus>,
    is_available: Option<bool>,
) -> anyhow::Result<Vec<(Court, i64)>> {
    let mut sql = format!(
        "SELECT {COURT_COLUMNS}, (SELECT COUNT(*) FROM bookings b WHERE b.court_id = courts.id)
         FROM courts WHERE club_id = ?1"
    );
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(club_id.to_string())];

    if let Some(status) = status {
        params_vec.push(Box::new(status.as_str()));
        sql.push_str(&format!(" AND status = ?{}", params_vec.len()));
    }
    if let Some(is_available) = is_available {
        params_vec.push(Box::new(is_available));
        sql.push_str(&format!(" AND is_available = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        let count: rusqlite::Result<i64> = row.get(12);
        Ok(parse_court_row(row).and_then(|court| Ok((court, count?))))
    })?;

    collect(rows)
}

pub fn list_court_summaries(conn: &Connection, club_id: &str) -> anyhow::Result<Vec<CourtSummary>> {
    let courts = list_courts(conn, club_id, None, None)?;
    Ok(courts
        .into_iter()
        .map(|(c, _)| CourtSummary {
            id: c.id,
            name: c.name,
            court_type: c.court_type,
            status: c.status,
            is_available: c.is_available,
            price_per_hour: c.price_per_hour,
        })
        .collect())
}

pub fn count_court_bookings(conn: &Connection, court_id: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE court_id = ?1",
        params![court_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, club_id, court_id, date, start_time, end_time, duration, status, customer_name, customer_phone, customer_email, notes, total_price, is_paid, payment_method, created_by_id, created_at, updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date: String = row.get(3)?;
    let start_time: i64 = row.get(4)?;
    let end_time: i64 = row.get(5)?;
    let status: String = row.get(7)?;
    let payment_method: Option<String> = row.get(14)?;
    let created_at: String = row.get(16)?;
    let updated_at: String = row.get(17)?;

    Ok(Booking {
        id: row.get(0)?,
        club_id: row.get(1)?,
        court_id: row.get(2)?,
        date: parse_date(&date)?,
        start_time: parse_minutes(start_time)?,
        end_time: parse_minutes(end_time)?,
        duration: row.get(6)?,
        status: BookingStatus::parse(&status)
            .ok_or_else(|| anyhow::anyhow!("invalid stored booking status: {status}"))?,
        customer_name: row.get(8)?,
        customer_phone: row.get(9)?,
        customer_email: row.get(10)?,
        notes: row.get(11)?,
        total_price: row.get(12)?,
        is_paid: row.get(13)?,
        payment_method: payment_method.as_deref().and_then(PaymentMethod::parse),
        created_by_id: row.get(15)?,
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    })
}

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
        ),
        params![
            booking.id,
            booking.club_id,
            booking.court_id,
            fmt_date(booking.date),
            booking.start_time.minutes(),
            booking.end_time.minutes(),
            booking.duration,
            booking.status.as_str(),
            booking.customer_name,
            booking.customer_phone,
            booking.customer_email,
            booking.notes,
            booking.total_price,
            booking.is_paid,
            booking.payment_method.map(|m| m.as_str()),
            booking.created_by_id,
            fmt_ts(&booking.created_at),
            fmt_ts(&booking.updated_at),
        ],
    )?;
    Ok(())
}

pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET date = ?2, start_time = ?3, end_time = ?4, duration = ?5, status = ?6,
           customer_name = ?7, customer_phone = ?8, customer_email = ?9, notes = ?10,
           total_price = ?11, is_paid = ?12, payment_method = ?13, updated_at = ?14
         WHERE id = ?1",
        params![
            booking.id,
            fmt_date(booking.date),
            booking.start_time.minutes(),
            booking.end_time.minutes(),
            booking.duration,
            booking.status.as_str(),
            booking.customer_name,
            booking.customer_phone,
            booking.customer_email,
            booking.notes,
            booking.total_price,
            booking.is_paid,
            booking.payment_method.map(|m| m.as_str()),
            fmt_ts(&booking.updated_at),
        ],
    )?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Pending and confirmed bookings holding time on `court_id` that day.
pub fn find_blocking_slots(
    conn: &Connection,
    court_id: &str,
    date: NaiveDate,
    exclude_booking_id: Option<&str>,
) -> anyhow::Result<Vec<BookedSlot>> {
    let mut stmt = conn.prepare(
        "SELECT id, court_id, date, start_time, end_time, status FROM bookings
         WHERE court_id = ?1 AND date = ?2 AND status IN ('pending', 'confirmed')
           AND (?3 IS NULL OR id != ?3)
         ORDER BY start_time ASC",
    )?;

    let rows = stmt.query_map(params![court_id, fmt_date(date), exclude_booking_id], |row| {
        let parse = || -> anyhow::Result<BookedSlot> {
            let date: String = row.get(2)?;
            let status: String = row.get(5)?;
            Ok(BookedSlot {
                id: row.get(0)?,
                court_id: row.get(1)?,
                date: parse_date(&date)?,
                start_time: parse_minutes(row.get(3)?)?,
                end_time: parse_minutes(row.get(4)?)?,
                status: BookingStatus::parse(&status)
                    .ok_or_else(|| anyhow::anyhow!("invalid stored booking status: {status}"))?,
            })
        };
        Ok(parse())
    })?;

    collect(rows)
}

/// Day selector for booking listings. An exact date wins over a range.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub club_id: String,
    pub court_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub status: Option<BookingStatus>,
}

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> anyhow::Result<Vec<Booking>> {
    let mut sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE club_id = ?1");
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(filter.club_id.clone())];

    if let Some(court_id) = &filter.court_id {
        params_vec.push(Box::new(court_id.clone()));
        sql.push_str(&format!(" AND court_id = ?{}", params_vec.len()));
    }
    if let Some(date) = filter.date {
        params_vec.push(Box::new(fmt_date(date)));
        sql.push_str(&format!(" AND date = ?{}", params_vec.len()));
    } else if let Some((start, end)) = filter.date_range {
        params_vec.push(Box::new(fmt_date(start)));
        sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        params_vec.push(Box::new(fmt_date(end)));
        sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
    }
    if let Some(status) = filter.status {
        params_vec.push(Box::new(status.as_str()));
        sql.push_str(&format!(" AND status = ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY date ASC, start_time ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    collect(rows)
}

pub fn get_blocking_bookings_on(
    conn: &Connection,
    court_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE court_id = ?1 AND date = ?2 AND status IN ('pending', 'confirmed')
         ORDER BY start_time ASC"
    ))?;
    let rows = stmt.query_map(params![court_id, fmt_date(date)], |row| {
        Ok(parse_booking_row(row))
    })?;

    collect(rows)
}

pub fn get_upcoming_court_bookings(
    conn: &Connection,
    court_id: &str,
    from: NaiveDate,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE court_id = ?1 AND date >= ?2
         ORDER BY date ASC, start_time ASC LIMIT ?3"
    ))?;
    let rows = stmt.query_map(params![court_id, fmt_date(from), limit], |row| {
        Ok(parse_booking_row(row))
    })?;

    collect(rows)
}

// ── Dashboard ──

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub bookings_today: i64,
    pub bookings_this_week: i64,
    pub revenue_this_month: f64,
    pub active_courts: i64,
    pub members: i64,
}

pub fn get_dashboard_stats(
    conn: &Connection,
    club_id: &str,
    today: NaiveDate,
) -> anyhow::Result<DashboardStats> {
    use chrono::Datelike;

    let week_start = today - chrono::Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + chrono::Duration::days(6);
    let month_start = today.with_day(1).unwrap_or(today);
    let next_month = if month_start.month() == 12 {
        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
    }
    .unwrap_or(today);

    let bookings_today: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE club_id = ?1 AND date = ?2 AND status IN ('pending', 'confirmed', 'completed')",
        params![club_id, fmt_date(today)],
        |row| row.get(0),
    )?;

    let bookings_this_week: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE club_id = ?1 AND date >= ?2 AND date <= ?3
           AND status IN ('pending', 'confirmed', 'completed')",
        params![club_id, fmt_date(week_start), fmt_date(week_end)],
        |row| row.get(0),
    )?;

    let revenue_this_month: f64 = conn.query_row(
        "SELECT COALESCE(SUM(total_price), 0.0) FROM bookings
         WHERE club_id = ?1 AND date >= ?2 AND date < ?3 AND is_paid = 1 AND status != 'cancelled'",
        params![club_id, fmt_date(month_start), fmt_date(next_month)],
        |row| row.get(0),
    )?;

    let active_courts: i64 = conn.query_row(
        "SELECT COUNT(*) FROM courts WHERE club_id = ?1 AND status = 'active' AND is_available = 1",
        params![club_id],
        |row| row.get(0),
    )?;

    let members: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE club_id = ?1",
        params![club_id],
        |row| row.get(0),
    )?;

    Ok(DashboardStats {
        bookings_today,
        bookings_this_week,
        revenue_this_month,
        active_courts,
        members,
    })
}

// ── Activity ──

fn parse_activity_row(row: &rusqlite::Row) -> anyhow::Result<ActivityEvent> {
    let kind: String = row.get(3)?;
    Ok(ActivityEvent {
        id: row.get(0)?,
        club_id: row.get(1)?,
        booking_id: row.get(2)?,
        kind: ActivityKind::parse(&kind)
            .ok_or_else(|| anyhow::anyhow!("invalid stored activity kind: {kind}"))?,
        summary: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn insert_activity_event(
    conn: &Connection,
    club_id: &str,
    booking_id: Option<&str>,
    kind: ActivityKind,
    summary: &str,
) -> anyhow::Result<ActivityEvent> {
    let created_at = fmt_ts(&Utc::now().naive_utc());
    conn.execute(
        "INSERT INTO activity_events (club_id, booking_id, kind, summary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![club_id, booking_id, kind.as_str(), summary, created_at],
    )?;
    Ok(ActivityEvent {
        id: conn.last_insert_rowid(),
        club_id: club_id.to_string(),
        booking_id: booking_id.map(str::to_string),
        kind,
        summary: summary.to_string(),
        created_at,
    })
}

pub fn get_recent_activity(
    conn: &Connection,
    club_id: &str,
    limit: i64,
) -> anyhow::Result<Vec<ActivityEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, club_id, booking_id, kind, summary, created_at FROM activity_events
         WHERE club_id = ?1 ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![club_id, limit], |row| Ok(parse_activity_row(row)))?;

    collect(rows)
}

pub fn get_activity_since(
    conn: &Connection,
    club_id: &str,
    since_id: i64,
) -> anyhow::Result<Vec<ActivityEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, club_id, booking_id, kind, summary, created_at FROM activity_events
         WHERE club_id = ?1 AND id > ?2 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![club_id, since_id], |row| Ok(parse_activity_row(row)))?;

    collect(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn seed(conn: &Connection) {
        let now = Utc::now().naive_utc();
        create_user(
            conn,
            &User {
                id: "u1".to_string(),
                email: "ana@example.com".to_string(),
                username: "ana".to_string(),
                is_admin: false,
                club_id: None,
                api_token: "tok-ana".to_string(),
            },
        )
        .unwrap();
        create_club(
            conn,
            &Club {
                id: "club1".to_string(),
                name: "Padel Norte".to_string(),
                slug: "padel-norte".to_string(),
                address: None,
                city: Some("Madrid".to_string()),
                country: "Spain".to_string(),
                phone: None,
                email: None,
                website: None,
                timezone: "Europe/Madrid".to_string(),
                currency: "EUR".to_string(),
                settings: serde_json::json!({"lights": true}),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
        set_user_club(conn, "u1", Some("club1")).unwrap();
        create_court(
            conn,
            &Court {
                id: "court1".to_string(),
                club_id: "club1".to_string(),
                name: "Pista 1".to_string(),
                description: None,
                court_type: CourtType::Indoor,
                surface: CourtSurface::ArtificialGrass,
                status: CourtStatus::Active,
                is_available: true,
                price_per_hour: 24.0,
                operating_hours: None,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
    }

    fn booking(id: &str, date: &str, start: &str, end: &str, status: BookingStatus) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            club_id: "club1".to_string(),
            court_id: "court1".to_string(),
            date: d(date),
            start_time: t(start),
            end_time: t(end),
            duration: t(start).minutes_until(t(end)),
            status,
            customer_name: "Luis".to_string(),
            customer_phone: None,
            customer_email: None,
            notes: None,
            total_price: 36.0,
            is_paid: true,
            payment_method: Some(PaymentMethod::Card),
            created_by_id: "u1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_booking_round_trips_through_row() {
        let conn = setup_db();
        seed(&conn);
        let b = booking("b1", "2030-05-10", "9:00", "10:30", BookingStatus::Confirmed);
        create_booking(&conn, &b).unwrap();

        let loaded = get_booking_by_id(&conn, "b1").unwrap().unwrap();
        assert_eq!(loaded.start_time, t("09:00"));
        assert_eq!(loaded.end_time, t("10:30"));
        assert_eq!(loaded.duration, 90);
        assert_eq!(loaded.status, BookingStatus::Confirmed);
        assert_eq!(loaded.payment_method, Some(PaymentMethod::Card));
        assert!(get_booking_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_find_blocking_slots_filters_status_and_exclusion() {
        let conn = setup_db();
        seed(&conn);
        create_booking(&conn, &booking("b1", "2030-05-10", "09:00", "10:00", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &booking("b2", "2030-05-10", "10:00", "11:00", BookingStatus::Cancelled)).unwrap();
        create_booking(&conn, &booking("b3", "2030-05-10", "11:00", "12:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b4", "2030-05-11", "11:00", "12:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b5", "2030-05-10", "12:00", "13:00", BookingStatus::NoShow)).unwrap();

        let slots = find_blocking_slots(&conn, "court1", d("2030-05-10"), None).unwrap();
        let ids: Vec<_> = slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b3"]);

        let slots = find_blocking_slots(&conn, "court1", d("2030-05-10"), Some("b1")).unwrap();
        let ids: Vec<_> = slots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b3"]);
    }

    #[test]
    fn test_list_bookings_orders_by_clock_time() {
        let conn = setup_db();
        seed(&conn);
        create_booking(&conn, &booking("late", "2030-05-10", "10:00", "11:00", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &booking("early", "2030-05-10", "9:00", "10:00", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &booking("next-day", "2030-05-11", "8:00", "9:00", BookingStatus::Pending)).unwrap();

        let filter = BookingFilter {
            club_id: "club1".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = list_bookings(&conn, &filter).unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["early", "late", "next-day"]);

        let filter = BookingFilter {
            club_id: "club1".to_string(),
            date: Some(d("2030-05-11")),
            date_range: Some((d("2030-05-01"), d("2030-05-31"))),
            ..Default::default()
        };
        assert_eq!(list_bookings(&conn, &filter).unwrap().len(), 1);
    }

    #[test]
    fn test_court_name_taken() {
        let conn = setup_db();
        seed(&conn);
        assert!(court_name_taken(&conn, "club1", "Pista 1", None).unwrap());
        assert!(!court_name_taken(&conn, "club1", "Pista 1", Some("court1")).unwrap());
        assert!(!court_name_taken(&conn, "club1", "Pista 2", None).unwrap());
    }

    #[test]
    fn test_list_courts_counts_bookings() {
        let conn = setup_db();
        seed(&conn);
        create_booking(&conn, &booking("b1", "2030-05-10", "09:00", "10:00", BookingStatus::Pending)).unwrap();

        let courts = list_courts(&conn, "club1", Some(CourtStatus::Active), Some(true)).unwrap();
        assert_eq!(courts.len(), 1);
        assert_eq!(courts[0].1, 1);
        assert!(list_courts(&conn, "club1", Some(CourtStatus::Maintenance), None).unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_stats() {
        let conn = setup_db();
        seed(&conn);
        // 2030-05-08 is a Wednesday
        create_booking(&conn, &booking("today", "2030-05-08", "09:00", "10:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("sunday", "2030-05-12", "09:00", "10:00", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &booking("cancelled", "2030-05-08", "11:00", "12:00", BookingStatus::Cancelled)).unwrap();
        create_booking(&conn, &booking("next-month", "2030-06-01", "09:00", "10:00", BookingStatus::Confirmed)).unwrap();

        let stats = get_dashboard_stats(&conn, "club1", d("2030-05-08")).unwrap();
        assert_eq!(stats.bookings_today, 1);
        assert_eq!(stats.bookings_this_week, 2);
        assert_eq!(stats.revenue_this_month, 72.0);
        assert_eq!(stats.active_courts, 1);
        assert_eq!(stats.members, 1);
    }

    #[test]
    fn test_activity_since() {
        let conn = setup_db();
        seed(&conn);
        let first = insert_activity_event(&conn, "club1", None, ActivityKind::CourtCreated, "Pista 1").unwrap();
        insert_activity_event(&conn, "club1", Some("b1"), ActivityKind::BookingCreated, "Luis").unwrap();

        let events = get_activity_since(&conn, "club1", first.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::BookingCreated);

        let recent = get_recent_activity(&conn, "club1", 10).unwrap();
        assert_eq!(recent[0].kind, ActivityKind::BookingCreated);
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_ensure_admin_user_is_idempotent() {
        let conn = setup_db();
        assert!(ensure_admin_user(&conn, "root-token").unwrap());
        assert!(!ensure_admin_user(&conn, "root-token").unwrap());
        let admin = get_user_by_token(&conn, "root-token").unwrap().unwrap();
        assert!(admin.is_admin);
    }
}
