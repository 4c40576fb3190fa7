//! SQL schema for the SIAP-SPJ SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Claims are written once and never updated or deleted.
CREATE TABLE IF NOT EXISTS claims (
    claim_id             INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_number         TEXT NOT NULL UNIQUE,   -- SPJ/<year>/<serial>
    order_number         TEXT NOT NULL,
    travel_letter_number TEXT,
    payment_order_number TEXT,
    drpp_number          TEXT,
    budget_code          TEXT,
    funding_source       TEXT NOT NULL,
    activity_type        TEXT NOT NULL,
    payment_method       TEXT NOT NULL,
    transport_payment    TEXT,
    lodging_payment      TEXT,
    order_date           TEXT,                   -- YYYY-MM-DD
    travel_letter_date   TEXT,
    departure_date       TEXT NOT NULL,
    return_date          TEXT NOT NULL,
    duration_days        INTEGER,
    destination          TEXT,
    province             TEXT,
    organizational_unit  TEXT,
    representation       REAL NOT NULL DEFAULT 0,
    fuel                 REAL NOT NULL DEFAULT 0,
    toll                 REAL NOT NULL DEFAULT 0,
    total_cost           REAL NOT NULL DEFAULT 0,
    file_travel_order    TEXT,
    file_cost_breakdown  TEXT,
    file_travel_letter   TEXT,
    file_responsibility  TEXT,
    file_receipt         TEXT,
    file_activity_report TEXT,
    file_price_offer     TEXT,
    created_at           TEXT NOT NULL           -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS transport_details (
    detail_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id      INTEGER NOT NULL REFERENCES claims(claim_id),
    mode          TEXT,
    ticket_number TEXT,
    carrier       TEXT,
    fare          REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS lodging_details (
    detail_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id       INTEGER NOT NULL REFERENCES claims(claim_id),
    hotel_name     TEXT,
    nights         INTEGER,
    rate           REAL NOT NULL DEFAULT 0,
    thirty_percent INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS team_members (
    member_id INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id  INTEGER NOT NULL REFERENCES claims(claim_id),
    name      TEXT,
    position  TEXT,
    grade     TEXT,
    work_unit TEXT
);

CREATE TABLE IF NOT EXISTS partner_organizations (
    partner_id INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id   INTEGER NOT NULL REFERENCES claims(claim_id),
    name       TEXT
);

-- Append-only audit trail.
CREATE TABLE IF NOT EXISTS activity_log (
    entry_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    actor       TEXT NOT NULL,
    description TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS claims_created_idx    ON claims(created_at);
CREATE INDEX IF NOT EXISTS transport_claim_idx   ON transport_details(claim_id);
CREATE INDEX IF NOT EXISTS lodging_claim_idx     ON lodging_details(claim_id);
CREATE INDEX IF NOT EXISTS team_claim_idx        ON team_members(claim_id);
CREATE INDEX IF NOT EXISTS partner_claim_idx     ON partner_organizations(claim_id);
CREATE INDEX IF NOT EXISTS activity_recorded_idx ON activity_log(recorded_at);

PRAGMA user_version = 1;
";
