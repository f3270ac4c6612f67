//! SQL schema for the Aquadex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids strictly increasing and never reused, so "newest
/// first" is `id DESC` and "oldest image" is the lowest id.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

-- volume is always floor(length * depth * height / 1000), written together
-- with the dimensions.
CREATE TABLE IF NOT EXISTS aquariums (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    name        TEXT    NOT NULL,
    length      INTEGER NOT NULL CHECK (length BETWEEN 1 AND 9999),
    depth       INTEGER NOT NULL CHECK (depth  BETWEEN 1 AND 9999),
    height      INTEGER NOT NULL CHECK (height BETWEEN 1 AND 9999),
    volume      INTEGER NOT NULL,
    date        TEXT,             -- YYYY-MM-DD or NULL
    description TEXT    NOT NULL DEFAULT ''
);

-- Tag vocabulary: every permitted (title, value) pair.
CREATE TABLE IF NOT EXISTS classes (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    value TEXT NOT NULL,
    UNIQUE (title, value)
);

-- Tags assigned to an aquarium. Replaced wholesale on update.
CREATE TABLE IF NOT EXISTS aquarium_classes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    title       TEXT    NOT NULL,
    value       TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS critters (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    species     TEXT    NOT NULL,
    count       INTEGER NOT NULL CHECK (count BETWEEN 1 AND 9999)
);

-- Comments are never updated, only deleted.
CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    content     TEXT    NOT NULL,
    sent_at     TEXT    NOT NULL   -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS images (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    aquarium_id INTEGER NOT NULL REFERENCES aquariums(id) ON DELETE CASCADE,
    image       BLOB    NOT NULL,
    file_type   TEXT    NOT NULL
);

-- At most one main image per aquarium. image_id has no ON DELETE action;
-- the store reassigns or clears it before deleting images.
CREATE TABLE IF NOT EXISTS main_images (
    aquarium_id INTEGER PRIMARY KEY REFERENCES aquariums(id) ON DELETE CASCADE,
    image_id    INTEGER NOT NULL REFERENCES images(id)
);

CREATE INDEX IF NOT EXISTS aquariums_user_idx        ON aquariums(user_id);
CREATE INDEX IF NOT EXISTS aquarium_classes_aq_idx   ON aquarium_classes(aquarium_id);
CREATE INDEX IF NOT EXISTS critters_aquarium_idx     ON critters(aquarium_id);
CREATE INDEX IF NOT EXISTS comments_aquarium_idx     ON comments(aquarium_id);
CREATE INDEX IF NOT EXISTS images_aquarium_idx       ON images(aquarium_id);
CREATE INDEX IF NOT EXISTS main_images_image_idx     ON main_images(image_id);

PRAGMA user_version = 1;
";

/// Columns of an aquarium summary row, in the order read by
/// `RawSummary::from_row`. Callers append `WHERE`, ordering and paging.
pub const SUMMARY_SELECT: &str = "
SELECT a.id,
       a.name,
       a.length,
       a.depth,
       a.height,
       a.volume,
       a.date,
       u.id AS user_id,
       u.username,
       m.image_id AS main_image_id,
       (SELECT GROUP_CONCAT(ac.title || ': ' || ac.value, ', ' ORDER BY ac.id)
          FROM aquarium_classes ac
         WHERE ac.aquarium_id = a.id) AS selected_classes,
       (SELECT COUNT(*) FROM comments c WHERE c.aquarium_id = a.id) AS comment_count,
       (SELECT COUNT(DISTINCT cr.species) FROM critters cr WHERE cr.aquarium_id = a.id) AS species_count,
       (SELECT COALESCE(SUM(cr.count), 0) FROM critters cr WHERE cr.aquarium_id = a.id) AS total_individuals
  FROM aquariums a
  JOIN users u ON a.user_id = u.id
  LEFT JOIN main_images m ON m.aquarium_id = a.id
";

/// Same join shape as [`SUMMARY_SELECT`] so the filter predicate applies
/// unchanged.
pub const COUNT_SELECT: &str = "
SELECT COUNT(*)
  FROM aquariums a
  JOIN users u ON a.user_id = u.id
";

/// Comment columns in the order read by `RawComment::from_row`.
pub const COMMENT_SELECT: &str = "
SELECT c.id, c.aquarium_id, u.id, u.username, c.content, c.sent_at
  FROM comments c
  JOIN users u ON c.user_id = u.id
";
