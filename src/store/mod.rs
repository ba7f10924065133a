use crate::gather::entity::{GatherState, Gathering};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create database parent {path}: {source}")]
    CreateParent {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite open failed at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("sqlite statement failed: {source}")]
    Sql {
        #[source]
        source: rusqlite::Error,
    },
    #[error("gathering body decode failed: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("gathering body encode failed for `{id}`: {source}")]
    Encode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings body decode failed: {source}")]
    DecodeSettings {
        #[source]
        source: serde_json::Error,
    },
    #[error("settings body encode failed: {source}")]
    EncodeSettings {
        #[source]
        source: serde_json::Error,
    },
}

/// The single process-wide settings record: interaction cursor, gathering
/// id sequence, and the locale/timezone the bot answers in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSettings {
    pub timezone: String,
    pub locale: String,
    pub last_update_id: i64,
    pub last_update_time: i64,
    pub last_gathering_seq: i64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            timezone: "Europe/Berlin".to_string(),
            locale: "en".to_string(),
            last_update_id: -1,
            last_update_time: 0,
            last_gathering_seq: 0,
        }
    }
}

impl BotSettings {
    pub fn next_gathering_id(&mut self) -> String {
        self.last_gathering_seq += 1;
        self.last_gathering_seq.to_string()
    }
}

fn sql_error(source: rusqlite::Error) -> StoreError {
    StoreError::Sql { source }
}

/// SQLite-backed persistence for gatherings and the settings row. Upserts
/// are last-write-wins; gatherings commit independently of each other.
pub struct GatherStore {
    db_path: PathBuf,
}

impl GatherStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateParent {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|source| StoreError::Open {
            path: self.db_path.display().to_string(),
            source,
        })
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        let connection = self.connect()?;
        connection
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS gatherings (
                    id TEXT PRIMARY KEY,
                    state TEXT NOT NULL,
                    body TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS bot_settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    body TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_gatherings_state
                    ON gatherings(state);
                ",
            )
            .map_err(sql_error)
    }

    /// Every gathering not yet in its terminal state, in id-sequence order.
    pub fn load_open_gatherings(&self) -> Result<Vec<Gathering>, StoreError> {
        let connection = self.connect()?;
        let mut statement = connection
            .prepare(
                "SELECT body FROM gatherings
                 WHERE state != ?1
                 ORDER BY CAST(id AS INTEGER)",
            )
            .map_err(sql_error)?;
        let rows = statement
            .query_map(params![GatherState::Stopped.as_str()], |row| {
                row.get::<_, String>(0)
            })
            .map_err(sql_error)?;

        let mut gatherings = Vec::new();
        for body in rows {
            let body = body.map_err(sql_error)?;
            let gathering =
                serde_json::from_str(&body).map_err(|source| StoreError::Decode { source })?;
            gatherings.push(gathering);
        }
        Ok(gatherings)
    }

    pub fn save_gathering(&self, gathering: &Gathering) -> Result<(), StoreError> {
        let body = serde_json::to_string(gathering).map_err(|source| StoreError::Encode {
            id: gathering.id.clone(),
            source,
        })?;
        let connection = self.connect()?;
        connection
            .execute(
                "INSERT INTO gatherings (id, state, body) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET state = excluded.state, body = excluded.body",
                params![gathering.id, gathering.state.as_str(), body],
            )
            .map_err(sql_error)?;
        Ok(())
    }

    pub fn load_or_init_settings(&self) -> Result<BotSettings, StoreError> {
        let connection = self.connect()?;
        let body: Option<String> = connection
            .query_row("SELECT body FROM bot_settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(sql_error)?;
        match body {
            Some(body) => serde_json::from_str(&body)
                .map_err(|source| StoreError::DecodeSettings { source }),
            None => Ok(BotSettings::default()),
        }
    }

    pub fn save_settings(&self, settings: &BotSettings) -> Result<(), StoreError> {
        let body = serde_json::to_string(settings)
            .map_err(|source| StoreError::EncodeSettings { source })?;
        let connection = self.connect()?;
        connection
            .execute(
                "INSERT INTO bot_settings (id, body) VALUES (1, ?1)
                 ON CONFLICT(id) DO UPDATE SET body = excluded.body",
                params![body],
            )
            .map_err(sql_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn gathering(id: &str, state: GatherState) -> Gathering {
        let mut g = Gathering::new(
            id.to_string(),
            -100,
            1_700_000_000,
            None,
            6,
            "Quiz night".to_string(),
            None,
            None,
        );
        g.state = state;
        g
    }

    #[test]
    fn gathering_round_trip_is_stable() {
        let temp = tempdir().expect("tempdir");
        let store = GatherStore::open(&temp.path().join("state/gatherbot.db")).expect("open");

        let mut g = gathering("1", GatherState::Started);
        g.message_id = Some(77);
        g.participants_yes.insert("alice".to_string());
        g.poll_text = "rendered".to_string();
        store.save_gathering(&g).expect("save");

        let loaded = store.load_open_gatherings().expect("load");
        assert_eq!(loaded, vec![g]);
    }

    #[test]
    fn open_query_skips_stopped_and_orders_numerically() {
        let temp = tempdir().expect("tempdir");
        let store = GatherStore::open(&temp.path().join("gatherbot.db")).expect("open");

        store
            .save_gathering(&gathering("10", GatherState::Scheduled))
            .expect("save");
        store
            .save_gathering(&gathering("2", GatherState::Started))
            .expect("save");
        store
            .save_gathering(&gathering("3", GatherState::Stopped))
            .expect("save");

        let ids: Vec<String> = store
            .load_open_gatherings()
            .expect("load")
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["2".to_string(), "10".to_string()]);
    }

    #[test]
    fn upsert_is_last_write_wins() {
        let temp = tempdir().expect("tempdir");
        let store = GatherStore::open(&temp.path().join("gatherbot.db")).expect("open");

        store
            .save_gathering(&gathering("1", GatherState::Scheduled))
            .expect("save");
        let mut updated = gathering("1", GatherState::Started);
        updated.subject = "Moved indoors".to_string();
        store.save_gathering(&updated).expect("save");

        let loaded = store.load_open_gatherings().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].subject, "Moved indoors");
        assert_eq!(loaded[0].state, GatherState::Started);
    }

    #[test]
    fn settings_initialize_with_defaults_and_round_trip() {
        let temp = tempdir().expect("tempdir");
        let store = GatherStore::open(&temp.path().join("gatherbot.db")).expect("open");

        let mut settings = store.load_or_init_settings().expect("load");
        assert_eq!(settings, BotSettings::default());
        assert_eq!(settings.last_update_id, -1);

        assert_eq!(settings.next_gathering_id(), "1");
        assert_eq!(settings.next_gathering_id(), "2");
        settings.last_update_id = 41;
        store.save_settings(&settings).expect("save");

        let reloaded = store.load_or_init_settings().expect("reload");
        assert_eq!(reloaded, settings);
        assert_eq!(reloaded.last_gathering_seq, 2);
    }
}
