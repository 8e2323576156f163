//! Admin-editable runtime settings.

use super::AlertStore;
use crate::error::AlertResult;
use rusqlite::{params, OptionalExtension};

impl AlertStore {
    pub fn put_setting(&self, key: &str, value: &str) -> AlertResult<()> {
        self.conn.execute(
            "INSERT INTO settings (setting_key, setting_value) VALUES (?1, ?2)
             ON CONFLICT (setting_key) DO UPDATE SET setting_value = excluded.setting_value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn setting(&self, key: &str) -> AlertResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT setting_value FROM settings WHERE setting_key = ?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// A numeric setting. Unparsable values are logged and treated as unset.
    pub fn setting_f64(&self, key: &str) -> AlertResult<Option<f64>> {
        let Some(raw) = self.setting(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => {
                log::warn!("setting {key}={raw:?} is not a number; using default");
                Ok(None)
            }
        }
    }
}
