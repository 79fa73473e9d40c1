use anyhow::Result;
use serde::Deserialize;

/// Connection parameters for the PostgreSQL server.
///
/// `database` is the administrative database used for drop/create until
/// [`Connection::with_database`] points the parameters at the seeded one.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl Connection {
    pub fn user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("postgres connection needs the user field"))
    }

    pub fn pg_config(&self) -> Result<postgres::Config> {
        let user = self.user()?;
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("postgres connection needs the host field"))?;
        let port = self
            .port
            .ok_or_else(|| anyhow::anyhow!("postgres connection needs the port field"))?;

        let mut config = postgres::Config::new();
        config.host(host).port(port).user(user);
        if let Some(password) = self.password.as_ref() {
            config.password(password);
        }
        if let Some(database) = self.database.as_ref() {
            config.dbname(database);
        }
        Ok(config)
    }

    pub fn with_database(&self, name: &str) -> Connection {
        Connection {
            database: Some(name.to_string()),
            ..self.clone()
        }
    }

    /// `user@host:port/database`, for logs.
    pub fn describe(&self) -> String {
        format!(
            "{user}@{host}:{port}/{database}",
            user = self.user.as_deref().unwrap_or("?"),
            host = self.host.as_deref().unwrap_or("?"),
            port = self.port.map_or("?".to_string(), |p| p.to_string()),
            database = self.database.as_deref().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Connection {
        Connection {
            host: Some("localhost".to_string()),
            port: Some(5432),
            user: Some("postgres".to_string()),
            password: Some("secret".to_string()),
            database: None,
        }
    }

    #[test]
    fn pg_config_carries_every_field() {
        let config = sample().with_database("my_new_db").pg_config().unwrap();
        assert_eq!(config.get_user(), Some("postgres"));
        assert_eq!(config.get_ports(), &[5432]);
        assert_eq!(config.get_dbname(), Some("my_new_db"));
        assert_eq!(config.get_password(), Some(&b"secret"[..]));
    }

    #[test]
    fn pg_config_reports_missing_user() {
        let conn = Connection { user: None, ..sample() };
        let err = conn.pg_config().unwrap_err();
        assert_eq!(err.to_string(), "postgres connection needs the user field");
    }

    #[test]
    fn missing_password_is_allowed() {
        let conn = Connection { password: None, ..sample() };
        assert!(conn.pg_config().unwrap().get_password().is_none());
    }

    #[test]
    fn with_database_leaves_original_untouched() {
        let admin = sample();
        let target = admin.with_database("my_new_db");
        assert_eq!(admin.database, None);
        assert_eq!(target.database.as_deref(), Some("my_new_db"));
        assert_eq!(target.host, admin.host);
    }

    #[test]
    fn describe_hides_password() {
        let text = sample().with_database("shop").describe();
        assert_eq!(text, "postgres@localhost:5432/shop");
        assert!(!text.contains("secret"));
    }
}
