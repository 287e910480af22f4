//! Environment configuration.
//!
//! `DATABASE_URL` wins when set; otherwise the URL is composed from
//! `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`. The listener
//! port comes from `PORT`.

pub struct Config {
    pub database_url: String,
    pub listen_port: u16,
}

impl Config {
    pub fn from_env() -> Config {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            build_database_url(
                &env_or("DB_HOST", "localhost"),
                &env_or("DB_PORT", "5432"),
                &env_or("DB_USER", "postgres"),
                &env_or("DB_PASSWORD", ""),
                &env_or("DB_NAME", "property_db"),
            )
        });
        let listen_port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        Config {
            database_url,
            listen_port,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn build_database_url(host: &str, port: &str, user: &str, password: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{}@{}:{}/{}", user, host, port, name)
    } else {
        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_with_password() {
        assert_eq!(
            build_database_url("db", "5433", "app", "secret", "property_db"),
            "postgres://app:secret@db:5433/property_db"
        );
    }

    #[test]
    fn url_without_password_omits_colon() {
        assert_eq!(
            build_database_url("localhost", "5432", "postgres", "", "property_db"),
            "postgres://postgres@localhost:5432/property_db"
        );
    }
}
