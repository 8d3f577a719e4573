use super::types::Args;
use sql_middleware::middleware::DatabaseType;

impl Args {
    /// Validate the database configuration
    ///
    /// # Errors
    ///
    /// Will return `Err` if the database configuration is invalid
    pub fn validate(&mut self) -> Result<(), String> {
        if self.db_type == DatabaseType::Postgres {
            let secrets_locations = ["/secrets/db_password", "/run/secrets/db_password"];

            if self.db_user.is_none() {
                return Err("Postgres user is required".to_string());
            }
            if self.db_host.is_none() || self.db_host.as_deref().unwrap().is_empty() {
                return Err("Postgres host is required".to_string());
            }
            if self.db_port.is_none() {
                return Err("Postgres port is required".to_string());
            }
            if self.db_password.is_none() {
                return Err("Postgres password is required".to_string());
            } else if secrets_locations.contains(&self.db_password.as_deref().unwrap()) {
                // the password arg may point at a mounted secrets file
                let contents = std::fs::read_to_string(self.db_password.as_deref().unwrap())
                    .map_err(|e| format!("Could not read password file: {e}"))?;
                self.db_password = Some(contents.trim().to_string());
            }
        }
        Ok(())
    }
}
