use strata_config::Config;

/// Backend connection parameters resolved from `connections.<name>.*`.
///
/// SQLite uses `name` (the database path) and `table`; the remaining keys
/// exist for network backends and are resolved for parity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub name: String,
    pub user: String,
    pub pass: String,
    pub port: u16,
    pub charset: String,
    pub table: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            name: String::new(),
            user: String::new(),
            pass: String::new(),
            port: 3306,
            charset: "utf8".to_string(),
            table: String::new(),
        }
    }
}

impl ConnectionParams {
    /// Resolve parameters for the named connection, falling back to the
    /// defaults for any key the configuration omits.
    pub fn resolve(config: &Config, connection: &str) -> Self {
        let mut params = Self::default();
        let base = format!("connections.{connection}");

        if let Some(host) = config.get_str(&format!("{base}.host")) {
            params.host = host.to_string();
        }
        if let Some(name) = config.get_str(&format!("{base}.name")) {
            params.name = name.to_string();
        }
        if let Some(user) = config.get_str(&format!("{base}.user")) {
            params.user = user.to_string();
        }
        if let Some(pass) = config.get_str(&format!("{base}.pass")) {
            params.pass = pass.to_string();
        }
        if let Some(port) = config.get_i64(&format!("{base}.port")) {
            params.port = port.clamp(0, u16::MAX as i64) as u16;
        }
        if let Some(charset) = config.get_str(&format!("{base}.charset")) {
            params.charset = charset.to_string();
        }
        if let Some(table) = config.get_str(&format!("{base}.table")) {
            params.table = table.to_string();
        }

        params
    }
}
