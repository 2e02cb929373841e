use std::sync::Arc;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use strata_config::Config;
use strata_schema::{
    Column, ColumnType, ConditionPipeline, ProcessorRegistry, Schema, SchemaConverter,
    SingleQuoteEscaper, SqlQuoter, SqliteConverter,
};
use strata_types::{Error, FieldValue, Filter, Record, Result, ENTITY_ID};
use tracing::debug;

use crate::params::ConnectionParams;
use crate::Storage;

/// SQLite storage driver.
///
/// Holds one `rusqlite` connection, opened lazily on first use and kept for
/// the driver's lifetime (closed on drop). Connection parameters come from
/// `connections.<schema name>.*`; the table name is the schema's source.
pub struct SqliteDriver {
    config: Arc<Config>,
    pipeline: ConditionPipeline,
    converter: SqliteConverter,
    params: ConnectionParams,
    schema: Option<Schema>,
    identifier: String,
    connection: Option<Connection>,
}

impl SqliteDriver {
    pub fn new(
        config: Arc<Config>,
        processors: Arc<ProcessorRegistry>,
        schema: Option<Schema>,
    ) -> Result<Self> {
        let pipeline = ConditionPipeline::from_config(&config, processors)?;
        let params = ConnectionParams::resolve(&config, "default");

        let mut driver = Self {
            config,
            pipeline,
            converter: SqliteConverter,
            params,
            schema: None,
            identifier: ENTITY_ID.to_string(),
            connection: None,
        };

        if let Some(schema) = schema {
            driver.set_schema(schema)?;
        }

        Ok(driver)
    }

    fn validate(&self) -> Result<()> {
        if self.params.name.is_empty() {
            return Err(Error::StorageRead("no database path configured".to_string()));
        }
        if self.params.table.is_empty() {
            return Err(Error::StorageRead("no database table configured".to_string()));
        }
        Ok(())
    }

    /// Open the connection if needed and run the one-time prepare step.
    fn connect(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        self.validate()?;
        let connection = Connection::open(&self.params.name).map_err(|e| {
            Error::StorageRead(format!(
                "failed to open database \"{}\": {e}",
                self.params.name
            ))
        })?;
        self.connection = Some(connection);
        self.prepare()
    }

    fn conn(&self) -> Result<&Connection> {
        self.connection
            .as_ref()
            .ok_or_else(|| Error::StorageRead("not connected".to_string()))
    }

    /// Create the table if absent; otherwise compare its introspected
    /// structure against the assigned schema and apply the diff.
    fn prepare(&mut self) -> Result<()> {
        let schema = self
            .schema
            .clone()
            .ok_or_else(|| Error::StorageRead("no schema assigned".to_string()))?;
        let table = self.params.table.clone();

        if !self.table_exists(&table)? {
            let ddl = self.converter.convert(&schema)?;
            debug!(table, "creating storage table");
            self.conn()?.execute_batch(&ddl).map_err(|e| {
                Error::StorageWrite(format!("failed to create table \"{table}\": {e}"))
            })?;
            return Ok(());
        }

        // The existence check is by column name only; type, length, index,
        // and relationship drift is not detected.
        let actual = self.introspect(&table, &schema)?;
        let applied = schema
            .columns()
            .iter()
            .all(|column| actual.column(&column.name).is_ok());
        if applied {
            return Ok(());
        }

        for sql in self.converter.diff(&actual, &schema)? {
            debug!(%sql, "applying migration statement");
            self.conn()?
                .execute(&sql, [])
                .map_err(|e| Error::StorageWrite(format!("migration failed: {e}")))?;
        }

        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let mut stmt = self
            .conn()?
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .map_err(|e| Error::StorageRead(format!("failed to inspect tables: {e}")))?;
        stmt.exists([table])
            .map_err(|e| Error::StorageRead(format!("failed to inspect tables: {e}")))
    }

    /// Introspect the live table into a schema for diffing.
    ///
    /// SQLite keeps no declared lengths and collapses bool to INTEGER, so a
    /// live column whose declared type matches the expected column's rendered
    /// type is mirrored back as that expected column; only genuinely drifted
    /// or unknown columns fall back to the raw affinity mapping.
    fn introspect(&self, table: &str, expected: &Schema) -> Result<Schema> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info('{table}')"))
            .map_err(|e| Error::StorageRead(format!("failed to describe \"{table}\": {e}")))?;
        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let declared: String = row.get(2)?;
                Ok((name, declared))
            })
            .map_err(|e| Error::StorageRead(format!("failed to describe \"{table}\": {e}")))?;

        let mut columns = Vec::new();
        for row in rows {
            let (name, declared) =
                row.map_err(|e| Error::StorageRead(format!("failed to describe \"{table}\": {e}")))?;

            if let Ok(column) = expected.column(&name) {
                if self.converter.column_type(column).eq_ignore_ascii_case(&declared) {
                    columns.push(Column::new(&name, column.length.clone(), column.column_type));
                    continue;
                }
            }

            let column_type = match declared.to_ascii_lowercase().as_str() {
                "integer" => ColumnType::Int,
                "real" => ColumnType::Float,
                _ => ColumnType::Text,
            };
            columns.push(Column::new(&name, "0", column_type));
        }

        Schema::new(Schema::DEFAULT_NAME, table, columns)
    }

    /// Build condition fragments for the filters, in supplied order. The
    /// first fragment carries no leading operator.
    fn prepare_conditions(&self, filters: &[Filter]) -> Result<Vec<String>> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| Error::StorageRead("no schema assigned".to_string()))?;
        let quoter = SingleQuoteEscaper;

        let mut conditions = Vec::with_capacity(filters.len());
        for (index, filter) in filters.iter().enumerate() {
            let column = schema.column(&filter.field)?;
            let quoted = quoter.quote(&filter.value);
            let value = self.pipeline.process(&quoted, filter, column, &quoter)?;

            let operator = if index > 0 { filter.operator.as_str() } else { "" };
            let fragment = format!(
                "{} {} {} {}",
                operator,
                filter.field,
                filter.comparator.as_str(),
                value
            );
            conditions.push(fragment.trim().to_string());
        }

        Ok(conditions)
    }

    fn fetch_all(&self, sql: &str) -> Result<Vec<Record>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| Error::StorageRead(format!("failed to query records: {e}")))?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut rows = stmt
            .query([])
            .map_err(|e| Error::StorageRead(format!("failed to query records: {e}")))?;
        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| Error::StorageRead(format!("failed to read row: {e}")))?
        {
            let mut record = Record::new();
            for (index, name) in names.iter().enumerate() {
                let value = row
                    .get_ref(index)
                    .map_err(|e| Error::StorageRead(format!("failed to read row: {e}")))?;
                record.insert(name.clone(), field_value(value));
            }
            records.push(record);
        }

        Ok(records)
    }
}

impl Storage for SqliteDriver {
    fn load(&mut self, id: i64) -> Result<Option<Record>> {
        self.connect()?;
        let sql = format!(
            "SELECT * FROM `{}` WHERE `{}` = {id}",
            self.params.table, self.identifier
        );
        let mut records = self.fetch_all(&sql)?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }

    fn query(&mut self, filters: &[Filter], page: u32, limit: u32) -> Result<Vec<Record>> {
        self.connect()?;
        let conditions = self.prepare_conditions(filters)?;

        let mut sql = format!("SELECT * FROM `{}`", self.params.table);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" "));
        }
        if limit > 0 {
            let offset = page.saturating_sub(1);
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        self.fetch_all(&sql)
    }

    fn count(&mut self, filters: &[Filter]) -> Result<u64> {
        self.connect()?;
        let conditions = self.prepare_conditions(filters)?;

        let mut sql = format!("SELECT COUNT(*) FROM `{}`", self.params.table);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" "));
        }

        self.conn()?
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map(|count| count as u64)
            .map_err(|e| Error::StorageRead(format!("failed to count records: {e}")))
    }

    fn save(&mut self, record: &Record, id: Option<i64>) -> Result<i64> {
        self.connect()?;

        let mut data = record.clone();
        match id {
            // An explicit identity is an upsert key.
            Some(id) => data.insert(self.identifier.clone(), FieldValue::Int(id)),
            // Without one, identity is storage-assigned.
            None => {
                data.remove(&self.identifier);
            }
        }

        let mut columns = Vec::with_capacity(data.len());
        let mut placeholders = Vec::with_capacity(data.len());
        let mut updates = Vec::new();
        let mut values: Vec<SqlValue> = Vec::with_capacity(data.len());

        for (index, (name, value)) in data.iter().enumerate() {
            columns.push(format!("`{name}`"));
            placeholders.push(format!("?{}", index + 1));
            if name != self.identifier {
                updates.push(format!("`{name}` = excluded.`{name}`"));
            }
            values.push(sql_value(value)?);
        }

        let resolution = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };
        let sql = format!(
            "INSERT INTO `{}` ({}) VALUES ({}) ON CONFLICT(`{}`) {}",
            self.params.table,
            columns.join(", "),
            placeholders.join(", "),
            self.identifier,
            resolution
        );

        let conn = self.conn()?;
        conn.execute(&sql, rusqlite::params_from_iter(values))
            .map_err(|e| Error::StorageWrite(format!("failed to save record: {e}")))?;

        Ok(id.unwrap_or_else(|| conn.last_insert_rowid()))
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        self.connect()?;
        let sql = format!(
            "DELETE FROM `{}` WHERE `{}` = ?1",
            self.params.table, self.identifier
        );
        let affected = self
            .conn()?
            .execute(&sql, [id])
            .map_err(|e| Error::StorageWrite(format!("failed to delete record: {e}")))?;

        if affected == 0 {
            return Err(Error::StorageWrite(format!(
                "no record found with ID \"{id}\""
            )));
        }
        Ok(())
    }

    fn set_schema(&mut self, schema: Schema) -> Result<()> {
        self.params = ConnectionParams::resolve(&self.config, schema.name());
        self.params.table = schema.source().to_string();
        self.identifier = schema
            .identifier()
            .map(|column| column.name.clone())
            .unwrap_or_else(|| ENTITY_ID.to_string());
        self.schema = Some(schema);

        // A connected driver reconnects so the prepare step runs against the
        // new schema.
        if self.connection.take().is_some() {
            self.connect()?;
        }
        Ok(())
    }
}

fn field_value(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(v) => FieldValue::Int(v),
        ValueRef::Real(v) => FieldValue::Float(v),
        ValueRef::Text(v) => FieldValue::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => FieldValue::Text(String::from_utf8_lossy(v).into_owned()),
    }
}

fn sql_value(value: &FieldValue) -> Result<SqlValue> {
    Ok(match value {
        FieldValue::Null => SqlValue::Null,
        FieldValue::Bool(v) => SqlValue::Integer(i64::from(*v)),
        FieldValue::Int(v) => SqlValue::Integer(*v),
        FieldValue::Float(v) => SqlValue::Real(*v),
        FieldValue::Text(v) => SqlValue::Text(v.clone()),
        FieldValue::Serialized(v) => SqlValue::Text(
            serde_json::to_string(v)
                .map_err(|e| Error::StorageWrite(format!("failed to serialize field: {e}")))?,
        ),
    })
}
