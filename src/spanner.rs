use anyhow::{Context, Result};
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig, Error as SpannerError};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update, update};
use gcloud_spanner::row::{Error as RowError, Row};
use gcloud_spanner::statement::{Statement, ToKind};
use gcloud_spanner::transaction_rw::CommitResult;
use gcloud_spanner::value::CommitTimestamp;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{Todo, TodoPatch};
use crate::store::TodoStore;

/// Table holding one row per todo
pub const TABLE_NAME: &str = "Todos";

const TODO_COLUMNS: [&str; 5] = ["id", "title", "description", "due_date", "is_complete"];

const SELECT_TODO: &str = "SELECT id, title, description, due_date, is_complete FROM Todos";

/// Shareable Spanner client for use across async handlers
#[derive(Clone)]
pub struct SpannerClient {
    inner: Arc<Client>,
}

impl SpannerClient {
    /// Create a new Spanner client from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// Instance, database and table are created first if they don't exist.
    pub async fn from_config(config: &Config) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.spanner_project, config.spanner_instance, config.spanner_database
        );

        match &config.spanner_emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    async fn query_todos(&self, statement: Statement) -> Result<Vec<Todo>> {
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query todos from Spanner")?;

        let mut todos = Vec::new();
        while let Some(row) = result_set.next().await? {
            todos.push(todo_from_row(&row)?);
        }
        Ok(todos)
    }
}

impl TodoStore for SpannerClient {
    async fn list(&self) -> Result<Vec<Todo>> {
        let sql = format!("{} ORDER BY created_at", SELECT_TODO);
        let statement = Statement::new(&sql);
        let todos = self.query_todos(statement).await?;

        tracing::debug!("Scanned {} todos", todos.len());
        Ok(todos)
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>> {
        let id = id.to_string();
        let sql = format!("{} WHERE id = @id", SELECT_TODO);
        let mut statement = Statement::new(&sql);
        statement.add_param("id", &id);

        let todo = self.query_todos(statement).await?.into_iter().next();
        if todo.is_none() {
            tracing::debug!("Todo not found with id: {}", id);
        }
        Ok(todo)
    }

    /// Insert or overwrite the whole row; `created_at` is stamped at commit
    async fn put(&self, todo: &Todo) -> Result<()> {
        let mutation = insert_or_update(
            TABLE_NAME,
            &["id", "title", "description", "due_date", "is_complete", "created_at"],
            &[
                &todo.id,
                &todo.title,
                &todo.description,
                &todo.due_date,
                &todo.is_complete,
                &CommitTimestamp::new(),
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to upsert todo to Spanner")?;

        tracing::debug!("Upserted todo with id: {}", todo.id);
        Ok(())
    }

    /// Read the row and write the patched columns in one read-write transaction
    ///
    /// The returned record and the not-found decision both come from that
    /// transaction, so a concurrent delete yields `Ok(None)` and a concurrent
    /// write to other columns is reflected in the result.
    async fn update_partial(&self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>> {
        let id = id.to_string();

        let result: std::result::Result<(CommitResult, Option<Todo>), SpannerError> = self
            .inner
            .read_write_transaction(|tx| {
                let id = id.clone();
                let patch = patch.clone();
                Box::pin(async move {
                    let row = tx
                        .read_row(TABLE_NAME, &TODO_COLUMNS, Key::new(&id))
                        .await?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let mut todo = todo_from_row(&row)?;

                    let (columns, values) = patch_columns(&id, &patch);
                    tx.buffer_write(vec![update(TABLE_NAME, &columns, &values)]);

                    patch.apply_to(&mut todo);
                    Ok(Some(todo))
                })
            })
            .await;

        let (_, todo) = result.context("Failed to update todo in Spanner")?;
        match &todo {
            Some(_) => tracing::debug!("Updated todo with id: {}", id),
            None => tracing::debug!("Todo not found for update with id: {}", id),
        }
        Ok(todo)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        let mutation = delete(TABLE_NAME, Key::new(&id));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete todo from Spanner")?;

        tracing::debug!("Deleted todo with id: {}", id);
        Ok(())
    }

    /// Execute SELECT 1 to verify the connection is alive
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

fn todo_from_row(row: &Row) -> std::result::Result<Todo, RowError> {
    Ok(Todo {
        id: row.column_by_name("id")?,
        title: row.column_by_name("title")?,
        description: row.column_by_name("description")?,
        due_date: row.column_by_name("due_date")?,
        is_complete: row.column_by_name("is_complete")?,
    })
}

/// Key column plus the columns carried by `patch`, with matching values
fn patch_columns<'a>(
    id: &'a String,
    patch: &'a TodoPatch,
) -> (Vec<&'static str>, Vec<&'a dyn ToKind>) {
    let mut columns: Vec<&'static str> = vec!["id"];
    let mut values: Vec<&'a dyn ToKind> = Vec::with_capacity(5);
    values.push(id);

    if let Some(title) = &patch.title {
        columns.push("title");
        values.push(title);
    }
    if let Some(description) = &patch.description {
        columns.push("description");
        values.push(description);
    }
    if let Some(is_complete) = &patch.is_complete {
        columns.push("is_complete");
        values.push(is_complete);
    }
    if let Some(due_date) = &patch.due_date {
        columns.push("due_date");
        values.push(due_date);
    }

    (columns, values)
}

/// Automatically provision the Spanner instance, database, and `Todos` table
///
/// Idempotent; lets a fresh emulator be used without any manual setup.
async fn auto_provision(config: &Config) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let provisioner = Provisioner::new(config).await?;

    if provisioner.instance_exists().await? {
        tracing::info!("Instance already exists: {}", provisioner.instance_path);
    } else {
        provisioner.create_instance().await?;
    }

    // A new database is created together with its table, so the DDL check
    // only matters for databases that were already there.
    if !provisioner.database_exists().await? {
        provisioner.create_database_with_table().await?;
    } else if provisioner.table_exists().await? {
        tracing::info!("Table '{}' already exists", TABLE_NAME);
    } else {
        provisioner.create_table().await?;
    }

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Admin client plus the resource paths derived from the configuration
struct Provisioner<'a> {
    admin: AdminClient,
    config: &'a Config,
    project_path: String,
    instance_path: String,
    database_path: String,
}

impl<'a> Provisioner<'a> {
    async fn new(config: &'a Config) -> Result<Self> {
        let admin = AdminClient::new(AdminClientConfig::default())
            .await
            .context("Failed to create Spanner admin client")?;

        let project_path = format!("projects/{}", config.spanner_project);
        let instance_path = format!("{}/instances/{}", project_path, config.spanner_instance);
        let database_path = format!("{}/databases/{}", instance_path, config.spanner_database);

        Ok(Self {
            admin,
            config,
            project_path,
            instance_path,
            database_path,
        })
    }

    async fn instance_exists(&self) -> Result<bool> {
        let request = GetInstanceRequest {
            name: self.instance_path.clone(),
            field_mask: None,
        };
        found(self.admin.instance().get_instance(request, None).await, "instance")
    }

    async fn create_instance(&self) -> Result<()> {
        let instance_config = instance_config_path(self.config, &self.project_path);
        tracing::info!(
            "Instance not found, creating: {} ({})",
            self.instance_path,
            instance_config
        );

        let request = CreateInstanceRequest {
            parent: self.project_path.clone(),
            instance_id: self.config.spanner_instance.clone(),
            instance: Some(Instance {
                name: self.instance_path.clone(),
                config: instance_config,
                display_name: format!("{} todos", self.config.spanner_instance),
                node_count: 1,
                ..Default::default()
            }),
        };

        self.admin
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?
            .wait(None)
            .await
            .context("Failed to create instance")?;

        tracing::info!("Instance created successfully: {}", self.instance_path);
        Ok(())
    }

    async fn database_exists(&self) -> Result<bool> {
        let request = GetDatabaseRequest {
            name: self.database_path.clone(),
        };
        found(self.admin.database().get_database(request, None).await, "database")
    }

    async fn create_database_with_table(&self) -> Result<()> {
        tracing::info!(
            "Database not found, creating with table '{}': {}",
            TABLE_NAME,
            self.database_path
        );

        let request = CreateDatabaseRequest {
            parent: self.instance_path.clone(),
            create_statement: format!("CREATE DATABASE `{}`", self.config.spanner_database),
            extra_statements: vec![create_table_ddl()],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };

        self.admin
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?
            .wait(None)
            .await
            .context("Failed to create database")?;

        tracing::info!("Database created successfully: {}", self.database_path);
        Ok(())
    }

    async fn table_exists(&self) -> Result<bool> {
        let request = GetDatabaseDdlRequest {
            database: self.database_path.clone(),
        };

        let statements = self
            .admin
            .database()
            .get_database_ddl(request, None)
            .await
            .context("Failed to get database DDL")?
            .into_inner()
            .statements;

        Ok(ddl_declares_table(&statements))
    }

    async fn create_table(&self) -> Result<()> {
        tracing::info!("Table '{}' not found, creating...", TABLE_NAME);

        let request = UpdateDatabaseDdlRequest {
            database: self.database_path.clone(),
            statements: vec![create_table_ddl()],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };

        self.admin
            .database()
            .update_database_ddl(request, None)
            .await
            .context("Failed to start table creation")?
            .wait(None)
            .await
            .context("Failed to create table")?;

        tracing::info!("Table '{}' created successfully", TABLE_NAME);
        Ok(())
    }
}

/// `Ok(false)` on NOT_FOUND, an error for any other failure
fn found<T>(result: std::result::Result<T, Status>, resource: &str) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(status) if status.code() == Code::NotFound => Ok(false),
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            resource,
            status.message()
        )),
    }
}

fn ddl_declares_table(statements: &[String]) -> bool {
    let plain = format!("CREATE TABLE {}", TABLE_NAME);
    let quoted = format!("CREATE TABLE `{}`", TABLE_NAME);
    statements
        .iter()
        .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted))
}

/// Instance config path for new instances: the emulator only knows
/// `emulator-config`, production uses the configured region
fn instance_config_path(config: &Config, project_path: &str) -> String {
    if config.spanner_emulator_host.is_some() {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-{}", project_path, config.spanner_region)
    }
}

fn create_table_ddl() -> String {
    format!(
        r#"
CREATE TABLE {} (
    id STRING(36) NOT NULL,
    title STRING(MAX),
    description STRING(MAX),
    due_date STRING(MAX),
    is_complete BOOL NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)
"#,
        TABLE_NAME
    )
    .trim()
    .to_string()
}
