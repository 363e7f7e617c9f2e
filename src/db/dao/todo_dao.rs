use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryOrder, Set, TransactionTrait,
};

use super::{DaoLayerError, DaoResult};
use crate::config::DatabaseConfig;
use crate::db::connection;
use crate::db::entities::prelude::Todo;
use crate::db::entities::todo;

const ENTITY: &str = "Todo";

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub status: String,
    pub task: String,
}

#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub status: Option<String>,
    pub task: Option<String>,
}

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl TodoDao {
    pub async fn connect(cfg: &DatabaseConfig) -> DaoResult<Self> {
        let db = connection::connect(cfg).await?;
        Ok(Self::from_connection(db))
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Checks a connection out of the pool and opens a transaction on it.
    ///
    /// The connection goes back to the pool when the scope is committed or
    /// dropped; a dropped scope rolls back whatever it wrote.
    pub async fn scope(&self) -> DaoResult<TodoScope> {
        let txn = self.db.begin().await.map_err(DaoLayerError::Db)?;
        Ok(TodoScope { txn })
    }

    pub async fn list(&self) -> DaoResult<Vec<todo::Model>> {
        let scope = self.scope().await?;
        let todos = scope.list().await?;
        scope.commit().await?;
        Ok(todos)
    }

    pub async fn find(&self, id: i32) -> DaoResult<todo::Model> {
        let scope = self.scope().await?;
        let todo = scope.find(id).await?;
        scope.commit().await?;
        Ok(todo)
    }

    pub async fn add(&self, new: NewTodo) -> DaoResult<todo::Model> {
        let scope = self.scope().await?;
        let todo = scope.add(new).await?;
        scope.commit().await?;
        Ok(todo)
    }

    pub async fn update(&self, id: i32, changes: TodoChanges) -> DaoResult<todo::Model> {
        let scope = self.scope().await?;
        let todo = scope.update(id, changes).await?;
        scope.commit().await?;
        Ok(todo)
    }

    pub async fn remove(&self, id: i32) -> DaoResult<()> {
        let scope = self.scope().await?;
        scope.remove(id).await?;
        scope.commit().await
    }

    pub async fn count(&self) -> DaoResult<u64> {
        let scope = self.scope().await?;
        let count = scope.count().await?;
        scope.commit().await?;
        Ok(count)
    }
}

/// One unit of work against the `todos` table.
pub struct TodoScope {
    txn: DatabaseTransaction,
}

impl TodoScope {
    pub async fn list(&self) -> DaoResult<Vec<todo::Model>> {
        Todo::find()
            .order_by_asc(todo::Column::Id)
            .all(&self.txn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find(&self, id: i32) -> DaoResult<todo::Model> {
        Todo::find_by_id(id)
            .one(&self.txn)
            .await
            .map_err(DaoLayerError::Db)?
            .ok_or(DaoLayerError::NotFound { entity: ENTITY, id })
    }

    pub async fn add(&self, new: NewTodo) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            created_time: Set(Utc::now().fixed_offset()),
            status: Set(new.status),
            task: Set(new.task),
            ..Default::default()
        };
        model.insert(&self.txn).await.map_err(DaoLayerError::Db)
    }

    pub async fn update(&self, id: i32, changes: TodoChanges) -> DaoResult<todo::Model> {
        let existing = self.find(id).await?;
        let mut active: todo::ActiveModel = existing.into();
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(task) = changes.task {
            active.task = Set(task);
        }
        active.update(&self.txn).await.map_err(DaoLayerError::Db)
    }

    pub async fn remove(&self, id: i32) -> DaoResult<()> {
        let result = Todo::delete_by_id(id)
            .exec(&self.txn)
            .await
            .map_err(DaoLayerError::Db)?;

        if result.rows_affected == 0 {
            return Err(DaoLayerError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }

    pub async fn count(&self) -> DaoResult<u64> {
        Todo::find()
            .count(&self.txn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn commit(self) -> DaoResult<()> {
        self.txn.commit().await.map_err(DaoLayerError::Db)
    }
}
