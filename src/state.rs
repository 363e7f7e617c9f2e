use std::sync::Arc;

use crate::{db::dao::TodoDao, services::TodoService};

#[derive(Clone)]
pub struct AppState {
    pub todo_dao: TodoDao,
}

impl AppState {
    pub fn new(todo_dao: TodoDao) -> Arc<Self> {
        Arc::new(Self { todo_dao })
    }

    pub fn todo_service(&self) -> TodoService {
        TodoService::new(self.todo_dao.clone())
    }
}
