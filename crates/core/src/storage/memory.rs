//! In-process route store.

use std::sync::Mutex;

use chrono::Utc;

use super::{Route, RouteStore, StorageError};

/// Route store backed by a vector. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryRouteStore {
    routes: Mutex<Vec<Route>>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Route>>, StorageError> {
        self.routes.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl RouteStore for MemoryRouteStore {
    fn save_route(&self, route: &mut Route) -> Result<(), StorageError> {
        let mut routes = self.lock()?;
        let position = routes.iter().position(|r| r.name == route.name);

        route.stamp(position.map(|i| &routes[i]), Utc::now());
        match position {
            Some(i) => routes[i] = route.clone(),
            None => routes.push(route.clone()),
        }
        Ok(())
    }

    fn list_routes(&self) -> Result<Vec<Route>, StorageError> {
        let mut routes = self.lock()?.clone();
        routes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(routes)
    }

    fn get_route(&self, id: &str) -> Result<Route, StorageError> {
        self.lock()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete_route(&self, id: &str) -> Result<(), StorageError> {
        let mut routes = self.lock()?;
        let before = routes.len();
        routes.retain(|r| r.id != id);
        if routes.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
