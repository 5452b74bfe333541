use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::pagination::{Direction, Page, PageRequest};

use crate::repository::{sort_column, Entity, Repository, RepositoryError};

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

/// Process-local repository used in tests and when no Supabase project is
/// configured. Every call holds the table lock for its whole duration.
pub struct InMemoryRepository<E> {
    table: RwLock<Table<E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    async fn find_page<F>(&self, request: &PageRequest, keep: F) -> Result<Page<E>, RepositoryError>
    where
        F: Fn(&Value) -> bool,
    {
        let column = sort_column::<E>(&request.sort)?;
        let table = self.table.read().await;

        let mut rows = table
            .rows
            .values()
            .map(|entity| Ok((serde_json::to_value(entity)?, entity)))
            .collect::<Result<Vec<(Value, &E)>, serde_json::Error>>()?;
        rows.retain(|(value, _)| keep(value));

        rows.sort_by(|(a, a_entity), (b, b_entity)| {
            let ordering = compare_values(&a[column], &b[column]);
            let ordering = match request.sort.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a_entity.id().cmp(&b_entity.id()))
        });

        let total = rows.len() as u64;
        let content = rows
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .map(|(_, entity)| entity.clone())
            .collect();

        Ok(Page::new(content, request, total))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        // nulls sort last, like Postgres ascending order
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn matches_value(stored: &Value, expected: &str) -> bool {
    match stored {
        Value::String(s) => s == expected,
        Value::Null => false,
        other => other.to_string() == expected,
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn save(&self, mut entity: E) -> Result<E, RepositoryError> {
        let mut table = self.table.write().await;

        let id = match entity.id() {
            Some(id) => {
                if !table.rows.contains_key(&id) {
                    return Err(RepositoryError::RowNotFound { table: E::TABLE, id });
                }
                id
            }
            None => {
                let id = table.next_id;
                table.next_id += 1;
                entity.set_id(id);
                id
            }
        };

        debug!("Saving {} row {} in memory", E::TABLE, id);
        table.rows.insert(id, entity.clone());

        Ok(entity)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError> {
        self.find_page(request, |_| true).await
    }

    async fn find_all_active(&self, request: &PageRequest) -> Result<Page<E>, RepositoryError> {
        match E::ACTIVE_COLUMN {
            Some(column) => {
                self.find_page(request, |row| row[column].as_bool().unwrap_or(false))
                    .await
            }
            None => self.find_all(request).await,
        }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<E>, RepositoryError> {
        let table = self.table.read().await;

        for entity in table.rows.values() {
            let row = serde_json::to_value(entity)?;
            if matches_value(&row[column], value) {
                return Ok(Some(entity.clone()));
            }
        }

        Ok(None)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        debug!("Deleting {} row {} from memory", E::TABLE, id);
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::{Deserialize, Serialize};
    use shared_models::pagination::Sort;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Clinic {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        name: String,
        active: bool,
    }

    impl Entity for Clinic {
        const TABLE: &'static str = "clinics";
        const ACTIVE_COLUMN: Option<&'static str> = Some("active");

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }

        fn sort_column(property: &str) -> Option<&'static str> {
            match property {
                "id" => Some("id"),
                "nome" => Some("name"),
                _ => None,
            }
        }
    }

    fn clinic(name: &str, active: bool) -> Clinic {
        Clinic {
            id: None,
            name: name.to_string(),
            active,
        }
    }

    async fn seeded() -> InMemoryRepository<Clinic> {
        let repo = InMemoryRepository::new();
        for (name, active) in [("Centro", true), ("Anchieta", false), ("Barra", true)] {
            repo.save(clinic(name, active)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryRepository::new();

        let first = repo.save(clinic("Centro", true)).await.unwrap();
        let second = repo.save(clinic("Barra", true)).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find_by_id(2).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_fails() {
        let repo: InMemoryRepository<Clinic> = InMemoryRepository::new();
        let mut ghost = clinic("Ghost", true);
        ghost.id = Some(99);

        assert_matches!(
            repo.save(ghost).await,
            Err(RepositoryError::RowNotFound { id: 99, .. })
        );
    }

    #[tokio::test]
    async fn test_find_all_sorts_by_mapped_column() {
        let repo = seeded().await;
        let request = PageRequest::new(0, 10, Sort::asc("nome"));

        let page = repo.find_all(&request).await.unwrap();
        let names: Vec<_> = page.content.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Anchieta", "Barra", "Centro"]);
        assert_eq!(page.total_elements, 3);

        let request = PageRequest::new(0, 10, Sort::desc("nome"));
        let page = repo.find_all(&request).await.unwrap();
        assert_eq!(page.content[0].name, "Centro");
    }

    #[tokio::test]
    async fn test_find_all_active_skips_inactive_rows() {
        let repo = seeded().await;
        let request = PageRequest::new(0, 10, Sort::asc("nome"));

        let page = repo.find_all_active(&request).await.unwrap();

        assert_eq!(page.total_elements, 2);
        assert!(page.content.iter().all(|c| c.active));
    }

    #[tokio::test]
    async fn test_paging_window() {
        let repo = seeded().await;
        let request = PageRequest::new(1, 2, Sort::asc("nome"));

        let page = repo.find_all(&request).await.unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Centro");
        assert!(page.last);
    }

    #[tokio::test]
    async fn test_unknown_sort_column_is_rejected() {
        let repo = seeded().await;
        let request = PageRequest::new(0, 10, Sort::asc("password"));

        assert_matches!(
            repo.find_all(&request).await,
            Err(RepositoryError::InvalidSort(property)) if property == "password"
        );
    }

    #[tokio::test]
    async fn test_find_one_by_and_delete() {
        let repo = seeded().await;

        let barra = repo.find_one_by("name", "Barra").await.unwrap().unwrap();
        assert!(repo.find_one_by("name", "Nowhere").await.unwrap().is_none());

        assert!(repo.delete_by_id(barra.id.unwrap()).await.unwrap());
        assert!(!repo.delete_by_id(barra.id.unwrap()).await.unwrap());
        assert_eq!(repo.len().await, 2);
    }
}
