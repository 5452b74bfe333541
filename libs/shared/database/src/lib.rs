pub mod memory;
pub mod repository;
pub mod supabase;

pub use memory::InMemoryRepository;
pub use repository::{Entity, Repository, RepositoryError};
pub use supabase::{SupabaseClient, SupabaseRepository};
