pub mod books;

use std::sync::Arc;

use shelfie_db::Db;
use shelfie_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: Arc<dyn Db>) {
    registry.register(books::create_module(db));
}
