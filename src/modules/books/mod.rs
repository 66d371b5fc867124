use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use shelfie_db::{Book, Db};
use shelfie_http::error::AppError;
use shelfie_kernel::{InitCtx, Module};

/// Books module: read access to the book catalogue
pub struct BooksModule {
    db: Arc<dyn Db>,
}

impl BooksModule {
    pub fn new(db: Arc<dyn Db>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            max_page_size = ctx.settings.max_page_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books))
            .route("/health", get(health_check))
            .with_state(self.db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": {
                                "description": "Internal server error",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "isbn": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "publish_year": { "type": "string" },
                            "publisher": { "type": "string" },
                            "image_url_s": { "type": "string", "description": "Small cover image" },
                            "image_url_m": { "type": "string", "description": "Medium cover image" },
                            "image_url_l": { "type": "string", "description": "Large cover image" }
                        },
                        "required": [
                            "id", "isbn", "title", "author", "publish_year", "publisher",
                            "image_url_s", "image_url_m", "image_url_l"
                        ]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(db): State<Arc<dyn Db>>) -> Result<Json<Vec<Book>>, AppError> {
    let books = db.get_books().await?;
    Ok(Json(books))
}

/// Create a new instance of the books module
pub fn create_module(db: Arc<dyn Db>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    struct FixedDb(Vec<Book>);

    #[async_trait]
    impl Db for FixedDb {
        async fn get_books(&self) -> anyhow::Result<Vec<Book>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDb;

    #[async_trait]
    impl Db for BrokenDb {
        async fn get_books(&self) -> anyhow::Result<Vec<Book>> {
            anyhow::bail!("container unavailable")
        }
    }

    fn book() -> Book {
        Book {
            isbn: "0002005018".to_string(),
            title: "Clara Callan".to_string(),
            author: "Richard Bruce Wright".to_string(),
            publish_year: "2001".to_string(),
            publisher: "HarperFlamingo Canada".to_string(),
            image_url_s: "s.jpg".to_string(),
            image_url_m: "m.jpg".to_string(),
            image_url_l: "l.jpg".to_string(),
            id: "book-1".to_string(),
        }
    }

    async fn get_root(module: &BooksModule) -> axum::response::Response {
        module
            .routes()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn lists_books_from_db() {
        let module = BooksModule::new(Arc::new(FixedDb(vec![book()])));
        let response = get_root(&module).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let books: Vec<Book> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(books, vec![book()]);
    }

    #[tokio::test]
    async fn db_failure_maps_to_internal_error() {
        let module = BooksModule::new(Arc::new(BrokenDb));
        let response = get_root(&module).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn openapi_declares_book_schema() {
        let module = BooksModule::new(Arc::new(FixedDb(vec![])));
        let spec = module.openapi().unwrap();
        assert!(spec["components"]["schemas"]["Book"].is_object());
        assert!(spec["paths"]["/"]["get"].is_object());
    }
}
