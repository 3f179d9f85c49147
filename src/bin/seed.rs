//! Seeds a database with two demonstration authors and prints every author.
//!
//! Reads the same environment variables as the web application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::infrastructure::{StoreFactory, seed_demo_authors};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let factory = match StoreFactory::from_env() {
        Ok(factory) => factory,
        Err(error) => {
            tracing::error!("{}", error);
            std::process::exit(1);
        }
    };

    let store = match factory.create().await {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("Failed to initialize store: {}", error);
            std::process::exit(1);
        }
    };

    let authors = match seed_demo_authors(store.as_ref()).await {
        Ok(authors) => authors,
        Err(error) => {
            tracing::error!("Seeding failed: {}", error);
            std::process::exit(1);
        }
    };

    for author in &authors {
        println!("ID: {}, Name: {}", author.author_id, author.name);
    }

    tracing::info!("Database seeded.");
}
