//! # Schoolbook CLI
//!
//! Database seeding utilities for Schoolbook development and demos.
//!
//! ```ignore
//! use schoolbook_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_students_per_class(30);
//! seed_all(&pool, &config).await?;
//! ```

pub mod seeder;
