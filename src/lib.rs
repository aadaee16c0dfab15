/// TTRPG Catalog - in-memory content catalog and resolution engine
///
/// Ingests tabletop RPG rules content (creatures, spells, items, books, ...)
/// across rules editions plus homebrew, and resolves lookups over it.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
