//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, AssetStore)
//! but are themselves concrete structs, not traits.

mod binder;
mod save_hook;
mod scene;

pub use binder::AutoBinder;
pub use save_hook::SaveHook;
pub use scene::{LoadedScene, SceneService};
