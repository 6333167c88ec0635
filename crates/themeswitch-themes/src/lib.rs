//! Themeswitch theme resolution and application
//!
//! Resolves a theme identifier to a directory across the bundled and user
//! theme roots, maps it to the four stylesheet layers and pushes those to a
//! [`StylesheetRenderer`].
//!
//! # Overview
//!
//! 1. **Registry** (`registry`): merges the theme roots, user themes shadow bundled ones
//! 2. **Layers** (`layers`): theme directory to extensionless layer stems
//! 3. **Applier** (`applier`): startup fast path and the resolved apply path
//! 4. **Watchdog** (`watchdog`): reacts to theme events on the [`ThemeEventBus`]
//!
//! The settings surface (clone, save, remove, edit) lives in `operations`
//! and `editor`, and [`ThemeExtension`] wires everything together.

pub mod applier;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod extension;
pub mod fonts;
pub mod layers;
pub mod operations;
pub mod registry;
pub mod renderer;
pub mod types;
pub mod watchdog;

pub use applier::{ApplyOutcome, ThemeApplier, Verification};
pub use config::ThemesConfig;
pub use editor::{edit_style, Dialog, DialogKind, DialogSink, EditOutcome, FileOpener, SystemOpener};
pub use error::{Result, ThemeError};
pub use events::{ThemeEvent, ThemeEventBus};
pub use extension::ThemeExtension;
pub use fonts::{available_fonts, FcListFonts, FontSource, DEFAULT_FONTS};
pub use layers::map_layers;
pub use operations::ThemeOperations;
pub use registry::{read_extensible_dir, resolve, ThemeRegistry};
pub use renderer::{MemoryRenderer, RendererCall, StylesheetRenderer};
pub use types::{LayerPaths, StylesheetLayer, ThemeDirectory, ThemeOrigin};
pub use watchdog::{ApplicationWatchdog, WatchdogHandle};
