//! # Voter-Weight Plugins
//!
//! Registry of known plugin programs, the client handles that represent them,
//! the provider that supplies those handles and the resolver that picks the one
//! governing a realm's community mint.

pub mod client;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use client::{PluginClient, PluginClients, PluginError, PluginProgram};
pub use provider::{PluginClientProvider, ProgramPluginProvider};
pub use registry::{PluginFamily, RESOLUTION_ORDER};
pub use resolver::{resolve_plugin, PluginResolution};
