//! # Plugin Resolver
//!
//! Picks the plugin client that governs a mint from its configured voter-weight
//! addin. Families are checked in [`RESOLUTION_ORDER`]; a family is selected
//! when the addin is in its address set and the provider supplied its client.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use super::client::{PluginClient, PluginClients};
use super::registry::{PluginFamily, RESOLUTION_ORDER};

/// Outcome of plugin resolution.
#[derive(Debug, Clone)]
pub enum PluginResolution {
    /// The mint has no voter-weight addin configured.
    NotConfigured,
    /// The addin is not a known plugin program; base voting power applies.
    Unrecognized(Pubkey),
    /// The plugin governs the mint.
    Active(Arc<dyn PluginClient>),
    /// The addin belongs to a known family whose client is unavailable.
    /// The plugin is silently skipped.
    Disabled(PluginFamily),
}

impl PluginResolution {
    /// Selected client, if any.
    pub fn client(&self) -> Option<Arc<dyn PluginClient>> {
        match self {
            PluginResolution::Active(client) => Some(Arc::clone(client)),
            _ => None,
        }
    }

    pub fn family(&self) -> Option<PluginFamily> {
        match self {
            PluginResolution::Active(client) => Some(client.family()),
            PluginResolution::Disabled(family) => Some(*family),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PluginResolution::Active(_))
    }
}

/// Resolve the plugin client for `voter_weight_addin`.
pub fn resolve_plugin(voter_weight_addin: Option<&Pubkey>, clients: &PluginClients) -> PluginResolution {
    let Some(addin) = voter_weight_addin else {
        debug!("No voter weight addin configured");
        return PluginResolution::NotConfigured;
    };

    let mut matched = None;
    for family in RESOLUTION_ORDER {
        if !family.contains(addin) {
            continue;
        }
        if let Some(client) = clients.get(family) {
            debug!("Addin {} resolved to {} plugin", addin, family);
            // The realm's addin decides which deployment derives plugin accounts.
            if client.program_id() != *addin {
                return PluginResolution::Active(client.bind(*addin));
            }
            return PluginResolution::Active(client);
        }
        matched.get_or_insert(family);
    }

    match matched {
        Some(family) => {
            warn!("Addin {} is a {} plugin but no client is available, using base voting power", addin, family);
            PluginResolution::Disabled(family)
        }
        None => {
            debug!("Addin {} is not a known plugin program", addin);
            PluginResolution::Unrecognized(*addin)
        }
    }
}
