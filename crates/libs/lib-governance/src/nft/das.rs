//! # DAS NFT Source
//!
//! Lists a wallet's NFTs through the Digital Asset Standard (DAS) JSON-RPC API
//! (`getAssetsByOwner`), served by indexing RPC providers such as Helius.
//!
//! ## Example
//! ```no_run
//! # use lib_governance::nft::{DasNftSource, NftSource};
//! # use lib_core::Cluster;
//! # async fn example(owner: solana_sdk::pubkey::Pubkey) -> anyhow::Result<()> {
//! let source = DasNftSource::new("https://mainnet.helius-rpc.com/?api-key=KEY".to_string(), Cluster::Mainnet)?;
//! let nfts = source.get_nfts(&owner, Cluster::Mainnet).await?;
//! println!("{} NFTs", nfts.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use lib_core::Cluster;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, warn};

use super::{Nft, NftCollection, NftCreator, NftSource};

/// Assets requested per page (the DAS maximum).
const PAGE_LIMIT: u32 = 1000;
/// Upper bound on pages fetched for a single wallet.
const MAX_PAGES: u32 = 50;

/// NFT source backed by a DAS endpoint.
pub struct DasNftSource {
    http: Client,
    url: String,
    cluster: Cluster,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'a str,
    id: &'a str,
    method: &'a str,
    params: P,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetAssetsByOwnerParams<'a> {
    owner_address: &'a str,
    page: u32,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    #[serde(default)]
    items: Vec<DasAsset>,
}

#[derive(Debug, Deserialize)]
struct DasAsset {
    id: String,
    #[serde(default)]
    interface: Option<String>,
    #[serde(default)]
    content: Option<DasContent>,
    #[serde(default)]
    grouping: Vec<DasGroup>,
    #[serde(default)]
    creators: Vec<DasCreator>,
    #[serde(default)]
    burnt: bool,
}

#[derive(Debug, Deserialize)]
struct DasContent {
    #[serde(default)]
    metadata: Option<DasMetadata>,
}

#[derive(Debug, Deserialize)]
struct DasMetadata {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DasGroup {
    group_key: String,
    #[serde(default)]
    group_value: Option<String>,
    #[serde(default)]
    verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DasCreator {
    address: String,
    #[serde(default)]
    share: u8,
    #[serde(default)]
    verified: bool,
}

impl DasAsset {
    fn is_fungible(&self) -> bool {
        matches!(
            self.interface.as_deref(),
            Some("FungibleToken") | Some("FungibleAsset")
        )
    }

    fn into_nft(self) -> Option<Nft> {
        if self.burnt || self.is_fungible() {
            return None;
        }

        let mint = match Pubkey::from_str(&self.id) {
            Ok(mint) => mint,
            Err(_) => {
                debug!("Skipping asset with non-pubkey id {}", self.id);
                return None;
            }
        };

        let collection = self
            .grouping
            .into_iter()
            .find(|g| g.group_key == "collection")
            .map(|g| NftCollection {
                mint_address: g.group_value.as_deref().and_then(|v| Pubkey::from_str(v).ok()),
                verified: g.verified,
            });

        let creators = self
            .creators
            .into_iter()
            .filter_map(|c| {
                Pubkey::from_str(&c.address).ok().map(|address| NftCreator {
                    address,
                    verified: c.verified,
                    share: c.share,
                })
            })
            .collect();

        let name = self
            .content
            .and_then(|c| c.metadata)
            .and_then(|m| m.name)
            .unwrap_or_default();

        Some(Nft {
            mint,
            name,
            collection,
            creators,
        })
    }
}

impl DasNftSource {
    /// Create a DAS client for `url`, serving `cluster`.
    pub fn new(url: String, cluster: Cluster) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { http, url, cluster })
    }

    async fn fetch_page(&self, owner: &str, page: u32) -> anyhow::Result<Vec<DasAsset>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: "realms-proposer",
            method: "getAssetsByOwner",
            params: GetAssetsByOwnerParams {
                owner_address: owner,
                page,
                limit: PAGE_LIMIT,
            },
        };

        let response: RpcResponse<AssetPage> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("DAS request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("DAS request rejected: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("DAS response parse failed: {}", e))?;

        parse_page(response)
    }
}

fn parse_page(response: RpcResponse<AssetPage>) -> anyhow::Result<Vec<DasAsset>> {
    if let Some(error) = response.error {
        anyhow::bail!("DAS error {}: {}", error.code, error.message);
    }
    Ok(response.result.map(|page| page.items).unwrap_or_default())
}

#[async_trait]
impl NftSource for DasNftSource {
    async fn get_nfts(&self, owner: &Pubkey, cluster: Cluster) -> anyhow::Result<Vec<Nft>> {
        if cluster != self.cluster {
            anyhow::bail!("DAS endpoint serves {}, not {}", self.cluster, cluster);
        }

        let owner = owner.to_string();
        let mut nfts = Vec::new();

        for page in 1..=MAX_PAGES {
            let items = self.fetch_page(&owner, page).await?;
            let count = items.len();
            nfts.extend(items.into_iter().filter_map(DasAsset::into_nft));

            if count < PAGE_LIMIT as usize {
                return Ok(nfts);
            }
        }

        warn!("Stopped listing assets for {} after {} pages", owner, MAX_PAGES);
        Ok(nfts)
    }
}
