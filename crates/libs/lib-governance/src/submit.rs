//! # Proposal Submission
//!
//! The seam between the pipeline and the component that writes the proposal to
//! the ledger (create proposal, insert instructions, optionally sign off).
//! The pipeline's job ends at handing a consistent [`ProposalRequest`] to a
//! [`ProposalSubmitter`].

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::accounts::pda::proposal_address;
use crate::accounts::{ProgramAccount, Realm, TokenOwnerRecord};
use crate::proposal::instruction::deserialize_instruction;
use crate::proposal::InstructionDataWithHoldUpTime;
use crate::voting_client::VotingClient;

/// Signs transactions on behalf of the proposing wallet.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    async fn sign_transaction(&self, transaction: Transaction) -> anyhow::Result<Transaction>;

    async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> anyhow::Result<Vec<Transaction>> {
        let mut signed = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            signed.push(self.sign_transaction(transaction).await?);
        }
        Ok(signed)
    }
}

/// Wallet that identifies a voter but cannot sign; used for previews.
#[derive(Debug, Clone, Copy)]
pub struct ReadonlyWallet(pub Pubkey);

#[async_trait]
impl WalletSigner for ReadonlyWallet {
    fn pubkey(&self) -> Pubkey {
        self.0
    }

    async fn sign_transaction(&self, _transaction: Transaction) -> anyhow::Result<Transaction> {
        anyhow::bail!("Wallet {} is read-only", self.0)
    }
}

/// Progress notifications from the submitter.
pub trait SubmissionCallbacks: Send + Sync {
    fn on_transaction_sent(&self, _signature: &Signature) {}

    fn on_transactions_confirmed(&self, _count: usize) {}
}

/// Connection and wallet the submitter writes with.
#[derive(Clone)]
pub struct RpcContext {
    pub connection: Arc<RpcClient>,
    pub wallet: Arc<dyn WalletSigner>,
    pub program_id: Pubkey,
}

impl RpcContext {
    pub fn wallet_pubkey(&self) -> Pubkey {
        self.wallet.pubkey()
    }
}

impl fmt::Debug for RpcContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcContext")
            .field("connection", &self.connection.url())
            .field("wallet", &self.wallet.pubkey())
            .field("program_id", &self.program_id)
            .finish()
    }
}

/// Everything the submitter needs to create the proposal.
#[derive(Clone)]
pub struct ProposalRequest {
    pub realm: ProgramAccount<Realm>,
    pub governance: Pubkey,
    pub token_owner_record: ProgramAccount<TokenOwnerRecord>,
    pub title: String,
    pub description: String,
    pub governing_token_mint: Pubkey,
    pub proposal_index: u32,
    pub instructions: Vec<InstructionDataWithHoldUpTime>,
    pub is_draft: bool,
    pub voting_client: VotingClient,
    pub callbacks: Option<Arc<dyn SubmissionCallbacks>>,
}

impl fmt::Debug for ProposalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProposalRequest")
            .field("realm", &self.realm.pubkey)
            .field("governance", &self.governance)
            .field("token_owner_record", &self.token_owner_record.pubkey)
            .field("title", &self.title)
            .field("governing_token_mint", &self.governing_token_mint)
            .field("proposal_index", &self.proposal_index)
            .field("instructions", &self.instructions.len())
            .field("is_draft", &self.is_draft)
            .field("plugin", &self.voting_client.plugin_family())
            .finish()
    }
}

/// Writes a proposal to the ledger and returns its address.
#[async_trait]
pub trait ProposalSubmitter: Send + Sync {
    async fn submit(&self, context: &RpcContext, request: ProposalRequest) -> anyhow::Result<Pubkey>;
}

/// Submitter that logs the request and reports the address the proposal would
/// get under index-seeded derivation, without writing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSubmitter;

#[async_trait]
impl ProposalSubmitter for DryRunSubmitter {
    async fn submit(&self, context: &RpcContext, request: ProposalRequest) -> anyhow::Result<Pubkey> {
        let proposal = proposal_address(
            &context.program_id,
            &request.governance,
            &request.governing_token_mint,
            request.proposal_index,
        );

        info!("Dry run: {:?}", request);
        for (i, record) in request.instructions.iter().enumerate() {
            let instruction = deserialize_instruction(&record.instruction.serialized_instruction)
                .map_err(|e| anyhow::anyhow!("instruction #{}: {}", i + 1, e))?;
            info!(
                "  #{} {} with {} account(s), hold-up {}s",
                i + 1,
                instruction.program_id,
                instruction.accounts.len(),
                record.hold_up_time
            );
        }
        info!("Dry run: proposal would be created at {}", proposal);

        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::instruction::{serialize_instruction, SerializedInstruction};
    use solana_program::instruction::{AccountMeta, Instruction};

    fn request(serialized_instruction: String) -> ProposalRequest {
        let realm = ProgramAccount {
            pubkey: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            account: Realm {
                community_mint: Pubkey::new_unique(),
                council_mint: None,
                min_community_weight_to_create_governance: 1,
                authority: None,
                name: "Grape".to_string(),
            },
        };
        let voter = Pubkey::new_unique();
        let governance = Pubkey::new_unique();

        ProposalRequest {
            token_owner_record: ProgramAccount {
                pubkey: Pubkey::new_unique(),
                owner: realm.owner,
                account: TokenOwnerRecord {
                    realm: realm.pubkey,
                    governing_token_mint: realm.account.community_mint,
                    governing_token_owner: voter,
                    governing_token_deposit_amount: 5,
                },
            },
            governance,
            title: "Rotate council".to_string(),
            description: String::new(),
            governing_token_mint: realm.account.community_mint,
            proposal_index: 2,
            instructions: vec![InstructionDataWithHoldUpTime {
                instruction: SerializedInstruction {
                    serialized_instruction,
                    is_valid: true,
                    governance,
                },
                hold_up_time: 0,
                prerequisite_instructions: Vec::new(),
                chunk_by: 1,
            }],
            is_draft: true,
            voting_client: VotingClient::without_plugin(realm.clone(), voter),
            realm,
            callbacks: None,
        }
    }

    fn context() -> RpcContext {
        RpcContext {
            connection: Arc::new(RpcClient::new("http://127.0.0.1:8899".to_string())),
            wallet: Arc::new(ReadonlyWallet(Pubkey::new_unique())),
            program_id: Pubkey::new_unique(),
        }
    }

    #[tokio::test]
    async fn test_dry_run_reports_index_seeded_address() {
        let ix = Instruction {
            program_id: Pubkey::new_unique(),
            accounts: vec![AccountMeta::new(Pubkey::new_unique(), false)],
            data: vec![2, 0, 0, 0],
        };
        let request = request(serialize_instruction(&ix).unwrap());
        let context = context();
        let expected = proposal_address(
            &context.program_id,
            &request.governance,
            &request.governing_token_mint,
            request.proposal_index,
        );

        let proposal = DryRunSubmitter.submit(&context, request).await.unwrap();
        assert_eq!(proposal, expected);
    }

    #[tokio::test]
    async fn test_dry_run_rejects_undecodable_record() {
        let result = DryRunSubmitter.submit(&context(), request("not base64!".to_string())).await;
        assert!(result.unwrap_err().to_string().contains("instruction #1"));
    }

    #[tokio::test]
    async fn test_readonly_wallet_refuses_to_sign() {
        let wallet = ReadonlyWallet(Pubkey::new_unique());
        let result = wallet.sign_all_transactions(vec![Transaction::default()]).await;
        assert!(result.is_err());
    }
}
