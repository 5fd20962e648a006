//! # Proposal Instructions
//!
//! Instructions attached to a proposal are stored on-chain in the governance
//! program's `InstructionData` encoding. This module encodes them (base64 over
//! borsh) and wraps each one with the hold-up time it executes under.

use borsh::{BorshDeserialize, BorshSerialize};
use lib_core::{AppError, Result};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::accounts::{Governance, ProgramAccount};

/// Maximum size of a transaction packet.
pub const PACKET_DATA_SIZE: usize = 1232;

/// Bytes of the insert-transaction packet not taken by the encoded instruction:
/// one signature, message header, nine account keys, recent blockhash and the
/// insert instruction's own accounts, tag, indices and hold-up time.
pub const INSERT_TRANSACTION_OVERHEAD: usize = 420;

/// Largest encoded instruction that still fits in one insert transaction.
pub const MAX_INSTRUCTION_DATA_SIZE: usize = PACKET_DATA_SIZE - INSERT_TRANSACTION_OVERHEAD;

/// Instructions inserted per transaction unless overridden.
pub const DEFAULT_CHUNK_BY: usize = 2;

/// An instruction to attach to a proposal, with its execution options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalInstruction {
    pub instruction: Instruction,
    /// Overrides the governance's minimum hold-up time
    pub custom_hold_up_time: Option<u32>,
    /// Instructions that must run before the proposal's transactions are inserted
    pub prerequisite_instructions: Vec<Instruction>,
    pub chunk_by: usize,
}

impl ProposalInstruction {
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            custom_hold_up_time: None,
            prerequisite_instructions: Vec::new(),
            chunk_by: DEFAULT_CHUNK_BY,
        }
    }

    pub fn with_hold_up_time(mut self, seconds: u32) -> Self {
        self.custom_hold_up_time = Some(seconds);
        self
    }

    pub fn with_prerequisites(mut self, instructions: Vec<Instruction>) -> Self {
        self.prerequisite_instructions = instructions;
        self
    }

    pub fn with_chunk_by(mut self, chunk_by: usize) -> Self {
        self.chunk_by = chunk_by.max(1);
        self
    }
}

impl From<Instruction> for ProposalInstruction {
    fn from(instruction: Instruction) -> Self {
        Self::new(instruction)
    }
}

/// Serialized instruction tagged with the governance it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedInstruction {
    /// Base64 of the borsh `InstructionData`
    pub serialized_instruction: String,
    pub is_valid: bool,
    pub governance: Pubkey,
}

/// Instruction record handed to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDataWithHoldUpTime {
    pub instruction: SerializedInstruction,
    /// Seconds between the proposal passing and this instruction executing
    pub hold_up_time: u32,
    pub prerequisite_instructions: Vec<Instruction>,
    pub chunk_by: usize,
}

// region: --- On-chain encoding

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
struct AccountMetaData {
    pubkey: [u8; 32],
    is_signer: bool,
    is_writable: bool,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
struct InstructionData {
    program_id: [u8; 32],
    accounts: Vec<AccountMetaData>,
    data: Vec<u8>,
}

impl From<&Instruction> for InstructionData {
    fn from(ix: &Instruction) -> Self {
        Self {
            program_id: ix.program_id.to_bytes(),
            accounts: ix
                .accounts
                .iter()
                .map(|meta| AccountMetaData {
                    pubkey: meta.pubkey.to_bytes(),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: ix.data.clone(),
        }
    }
}

// endregion: --- On-chain encoding

/// Encode `ix` as base64 `InstructionData`.
pub fn serialize_instruction(ix: &Instruction) -> Result<String> {
    let bytes = borsh::to_vec(&InstructionData::from(ix))
        .map_err(|e| AppError::Serialization(format!("Failed to encode instruction: {}", e)))?;

    if bytes.len() > MAX_INSTRUCTION_DATA_SIZE {
        return Err(AppError::Serialization(format!(
            "Instruction for program {} is {} bytes, limit is {}",
            ix.program_id,
            bytes.len(),
            MAX_INSTRUCTION_DATA_SIZE
        )));
    }

    Ok(lib_utils::b64_encode(&bytes))
}

/// Decode a base64 `InstructionData` back into an instruction.
pub fn deserialize_instruction(encoded: &str) -> Result<Instruction> {
    let bytes = lib_utils::b64_decode(encoded)
        .map_err(|e| AppError::Decoding(format!("Invalid instruction encoding: {}", e)))?;
    let raw = InstructionData::try_from_slice(&bytes)
        .map_err(|e| AppError::Decoding(format!("Invalid instruction data: {}", e)))?;

    Ok(Instruction {
        program_id: Pubkey::new_from_array(raw.program_id),
        accounts: raw
            .accounts
            .into_iter()
            .map(|meta| AccountMeta {
                pubkey: Pubkey::new_from_array(meta.pubkey),
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect(),
        data: raw.data,
    })
}

/// Serialize every instruction for `governance`.
///
/// The batch is all-or-nothing: the first failure is returned and no records
/// are produced.
pub fn serialize_instructions(
    governance: &ProgramAccount<Governance>,
    instructions: &[ProposalInstruction],
) -> Result<Vec<InstructionDataWithHoldUpTime>> {
    let default_hold_up = governance.account.config.min_transaction_hold_up_time;

    instructions
        .iter()
        .enumerate()
        .map(|(i, ix)| {
            let serialized = serialize_instruction(&ix.instruction).map_err(|e| match e {
                AppError::Serialization(msg) => {
                    AppError::Serialization(format!("instruction #{} of {}: {}", i + 1, instructions.len(), msg))
                }
                other => other,
            })?;

            Ok(InstructionDataWithHoldUpTime {
                instruction: SerializedInstruction {
                    serialized_instruction: serialized,
                    is_valid: true,
                    governance: governance.pubkey,
                },
                hold_up_time: ix.custom_hold_up_time.unwrap_or(default_hold_up),
                prerequisite_instructions: ix.prerequisite_instructions.clone(),
                chunk_by: ix.chunk_by,
            })
        })
        .collect()
}
