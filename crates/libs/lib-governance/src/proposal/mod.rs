//! # Proposal Assembly
//!
//! Turns a voter's intent (title, description, instructions) into a submitted
//! governance proposal. See [`ProposalCreator::create_proposal`].

pub mod assembler;
pub mod create;
pub mod instruction;

pub use assembler::{select_acting_record, validate_title};
pub use create::{CreateProposalArgs, ProposalCreator};
pub use instruction::{
    serialize_instruction, serialize_instructions, InstructionDataWithHoldUpTime, ProposalInstruction,
    SerializedInstruction, DEFAULT_CHUNK_BY,
};

#[cfg(test)]
mod tests;
