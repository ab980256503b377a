//! The Type ID validation state machine.
use ckb_hash::new_blake2b;
use ckb_logger::debug;
use ckb_types::{
    bytes::Bytes,
    packed::{CellInput, Script},
    prelude::*,
};

use crate::error::{LoadError, TypeIdError};
use crate::loader::{CellPresence, Source, SourceEntry, TypeIdDataLoader};

/// Capacity reserved for the serialized current script, 32 KiB. A longer
/// script fails loading rather than being truncated.
pub const MAX_SCRIPT_SIZE: usize = 32_768;

/// Capacity reserved for the serialized first input of the transaction.
pub const MAX_INPUT_SIZE: usize = 128;

/// Upper bound on the creation-output scan. No transaction can hold this
/// many outputs, since every output occupies at least 61 bytes of a block
/// whose serialized size is capped far below `61 * 8192`. Running past the
/// bound is reported the same as exhausting the outputs.
pub const MAX_OUTPUT_SCAN: usize = 8_192;

/// Derives the type id a creation output must claim.
///
/// The id is the blake2b-256 digest, under CKB's standard personalization,
/// of the serialized first input of the creating transaction followed by
/// `output_index` encoded as a 64-bit little-endian integer. Binding the
/// first input makes the id unforgeable without spending that input;
/// binding the index keeps ids distinct when one transaction creates
/// several type id cells.
pub fn calculate_type_id(first_input: &CellInput, output_index: u64) -> [u8; 32] {
    type_id_digest(first_input.as_slice(), output_index)
}

fn type_id_digest(first_input: &[u8], output_index: u64) -> [u8; 32] {
    let mut blake2b = new_blake2b();
    blake2b.update(first_input);
    blake2b.update(&output_index.to_le_bytes());
    let mut ret = [0u8; 32];
    blake2b.finalize(&mut ret);
    ret
}

/// Validator for the type id rules of the currently executing script.
///
/// One instance checks one script group of one transaction. [`validate`]
/// enforces two rules over the data behind `DL`:
///
/// * at most one cell of this type id on each side of the transaction;
/// * a created cell must claim the id [`calculate_type_id`] yields for the
///   transaction's first input and the cell's output position.
///
/// [`validate`]: TypeIdVerifier::validate
pub struct TypeIdVerifier<DL> {
    data_loader: DL,
}

impl<DL: TypeIdDataLoader> TypeIdVerifier<DL> {
    /// Creates a validator reading through `data_loader`.
    pub fn new(data_loader: DL) -> Self {
        TypeIdVerifier { data_loader }
    }

    /// Runs the full type id check.
    ///
    /// `offset` locates the 32-byte claimed id inside the current script
    /// args. The check is a single deterministic pass: a singleton guard
    /// over group position 1 on both sides, then either an immediate pass
    /// when a group input occupies position 0 (the cell continues an
    /// existing id) or, on creation, the derivation-and-compare of the
    /// claimed id. Every failure is terminal and rejects the transaction.
    pub fn validate(&self, offset: usize) -> Result<(), TypeIdError> {
        if self.has_group_cell(1, SourceEntry::Input)?
            || self.has_group_cell(1, SourceEntry::Output)?
        {
            debug!("there can only be at most one input and one output type id cell");
            return Err(TypeIdError::DuplicateTypeIdCell);
        }

        if self.has_group_cell(0, SourceEntry::Input)? {
            // Continuation of an id fixed at its creation transaction.
            return Ok(());
        }

        let claimed_id = self.extract_claimed_id(offset)?;
        let index = self.locate_creation_output()?;
        let first_input = self.load_first_input()?;
        let expected_id = type_id_digest(&first_input, index);
        if expected_id != claimed_id {
            debug!("invalid type id claimed for output {}", index);
            return Err(TypeIdError::TypeIdMismatch);
        }
        Ok(())
    }

    fn has_group_cell(&self, index: usize, entry: SourceEntry) -> Result<bool, TypeIdError> {
        match self.data_loader.probe_cell(index, Source::Group(entry)) {
            CellPresence::Found => Ok(true),
            CellPresence::NotFoundByRange => Ok(false),
            CellPresence::OtherFailure(err) => Err(TypeIdError::LoadFailure(err)),
        }
    }

    fn extract_claimed_id(&self, offset: usize) -> Result<[u8; 32], TypeIdError> {
        let data = self.data_loader.load_script()?;
        if data.len() > MAX_SCRIPT_SIZE {
            debug!("current script is too large: {} bytes", data.len());
            return Err(LoadError::LengthNotEnough {
                limit: MAX_SCRIPT_SIZE,
                actual: data.len(),
            }
            .into());
        }
        let script = Script::from_slice(&data).map_err(|err| {
            debug!("current script fails molecule verification: {}", err);
            TypeIdError::MalformedSchema
        })?;
        let args = script.args().raw_data();

        let end = offset
            .checked_add(32)
            .filter(|end| *end <= args.len())
            .ok_or(TypeIdError::OffsetOutOfRange {
                args_len: args.len(),
                offset,
            })?;
        let mut claimed_id = [0u8; 32];
        claimed_id.copy_from_slice(&args[offset..end]);
        Ok(claimed_id)
    }

    fn locate_creation_output(&self) -> Result<u64, TypeIdError> {
        let script_hash = self.data_loader.load_script_hash()?;
        for index in 0..MAX_OUTPUT_SCAN {
            match self
                .data_loader
                .load_cell_type_hash(index, Source::Transaction(SourceEntry::Output))
            {
                Ok(type_hash) if type_hash == script_hash => return Ok(index as u64),
                Ok(_) => {}
                Err(LoadError::IndexOutOfBound) => {
                    debug!("no output carries the current script hash");
                    return Err(TypeIdError::NoMatchingOutput);
                }
                Err(err) => {
                    debug!("error fetching an output type hash: {}", err);
                    return Err(TypeIdError::LoadFailure(err));
                }
            }
        }
        Err(TypeIdError::NoMatchingOutput)
    }

    fn load_first_input(&self) -> Result<Bytes, TypeIdError> {
        let first_input = self
            .data_loader
            .load_input(0, Source::Transaction(SourceEntry::Input))?;
        if first_input.len() > MAX_INPUT_SIZE {
            debug!(
                "the first input of the transaction is too large: {} bytes",
                first_input.len()
            );
            return Err(LoadError::LengthNotEnough {
                limit: MAX_INPUT_SIZE,
                actual: first_input.len(),
            }
            .into());
        }
        Ok(first_input)
    }
}
