//! Provide several functions used for testing Type ID validation.
use ckb_hash::{blake2b_256, new_blake2b};
use ckb_type_id::TYPE_ID_CODE_HASH;
use ckb_types::{
    bytes::Bytes,
    core::{
        cell::{CellMeta, CellMetaBuilder, ResolvedTransaction},
        Capacity, ScriptHashType, TransactionView,
    },
    packed::{CellInput, CellOutput, OutPoint, Script},
    prelude::*,
};

/// Builds a type id script claiming the id held in `args`.
pub fn type_id_script(args: Bytes) -> Script {
    Script::new_builder()
        .code_hash(TYPE_ID_CODE_HASH.pack())
        .hash_type(ScriptHashType::Type.into())
        .args(args.pack())
        .build()
}

/// Builds a script unrelated to any type id. Validation never executes
/// scripts, so tests hang this one on cells that must stay outside the
/// current script group; distinct `args` give distinct script hashes.
pub fn always_success_script(args: Bytes) -> Script {
    Script::new_builder()
        .code_hash(blake2b_256(b"always_success").pack())
        .hash_type(ScriptHashType::Data.into())
        .args(args.pack())
        .build()
}

/// Computes the type id args a creation output has to carry: the
/// blake2b-256 digest of the serialized first input followed by the
/// 64-bit little-endian output index.
pub fn expected_type_id_args(first_input: &CellInput, output_index: u64) -> Bytes {
    let mut blake2b = new_blake2b();
    blake2b.update(first_input.as_slice());
    blake2b.update(&output_index.to_le_bytes());
    let mut ret = [0; 32];
    blake2b.finalize(&mut ret);
    Bytes::from(ret.to_vec())
}

/// Builds the meta of a live cell carrying `type_script`.
pub fn build_cell_meta(capacity_bytes: usize, type_script: Option<Script>) -> CellMeta {
    let capacity = Capacity::bytes(capacity_bytes).expect("capacity bytes overflow");
    let cell_output = CellOutput::new_builder()
        .capacity(capacity.pack())
        .type_(type_script.pack())
        .build();
    CellMetaBuilder::from_cell_output(cell_output, Bytes::new()).build()
}

/// Builds an input spending a synthetic out point derived from `seed`.
/// Distinct seeds give distinct serialized inputs, hence distinct type ids.
pub fn dummy_input(seed: u8) -> CellInput {
    CellInput::new(OutPoint::new([seed; 32].pack(), 0), 0)
}

/// Wraps a transaction with the metas of its consumed cells. Type ID
/// validation never touches dep cells, so both dep lists stay empty.
pub fn resolved_transaction(
    transaction: TransactionView,
    resolved_inputs: Vec<CellMeta>,
) -> ResolvedTransaction {
    ResolvedTransaction {
        transaction,
        resolved_cell_deps: vec![],
        resolved_inputs,
        resolved_dep_groups: vec![],
    }
}
