use ckb_type_id_test_utils::{
    build_cell_meta, dummy_input, expected_type_id_args, resolved_transaction, type_id_script,
};
use ckb_types::{
    bytes::Bytes,
    core::{capacity_bytes, cell::ResolvedTransaction, Capacity, TransactionBuilder},
    packed::{Byte32, CellInput, CellOutput, CellOutputBuilder, Script},
    prelude::*,
};

use crate::error::LoadError;
use crate::loader::{Source, SourceEntry, TypeIdDataLoader};

/// Creation scenario: one plain input, one type id output at position
/// `type_id_index` among `output_count` outputs claiming `args`. Outputs
/// before the type id cell carry unrelated type scripts so the locate scan
/// walks over them; outputs after it carry nothing.
pub(crate) fn build_creation_tx(
    input: CellInput,
    args: Bytes,
    output_count: usize,
    type_id_index: usize,
) -> (ResolvedTransaction, Script) {
    let script = type_id_script(args);
    let outputs = (0..output_count).map(|index| {
        let builder = CellOutputBuilder::default().capacity(capacity_bytes!(100).pack());
        if index == type_id_index {
            builder.type_(Some(script.clone()).pack()).build()
        } else if index < type_id_index {
            let filler = type_id_script(Bytes::from(vec![0xee; 32]));
            builder.type_(Some(filler).pack()).build()
        } else {
            builder.build()
        }
    });
    let transaction = TransactionBuilder::default()
        .input(input)
        .outputs(outputs)
        .build();
    let rtx = resolved_transaction(transaction, vec![build_cell_meta(1000, None)]);
    (rtx, script)
}

/// Continuation scenario: the input consumes a cell governed by the type
/// id script and one output keeps it alive.
pub(crate) fn build_continuation_tx(args: Bytes) -> (ResolvedTransaction, Script) {
    let script = type_id_script(args);
    let output = CellOutputBuilder::default()
        .capacity(capacity_bytes!(90).pack())
        .type_(Some(script.clone()).pack())
        .build();
    let transaction = TransactionBuilder::default()
        .input(dummy_input(0x34))
        .output(output)
        .build();
    let rtx = resolved_transaction(
        transaction,
        vec![build_cell_meta(100, Some(script.clone()))],
    );
    (rtx, script)
}

/// Data loader with hand-placed answers, for branches the resolved
/// transaction view cannot produce on demand.
#[derive(Clone)]
pub(crate) struct MockLoader {
    pub(crate) script_data: Result<Bytes, LoadError>,
    pub(crate) script_hash: Byte32,
    pub(crate) group_input_count: usize,
    pub(crate) group_output_count: usize,
    /// Replaces the answer of every group probe when set.
    pub(crate) group_failure: Option<LoadError>,
    /// Raw serialized input bytes, exactly as the host hands them over.
    pub(crate) inputs: Vec<Bytes>,
    /// One entry per transaction output; `None` marks a cell without a
    /// type script.
    pub(crate) output_type_hashes: Vec<Option<Byte32>>,
}

impl Default for MockLoader {
    fn default() -> Self {
        MockLoader {
            script_data: Ok(Bytes::new()),
            script_hash: Byte32::default(),
            group_input_count: 0,
            group_output_count: 0,
            group_failure: None,
            inputs: vec![],
            output_type_hashes: vec![],
        }
    }
}

impl MockLoader {
    /// A consistent creation scenario: no group cells on the input side,
    /// one on the output side, the claimed id valid for `inputs[0]` and
    /// output 0.
    pub(crate) fn valid_creation() -> Self {
        let input = dummy_input(0x56);
        let args = expected_type_id_args(&input, 0);
        let script = type_id_script(args);
        let script_hash = script.calc_script_hash();
        MockLoader {
            script_data: Ok(script.as_bytes()),
            script_hash: script_hash.clone(),
            group_input_count: 0,
            group_output_count: 1,
            group_failure: None,
            inputs: vec![input.as_bytes()],
            output_type_hashes: vec![Some(script_hash)],
        }
    }
}

impl TypeIdDataLoader for MockLoader {
    fn load_script(&self) -> Result<Bytes, LoadError> {
        self.script_data.clone()
    }

    fn load_script_hash(&self) -> Result<Byte32, LoadError> {
        Ok(self.script_hash.clone())
    }

    fn load_cell(&self, index: usize, source: Source) -> Result<CellOutput, LoadError> {
        let count = match source {
            Source::Group(entry) => {
                if let Some(err) = &self.group_failure {
                    return Err(err.clone());
                }
                match entry {
                    SourceEntry::Input => self.group_input_count,
                    SourceEntry::Output => self.group_output_count,
                }
            }
            Source::Transaction(SourceEntry::Input) => self.inputs.len(),
            Source::Transaction(SourceEntry::Output) => self.output_type_hashes.len(),
        };
        if index < count {
            Ok(CellOutput::default())
        } else {
            Err(LoadError::IndexOutOfBound)
        }
    }

    fn load_cell_type_hash(&self, index: usize, source: Source) -> Result<Byte32, LoadError> {
        match source {
            Source::Transaction(SourceEntry::Output) => self
                .output_type_hashes
                .get(index)
                .ok_or(LoadError::IndexOutOfBound)?
                .clone()
                .ok_or(LoadError::ItemMissing),
            _ => Err(LoadError::Other(format!(
                "mock has no type hashes for {:?}",
                source
            ))),
        }
    }

    fn load_input(&self, index: usize, source: Source) -> Result<Bytes, LoadError> {
        match source {
            Source::Transaction(SourceEntry::Input) => self
                .inputs
                .get(index)
                .cloned()
                .ok_or(LoadError::IndexOutOfBound),
            _ => Err(LoadError::IndexOutOfBound),
        }
    }
}
