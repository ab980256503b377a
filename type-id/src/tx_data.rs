//! Resolved-transaction view the production validator reads from.
use ckb_types::{
    bytes::Bytes,
    core::cell::ResolvedTransaction,
    packed::{Byte32, CellOutput, Script},
    prelude::*,
};

use crate::error::LoadError;
use crate::loader::{Source, SourceEntry, TypeIdDataLoader};

/// The cells of one transaction governed by one type script.
///
/// Index lists are global positions into the transaction's inputs and
/// outputs, dense and strictly ascending. Group-relative position `n` is
/// simply the `n`-th entry of the matching list, which is what lets the
/// validator detect a second group member by probing position 1 alone.
#[derive(Debug, Clone)]
pub struct ScriptGroup {
    /// The governing type script.
    pub script: Script,
    /// Global indices of the inputs whose cell carries this type script.
    pub input_indices: Vec<usize>,
    /// Global indices of the outputs carrying this type script.
    pub output_indices: Vec<usize>,
}

impl ScriptGroup {
    /// Creates an empty group for `script`.
    pub fn new(script: &Script) -> Self {
        Self {
            script: script.to_owned(),
            input_indices: vec![],
            output_indices: vec![],
        }
    }

    /// Collects the group of `script` over a resolved transaction.
    ///
    /// Inputs match through the type script of the cell they consume,
    /// outputs through their own type script. Matching is by script hash.
    pub fn from_transaction(rtx: &ResolvedTransaction, script: &Script) -> Self {
        let script_hash = script.calc_script_hash();
        let mut group = Self::new(script);
        for (index, meta) in rtx.resolved_inputs.iter().enumerate() {
            if let Some(type_script) = meta.cell_output.type_().to_opt() {
                if type_script.calc_script_hash() == script_hash {
                    group.input_indices.push(index);
                }
            }
        }
        for (index, output) in rtx.transaction.outputs().into_iter().enumerate() {
            if let Some(type_script) = output.type_().to_opt() {
                if type_script.calc_script_hash() == script_hash {
                    group.output_indices.push(index);
                }
            }
        }
        group
    }
}

/// Borrowed snapshot of one transaction plus the script group under
/// validation. This is the [`TypeIdDataLoader`] the node-side pipeline
/// uses; it holds no state of its own and is cheap to rebuild per pass.
#[derive(Debug, Clone, Copy)]
pub struct TxData<'a> {
    /// The resolved transaction.
    pub rtx: &'a ResolvedTransaction,
    /// The group of the currently executing script.
    pub script_group: &'a ScriptGroup,
}

impl<'a> TxData<'a> {
    /// Creates a view over `rtx` scoped to `script_group`.
    pub fn new(rtx: &'a ResolvedTransaction, script_group: &'a ScriptGroup) -> Self {
        Self { rtx, script_group }
    }

    fn resolve_index(&self, index: usize, source: Source) -> Result<(usize, SourceEntry), LoadError> {
        match source {
            Source::Transaction(entry) => Ok((index, entry)),
            Source::Group(entry) => {
                let indices = match entry {
                    SourceEntry::Input => &self.script_group.input_indices,
                    SourceEntry::Output => &self.script_group.output_indices,
                };
                indices
                    .get(index)
                    .map(|actual_index| (*actual_index, entry))
                    .ok_or(LoadError::IndexOutOfBound)
            }
        }
    }

    fn fetch_cell(&self, index: usize, source: Source) -> Result<CellOutput, LoadError> {
        let (actual_index, entry) = self.resolve_index(index, source)?;
        match entry {
            SourceEntry::Input => self
                .rtx
                .resolved_inputs
                .get(actual_index)
                .map(|meta| meta.cell_output.clone())
                .ok_or(LoadError::IndexOutOfBound),
            SourceEntry::Output => self
                .rtx
                .transaction
                .outputs()
                .get(actual_index)
                .ok_or(LoadError::IndexOutOfBound),
        }
    }
}

impl<'a> TypeIdDataLoader for TxData<'a> {
    fn load_script(&self) -> Result<Bytes, LoadError> {
        Ok(self.script_group.script.as_bytes())
    }

    fn load_script_hash(&self) -> Result<Byte32, LoadError> {
        Ok(self.script_group.script.calc_script_hash())
    }

    fn load_cell(&self, index: usize, source: Source) -> Result<CellOutput, LoadError> {
        self.fetch_cell(index, source)
    }

    fn load_cell_type_hash(&self, index: usize, source: Source) -> Result<Byte32, LoadError> {
        let cell = self.fetch_cell(index, source)?;
        cell.type_()
            .to_opt()
            .map(|type_script| type_script.calc_script_hash())
            .ok_or(LoadError::ItemMissing)
    }

    fn load_input(&self, index: usize, source: Source) -> Result<Bytes, LoadError> {
        let (actual_index, entry) = self.resolve_index(index, source)?;
        match entry {
            SourceEntry::Input => self
                .rtx
                .transaction
                .inputs()
                .get(actual_index)
                .map(|input| input.as_bytes())
                .ok_or(LoadError::IndexOutOfBound),
            SourceEntry::Output => Err(LoadError::IndexOutOfBound),
        }
    }
}
