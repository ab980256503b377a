//! Data access used by Type ID validation.
//!
//! The validator never walks a transaction directly. Everything it reads
//! comes through [`TypeIdDataLoader`], so the same checks run over a node's
//! resolved transaction snapshot or over any mock a test wires up.
use ckb_types::{
    bytes::Bytes,
    packed::{Byte32, CellOutput},
};

use crate::error::LoadError;

/// Side of the transaction a load refers to.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum SourceEntry {
    /// Transaction inputs.
    Input,
    /// Transaction outputs.
    Output,
}

/// Scope of a load: the whole transaction, or only the cells governed by
/// the currently executing script.
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum Source {
    /// Index into the full transaction sequence.
    Transaction(SourceEntry),
    /// Index into the group scoped to the current script.
    Group(SourceEntry),
}

/// Presence of a cell at a probed position.
///
/// `NotFoundByRange` is the only benign absence; `OtherFailure` carries a
/// host condition the caller has to surface instead of treating the cell
/// as absent.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CellPresence {
    /// A cell exists at the probed position.
    Found,
    /// The probed position lies past the end of the sequence.
    NotFoundByRange,
    /// The probe failed for a reason other than running out of cells.
    OtherFailure(LoadError),
}

/// Transaction data consumed by the Type ID validator.
///
/// Group sources take group-relative indices; implementations resolve them
/// against the group scoped to the current script and answer
/// [`LoadError::IndexOutOfBound`] past its end. Loads that make no sense
/// for a source, such as an input fetched from an output source, also
/// answer `IndexOutOfBound`.
pub trait TypeIdDataLoader {
    /// Serialized bytes of the currently executing script.
    fn load_script(&self) -> Result<Bytes, LoadError>;

    /// Hash of the currently executing script.
    fn load_script_hash(&self) -> Result<Byte32, LoadError>;

    /// The cell at `index` of `source`.
    fn load_cell(&self, index: usize, source: Source) -> Result<CellOutput, LoadError>;

    /// The type script hash of the cell at `index` of `source`.
    ///
    /// A cell with no type script answers [`LoadError::ItemMissing`].
    fn load_cell_type_hash(&self, index: usize, source: Source) -> Result<Byte32, LoadError>;

    /// Raw serialized bytes of the input at `index` of `source`. The
    /// bytes are consumed whole, never decoded field by field.
    fn load_input(&self, index: usize, source: Source) -> Result<Bytes, LoadError>;

    /// Whether a cell exists at `index` of `source`, as a three-way
    /// outcome. Implementations should not override this; the default
    /// classifies [`load_cell`](Self::load_cell) results.
    fn probe_cell(&self, index: usize, source: Source) -> CellPresence {
        match self.load_cell(index, source) {
            Ok(_) => CellPresence::Found,
            Err(LoadError::IndexOutOfBound) => CellPresence::NotFoundByRange,
            Err(err) => CellPresence::OtherFailure(err),
        }
    }
}
