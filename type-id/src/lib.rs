//! CKB component to validate the Type ID of a cell.
//!
//! A cell whose type script carries a Type ID is a singleton: at most one
//! live instance per identifier, and the identifier of a freshly created
//! cell must be derived from the creating transaction's first input and the
//! position of the cell among the transaction outputs. This crate checks
//! both rules over a resolved transaction snapshot, or over any other data
//! source implementing [`TypeIdDataLoader`].
use ckb_types::{h256, H256};

mod error;
mod loader;
mod tx_data;
mod verify;


/// The well-known code hash marking a Type ID script, the ASCII bytes
/// "TYPE_ID".
pub const TYPE_ID_CODE_HASH: H256 = h256!("0x545950455f4944");

pub use crate::error::{LoadError, TypeIdError};
pub use crate::loader::{CellPresence, Source, SourceEntry, TypeIdDataLoader};
pub use crate::tx_data::{ScriptGroup, TxData};
pub use crate::verify::{
    calculate_type_id, TypeIdVerifier, MAX_INPUT_SIZE, MAX_OUTPUT_SCAN, MAX_SCRIPT_SIZE,
};
