//! Marshaling synthesis: invocations, dictionary accessors, events.
//!
//! Consumes the immutable semantic model and produces host-language
//! expression trees:
//!
//! - [`invoke`]: exact-match thunk selection over ABI category sequences,
//!   argument conversion locals in conversion-safety order, by-ref stack
//!   slots with post-call writeback, and the `(send, send_super)` pair.
//! - [`dictionary`]: total getter/setter dispatch for strong-dictionary
//!   accessor properties.
//! - [`event`]: event-argument shape derivation for notification-style
//!   protocol requirements.
//!
//! Everything here is pure: no I/O, no shared state, one member in, one
//! plan or diagnostic out. That is what lets the driver fan members out in
//! parallel and still assemble deterministic output.

pub mod abi;
pub mod dictionary;
pub mod event;
pub mod expr;
pub mod invoke;

pub use abi::{abi_category, return_category, AbiCategory, ThunkRegistry, ThunkSignature};
pub use dictionary::{synthesize_accessor, AccessorPair};
pub use event::{synthesize_event, EventField, EventShape, ExplicitShape};
pub use expr::{HostExpr, HostStmt};
pub use invoke::{select_getter, select_invocation, select_setter, ArgPlan, InvocationPlan};
