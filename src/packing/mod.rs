//! Low-level index-set bookkeeping shared by the search frontier and the
//! sweep/waking-list machinery: an O(1) doubly-linked integer set
//! ([`int_list`]), an active/reserve partition over it ([`waking_list`]),
//! and forbidden-region projection for packing-style constraints
//! ([`sweep`]).

pub mod int_list;
pub mod sweep;
pub mod waking_list;
