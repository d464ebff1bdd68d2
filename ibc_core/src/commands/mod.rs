//! Command opcodes: the keyword a line starts with.

pub mod end;
pub mod print;

use crate::table::Table;

pub(crate) fn register(table: &mut Table) {
    print::register(table);
    end::register(table);
}
